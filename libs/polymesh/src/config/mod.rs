//! Kernel-level configuration building on the shared `config` crate.
//!
//! Relaxation operators read their tolerance and iteration cap from here so
//! geometry code stays decoupled from literal constants.

use config::constants::{ConfigError, GlobalConfig, CANONICALIZE_ITERATIONS, CANONICALIZE_TOLERANCE};

/// Geometry kernel configuration wrapper.
///
/// # Examples
/// ```
/// use polymesh::config::KernelConfig;
/// let cfg = KernelConfig::default();
/// assert!(cfg.tolerance > 0.0);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct KernelConfig {
    /// Largest per-pass displacement at which relaxation stops.
    pub tolerance: f64,
    /// Iteration cap for Canonicalize.
    pub canonicalize_iterations: usize,
}

impl KernelConfig {
    /// Creates a new configuration from explicit values.
    ///
    /// # Examples
    /// ```
    /// use polymesh::config::KernelConfig;
    /// let cfg = KernelConfig::new(1.0e-6, 40).unwrap();
    /// assert_eq!(cfg.canonicalize_iterations, 40);
    /// ```
    pub fn new(tolerance: f64, canonicalize_iterations: usize) -> Result<Self, KernelConfigError> {
        GlobalConfig::new(tolerance, canonicalize_iterations)
            .map(Self::from)
            .map_err(KernelConfigError)
    }
}

impl From<GlobalConfig> for KernelConfig {
    fn from(cfg: GlobalConfig) -> Self {
        Self {
            tolerance: cfg.tolerance,
            canonicalize_iterations: cfg.canonicalize_iterations,
        }
    }
}

impl Default for KernelConfig {
    fn default() -> Self {
        Self {
            tolerance: CANONICALIZE_TOLERANCE,
            canonicalize_iterations: CANONICALIZE_ITERATIONS,
        }
    }
}

/// Error wrapper for invalid kernel configuration.
#[derive(Debug, PartialEq)]
pub struct KernelConfigError(pub ConfigError);

impl std::fmt::Display for KernelConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

impl std::error::Error for KernelConfigError {}

#[cfg(test)]
mod tests;
