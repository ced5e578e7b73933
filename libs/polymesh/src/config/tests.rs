//! Tests covering kernel configuration behavior.

use super::*;

#[test]
fn default_matches_constants() {
    let cfg = KernelConfig::default();
    assert_eq!(cfg.tolerance, CANONICALIZE_TOLERANCE);
    assert_eq!(cfg.canonicalize_iterations, CANONICALIZE_ITERATIONS);
}

#[test]
fn builder_validates_tolerance() {
    let err = KernelConfig::new(0.0, 24).unwrap_err();
    assert_eq!(err, KernelConfigError(ConfigError::InvalidTolerance(0.0)));
}

#[test]
fn builder_validates_iterations() {
    let err = KernelConfig::new(1e-6, 0).unwrap_err();
    assert_eq!(err, KernelConfigError(ConfigError::InvalidIterations(0)));
}

#[test]
fn converts_from_global_config() {
    let cfg = KernelConfig::from(GlobalConfig::default());
    assert_eq!(cfg, KernelConfig::default());
}
