//! # Conway Notation
//!
//! Strings such as `"tkC"` or `"dP5"`: a seed at the end, preceded by
//! operator letters applied right to left with their default amounts.
//!
//! | Seed | Solid |
//! |------|-------|
//! | `T` `C` `O` `I` `D` | Platonic solids |
//! | `Pn` `An` `Yn` | n-gonal prism, antiprism, pyramid |

use super::radial::{self, RadialPolyType};
use super::uniform;
use polymesh::{apply, OpParams, Operator, PolyError, PolyMesh, PolyResult};
use tracing::debug;

fn operator(letter: char) -> Option<Operator> {
    use Operator::*;
    Some(match letter {
        'd' => Dual,
        'a' => Ambo,
        'k' => Kis,
        't' => Truncate,
        'j' => Join,
        'e' => Expand,
        's' => Snub,
        'g' => Gyro,
        'o' => Ortho,
        'm' => Meta,
        'b' => Bevel,
        'n' => Needle,
        'z' => Zip,
        'c' => Chamfer,
        'p' => Propeller,
        'w' => Whirl,
        'v' => Volute,
        'l' => Loft,
        'q' => Quinto,
        'u' => Subdivide,
        'L' => Lace,
        'K' => Stake,
        'x' => Cross,
        _ => return None,
    })
}

fn seed(letter: char, sides: Option<usize>, notation: &str) -> PolyResult<PolyMesh> {
    let platonic = match letter {
        'T' => Some("tetrahedron"),
        'C' => Some("cube"),
        'O' => Some("octahedron"),
        'I' => Some("icosahedron"),
        'D' => Some("dodecahedron"),
        _ => None,
    };
    if let Some(name) = platonic {
        if sides.is_some() {
            return Err(PolyError::unrecognized("conway seed", notation));
        }
        return uniform::build(name);
    }

    let kind = match letter {
        'P' => RadialPolyType::Prism,
        'A' => RadialPolyType::Antiprism,
        'Y' => RadialPolyType::Pyramid,
        _ => return Err(PolyError::unrecognized("conway seed", notation)),
    };
    let sides = sides.ok_or_else(|| {
        PolyError::degenerate(format!("seed '{letter}' in '{notation}' needs a side count"))
    })?;
    radial::build(kind, sides)
}

/// Builds the solid named by `notation`.
///
/// # Errors
///
/// `UnrecognizedTypeName` for unknown operator letters or seeds,
/// `DegenerateParameters` for missing or too-small side counts, and any
/// error raised by the operators themselves.
///
/// # Example
///
/// ```rust
/// use polyhydra::generators::notation::build;
///
/// // Kis splits each of the six squares into four triangles.
/// let mesh = build("kC").unwrap();
/// assert_eq!(mesh.face_count(), 24);
/// ```
pub fn build(notation: &str) -> PolyResult<PolyMesh> {
    let compact: String = notation.chars().filter(|c| !c.is_whitespace()).collect();
    let body = compact.trim_end_matches(|c: char| c.is_ascii_digit());
    let digits = &compact[body.len()..];
    let sides = if digits.is_empty() {
        None
    } else {
        Some(
            digits
                .parse::<usize>()
                .map_err(|_| PolyError::degenerate(format!("side count '{digits}' is too large")))?,
        )
    };

    let mut letters = body.chars();
    let seed_letter = letters
        .next_back()
        .ok_or_else(|| PolyError::unrecognized("conway seed", notation))?;
    let operators = letters
        .map(|c| operator(c).ok_or_else(|| PolyError::unrecognized("conway operator", c.to_string())))
        .collect::<PolyResult<Vec<_>>>()?;

    let mut mesh = seed(seed_letter, sides, notation)?;
    for op in operators.into_iter().rev() {
        mesh = apply(&mesh, op, &OpParams::default())?;
    }
    debug!(notation, counts = %mesh.counts(), "built conway notation");
    Ok(mesh)
}
