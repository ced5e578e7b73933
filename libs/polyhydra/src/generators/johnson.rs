//! # Johnson Solids
//!
//! J1–J48: every Johnson solid that is a stack of pyramids, cupolae,
//! rotundae, prisms and antiprisms around one axis. Solids are looked up by
//! number (`"J27"`, `"27"`) or by name in any spelling.

use super::normalize;
use super::radial::{build_layout, Band, Cap, Layout, RadialPolyType};
use polymesh::{PolyError, PolyMesh, PolyResult};

enum Source {
    Radial(RadialPolyType),
    Layout(Layout),
}

use Band as B;
use Cap as C;
use RadialPolyType as R;
use Source::{Layout as L, Radial as Rd};

const CUPOLA_ROTUNDA: Layout = Layout::new(C::Cupola, B::None, C::Rotunda, false);
const GYRO_CUPOLA_ROTUNDA: Layout = Layout::new(C::Cupola, B::None, C::Rotunda, true);
const BIROTUNDA: Layout = Layout::new(C::Rotunda, B::None, C::Rotunda, false);
const FASTIGIUM: Layout = Layout::new(C::Cupola, B::None, C::Cupola, true);

const SOLIDS: [(&str, Source, usize); 48] = [
    ("square pyramid", Rd(R::Pyramid), 4),
    ("pentagonal pyramid", Rd(R::Pyramid), 5),
    ("triangular cupola", Rd(R::Cupola), 3),
    ("square cupola", Rd(R::Cupola), 4),
    ("pentagonal cupola", Rd(R::Cupola), 5),
    ("pentagonal rotunda", Rd(R::Rotunda), 5),
    ("elongated triangular pyramid", Rd(R::ElongatedPyramid), 3),
    ("elongated square pyramid", Rd(R::ElongatedPyramid), 4),
    ("elongated pentagonal pyramid", Rd(R::ElongatedPyramid), 5),
    ("gyroelongated square pyramid", Rd(R::GyroelongatedPyramid), 4),
    ("gyroelongated pentagonal pyramid", Rd(R::GyroelongatedPyramid), 5),
    ("triangular bipyramid", Rd(R::Dipyramid), 3),
    ("pentagonal bipyramid", Rd(R::Dipyramid), 5),
    ("elongated triangular bipyramid", Rd(R::ElongatedDipyramid), 3),
    ("elongated square bipyramid", Rd(R::ElongatedDipyramid), 4),
    ("elongated pentagonal bipyramid", Rd(R::ElongatedDipyramid), 5),
    ("gyroelongated square bipyramid", Rd(R::GyroelongatedDipyramid), 4),
    ("elongated triangular cupola", Rd(R::ElongatedCupola), 3),
    ("elongated square cupola", Rd(R::ElongatedCupola), 4),
    ("elongated pentagonal cupola", Rd(R::ElongatedCupola), 5),
    ("elongated pentagonal rotunda", Rd(R::ElongatedRotunda), 5),
    ("gyroelongated triangular cupola", Rd(R::GyroelongatedCupola), 3),
    ("gyroelongated square cupola", Rd(R::GyroelongatedCupola), 4),
    ("gyroelongated pentagonal cupola", Rd(R::GyroelongatedCupola), 5),
    ("gyroelongated pentagonal rotunda", Rd(R::GyroelongatedRotunda), 5),
    ("gyrobifastigium", L(FASTIGIUM), 2),
    ("triangular orthobicupola", Rd(R::OrthoBicupola), 3),
    ("square orthobicupola", Rd(R::OrthoBicupola), 4),
    ("square gyrobicupola", Rd(R::GyroBicupola), 4),
    ("pentagonal orthobicupola", Rd(R::OrthoBicupola), 5),
    ("pentagonal gyrobicupola", Rd(R::GyroBicupola), 5),
    ("pentagonal orthocupolarotunda", L(CUPOLA_ROTUNDA), 5),
    ("pentagonal gyrocupolarotunda", L(GYRO_CUPOLA_ROTUNDA), 5),
    ("pentagonal orthobirotunda", L(BIROTUNDA), 5),
    ("elongated triangular orthobicupola", Rd(R::ElongatedOrthoBicupola), 3),
    ("elongated triangular gyrobicupola", Rd(R::ElongatedGyroBicupola), 3),
    ("elongated square gyrobicupola", Rd(R::ElongatedGyroBicupola), 4),
    ("elongated pentagonal orthobicupola", Rd(R::ElongatedOrthoBicupola), 5),
    ("elongated pentagonal gyrobicupola", Rd(R::ElongatedGyroBicupola), 5),
    (
        "elongated pentagonal orthocupolarotunda",
        L(Layout::new(C::Cupola, B::Prism, C::Rotunda, false)),
        5,
    ),
    (
        "elongated pentagonal gyrocupolarotunda",
        L(Layout::new(C::Cupola, B::Prism, C::Rotunda, true)),
        5,
    ),
    (
        "elongated pentagonal orthobirotunda",
        L(Layout::new(C::Rotunda, B::Prism, C::Rotunda, false)),
        5,
    ),
    (
        "elongated pentagonal gyrobirotunda",
        L(Layout::new(C::Rotunda, B::Prism, C::Rotunda, true)),
        5,
    ),
    ("gyroelongated triangular bicupola", Rd(R::GyroelongatedBicupola), 3),
    ("gyroelongated square bicupola", Rd(R::GyroelongatedBicupola), 4),
    ("gyroelongated pentagonal bicupola", Rd(R::GyroelongatedBicupola), 5),
    (
        "gyroelongated pentagonal cupolarotunda",
        L(Layout::new(C::Cupola, B::Antiprism, C::Rotunda, false)),
        5,
    ),
    ("gyroelongated pentagonal birotunda", Rd(R::GyroelongatedBirotunda), 5),
];

/// Names of J1–J48 in order.
pub fn names() -> impl Iterator<Item = &'static str> {
    SOLIDS.iter().map(|(name, _, _)| *name)
}

/// 1-based Johnson number for `name`, if it is known.
pub fn lookup(name: &str) -> Option<usize> {
    let key = normalize(name);
    let digits = key.strip_prefix('j').unwrap_or(&key);
    if let Ok(number) = digits.parse::<usize>() {
        return (1..=SOLIDS.len()).contains(&number).then_some(number);
    }
    SOLIDS
        .iter()
        .position(|(candidate, _, _)| normalize(candidate) == key)
        .map(|i| i + 1)
}

/// Builds a Johnson solid with unit edges.
///
/// # Errors
///
/// `UnrecognizedTypeName` when `name` is neither a known number nor name.
pub fn build(name: &str) -> PolyResult<PolyMesh> {
    let number = lookup(name).ok_or_else(|| PolyError::unrecognized("johnson", name))?;
    let (_, source, sides) = &SOLIDS[number - 1];
    let layout = match source {
        Source::Radial(kind) => kind.layout(),
        Source::Layout(layout) => *layout,
    };
    build_layout(layout, *sides)
}
