//! # Generator Tests

use super::*;
use approx::assert_relative_eq;
use polymesh::PolyError;

fn assert_solid(mesh: &PolyMesh, label: &str) {
    assert!(mesh.is_closed(), "{label} is not closed");
    assert_eq!(mesh.euler_characteristic(), 2, "{label} has the wrong Euler characteristic");
    let center = mesh.center();
    for f in 0..mesh.face_count() {
        assert!(
            mesh.face_normal(f).dot(mesh.face_centroid(f) - center) > 0.0,
            "{label}: face {f} points inward"
        );
    }
}

fn counts(mesh: &PolyMesh) -> (usize, usize) {
    (mesh.vertex_count(), mesh.face_count())
}

fn edge_lengths(mesh: &PolyMesh) -> Vec<f64> {
    let mut lengths = Vec::new();
    for face in mesh.faces() {
        for (i, &a) in face.iter().enumerate() {
            let b = face[(i + 1) % face.len()];
            lengths.push(mesh.vertices()[a].distance(mesh.vertices()[b]));
        }
    }
    lengths
}

// =============================================================================
// UNIFORM
// =============================================================================

#[test]
fn test_uniform_counts() {
    let expected = [
        ("tetrahedron", (4, 4)),
        ("cube", (8, 6)),
        ("octahedron", (6, 8)),
        ("icosahedron", (12, 20)),
        ("dodecahedron", (20, 12)),
        ("truncated tetrahedron", (12, 8)),
        ("cuboctahedron", (12, 14)),
        ("rhombicuboctahedron", (24, 26)),
        ("truncated cuboctahedron", (48, 26)),
        ("snub cube", (24, 38)),
        ("truncated icosahedron", (60, 32)),
        ("truncated icosidodecahedron", (120, 62)),
        ("snub dodecahedron", (60, 92)),
        ("pentagonal prism", (10, 7)),
        ("square antiprism", (8, 10)),
    ];
    for (name, vf) in expected {
        let mesh = uniform::build(name).unwrap();
        assert_eq!(counts(&mesh), vf, "{name}");
    }
}

#[test]
fn test_every_convex_uniform_is_a_closed_solid() {
    for name in uniform::names(UniformCategory::Convex) {
        let mesh = uniform::build(name).unwrap();
        assert_solid(&mesh, name);
        for p in mesh.vertices() {
            assert_relative_eq!(p.length(), 1.0, epsilon = 1e-9);
        }
    }
}

/// Wythoff symbols and spelling variants resolve to the same solids.
#[test]
fn test_uniform_lookup_spellings() {
    let by_name = uniform::build("Truncated_Cube").unwrap();
    let by_symbol = uniform::build("2 3 | 4").unwrap();
    assert_eq!(counts(&by_name), (24, 14));
    assert_eq!(counts(&by_symbol), (24, 14));
    // A symbol missing from the name table is still constructed.
    assert_eq!(counts(&uniform::build("2 7|2").unwrap()), (14, 9));
}

#[test]
fn test_uniform_errors() {
    assert!(matches!(
        uniform::build("banana"),
        Err(PolyError::UnrecognizedTypeName { kind: "uniform", .. })
    ));
    assert!(matches!(
        uniform::build("2 3|x"),
        Err(PolyError::UnrecognizedTypeName { .. })
    ));
    assert!(matches!(
        uniform::build("5/3|2 3"),
        Err(PolyError::UnrecognizedTypeName { .. })
    ));
    assert!(matches!(
        uniform::build("2 3|6"),
        Err(PolyError::DegenerateParameters { .. })
    ));
    assert!(matches!(
        uniform::build("1|2 3"),
        Err(PolyError::DegenerateParameters { .. })
    ));
}

#[test]
fn test_kepler_poinsot_solids() {
    let expected = [
        ("great dodecahedron", 12, 12, 5),
        ("small stellated dodecahedron", 12, 12, 5),
        ("great icosahedron", 12, 20, 3),
        ("great stellated dodecahedron", 20, 12, 5),
    ];
    for (name, v, f, sides) in expected {
        let mesh = uniform::build(name).unwrap();
        assert_eq!(counts(&mesh), (v, f), "{name}");
        assert_eq!(mesh.edge_count(), 30, "{name}");
        assert!(mesh.is_closed(), "{name}");
        assert!(mesh.faces().iter().all(|face| face.len() == sides));
        let lengths = edge_lengths(&mesh);
        for l in &lengths {
            assert_relative_eq!(*l, lengths[0], epsilon = 1e-9);
        }
    }
    assert_eq!(uniform::names(UniformCategory::KeplerPoinsot).len(), 4);
    assert_eq!(uniform::names(UniformCategory::Archimedean).len(), 13);
    assert_eq!(
        uniform::names(UniformCategory::All).len(),
        uniform::names(UniformCategory::Convex).len() + 4
    );
}

// =============================================================================
// RADIAL AND JOHNSON
// =============================================================================

#[test]
fn test_radial_families_are_closed_solids() {
    for &kind in RadialPolyType::ALL {
        for sides in [3, 4, 5, 7] {
            let mesh = radial::build(kind, sides).unwrap();
            assert_solid(&mesh, &format!("{kind} {sides}"));
        }
    }
}

#[test]
fn test_radial_counts() {
    let cases = [
        (RadialPolyType::Prism, 6, (12, 8)),
        (RadialPolyType::Antiprism, 5, (10, 12)),
        (RadialPolyType::Pyramid, 4, (5, 5)),
        (RadialPolyType::Dipyramid, 5, (7, 10)),
        (RadialPolyType::Cupola, 5, (15, 12)),
        (RadialPolyType::Rotunda, 5, (20, 17)),
        (RadialPolyType::GyroBicupola, 3, (12, 14)),
        (RadialPolyType::GyroelongatedBirotunda, 5, (40, 52)),
    ];
    for (kind, sides, vf) in cases {
        assert_eq!(counts(&radial::build(kind, sides).unwrap()), vf, "{kind}");
    }
}

/// The pentagonal rotunda and cupolae up to five sides have unit edges.
#[test]
fn test_regular_caps_have_unit_edges() {
    for (kind, sides) in [
        (RadialPolyType::Rotunda, 5),
        (RadialPolyType::Cupola, 3),
        (RadialPolyType::Cupola, 5),
        (RadialPolyType::GyroelongatedPyramid, 5),
        (RadialPolyType::ElongatedOrthoBicupola, 4),
    ] {
        let mesh = radial::build(kind, sides).unwrap();
        for l in edge_lengths(&mesh) {
            assert_relative_eq!(l, 1.0, epsilon = 1e-9);
        }
    }
}

#[test]
fn test_radial_needs_three_sides() {
    assert!(matches!(
        radial::build(RadialPolyType::Prism, 2),
        Err(PolyError::DegenerateParameters { .. })
    ));
}

#[test]
fn test_every_johnson_solid_is_closed() {
    for (i, name) in johnson::names().enumerate() {
        let mesh = johnson::build(name).unwrap();
        assert_solid(&mesh, name);
        assert_eq!(johnson::lookup(&format!("J{}", i + 1)), Some(i + 1));
    }
    assert_eq!(johnson::names().count(), 48);
}

#[test]
fn test_johnson_lookup() {
    let by_number = johnson::build("J27").unwrap();
    let by_name = johnson::build("Triangular Orthobicupola").unwrap();
    assert_eq!(counts(&by_number), (12, 14));
    assert_eq!(by_number.vertices(), by_name.vertices());
    // Gyrobifastigium: two triangular prisms joined at a square.
    assert_eq!(counts(&johnson::build("j26").unwrap()), (8, 8));
    assert!(matches!(
        johnson::build("J49"),
        Err(PolyError::UnrecognizedTypeName { kind: "johnson", .. })
    ));
}

// =============================================================================
// WATERMAN
// =============================================================================

#[test]
fn test_waterman_solids() {
    for c in 0..5 {
        for root in 4..7 {
            let mesh = waterman::build(root, c).unwrap();
            assert_solid(&mesh, &format!("waterman {root} c{c}"));
            let radius = mesh
                .vertices()
                .iter()
                .map(|p| p.length())
                .fold(0.0, f64::max);
            assert_relative_eq!(radius, 1.0, epsilon = 1e-12);
        }
    }
}

#[test]
fn test_waterman_errors() {
    assert!(matches!(
        waterman::build(0, 0),
        Err(PolyError::DegenerateParameters { .. })
    ));
    assert!(matches!(
        waterman::build(5, 5),
        Err(PolyError::UnrecognizedTypeName { .. })
    ));
}

// =============================================================================
// GRID
// =============================================================================

#[test]
fn test_every_tiling_builds_flat_and_facing_up() {
    for &grid in GridType::ALL {
        let mesh = grid::build(grid, GridShape::Plane, 3, 3).unwrap();
        assert!(mesh.face_count() >= 9, "{grid}");
        for f in 0..mesh.face_count() {
            let n = mesh.face_normal(f);
            assert_relative_eq!(n.y, 1.0, epsilon = 1e-9);
        }
        for l in edge_lengths(&mesh) {
            assert_relative_eq!(l, 1.0, epsilon = 1e-9);
        }
    }
}

#[test]
fn test_square_grid_shapes() {
    let sphere = grid::build(GridType::K_4_4_4_4, GridShape::Sphere, 8, 4).unwrap();
    assert_eq!(counts(&sphere), (26, 32));
    assert_solid(&sphere, "square sphere");

    let cylinder = grid::build(GridType::K_4_4_4_4, GridShape::Cylinder, 8, 2).unwrap();
    assert_eq!(counts(&cylinder), (24, 16));
    assert_eq!(cylinder.euler_characteristic(), 0);

    let torus = grid::build(GridType::K_4_4_4_4, GridShape::Torus, 8, 6).unwrap();
    assert_eq!(counts(&torus), (48, 48));
    assert!(torus.is_closed());
    assert_eq!(torus.euler_characteristic(), 0);
}

/// At one cell each way, every shape either builds a sound mesh or reports
/// the collapse.
#[test]
fn test_every_grid_shape_at_minimum_size() {
    for &grid in GridType::ALL {
        for &shape in GridShape::ALL {
            match grid::build(grid, shape, 1, 1) {
                Ok(mesh) => {
                    assert!(mesh.face_count() > 0, "{grid} {shape}");
                    for face in mesh.faces() {
                        let mut corners = face.clone();
                        corners.sort_unstable();
                        corners.dedup();
                        assert_eq!(corners.len(), face.len(), "{grid} {shape}");
                    }
                    if shape == GridShape::Torus {
                        assert!(mesh.is_closed(), "{grid} {shape}");
                        assert_eq!(mesh.euler_characteristic(), 0, "{grid} {shape}");
                    }
                }
                Err(err) => {
                    assert!(matches!(err, PolyError::DegenerateParameters { .. }), "{grid} {shape}: {err}");
                }
            }
        }
        assert!(grid::build(grid, GridShape::Plane, 1, 1).is_ok(), "{grid}");
    }
}

#[test]
fn test_collapsed_wraps_are_rejected() {
    for (grid, shape) in [
        (GridType::K_4_4_4_4, GridShape::Cylinder),
        (GridType::K_3_3_3_4_4, GridShape::Torus),
        (GridType::K_4_6_12, GridShape::Torus),
        (GridType::K_6_6_6, GridShape::Sphere),
    ] {
        assert!(
            matches!(grid::build(grid, shape, 1, 1), Err(PolyError::DegenerateParameters { .. })),
            "{grid} {shape}"
        );
    }
}

/// Row tilings close into a torus once the row count realigns the rows.
#[test]
fn test_row_tilings_close_into_tori() {
    let hex = grid::build(GridType::K_6_6_6, GridShape::Torus, 2, 2).unwrap();
    assert_eq!(hex.counts(), polymesh::Vef::new(8, 12, 4));
    assert!(hex.is_closed());

    let big = grid::build(GridType::K_4_6_12, GridShape::Torus, 1, 2).unwrap();
    assert_eq!(big.counts(), polymesh::Vef::new(24, 36, 12));
    assert_eq!(big.euler_characteristic(), 0);

    assert!(grid::build(GridType::K_6_6_6, GridShape::Torus, 2, 3).is_err());
    assert!(grid::build(GridType::K_3_4_6_4, GridShape::Torus, 4, 4).is_err());
}

#[test]
fn test_grid_names_and_errors() {
    assert_eq!(GridType::parse("3,12,12").unwrap(), GridType::K_3_12_12);
    assert_eq!(GridType::parse("K_4_6_12").unwrap(), GridType::K_4_6_12);
    assert_eq!("torus".parse::<GridShape>().unwrap(), GridShape::Torus);
    assert_eq!(GridShape::default(), GridShape::Plane);
    assert!(matches!(
        grid::build(GridType::K_6_6_6, GridShape::Plane, 0, 3),
        Err(PolyError::DegenerateParameters { .. })
    ));
}

// =============================================================================
// VARIOUS AND SHAPES
// =============================================================================

#[test]
fn test_box_counts() {
    let unit = various::build(VariousSolidType::Box, 1, 1, 1).unwrap();
    assert_eq!(unit.counts(), polymesh::Vef::new(8, 12, 6));
    assert_solid(&unit, "unit box");

    let segmented = various::build(VariousSolidType::Box, 2, 3, 4).unwrap();
    assert_eq!(counts(&segmented), (54, 52));
    assert_solid(&segmented, "segmented box");
}

#[test]
fn test_uv_spheres() {
    let sphere = various::build(VariousSolidType::UvSphere, 6, 3, 0).unwrap();
    assert_eq!(counts(&sphere), (14, 18));
    assert_solid(&sphere, "uv sphere");

    let dome = various::build(VariousSolidType::UvHemisphere, 6, 3, 0).unwrap();
    assert_eq!(counts(&dome), (19, 19));
    assert_solid(&dome, "uv hemisphere");

    assert!(matches!(
        various::build(VariousSolidType::UvSphere, 2, 3, 0),
        Err(PolyError::DegenerateParameters { .. })
    ));
    assert!(matches!(
        various::build(VariousSolidType::Box, 1, 0, 1),
        Err(PolyError::DegenerateParameters { .. })
    ));
}

#[test]
fn test_flat_shapes() {
    let hexagon = shapes::build(ShapeType::Polygon, 6).unwrap();
    assert_eq!(counts(&hexagon), (6, 1));
    assert_relative_eq!(hexagon.face_normal(0).y, 1.0, epsilon = 1e-12);
    for l in edge_lengths(&hexagon) {
        assert_relative_eq!(l, 1.0, epsilon = 1e-12);
    }

    let ell = shapes::build(ShapeType::LShape, 0).unwrap();
    assert_eq!(counts(&ell), (6, 1));
    assert_relative_eq!(ell.face_area(0), 5.0 / 9.0, epsilon = 1e-12);
    assert!(ell.face_normal(0).y > 0.0);

    let h = shapes::build("h shape".parse().unwrap(), 0).unwrap();
    assert_eq!(h.face(0).len(), 12);

    assert!(matches!(
        shapes::build(ShapeType::Polygon, 2),
        Err(PolyError::DegenerateParameters { .. })
    ));
}

// =============================================================================
// NOTATION AND DISPATCH
// =============================================================================

#[test]
fn test_conway_notation() {
    let dual = notation::build("dC").unwrap();
    assert_eq!(counts(&dual), (6, 8));

    let prism = notation::build("P5").unwrap();
    assert_eq!(counts(&prism), (10, 7));

    let ambo_kis = notation::build("a kT").unwrap();
    let expected = polymesh::predict_counts(&notation::build("kT").unwrap(), polymesh::Operator::Ambo)
        .unwrap()
        .unwrap();
    assert_eq!(ambo_kis.counts(), expected);
}

#[test]
fn test_conway_notation_errors() {
    assert!(matches!(
        notation::build("fC"),
        Err(PolyError::UnrecognizedTypeName { kind: "conway operator", .. })
    ));
    assert!(matches!(
        notation::build("kQ"),
        Err(PolyError::UnrecognizedTypeName { kind: "conway seed", .. })
    ));
    assert!(matches!(
        notation::build(""),
        Err(PolyError::UnrecognizedTypeName { .. })
    ));
    assert!(matches!(
        notation::build("tA"),
        Err(PolyError::DegenerateParameters { .. })
    ));
    assert!(matches!(
        notation::build("Y2"),
        Err(PolyError::DegenerateParameters { .. })
    ));
}

#[test]
fn test_build_dispatch() {
    let spec = GeneratorSpec::Various {
        kind: VariousSolidType::Box,
        x: 1,
        y: 1,
        z: 1,
    };
    assert_eq!(spec.generator_type(), GeneratorType::Various);
    assert_eq!(counts(&build(&spec).unwrap()), (8, 6));

    let raw = GeneratorSpec::GeometryData {
        vertices: vec![DVec3::ZERO, DVec3::X, DVec3::NEG_Z],
        faces: vec![vec![0, 1, 2]],
    };
    assert_eq!(counts(&build(&raw).unwrap()), (3, 1));

    let broken = GeneratorSpec::GeometryData {
        vertices: vec![DVec3::ZERO],
        faces: vec![vec![0, 1, 2]],
    };
    assert!(matches!(build(&broken), Err(PolyError::InvalidMesh { .. })));
}

#[test]
fn test_generator_spec_json() {
    let spec = GeneratorSpec::Grid {
        grid: GridType::K_4_8_8,
        shape: GridShape::Cylinder,
        x: 3,
        y: 2,
    };
    let json = serde_json::to_string(&spec).unwrap();
    assert!(json.contains("\"generator\":\"grid\""));
    assert_eq!(serde_json::from_str::<GeneratorSpec>(&json).unwrap(), spec);
}

#[test]
fn test_welded_mesh_collapses_repeats() {
    let mut mesh = WeldedMesh::default();
    mesh.face([DVec3::ZERO, DVec3::X, DVec3::X, DVec3::NEG_Z, DVec3::ZERO]);
    mesh.face([DVec3::ZERO, DVec3::ZERO, DVec3::X]);
    let built = mesh.build().unwrap();
    assert_eq!(counts(&built), (3, 1));
    assert_eq!(built.face(0), &[0, 1, 2]);
}
