//! # PolyMesh Tests

use super::*;
use approx::assert_relative_eq;

/// Unit cube centered at the origin, faces wound outward.
fn cube() -> PolyMesh {
    let v = vec![
        DVec3::new(-0.5, -0.5, -0.5),
        DVec3::new(0.5, -0.5, -0.5),
        DVec3::new(0.5, 0.5, -0.5),
        DVec3::new(-0.5, 0.5, -0.5),
        DVec3::new(-0.5, -0.5, 0.5),
        DVec3::new(0.5, -0.5, 0.5),
        DVec3::new(0.5, 0.5, 0.5),
        DVec3::new(-0.5, 0.5, 0.5),
    ];
    let f = vec![
        vec![0, 3, 2, 1],
        vec![4, 5, 6, 7],
        vec![0, 1, 5, 4],
        vec![2, 3, 7, 6],
        vec![1, 2, 6, 5],
        vec![0, 4, 7, 3],
    ];
    PolyMesh::new(v, f).unwrap()
}

fn open_square() -> PolyMesh {
    PolyMesh::new(
        vec![
            DVec3::new(0.0, 0.0, 0.0),
            DVec3::new(1.0, 0.0, 0.0),
            DVec3::new(1.0, 0.0, -1.0),
            DVec3::new(0.0, 0.0, -1.0),
        ],
        vec![vec![0, 1, 2, 3]],
    )
    .unwrap()
}

// =============================================================================
// CONSTRUCTION
// =============================================================================

#[test]
fn test_new_rejects_small_face() {
    let err = PolyMesh::new(vec![DVec3::ZERO, DVec3::X], vec![vec![0, 1]]).unwrap_err();
    assert!(matches!(err, PolyError::InvalidMesh { .. }));
}

#[test]
fn test_new_rejects_out_of_range_index() {
    let err = PolyMesh::new(vec![DVec3::ZERO, DVec3::X, DVec3::Y], vec![vec![0, 1, 7]]).unwrap_err();
    assert!(matches!(err, PolyError::InvalidMesh { .. }));
}

#[test]
fn test_from_parts_checks_attribute_lengths() {
    let err = PolyMesh::from_parts(
        vec![DVec3::ZERO, DVec3::X, DVec3::Y],
        vec![vec![0, 1, 2]],
        vec![],
        vec![Roles::Existing; 3],
        vec![BTreeSet::new()],
    )
    .unwrap_err();
    assert!(matches!(err, PolyError::InvalidMesh { .. }));
}

/// JSON goes through the same validation as [`PolyMesh::new`].
#[test]
fn test_deserialize_rejects_out_of_range_index() {
    let json = r#"{ "vertices": [[0, 0, 0], [1, 0, 0], [0, 0, -1]], "faces": [[0, 1, 7]] }"#;
    let err = serde_json::from_str::<PolyMesh>(json).unwrap_err();
    assert!(err.to_string().contains("references vertex 7"), "{err}");

    let short = r#"{ "vertices": [[0, 0, 0], [1, 0, 0]], "faces": [[0, 1]] }"#;
    assert!(serde_json::from_str::<PolyMesh>(short).is_err());
}

#[test]
fn test_deserialize_defaults_roles_and_tags() {
    let json = r#"{ "vertices": [[0, 0, 0], [1, 0, 0], [0, 0, -1]], "faces": [[0, 1, 2]] }"#;
    let tri = serde_json::from_str::<PolyMesh>(json).unwrap();
    assert_eq!(tri.face_roles(), &[Roles::Existing]);
    assert!(tri.face_tags()[0].is_empty());

    let mut c = cube();
    c.init_tags([0.0, 0.0, 1.0]);
    let back: PolyMesh = serde_json::from_str(&serde_json::to_string(&c).unwrap()).unwrap();
    assert_eq!(back, c);
}

#[test]
fn test_cube_counts_and_euler() {
    let c = cube();
    assert_eq!(c.counts(), Vef::new(8, 12, 6));
    assert_eq!(c.euler_characteristic(), 2);
    assert!(c.is_closed());
}

// =============================================================================
// GEOMETRY
// =============================================================================

#[test]
fn test_cube_normals_point_outward() {
    let c = cube();
    for f in 0..c.face_count() {
        let n = c.face_normal(f);
        let centroid = c.face_centroid(f);
        assert!(n.dot(centroid) > 0.0, "face {f} points inward");
        assert_relative_eq!(c.face_area(f), 1.0, epsilon = 1e-12);
    }
}

#[test]
fn test_square_facing_up() {
    let s = open_square();
    assert_relative_eq!(s.face_normal(0).y, 1.0, epsilon = 1e-12);
    assert!(!s.is_closed());
}

#[test]
fn test_bounding_box_and_center() {
    let c = cube();
    let (lo, hi) = c.bounding_box().unwrap();
    assert_eq!(lo, DVec3::splat(-0.5));
    assert_eq!(hi, DVec3::splat(0.5));
    assert_relative_eq!(c.center().length(), 0.0, epsilon = 1e-12);
}

#[test]
fn test_vertex_normals_are_unit() {
    let c = cube();
    for n in c.vertex_normals() {
        assert_relative_eq!(n.length(), 1.0, epsilon = 1e-12);
    }
}

// =============================================================================
// TOPOLOGY
// =============================================================================

#[test]
fn test_closed_fan_has_valence_three() {
    let topo = cube().topology();
    for v in 0..8 {
        let fan = topo.vertex_fan(v);
        assert!(fan.closed);
        assert_eq!(fan.half_edges.len(), 3);
    }
}

#[test]
fn test_fan_faces_wind_counter_clockwise() {
    // Dual vertex order must agree with the outward normal at the vertex.
    let c = cube();
    let topo = c.topology();
    let fan = topo.vertex_fan(6);
    let centers: Vec<DVec3> = fan
        .half_edges
        .iter()
        .map(|&h| c.face_centroid(topo.half_edge(h).face))
        .collect();
    let n = (centers[1] - centers[0]).cross(centers[2] - centers[0]);
    assert!(n.dot(c.vertices()[6]) > 0.0);
}

#[test]
fn test_open_fan_starts_at_boundary() {
    let topo = open_square().topology();
    let fan = topo.vertex_fan(0);
    assert!(!fan.closed);
    assert_eq!(fan.half_edges.len(), 1);
    assert_eq!(topo.neighbors(0), vec![1, 3]);
}

#[test]
fn test_boundary_loop_of_square() {
    let topo = open_square().topology();
    let loops = topo.boundary_loops();
    assert_eq!(loops, vec![vec![0, 1, 2, 3]]);
}

#[test]
fn test_edges_are_unique() {
    let topo = cube().topology();
    assert_eq!(topo.edges().len(), 12);
}

// =============================================================================
// EDITING
// =============================================================================

#[test]
fn test_retain_faces_drops_orphans() {
    let c = cube();
    let mut keep = vec![false; 6];
    keep[0] = true;
    let one = c.retain_faces(&keep);
    assert_eq!(one.counts(), Vef::new(4, 4, 1));
}

#[test]
fn test_append_offsets_indices() {
    let mut a = open_square();
    a.append(&open_square());
    assert_eq!(a.face(1), &[4, 5, 6, 7]);
    assert_eq!(a.vertex_count(), 8);
}

#[test]
fn test_flipped_reverses_normals() {
    let c = cube().flipped();
    assert!(c.face_normal(0).dot(c.face_centroid(0)) < 0.0);
}

#[test]
fn test_merge_coplanar_restores_square() {
    let tri = PolyMesh::new(
        open_square().vertices().to_vec(),
        vec![vec![0, 1, 2], vec![0, 2, 3]],
    )
    .unwrap();
    let merged = tri.merge_coplanar_faces(1e-6);
    assert_eq!(merged.face_count(), 1);
    assert_eq!(merged.face(0).len(), 4);
}

#[test]
fn test_merge_coplanar_keeps_cube() {
    let merged = cube().merge_coplanar_faces(1e-6);
    assert_eq!(merged.counts(), Vef::new(8, 12, 6));
}

// =============================================================================
// TAGS
// =============================================================================

#[test]
fn test_init_tags_sets_color() {
    let mut c = cube();
    c.init_tags([1.0, 0.0, 0.0]);
    assert!(c.face_tags().iter().all(|t| t.contains("#FF0000")));
}

#[test]
fn test_color_tag_round_trip_is_close() {
    let rgb = parse_color_tag(&color_tag([0.2, 0.4, 0.6])).unwrap();
    assert_relative_eq!(rgb[1], 0.4, epsilon = 1.0 / 255.0);
    assert!(parse_color_tag("red").is_none());
}
