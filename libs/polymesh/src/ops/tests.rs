//! # Operator Executor Tests

use super::*;
use crate::hull::convex_hull;
use crate::mesh::{Roles, Vef};
use crate::registry::predict_counts;
use approx::assert_relative_eq;
use glam::DVec3;

/// Unit cube centered at the origin, faces wound outward.
fn cube() -> PolyMesh {
    PolyMesh::new(
        vec![
            DVec3::new(-0.5, -0.5, -0.5),
            DVec3::new(0.5, -0.5, -0.5),
            DVec3::new(0.5, 0.5, -0.5),
            DVec3::new(-0.5, 0.5, -0.5),
            DVec3::new(-0.5, -0.5, 0.5),
            DVec3::new(0.5, -0.5, 0.5),
            DVec3::new(0.5, 0.5, 0.5),
            DVec3::new(-0.5, 0.5, 0.5),
        ],
        vec![
            vec![0, 3, 2, 1],
            vec![4, 5, 6, 7],
            vec![0, 1, 5, 4],
            vec![2, 3, 7, 6],
            vec![1, 2, 6, 5],
            vec![0, 4, 7, 3],
        ],
    )
    .unwrap()
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

fn run(mesh: &PolyMesh, op: Operator) -> PolyMesh {
    apply(mesh, op, &OpParams::default()).unwrap()
}

fn assert_outward(mesh: &PolyMesh) {
    let center = mesh.center();
    for f in 0..mesh.face_count() {
        let n = mesh.face_normal(f);
        assert!(
            n.dot(mesh.face_centroid(f) - center) > -1e-9,
            "face {f} of {} points inward",
            mesh.face_count()
        );
    }
}

// =============================================================================
// CONWAY OPERATORS
// =============================================================================

fn cyclic(a: f64, b: f64) -> Vec<DVec3> {
    let mut out = Vec::with_capacity(12);
    for sa in [-1.0, 1.0] {
        for sb in [-1.0, 1.0] {
            let (x, y) = (a * sa, b * sb);
            out.extend([DVec3::new(0.0, x, y), DVec3::new(x, y, 0.0), DVec3::new(y, 0.0, x)]);
        }
    }
    out
}

/// The Platonic solids and a hexagonal prism, as hulls of their vertices.
fn bases() -> Vec<(&'static str, PolyMesh)> {
    let phi = (1.0 + 5.0_f64.sqrt()) / 2.0;
    let corners: Vec<DVec3> = (0..8)
        .map(|i| DVec3::new(bit(i, 0), bit(i, 1), bit(i, 2)))
        .collect();
    let mut dodeca = corners.clone();
    dodeca.extend(cyclic(1.0 / phi, phi));
    let prism: Vec<DVec3> = (0..12)
        .map(|i| {
            let a = (i % 6) as f64 * std::f64::consts::TAU / 6.0;
            DVec3::new(a.cos(), if i < 6 { -0.5 } else { 0.5 }, a.sin())
        })
        .collect();
    let octa = vec![DVec3::X, -DVec3::X, DVec3::Y, -DVec3::Y, DVec3::Z, -DVec3::Z];
    let tetra = vec![
        DVec3::new(1.0, 1.0, 1.0),
        DVec3::new(1.0, -1.0, -1.0),
        DVec3::new(-1.0, 1.0, -1.0),
        DVec3::new(-1.0, -1.0, 1.0),
    ];
    [
        ("tetrahedron", tetra),
        ("cube", corners),
        ("octahedron", octa),
        ("dodecahedron", dodeca),
        ("icosahedron", cyclic(1.0, phi)),
        ("hexagonal prism", prism),
    ]
    .into_iter()
    .map(|(name, points)| (name, convex_hull(&points).unwrap()))
    .collect()
}

fn bit(i: usize, k: usize) -> f64 {
    if (i >> k) & 1 == 1 {
        1.0
    } else {
        -1.0
    }
}

/// Every Conway operator matches its count matrix on each base at default
/// amounts.
#[test]
fn test_conway_count_law() {
    for (name, base) in bases() {
        assert_eq!(base.euler_characteristic(), 2, "{name}");
        for &op in Operator::ALL {
            if op.kind() != OperatorKind::Conway {
                continue;
            }
            let predicted = predict_counts(&base, op).unwrap().unwrap();
            let out = run(&base, op);
            assert_eq!(out.counts(), predicted, "{op} on {name}");
            assert!(out.is_closed(), "{op} left {name} open");
            assert_eq!(out.euler_characteristic(), 2, "{op} on {name}");
        }
    }
}

/// Exalt and Yank restrict both passes to the selected region.
#[test]
fn test_exalt_and_yank_honour_selection() {
    let octa = convex_hull(&[DVec3::X, -DVec3::X, DVec3::Y, -DVec3::Y, DVec3::Z, -DVec3::Z]).unwrap();
    let first = OpParams::default().with_selection(FaceSelection::OnlyFirst);
    for (op, expected) in [
        (Operator::Exalt, Vef::new(10, 24, 16)),
        (Operator::Yank, Vef::new(21, 33, 14)),
    ] {
        let out = apply(&octa, op, &first).unwrap();
        assert_eq!(out.counts(), expected, "{op}");
        assert!(out.is_closed(), "{op}");
        assert_ne!(out.counts(), run(&octa, op).counts(), "{op}");
    }
}

#[test]
fn test_conway_faces_stay_outward() {
    let cube = cube();
    for op in [
        Operator::Kis,
        Operator::Dual,
        Operator::Ambo,
        Operator::Truncate,
        Operator::Expand,
        Operator::Join,
        Operator::Chamfer,
        Operator::Loft,
        Operator::Ortho,
    ] {
        assert_outward(&run(&cube, op));
    }
}

#[test]
fn test_identity_preserves_mesh() {
    let mut cube = cube();
    cube.init_tags([1.0, 0.0, 0.0]);
    let out = run(&cube, Operator::Identity);
    assert_eq!(out, cube);
}

#[test]
fn test_dual_twice_restores_counts() {
    let cube = cube();
    let twice = run(&run(&cube, Operator::Dual), Operator::Dual);
    assert_eq!(twice.counts(), cube.counts());
}

#[test]
fn test_dual_rejects_open_mesh() {
    for op in [Operator::Dual, Operator::Snub, Operator::Volute, Operator::AddDual] {
        let err = apply(&open_square(), op, &OpParams::default()).unwrap_err();
        assert!(
            matches!(err, PolyError::InvalidOperatorForMesh { operator, .. } if operator == op),
            "{op}"
        );
    }
}

#[test]
fn test_kis_on_open_mesh() {
    let out = run(&open_square(), Operator::Kis);
    assert_eq!(out.counts(), Vef::new(5, 8, 4));
    assert!(!out.is_closed());
}

#[test]
fn test_truncate_at_safe_max() {
    let amount = Operator::Truncate.config().amount_safe_max;
    let out = apply(&cube(), Operator::Truncate, &OpParams::amount(amount)).unwrap();
    assert!(out.faces().iter().all(|f| f.len() >= 3));
    assert_eq!(out.counts(), Vef::new(24, 36, 14));
}

/// Truncating only the top vertices clips four corners.
#[test]
fn test_truncate_respects_vertex_selection() {
    let params = OpParams::default().with_selection(FaceSelection::TopHalf);
    let out = apply(&cube(), Operator::Truncate, &params).unwrap();
    assert_eq!(out.vertex_count(), 4 + 4 * 3);
    assert_eq!(out.face_count(), 6 + 4);
}

#[test]
fn test_kis_selection_passes_faces_through() {
    let params = OpParams::default().with_selection(FaceSelection::FacingUp);
    let out = apply(&cube(), Operator::Kis, &params).unwrap();
    assert_eq!(out.face_count(), 5 + 4);
    let ignored = out.face_roles().iter().filter(|&&r| r == Roles::Ignored).count();
    assert_eq!(ignored, 5);
}

#[test]
fn test_tags_follow_source_faces() {
    let mut cube = cube();
    cube.add_tag(&[true, false, false, false, false, false], "floor");
    let out = run(&cube, Operator::Kis);
    let tagged = out.face_tags().iter().filter(|t| t.contains("floor")).count();
    assert_eq!(tagged, 4);
}

#[test]
fn test_seeded_randomize_is_deterministic() {
    let params = OpParams::amount(0.5).with_seed(42);
    let a = apply(&cube(), Operator::Kis, &params).unwrap();
    let b = apply(&cube(), Operator::Kis, &params).unwrap();
    assert_eq!(a, b);
    let c = apply(&cube(), Operator::Kis, &OpParams::amount(0.5).with_seed(43)).unwrap();
    assert_ne!(a.vertices(), c.vertices());
}

#[test]
fn test_empty_selection_returns_input() {
    let params = OpParams::default().with_selection(FaceSelection::None);
    let cube = cube();
    for op in [Operator::Kis, Operator::Extrude, Operator::VertexFlex] {
        assert_eq!(apply(&cube, op, &params).unwrap(), cube, "{op}");
    }
}

#[test]
fn test_non_finite_amount_uses_default() {
    let nan = apply(&cube(), Operator::Kis, &OpParams::amount(f64::NAN)).unwrap();
    let default = run(&cube(), Operator::Kis);
    assert_eq!(nan, default);
}

/// Amounts far outside the full range are clamped before the operator runs.
#[test]
fn test_huge_amount_is_clamped() {
    let huge = OpParams::amount(1e9);
    // Eight divisions, the top of Medial's range.
    let medial = apply(&cube(), Operator::Medial, &huge).unwrap();
    assert_eq!(medial.counts(), Vef::new(110, 300, 192));
    let edge_medial = apply(&cube(), Operator::EdgeMedial, &huge).unwrap();
    assert_eq!(edge_medial.counts(), Vef::new(110, 324, 216));
    assert!(edge_medial.is_closed());

    let max = Operator::Kis.config().amount_max;
    let clamped = apply(&cube(), Operator::Kis, &huge).unwrap();
    let at_max = apply(&cube(), Operator::Kis, &OpParams::amount(max)).unwrap();
    assert_eq!(clamped, at_max);
}

// =============================================================================
// FACE OPERATORS
// =============================================================================

#[test]
fn test_tag_faces_requires_tag() {
    let err = apply(&cube(), Operator::TagFaces, &OpParams::default()).unwrap_err();
    assert_eq!(
        err,
        PolyError::MissingParameter {
            operator: Operator::TagFaces,
            name: "tag"
        }
    );
    let params = OpParams::default()
        .with_tag("roof")
        .with_selection(FaceSelection::FacingUp);
    let out = apply(&cube(), Operator::TagFaces, &params).unwrap();
    assert_eq!(out.face_tags().iter().filter(|t| t.contains("roof")).count(), 1);
}

#[test]
fn test_extrude_cube() {
    let out = run(&cube(), Operator::Extrude);
    assert_eq!(out.counts(), Vef::new(32, 60, 30));
    assert!(out.is_closed());
    assert_eq!(out.euler_characteristic(), 2);
}

#[test]
fn test_split_faces_and_gable_keep_closed() {
    let split = run(&cube(), Operator::SplitFaces);
    assert_eq!(split.face_count(), 12);
    assert!(split.faces().iter().all(|f| f.len() == 3));

    let gable = run(&cube(), Operator::Gable);
    assert!(gable.is_closed());
    assert_eq!(gable.euler_characteristic(), 2);
    assert_eq!(gable.face_count(), 24);
}

#[test]
fn test_face_remove_then_fill_holes() {
    let params = OpParams::default().with_selection(FaceSelection::FacingUp);
    let open = apply(&cube(), Operator::FaceRemove, &params).unwrap();
    assert_eq!(open.face_count(), 5);
    assert!(!open.is_closed());

    let filled = run(&open, Operator::FillHoles);
    assert_eq!(filled.face_count(), 6);
    assert!(filled.is_closed());
    assert_eq!(filled.face_roles()[5], Roles::New);
    assert_outward(&filled);
}

#[test]
fn test_face_keep_is_complement_of_remove() {
    let params = OpParams::default().with_selection(FaceSelection::Even);
    let kept = apply(&cube(), Operator::FaceKeep, &params).unwrap();
    let removed = apply(&cube(), Operator::FaceRemove, &params).unwrap();
    assert_eq!(kept.face_count() + removed.face_count(), 6);
}

#[test]
fn test_face_remove_by_axis() {
    // Removes faces whose centroid x maps into [0, 1]: the +X face and all
    // faces centred on x = 0.
    let params = OpParams::amount(0.0).with_amount2(1.0);
    let out = apply(&cube(), Operator::FaceRemoveX, &params).unwrap();
    assert_eq!(out.face_count(), 1);
}

#[test]
fn test_face_scale_detaches_faces() {
    let out = apply(&cube(), Operator::FaceScale, &OpParams::amount(-0.5)).unwrap();
    assert_eq!(out.vertex_count(), 24);
    assert_relative_eq!(out.face_area(0), 0.25, epsilon = 1e-12);
}

#[test]
fn test_face_rotate_keeps_centroid() {
    let out = apply(&cube(), Operator::FaceRotate, &OpParams::amount(30.0)).unwrap();
    for f in 0..6 {
        assert_relative_eq!(
            out.face_centroid(f).distance(cube().face_centroid(f)),
            0.0,
            epsilon = 1e-12
        );
    }
}

#[test]
fn test_shell_closes_open_surface() {
    let out = apply(&open_square(), Operator::Shell, &OpParams::amount(0.1)).unwrap();
    assert_eq!(out.counts(), Vef::new(8, 12, 6));
    assert!(out.is_closed());
}

#[test]
fn test_skeleton_on_cube_is_closed() {
    let out = run(&cube(), Operator::Skeleton);
    assert!(out.is_closed());
}

#[test]
fn test_extend_boundaries_adds_rim() {
    let out = run(&open_square(), Operator::ExtendBoundaries);
    assert_eq!(out.counts(), Vef::new(8, 12, 5));
}

/// Two cubes side by side join into one closed tube-like solid.
#[test]
fn test_connect_faces_bridges_facing_pair() {
    let mut pair = cube();
    pair.append(&cube().transformed(|p| p + DVec3::X * 2.0));
    let out = run(&pair, Operator::ConnectFaces);
    assert_eq!(out.face_count(), 12 - 2 + 4);
    assert!(out.is_closed());
    assert_eq!(out.euler_characteristic(), 2);
}

#[test]
fn test_face_merge_joins_selected_neighbours() {
    let split = run(&cube(), Operator::SplitFaces);
    let merged = run(&split, Operator::FaceMerge);
    assert_eq!(merged.face_count(), 6);
    assert!(merged.faces().iter().all(|f| f.len() == 4));
    let top = OpParams::default().with_selection(FaceSelection::FacingStraightUp);
    let partial = apply(&split, Operator::FaceMerge, &top).unwrap();
    assert_eq!(partial.face_count(), 11);
}

#[test]
fn test_layer_appends_copies() {
    let params = OpParams::amount(0.2).with_selection(FaceSelection::FacingUp);
    let out = apply(&cube(), Operator::Layer, &params).unwrap();
    assert_eq!(out.face_count(), 7);
    assert_eq!(out.vertex_count(), 12);
}

#[test]
fn test_stack_builds_rings() {
    let params = OpParams::amount(0.5)
        .with_amount2(0.5)
        .with_selection(FaceSelection::FacingUp);
    let out = apply(&cube(), Operator::Stack, &params).unwrap();
    // Ratio 0.5 gives rings at 0.5, 0.25 and 0.125 before dropping below 0.1.
    assert_eq!(out.vertex_count(), 8 + 3 * 4);
    assert_eq!(out.face_count(), 5 + 3 * 4 + 1);
    assert!(out.is_closed());
}

// =============================================================================
// VERTEX OPERATORS
// =============================================================================

#[test]
fn test_weld_merges_detached_faces() {
    let detached = apply(&cube(), Operator::FaceOffset, &OpParams::amount(0.0)).unwrap();
    assert_eq!(detached.vertex_count(), 24);
    let welded = run(&detached, Operator::Weld);
    assert_eq!(welded.counts(), cube().counts());
    assert!(welded.is_closed());
}

/// A zero weld distance still merges copies within the vertex merge tolerance.
#[test]
fn test_weld_at_zero_distance() {
    let detached = apply(&cube(), Operator::FaceOffset, &OpParams::amount(0.0)).unwrap();
    let nudge = |offset: f64| {
        let mut positions = detached.vertices().to_vec();
        positions[0].x += offset;
        detached.with_positions(positions)
    };
    let zero = OpParams::amount(0.0);
    let close = apply(&nudge(1e-9), Operator::Weld, &zero).unwrap();
    assert_eq!(close.counts(), cube().counts());
    let apart = apply(&nudge(1e-5), Operator::Weld, &zero).unwrap();
    assert_eq!(apart.vertex_count(), 9);
}

#[test]
fn test_vertex_remove_shrinks_faces() {
    let params = OpParams::default().with_selection(FaceSelection::OnlyFirst);
    let out = apply(&cube(), Operator::VertexRemove, &params).unwrap();
    assert_eq!(out.vertex_count(), 7);
    assert_eq!(out.faces().iter().filter(|f| f.len() == 3).count(), 3);

    let keep = apply(&cube(), Operator::VertexKeep, &params).unwrap();
    assert!(keep.is_empty());
}

#[test]
fn test_vertex_scale_moves_selection_only() {
    let params = OpParams::amount(1.0).with_selection(FaceSelection::TopHalf);
    let out = apply(&cube(), Operator::VertexScale, &params).unwrap();
    assert_relative_eq!(out.vertices()[0].y, -0.5);
    assert!(out.vertices()[2].y > 0.5);
}

// =============================================================================
// GEOMETRIC OPERATORS
// =============================================================================

#[test]
fn test_canonicalize_cube_to_unit_midsphere() {
    let out = run(&cube(), Operator::Canonicalize);
    for p in out.vertices() {
        assert_relative_eq!(p.length(), 1.5_f64.sqrt(), epsilon = 1e-6);
    }
}

#[test]
fn test_spherize_equalizes_radius() {
    let stretched = cube().transformed(|p| p * DVec3::new(1.0, 3.0, 1.0));
    let out = apply(&stretched, Operator::Spherize, &OpParams::amount(1.0)).unwrap();
    let center = out.center();
    let r0 = out.vertices()[0].distance(center);
    for p in out.vertices() {
        assert_relative_eq!(p.distance(center), r0, epsilon = 1e-9);
    }
}

/// Each vertex moves halfway to the mean radial distance from the Y axis.
#[test]
fn test_cylinderize_moves_each_vertex_in_place() {
    let source = apply(&cube(), Operator::Truncate, &OpParams::amount(0.3)).unwrap();
    let source = source.transformed(|p| p * DVec3::new(2.0, 1.0, 0.5));
    let out = apply(&source, Operator::Cylinderize, &OpParams::amount(0.5)).unwrap();

    let center = source.center();
    let radial = |p: DVec3| DVec3::new(p.x - center.x, 0.0, p.z - center.z);
    let mean = source.vertices().iter().map(|&p| radial(p).length()).sum::<f64>()
        / source.vertex_count() as f64;
    for (&p, &q) in source.vertices().iter().zip(out.vertices()) {
        let r = radial(p);
        let expected = p.lerp(p - r + r.normalize() * mean, 0.5);
        assert_relative_eq!(q.x, expected.x, epsilon = 1e-12);
        assert_relative_eq!(q.y, p.y, epsilon = 1e-12);
        assert_relative_eq!(q.z, expected.z, epsilon = 1e-12);
    }
}

#[test]
fn test_sit_level_rests_on_floor() {
    let out = apply(&cube(), Operator::SitLevel, &OpParams::amount(0.5)).unwrap();
    let floor = out.vertices().iter().map(|p| p.y).fold(f64::INFINITY, f64::min);
    assert_relative_eq!(floor, 0.0, epsilon = 1e-12);
    let face = (0.5 * 5.0_f64).floor() as usize;
    assert_relative_eq!(out.face_normal(face).y, -1.0, epsilon = 1e-9);
}

#[test]
fn test_recenter_and_stretch() {
    let moved = cube().transformed(|p| p + DVec3::splat(3.0));
    let out = run(&moved, Operator::Recenter);
    assert_relative_eq!(out.center().length(), 0.0, epsilon = 1e-12);
    let tall = apply(&cube(), Operator::Stretch, &OpParams::amount(2.0)).unwrap();
    let (lo, hi) = tall.bounding_box().unwrap();
    assert_relative_eq!(hi.y - lo.y, 2.0);
}

#[test]
fn test_convex_hull_of_kis_cube() {
    let spiky = apply(&cube(), Operator::Kis, &OpParams::amount(0.5)).unwrap();
    let hull = run(&spiky, Operator::ConvexHull);
    assert!(hull.is_closed());
    assert_eq!(hull.euler_characteristic(), 2);
    assert_eq!(hull.vertex_count(), 14);
}

// =============================================================================
// COMPOSITIONAL OPERATORS
// =============================================================================

#[test]
fn test_add_dual_appends() {
    let out = apply(&cube(), Operator::AddDual, &OpParams::amount(0.5)).unwrap();
    assert_eq!(out.vertex_count(), 8 + 6);
    assert_eq!(out.face_count(), 6 + 8);
}

#[test]
fn test_add_mirror_and_copy() {
    let mirrored = apply(&cube(), Operator::AddMirrorX, &OpParams::amount(1.0)).unwrap();
    assert_eq!(mirrored.face_count(), 12);
    let (lo, hi) = mirrored.bounding_box().unwrap();
    assert_relative_eq!(lo.x, -0.5);
    assert_relative_eq!(hi.x, 2.5);

    let copied = apply(&cube(), Operator::AddCopyY, &OpParams::amount(2.0)).unwrap();
    let (_, hi) = copied.bounding_box().unwrap();
    assert_relative_eq!(hi.y, 2.5);
}

#[test]
fn test_stash_and_unstash() {
    let mut ctx = OpContext::default();
    let cube = cube();
    let same = apply_with(&cube, Operator::Unstash, &OpParams::default(), &mut ctx).unwrap();
    assert_eq!(same, cube);

    let up = OpParams::default().with_selection(FaceSelection::FacingUp);
    let stashed = apply_with(&cube, Operator::Stash, &up, &mut ctx).unwrap();
    assert_eq!(stashed, cube);
    assert_eq!(ctx.stash().map(PolyMesh::face_count), Some(1));

    let out = apply_with(&cube, Operator::Unstash, &OpParams::amount(1.0), &mut ctx).unwrap();
    assert_eq!(out.face_count(), 7);

    let placed = apply_with(&cube, Operator::UnstashToFaces, &OpParams::default(), &mut ctx)
        .unwrap();
    assert_eq!(placed.face_count(), 12);
}
