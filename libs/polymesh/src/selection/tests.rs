//! # Face Selection Tests

use super::*;

/// Square pyramid: one quad base facing down, four triangles.
fn pyramid() -> PolyMesh {
    PolyMesh::new(
        vec![
            DVec3::new(-1.0, 0.0, -1.0),
            DVec3::new(1.0, 0.0, -1.0),
            DVec3::new(1.0, 0.0, 1.0),
            DVec3::new(-1.0, 0.0, 1.0),
            DVec3::new(0.0, 1.0, 0.0),
        ],
        vec![
            vec![0, 1, 2, 3],
            vec![1, 0, 4],
            vec![2, 1, 4],
            vec![3, 2, 4],
            vec![0, 3, 4],
        ],
    )
    .unwrap()
}

#[test]
fn test_parse_selection_names() {
    assert_eq!("facing_up".parse::<FaceSelection>().unwrap(), FaceSelection::FacingUp);
    assert_eq!("NONE".parse::<FaceSelection>().unwrap(), FaceSelection::None);
    assert!(matches!(
        "sideways".parse::<FaceSelection>(),
        Err(PolyError::UnrecognizedTypeName { .. })
    ));
}

#[test]
fn test_side_count_masks() {
    let p = pyramid();
    assert_eq!(
        select_faces(&p, FaceSelection::ThreeSided, None),
        vec![false, true, true, true, true]
    );
    assert_eq!(
        select_faces(&p, FaceSelection::FourSided, None),
        vec![true, false, false, false, false]
    );
    assert_eq!(
        select_faces(&p, FaceSelection::PSided, None),
        select_faces(&p, FaceSelection::ThreeSided, None)
    );
    assert_eq!(
        select_faces(&p, FaceSelection::QSided, None),
        select_faces(&p, FaceSelection::EvenSided, None)
    );
}

#[test]
fn test_direction_masks() {
    let p = pyramid();
    assert_eq!(
        select_faces(&p, FaceSelection::FacingStraightDown, None),
        vec![true, false, false, false, false]
    );
    let up = select_faces(&p, FaceSelection::FacingUp, None);
    assert_eq!(up, vec![false, true, true, true, true]);
    assert!(select_faces(&p, FaceSelection::FacingOut, None).iter().all(|&s| s));
}

#[test]
fn test_index_masks() {
    let p = pyramid();
    assert_eq!(
        select_faces(&p, FaceSelection::Even, None),
        vec![true, false, true, false, true]
    );
    assert_eq!(
        select_faces(&p, FaceSelection::OnlyLast, None),
        vec![false, false, false, false, true]
    );
    assert_eq!(
        select_faces(&p, FaceSelection::ExceptFirst, None),
        vec![false, true, true, true, true]
    );
}

#[test]
fn test_role_masks() {
    let mut p = pyramid();
    assert!(select_faces(&p, FaceSelection::Existing, None).iter().all(|&s| s));
    p.set_all_roles(Roles::NewAlt);
    assert!(select_faces(&p, FaceSelection::AllNew, None).iter().all(|&s| s));
    assert!(!select_faces(&p, FaceSelection::New, None).iter().any(|&s| s));
}

#[test]
fn test_area_masks() {
    let p = pyramid();
    // The base (area 4) is larger than the mean.
    assert_eq!(select_faces(&p, FaceSelection::Larger, None)[0], true);
    assert_eq!(select_faces(&p, FaceSelection::Smaller, None)[0], false);
}

#[test]
fn test_random_is_seeded() {
    let p = pyramid();
    let a = select_faces(&p, FaceSelection::Random, Some(7));
    let b = select_faces(&p, FaceSelection::Random, Some(7));
    assert_eq!(a, b);
    assert_eq!(a.len(), 5);
}

#[test]
fn test_vertex_masks_use_valence() {
    let p = pyramid();
    let apex = select_vertices(&p, FaceSelection::FourSided, None);
    assert_eq!(apex, vec![false, false, false, false, true]);
    let top = select_vertices(&p, FaceSelection::TopHalf, None);
    assert_eq!(top, vec![false, false, false, false, true]);
}

#[test]
fn test_inner_outer_on_open_mesh() {
    let p = pyramid();
    let mut keep = vec![true; 5];
    keep[0] = false;
    let open = p.retain_faces(&keep);
    assert!(select_faces(&open, FaceSelection::Outer, None).iter().all(|&s| s));
    assert!(select_vertices(&open, FaceSelection::Inner, None)[4]);
}
