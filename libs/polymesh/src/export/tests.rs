//! # Export Tests

use super::*;
use crate::mesh::color_tag;
use approx::assert_relative_eq;
use std::collections::BTreeSet;

fn up_face(points: &[(f64, f64)]) -> PolyMesh {
    let vertices = points.iter().map(|&(x, z)| DVec3::new(x, 0.0, z)).collect();
    PolyMesh::new(vertices, vec![(0..points.len()).collect()]).unwrap()
}

fn l_shape() -> PolyMesh {
    up_face(&[
        (0.0, 0.0),
        (2.0, 0.0),
        (2.0, -1.0),
        (1.0, -1.0),
        (1.0, -2.0),
        (0.0, -2.0),
    ])
}

fn cube() -> PolyMesh {
    let mut vertices = Vec::new();
    for (x, y, z) in [
        (-1.0, -1.0, -1.0),
        (1.0, -1.0, -1.0),
        (1.0, 1.0, -1.0),
        (-1.0, 1.0, -1.0),
        (-1.0, -1.0, 1.0),
        (1.0, -1.0, 1.0),
        (1.0, 1.0, 1.0),
        (-1.0, 1.0, 1.0),
    ] {
        vertices.push(DVec3::new(x, y, z));
    }
    PolyMesh::new(
        vertices,
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

fn triangle_normal(render: &RenderMesh, t: usize) -> DVec3 {
    let p = |i: u32| {
        let [x, y, z] = render.positions[i as usize];
        DVec3::new(f64::from(x), f64::from(y), f64::from(z))
    };
    let [a, b, c] = render.triangles[t];
    (p(b) - p(a)).cross(p(c) - p(a))
}

/// The reflex corner of an L forces ear clipping; every triangle keeps the
/// face orientation and the areas add up.
#[test]
fn test_ear_clipping_l_shape() {
    let render = export(&l_shape(), ColorMethod::ByTags);
    assert_eq!(render.triangle_count(), 4);
    let mut area = 0.0;
    for t in 0..render.triangle_count() {
        let n = triangle_normal(&render, t);
        assert!(n.y > 0.0, "triangle {t} is flipped or empty");
        area += n.length() * 0.5;
    }
    assert_relative_eq!(area, 3.0, epsilon = 1e-6);
}

#[test]
fn test_convex_faces_fan_from_first_corner() {
    let hexagon: Vec<(f64, f64)> = (0..6)
        .map(|i| {
            let a = std::f64::consts::TAU * i as f64 / 6.0;
            (a.cos(), -a.sin())
        })
        .collect();
    let points: Vec<DVec3> = hexagon.iter().map(|&(x, z)| DVec3::new(x, 0.0, z)).collect();
    let triangles = triangulate_loop(&points, DVec3::Y);
    assert_eq!(triangles.len(), 4);
    assert!(triangles.iter().all(|t| t[0] == 0));
}

#[test]
fn test_self_intersecting_loop_still_covers() {
    let bowtie = [
        DVec3::new(0.0, 0.0, 0.0),
        DVec3::new(1.0, 0.0, -1.0),
        DVec3::new(1.0, 0.0, 0.0),
        DVec3::new(0.0, 0.0, -1.0),
    ];
    assert_eq!(triangulate_loop(&bowtie, DVec3::Y).len(), 2);
    assert!(triangulate_loop(&bowtie[..2], DVec3::Y).is_empty());
}

#[test]
fn test_export_cube_buffers() {
    let render = export(&cube(), ColorMethod::BySides);
    assert_eq!(render.vertex_count(), 24);
    assert_eq!(render.triangle_count(), 12);
    assert_eq!(render.normals.len(), 24);
    assert_eq!(render.colors.len(), 24);
    assert_eq!(render.face_tags.len(), 6);
    assert_eq!(render.triangle_faces, vec![0, 0, 1, 1, 2, 2, 3, 3, 4, 4, 5, 5]);
    for t in 0..12 {
        let [x, y, z] = render.normals[render.triangles[t][0] as usize];
        let face_normal = DVec3::new(f64::from(x), f64::from(y), f64::from(z));
        assert!(triangle_normal(&render, t).dot(face_normal) > 0.0);
    }
    assert!(render.colors.iter().all(|&c| c == render.colors[0]));
}

#[test]
fn test_color_by_tags_and_default() {
    let mut mesh = cube();
    let red = color_tag([1.0, 0.0, 0.0]);
    let mut tags = vec![BTreeSet::new(); 6];
    tags[0].insert("label".to_string());
    tags[0].insert(red.clone());
    mesh.set_face_tags(tags).unwrap();

    let render = export(&mesh, ColorMethod::ByTags);
    assert_eq!(render.colors[0], [1.0, 0.0, 0.0, 1.0]);
    assert_eq!(render.colors[4], DEFAULT_COLOR);
    assert_eq!(render.face_tags[0], vec![red, "label".to_string()]);
}

#[test]
fn test_color_by_direction_and_role() {
    let render = export(&up_face(&[(0.0, 0.0), (1.0, 0.0), (0.0, -1.0)]), ColorMethod::ByFaceDirection);
    assert_eq!(render.colors[0], [0.5, 1.0, 0.5, 1.0]);

    let mut mesh = cube();
    mesh.set_all_roles(Roles::New);
    let render = export(&mesh, ColorMethod::ByRole);
    assert_eq!(render.colors[0], role_color(Roles::New));
    assert_ne!(role_color(Roles::New), role_color(Roles::Existing));
}
