//! # Recipe Tests

use super::*;
use crate::error::RecipeError;
use crate::generators::{GridShape, GridType};
use polymesh::{FaceSelection, PolyError};

fn cube_model() -> EditableModel {
    EditableModel::new(
        GeneratorSpec::Uniform {
            name: "cube".into(),
        },
        ColorMethod::ByTags,
    )
    .unwrap()
}

fn kis() -> RecipeStep {
    RecipeStep::Conway {
        operator: Operator::Kis,
        params: OpParams::default(),
    }
}

#[test]
fn test_apply_step_records_and_executes() {
    let mut model = cube_model();
    assert_eq!(model.generator_type(), GeneratorType::Uniform);
    model.apply_step(kis()).unwrap();
    model.apply_operator(Operator::Dual, OpParams::default()).unwrap();
    assert_eq!(model.operations().len(), 2);
    // Dual of the tetrakis hexahedron: the truncated octahedron.
    assert_eq!(model.poly_mesh().face_count(), 14);
    assert_eq!(model.poly_mesh().vertex_count(), 24);
}

#[test]
fn test_failed_step_leaves_model_unchanged() {
    let mut model = cube_model();
    model.apply_step(kis()).unwrap();
    let before = model.poly_mesh().clone();

    let untagged = RecipeStep::Conway {
        operator: Operator::TagFaces,
        params: OpParams::default(),
    };
    let err = model.apply_step(untagged).unwrap_err();
    assert!(matches!(
        err,
        RecipeError::Poly(PolyError::MissingParameter { name: "tag", .. })
    ));
    assert_eq!(model.operations().len(), 1);
    assert_eq!(model.poly_mesh(), &before);
}

#[test]
fn test_remove_last_operation_replays() {
    let mut model = cube_model();
    let base = model.poly_mesh().clone();
    model.apply_step(kis()).unwrap();
    model.apply_step(RecipeStep::Color { rgb: [1.0, 0.0, 0.0] }).unwrap();

    assert_eq!(model.remove_last_operation().unwrap(), Some(RecipeStep::Color { rgb: [1.0, 0.0, 0.0] }));
    assert_eq!(model.remove_last_operation().unwrap(), Some(kis()));
    assert_eq!(model.remove_last_operation().unwrap(), None);
    assert_eq!(model.poly_mesh(), &base);
}

/// Seeded random selections replay to the same mesh, bit for bit.
#[test]
fn test_regenerate_is_deterministic() {
    let mut model = cube_model();
    let random = OpParams::amount(0.4)
        .with_selection(FaceSelection::Random)
        .with_seed(7);
    model.apply_operator(Operator::Kis, random.clone()).unwrap();
    model.apply_operator(Operator::Truncate, OpParams::default()).unwrap();
    let first = model.poly_mesh().clone();

    model.regenerate().unwrap();
    assert_eq!(model.poly_mesh(), &first);

    let mut other = cube_model();
    other.apply_operator(Operator::Kis, random).unwrap();
    other.apply_operator(Operator::Truncate, OpParams::default()).unwrap();
    assert_eq!(other.poly_mesh(), &first);
}

#[test]
fn test_stash_survives_replay() {
    let mut model = cube_model();
    model.apply_operator(Operator::Stash, OpParams::default()).unwrap();
    model.apply_step(kis()).unwrap();
    model.apply_operator(Operator::Unstash, OpParams::default()).unwrap();
    assert_eq!(model.poly_mesh().face_count(), 24 + 6);

    let restored = EditableModel::from_json(&model.to_json().unwrap()).unwrap();
    assert_eq!(restored.poly_mesh(), model.poly_mesh());
}

#[test]
fn test_json_round_trip() {
    let mut model = EditableModel::new(
        GeneratorSpec::Grid {
            grid: GridType::K_3_6_3_6,
            shape: GridShape::Plane,
            x: 2,
            y: 2,
        },
        ColorMethod::BySides,
    )
    .unwrap();
    model
        .apply_operator(Operator::Extrude, OpParams::amount(0.25).with_selection(FaceSelection::ThreeSided))
        .unwrap();
    model.apply_step(RecipeStep::Color { rgb: [0.0, 0.5, 1.0] }).unwrap();

    let json = model.to_json().unwrap();
    assert!(json.contains("\"generator\": \"grid\""));
    assert!(json.contains("\"step\": \"color\""));

    let restored = EditableModel::from_json(&json).unwrap();
    assert_eq!(restored.recipe(), model.recipe());
    assert_eq!(restored.poly_mesh().vertices(), model.poly_mesh().vertices());
    assert_eq!(restored.color_method(), ColorMethod::BySides);
}

#[test]
fn test_minimal_json_uses_defaults() {
    let json = r#"{
        "generator": { "generator": "conway_string", "notation": "kC" },
        "operations": [{ "step": "conway", "operator": "Dual" }]
    }"#;
    let model = EditableModel::from_json(json).unwrap();
    assert_eq!(model.color_method(), ColorMethod::ByTags);
    assert_eq!(model.generator_type(), GeneratorType::ConwayString);
    assert_eq!(model.poly_mesh().face_count(), 14);
}

#[test]
fn test_json_errors() {
    assert!(matches!(
        EditableModel::from_json("{"),
        Err(RecipeError::Json(_))
    ));
    let unknown = r#"{ "generator": { "generator": "johnson", "name": "J99" } }"#;
    assert!(matches!(
        EditableModel::from_json(unknown),
        Err(RecipeError::Poly(PolyError::UnrecognizedTypeName { .. }))
    ));
}

#[test]
fn test_export_uses_color_steps() {
    let mut model = cube_model();
    model.apply_step(RecipeStep::Color { rgb: [0.0, 1.0, 0.0] }).unwrap();
    let render = model.export();
    assert_eq!(render.triangle_count(), 12);
    assert!(render.colors.iter().all(|c| *c == [0.0, 1.0, 0.0, 1.0]));

    model.set_color_method(ColorMethod::ByFaceDirection);
    assert_ne!(model.export().colors[0], [0.0, 1.0, 0.0, 1.0]);
}

#[test]
fn test_model_serializes_as_recipe() {
    let mut model = cube_model();
    model.apply_step(kis()).unwrap();
    let value = serde_json::to_value(&model).unwrap();
    assert_eq!(value, serde_json::to_value(model.recipe()).unwrap());

    let restored: EditableModel = serde_json::from_value(value).unwrap();
    assert_eq!(restored.poly_mesh(), model.poly_mesh());
}
