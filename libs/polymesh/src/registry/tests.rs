//! # Registry Tests

use super::*;

#[test]
fn test_lookup_is_case_insensitive() {
    assert_eq!("KIS".parse::<Operator>().unwrap(), Operator::Kis);
    assert_eq!("join_kis_kis".parse::<Operator>().unwrap(), Operator::JoinKisKis);
    assert_eq!("face remove x".parse::<Operator>().unwrap(), Operator::FaceRemoveX);
}

#[test]
fn test_unknown_name_is_error() {
    let err = "Ribbon".parse::<Operator>().unwrap_err();
    assert_eq!(err, PolyError::unknown_operator("Ribbon"));
    assert!(config_by_name("PolarOffset").is_err());
}

#[test]
fn test_display_round_trips_every_operator() {
    for &op in Operator::ALL {
        assert_eq!(op.to_string().parse::<Operator>().unwrap(), op);
    }
}

#[test]
fn test_table_is_indexed_by_discriminant() {
    for (i, &op) in Operator::ALL.iter().enumerate() {
        assert_eq!(op as usize, i);
    }
}

/// Operators with no overrides beyond flags keep the baseline ranges.
#[test]
fn test_defaults_for_flag_only_entries() {
    let tag = Operator::TagFaces.config();
    assert!(tag.uses_amount);
    assert_eq!(tag.amount_min, -20.0);
    assert_eq!(tag.amount_safe_max, 0.999);
    assert!(!tag.uses_amount2);
    assert!(tag.matrix.is_none());
    assert_eq!(tag.face_selection, FaceSelection::All);
}

#[test]
fn test_selected_entries() {
    let bevel = Operator::Bevel.config();
    assert!(bevel.uses_amount2);
    assert_eq!(bevel.amount2_safe_max, 0.4999);
    assert!(bevel.uses_randomize);

    let stack = Operator::Stack.config();
    assert_eq!(stack.amount2_default, 0.8);

    assert!(!Operator::Dual.config().uses_amount);
    assert!(Operator::Truncate.config().uses_faces);
}

#[test]
fn test_conway_operators_carry_matrices() {
    for &op in Operator::ALL {
        let has_matrix = op.config().matrix.is_some();
        assert_eq!(has_matrix, op.kind() == OperatorKind::Conway, "{op}");
    }
}

#[test]
fn test_predict_cube_kis() {
    let counts = predict_from(Vef::new(8, 12, 6), Operator::Kis).unwrap().unwrap();
    assert_eq!(counts, Vef::new(14, 36, 24));
}

#[test]
fn test_predict_dual_swaps() {
    let counts = predict_from(Vef::new(8, 12, 6), Operator::Dual).unwrap().unwrap();
    assert_eq!(counts, Vef::new(6, 12, 8));
}

#[test]
fn test_predict_none_without_matrix() {
    assert_eq!(predict_from(Vef::new(8, 12, 6), Operator::Extrude).unwrap(), None);
}

#[test]
fn test_predict_overflow() {
    let huge = Vef::new(usize::MAX, usize::MAX, usize::MAX);
    let err = predict_from(huge, Operator::Cross).unwrap_err();
    assert_eq!(
        err,
        PolyError::NumericOverflow {
            operator: Operator::Cross
        }
    );
}

#[test]
fn test_clamp_amounts() {
    let trunc = Operator::Truncate.config();
    assert_eq!(trunc.clamp_amount(0.9, true), 0.499);
    assert_eq!(trunc.clamp_amount(0.9, false), 0.9);
    assert_eq!(trunc.clamp_amount(-100.0, false), -6.0);
}

#[test]
fn test_clamp_segment_amount2_ranges() {
    let seg = Operator::Segment.config();
    assert_eq!(seg.clamp_amount2(2.0, false), 2.0);
    assert_eq!(seg.clamp_amount2(5.0, false), 3.0);
    assert_eq!(seg.clamp_amount2(-5.0, false), -3.0);
}

/// Clamping an operator's own default leaves it unchanged.
#[test]
fn test_defaults_survive_full_range_clamp() {
    for &op in Operator::ALL {
        let cfg = op.config();
        assert_eq!(cfg.clamp_amount(cfg.amount_default, false), cfg.amount_default, "{op}");
        assert_eq!(cfg.clamp_amount2(cfg.amount2_default, false), cfg.amount2_default, "{op}");
    }
    let rotate = Operator::FaceRotate.config();
    assert_eq!(rotate.clamp_amount(270.0, false), 180.0);
}
