//! # Tests for Config Constants
//!
//! Unit tests verifying the correctness of configuration constants
//! and helper functions.

use crate::constants::*;

// =============================================================================
// PRECISION TESTS
// =============================================================================

#[test]
fn test_epsilon_is_positive() {
    assert!(EPSILON > 0.0, "EPSILON must be positive");
}

#[test]
fn test_epsilon_is_small() {
    assert!(EPSILON < 1e-6, "EPSILON should be small for precision");
}

#[test]
fn test_vertex_merge_epsilon_larger_than_epsilon() {
    assert!(
        VERTEX_MERGE_EPSILON >= EPSILON,
        "VERTEX_MERGE_EPSILON should be >= EPSILON"
    );
}

#[test]
fn test_quantize_scale_resolves_merge_epsilon() {
    // Two points closer than the merge distance must land on the same key
    assert!(1.0 / QUANTIZE_SCALE > VERTEX_MERGE_EPSILON);
}

#[test]
fn test_straight_facing_threshold_in_range() {
    assert!(STRAIGHT_FACING_DOT > 0.9);
    assert!(STRAIGHT_FACING_DOT < 1.0);
}

// =============================================================================
// OPERATOR DEFAULT TESTS
// =============================================================================

#[test]
fn test_stack_limits_are_consistent() {
    assert!(STACK_MIN_SCALE > 0.0 && STACK_MIN_SCALE < 1.0);
    assert!(STACK_MAX_LAYERS >= 1);
}

#[test]
fn test_min_polygon_sides_is_triangle() {
    assert_eq!(MIN_POLYGON_SIDES, 3);
}

#[test]
fn test_default_color_is_opaque() {
    assert_eq!(DEFAULT_COLOR[3], 1.0);
}

// =============================================================================
// HELPER TESTS
// =============================================================================

#[test]
fn test_approx_equal_same_value() {
    assert!(approx_equal(1.0, 1.0));
}

#[test]
fn test_approx_equal_within_epsilon() {
    assert!(approx_equal(1.0, 1.0 + EPSILON / 2.0));
}

#[test]
fn test_approx_equal_outside_epsilon() {
    assert!(!approx_equal(1.0, 1.0 + EPSILON * 2.0));
}

#[test]
fn test_approx_zero() {
    assert!(approx_zero(0.0));
    assert!(approx_zero(EPSILON / 2.0));
    assert!(!approx_zero(EPSILON * 2.0));
}
