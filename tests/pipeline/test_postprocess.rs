// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! Known-value tests for the post-processing arithmetic
//!
//! These pin down the exact calibration behavior: sigmoid mapping into the
//! bracket range, rounding and clamping, and the boundary-penalty discount
//! on the bracket confidence.

use fabstir_age_node::pipeline::{postprocess, select_bracket, sigmoid, softmax, AgeGroup};

#[test]
fn test_young_adult_near_upper_edge() {
    // sigmoid(1.3863) ~= 0.8 -> 18 + 17 * 0.8 = 31.6 -> 32
    // rel = (32 - 18) / 17 ~= 0.8235, distance ~= 0.1765
    // penalty = max(0.5, 0.3529) = 0.5
    // group_conf = softmax([0,0,0,4])[3] ~= 0.9479
    // confidence ~= 47.4
    let logits = [0.0, 0.0, 0.0, 4.0];
    let pred = postprocess(&logits, 1.3863).unwrap();

    assert_eq!(pred.age_group, AgeGroup::YoungAdult);
    assert_eq!(pred.predicted_age, 32);
    assert!((pred.confidence - 47.4).abs() < 0.3, "got {}", pred.confidence);
}

#[test]
fn test_middle_age_midpoint() {
    // sigmoid(0) = 0.5 -> 36 + 19 * 0.5 = 45.5 -> 46
    // rel = 10/19 ~= 0.5263, distance ~= 0.4737, penalty ~= 0.9474
    // group_conf = softmax([0,9,0,0])[1] ~= 0.99963
    // confidence ~= 94.7 (just under the 95 cap)
    let logits = [0.0, 9.0, 0.0, 0.0];
    let pred = postprocess(&logits, 0.0).unwrap();

    assert_eq!(pred.age_group, AgeGroup::MiddleAge);
    assert_eq!(pred.predicted_age, 46);
    assert!((pred.confidence - 94.7).abs() < 0.3, "got {}", pred.confidence);
}

#[test]
fn test_child_bracket_lower_edge_clamps() {
    let logits = [8.0, 0.0, 0.0, 0.0];
    let pred = postprocess(&logits, -50.0).unwrap();

    assert_eq!(pred.age_group, AgeGroup::Child);
    assert_eq!(pred.predicted_age, 1);
    // At the exact edge the penalty floor halves the ~100% group confidence
    assert!((pred.confidence - 50.0).abs() < 0.2);
}

#[test]
fn test_senior_bracket_upper_edge_clamps() {
    let logits = [0.0, 0.0, 8.0, 0.0];
    let pred = postprocess(&logits, 50.0).unwrap();

    assert_eq!(pred.age_group, AgeGroup::Senior);
    assert_eq!(pred.predicted_age, 90);
    assert!((pred.confidence - 50.0).abs() < 0.2);
}

#[test]
fn test_monotonic_in_specialist_output() {
    // Within a bracket, a larger raw output never predicts a younger age
    let logits = [0.0, 0.0, 0.0, 6.0];
    let mut last_age = 0;
    for raw in [-4.0, -2.0, -1.0, 0.0, 1.0, 2.0, 4.0] {
        let pred = postprocess(&logits, raw).unwrap();
        assert!(pred.predicted_age >= last_age);
        last_age = pred.predicted_age;
    }
    assert!(last_age >= 34); // sigmoid(4) ~= 0.982 -> near the bracket top
}

#[test]
fn test_every_bracket_reachable() {
    for (index, group) in AgeGroup::ALL.iter().enumerate() {
        let mut logits = [0.0f32; 4];
        logits[index] = 5.0;

        assert_eq!(select_bracket(&logits).unwrap(), *group);

        let pred = postprocess(&logits, 0.3).unwrap();
        assert_eq!(pred.age_group, *group);
        let (min_age, max_age) = group.bounds();
        assert!(pred.predicted_age >= min_age && pred.predicted_age <= max_age);
    }
}

#[test]
fn test_equal_top_logits_select_first_bracket() {
    // Tied maxima resolve to the lowest class index, so Child (index 0)
    // beats MiddleAge (index 1) on equal logits
    let logits = [5.0, 5.0, 0.0, 0.0];
    assert_eq!(select_bracket(&logits).unwrap(), AgeGroup::Child);

    let pred = postprocess(&logits, 0.0).unwrap();
    assert_eq!(pred.age_group, AgeGroup::Child);

    // A tie further down behaves the same: Senior (2) over YoungAdult (3)
    assert_eq!(
        select_bracket(&[0.0, 0.0, 7.0, 7.0]).unwrap(),
        AgeGroup::Senior
    );
}

#[test]
fn test_any_nan_logit_is_rejected() {
    // NaN anywhere in the logits fails selection, not just in the winner
    assert!(select_bracket(&[1.0, f32::NAN, 0.0, 0.0]).is_err());
    assert!(postprocess(&[1.0, f32::NAN, 0.0, 0.0], 0.0).is_err());
}

#[test]
fn test_confidence_always_in_bounds() {
    // Sweep a grid of logit skews and raw outputs
    for skew in [0.0f32, 0.5, 1.0, 2.0, 5.0, 20.0] {
        for raw in [-10.0f32, -1.0, 0.0, 1.0, 10.0] {
            let logits = [skew, 0.0, 0.0, 0.1];
            let pred = postprocess(&logits, raw).unwrap();
            assert!(
                (10.0..=95.0).contains(&pred.confidence),
                "confidence {} out of bounds for skew {} raw {}",
                pred.confidence,
                skew,
                raw
            );
        }
    }
}

#[test]
fn test_softmax_and_sigmoid_agree_with_reference_values() {
    // Reference values computed with numpy
    let probs = softmax(&[1.0, 2.0, 3.0, 4.0]);
    let expected = [0.0320586, 0.08714432, 0.23688282, 0.64391426];
    for (p, e) in probs.iter().zip(expected.iter()) {
        assert!((p - e).abs() < 1e-5);
    }

    assert!((sigmoid(1.3863) - 0.8).abs() < 1e-4);
    assert!((sigmoid(-1.3863) - 0.2).abs() < 1e-4);
}
