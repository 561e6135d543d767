//! Tests for normalizer bounds, fixed points and degenerate references

use netmap::domain::{MaxNorm, Normalizer, ReverseMinNorm, SigmoidNorm};
use rstest::rstest;

const EPS: f64 = 0.001;

#[rstest]
#[case(1.0)]
#[case(10.0)]
#[case(0.003)]
fn given_scale_when_normalizing_scale_then_sigmoid_is_one_half(#[case] scale: f64) {
    let norm = SigmoidNorm::new(scale);
    assert!((norm.normalize(scale) - 0.5).abs() < EPS);
}

#[test]
fn given_large_inputs_when_normalizing_sigmoid_then_stays_bounded() {
    let norm = SigmoidNorm::new(2.0);
    assert!(norm.normalize(100.0) < 1.0);
    assert!(norm.normalize(f64::MAX) <= 1.0);
}

#[test]
fn given_increasing_inputs_when_normalizing_sigmoid_then_monotonic() {
    let norm = SigmoidNorm::new(5.0);
    let inputs: Vec<f64> = (0..200).map(|i| i as f64 * 0.37).collect();
    for pair in inputs.windows(2) {
        assert!(norm.normalize(pair[0]) <= norm.normalize(pair[1]));
    }
}

#[rstest]
#[case(0.0, 0.0)]
#[case(1.0, 0.0)]
#[case(0.0, 3.0)]
fn given_zero_reference_or_input_when_normalizing_reverse_min_then_finite(
    #[case] min: f64,
    #[case] value: f64,
) {
    let result = ReverseMinNorm::new(min).normalize(value);
    assert!(result.is_finite());
    assert!(result >= 0.0);
}

#[test]
fn given_min_value_when_normalizing_reverse_min_then_one() {
    let norm = ReverseMinNorm::new(10.0);
    assert!((norm.normalize(10.0) - 1.0).abs() < EPS);
}

#[rstest]
#[case(0.0, 1.0)]
#[case(1.0, 0.0)]
#[case(0.0, 0.0)]
fn given_zero_reference_or_input_when_normalizing_max_then_finite(
    #[case] max: f64,
    #[case] value: f64,
) {
    let result = MaxNorm::new(max).normalize(value);
    assert!(result.is_finite());
    assert!(result >= 0.0);
}

#[test]
fn given_max_value_when_normalizing_max_then_one() {
    let norm = MaxNorm::new(10.0);
    assert!((norm.normalize(10.0) - 1.0).abs() < EPS);
    assert!(norm.normalize(5.0) < norm.normalize(7.0));
}
