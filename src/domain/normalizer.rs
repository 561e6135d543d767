//! Bounded monotonic transforms of raw attribute values.
//!
//! Each normalizer is parameterized by one reference statistic fixed at construction.
//! All of them are total: any input, including zero references, NaN and infinities,
//! yields a finite non-negative number.

use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::domain::aggregator::{Aggregator, MaxAgg, MeanAgg, MinAgg};

/// Upper bound for [`ReverseMinNorm`] results, used instead of dividing by zero.
pub const REVERSE_MIN_CAP: f64 = 1.0e9;

pub trait Normalizer {
    fn normalize(&self, value: f64) -> f64;
}

/// Negative and NaN inputs count as zero.
fn sanitize(value: f64) -> f64 {
    if value.is_nan() || value < 0.0 {
        0.0
    } else {
        value
    }
}

/// `x / (x + scale)`: `0.5` at `x == scale`, strictly below `1` for finite inputs.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SigmoidNorm {
    scale: f64,
}

impl SigmoidNorm {
    pub fn new(scale: f64) -> Self {
        if !(scale > 0.0 && scale.is_finite()) {
            warn!(scale, "sigmoid normalizer with degenerate scale");
        }
        Self { scale }
    }

    pub fn scale(&self) -> f64 {
        self.scale
    }
}

impl Normalizer for SigmoidNorm {
    fn normalize(&self, value: f64) -> f64 {
        let x = sanitize(value);
        if !(self.scale > 0.0 && self.scale.is_finite()) {
            return if x > 0.0 { 1.0 } else { 0.0 };
        }
        let denominator = x + self.scale;
        if !denominator.is_finite() {
            return 1.0;
        }
        x / denominator
    }
}

/// `min / x`: `1` at `x == min`, decreasing in `x`, rewards small raw values.
///
/// `x == 0` yields `0` when `min == 0` and [`REVERSE_MIN_CAP`] otherwise.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReverseMinNorm {
    min: f64,
}

impl ReverseMinNorm {
    pub fn new(min: f64) -> Self {
        if min == 0.0 {
            warn!("reverse-min normalizer with zero minimum, every non-zero input maps to 0");
        }
        Self { min }
    }

    pub fn min(&self) -> f64 {
        self.min
    }
}

impl Normalizer for ReverseMinNorm {
    fn normalize(&self, value: f64) -> f64 {
        let x = sanitize(value);
        let min = sanitize(self.min);
        if min == 0.0 {
            return 0.0;
        }
        if x == 0.0 {
            return REVERSE_MIN_CAP;
        }
        (min / x).min(REVERSE_MIN_CAP)
    }
}

/// `x / max`: `1` at `x == max`, increasing in `x`; `0` when `max` is zero.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MaxNorm {
    max: f64,
}

impl MaxNorm {
    pub fn new(max: f64) -> Self {
        if !(max > 0.0 && max.is_finite()) {
            warn!(max, "max normalizer with degenerate maximum, every input maps to 0");
        }
        Self { max }
    }

    pub fn max(&self) -> f64 {
        self.max
    }
}

impl Normalizer for MaxNorm {
    fn normalize(&self, value: f64) -> f64 {
        if !(self.max > 0.0 && self.max.is_finite()) {
            return 0.0;
        }
        (sanitize(value) / self.max).min(f64::MAX)
    }
}

/// Normalizer variants selectable from configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum NormalizerKind {
    Sigmoid,
    ReverseMin,
    Max,
}

impl fmt::Display for NormalizerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            NormalizerKind::Sigmoid => "sigmoid",
            NormalizerKind::ReverseMin => "reverse-min",
            NormalizerKind::Max => "max",
        };
        f.write_str(name)
    }
}

impl NormalizerKind {
    /// The statistic that parameterizes this normalizer: mean, minimum or maximum.
    pub fn reference_aggregator(self) -> Box<dyn Aggregator> {
        match self {
            NormalizerKind::Sigmoid => Box::new(MeanAgg::new()),
            NormalizerKind::ReverseMin => Box::new(MinAgg::new()),
            NormalizerKind::Max => Box::new(MaxAgg::new()),
        }
    }

    pub fn build(self, reference: f64) -> Box<dyn Normalizer> {
        match self {
            NormalizerKind::Sigmoid => Box::new(SigmoidNorm::new(reference)),
            NormalizerKind::ReverseMin => Box::new(ReverseMinNorm::new(reference)),
            NormalizerKind::Max => Box::new(MaxNorm::new(reference)),
        }
    }
}

impl<N: Normalizer + ?Sized> Normalizer for Box<N> {
    fn normalize(&self, value: f64) -> f64 {
        (**self).normalize(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn given_degenerate_scale_when_normalizing_sigmoid_then_steps_at_zero() {
        let norm = SigmoidNorm::new(0.0);
        assert_eq!(norm.normalize(0.0), 0.0);
        assert_eq!(norm.normalize(3.0), 1.0);
    }

    #[test]
    fn given_infinite_input_when_normalizing_sigmoid_then_returns_one() {
        let norm = SigmoidNorm::new(f64::MAX);
        assert_eq!(norm.normalize(f64::MAX), 1.0);
        assert_eq!(norm.normalize(f64::INFINITY), 1.0);
    }

    #[test]
    fn given_zero_input_and_positive_min_when_normalizing_then_returns_cap() {
        let norm = ReverseMinNorm::new(1.0);
        assert_eq!(norm.normalize(0.0), REVERSE_MIN_CAP);
        assert_eq!(norm.normalize(1e-12), REVERSE_MIN_CAP);
    }

    #[test]
    fn given_zero_min_when_normalizing_reverse_min_then_returns_zero() {
        let norm = ReverseMinNorm::new(0.0);
        assert_eq!(norm.normalize(0.0), 0.0);
        assert_eq!(norm.normalize(5.0), 0.0);
    }

    #[test]
    fn given_reverse_min_when_input_grows_then_result_decreases() {
        let norm = ReverseMinNorm::new(2.0);
        assert!(norm.normalize(2.0) > norm.normalize(4.0));
        assert_eq!(norm.normalize(4.0), 0.5);
    }

    #[test]
    fn given_negative_or_nan_input_when_normalizing_max_then_treated_as_zero() {
        let norm = MaxNorm::new(4.0);
        assert_eq!(norm.normalize(-1.0), 0.0);
        assert_eq!(norm.normalize(f64::NAN), 0.0);
        assert_eq!(norm.normalize(2.0), 0.5);
    }

    #[test]
    fn given_kind_when_building_then_uses_reference() {
        let norm = NormalizerKind::Max.build(10.0);
        assert_eq!(norm.normalize(10.0), 1.0);

        let mut stat = NormalizerKind::ReverseMin.reference_aggregator();
        stat.add(3.0);
        stat.add(1.0);
        assert_eq!(stat.compute(), 1.0);
    }
}
