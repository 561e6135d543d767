//! Stateful statistic accumulators used for flat and hierarchical weight computation.
//!
//! An aggregator instance belongs to exactly one computation: hierarchical traversal
//! obtains a fresh one per bucket from an [`AggregatorFactory`]. Sharing an instance
//! between two buckets mixes their observations and is not detected.
//!
//! Every variant returns `0.0` from [`Aggregator::compute`] when nothing was added.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Fence multiplier used by [`MeanIqrAgg`] unless configured otherwise.
pub const DEFAULT_IQR_K: f64 = 1.5;

pub trait Aggregator {
    /// Record one observation.
    fn add(&mut self, value: f64);

    /// Current summary statistic; accumulated state is kept.
    fn compute(&self) -> f64;

    /// Drop accumulated observations, keeping configuration.
    fn clear(&mut self);
}

/// Arithmetic mean of all observations.
#[derive(Debug, Clone, Default)]
pub struct MeanAgg {
    sum: f64,
    count: usize,
}

impl MeanAgg {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Aggregator for MeanAgg {
    fn add(&mut self, value: f64) {
        self.sum += value;
        self.count += 1;
    }

    fn compute(&self) -> f64 {
        if self.count == 0 {
            return 0.0;
        }
        self.sum / self.count as f64
    }

    fn clear(&mut self) {
        self.sum = 0.0;
        self.count = 0;
    }
}

/// Sum of observations divided by the number of `add` calls.
///
/// Intended as the rollup for children that stand for unequal numbers of leaves: a
/// caller that wants leaf-count fairness adds a child's weight once per underlying
/// leaf. The closed form is the same as [`MeanAgg`].
#[derive(Debug, Clone, Default)]
pub struct MeanSumAgg {
    sum: f64,
    count: usize,
}

impl MeanSumAgg {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Aggregator for MeanSumAgg {
    fn add(&mut self, value: f64) {
        self.sum += value;
        self.count += 1;
    }

    fn compute(&self) -> f64 {
        if self.count == 0 {
            return 0.0;
        }
        self.sum / self.count as f64
    }

    fn clear(&mut self) {
        self.sum = 0.0;
        self.count = 0;
    }
}

#[derive(Debug, Clone, Default)]
pub struct MinAgg {
    min: Option<f64>,
}

impl MinAgg {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Aggregator for MinAgg {
    fn add(&mut self, value: f64) {
        self.min = Some(match self.min {
            Some(current) if current <= value => current,
            _ => value,
        });
    }

    fn compute(&self) -> f64 {
        self.min.unwrap_or(0.0)
    }

    fn clear(&mut self) {
        self.min = None;
    }
}

#[derive(Debug, Clone, Default)]
pub struct MaxAgg {
    max: Option<f64>,
}

impl MaxAgg {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Aggregator for MaxAgg {
    fn add(&mut self, value: f64) {
        self.max = Some(match self.max {
            Some(current) if current >= value => current,
            _ => value,
        });
    }

    fn compute(&self) -> f64 {
        self.max.unwrap_or(0.0)
    }

    fn clear(&mut self) {
        self.max = None;
    }
}

/// Mean of the observations inside the interquartile fence `[Q1 - k*IQR, Q3 + k*IQR]`.
///
/// Quartiles use the nearest-rank method: `Q1 = v[ceil(n/4) - 1]`,
/// `Q3 = v[ceil(3n/4) - 1]` over the sorted buffer, ranks clamped to `[1, n]`.
/// If the fence excludes everything, the plain mean of all observations is returned.
#[derive(Debug, Clone)]
pub struct MeanIqrAgg {
    values: Vec<f64>,
    k: f64,
}

impl Default for MeanIqrAgg {
    fn default() -> Self {
        Self::new()
    }
}

impl MeanIqrAgg {
    pub fn new() -> Self {
        Self::with_k(DEFAULT_IQR_K)
    }

    pub fn with_k(k: f64) -> Self {
        Self {
            values: Vec::new(),
            k,
        }
    }

    pub fn k(&self) -> f64 {
        self.k
    }

    pub fn set_k(&mut self, k: f64) {
        self.k = k;
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

fn nearest_rank(sorted: &[f64], quantile: f64) -> f64 {
    let n = sorted.len();
    let rank = ((n as f64) * quantile).ceil() as usize;
    sorted[rank.clamp(1, n) - 1]
}

fn mean(values: &[f64]) -> f64 {
    values.iter().sum::<f64>() / values.len() as f64
}

impl Aggregator for MeanIqrAgg {
    fn add(&mut self, value: f64) {
        self.values.push(value);
    }

    fn compute(&self) -> f64 {
        if self.values.is_empty() {
            return 0.0;
        }

        let mut sorted = self.values.clone();
        sorted.sort_by(f64::total_cmp);

        let q1 = nearest_rank(&sorted, 0.25);
        let q3 = nearest_rank(&sorted, 0.75);
        let fence = self.k * (q3 - q1);
        let (low, high) = (q1 - fence, q3 + fence);

        let (sum, count) = sorted
            .iter()
            .filter(|&&v| v >= low && v <= high)
            .fold((0.0, 0usize), |(sum, count), v| (sum + v, count + 1));

        if count == 0 {
            return mean(&sorted);
        }
        sum / count as f64
    }

    fn clear(&mut self) {
        self.values.clear();
    }
}

/// Aggregator variants selectable from configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AggregatorKind {
    Mean,
    MeanSum,
    Min,
    Max,
    MeanIqr,
}

impl fmt::Display for AggregatorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            AggregatorKind::Mean => "mean",
            AggregatorKind::MeanSum => "mean-sum",
            AggregatorKind::Min => "min",
            AggregatorKind::Max => "max",
            AggregatorKind::MeanIqr => "mean-iqr",
        };
        f.write_str(name)
    }
}

impl AggregatorKind {
    /// Fresh aggregator of this kind; `iqr_k` only affects [`AggregatorKind::MeanIqr`].
    pub fn build(self, iqr_k: f64) -> Box<dyn Aggregator> {
        match self {
            AggregatorKind::Mean => Box::new(MeanAgg::new()),
            AggregatorKind::MeanSum => Box::new(MeanSumAgg::new()),
            AggregatorKind::Min => Box::new(MinAgg::new()),
            AggregatorKind::Max => Box::new(MaxAgg::new()),
            AggregatorKind::MeanIqr => Box::new(MeanIqrAgg::with_k(iqr_k)),
        }
    }
}

/// Produces a new, exclusively owned aggregator for every bucket visited.
pub struct AggregatorFactory {
    make: Box<dyn Fn() -> Box<dyn Aggregator>>,
}

impl AggregatorFactory {
    pub fn new<F>(make: F) -> Self
    where
        F: Fn() -> Box<dyn Aggregator> + 'static,
    {
        Self {
            make: Box::new(make),
        }
    }

    pub fn from_kind(kind: AggregatorKind, iqr_k: f64) -> Self {
        Self::new(move || kind.build(iqr_k))
    }

    pub fn mean() -> Self {
        Self::new(|| Box::new(MeanAgg::new()))
    }

    pub fn mean_sum() -> Self {
        Self::new(|| Box::new(MeanSumAgg::new()))
    }

    pub fn min() -> Self {
        Self::new(|| Box::new(MinAgg::new()))
    }

    pub fn max() -> Self {
        Self::new(|| Box::new(MaxAgg::new()))
    }

    pub fn mean_iqr(k: f64) -> Self {
        Self::new(move || Box::new(MeanIqrAgg::with_k(k)))
    }

    /// A fresh aggregator with no observations.
    pub fn create(&self) -> Box<dyn Aggregator> {
        (self.make)()
    }
}

impl fmt::Debug for AggregatorFactory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AggregatorFactory").finish_non_exhaustive()
    }
}
