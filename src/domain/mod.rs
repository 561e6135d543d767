//! Domain layer: bucket tree, aggregators, normalizers and weight functions
//!
//! Pure in-memory computation: no I/O, no configuration loading.

pub mod aggregator;
pub mod arena;
pub mod display;
pub mod error;
pub mod node;
pub mod normalizer;
pub mod path;
pub mod weight;

pub use aggregator::{
    Aggregator, AggregatorFactory, AggregatorKind, MaxAgg, MeanAgg, MeanIqrAgg, MeanSumAgg,
    MinAgg, DEFAULT_IQR_K,
};
pub use arena::{Bucket, BucketTree};
pub use display::BucketTreeConvert;
pub use error::{DomainError, DomainResult};
pub use node::{Node, Nodes};
pub use normalizer::{
    MaxNorm, Normalizer, NormalizerKind, ReverseMinNorm, SigmoidNorm, REVERSE_MIN_CAP,
};
pub use path::{BucketPath, Segment};
pub use weight::{capacity_weight, composite_weight, price_weight, rank_nodes};
