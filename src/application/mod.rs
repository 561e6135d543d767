//! Application layer: topology loading and the weighting pipeline
//!
//! This layer orchestrates domain logic and owns file I/O.

pub mod error;
pub mod error_ext;
pub mod topology;
pub mod weighting;

pub use error::{ApplicationError, ApplicationResult};
pub use error_ext::IoResultExt;
pub use topology::{Topology, TopologyEntry};
pub use weighting::{WeightReport, WeightingService};
