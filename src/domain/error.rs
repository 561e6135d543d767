//! Domain-level errors (no external dependencies)

use thiserror::Error;

/// Structural errors raised while building a bucket tree.
///
/// Numeric degeneracy (empty aggregators, zero normalization references) is not an
/// error: those cases resolve to documented fallback values.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DomainError {
    #[error("empty bucket path")]
    EmptyPath,

    #[error("bucket path must start with '/': {0}")]
    MissingLeadingSlash(String),

    #[error("empty segment at position {position} in path: {path}")]
    EmptySegment { path: String, position: usize },

    #[error("invalid segment '{segment}' in path {path}: expected key:value")]
    InvalidSegment { path: String, segment: String },

    #[error("key '{key}' appears more than once in path: {path}")]
    RepeatedKey { path: String, key: String },

    #[error("conflicting key in path {path}: level is keyed by '{expected}', found '{found}'")]
    ConflictingKey {
        path: String,
        expected: String,
        found: String,
    },

    #[error("bucket would mix nodes and child buckets: {path}")]
    MixedBucket { path: String },

    #[error("node {id}: invalid {attribute} {value}, expected a finite non-negative number")]
    InvalidAttribute {
        id: u64,
        attribute: &'static str,
        value: f64,
    },
}

/// Result type for tree construction.
pub type DomainResult<T> = Result<T, DomainError>;
