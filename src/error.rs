//! Error taxonomy
//!
//! Caller mistakes and not-ready conditions are `QueryError`s; problems
//! loading data at startup are `BuildError`s. Filters that simply match
//! nothing are never errors.

use crate::service::Domain;
use std::path::PathBuf;
use thiserror::Error;

/// Error returned to query callers
#[derive(Debug, Error)]
pub enum QueryError {
    #[error("Query error: invalid category {0}, must be 1, 2, or 3")]
    InvalidBucket(u8),

    #[error("Query error: positional constraint must look like '5S', got {0:?}")]
    MalformedConstraint(String),

    #[error("Query error: invalid value {value:?} for filter `{filter}`")]
    InvalidFilterValue { filter: &'static str, value: String },

    #[error("Query error: filter `{filter}` is not supported for {domain} queries")]
    UnsupportedFilter { filter: &'static str, domain: Domain },

    #[error("Index not ready: build still in progress")]
    NotReady,

    #[error("Index build failed: {0}")]
    BuildFailed(String),

    #[error("No {0} dataset is configured")]
    DomainUnavailable(Domain),
}

impl QueryError {
    /// Whether retrying the same request later may succeed
    pub fn is_retryable(&self) -> bool {
        matches!(self, QueryError::NotReady)
    }
}

/// Error raised while building indexes
#[derive(Debug, Error)]
pub enum BuildError {
    #[error("Required {domain} dataset not found: {}", path.display())]
    MissingDataset { domain: Domain, path: PathBuf },

    #[error("Failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config {}: {source}", path.display())]
    Config {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("Failed to start index build worker: {0}")]
    Spawn(#[source] std::io::Error),

    #[error("Index build worker panicked")]
    WorkerPanicked,
}
