//! Error types for seed-core.

use crate::config::ReviewSource;

/// Error type for configuration loading.
#[derive(Debug, thiserror::Error)]
pub enum SeedError {
    /// Error reading a seeder file
    #[error("Failed to read seeder file: {0}")]
    IoError(#[from] std::io::Error),

    /// Error parsing YAML
    #[error("Failed to parse YAML: {0}")]
    YamlError(#[from] serde_yaml::Error),

    /// Settings that can never produce a run
    #[error(transparent)]
    Precondition(#[from] PreconditionError),
}

/// A run cannot start with the given configuration and pools.
///
/// Checked once per run, before any item is processed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PreconditionError {
    #[error("single-item mode requires a target item id")]
    MissingTargetItem,

    #[error("by-category mode requires a non-zero category id")]
    MissingCategory,

    #[error("a target item id is only allowed in single-item mode")]
    TargetOutsideSingleItem,

    #[error("item limit must be at least 1")]
    InvalidItemLimit,

    #[error("records per item must be at least 1")]
    InvalidRecordsPerItem,

    #[error("minimum score {0} is outside 1..=5")]
    InvalidMinScore(u8),

    #[error("no authors configured")]
    NoAuthors,

    #[error("general template pool is empty")]
    EmptyGeneralPool,

    #[error("no review templates available for source '{0}'")]
    EmptyReviewPool(ReviewSource),
}
