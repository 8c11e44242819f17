//! Error types for the JSONL collaborators.

use thiserror::Error;

/// Errors that can occur reading a catalog or writing records.
#[derive(Error, Debug)]
pub enum JsonlError {
    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization error.
    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    /// A catalog line could not be parsed.
    #[error("Error parsing catalog at line {line}: {source}")]
    CatalogLine {
        line: usize,
        source: serde_json::Error,
    },
}
