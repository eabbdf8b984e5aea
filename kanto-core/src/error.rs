//! Error types for KANTO operations

use thiserror::Error;

/// Remote catalog errors.
///
/// These are the only two failure kinds the data source surfaces, and the
/// cache stores them verbatim inside failed snapshots, so the type must be
/// cheap to clone and comparable in tests.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SourceError {
    #[error("Resource not found: {resource}")]
    NotFound { resource: String },

    #[error("Transport failure: {reason}")]
    Transport { reason: String },
}

impl SourceError {
    /// Convenience constructor for an unknown entry id.
    pub fn not_found(resource: impl Into<String>) -> Self {
        Self::NotFound {
            resource: resource.into(),
        }
    }

    /// Convenience constructor for a network-level failure.
    pub fn transport(reason: impl Into<String>) -> Self {
        Self::Transport {
            reason: reason.into(),
        }
    }
}

/// Errors raised while loading the static name dataset.
#[derive(Debug, Error)]
pub enum DatasetError {
    #[error("Invalid name dataset: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Name dataset is empty")]
    Empty,
}

/// Master error type for all KANTO errors.
#[derive(Debug, Error)]
pub enum KantoError {
    #[error("Source error: {0}")]
    Source(#[from] SourceError),

    #[error("Dataset error: {0}")]
    Dataset(#[from] DatasetError),
}

/// Result type alias for remote catalog operations.
pub type SourceResult<T> = Result<T, SourceError>;

/// Result type alias for KANTO operations.
pub type KantoResult<T> = Result<T, KantoError>;

// =============================================================================
// TESTS
// =============================================================================
