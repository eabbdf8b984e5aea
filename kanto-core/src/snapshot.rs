//! Tri-state snapshot of an asynchronous lookup.
//!
//! Every query-facing operation in the workspace reports its current state
//! through this shape. The presentation layer decides between placeholder,
//! content, and error rendering from these three fields; "still pending"
//! and "failed" are deliberately distinguishable states.

use crate::error::SourceError;

/// Read-only view of a cached lookup's current state.
///
/// Snapshots are detached clones: mutating the `data` a snapshot carries
/// never affects the cache entry it was taken from.
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot<T> {
    /// True while the underlying accessor has not completed.
    pub is_loading: bool,
    /// The resolved value, if the accessor succeeded.
    pub data: Option<T>,
    /// The failure, if the accessor failed. Cached failures are terminal
    /// for their key; they are never retried automatically.
    pub error: Option<SourceError>,
}

impl<T> Snapshot<T> {
    /// A lookup that has been issued but has not completed.
    pub fn pending() -> Self {
        Self {
            is_loading: true,
            data: None,
            error: None,
        }
    }

    /// A lookup that completed successfully.
    pub fn resolved(value: T) -> Self {
        Self {
            is_loading: false,
            data: Some(value),
            error: None,
        }
    }

    /// A lookup that completed with a failure.
    pub fn failed(error: SourceError) -> Self {
        Self {
            is_loading: false,
            data: None,
            error: Some(error),
        }
    }

    /// True once the accessor has produced a value.
    pub fn is_resolved(&self) -> bool {
        !self.is_loading && self.data.is_some()
    }

    /// True once the accessor has failed.
    pub fn is_failed(&self) -> bool {
        self.error.is_some()
    }

    /// Map the carried value, preserving loading/error state.
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Snapshot<U> {
        Snapshot {
            is_loading: self.is_loading,
            data: self.data.map(f),
            error: self.error,
        }
    }
}

impl<T> From<Result<T, SourceError>> for Snapshot<T> {
    fn from(result: Result<T, SourceError>) -> Self {
        match result {
            Ok(value) => Self::resolved(value),
            Err(error) => Self::failed(error),
        }
    }
}
