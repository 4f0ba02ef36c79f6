//! Photo cache store error types.

use thiserror::Error;

/// Errors produced by the photo cache store.
#[derive(Debug, Clone, Error)]
pub enum StoreError {
    /// The pin's record collection cannot be resolved.
    ///
    /// Distinct from an empty collection: the pin is unknown to the store,
    /// either never registered or already dropped.
    #[error("no records collection for pin {pin_id}")]
    NoRecordsCollection {
        /// The pin whose collection was requested.
        pin_id: String,
    },

    /// Persisting the store state failed.
    #[error("persistence commit failed: {detail}")]
    CommitFailed {
        /// Failure description.
        detail: String,
    },
}

impl StoreError {
    /// Creates a missing-collection error.
    #[must_use]
    pub fn no_collection(pin_id: impl std::fmt::Display) -> Self {
        Self::NoRecordsCollection {
            pin_id: pin_id.to_string(),
        }
    }

    /// Creates a commit failure.
    #[must_use]
    pub fn commit(detail: impl Into<String>) -> Self {
        Self::CommitFailed {
            detail: detail.into(),
        }
    }
}
