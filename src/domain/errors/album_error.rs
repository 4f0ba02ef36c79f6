//! Album service error types.

use thiserror::Error;

use super::{SearchError, StoreError};

/// Errors produced by an album discovery or refresh cycle.
#[derive(Debug, Error)]
pub enum AlbumError {
    /// A refresh cycle for this pin is already in flight.
    ///
    /// A second cycle is rejected rather than queued so a stale request
    /// can never clobber a collection the user just received.
    #[error("a refresh for pin {pin_id} is already in flight")]
    RefreshInFlight {
        /// The pin being refreshed.
        pin_id: String,
    },

    /// The photo search failed.
    #[error(transparent)]
    Search(#[from] SearchError),

    /// A cache store operation failed.
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl AlbumError {
    /// Creates an in-flight rejection.
    #[must_use]
    pub fn in_flight(pin_id: impl std::fmt::Display) -> Self {
        Self::RefreshInFlight {
            pin_id: pin_id.to_string(),
        }
    }
}
