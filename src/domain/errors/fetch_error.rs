//! Image fetch error types.

use thiserror::Error;

/// Errors produced when downloading image bytes.
#[derive(Debug, Clone, Error)]
pub enum FetchError {
    /// The image host could not be reached or answered with a failure.
    #[error("network unavailable: {detail}")]
    NetworkUnavailable {
        /// Transport-level failure description.
        detail: String,
    },

    /// The URL string is malformed; no transfer was attempted.
    #[error("invalid url: {url}")]
    InvalidUrl {
        /// The rejected URL string.
        url: String,
    },
}

impl FetchError {
    /// Creates a network error.
    #[must_use]
    pub fn network(detail: impl Into<String>) -> Self {
        Self::NetworkUnavailable {
            detail: detail.into(),
        }
    }

    /// Creates an invalid URL error.
    #[must_use]
    pub fn invalid_url(url: impl Into<String>) -> Self {
        Self::InvalidUrl { url: url.into() }
    }

    /// Returns whether the error is network related.
    #[must_use]
    pub const fn is_network_error(&self) -> bool {
        matches!(self, Self::NetworkUnavailable { .. })
    }
}
