//! Photo search error types.

use thiserror::Error;

/// Errors produced by a photo search call.
///
/// An empty result set is not an error; callers receive an empty URL list
/// and decide how to present it.
#[derive(Debug, Clone, Error)]
pub enum SearchError {
    /// The search endpoint could not be reached.
    #[error("network unavailable: {detail}")]
    NetworkUnavailable {
        /// Transport-level failure description.
        detail: String,
    },

    /// The endpoint answered with its error shape.
    #[error("server error {code}: {message}")]
    ServerError {
        /// Numeric status code reported by the endpoint.
        code: i64,
        /// Message reported by the endpoint.
        message: String,
    },

    /// The response matched neither the success nor the error shape.
    #[error("failed to decode search response: {detail}")]
    DecodeFailed {
        /// Parser failure description.
        detail: String,
    },
}

impl SearchError {
    /// Creates a network error.
    #[must_use]
    pub fn network(detail: impl Into<String>) -> Self {
        Self::NetworkUnavailable {
            detail: detail.into(),
        }
    }

    /// Creates a server error.
    #[must_use]
    pub fn server(code: i64, message: impl Into<String>) -> Self {
        Self::ServerError {
            code,
            message: message.into(),
        }
    }

    /// Creates a decode failure.
    #[must_use]
    pub fn decode(detail: impl Into<String>) -> Self {
        Self::DecodeFailed {
            detail: detail.into(),
        }
    }

    /// Returns whether the error is network related.
    #[must_use]
    pub const fn is_network_error(&self) -> bool {
        matches!(self, Self::NetworkUnavailable { .. })
    }
}
