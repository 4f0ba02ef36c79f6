//! Coordinate validation error types.

use thiserror::Error;

/// Errors for out-of-range geographic coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum CoordinateError {
    /// Latitude outside [-90, 90] degrees.
    #[error("latitude {value} outside [-90, 90]")]
    LatitudeOutOfRange {
        /// The rejected value.
        value: f64,
    },

    /// Longitude outside [-180, 180] degrees.
    #[error("longitude {value} outside [-180, 180]")]
    LongitudeOutOfRange {
        /// The rejected value.
        value: f64,
    },
}
