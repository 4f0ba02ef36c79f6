//! Travel pin entity.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::errors::CoordinateError;

/// Unique identifier for a pin.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PinId(pub Uuid);

impl PinId {
    /// Generates a fresh pin identifier.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for PinId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for PinId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<Uuid> for PinId {
    fn from(value: Uuid) -> Self {
        Self(value)
    }
}

/// Validated geographic coordinate in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    latitude: f64,
    longitude: f64,
}

impl Coordinate {
    /// Creates a coordinate, rejecting out-of-range degrees.
    ///
    /// # Errors
    /// Returns error if latitude is outside [-90, 90] or longitude is
    /// outside [-180, 180].
    pub fn new(latitude: f64, longitude: f64) -> Result<Self, CoordinateError> {
        if !(-90.0..=90.0).contains(&latitude) {
            return Err(CoordinateError::LatitudeOutOfRange { value: latitude });
        }
        if !(-180.0..=180.0).contains(&longitude) {
            return Err(CoordinateError::LongitudeOutOfRange { value: longitude });
        }
        Ok(Self {
            latitude,
            longitude,
        })
    }

    /// Latitude in degrees.
    #[must_use]
    pub const fn latitude(&self) -> f64 {
        self.latitude
    }

    /// Longitude in degrees.
    #[must_use]
    pub const fn longitude(&self) -> f64 {
        self.longitude
    }
}

impl std::fmt::Display for Coordinate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.latitude, self.longitude)
    }
}

/// A user-placed map pin owning a photo collection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Pin {
    /// Stable identity.
    pub id: PinId,
    /// Where the pin was dropped.
    pub coordinate: Coordinate,
    /// When the pin was created.
    pub created_at: DateTime<Utc>,
}

impl Pin {
    /// Creates a pin at the given coordinate.
    ///
    /// # Errors
    /// Returns error if the coordinate is out of range.
    pub fn new(latitude: f64, longitude: f64) -> Result<Self, CoordinateError> {
        Ok(Self {
            id: PinId::new(),
            coordinate: Coordinate::new(latitude, longitude)?,
            created_at: Utc::now(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case(0.0, 0.0; "origin")]
    #[test_case(90.0, 180.0; "upper bounds")]
    #[test_case(-90.0, -180.0; "lower bounds")]
    #[test_case(52.52, 13.405; "berlin")]
    fn test_coordinate_accepts_valid(lat: f64, lon: f64) {
        assert!(Coordinate::new(lat, lon).is_ok());
    }

    #[test_case(90.01, 0.0; "latitude too high")]
    #[test_case(-91.0, 0.0; "latitude too low")]
    #[test_case(0.0, 180.5; "longitude too high")]
    #[test_case(0.0, -200.0; "longitude too low")]
    fn test_coordinate_rejects_out_of_range(lat: f64, lon: f64) {
        assert!(Coordinate::new(lat, lon).is_err());
    }

    #[test]
    fn test_pin_ids_are_unique() {
        let a = Pin::new(10.0, 20.0).unwrap();
        let b = Pin::new(10.0, 20.0).unwrap();
        assert_ne!(a.id, b.id);
    }
}
