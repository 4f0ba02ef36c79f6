//! In-memory registry of placed pins.

use std::collections::HashMap;

use super::pin::{Pin, PinId};
use crate::domain::errors::CoordinateError;

/// Owns the set of placed pins.
///
/// Thin by design: the rest of the core only ever reads a pin's identity
/// and coordinate. Callers wanting shared access wrap it in their own lock.
#[derive(Debug, Default)]
pub struct PinRegistry {
    pins: HashMap<PinId, Pin>,
}

impl PinRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Places a new pin at the given coordinate.
    ///
    /// # Errors
    /// Returns error if the coordinate is out of range.
    pub fn place(&mut self, latitude: f64, longitude: f64) -> Result<Pin, CoordinateError> {
        let pin = Pin::new(latitude, longitude)?;
        self.pins.insert(pin.id, pin.clone());
        Ok(pin)
    }

    /// Re-registers a pin restored from persistence.
    pub fn restore(&mut self, pin: Pin) {
        self.pins.insert(pin.id, pin);
    }

    /// Looks up a pin by id.
    #[must_use]
    pub fn get(&self, id: PinId) -> Option<&Pin> {
        self.pins.get(&id)
    }

    /// Finds a pin at exactly the given coordinate, if any.
    #[must_use]
    pub fn find_at(&self, latitude: f64, longitude: f64) -> Option<&Pin> {
        self.pins.values().find(|pin| {
            pin.coordinate.latitude() == latitude && pin.coordinate.longitude() == longitude
        })
    }

    /// Removes a pin. Returns the pin if it existed.
    pub fn remove(&mut self, id: PinId) -> Option<Pin> {
        self.pins.remove(&id)
    }

    /// Number of registered pins.
    #[must_use]
    pub fn len(&self) -> usize {
        self.pins.len()
    }

    /// True if no pins are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pins.is_empty()
    }

    /// Iterates over all pins.
    pub fn iter(&self) -> impl Iterator<Item = &Pin> {
        self.pins.values()
    }
}
