//! Entity definitions.

mod photo_record;
mod pin;
mod pin_registry;

pub use photo_record::{PhotoRecord, RecordId};
pub use pin::{Coordinate, Pin, PinId};
pub use pin_registry::PinRegistry;
