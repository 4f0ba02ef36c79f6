//! Domain layer with core business entities and port definitions.

/// Entity definitions.
pub mod entities;
/// Error types.
pub mod errors;
/// Store change events.
pub mod events;
/// Port definitions.
pub mod ports;
/// Search result value types.
pub mod search;
/// Serde utilities.
pub mod serde_utils;

pub use entities::{Coordinate, PhotoRecord, Pin, PinId, PinRegistry, RecordId};
pub use errors::{AlbumError, CoordinateError, FetchError, SearchError, StoreError};
pub use events::{StoreEvent, StoreEventReceiver};
pub use ports::{ImageFetchPort, PhotoSearchPort};
pub use search::SearchResult;
