//! Domain error types.

mod album_error;
mod coordinate_error;
mod fetch_error;
mod search_error;
mod store_error;

pub use album_error::AlbumError;
pub use coordinate_error::CoordinateError;
pub use fetch_error::FetchError;
pub use search_error::SearchError;
pub use store_error::StoreError;
