//! Local persistence of pins, photo records, and image bytes.

mod blob_store;
mod cache_store;
mod journal;

pub use blob_store::BlobStore;
pub use cache_store::PhotoCacheStore;
pub use journal::{Journal, JournalSnapshot, RecordEntry};
