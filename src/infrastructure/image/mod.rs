//! Image byte downloads.

mod fetcher;

pub use fetcher::{DEFAULT_TIMEOUT_SECS, ImageFetcher};
