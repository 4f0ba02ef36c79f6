//! Infrastructure layer with external service adapters.

/// Application configuration.
pub mod config;
/// Photo search endpoint adapter.
pub mod flickr;
/// Image byte downloads.
pub mod image;
/// Local persistence of pins, records, and image bytes.
pub mod store;

pub use config::{AppConfig, CliArgs, LogLevel};
pub use flickr::{FlickrConfig, FlickrSearchClient};
pub use image::ImageFetcher;
pub use store::{BlobStore, Journal, PhotoCacheStore};
