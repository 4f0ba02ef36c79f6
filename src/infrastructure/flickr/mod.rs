//! Photo search endpoint adapter.

mod client;
mod dto;
mod envelope;

pub use client::{FlickrConfig, FlickrSearchClient};
pub use envelope::strip_envelope;
