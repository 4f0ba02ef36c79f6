//! Application layer orchestrating the discovery/refresh protocol.

mod album_service;

pub use album_service::{AlbumService, AlbumState, RefreshReport};
