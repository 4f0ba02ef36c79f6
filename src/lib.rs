//! Wanderpin - travel-pin photo discovery and caching core.
//!
//! Given a user-placed geographic pin, this crate discovers nearby photos
//! through a paged search API, downloads their bytes, and maintains a
//! consistent per-pin local cache supporting individual deletion and
//! whole-collection refresh.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

/// Application layer orchestrating the discovery/refresh protocol.
pub mod application;
/// Domain layer containing entities, errors, and port definitions.
pub mod domain;
/// Infrastructure layer containing adapters for external services.
pub mod infrastructure;

/// Current version of the application.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Application name.
pub const NAME: &str = "wanderpin";
