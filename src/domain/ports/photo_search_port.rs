//! Photo search port definition.

use async_trait::async_trait;

use crate::domain::errors::SearchError;
use crate::domain::search::SearchResult;

/// Port for paged photo discovery around a coordinate.
///
/// Implementations are stateless beyond their own network call; every
/// invocation issues exactly one search request.
#[async_trait]
pub trait PhotoSearchPort: Send + Sync {
    /// Searches for photos near the given coordinate.
    ///
    /// An empty result is success; callers distinguish "nothing found"
    /// from failure by the error channel alone.
    async fn search(&self, latitude: f64, longitude: f64) -> Result<SearchResult, SearchError>;
}
