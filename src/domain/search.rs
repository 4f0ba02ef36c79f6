//! Search result value types.

/// The outcome of one photo search call: synthesized photo URLs in the
/// order the server returned them.
///
/// Transient by design; it is only consumed to create photo records and is
/// never persisted itself. An empty `urls` list is a valid, successful
/// result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchResult {
    /// The page the search landed on.
    pub page: u32,
    /// Total pages available for the queried area.
    pub total_pages: u32,
    /// Synthesized display URLs in server order.
    pub urls: Vec<String>,
}

impl SearchResult {
    /// Number of discovered photos.
    #[must_use]
    pub fn len(&self) -> usize {
        self.urls.len()
    }

    /// True if the search found no photos.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.urls.is_empty()
    }
}
