use serde::Deserialize;

use crate::domain::serde_utils;

/// One photo item as served by the search endpoint.
#[derive(Debug, Deserialize)]
pub struct PhotoItem {
    /// Photo id on the static host.
    pub id: String,
    /// Uploading account id.
    #[serde(default)]
    pub owner: String,
    /// Secret component of the static URL.
    pub secret: String,
    /// Server shard the photo lives on.
    pub server: String,
    /// Legacy farm number.
    #[serde(default)]
    pub farm: i64,
    /// Photo title.
    #[serde(default)]
    pub title: String,
}

/// The page of photos inside a successful response.
#[derive(Debug, Deserialize)]
pub struct PhotosPage {
    /// Page number this response covers.
    pub page: u32,
    /// Total pages available.
    pub pages: u32,
    /// Page size used by the server.
    pub perpage: u32,
    /// Total matching photos; served as a string in some API revisions.
    #[serde(with = "serde_utils::string_or_u64", default)]
    pub total: u64,
    /// The photo items, in server order.
    pub photo: Vec<PhotoItem>,
}

/// Successful search response shape.
#[derive(Debug, Deserialize)]
pub struct SearchResponse {
    /// The returned page of photos.
    pub photos: PhotosPage,
    /// Status marker, "ok" on success.
    pub stat: String,
}

/// Error response shape.
///
/// The endpoint has served two revisions of this shape: `{stat, code,
/// message}` and `{status, error}`. Aliases cover both.
#[derive(Debug, Deserialize)]
pub struct ErrorResponse {
    /// Numeric status code.
    #[serde(alias = "status")]
    pub code: i64,
    /// Human-readable failure message.
    #[serde(alias = "error")]
    pub message: String,
}
