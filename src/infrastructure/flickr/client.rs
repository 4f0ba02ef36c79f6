//! Photo search HTTP client.

use rand::Rng;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::dto::{ErrorResponse, SearchResponse};
use super::envelope::strip_envelope;
use crate::domain::errors::SearchError;
use crate::domain::ports::PhotoSearchPort;
use crate::domain::search::SearchResult;

const USER_AGENT: &str = concat!("wanderpin/", env!("CARGO_PKG_VERSION"));

/// Search endpoint configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FlickrConfig {
    /// API key sent with every search request.
    pub api_key: String,
    /// Search endpoint base URL.
    pub endpoint: String,
    /// Static host serving the image bytes.
    pub static_host: String,
    /// API method identifier.
    pub api_method: String,
    /// Photos requested per page.
    pub page_size: u32,
    /// Highest page number the randomizer may pick.
    pub max_page: u32,
    /// Search radius around the coordinate, in kilometers.
    pub radius_km: u32,
    /// Size suffix baked into synthesized URLs ("w" = small 400).
    pub image_size_suffix: String,
}

impl Default for FlickrConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            endpoint: "https://api.flickr.com/services/rest".to_owned(),
            static_host: "https://live.staticflickr.com".to_owned(),
            api_method: "flickr.photos.search".to_owned(),
            page_size: 18,
            max_page: 13,
            radius_km: 7,
            image_size_suffix: "w".to_owned(),
        }
    }
}

/// Client for the paged photo search endpoint.
///
/// Stateless beyond its HTTP connection pool; each call issues exactly one
/// search request.
pub struct FlickrSearchClient {
    client: Client,
    config: FlickrConfig,
}

impl FlickrSearchClient {
    /// Creates a client for the given configuration.
    ///
    /// # Errors
    /// Returns error if the HTTP client cannot be built.
    pub fn new(config: FlickrConfig) -> Result<Self, SearchError> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(std::time::Duration::from_secs(30))
            .build()
            .map_err(|e| SearchError::network(format!("failed to create HTTP client: {e}")))?;

        Ok(Self { client, config })
    }

    /// Picks the page for the next search uniformly from `[1, max_page]`.
    ///
    /// Randomized so a repeated search for the same coordinate returns a
    /// different photo set instead of the same page every time. A
    /// configured `max_page` of zero is treated as one.
    fn pick_page(&self) -> u32 {
        rand::rng().random_range(1..=self.config.max_page.max(1))
    }

    /// Decodes a response body, trying the success shape first and the
    /// error shape second.
    ///
    /// Always decodes from the envelope-stripped buffer, whether the
    /// server wrapped the payload or served raw JSON.
    fn decode_body(body: &[u8]) -> Result<SearchResponse, SearchError> {
        let payload = strip_envelope(body);

        match serde_json::from_slice::<SearchResponse>(payload) {
            Ok(response) => Ok(response),
            Err(primary) => match serde_json::from_slice::<ErrorResponse>(payload) {
                Ok(error) => Err(SearchError::server(error.code, error.message)),
                Err(_) => Err(SearchError::decode(primary.to_string())),
            },
        }
    }

    /// Maps a decoded response into synthesized display URLs, preserving
    /// server order.
    fn synthesize(&self, response: SearchResponse) -> SearchResult {
        let urls = response
            .photos
            .photo
            .iter()
            .map(|item| {
                format!(
                    "{}/{}/{}_{}_{}.jpg",
                    self.config.static_host,
                    item.server,
                    item.id,
                    item.secret,
                    self.config.image_size_suffix
                )
            })
            .collect();

        SearchResult {
            page: response.photos.page,
            total_pages: response.photos.pages,
            urls,
        }
    }
}

#[async_trait::async_trait]
impl PhotoSearchPort for FlickrSearchClient {
    async fn search(&self, latitude: f64, longitude: f64) -> Result<SearchResult, SearchError> {
        let page = self.pick_page();

        debug!(
            lat = latitude,
            lon = longitude,
            page = page,
            per_page = self.config.page_size,
            "Searching photos near coordinate"
        );

        let query = [
            ("api_key", self.config.api_key.clone()),
            ("method", self.config.api_method.clone()),
            ("format", "json".to_owned()),
            ("per_page", self.config.page_size.to_string()),
            ("page", page.to_string()),
            ("lat", latitude.to_string()),
            ("lon", longitude.to_string()),
            ("radius", self.config.radius_km.to_string()),
        ];

        let response = self
            .client
            .get(&self.config.endpoint)
            .query(&query)
            .send()
            .await
            .map_err(|e| {
                warn!(error = %e, "Failed to reach search endpoint");
                if e.is_timeout() {
                    SearchError::network("request timed out")
                } else if e.is_connect() {
                    SearchError::network("failed to connect to search endpoint")
                } else {
                    SearchError::network(e.to_string())
                }
            })?;

        let status = response.status();
        let body = response
            .bytes()
            .await
            .map_err(|e| SearchError::network(format!("failed to read body: {e}")))?;

        if !status.is_success() {
            // The endpoint reports most failures in-band; prefer its own
            // error shape over the bare HTTP status.
            return match Self::decode_body(&body) {
                Err(server_error @ SearchError::ServerError { .. }) => Err(server_error),
                _ => Err(SearchError::server(
                    i64::from(status.as_u16()),
                    status.canonical_reason().unwrap_or("unknown"),
                )),
            };
        }

        let result = self.synthesize(Self::decode_body(&body)?);

        debug!(
            page = result.page,
            found = result.len(),
            "Search completed"
        );

        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_client() -> FlickrSearchClient {
        FlickrSearchClient::new(FlickrConfig::default()).unwrap()
    }

    const WRAPPED_THREE: &[u8] = br#"jsonFlickrApi({"photos":{"page":3,"pages":13,"perpage":18,"total":"54","photo":[
        {"id":"100","owner":"a","secret":"s1","server":"65535","farm":66,"title":"first"},
        {"id":"200","owner":"b","secret":"s2","server":"65100","farm":66,"title":"second"},
        {"id":"300","owner":"c","secret":"s3","server":"65535","farm":66,"title":"third"}
    ]},"stat":"ok"})"#;

    #[test]
    fn test_page_always_in_range() {
        let client = test_client();
        for _ in 0..500 {
            let page = client.pick_page();
            assert!((1..=13).contains(&page));
        }
    }

    #[test]
    fn test_zero_max_page_falls_back_to_one() {
        let config = FlickrConfig {
            max_page: 0,
            ..FlickrConfig::default()
        };
        let client = FlickrSearchClient::new(config).unwrap();
        for _ in 0..20 {
            assert_eq!(client.pick_page(), 1);
        }
    }

    #[test]
    fn test_page_distribution_not_degenerate() {
        let client = test_client();
        let pages: std::collections::HashSet<u32> = (0..500).map(|_| client.pick_page()).collect();
        assert!(pages.len() > 1, "500 draws landed on one page");
    }

    #[test]
    fn test_wrapped_success_yields_urls_in_order() {
        let client = test_client();
        let result = client
            .synthesize(FlickrSearchClient::decode_body(WRAPPED_THREE).unwrap());

        assert_eq!(result.page, 3);
        assert_eq!(result.total_pages, 13);
        assert_eq!(
            result.urls,
            vec![
                "https://live.staticflickr.com/65535/100_s1_w.jpg",
                "https://live.staticflickr.com/65100/200_s2_w.jpg",
                "https://live.staticflickr.com/65535/300_s3_w.jpg",
            ]
        );
    }

    #[test]
    fn test_suffix_configurable() {
        let config = FlickrConfig {
            image_size_suffix: "n".to_owned(),
            ..FlickrConfig::default()
        };
        let client = FlickrSearchClient::new(config).unwrap();
        let result = client
            .synthesize(FlickrSearchClient::decode_body(WRAPPED_THREE).unwrap());
        assert!(result.urls[0].ends_with("_n.jpg"));
    }

    #[test]
    fn test_error_shape_becomes_server_error() {
        let body = br#"{"stat":"fail","code":1,"message":"Required parameter missing"}"#;
        match FlickrSearchClient::decode_body(body) {
            Err(SearchError::ServerError { code, message }) => {
                assert_eq!(code, 1);
                assert_eq!(message, "Required parameter missing");
            }
            other => panic!("expected ServerError, got {other:?}"),
        }
    }

    #[test]
    fn test_wrapped_error_shape_becomes_server_error() {
        let body = br#"jsonFlickrApi({"status":100,"error":"Invalid API Key"})"#;
        match FlickrSearchClient::decode_body(body) {
            Err(SearchError::ServerError { code, message }) => {
                assert_eq!(code, 100);
                assert_eq!(message, "Invalid API Key");
            }
            other => panic!("expected ServerError, got {other:?}"),
        }
    }

    #[test]
    fn test_neither_shape_is_decode_failure() {
        let body = br#"<html>not json</html>"#;
        assert!(matches!(
            FlickrSearchClient::decode_body(body),
            Err(SearchError::DecodeFailed { .. })
        ));
    }

    #[test]
    fn test_empty_photo_list_is_success() {
        let body = br#"{"photos":{"page":1,"pages":0,"perpage":18,"total":0,"photo":[]},"stat":"ok"}"#;
        let client = test_client();
        let result = client
            .synthesize(FlickrSearchClient::decode_body(body).unwrap());
        assert!(result.is_empty());
    }
}
