//! Raw image byte downloads.

use bytes::Bytes;
use reqwest::{Client, Url};
use tracing::{debug, warn};

use crate::domain::errors::FetchError;
use crate::domain::ports::ImageFetchPort;

/// Default request timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Downloads raw image bytes over HTTP.
///
/// Stateless beyond its connection pool. No retry is built in; callers
/// decide whether to retry or surface the failure.
pub struct ImageFetcher {
    client: Client,
}

impl ImageFetcher {
    /// Creates a fetcher with the given request timeout.
    ///
    /// # Errors
    /// Returns error if the HTTP client cannot be built.
    pub fn new(timeout_secs: u64) -> Result<Self, FetchError> {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(timeout_secs))
            .build()
            .map_err(|e| FetchError::network(format!("failed to create HTTP client: {e}")))?;

        Ok(Self { client })
    }

    /// Validates that a URL string is a well-formed http(s) URL.
    fn validate(url: &str) -> Result<Url, FetchError> {
        let parsed = Url::parse(url).map_err(|_| FetchError::invalid_url(url))?;
        match parsed.scheme() {
            "http" | "https" => Ok(parsed),
            _ => Err(FetchError::invalid_url(url)),
        }
    }
}

impl Default for ImageFetcher {
    fn default() -> Self {
        Self::new(DEFAULT_TIMEOUT_SECS).expect("failed to create default image fetcher")
    }
}

#[async_trait::async_trait]
impl ImageFetchPort for ImageFetcher {
    async fn fetch(&self, url: &str) -> Result<Bytes, FetchError> {
        let parsed = Self::validate(url)?;

        let response = self.client.get(parsed).send().await.map_err(|e| {
            warn!(url = %url, error = %e, "Image download failed");
            if e.is_timeout() {
                FetchError::network("request timed out")
            } else if e.is_connect() {
                FetchError::network("failed to connect to image host")
            } else {
                FetchError::network(e.to_string())
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::network(format!(
                "HTTP {}: {}",
                status,
                status.canonical_reason().unwrap_or("unknown")
            )));
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| FetchError::network(format!("failed to read body: {e}")))?;

        debug!(url = %url, size = bytes.len(), "Image downloaded");

        Ok(bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case("not a url"; "plain text")]
    #[test_case(""; "empty string")]
    #[test_case("ftp://example.com/a.jpg"; "unsupported scheme")]
    #[test_case("file:///etc/passwd"; "file scheme")]
    fn test_validate_rejects(url: &str) {
        assert!(matches!(
            ImageFetcher::validate(url),
            Err(FetchError::InvalidUrl { .. })
        ));
    }

    #[test]
    fn test_validate_accepts_https() {
        assert!(ImageFetcher::validate("https://live.staticflickr.com/65535/1_a_w.jpg").is_ok());
    }

    #[tokio::test]
    async fn test_invalid_url_fails_without_round_trip() {
        let fetcher = ImageFetcher::new(1).unwrap();
        let result = fetcher.fetch("::ni:ther::").await;
        assert!(matches!(result, Err(FetchError::InvalidUrl { .. })));
    }
}
