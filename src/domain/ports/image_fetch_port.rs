//! Image fetch port definition.

use async_trait::async_trait;
use bytes::Bytes;

use crate::domain::errors::FetchError;

/// Port for downloading raw image bytes.
///
/// No retry is built in; retry and backoff policy belongs to the caller.
#[async_trait]
pub trait ImageFetchPort: Send + Sync {
    /// Downloads the bytes behind the given URL.
    ///
    /// Malformed URL strings fail fast with [`FetchError::InvalidUrl`]
    /// without a network round trip.
    async fn fetch(&self, url: &str) -> Result<Bytes, FetchError>;
}

#[cfg(test)]
pub mod mock {
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

    use super::*;

    /// Mock fetch port returning fixed bytes or a network failure.
    pub struct MockImageFetch {
        payload: Bytes,
        should_succeed: AtomicBool,
        calls: AtomicUsize,
    }

    impl MockImageFetch {
        /// Creates a mock returning the given payload for every URL.
        pub fn with_payload(payload: &'static [u8]) -> Self {
            Self {
                payload: Bytes::from_static(payload),
                should_succeed: AtomicBool::new(true),
                calls: AtomicUsize::new(0),
            }
        }

        /// Flips the mock into failure mode.
        pub fn set_should_succeed(&self, value: bool) {
            self.should_succeed.store(value, Ordering::SeqCst);
        }

        /// Number of fetch calls observed.
        pub fn call_count(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl ImageFetchPort for MockImageFetch {
        async fn fetch(&self, url: &str) -> Result<Bytes, FetchError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.should_succeed.load(Ordering::SeqCst) {
                Ok(self.payload.clone())
            } else {
                Err(FetchError::network(format!("mock failure for {url}")))
            }
        }
    }
}
