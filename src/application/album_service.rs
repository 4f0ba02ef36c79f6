//! Album discovery and refresh orchestration.
//!
//! Drives the per-pin cycle: search for photo URLs, create pending
//! records, download bytes with bounded concurrency, attach them, commit.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use futures_util::future::join_all;
use tokio::sync::Semaphore;
use tracing::{debug, info, warn};

use crate::domain::entities::{Pin, PinId};
use crate::domain::errors::AlbumError;
use crate::domain::ports::{ImageFetchPort, PhotoSearchPort};
use crate::infrastructure::store::PhotoCacheStore;

/// Where a pin currently sits in the discovery/refresh cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlbumState {
    /// No records, no cycle running.
    IdleEmpty,
    /// Records present, no cycle running.
    IdlePopulated,
    /// First discovery for the pin is in flight.
    Searching,
    /// A user-triggered refresh (clear, then repopulate) is in flight.
    ClearingAndSearching,
}

/// Outcome of one populate cycle.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RefreshReport {
    /// URLs discovered (records created).
    pub discovered: usize,
    /// Records whose bytes arrived.
    pub downloaded: usize,
    /// Records whose download failed; they stay pending.
    pub failed: usize,
    /// Persistence commits that failed. Non-fatal, never retried here.
    pub commit_failures: usize,
}

/// Orchestrates the refresh protocol for pins.
///
/// Per pin, at most one cycle is in flight at a time; a second request is
/// rejected so two searches can never interleave their clear/populate
/// cycles. Individual photo downloads inside one cycle run concurrently,
/// bounded by a semaphore.
pub struct AlbumService {
    search: Arc<dyn PhotoSearchPort>,
    fetcher: Arc<dyn ImageFetchPort>,
    store: Arc<PhotoCacheStore>,
    max_concurrent_downloads: usize,
    in_flight: Arc<Mutex<HashMap<PinId, AlbumState>>>,
}

/// Removes the pin from the in-flight set on every exit path.
struct FlightGuard {
    in_flight: Arc<Mutex<HashMap<PinId, AlbumState>>>,
    pin_id: PinId,
}

impl Drop for FlightGuard {
    fn drop(&mut self) {
        self.in_flight
            .lock()
            .expect("in-flight set poisoned")
            .remove(&self.pin_id);
    }
}

impl AlbumService {
    /// Creates a service over the given ports and store.
    #[must_use]
    pub fn new(
        search: Arc<dyn PhotoSearchPort>,
        fetcher: Arc<dyn ImageFetchPort>,
        store: Arc<PhotoCacheStore>,
        max_concurrent_downloads: usize,
    ) -> Self {
        Self {
            search,
            fetcher,
            store,
            max_concurrent_downloads: max_concurrent_downloads.max(1),
            in_flight: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// The pin's current position in the refresh cycle.
    pub async fn state(&self, pin_id: PinId) -> AlbumState {
        if let Some(state) = self
            .in_flight
            .lock()
            .expect("in-flight set poisoned")
            .get(&pin_id)
        {
            return *state;
        }

        if self.store.has_records(pin_id).await {
            AlbumState::IdlePopulated
        } else {
            AlbumState::IdleEmpty
        }
    }

    /// Populates a pin's collection if it has no records yet.
    ///
    /// Returns `None` when the pin is already populated and nothing was
    /// done.
    ///
    /// # Errors
    /// Returns error if a cycle is already in flight for the pin, the
    /// search fails, or the store rejects the pin.
    pub async fn ensure_photos(&self, pin: &Pin) -> Result<Option<RefreshReport>, AlbumError> {
        if self.store.has_records(pin.id).await {
            debug!(pin = %pin.id, "Collection already populated");
            return Ok(None);
        }

        let guard = self.begin(pin.id, AlbumState::Searching)?;
        let report = self.populate(pin).await?;
        drop(guard);

        Ok(Some(report))
    }

    /// Discards the pin's collection and repopulates it from a fresh
    /// search.
    ///
    /// # Errors
    /// Returns error if a cycle is already in flight for the pin, the
    /// clear fails, or the search fails. A search failure after the clear
    /// leaves the pin cleanly empty, never half-cleared.
    pub async fn refresh(&self, pin: &Pin) -> Result<RefreshReport, AlbumError> {
        let guard = self.begin(pin.id, AlbumState::ClearingAndSearching)?;

        self.store.clear_all(pin.id).await?;
        // Persist the clear before searching so a failed populate cannot
        // leave the journal still listing records whose blobs are gone.
        let mut clear_commit_failures = 0;
        if let Err(e) = self.store.commit().await {
            warn!(pin = %pin.id, error = %e, "Commit after clear failed");
            clear_commit_failures = 1;
        }

        let mut report = self.populate(pin).await?;
        report.commit_failures += clear_commit_failures;
        if let Err(e) = self.store.commit().await {
            warn!(pin = %pin.id, error = %e, "Commit after refresh failed");
            report.commit_failures += 1;
        }
        drop(guard);

        Ok(report)
    }

    /// Marks a cycle in flight, rejecting a second one for the same pin.
    fn begin(&self, pin_id: PinId, state: AlbumState) -> Result<FlightGuard, AlbumError> {
        let mut in_flight = self.in_flight.lock().expect("in-flight set poisoned");
        if in_flight.contains_key(&pin_id) {
            return Err(AlbumError::in_flight(pin_id));
        }
        in_flight.insert(pin_id, state);

        Ok(FlightGuard {
            in_flight: Arc::clone(&self.in_flight),
            pin_id,
        })
    }

    /// One search-and-download pass for a pin assumed to be empty.
    async fn populate(&self, pin: &Pin) -> Result<RefreshReport, AlbumError> {
        let found = self
            .search
            .search(pin.coordinate.latitude(), pin.coordinate.longitude())
            .await?;

        info!(
            pin = %pin.id,
            page = found.page,
            discovered = found.len(),
            "Search completed, creating records"
        );

        let mut records = Vec::with_capacity(found.len());
        for url in found.urls {
            records.push(self.store.add_pending(pin.id, url).await?);
        }

        let commit_failures = AtomicUsize::new(0);
        if let Err(e) = self.store.commit().await {
            warn!(pin = %pin.id, error = %e, "Commit after record creation failed");
            commit_failures.fetch_add(1, Ordering::Relaxed);
        }

        let discovered = records.len();
        let semaphore = Arc::new(Semaphore::new(self.max_concurrent_downloads));

        let downloads = records.into_iter().map(|record| {
            let semaphore = Arc::clone(&semaphore);
            let fetcher = Arc::clone(&self.fetcher);
            let store = Arc::clone(&self.store);
            let commit_failures = &commit_failures;
            let pin_id = pin.id;

            async move {
                let _permit = semaphore.acquire().await.expect("semaphore closed");

                match fetcher.fetch(record.source_url()).await {
                    Ok(bytes) => {
                        if let Err(e) = store.attach_image_data(pin_id, record.id, bytes).await {
                            warn!(record = %record.id, error = %e, "Blob write failed");
                            commit_failures.fetch_add(1, Ordering::Relaxed);
                        }
                        true
                    }
                    Err(e) => {
                        warn!(record = %record.id, url = record.source_url(), error = %e, "Photo download failed");
                        false
                    }
                }
            }
        });

        let outcomes = join_all(downloads).await;
        let downloaded = outcomes.iter().filter(|ok| **ok).count();

        if let Err(e) = self.store.commit().await {
            warn!(pin = %pin.id, error = %e, "Commit after downloads failed");
            commit_failures.fetch_add(1, Ordering::Relaxed);
        }

        Ok(RefreshReport {
            discovered,
            downloaded,
            failed: discovered - downloaded,
            commit_failures: commit_failures.into_inner(),
        })
    }
}
