//! Authoritative local store of photo records per pin.

use std::collections::HashMap;
use std::sync::Mutex;

use bytes::Bytes;
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

use super::blob_store::BlobStore;
use super::journal::{Journal, JournalSnapshot, RecordEntry};
use crate::domain::entities::{PhotoRecord, Pin, PinId, RecordId};
use crate::domain::errors::StoreError;
use crate::domain::events::{StoreEvent, StoreEventReceiver, StoreEventSender};

#[derive(Debug, Default)]
struct StoreState {
    pins: HashMap<PinId, Pin>,
    collections: HashMap<PinId, Vec<PhotoRecord>>,
}

/// The single writer of photo record data.
///
/// Holds the authoritative in-memory collections, persists metadata
/// through the journal on explicit [`commit`](Self::commit), and keeps
/// image bytes in the blob store. All mutations are serialized behind one
/// write lock; subscribers are notified after each successful mutation.
pub struct PhotoCacheStore {
    state: RwLock<StoreState>,
    journal: Journal,
    blobs: BlobStore,
    subscribers: Mutex<Vec<StoreEventSender>>,
}

impl PhotoCacheStore {
    /// Opens the store, restoring pins and records from the journal and
    /// hydrating image bytes from the blob store.
    ///
    /// # Errors
    /// Returns error if the journal cannot be read.
    pub async fn open(journal: Journal, blobs: BlobStore) -> Result<Self, StoreError> {
        let snapshot = journal.load().await?;

        let mut state = StoreState::default();
        for pin in snapshot.pins {
            state.collections.entry(pin.id).or_default();
            state.pins.insert(pin.id, pin);
        }

        let mut hydrated = 0usize;
        for entry in snapshot.records {
            let url = entry.source_url.clone();
            let mut record = PhotoRecord::pending(entry.pin_id, entry.source_url);
            record.id = entry.id;
            if entry.has_image {
                record.image_bytes = blobs.read(&url).await;
                if record.image_bytes.is_some() {
                    hydrated += 1;
                } else {
                    warn!(record = %record.id, "Journal marks image present but blob is missing");
                }
            }
            state
                .collections
                .entry(entry.pin_id)
                .or_default()
                .push(record);
        }

        info!(
            pins = state.pins.len(),
            hydrated = hydrated,
            "Photo cache store opened"
        );

        Ok(Self {
            state: RwLock::new(state),
            journal,
            blobs,
            subscribers: Mutex::new(Vec::new()),
        })
    }

    /// Subscribes to store change events.
    pub fn subscribe(&self) -> StoreEventReceiver {
        let (tx, rx) = tokio::sync::mpsc::unbounded_channel();
        self.subscribers
            .lock()
            .expect("subscriber list poisoned")
            .push(tx);
        rx
    }

    fn emit(&self, event: &StoreEvent) {
        let mut subscribers = self.subscribers.lock().expect("subscriber list poisoned");
        subscribers.retain(|tx| tx.send(event.clone()).is_ok());
    }

    /// All pins known to the store, for seeding a registry after restore.
    pub async fn pins(&self) -> Vec<Pin> {
        self.state.read().await.pins.values().cloned().collect()
    }

    /// Registers a pin, giving it an empty record collection.
    pub async fn register_pin(&self, pin: &Pin) {
        let mut state = self.state.write().await;
        state.collections.entry(pin.id).or_default();
        state.pins.insert(pin.id, pin.clone());
    }

    /// Drops a pin and everything it owns, blobs included.
    ///
    /// Returns false if the pin was unknown.
    pub async fn drop_pin(&self, pin_id: PinId) -> bool {
        let removed_urls;
        {
            let mut state = self.state.write().await;
            if state.pins.remove(&pin_id).is_none() {
                return false;
            }
            let removed = state.collections.remove(&pin_id).unwrap_or_default();
            removed_urls = Self::unreferenced_urls(&state, removed);
        }

        for url in removed_urls {
            self.blobs.remove(&url).await;
        }

        self.emit(&StoreEvent::CollectionCleared { pin_id });
        debug!(pin = %pin_id, "Pin dropped");
        true
    }

    /// True iff the pin currently owns at least one record.
    pub async fn has_records(&self, pin_id: PinId) -> bool {
        self.state
            .read()
            .await
            .collections
            .get(&pin_id)
            .is_some_and(|records| !records.is_empty())
    }

    /// The pin's records, in creation order. None if the collection is
    /// unresolvable.
    pub async fn records(&self, pin_id: PinId) -> Option<Vec<PhotoRecord>> {
        self.state.read().await.collections.get(&pin_id).cloned()
    }

    /// Number of records the pin owns.
    pub async fn record_count(&self, pin_id: PinId) -> usize {
        self.state
            .read()
            .await
            .collections
            .get(&pin_id)
            .map_or(0, Vec::len)
    }

    /// Creates a pending record for a freshly discovered URL.
    ///
    /// Triggers no fetch itself; orchestration belongs to the caller.
    ///
    /// # Errors
    /// Returns [`StoreError::NoRecordsCollection`] if the pin is unknown.
    pub async fn add_pending(
        &self,
        pin_id: PinId,
        url: impl Into<String>,
    ) -> Result<PhotoRecord, StoreError> {
        let record = PhotoRecord::pending(pin_id, url);
        {
            let mut state = self.state.write().await;
            let Some(records) = state.collections.get_mut(&pin_id) else {
                return Err(StoreError::no_collection(pin_id));
            };
            records.push(record.clone());
        }

        self.emit(&StoreEvent::RecordAdded {
            pin_id,
            record: record.clone(),
        });

        Ok(record)
    }

    /// Attaches downloaded bytes to an existing record.
    ///
    /// A record that no longer exists (deleted mid-flight by a concurrent
    /// refresh or pin removal) is reported and skipped, never an error.
    ///
    /// # Errors
    /// Returns [`StoreError::CommitFailed`] if the bytes cannot be written
    /// to the blob store; the in-memory record is updated regardless.
    pub async fn attach_image_data(
        &self,
        pin_id: PinId,
        record_id: RecordId,
        bytes: Bytes,
    ) -> Result<(), StoreError> {
        let url = {
            let mut state = self.state.write().await;
            let record = state
                .collections
                .get_mut(&pin_id)
                .and_then(|records| records.iter_mut().find(|r| r.id == record_id));

            let Some(record) = record else {
                warn!(pin = %pin_id, record = %record_id, "Attach target no longer exists, skipping");
                return Ok(());
            };

            record.image_bytes = Some(bytes.clone());
            record.source_url().to_owned()
        };

        self.blobs.write(&url, &bytes).await
    }

    /// Deletes one record and its blob (unless another record still
    /// references the same URL).
    ///
    /// # Errors
    /// Returns [`StoreError::NoRecordsCollection`] if the pin is unknown.
    pub async fn remove_record(&self, pin_id: PinId, record_id: RecordId) -> Result<(), StoreError> {
        let removed_url;
        {
            let mut state = self.state.write().await;
            let Some(records) = state.collections.get_mut(&pin_id) else {
                return Err(StoreError::no_collection(pin_id));
            };

            let Some(index) = records.iter().position(|r| r.id == record_id) else {
                warn!(pin = %pin_id, record = %record_id, "Record already gone, skipping removal");
                return Ok(());
            };

            let removed = records.remove(index);
            removed_url = Self::unreferenced_urls(&state, vec![removed]).pop();
        }

        if let Some(url) = removed_url {
            self.blobs.remove(&url).await;
        }

        self.emit(&StoreEvent::RecordRemoved { pin_id, record_id });
        Ok(())
    }

    /// Deletes every record the pin owns, atomically with respect to the
    /// pin: no observer can see a partially cleared collection.
    ///
    /// # Errors
    /// Returns [`StoreError::NoRecordsCollection`] if the collection is
    /// unresolvable. Clearing an already-empty collection is a no-op.
    pub async fn clear_all(&self, pin_id: PinId) -> Result<(), StoreError> {
        let removed_urls;
        {
            let mut state = self.state.write().await;
            let Some(records) = state.collections.get_mut(&pin_id) else {
                return Err(StoreError::no_collection(pin_id));
            };
            let removed = std::mem::take(records);
            removed_urls = Self::unreferenced_urls(&state, removed);
        }

        for url in &removed_urls {
            self.blobs.remove(url).await;
        }

        self.emit(&StoreEvent::CollectionCleared { pin_id });
        debug!(pin = %pin_id, removed = removed_urls.len(), "Collection cleared");
        Ok(())
    }

    /// Persists the current pins and record metadata through the journal.
    ///
    /// Must be called after each mutating operation; failures are reported
    /// to the caller and never retried here.
    ///
    /// # Errors
    /// Returns [`StoreError::CommitFailed`] if the journal write fails.
    pub async fn commit(&self) -> Result<(), StoreError> {
        let snapshot = {
            let state = self.state.read().await;
            JournalSnapshot {
                pins: state.pins.values().cloned().collect(),
                records: state
                    .collections
                    .values()
                    .flatten()
                    .map(|record| RecordEntry {
                        id: record.id,
                        pin_id: record.pin_id,
                        source_url: record.source_url().to_owned(),
                        has_image: record.is_ready(),
                    })
                    .collect(),
            }
        };

        self.journal.save(&snapshot).await
    }

    /// Filters removed records down to URLs no surviving record references.
    fn unreferenced_urls(state: &StoreState, removed: Vec<PhotoRecord>) -> Vec<String> {
        removed
            .into_iter()
            .filter(|candidate| {
                !state
                    .collections
                    .values()
                    .flatten()
                    .any(|r| r.source_url() == candidate.source_url())
            })
            .map(|r| r.source_url().to_owned())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    async fn create_test_store() -> (PhotoCacheStore, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let journal = Journal::at_path(temp_dir.path().join("journal.toml"));
        let blobs = BlobStore::new(temp_dir.path().join("blobs")).await.unwrap();
        let store = PhotoCacheStore::open(journal, blobs).await.unwrap();
        (store, temp_dir)
    }

    fn test_pin() -> Pin {
        Pin::new(52.52, 13.405).unwrap()
    }

    #[tokio::test]
    async fn test_add_pending_then_has_records() {
        let (store, _temp) = create_test_store().await;
        let pin = test_pin();
        store.register_pin(&pin).await;

        assert!(!store.has_records(pin.id).await);
        store
            .add_pending(pin.id, "https://example.com/a.jpg")
            .await
            .unwrap();
        assert!(store.has_records(pin.id).await);
    }

    #[tokio::test]
    async fn test_add_pending_unknown_pin_fails() {
        let (store, _temp) = create_test_store().await;
        let result = store.add_pending(PinId::new(), "https://example.com/a.jpg").await;
        assert!(matches!(result, Err(StoreError::NoRecordsCollection { .. })));
    }

    #[tokio::test]
    async fn test_clear_all_then_has_records_false() {
        let (store, _temp) = create_test_store().await;
        let pin = test_pin();
        store.register_pin(&pin).await;
        store.add_pending(pin.id, "https://a").await.unwrap();
        store.add_pending(pin.id, "https://b").await.unwrap();

        store.clear_all(pin.id).await.unwrap();
        assert!(!store.has_records(pin.id).await);
        // Collection stays resolvable, just empty.
        assert_eq!(store.records(pin.id).await.unwrap().len(), 0);
    }

    #[tokio::test]
    async fn test_clear_all_empty_collection_is_noop() {
        let (store, _temp) = create_test_store().await;
        let pin = test_pin();
        store.register_pin(&pin).await;
        assert!(store.clear_all(pin.id).await.is_ok());
    }

    #[tokio::test]
    async fn test_clear_all_unknown_pin_fails() {
        let (store, _temp) = create_test_store().await;
        let result = store.clear_all(PinId::new()).await;
        assert!(matches!(result, Err(StoreError::NoRecordsCollection { .. })));
    }

    #[tokio::test]
    async fn test_attach_image_data() {
        let (store, _temp) = create_test_store().await;
        let pin = test_pin();
        store.register_pin(&pin).await;
        let record = store.add_pending(pin.id, "https://a").await.unwrap();

        store
            .attach_image_data(pin.id, record.id, Bytes::from_static(b"jpeg"))
            .await
            .unwrap();

        let records = store.records(pin.id).await.unwrap();
        assert!(records[0].is_ready());
    }

    #[tokio::test]
    async fn test_attach_to_missing_record_is_silent() {
        let (store, _temp) = create_test_store().await;
        let pin = test_pin();
        store.register_pin(&pin).await;
        let record = store.add_pending(pin.id, "https://a").await.unwrap();
        store.clear_all(pin.id).await.unwrap();

        // Completion arriving after a concurrent clear must no-op.
        let result = store
            .attach_image_data(pin.id, record.id, Bytes::from_static(b"late"))
            .await;
        assert!(result.is_ok());
        assert!(!store.has_records(pin.id).await);
    }

    #[tokio::test]
    async fn test_remove_record() {
        let (store, _temp) = create_test_store().await;
        let pin = test_pin();
        store.register_pin(&pin).await;
        let keep = store.add_pending(pin.id, "https://keep").await.unwrap();
        let gone = store.add_pending(pin.id, "https://gone").await.unwrap();

        store.remove_record(pin.id, gone.id).await.unwrap();

        let records = store.records(pin.id).await.unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].id, keep.id);
    }

    #[tokio::test]
    async fn test_events_fire_on_mutations() {
        let (store, _temp) = create_test_store().await;
        let mut events = store.subscribe();
        let pin = test_pin();
        store.register_pin(&pin).await;

        let record = store.add_pending(pin.id, "https://a").await.unwrap();
        store.remove_record(pin.id, record.id).await.unwrap();
        store.clear_all(pin.id).await.unwrap();

        assert!(matches!(
            events.recv().await.unwrap(),
            StoreEvent::RecordAdded { .. }
        ));
        assert!(matches!(
            events.recv().await.unwrap(),
            StoreEvent::RecordRemoved { .. }
        ));
        assert!(matches!(
            events.recv().await.unwrap(),
            StoreEvent::CollectionCleared { .. }
        ));
    }

    #[tokio::test]
    async fn test_commit_and_reopen_restores_state() {
        let temp_dir = TempDir::new().unwrap();
        let journal_path = temp_dir.path().join("journal.toml");
        let blob_dir = temp_dir.path().join("blobs");
        let pin = test_pin();

        {
            let journal = Journal::at_path(journal_path.clone());
            let blobs = BlobStore::new(blob_dir.clone()).await.unwrap();
            let store = PhotoCacheStore::open(journal, blobs).await.unwrap();

            store.register_pin(&pin).await;
            let record = store.add_pending(pin.id, "https://a").await.unwrap();
            store
                .attach_image_data(pin.id, record.id, Bytes::from_static(b"jpeg bytes"))
                .await
                .unwrap();
            store.commit().await.unwrap();
        }

        let journal = Journal::at_path(journal_path);
        let blobs = BlobStore::new(blob_dir).await.unwrap();
        let reopened = PhotoCacheStore::open(journal, blobs).await.unwrap();

        assert_eq!(reopened.pins().await.len(), 1);
        let records = reopened.records(pin.id).await.unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(
            records[0].image_bytes.as_deref(),
            Some(b"jpeg bytes".as_slice())
        );
    }

    #[tokio::test]
    async fn test_drop_pin_removes_everything() {
        let (store, _temp) = create_test_store().await;
        let pin = test_pin();
        store.register_pin(&pin).await;
        store.add_pending(pin.id, "https://a").await.unwrap();

        assert!(store.drop_pin(pin.id).await);
        assert!(store.records(pin.id).await.is_none());
        assert!(!store.drop_pin(pin.id).await);
    }
}
