//! On-disk storage for downloaded image bytes.

use std::path::PathBuf;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};

use bytes::Bytes;
use sha2::{Digest, Sha256};
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tracing::{debug, trace, warn};

use crate::domain::errors::StoreError;

/// Stores image bytes as content-addressed files, one per source URL.
///
/// File names are derived from a digest of the URL so the same photo
/// referenced by two pins shares one blob.
pub struct BlobStore {
    blob_dir: PathBuf,
    current_size: AtomicU64,
    item_count: AtomicUsize,
}

impl BlobStore {
    /// Opens (or creates) a blob store in the given directory.
    ///
    /// # Errors
    /// Returns error if the directory cannot be created or scanned.
    pub async fn new(blob_dir: PathBuf) -> Result<Self, StoreError> {
        fs::create_dir_all(&blob_dir)
            .await
            .map_err(|e| StoreError::commit(format!("failed to create blob dir: {e}")))?;

        let mut total_size = 0u64;
        let mut count = 0usize;

        let mut entries = fs::read_dir(&blob_dir)
            .await
            .map_err(|e| StoreError::commit(format!("failed to read blob dir: {e}")))?;

        while let Ok(Some(entry)) = entries.next_entry().await {
            let path = entry.path();
            if path.extension().is_some_and(|ext| ext == "img")
                && let Ok(meta) = entry.metadata().await
            {
                total_size += meta.len();
                count += 1;
            }
        }

        Ok(Self {
            blob_dir,
            current_size: AtomicU64::new(total_size),
            item_count: AtomicUsize::new(count),
        })
    }

    /// Content address for a source URL.
    fn blob_key(url: &str) -> String {
        let mut hasher = Sha256::new();
        hasher.update(url.as_bytes());
        let digest = hasher.finalize();
        hex::encode(&digest[..16])
    }

    fn blob_path(&self, url: &str) -> PathBuf {
        self.blob_dir.join(format!("{}.img", Self::blob_key(url)))
    }

    /// Reads the bytes stored for a URL, if any.
    pub async fn read(&self, url: &str) -> Option<Bytes> {
        let path = self.blob_path(url);
        if let Ok(bytes) = fs::read(&path).await {
            trace!(url = %url, path = %path.display(), "Blob hit");
            Some(Bytes::from(bytes))
        } else {
            trace!(url = %url, "Blob miss");
            None
        }
    }

    /// Writes the bytes for a URL, replacing any previous blob.
    ///
    /// # Errors
    /// Returns error if the file cannot be created or written.
    pub async fn write(&self, url: &str, bytes: &[u8]) -> Result<(), StoreError> {
        let path = self.blob_path(url);

        let old_size = fs::metadata(&path).await.map(|m| m.len()).ok();

        let mut file = fs::File::create(&path)
            .await
            .map_err(|e| StoreError::commit(format!("failed to create blob file: {e}")))?;

        file.write_all(bytes)
            .await
            .map_err(|e| StoreError::commit(format!("failed to write blob file: {e}")))?;

        file.flush()
            .await
            .map_err(|e| StoreError::commit(format!("failed to flush blob file: {e}")))?;

        let new_size = bytes.len() as u64;
        if let Some(old) = old_size {
            if new_size > old {
                self.current_size
                    .fetch_add(new_size - old, Ordering::Relaxed);
            } else {
                self.current_size
                    .fetch_sub(old - new_size, Ordering::Relaxed);
            }
        } else {
            self.current_size.fetch_add(new_size, Ordering::Relaxed);
            self.item_count.fetch_add(1, Ordering::Relaxed);
        }

        debug!(url = %url, size = bytes.len(), "Blob stored");

        Ok(())
    }

    /// Removes the blob for a URL. Missing blobs are a no-op.
    pub async fn remove(&self, url: &str) {
        let path = self.blob_path(url);
        let size = fs::metadata(&path).await.map(|m| m.len()).ok();
        if let Err(e) = fs::remove_file(&path).await {
            if e.kind() != std::io::ErrorKind::NotFound {
                warn!(url = %url, error = %e, "Failed to remove blob");
            }
        } else if let Some(s) = size {
            self.current_size.fetch_sub(s, Ordering::Relaxed);
            self.item_count.fetch_sub(1, Ordering::Relaxed);
            debug!(url = %url, "Blob removed");
        }
    }

    /// Removes every stored blob.
    ///
    /// # Errors
    /// Returns error if the blob directory cannot be read.
    pub async fn clear(&self) -> Result<(), StoreError> {
        let mut entries = fs::read_dir(&self.blob_dir)
            .await
            .map_err(|e| StoreError::commit(format!("failed to read blob dir: {e}")))?;

        while let Some(entry) = entries
            .next_entry()
            .await
            .map_err(|e| StoreError::commit(format!("failed to read blob entry: {e}")))?
        {
            let path = entry.path();
            if path.extension().is_some_and(|ext| ext == "img")
                && fs::remove_file(&path).await.is_err()
            {
                warn!(path = %path.display(), "Failed to remove blob file");
            }
        }

        self.current_size.store(0, Ordering::Relaxed);
        self.item_count.store(0, Ordering::Relaxed);
        debug!("Blob store cleared");
        Ok(())
    }

    /// Checks whether bytes are stored for a URL.
    pub async fn contains(&self, url: &str) -> bool {
        fs::try_exists(&self.blob_path(url)).await.unwrap_or(false)
    }

    /// Total stored bytes.
    pub fn current_size(&self) -> u64 {
        self.current_size.load(Ordering::Relaxed)
    }

    /// Number of stored blobs.
    pub fn len(&self) -> usize {
        self.item_count.load(Ordering::Relaxed)
    }

    /// True if nothing is stored.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    async fn create_test_store() -> (BlobStore, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let store = BlobStore::new(temp_dir.path().to_path_buf()).await.unwrap();
        (store, temp_dir)
    }

    #[tokio::test]
    async fn test_write_and_read() {
        let (store, _temp) = create_test_store().await;
        let url = "https://live.staticflickr.com/65535/1_a_w.jpg";

        store.write(url, b"jpeg bytes").await.unwrap();
        assert_eq!(store.read(url).await.unwrap(), Bytes::from_static(b"jpeg bytes"));
    }

    #[tokio::test]
    async fn test_miss_returns_none() {
        let (store, _temp) = create_test_store().await;
        assert!(store.read("https://example.com/missing.jpg").await.is_none());
    }

    #[tokio::test]
    async fn test_remove() {
        let (store, _temp) = create_test_store().await;
        let url = "https://example.com/a.jpg";

        store.write(url, b"data").await.unwrap();
        assert!(store.contains(url).await);

        store.remove(url).await;
        assert!(!store.contains(url).await);
    }

    #[tokio::test]
    async fn test_accounting() {
        let (store, _temp) = create_test_store().await;

        store.write("https://a", b"hello").await.unwrap();
        store.write("https://b", b"world!").await.unwrap();
        assert_eq!(store.len(), 2);
        assert_eq!(store.current_size(), 11);

        store.write("https://a", b"hey").await.unwrap();
        assert_eq!(store.len(), 2);
        assert_eq!(store.current_size(), 9);

        store.remove("https://b").await;
        assert_eq!(store.len(), 1);
        assert_eq!(store.current_size(), 3);

        store.clear().await.unwrap();
        assert_eq!(store.len(), 0);
        assert_eq!(store.current_size(), 0);
    }

    #[tokio::test]
    async fn test_rescan_on_open() {
        let temp_dir = TempDir::new().unwrap();
        {
            let store = BlobStore::new(temp_dir.path().to_path_buf()).await.unwrap();
            store.write("https://a", b"12345").await.unwrap();
        }
        let reopened = BlobStore::new(temp_dir.path().to_path_buf()).await.unwrap();
        assert_eq!(reopened.len(), 1);
        assert_eq!(reopened.current_size(), 5);
    }
}
