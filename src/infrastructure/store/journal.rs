//! Persisted snapshot of pins and photo record metadata.

use std::path::PathBuf;

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use tokio::fs;
use tracing::warn;

use crate::domain::entities::{Pin, PinId, RecordId};
use crate::domain::errors::StoreError;

/// One persisted photo record: metadata only, bytes live in the blob store.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecordEntry {
    /// Record identity.
    pub id: RecordId,
    /// Owning pin.
    pub pin_id: PinId,
    /// The URL the photo was discovered at.
    pub source_url: String,
    /// Whether downloaded bytes exist for this record.
    pub has_image: bool,
}

/// The full persisted state.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct JournalSnapshot {
    /// All placed pins.
    #[serde(default)]
    pub pins: Vec<Pin>,
    /// All photo records across pins.
    #[serde(default)]
    pub records: Vec<RecordEntry>,
}

/// TOML-file journal for the cache store.
///
/// If project directories cannot be determined, persistence is disabled
/// and every commit becomes a no-op.
#[derive(Debug, Clone)]
pub struct Journal {
    journal_path: Option<PathBuf>,
}

impl Default for Journal {
    fn default() -> Self {
        Self::new()
    }
}

impl Journal {
    /// Creates a journal at the default per-user data location.
    #[must_use]
    pub fn new() -> Self {
        if let Some(proj_dirs) = ProjectDirs::from("dev", "wanderpin", "wanderpin") {
            Self {
                journal_path: Some(proj_dirs.data_dir().join("journal.toml")),
            }
        } else {
            warn!("Failed to determine project directories. Journal persistence disabled.");
            Self { journal_path: None }
        }
    }

    /// Creates a journal at an explicit file path.
    #[must_use]
    pub fn at_path(path: PathBuf) -> Self {
        Self {
            journal_path: Some(path),
        }
    }

    /// Loads the persisted snapshot.
    ///
    /// A missing file yields the default empty snapshot; an unreadable or
    /// corrupt file is reported and replaced by the default.
    ///
    /// # Errors
    /// Returns error if an existing journal file cannot be read.
    pub async fn load(&self) -> Result<JournalSnapshot, StoreError> {
        let Some(path) = &self.journal_path else {
            return Ok(JournalSnapshot::default());
        };

        if !path.exists() {
            return Ok(JournalSnapshot::default());
        }

        let content = fs::read_to_string(path)
            .await
            .map_err(|e| StoreError::commit(format!("failed to read journal: {e}")))?;

        match toml::from_str(&content) {
            Ok(snapshot) => Ok(snapshot),
            Err(e) => {
                warn!(error = %e, "Journal file corrupt, starting empty");
                Ok(JournalSnapshot::default())
            }
        }
    }

    /// Writes the snapshot to disk.
    ///
    /// # Errors
    /// Returns error if the directory cannot be created, the snapshot
    /// cannot be serialized, or the file cannot be written.
    pub async fn save(&self, snapshot: &JournalSnapshot) -> Result<(), StoreError> {
        let Some(path) = &self.journal_path else {
            return Ok(());
        };

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .await
                .map_err(|e| StoreError::commit(format!("failed to create journal dir: {e}")))?;
        }

        let content = toml::to_string(snapshot)
            .map_err(|e| StoreError::commit(format!("failed to serialize journal: {e}")))?;

        fs::write(path, content)
            .await
            .map_err(|e| StoreError::commit(format!("failed to write journal: {e}")))?;

        Ok(())
    }
}
