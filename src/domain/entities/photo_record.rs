//! Photo record entity.

use bytes::Bytes;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::pin::PinId;

/// Unique identifier for a photo record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RecordId(pub Uuid);

impl RecordId {
    /// Generates a fresh record identifier.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for RecordId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for RecordId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<Uuid> for RecordId {
    fn from(value: Uuid) -> Self {
        Self(value)
    }
}

/// One discovered photo belonging to a pin.
///
/// Created in the pending state the moment its URL is discovered; becomes
/// ready once the downloaded bytes are attached. The source URL never
/// changes after creation.
#[derive(Debug, Clone)]
pub struct PhotoRecord {
    /// Stable identity.
    pub id: RecordId,
    /// Owning pin.
    pub pin_id: PinId,
    source_url: String,
    /// Downloaded image bytes, absent while the fetch is outstanding.
    pub image_bytes: Option<Bytes>,
}

impl PhotoRecord {
    /// Creates a pending record for a freshly discovered URL.
    #[must_use]
    pub fn pending(pin_id: PinId, source_url: impl Into<String>) -> Self {
        Self {
            id: RecordId::new(),
            pin_id,
            source_url: source_url.into(),
            image_bytes: None,
        }
    }

    /// The URL the photo was discovered at.
    #[must_use]
    pub fn source_url(&self) -> &str {
        &self.source_url
    }

    /// True while the image bytes have not arrived yet.
    #[must_use]
    pub const fn is_pending(&self) -> bool {
        self.image_bytes.is_none()
    }

    /// True once the image bytes are attached.
    #[must_use]
    pub const fn is_ready(&self) -> bool {
        self.image_bytes.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_starts_pending() {
        let record = PhotoRecord::pending(PinId::new(), "https://example.com/a.jpg");
        assert!(record.is_pending());
        assert!(!record.is_ready());
        assert_eq!(record.source_url(), "https://example.com/a.jpg");
    }

    #[test]
    fn test_record_ready_after_bytes() {
        let mut record = PhotoRecord::pending(PinId::new(), "https://example.com/a.jpg");
        record.image_bytes = Some(Bytes::from_static(b"jpeg"));
        assert!(record.is_ready());
    }
}
