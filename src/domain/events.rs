//! Store change events.
//!
//! The cache store announces mutations over plain channels so a view layer
//! can update its own presentation without the core knowing about any
//! particular toolkit.

use tokio::sync::mpsc;

use crate::domain::entities::{PhotoRecord, PinId, RecordId};

/// A change to a pin's photo collection.
#[derive(Debug, Clone)]
pub enum StoreEvent {
    /// A pending record was created for the pin.
    RecordAdded {
        /// Owning pin.
        pin_id: PinId,
        /// The record as created.
        record: PhotoRecord,
    },
    /// A single record was removed from the pin.
    RecordRemoved {
        /// Owning pin.
        pin_id: PinId,
        /// The removed record's id.
        record_id: RecordId,
    },
    /// The pin's whole collection was cleared.
    CollectionCleared {
        /// The cleared pin.
        pin_id: PinId,
    },
}

/// Receiving end of a store event subscription.
pub type StoreEventReceiver = mpsc::UnboundedReceiver<StoreEvent>;

pub(crate) type StoreEventSender = mpsc::UnboundedSender<StoreEvent>;
