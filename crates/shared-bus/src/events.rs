//! # Shipment Events
//!
//! Every event that flows through the shared bus.

use serde::{Deserialize, Serialize};
use shared_types::{ActorId, CheckpointId, ResolutionMode, ShipmentId, ShipmentView, Timestamp};

/// All events that can be published to the bus.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum ShipmentEvent {
    // =========================================================================
    // LIFECYCLE
    // =========================================================================
    /// A shipment was created with its full checkpoint sequence.
    ShipmentCreated {
        shipment_id: ShipmentId,
        title: String,
        total_checkpoints: usize,
        created_at: Timestamp,
    },

    // =========================================================================
    // SCANS
    // =========================================================================
    /// A scan was applied to a checkpoint.
    ///
    /// Published after the per-shipment lock is released; `view` is the
    /// snapshot computed inside the lock.
    CheckpointScanned {
        shipment_id: ShipmentId,
        checkpoint_id: CheckpointId,
        actor_id: ActorId,
        resolution_mode: ResolutionMode,
        /// True if this scan moved the checkpoint from pending to completed.
        advanced: bool,
        scanned_at: Timestamp,
        view: ShipmentView,
    },
}

impl ShipmentEvent {
    /// Which feed this event belongs to.
    #[must_use]
    pub fn topic(&self) -> EventTopic {
        match self {
            Self::ShipmentCreated { .. } => EventTopic::Lifecycle,
            Self::CheckpointScanned { .. } => EventTopic::Scans,
        }
    }

    /// The shipment this event is about.
    #[must_use]
    pub fn shipment_id(&self) -> ShipmentId {
        match self {
            Self::ShipmentCreated { shipment_id, .. }
            | Self::CheckpointScanned { shipment_id, .. } => *shipment_id,
        }
    }
}

/// Event topics for subscription filtering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EventTopic {
    /// Shipment creation.
    Lifecycle,
    /// Checkpoint scans.
    Scans,
}

/// What an observer wants to see. An empty list places no constraint.
#[derive(Debug, Clone, Default)]
pub struct EventFilter {
    pub topics: Vec<EventTopic>,
    pub shipments: Vec<ShipmentId>,
}

impl EventFilter {
    /// Everything, as the admin dashboard sees it.
    #[must_use]
    pub fn all() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn topics(topics: Vec<EventTopic>) -> Self {
        Self {
            topics,
            shipments: Vec::new(),
        }
    }

    /// Create a filter for a single shipment's events (a tracking display).
    #[must_use]
    pub fn shipment(shipment_id: ShipmentId) -> Self {
        Self {
            topics: Vec::new(),
            shipments: vec![shipment_id],
        }
    }

    #[must_use]
    pub fn matches(&self, event: &ShipmentEvent) -> bool {
        fn admits<T: PartialEq>(allowed: &[T], value: &T) -> bool {
            allowed.is_empty() || allowed.contains(value)
        }
        admits(&self.topics, &event.topic()) && admits(&self.shipments, &event.shipment_id())
    }
}
