//! Outbound (driven) ports of the ingestion engine.

use async_trait::async_trait;
use chrono::Utc;
use thiserror::Error;

use crate::domain::{
    CheckpointId, Coordinate, IngestionResult, ScanEvent, ScanReceipt, ScanValidator, Shipment,
    ShipmentId, ShipmentView, Timestamp,
};

// =============================================================================
// POSITIONING
// =============================================================================

/// Why a live position could not be obtained.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PositionError {
    #[error("Location permission denied")]
    PermissionDenied,

    #[error("Position unavailable: {0}")]
    Unavailable(String),

    #[error("Position acquisition timed out after {after_ms}ms")]
    Timeout { after_ms: u64 },

    #[error("Position fix out of range: {0}")]
    InvalidFix(Coordinate),
}

/// A device's live positioning capability.
///
/// One call is one acquisition attempt. The caller bounds the wait.
#[async_trait]
pub trait PositionSource: Send + Sync {
    async fn acquire(&self) -> Result<Coordinate, PositionError>;
}

// =============================================================================
// TIME
// =============================================================================

/// Time source for scan timestamps and status derivation.
///
/// Abstracted to allow testing with deterministic time.
pub trait TimeSource: Send + Sync {
    fn now(&self) -> Timestamp;
}

/// Default system time source.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemTimeSource;

impl TimeSource for SystemTimeSource {
    fn now(&self) -> Timestamp {
        Utc::now()
    }
}

// =============================================================================
// STORAGE
// =============================================================================

/// Canonical shipment state.
///
/// Implementations serialize `apply_scan` per shipment. Methods are
/// synchronous; none may be called while holding a lock across an `.await`.
pub trait ShipmentStore: Send + Sync {
    /// Store a newly created shipment and index its checkpoints.
    ///
    /// # Errors
    /// - `DuplicateShipment`
    fn insert(&self, shipment: Shipment) -> IngestionResult<()>;

    /// Validate and apply one scan as a single atomic unit, returning the view
    /// derived inside the same critical section.
    fn apply_scan(
        &self,
        shipment_id: ShipmentId,
        event: ScanEvent,
        validator: &ScanValidator,
        now: Timestamp,
    ) -> IngestionResult<ScanReceipt>;

    /// Derived view of a consistent snapshot.
    fn read(&self, shipment_id: ShipmentId, now: Timestamp) -> IngestionResult<ShipmentView>;

    /// Full copy of a shipment, histories included.
    fn snapshot(&self, shipment_id: ShipmentId) -> IngestionResult<Shipment>;

    /// Which shipment owns a checkpoint.
    fn locate_checkpoint(&self, checkpoint_id: CheckpointId) -> Option<ShipmentId>;

    /// All shipment identifiers, in insertion order.
    fn shipment_ids(&self) -> Vec<ShipmentId>;

    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Mock time source for testing.
#[cfg(test)]
pub struct MockTimeSource {
    millis: std::sync::atomic::AtomicI64,
}

#[cfg(test)]
impl MockTimeSource {
    pub fn new(initial: Timestamp) -> Self {
        Self {
            millis: std::sync::atomic::AtomicI64::new(initial.timestamp_millis()),
        }
    }

    pub fn advance(&self, by: chrono::Duration) {
        self.millis
            .fetch_add(by.num_milliseconds(), std::sync::atomic::Ordering::SeqCst);
    }

    pub fn set(&self, time: Timestamp) {
        self.millis
            .store(time.timestamp_millis(), std::sync::atomic::Ordering::SeqCst);
    }
}

#[cfg(test)]
impl TimeSource for MockTimeSource {
    fn now(&self) -> Timestamp {
        let millis = self.millis.load(std::sync::atomic::Ordering::SeqCst);
        chrono::DateTime::from_timestamp_millis(millis).unwrap_or_default()
    }
}
