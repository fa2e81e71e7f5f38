//! # Inbound Port - ScanIngestionApi
//!
//! Primary driving port used by creation forms, scanner clients and
//! dashboards.
//!
//! | Method | Typical caller |
//! |--------|----------------|
//! | `create_shipment` | shipment creation form |
//! | `submit_scan` | field scanner client |
//! | `resolve_scan_code` | field scanner client, before `submit_scan` |
//! | `get_view`, `list_views`, `fleet_summary` | dashboards, tracking page |
//! | `get_shipment`, `checkpoint_codes` | admin views, label printing |

use async_trait::async_trait;

use crate::domain::{
    ActorId, CheckpointCode, CheckpointId, FleetSummary, IngestionResult, ScanReceipt, ScanTarget,
    Shipment, ShipmentId, ShipmentSpec, ShipmentView,
};
use crate::location::DeviceCapability;

/// One scan submission.
#[derive(Debug, Clone)]
pub struct ScanRequest {
    pub shipment_id: ShipmentId,
    pub checkpoint_id: CheckpointId,
    pub actor_id: ActorId,
    pub device: DeviceCapability,
}

impl ScanRequest {
    pub fn new(
        shipment_id: ShipmentId,
        checkpoint_id: CheckpointId,
        actor_id: impl Into<String>,
        device: DeviceCapability,
    ) -> Self {
        Self {
            shipment_id,
            checkpoint_id,
            actor_id: ActorId::new(actor_id),
            device,
        }
    }

    /// Build a request from a resolved scan code.
    pub fn for_target(
        target: ScanTarget,
        actor_id: impl Into<String>,
        device: DeviceCapability,
    ) -> Self {
        Self::new(target.shipment_id, target.checkpoint_id, actor_id, device)
    }
}

/// Primary API of the ingestion engine.
#[async_trait]
pub trait ScanIngestionApi: Send + Sync {
    /// Validate and store a new shipment.
    ///
    /// # Errors
    /// - `InvalidSpec`: empty title, origin, destination, checkpoint list or
    ///   checkpoint name
    async fn create_shipment(&self, spec: ShipmentSpec) -> IngestionResult<Shipment>;

    /// Resolve location, then atomically validate and apply a scan.
    ///
    /// Location degradation is recorded on the event, never returned.
    ///
    /// # Errors
    /// - `ShipmentNotFound`
    /// - `CheckpointNotFound`: checkpoint not in this shipment's sequence
    async fn submit_scan(&self, request: ScanRequest) -> IngestionResult<ScanReceipt>;

    /// Current derived view.
    async fn get_view(&self, shipment_id: ShipmentId) -> IngestionResult<ShipmentView>;

    /// Full snapshot including scan histories.
    async fn get_shipment(&self, shipment_id: ShipmentId) -> IngestionResult<Shipment>;

    /// Views of every shipment, in creation order.
    async fn list_views(&self) -> Vec<ShipmentView>;

    /// Shipment counts per status.
    async fn fleet_summary(&self) -> FleetSummary;

    /// Scan codes for every checkpoint of a shipment, in sequence order.
    async fn checkpoint_codes(&self, shipment_id: ShipmentId) -> IngestionResult<Vec<CheckpointCode>>;

    /// Map a scanned code back to its shipment and checkpoint.
    ///
    /// # Errors
    /// - `InvalidScanCode`: malformed, or no shipment owns the checkpoint
    async fn resolve_scan_code(&self, code: &str) -> IngestionResult<ScanTarget>;
}
