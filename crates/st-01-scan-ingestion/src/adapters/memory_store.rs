//! In-memory shipment aggregate store.
//!
//! Each shipment sits behind its own `parking_lot::Mutex`. The `DashMap`
//! shard lock is held only long enough to clone the shipment's `Arc`, so
//! scans on different shipments never contend and scans on one shipment
//! apply in lock-acquisition order.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use parking_lot::{Mutex, RwLock};
use tracing::debug;

use crate::domain::{
    derive, CheckpointId, IngestionError, IngestionResult, ScanEvent, ScanReceipt, ScanValidator,
    Shipment, ShipmentId, ShipmentView, Timestamp,
};
use crate::ports::outbound::ShipmentStore;

type ShipmentSlot = Arc<Mutex<Shipment>>;

/// Scan outcomes since the store was created.
#[derive(Debug, Default)]
pub struct StoreStats {
    scans_applied: AtomicU64,
    scans_rejected: AtomicU64,
}

impl StoreStats {
    /// Scans committed to a shipment, including repeats.
    pub fn applied(&self) -> u64 {
        self.scans_applied.load(Ordering::Relaxed)
    }

    /// Scans refused by validation.
    pub fn rejected(&self) -> u64 {
        self.scans_rejected.load(Ordering::Relaxed)
    }
}

pub struct InMemoryShipmentStore {
    shipments: DashMap<ShipmentId, ShipmentSlot>,
    /// Checkpoint → owning shipment, for scan-code resolution.
    checkpoint_index: DashMap<CheckpointId, ShipmentId>,
    /// Creation order; touched only by `insert` and `shipment_ids`.
    order: RwLock<Vec<ShipmentId>>,
    stats: StoreStats,
}

impl Default for InMemoryShipmentStore {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryShipmentStore {
    pub fn new() -> Self {
        Self {
            shipments: DashMap::new(),
            checkpoint_index: DashMap::new(),
            order: RwLock::new(Vec::new()),
            stats: StoreStats::default(),
        }
    }

    pub fn stats(&self) -> &StoreStats {
        &self.stats
    }

    fn slot(&self, shipment_id: &ShipmentId) -> Option<ShipmentSlot> {
        self.shipments.get(shipment_id).map(|entry| Arc::clone(entry.value()))
    }

    fn apply_locked(
        &self,
        slot: Option<&ShipmentSlot>,
        shipment_id: ShipmentId,
        event: ScanEvent,
        validator: &ScanValidator,
        now: Timestamp,
    ) -> IngestionResult<ScanReceipt> {
        let checkpoint_id = event.checkpoint_id;
        let mut guard = slot.map(|s| s.lock());

        let disposition =
            validator.validate(guard.as_deref(), shipment_id, checkpoint_id, &event.actor_id)?;

        let shipment = guard
            .as_deref_mut()
            .ok_or(IngestionError::ShipmentNotFound(shipment_id))?;
        let checkpoint = shipment
            .checkpoint_mut(&checkpoint_id)
            .ok_or(IngestionError::CheckpointNotFound {
                shipment_id,
                checkpoint_id,
            })?;

        let record = checkpoint.record(event, disposition);
        let view = derive(shipment, now);

        Ok(ScanReceipt { view, record })
    }
}

impl ShipmentStore for InMemoryShipmentStore {
    fn insert(&self, shipment: Shipment) -> IngestionResult<()> {
        let shipment_id = shipment.id;
        let checkpoint_ids: Vec<CheckpointId> =
            shipment.checkpoints().iter().map(|cp| cp.id).collect();

        match self.shipments.entry(shipment_id) {
            Entry::Occupied(_) => return Err(IngestionError::DuplicateShipment(shipment_id)),
            Entry::Vacant(slot) => {
                slot.insert(Arc::new(Mutex::new(shipment)));
            }
        }

        for checkpoint_id in &checkpoint_ids {
            self.checkpoint_index.insert(*checkpoint_id, shipment_id);
        }
        self.order.write().push(shipment_id);

        debug!(
            shipment_id = %shipment_id,
            checkpoints = checkpoint_ids.len(),
            "Stored shipment"
        );
        Ok(())
    }

    fn apply_scan(
        &self,
        shipment_id: ShipmentId,
        event: ScanEvent,
        validator: &ScanValidator,
        now: Timestamp,
    ) -> IngestionResult<ScanReceipt> {
        let slot = self.slot(&shipment_id);
        let result = self.apply_locked(slot.as_ref(), shipment_id, event, validator, now);

        let counter = match &result {
            Ok(_) => &self.stats.scans_applied,
            Err(_) => &self.stats.scans_rejected,
        };
        counter.fetch_add(1, Ordering::Relaxed);
        result
    }

    fn read(&self, shipment_id: ShipmentId, now: Timestamp) -> IngestionResult<ShipmentView> {
        let slot = self
            .slot(&shipment_id)
            .ok_or(IngestionError::ShipmentNotFound(shipment_id))?;
        let guard = slot.lock();
        Ok(derive(&guard, now))
    }

    fn snapshot(&self, shipment_id: ShipmentId) -> IngestionResult<Shipment> {
        let slot = self
            .slot(&shipment_id)
            .ok_or(IngestionError::ShipmentNotFound(shipment_id))?;
        let guard = slot.lock();
        Ok(guard.clone())
    }

    fn locate_checkpoint(&self, checkpoint_id: CheckpointId) -> Option<ShipmentId> {
        self.checkpoint_index.get(&checkpoint_id).map(|e| *e.value())
    }

    fn shipment_ids(&self) -> Vec<ShipmentId> {
        self.order.read().clone()
    }

    fn len(&self) -> usize {
        self.shipments.len()
    }
}
