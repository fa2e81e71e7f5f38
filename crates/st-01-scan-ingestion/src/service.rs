//! Scan Ingestion Service - the coordinator
//!
//! Wires the location resolver, validator, aggregate store and event bus
//! behind `ScanIngestionApi`.

use std::sync::Arc;

use async_trait::async_trait;
use shared_bus::{EventPublisher, InMemoryEventBus, ShipmentEvent};
use tracing::{debug, info, warn};

use crate::adapters::InMemoryShipmentStore;
use crate::config::IngestionConfig;
use crate::domain::{
    CheckpointCode, FleetSummary, IngestionError, IngestionResult, ScanCode, ScanEvent,
    ScanReceipt, ScanTarget, ScanValidator, Shipment, ShipmentId, ShipmentSpec, ShipmentView,
};
use crate::location::{LocationResolver, ResolvedLocation};
use crate::ports::inbound::{ScanIngestionApi, ScanRequest};
use crate::ports::outbound::{ShipmentStore, SystemTimeSource, TimeSource};

/// Ingestion coordinator.
pub struct ScanIngestionService<S, T, P>
where
    S: ShipmentStore,
    T: TimeSource,
    P: EventPublisher,
{
    config: IngestionConfig,
    store: Arc<S>,
    clock: Arc<T>,
    publisher: Arc<P>,
    resolver: LocationResolver,
    validator: ScanValidator,
}

/// The service over the in-memory store, system clock and in-memory bus.
pub type InMemoryIngestionService =
    ScanIngestionService<InMemoryShipmentStore, SystemTimeSource, InMemoryEventBus>;

impl InMemoryIngestionService {
    pub fn in_memory(config: IngestionConfig, bus: Arc<InMemoryEventBus>) -> Self {
        Self::new(
            config,
            Arc::new(InMemoryShipmentStore::new()),
            Arc::new(SystemTimeSource),
            bus,
        )
    }
}

impl<S, T, P> ScanIngestionService<S, T, P>
where
    S: ShipmentStore,
    T: TimeSource,
    P: EventPublisher,
{
    pub fn new(config: IngestionConfig, store: Arc<S>, clock: Arc<T>, publisher: Arc<P>) -> Self {
        let resolver = LocationResolver::from_config(&config.location);
        let validator = ScanValidator::new(config.ordering_policy);
        Self {
            config,
            store,
            clock,
            publisher,
            resolver,
            validator,
        }
    }

    pub fn config(&self) -> &IngestionConfig {
        &self.config
    }

    pub fn store(&self) -> &Arc<S> {
        &self.store
    }

    fn log_degraded(&self, request: &ScanRequest, resolved: &ResolvedLocation) {
        if !resolved.mode.is_degraded() {
            return;
        }
        let reason = resolved
            .failure
            .as_ref()
            .map(ToString::to_string)
            .unwrap_or_else(|| "device has no positioning".to_string());
        warn!(
            shipment_id = %request.shipment_id,
            checkpoint_id = %request.checkpoint_id,
            actor_id = %request.actor_id,
            mode = %resolved.mode,
            fallback = resolved.coordinate.is_some(),
            reason = %reason,
            "Location degraded, recording scan with fallback"
        );
    }

    async fn publish_scan(&self, shipment_id: ShipmentId, receipt: &ScanReceipt) {
        let event = &receipt.record.event;
        self.publisher
            .publish(ShipmentEvent::CheckpointScanned {
                shipment_id,
                checkpoint_id: event.checkpoint_id,
                actor_id: event.actor_id.clone(),
                resolution_mode: event.resolution_mode,
                advanced: receipt.advanced(),
                scanned_at: event.scanned_at,
                view: receipt.view.clone(),
            })
            .await;
    }
}

#[async_trait]
impl<S, T, P> ScanIngestionApi for ScanIngestionService<S, T, P>
where
    S: ShipmentStore + 'static,
    T: TimeSource + 'static,
    P: EventPublisher + 'static,
{
    async fn create_shipment(&self, spec: ShipmentSpec) -> IngestionResult<Shipment> {
        let shipment = Shipment::create(spec, self.clock.now())?;
        self.store.insert(shipment.clone())?;

        info!(
            shipment_id = %shipment.id,
            title = %shipment.title,
            checkpoints = shipment.total_checkpoints(),
            "Shipment created"
        );

        self.publisher
            .publish(ShipmentEvent::ShipmentCreated {
                shipment_id: shipment.id,
                title: shipment.title.clone(),
                total_checkpoints: shipment.total_checkpoints(),
                created_at: shipment.created_at,
            })
            .await;

        Ok(shipment)
    }

    async fn submit_scan(&self, request: ScanRequest) -> IngestionResult<ScanReceipt> {
        // Only suspension point; no lock is held here.
        let resolved = self.resolver.resolve(&request.device).await;
        self.log_degraded(&request, &resolved);

        let now = self.clock.now();
        let event = ScanEvent {
            checkpoint_id: request.checkpoint_id,
            actor_id: request.actor_id.clone(),
            scanned_at: now,
            coordinate: resolved.coordinate,
            resolution_mode: resolved.mode,
        };

        let receipt = self
            .store
            .apply_scan(request.shipment_id, event, &self.validator, now)
            .map_err(|e| {
                warn!(
                    shipment_id = %request.shipment_id,
                    checkpoint_id = %request.checkpoint_id,
                    actor_id = %request.actor_id,
                    code = e.code(),
                    error = %e,
                    "Scan rejected"
                );
                e
            })?;

        info!(
            shipment_id = %request.shipment_id,
            checkpoint_id = %request.checkpoint_id,
            actor_id = %request.actor_id,
            mode = %resolved.mode,
            disposition = receipt.record.disposition.as_str(),
            progress = receipt.view.progress,
            status = %receipt.view.status,
            "Scan applied"
        );

        self.publish_scan(request.shipment_id, &receipt).await;
        Ok(receipt)
    }

    async fn get_view(&self, shipment_id: ShipmentId) -> IngestionResult<ShipmentView> {
        self.store.read(shipment_id, self.clock.now())
    }

    async fn get_shipment(&self, shipment_id: ShipmentId) -> IngestionResult<Shipment> {
        self.store.snapshot(shipment_id)
    }

    async fn list_views(&self) -> Vec<ShipmentView> {
        let now = self.clock.now();
        self.store
            .shipment_ids()
            .into_iter()
            .filter_map(|id| self.store.read(id, now).ok())
            .collect()
    }

    async fn fleet_summary(&self) -> FleetSummary {
        let summary: FleetSummary = self
            .list_views()
            .await
            .into_iter()
            .map(|view| view.status)
            .collect();
        debug!(total = summary.total, delayed = summary.delayed, "Fleet summary computed");
        summary
    }

    async fn checkpoint_codes(&self, shipment_id: ShipmentId) -> IngestionResult<Vec<CheckpointCode>> {
        let shipment = self.store.snapshot(shipment_id)?;
        Ok(shipment
            .checkpoints()
            .iter()
            .map(|cp| CheckpointCode {
                checkpoint_id: cp.id,
                position: cp.position,
                name: cp.name.clone(),
                code: ScanCode::render(&self.config.scan_base_url, cp.id),
            })
            .collect())
    }

    async fn resolve_scan_code(&self, code: &str) -> IngestionResult<ScanTarget> {
        let checkpoint_id = ScanCode::parse(code)?;
        let shipment_id = self
            .store
            .locate_checkpoint(checkpoint_id)
            .ok_or_else(|| IngestionError::invalid_code(code, "no shipment owns this checkpoint"))?;
        Ok(ScanTarget {
            shipment_id,
            checkpoint_id,
        })
    }
}
