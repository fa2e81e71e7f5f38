//! Service wiring.

use std::sync::Arc;

use shared_bus::InMemoryEventBus;
use st_01_scan_ingestion::InMemoryIngestionService;
use tracing::info;

use super::config::NodeConfig;

/// Shared handles for request handlers and background tasks.
pub struct ServiceContainer {
    pub config: NodeConfig,
    pub event_bus: Arc<InMemoryEventBus>,
    pub ingestion: Arc<InMemoryIngestionService>,
}

impl ServiceContainer {
    pub fn new(config: NodeConfig) -> Self {
        let event_bus = Arc::new(InMemoryEventBus::with_capacity(
            config.ingestion.event_channel_capacity,
        ));
        let ingestion = Arc::new(InMemoryIngestionService::in_memory(
            config.ingestion.clone(),
            Arc::clone(&event_bus),
        ));

        info!(
            ordering_policy = ?config.ingestion.ordering_policy,
            fallback = ?config.ingestion.location.fallback_coordinate(),
            acquisition_timeout_ms = config.ingestion.location.acquisition_timeout_ms,
            "Ingestion service ready"
        );

        Self {
            config,
            event_bus,
            ingestion,
        }
    }
}
