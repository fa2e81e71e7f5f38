//! Cross-crate integration tests.

pub mod concurrency;
pub mod dashboard;
pub mod flows;
pub mod runtime;

#[cfg(test)]
pub(crate) mod fixtures {
    use std::sync::Arc;

    use chrono::{Duration, Utc};
    use shared_bus::InMemoryEventBus;
    use st_01_scan_ingestion::{
        CheckpointSpec, InMemoryIngestionService, IngestionConfig, ShipmentSpec,
    };

    pub fn service(config: IngestionConfig) -> (Arc<InMemoryIngestionService>, Arc<InMemoryEventBus>) {
        let bus = Arc::new(InMemoryEventBus::new());
        let service = Arc::new(InMemoryIngestionService::in_memory(config, Arc::clone(&bus)));
        (service, bus)
    }

    pub fn spec(checkpoints: usize, eta_hours: i64) -> ShipmentSpec {
        ShipmentSpec {
            title: "Machinery to Hamburg".into(),
            origin: "Mundra".into(),
            destination: "Hamburg".into(),
            description: None,
            estimated_delivery: Utc::now() + Duration::hours(eta_hours),
            checkpoints: (0..checkpoints)
                .map(|i| CheckpointSpec::new(format!("Waypoint {}", i + 1), ""))
                .collect(),
        }
    }
}
