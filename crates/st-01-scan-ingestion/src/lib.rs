//! # st-01-scan-ingestion
//!
//! Checkpoint scan ingestion and shipment progress derivation.
//!
//! ## Purpose
//!
//! Field actors (mariners, drivers) scan the code printed at each checkpoint
//! of a multi-leg shipment. This crate validates those scans, resolves the
//! device location with graceful degradation, applies them atomically to the
//! shipment and recomputes progress and status.
//!
//! ## Domain Invariants
//!
//! | Invariant | Enforcement Location |
//! |-----------|---------------------|
//! | Checkpoint sequence fixed at creation | `domain/entities.rs` - `Shipment::create()`, no mutator exists |
//! | Completed count == completed checkpoints | `domain/progress.rs` - always counted, never cached |
//! | Scan history append-only | `domain/entities.rs` - `Checkpoint::record()` |
//! | Completion monotonic | `domain/entities.rs` - only `Advance` writes state |
//! | No lost updates per shipment | `adapters/memory_store.rs` - per-shipment `Mutex` |
//!
//! ## Scan Flow
//!
//! ```text
//! submit_scan(request)
//!     │
//!     ├── LocationResolver::resolve()          (bounded wait, no lock held)
//!     │        └── gps | fallback-error | fallback-unsupported
//!     │
//!     ├── build ScanEvent (clock port)
//!     │
//!     ├── ShipmentStore::apply_scan()          ┐
//!     │        ├── lock shipment               │ atomic, no .await
//!     │        ├── ScanValidator::validate()   │
//!     │        ├── Checkpoint::record()        │
//!     │        └── progress::derive()          ┘
//!     │
//!     └── publish CheckpointScanned → shared-bus → dashboards
//! ```
//!
//! ## Module Structure (Hexagonal Architecture)
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │  adapters/  - InMemoryShipmentStore, position sources           │
//! │  service.rs - ScanIngestionService (the coordinator)            │
//! │  location.rs - LocationResolver                                 │
//! └─────────────────────────────────────────────────────────────────┘
//!                          ↑ implements / uses ↑
//! ┌─────────────────────────────────────────────────────────────────┐
//! │  ports/inbound.rs  - ScanIngestionApi                           │
//! │  ports/outbound.rs - ShipmentStore, PositionSource, TimeSource  │
//! └─────────────────────────────────────────────────────────────────┘
//!                          ↑ uses ↑
//! ┌─────────────────────────────────────────────────────────────────┐
//! │  domain/entities.rs      - Shipment, Checkpoint, ScanEvent      │
//! │  domain/validator.rs     - ScanValidator, OrderingPolicy        │
//! │  domain/progress.rs      - derive() → ShipmentView              │
//! │  domain/scan_code.rs     - ScanCode render/parse                │
//! │  domain/value_objects.rs - ScanReceipt, FleetSummary, ...       │
//! │  domain/errors.rs        - IngestionError                       │
//! └─────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Example
//!
//! ```rust,ignore
//! use st_01_scan_ingestion::{DeviceCapability, IngestionConfig, InMemoryIngestionService, ScanRequest};
//!
//! let service = InMemoryIngestionService::in_memory(IngestionConfig::default(), bus);
//! let shipment = service.create_shipment(spec).await?;
//! let receipt = service
//!     .submit_scan(ScanRequest::new(shipment.id, checkpoint_id, "driver-7", DeviceCapability::Unsupported))
//!     .await?;
//! println!("{}% {}", receipt.view.progress, receipt.view.status);
//! ```

pub mod adapters;
pub mod config;
pub mod domain;
pub mod location;
pub mod ports;
pub mod service;

pub use adapters::{
    DelayedPositionSource, FailingPositionSource, FixedPositionSource, InMemoryShipmentStore,
};
pub use config::{ConfigError, IngestionConfig, LocationConfig};
pub use domain::*;
pub use location::{DeviceCapability, LocationResolver, ResolvedLocation};
pub use ports::inbound::{ScanIngestionApi, ScanRequest};
pub use ports::outbound::{
    PositionError, PositionSource, ShipmentStore, SystemTimeSource, TimeSource,
};
pub use service::{InMemoryIngestionService, ScanIngestionService};
