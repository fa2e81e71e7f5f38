//! # Domain Layer - Scan Ingestion
//!
//! Pure business logic. Nothing here locks, sleeps or performs I/O; the
//! aggregate store and the coordinator pass snapshots in.
//!
//! ## Components
//!
//! - `entities`: Shipment, Checkpoint, ScanEvent, ScanRecord, creation specs
//! - `validator`: ScanValidator and the ordering policy
//! - `progress`: the progress/status deriver
//! - `scan_code`: scannable checkpoint code rendering and parsing
//! - `value_objects`: ScanReceipt, ScanTarget, CheckpointCode, FleetSummary
//! - `errors`: IngestionError enumeration

pub mod entities;
pub mod errors;
pub mod progress;
pub mod scan_code;
pub mod validator;
pub mod value_objects;

pub use entities::*;
pub use errors::*;
pub use progress::{derive, derive_status, progress_percent};
pub use scan_code::ScanCode;
pub use validator::{OrderingPolicy, ScanDisposition, ScanValidator};
pub use value_objects::*;

pub use shared_types::{
    ActorId, CheckpointId, CheckpointState, Coordinate, ResolutionMode, ShipmentId,
    ShipmentStatus, ShipmentView, Timestamp,
};
