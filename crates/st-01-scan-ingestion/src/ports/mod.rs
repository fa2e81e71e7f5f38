//! Ports (hexagonal architecture).
//!
//! - `inbound`: the API this crate offers (`ScanIngestionApi`)
//! - `outbound`: what it needs from the outside (store, clock, positioning)

pub mod inbound;
pub mod outbound;

pub use inbound::ScanIngestionApi;
pub use outbound::{PositionError, PositionSource, ShipmentStore, SystemTimeSource, TimeSource};
