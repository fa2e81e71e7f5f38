//! Adapters implementing the outbound ports.

pub mod memory_store;
pub mod position;

pub use memory_store::InMemoryShipmentStore;
pub use position::{DelayedPositionSource, FailingPositionSource, FixedPositionSource};
