//! # Shared Types Crate
//!
//! Identifiers, coordinates and the derived `ShipmentView` read model used by
//! every crate in the workspace.
//!
//! ## Design Principles
//!
//! - **Single Source of Truth**: every type that crosses a crate boundary
//!   (engine → bus → runtime) is defined here.
//! - **Opaque Identifiers**: shipment and checkpoint identifiers are UUID
//!   newtypes; a checkpoint identifier is globally unique so that a scannable
//!   code only needs to embed the checkpoint.
//! - **Derived, never stored**: `ShipmentView` is a value, recomputed from
//!   checkpoint state on every read.

pub mod entities;
pub mod errors;
pub mod view;

pub use entities::*;
pub use errors::*;
pub use view::*;

/// Timestamp type used across the workspace.
pub type Timestamp = chrono::DateTime<chrono::Utc>;
