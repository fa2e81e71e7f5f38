//! # Node Runtime Library
//!
//! Exposes the runtime's modules for integration tests. The entry point is
//! the `main.rs` binary.
//!
//! ## Modules
//!
//! - `container/` - configuration loading and service wiring
//! - `protocol` - JSON-lines request/response types
//! - `adapters/` - client device reports → engine position sources
//! - `handlers/` - request dispatch and the dashboard feed
//! - `runtime` - the read/spawn/write loop

#![allow(clippy::module_name_repetitions)]

pub mod adapters;
pub mod container;
pub mod handlers;
pub mod protocol;
pub mod runtime;

pub use container::{NodeConfig, ServiceContainer};
pub use protocol::{Request, RequestEnvelope, Response};
pub use runtime::{NodeRuntime, ServeStats, ShutdownReport};
