//! # Service Container
//!
//! Holds the configured ingestion service and the event bus it publishes to.

pub mod config;
pub mod services;

pub use config::NodeConfig;
pub use services::ServiceContainer;
