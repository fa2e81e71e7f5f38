//! # Handlers
//!
//! - `request`: dispatches one protocol request to the ingestion service
//! - `dashboard`: follows the event bus and logs the live feed

pub mod dashboard;
pub mod request;

pub use dashboard::DashboardFeed;
pub use request::RequestHandler;
