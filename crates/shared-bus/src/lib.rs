//! # Shared Bus - Shipment Event Feed
//!
//! Broadcasts shipment lifecycle and scan events from the ingestion engine to
//! any number of observers (admin dashboards, tracking displays).
//!
//! ```text
//! ┌──────────────────┐                     ┌──────────────────┐
//! │ Ingestion Engine │                     │    Dashboard     │
//! │                  │    publish()        │                  │
//! │                  │ ──────┐             │                  │
//! └──────────────────┘       │             └──────────────────┘
//!                            ▼                     ↑
//!                      ┌──────────────┐            │
//!                      │  Event Bus   │ ───────────┘
//!                      └──────────────┘  subscribe(filter)
//! ```
//!
//! ## Rules
//!
//! - Publishing never fails the caller; an event with no receivers is dropped
//!   and logged.
//! - The bus holds no shipment state. Events are notifications, the store
//!   remains the source of truth.
//! - A lagging subscriber skips the events it missed and keeps going.

pub mod events;
pub mod publisher;
pub mod subscriber;

pub use events::{EventFilter, EventTopic, ShipmentEvent};
pub use publisher::{BusStats, EventPublisher, InMemoryEventBus};
pub use subscriber::{EventSubscriber, Subscription, SubscriptionError};

/// Maximum events to buffer per subscriber before it starts lagging.
pub const DEFAULT_CHANNEL_CAPACITY: usize = 1000;

