//! # Error Types
//!
//! Errors shared by every crate that parses identifiers from the outside world.

use thiserror::Error;

/// An identifier string could not be parsed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Invalid {kind} identifier: {value:?}")]
pub struct IdParseError {
    /// Which identifier kind was expected (`shipment`, `checkpoint`).
    pub kind: &'static str,
    /// The rejected input.
    pub value: String,
}
