//! # Adapters
//!
//! Translate wire-level descriptions into engine port implementations.

pub mod device;

pub use device::DeviceSpec;
