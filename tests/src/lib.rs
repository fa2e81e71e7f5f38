//! # Shiptrack Test Suite
//!
//! ## Structure
//!
//! ```text
//! tests/src/
//! └── integration/
//!     ├── flows.rs        # end-to-end scan flows through the public API
//!     ├── concurrency.rs  # per-shipment atomicity on the multi-threaded runtime
//!     ├── dashboard.rs    # bus feed as seen by a dashboard subscriber
//!     └── runtime.rs      # JSON-lines driver
//! ```
//!
//! ## Running Tests
//!
//! ```bash
//! cargo test -p st-tests
//! cargo test -p st-tests integration::concurrency
//! ```

pub mod integration;
