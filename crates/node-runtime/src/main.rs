//! # Shiptrack Node Runtime
//!
//! ## Startup Sequence
//!
//! 1. Initialize telemetry (`ST_LOG_LEVEL`, `ST_JSON_LOGS`, ...)
//! 2. Load configuration (`ST_CONFIG` file, then `ST_*` overrides)
//! 3. Wire the ingestion service to the event bus
//! 4. Start the dashboard feed
//! 5. Serve JSON-lines requests from stdin until end of input
//!
//! Logs go to stderr; stdout carries only protocol responses.

use std::time::Duration;

use anyhow::{Context, Result};
use tracing::info;

use node_runtime::{NodeConfig, NodeRuntime};
use shiptrack_telemetry::{init_telemetry, TelemetryConfig};

/// How long the dashboard feed gets to drain after input closes.
const SHUTDOWN_GRACE: Duration = Duration::from_secs(2);

#[tokio::main]
async fn main() -> Result<()> {
    let _telemetry = init_telemetry(TelemetryConfig::for_component("node-runtime"))
        .context("Failed to initialize telemetry")?;

    let config = NodeConfig::load().context("Failed to load configuration")?;
    if let Some(path) = &config.source {
        info!(path = %path.display(), "Using configuration file");
    }

    let runtime = NodeRuntime::new(config);
    let dashboard = runtime.spawn_dashboard();

    info!("Shiptrack node ready, reading requests from stdin");
    let stats = runtime
        .serve(tokio::io::stdin(), tokio::io::stdout())
        .await?;

    let report = runtime.report();
    // Closing the bus ends the dashboard feed.
    drop(runtime);
    let events = match tokio::time::timeout(SHUTDOWN_GRACE, dashboard).await {
        Ok(Ok(events)) => events,
        _ => 0,
    };

    info!(
        requests = stats.requests,
        events = events,
        shipments = report.shipments,
        scans_applied = report.scans_applied,
        scans_rejected = report.scans_rejected,
        events_published = report.events_published,
        events_unobserved = report.events_unobserved,
        "Shutdown complete"
    );
    Ok(())
}
