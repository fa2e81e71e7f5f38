//! # Node Runtime
//!
//! Reads request lines, spawns one task per request and funnels responses
//! through a single writer.
//!
//! ```text
//! reader ──line──→ tokio::spawn(handle_line) ──┐
//!        ──line──→ tokio::spawn(handle_line) ──┼──→ mpsc ──→ writer
//!        ──line──→ tokio::spawn(handle_line) ──┘
//! ```

use std::sync::Arc;

use anyhow::{Context, Result};
use tokio::io::{AsyncBufReadExt, AsyncRead, AsyncWrite, AsyncWriteExt, BufReader};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, info};

use st_01_scan_ingestion::ShipmentStore;

use crate::container::{NodeConfig, ServiceContainer};
use crate::handlers::{DashboardFeed, RequestHandler};

/// Responses buffered between request tasks and the writer.
const RESPONSE_QUEUE: usize = 256;

/// Counters from one `serve` run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ServeStats {
    pub requests: usize,
    pub responses: usize,
}

/// What the node did over its lifetime, logged at shutdown.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ShutdownReport {
    pub shipments: usize,
    pub scans_applied: u64,
    pub scans_rejected: u64,
    pub events_published: u64,
    pub events_unobserved: u64,
}

pub struct NodeRuntime {
    container: Arc<ServiceContainer>,
    handler: RequestHandler,
}

impl NodeRuntime {
    pub fn new(config: NodeConfig) -> Self {
        let container = Arc::new(ServiceContainer::new(config));
        let handler = RequestHandler::new(Arc::clone(&container.ingestion));
        Self { container, handler }
    }

    pub fn container(&self) -> Arc<ServiceContainer> {
        Arc::clone(&self.container)
    }

    pub fn report(&self) -> ShutdownReport {
        let store = self.container.ingestion.store();
        let bus = self.container.event_bus.stats();
        ShutdownReport {
            shipments: store.len(),
            scans_applied: store.stats().applied(),
            scans_rejected: store.stats().rejected(),
            events_published: bus.published,
            events_unobserved: bus.unobserved,
        }
    }

    /// Start the dashboard feed in the background.
    pub fn spawn_dashboard(&self) -> JoinHandle<u64> {
        let feed = DashboardFeed::new(self.container.event_bus.as_ref());
        tokio::spawn(feed.run())
    }

    /// Serve requests until `reader` reaches end of input and every response
    /// has been written.
    pub async fn serve<R, W>(&self, reader: R, mut writer: W) -> Result<ServeStats>
    where
        R: AsyncRead + Unpin,
        W: AsyncWrite + Unpin,
    {
        let (tx, mut rx) = mpsc::channel::<String>(RESPONSE_QUEUE);
        let handler = self.handler.clone();

        let read_loop = async move {
            let mut lines = BufReader::new(reader).lines();
            let mut requests: usize = 0;
            while let Some(line) = lines.next_line().await.context("Failed to read request")? {
                if line.trim().is_empty() {
                    continue;
                }
                requests += 1;

                let handler = handler.clone();
                let tx = tx.clone();
                tokio::spawn(async move {
                    let response = handler.handle_line(&line).await;
                    if tx.send(response.to_line()).await.is_err() {
                        debug!("Writer closed, dropping response");
                    }
                });
            }
            Ok::<_, anyhow::Error>(requests)
        };

        let write_loop = async {
            let mut responses: usize = 0;
            while let Some(line) = rx.recv().await {
                writer.write_all(line.as_bytes()).await?;
                writer.write_all(b"\n").await?;
                writer.flush().await?;
                responses += 1;
            }
            Ok::<_, std::io::Error>(responses)
        };

        let (requests, responses) = tokio::join!(read_loop, write_loop);
        let stats = ServeStats {
            requests: requests?,
            responses: responses.context("Failed to write response")?,
        };

        info!(
            requests = stats.requests,
            responses = stats.responses,
            "Input closed, all responses written"
        );
        Ok(stats)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Value;

    #[tokio::test]
    async fn test_every_line_gets_a_response() {
        let runtime = NodeRuntime::new(NodeConfig::default());
        let input = b"{\"id\":1,\"op\":\"summary\"}\n\n{\"id\":2,\"op\":\"list\"}\nnot json\n";
        let mut output = Vec::new();

        let stats = runtime.serve(&input[..], &mut output).await.unwrap();
        assert_eq!(stats, ServeStats { requests: 3, responses: 3 });

        let lines: Vec<Value> = String::from_utf8(output)
            .unwrap()
            .lines()
            .map(|l| serde_json::from_str(l).unwrap())
            .collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines.iter().filter(|v| v["ok"] == Value::Bool(true)).count(), 2);
    }

    #[tokio::test]
    async fn test_report_counts_store_and_bus() {
        let runtime = NodeRuntime::new(NodeConfig::default());
        let create = serde_json::json!({
            "id": 1,
            "op": "create",
            "spec": {
                "title": "Spices to Antwerp",
                "origin": "Kochi",
                "destination": "Antwerp",
                "estimatedDelivery": "2031-01-01T00:00:00Z",
                "checkpoints": [{"name": "Kochi Port"}, {"name": "Antwerp Port"}]
            }
        });
        let mut output = Vec::new();
        runtime
            .serve(format!("{}\n", create).as_bytes(), &mut output)
            .await
            .unwrap();

        let response: Value = serde_json::from_slice(&output).unwrap();
        let shipment_id = response["result"]["id"].clone();
        let checkpoint_id = response["result"]["checkpoints"][0]["id"].clone();
        let scans = [
            serde_json::json!({"op": "scan", "shipmentId": shipment_id, "checkpointId": checkpoint_id, "actorId": "crane-2"}),
            serde_json::json!({"op": "scan", "shipmentId": shipment_id, "checkpointId": shipment_id, "actorId": "crane-2"}),
        ];
        let input: String = scans.iter().map(|r| format!("{}\n", r)).collect();
        runtime.serve(input.as_bytes(), &mut Vec::<u8>::new()).await.unwrap();

        let report = runtime.report();
        assert_eq!(report.shipments, 1);
        assert_eq!(report.scans_applied, 1);
        assert_eq!(report.scans_rejected, 1);
        assert_eq!(report.events_published, 2);
        assert_eq!(report.events_unobserved, 2);
    }
}
