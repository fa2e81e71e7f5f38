//! # JSON-lines Runtime
//!
//! Drives `NodeRuntime::serve` the way a terminal client would: create a
//! shipment, scan it with ids taken from the responses, then read it back.

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::io::Write;

    use chrono::{Duration, Utc};
    use node_runtime::{NodeConfig, NodeRuntime};
    use serde_json::{json, Value};

    async fn exchange(runtime: &NodeRuntime, requests: &[Value]) -> HashMap<i64, Value> {
        let input: String = requests.iter().map(|r| format!("{}\n", r)).collect();
        let mut output = Vec::new();
        runtime.serve(input.as_bytes(), &mut output).await.unwrap();

        String::from_utf8(output)
            .unwrap()
            .lines()
            .map(|line| serde_json::from_str::<Value>(line).unwrap())
            .map(|v| (v["id"].as_i64().unwrap(), v))
            .collect()
    }

    fn create_request(id: i64) -> Value {
        json!({
            "id": id,
            "op": "create",
            "spec": {
                "title": "Textiles to Rotterdam",
                "origin": "Chennai",
                "destination": "Rotterdam",
                "estimatedDelivery": Utc::now() + Duration::days(20),
                "checkpoints": [
                    {"name": "Chennai Port"},
                    {"name": "Colombo Transshipment"},
                    {"name": "Port of Rotterdam"}
                ]
            }
        })
    }

    #[tokio::test]
    async fn test_create_scan_and_view() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "scan_base_url = \"https://track.example\"").unwrap();
        writeln!(file, "[location]").unwrap();
        writeln!(file, "fallback = {{ lat = 51.95, lng = 4.14 }}").unwrap();
        let config = NodeConfig::load_from(Some(file.path())).unwrap();
        let runtime = NodeRuntime::new(config);

        let created = exchange(&runtime, &[create_request(1)]).await;
        let shipment = &created[&1]["result"];
        let shipment_id = shipment["id"].clone();
        let checkpoint_id = shipment["checkpoints"][0]["id"].clone();

        let responses = exchange(
            &runtime,
            &[
                json!({"id": 2, "op": "codes", "shipmentId": shipment_id}),
                json!({
                    "id": 3,
                    "op": "scan",
                    "shipmentId": shipment_id,
                    "checkpointId": checkpoint_id,
                    "actorId": "stevedore-5"
                }),
            ],
        )
        .await;

        let code = responses[&2]["result"][0]["code"].as_str().unwrap().to_string();
        assert!(code.starts_with("https://track.example/scan/"));

        let receipt = &responses[&3]["result"];
        assert_eq!(responses[&3]["ok"], json!(true));
        assert_eq!(receipt["view"]["progress"], json!(33));
        assert_eq!(receipt["view"]["status"], json!("In Transit"));
        assert_eq!(receipt["record"]["resolutionMode"], json!("fallback-unsupported"));
        assert_eq!(receipt["view"]["currentLocation"], json!({"lat": 51.95, "lng": 4.14}));

        let responses = exchange(
            &runtime,
            &[
                json!({"id": 4, "op": "resolve", "code": code}),
                json!({"id": 5, "op": "summary"}),
            ],
        )
        .await;
        assert_eq!(responses[&4]["result"]["checkpointId"], checkpoint_id);
        assert_eq!(responses[&5]["result"]["total"], json!(1));
        assert_eq!(responses[&5]["result"]["inTransit"], json!(1));
    }

    #[tokio::test]
    async fn test_errors_are_reported_per_request() {
        let runtime = NodeRuntime::new(NodeConfig::default());
        let responses = exchange(
            &runtime,
            &[
                json!({"id": 1, "op": "view", "shipmentId": "00000000-0000-4000-8000-000000000000"}),
                json!({"id": 2, "op": "resolve", "code": "not a code"}),
                json!({"id": 3, "op": "create", "spec": {
                    "title": "", "origin": "A", "destination": "B",
                    "estimatedDelivery": Utc::now(), "checkpoints": [{"name": "X"}]
                }}),
                json!({"id": 4, "op": "list"}),
            ],
        )
        .await;

        assert_eq!(responses[&1]["error"]["code"], json!("SHIPMENT_NOT_FOUND"));
        assert_eq!(responses[&2]["error"]["code"], json!("INVALID_SCAN_CODE"));
        assert_eq!(responses[&3]["error"]["code"], json!("INVALID_SPEC"));
        assert_eq!(responses[&4]["result"], json!([]));
    }
}
