//! Background submission of connector configurations
//!
//! The POST runs on a spawned thread so the UI stays interactive; the
//! outcome comes back over an mpsc channel that the event loop polls.

use crate::model::form::ConnectorPayload;
use std::sync::mpsc;
use std::thread;
use std::time::Duration;

/// Where configurations are saved unless `--endpoint` overrides it.
pub const DEFAULT_ENDPOINT: &str = "http://127.0.0.1:8000/save_connector_config/";

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Outcome of one submission attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// The endpoint accepted the configuration (2xx).
    Accepted,
    /// The endpoint rejected it. The message is the response's `detail`
    /// field, or the raw body when there is none.
    Rejected(String),
    /// The request never completed (connection, DNS, timeout).
    TransportFailed,
}

/// Handle to an in-flight submission.
///
/// Dropping the handle detaches the request; a late outcome is simply
/// unobservable.
pub struct SubmitHandle {
    receiver: mpsc::Receiver<SubmitOutcome>,
}

impl SubmitHandle {
    /// Non-blocking poll for the outcome.
    pub fn try_outcome(&self) -> Option<SubmitOutcome> {
        self.receiver.try_recv().ok()
    }

    /// Block up to `timeout` for the outcome. Test helper; the event loop
    /// only ever polls.
    pub fn wait_outcome(&self, timeout: Duration) -> Option<SubmitOutcome> {
        self.receiver.recv_timeout(timeout).ok()
    }
}

/// Serialize `payload` and POST it to `endpoint` on a background thread.
pub fn submit(endpoint: &str, payload: &ConnectorPayload) -> SubmitHandle {
    let (tx, rx) = mpsc::channel();

    // Serialize up front so the thread owns a plain string.
    match serde_json::to_string(payload) {
        Ok(body) => {
            let endpoint = endpoint.to_string();
            thread::spawn(move || {
                let outcome = post_config(&endpoint, &body);
                let _ = tx.send(outcome);
            });
        }
        Err(e) => {
            tracing::error!("Failed to serialize connector payload: {}", e);
            let _ = tx.send(SubmitOutcome::TransportFailed);
        }
    }

    SubmitHandle { receiver: rx }
}

fn post_config(endpoint: &str, body: &str) -> SubmitOutcome {
    match ureq::post(endpoint)
        .set("Content-Type", "application/json")
        .timeout(REQUEST_TIMEOUT)
        .send_string(body)
    {
        Ok(response) => {
            tracing::info!(status = response.status(), "Connector config accepted");
            SubmitOutcome::Accepted
        }
        Err(ureq::Error::Status(status, response)) => {
            let raw = response.into_string().unwrap_or_default();
            tracing::warn!(status, body = %raw, "Connector config rejected");
            SubmitOutcome::Rejected(rejection_detail(&raw))
        }
        Err(e) => {
            tracing::warn!("Connector config request failed: {}", e);
            SubmitOutcome::TransportFailed
        }
    }
}

/// Pull the `detail` field out of an error body, falling back to the raw
/// body when it is absent or not JSON.
fn rejection_detail(raw: &str) -> String {
    serde_json::from_str::<serde_json::Value>(raw)
        .ok()
        .and_then(|v| v.get("detail")?.as_str().map(str::to_string))
        .unwrap_or_else(|| raw.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;
    use std::io::Read;
    use std::net::TcpListener;
    use std::sync::mpsc::Sender;

    fn sample_payload() -> ConnectorPayload {
        let mut mapping = BTreeMap::new();
        mapping.insert("id".to_string(), "order_id".to_string());
        ConnectorPayload {
            host: "db1".to_string(),
            port: "5432".to_string(),
            schema: "public".to_string(),
            table_name: "orders".to_string(),
            app_id: "app42".to_string(),
            mapping,
        }
    }

    /// Start a single-shot HTTP server that answers with the given status
    /// and body, and reports the received request over a channel.
    fn start_one_shot_server(
        status: u16,
        response_body: &str,
    ) -> (String, mpsc::Receiver<(String, String)>) {
        let server = tiny_http::Server::http("127.0.0.1:0").expect("Failed to start test server");
        let port = server.server_addr().to_ip().unwrap().port();
        let url = format!("http://127.0.0.1:{}/save_connector_config/", port);

        let (seen_tx, seen_rx): (Sender<(String, String)>, _) = mpsc::channel();
        let response_body = response_body.to_string();
        thread::spawn(move || {
            if let Ok(mut request) = server.recv() {
                let mut body = String::new();
                let _ = request.as_reader().read_to_string(&mut body);
                let content_type = request
                    .headers()
                    .iter()
                    .find(|h| h.field.equiv("Content-Type"))
                    .map(|h| h.value.to_string())
                    .unwrap_or_default();
                let _ = seen_tx.send((body, content_type));

                let response =
                    tiny_http::Response::from_string(response_body).with_status_code(status);
                let _ = request.respond(response);
            }
        });

        (url, seen_rx)
    }

    #[test]
    fn accepted_on_2xx_and_sends_exact_wire_fields() {
        let (url, seen) = start_one_shot_server(200, r#"{"status":"saved"}"#);

        let handle = submit(&url, &sample_payload());
        let outcome = handle.wait_outcome(Duration::from_secs(5));
        assert_eq!(outcome, Some(SubmitOutcome::Accepted));

        let (body, content_type) = seen.recv_timeout(Duration::from_secs(5)).unwrap();
        assert_eq!(content_type, "application/json");

        let json: serde_json::Value = serde_json::from_str(&body).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "host": "db1",
                "port": "5432",
                "schema": "public",
                "table_name": "orders",
                "app_id": "app42",
                "mapping": {"id": "order_id"},
            })
        );
    }

    #[test]
    fn rejected_surfaces_the_detail_field() {
        let (url, _seen) = start_one_shot_server(422, r#"{"detail":"schema not found"}"#);

        let handle = submit(&url, &sample_payload());
        let outcome = handle.wait_outcome(Duration::from_secs(5));
        assert_eq!(
            outcome,
            Some(SubmitOutcome::Rejected("schema not found".to_string()))
        );
    }

    #[test]
    fn rejected_falls_back_to_the_raw_body() {
        let (url, _seen) = start_one_shot_server(500, r#"{"error":"boom"}"#);

        let handle = submit(&url, &sample_payload());
        let outcome = handle.wait_outcome(Duration::from_secs(5));
        assert_eq!(
            outcome,
            Some(SubmitOutcome::Rejected(r#"{"error":"boom"}"#.to_string()))
        );
    }

    #[test]
    fn transport_failure_when_nothing_listens() {
        // Grab a free port, then close the listener so the connect fails.
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let port = listener.local_addr().unwrap().port();
        drop(listener);

        let url = format!("http://127.0.0.1:{}/save_connector_config/", port);
        let handle = submit(&url, &sample_payload());
        let outcome = handle.wait_outcome(Duration::from_secs(5));
        assert_eq!(outcome, Some(SubmitOutcome::TransportFailed));
    }

    #[test]
    fn detail_extraction_handles_non_json_bodies() {
        assert_eq!(rejection_detail("plain text"), "plain text");
        assert_eq!(rejection_detail(r#"{"detail":"nope"}"#), "nope");
        assert_eq!(rejection_detail(r#"{"other":1}"#), r#"{"other":1}"#);
    }
}
