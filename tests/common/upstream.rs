//! Stub Make API
//!
//! A tiny axum app standing in for the Make REST API. It records every
//! request it receives and answers with one envelope carrying every field the
//! tools extract, so each tool finds its payload.

use super::constants::*;
use axum::{
    body::Bytes,
    extract::{Query, State},
    http::{HeaderMap, Method, StatusCode, Uri},
    response::{IntoResponse, Response},
    Json, Router,
};
use serde_json::{json, Value};
use std::sync::{Arc, Mutex};
use tokio::net::TcpListener;

/// One request as seen by the stub upstream
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub method: String,
    pub path: String,
    pub query: Vec<(String, String)>,
    pub authorization: Option<String>,
    pub body: Option<Value>,
}

impl RecordedRequest {
    pub fn query_value(&self, key: &str) -> Option<&str> {
        self.query
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }
}

#[derive(Clone, Default)]
pub struct StubUpstream {
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
}

impl StubUpstream {
    /// Binds a random port and serves the stub, returning its base url.
    pub async fn spawn(
        &self,
        shutdown_rx: tokio::sync::oneshot::Receiver<()>,
    ) -> String {
        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind stub upstream");
        let port = listener
            .local_addr()
            .expect("Failed to get stub upstream address")
            .port();

        let app = Router::new().fallback(record).with_state(self.clone());
        tokio::spawn(async move {
            axum::serve(listener, app)
                .with_graceful_shutdown(async {
                    shutdown_rx.await.ok();
                })
                .await
                .expect("Stub upstream failed");
        });

        format!("http://127.0.0.1:{}/api/v2", port)
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().unwrap().clone()
    }
}

fn envelope() -> Value {
    let scenario = json!({
        "id": SCENARIO_1_ID,
        "name": SCENARIO_1_NAME,
        "isActive": false,
    });
    json!({
        "scenarios": [scenario.clone()],
        "scenario": scenario,
        "response": {"blueprint": {"name": SCENARIO_1_NAME, "flow": []}},
        "scenarioLogs": [{"id": "log-1", "status": 1}],
        "connections": [{"id": 1, "name": "Google"}],
        "dataStores": [{"id": 1, "name": "Orders"}],
        "executionId": "exec-1",
        "status": 1,
    })
}

async fn record(
    State(stub): State<StubUpstream>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    Query(query): Query<Vec<(String, String)>>,
    body: Bytes,
) -> Response {
    let path = uri.path().to_string();
    let request = RecordedRequest {
        method: method.to_string(),
        path: path.clone(),
        query,
        authorization: headers
            .get("authorization")
            .and_then(|v| v.to_str().ok())
            .map(str::to_string),
        body: serde_json::from_slice(&body).ok(),
    };
    stub.requests.lock().unwrap().push(request);

    if path.contains(&format!("/scenarios/{}", MISSING_SCENARIO_ID)) {
        return (StatusCode::NOT_FOUND, MISSING_SCENARIO_BODY).into_response();
    }

    Json(envelope()).into_response()
}
