//! HTTP client for end-to-end tests
//!
//! This module provides a high-level HTTP client that wraps reqwest
//! and provides methods for all server endpoints, plus a reader for the
//! SSE push channel built on `eventsource-stream`.
//!
//! When routes or request formats change, update only this file.

use super::constants::*;
use eventsource_stream::{Event, EventStreamError, Eventsource};
use futures::stream::BoxStream;
use futures::StreamExt;
use reqwest::Response;
use serde_json::{json, Value};
use std::time::Duration;

/// HTTP test client
pub struct TestClient {
    /// The underlying reqwest client (public for custom requests in tests)
    pub client: reqwest::Client,
    /// The base URL of the test server
    pub base_url: String,
    // Push channels stay open for the whole test, so no total timeout here.
    streaming_client: reqwest::Client,
}

impl TestClient {
    pub fn new(base_url: String) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .expect("Failed to build reqwest client");
        let streaming_client = reqwest::Client::builder()
            .build()
            .expect("Failed to build reqwest client");

        Self {
            client,
            base_url,
            streaming_client,
        }
    }

    // ========================================================================
    // Introspection Endpoints
    // ========================================================================

    /// GET /
    pub async fn get_home(&self) -> Response {
        self.client
            .get(format!("{}/", self.base_url))
            .send()
            .await
            .expect("Home request failed")
    }

    /// GET /health
    pub async fn get_health(&self) -> Response {
        self.client
            .get(format!("{}/health", self.base_url))
            .send()
            .await
            .expect("Health request failed")
    }

    // ========================================================================
    // Transport Endpoints
    // ========================================================================

    /// GET /sse, asserting the handshake event
    pub async fn open_channel(&self) -> SseChannel {
        let response = self
            .streaming_client
            .get(format!("{}/sse", self.base_url))
            .header("accept", "text/event-stream")
            .send()
            .await
            .expect("SSE request failed");
        assert_eq!(response.status(), reqwest::StatusCode::OK);
        let content_type = response
            .headers()
            .get("content-type")
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .to_string();
        assert!(
            content_type.starts_with("text/event-stream"),
            "Unexpected content type: {}",
            content_type
        );

        let mut channel = SseChannel {
            endpoint: String::new(),
            events: response.bytes_stream().eventsource().boxed(),
        };

        let handshake = channel
            .next_event()
            .await
            .expect("No handshake event received");
        assert_eq!(handshake.event, "endpoint");
        channel.endpoint = handshake.data;
        channel
    }

    /// POST to a submission address as announced by the handshake
    pub async fn post_to_endpoint(&self, endpoint: &str, body: impl Into<String>) -> Response {
        self.client
            .post(format!("{}{}", self.base_url, endpoint))
            .header("content-type", "application/json")
            .body(body.into())
            .send()
            .await
            .expect("Message request failed")
    }

    /// POST /messages?sessionId=<session_id>
    pub async fn post_message(&self, session_id: &str, body: impl Into<String>) -> Response {
        self.post_to_endpoint(&format!("/messages?sessionId={}", session_id), body)
            .await
    }
}

/// One parsed SSE event
pub type SseEvent = Event;

type EventResult = Result<Event, EventStreamError<reqwest::Error>>;

/// Reader over an open push channel
pub struct SseChannel {
    /// Submission address announced by the handshake
    pub endpoint: String,
    events: BoxStream<'static, EventResult>,
}

impl SseChannel {
    pub fn session_id(&self) -> &str {
        self.endpoint
            .split("sessionId=")
            .nth(1)
            .expect("Endpoint carries no sessionId")
    }

    /// Submits a call on this channel's session, asserting it is accepted
    pub async fn submit(&self, client: &TestClient, call: Value) {
        let response = client
            .post_to_endpoint(&self.endpoint, call.to_string())
            .await;
        assert_eq!(response.status(), reqwest::StatusCode::ACCEPTED);
    }

    /// Submits a `tools/call` and returns the response delivered on the channel
    pub async fn call_tool(
        &mut self,
        client: &TestClient,
        id: u64,
        name: &str,
        arguments: Value,
    ) -> Value {
        self.submit(
            client,
            json!({
                "jsonrpc": "2.0",
                "id": id,
                "method": "tools/call",
                "params": {"name": name, "arguments": arguments},
            }),
        )
        .await;
        self.next_message().await
    }

    /// Next `message` event, parsed as JSON
    pub async fn next_message(&mut self) -> Value {
        let event = self.next_event().await.expect("No message event received");
        assert_eq!(event.event, "message");
        serde_json::from_str(&event.data).expect("Event data is not JSON")
    }

    /// Next event, waiting up to the default event timeout
    pub async fn next_event(&mut self) -> Option<SseEvent> {
        self.next_event_within(Duration::from_millis(EVENT_TIMEOUT_MS))
            .await
    }

    /// Asserts that nothing arrives on the channel for a short while
    pub async fn expect_silence(&mut self) {
        let event = self
            .next_event_within(Duration::from_millis(QUIET_PERIOD_MS))
            .await;
        assert!(event.is_none(), "Unexpected event: {:?}", event);
    }

    /// Keep-alive comments never surface as events.
    pub async fn next_event_within(&mut self, timeout: Duration) -> Option<SseEvent> {
        let event = tokio::time::timeout(timeout, self.events.next())
            .await
            .ok()??;
        Some(event.expect("SSE stream failed"))
    }
}
