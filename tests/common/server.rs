//! Test server lifecycle management
//!
//! This module manages spawning and shutting down test HTTP servers.
//! Each test gets an isolated server talking to its own stub upstream.

use super::constants::*;
use super::upstream::{RecordedRequest, StubUpstream};
use make_mcp_server::{create_mcp_state, make_app, MakeClient, RequestsLoggingLevel, ServerConfig};
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;

/// Test server instance wired to a stub Make API
///
/// When dropped, both the server and the stub upstream shut down gracefully.
pub struct TestServer {
    /// Base URL for making requests (e.g., "http://127.0.0.1:12345")
    pub base_url: String,

    /// The port the server is listening on
    pub port: u16,

    // Private fields - keep resources alive until drop
    upstream: StubUpstream,
    _shutdown_tx: Option<tokio::sync::oneshot::Sender<()>>,
    _upstream_shutdown_tx: Option<tokio::sync::oneshot::Sender<()>>,
}

impl TestServer {
    /// Spawns a new test server on a random port
    ///
    /// This function:
    /// 1. Starts a stub Make API on a random port
    /// 2. Points a `MakeClient` at the stub
    /// 3. Binds the server to a random port (127.0.0.1:0)
    /// 4. Spawns the server in a background task
    /// 5. Waits for the server to be ready
    ///
    /// # Panics
    ///
    /// Panics if port binding fails or the server doesn't become ready
    /// within timeout.
    pub async fn spawn() -> Self {
        let upstream = StubUpstream::default();
        let (upstream_shutdown_tx, upstream_shutdown_rx) = tokio::sync::oneshot::channel::<()>();
        let upstream_url = upstream.spawn(upstream_shutdown_rx).await;

        let make_client = MakeClient::new(upstream_url, TEST_API_KEY.to_string())
            .expect("Failed to build Make client");
        let mcp_state = create_mcp_state(Arc::new(make_client), TEST_TEAM_ID);

        // Bind to random port
        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind to random port");

        let port = listener
            .local_addr()
            .expect("Failed to get local address")
            .port();

        let base_url = format!("http://127.0.0.1:{}", port);

        // Create shutdown channel
        let (shutdown_tx, shutdown_rx) = tokio::sync::oneshot::channel::<()>();

        let config = ServerConfig {
            port,
            requests_logging_level: RequestsLoggingLevel::None,
        };
        let app = make_app(config, mcp_state);

        // Spawn server in background task with graceful shutdown
        tokio::spawn(async move {
            axum::serve(listener, app)
                .with_graceful_shutdown(async {
                    shutdown_rx.await.ok();
                })
                .await
                .expect("Server failed");
        });

        let server = Self {
            base_url,
            port,
            upstream,
            _shutdown_tx: Some(shutdown_tx),
            _upstream_shutdown_tx: Some(upstream_shutdown_tx),
        };

        server.wait_for_ready().await;

        server
    }

    /// Requests received so far by the stub upstream
    pub fn upstream_requests(&self) -> Vec<RecordedRequest> {
        self.upstream.requests()
    }

    /// Waits for the server to become ready by polling the / endpoint
    async fn wait_for_ready(&self) {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_millis(100))
            .build()
            .expect("Failed to build reqwest client");

        let start = std::time::Instant::now();
        let timeout = Duration::from_millis(SERVER_READY_TIMEOUT_MS);

        loop {
            if start.elapsed() > timeout {
                panic!(
                    "Server did not become ready within {}ms",
                    SERVER_READY_TIMEOUT_MS
                );
            }

            match client.get(format!("{}/", self.base_url)).send().await {
                Ok(response) if response.status().is_success() => {
                    return;
                }
                _ => {
                    tokio::time::sleep(Duration::from_millis(SERVER_READY_POLL_INTERVAL_MS)).await;
                }
            }
        }
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        if let Some(tx) = self._shutdown_tx.take() {
            let _ = tx.send(());
        }
        if let Some(tx) = self._upstream_shutdown_tx.take() {
            let _ = tx.send(());
        }
    }
}
