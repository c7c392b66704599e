use anyhow::{Context, Result};
use std::time::Duration;

use tracing::info;

use axum::{
    extract::State,
    middleware,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;

use super::sse::{message_handler, sse_handler, MESSAGES_PATH};
use super::{log_requests, state::*, ServerConfig};
use crate::mcp::protocol::SERVER_NAME;
use crate::mcp::McpState;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ServerStats {
    pub status: &'static str,
    pub server: &'static str,
    pub version: &'static str,
    pub uptime: String,
    pub tools: Vec<String>,
    pub active_sessions: usize,
}

fn format_uptime(duration: Duration) -> String {
    let total_seconds = duration.as_secs();

    let days = total_seconds / 86_400;
    let hours = (total_seconds % 86_400) / 3600;
    let minutes = (total_seconds % 3600) / 60;
    let seconds = total_seconds % 60;

    format!("{}d {:02}:{:02}:{:02}", days, hours, minutes, seconds)
}

/// Liveness and introspection: configured tools and open sessions.
async fn home(State(state): State<ServerState>) -> impl IntoResponse {
    let stats = ServerStats {
        status: "ok",
        server: SERVER_NAME,
        version: env!("CARGO_PKG_VERSION"),
        uptime: format_uptime(state.start_time.elapsed()),
        tools: state.mcp_state.registry.tool_names(),
        active_sessions: state.sessions.session_count(),
    };
    Json(stats)
}

pub fn make_app(config: ServerConfig, mcp_state: McpState) -> Router {
    let state = ServerState::new(config, mcp_state);

    Router::new()
        .route("/", get(home))
        .route("/health", get(home))
        .route("/sse", get(sse_handler))
        .route(MESSAGES_PATH, post(message_handler))
        .layer(middleware::from_fn_with_state(state.clone(), log_requests))
        .with_state(state)
}

pub async fn run_server(config: ServerConfig, mcp_state: McpState) -> Result<()> {
    let port = config.port;
    let app = make_app(config, mcp_state);

    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{}", port))
        .await
        .with_context(|| format!("Failed to bind port {}", port))?;

    info!("Ready to serve at port {}!", port);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server failed")
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_ok() {
        info!("Shutdown signal received, stopping server");
    }
}
