use axum::extract::FromRef;

use crate::mcp::McpState;
use std::sync::Arc;
use std::time::Instant;

use super::sse::SessionRegistry;
use super::ServerConfig;

pub type GuardedMcpState = Arc<McpState>;
pub type GuardedSessionRegistry = Arc<SessionRegistry>;

#[derive(Clone)]
pub struct ServerState {
    pub config: ServerConfig,
    pub start_time: Instant,
    pub mcp_state: GuardedMcpState,
    pub sessions: GuardedSessionRegistry,
}

impl ServerState {
    pub fn new(config: ServerConfig, mcp_state: McpState) -> Self {
        Self {
            config,
            start_time: Instant::now(),
            mcp_state: Arc::new(mcp_state),
            sessions: Arc::new(SessionRegistry::new()),
        }
    }
}

impl FromRef<ServerState> for ServerConfig {
    fn from_ref(input: &ServerState) -> Self {
        input.config.clone()
    }
}

impl FromRef<ServerState> for GuardedMcpState {
    fn from_ref(input: &ServerState) -> Self {
        input.mcp_state.clone()
    }
}

impl FromRef<ServerState> for GuardedSessionRegistry {
    fn from_ref(input: &ServerState) -> Self {
        input.sessions.clone()
    }
}
