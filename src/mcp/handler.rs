//! MCP Method Dispatch
//!
//! Turns one protocol call into at most one protocol response. Transport
//! concerns (sessions, push channels) live in `server::sse`.

use std::sync::Arc;

use serde_json::Value;
use tracing::{debug, info, warn};

use super::context::ToolContext;
use super::protocol::{
    methods, InitializeParams, InitializeResult, McpError, McpRequest, McpResponse, PingResult,
    ServerCapabilities, ServerInfo, ToolsCallParams, ToolsCallResult, ToolsCapability,
    ToolsListResult, MCP_PROTOCOL_VERSION, SERVER_NAME,
};
use super::registry::McpRegistry;
use crate::make::MakeApi;

/// State shared across MCP sessions
pub struct McpState {
    pub registry: Arc<McpRegistry>,
    pub make: Arc<dyn MakeApi>,
    pub team_id: String,
}

impl McpState {
    fn tool_context(&self) -> ToolContext {
        ToolContext::new(self.make.clone(), self.team_id.clone())
    }
}

/// Create the MCP state with all tools registered
pub fn create_mcp_state(make: Arc<dyn MakeApi>, team_id: impl Into<String>) -> McpState {
    let mut registry = McpRegistry::new();
    super::tools::register_all_tools(&mut registry);

    info!("MCP registry initialized with {} tools", registry.tool_count());

    McpState {
        registry: Arc::new(registry),
        make,
        team_id: team_id.into(),
    }
}

/// Handle a single MCP call.
///
/// Returns `None` for notifications (no `id`), whatever the outcome.
pub async fn handle_request(mcp_state: &McpState, request: McpRequest) -> Option<McpResponse> {
    let McpRequest {
        id, method, params, ..
    } = request;

    let result = match method.as_str() {
        methods::INITIALIZE => handle_initialize(params),
        methods::INITIALIZED => {
            // Notification, no response needed
            debug!("Client finished initialization");
            return None;
        }
        methods::PING => handle_ping(),
        methods::TOOLS_LIST => handle_tools_list(mcp_state),
        methods::TOOLS_CALL => handle_tools_call(params, mcp_state).await,
        other => Err(McpError::MethodNotFound(other.to_string())),
    };

    let Some(id) = id else {
        if let Err(error) = result {
            debug!("Dropping error for notification {}: {}", method, error.message());
        }
        return None;
    };

    Some(match result {
        Ok(value) => McpResponse::success(id, value),
        Err(error) => McpResponse::error(id, error),
    })
}

fn handle_initialize(params: Option<Value>) -> Result<Value, McpError> {
    let params: InitializeParams = params
        .map(serde_json::from_value)
        .transpose()
        .map_err(|e| McpError::InvalidParams(e.to_string()))?
        .unwrap_or_default();

    if let Some(client) = &params.client_info {
        info!("MCP client {} {} initializing", client.name, client.version);
    }

    let result = InitializeResult {
        protocol_version: MCP_PROTOCOL_VERSION.to_string(),
        capabilities: ServerCapabilities {
            tools: ToolsCapability { list_changed: None },
        },
        server_info: ServerInfo {
            name: SERVER_NAME.to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        },
    };

    serde_json::to_value(result).map_err(|e| McpError::InternalError(e.to_string()))
}

fn handle_ping() -> Result<Value, McpError> {
    serde_json::to_value(PingResult {}).map_err(|e| McpError::InternalError(e.to_string()))
}

fn handle_tools_list(mcp_state: &McpState) -> Result<Value, McpError> {
    let result = ToolsListResult {
        tools: mcp_state.registry.tool_definitions(),
    };

    serde_json::to_value(result).map_err(|e| McpError::InternalError(e.to_string()))
}

async fn handle_tools_call(
    params: Option<Value>,
    mcp_state: &McpState,
) -> Result<Value, McpError> {
    let params: ToolsCallParams = params
        .map(serde_json::from_value)
        .transpose()
        .map_err(|e| McpError::InvalidParams(e.to_string()))?
        .ok_or_else(|| McpError::InvalidParams("Missing params".to_string()))?;

    debug!("Calling tool {}", params.name);

    let arguments = params.arguments.unwrap_or(serde_json::json!({}));
    let value = mcp_state
        .registry
        .execute(&params.name, mcp_state.tool_context(), arguments)
        .await
        .map_err(|e| {
            warn!("Tool {} failed: {}", params.name, e);
            McpError::from(e)
        })?;

    let result =
        ToolsCallResult::json(&value).map_err(|e| McpError::InternalError(e.to_string()))?;
    serde_json::to_value(result).map_err(|e| McpError::InternalError(e.to_string()))
}
