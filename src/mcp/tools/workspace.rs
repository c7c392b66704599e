//! Workspace Tools
//!
//! Team-scoped listings of connections and data stores.

use serde::Deserialize;
use serde_json::{json, Value};

use super::{extract_field, parse_args, query_text_or, DEFAULT_LIST_LIMIT};
use crate::make::UpstreamRequest;
use crate::mcp::context::ToolContext;
use crate::mcp::registry::{McpRegistry, RegisteredTool, ToolBuilder, ToolResult};

/// Register workspace tools with the registry
pub fn register_tools(registry: &mut McpRegistry) {
    registry.register_tool(list_connections_tool());
    registry.register_tool(list_data_stores_tool());
}

#[derive(Debug, Deserialize)]
struct ListParams {
    #[serde(default)]
    limit: Option<Value>,
}

fn list_schema(what: &str) -> Value {
    json!({
        "type": "object",
        "properties": {
            "limit": {
                "type": "integer",
                "description": format!("Maximum number of {} to return (default 50)", what),
                "minimum": 1
            }
        }
    })
}

/// GET a team-scoped listing and return one envelope field.
async fn list_team_items(ctx: ToolContext, args: Value, path: &str, field: &str) -> ToolResult {
    let params: ListParams = parse_args(args)?;

    let request = UpstreamRequest::get(path)
        .query("teamId", &ctx.team_id)
        .query("pg[limit]", query_text_or(params.limit, DEFAULT_LIST_LIMIT));
    let envelope = ctx.call(request).await?;

    Ok(extract_field(envelope, field))
}

// ============================================================================
// list_connections
// ============================================================================

fn list_connections_tool() -> RegisteredTool {
    ToolBuilder::new("list_connections")
        .description("List the app connections available to the configured team")
        .input_schema(list_schema("connections"))
        .build(|ctx, args| list_team_items(ctx, args, "/connections", "connections"))
}

// ============================================================================
// list_data_stores
// ============================================================================

fn list_data_stores_tool() -> RegisteredTool {
    ToolBuilder::new("list_data_stores")
        .description("List the data stores of the configured team")
        .input_schema(list_schema("data stores"))
        .build(|ctx, args| list_team_items(ctx, args, "/data-stores", "dataStores"))
}
