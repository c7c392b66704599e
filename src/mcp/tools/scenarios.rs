//! Scenario Tools
//!
//! Tools for listing, inspecting, creating and running Make scenarios.

use serde::Deserialize;
use serde_json::{json, Map, Value};

use super::{
    extract_field, parse_args, query_text_or, scenario_path, ScenarioId, DEFAULT_LIST_LIMIT,
    DEFAULT_LOG_LIMIT,
};
use crate::make::UpstreamRequest;
use crate::mcp::context::ToolContext;
use crate::mcp::registry::{McpRegistry, RegisteredTool, ToolBuilder, ToolError, ToolResult};

/// Register scenario tools with the registry
pub fn register_tools(registry: &mut McpRegistry) {
    registry.register_tool(list_scenarios_tool());
    registry.register_tool(get_scenario_tool());
    registry.register_tool(create_scenario_tool());
    registry.register_tool(get_scenario_blueprint_tool());
    registry.register_tool(run_scenario_tool());
    registry.register_tool(start_scenario_tool());
    registry.register_tool(stop_scenario_tool());
    registry.register_tool(get_scenario_logs_tool());
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ScenarioParams {
    scenario_id: ScenarioId,
}

fn scenario_id_schema() -> Value {
    json!({
        "type": "object",
        "properties": {
            "scenarioId": {
                "type": "integer",
                "description": "ID of the scenario"
            }
        },
        "required": ["scenarioId"]
    })
}

/// Make expects the numeric team id when it is one.
fn team_id_value(team_id: &str) -> Value {
    match team_id.parse::<u64>() {
        Ok(id) => json!(id),
        Err(_) => json!(team_id),
    }
}

/// Blueprints and schedules are sent to Make as JSON-encoded strings.
fn as_json_string(value: Value) -> Result<String, ToolError> {
    match value {
        Value::String(s) => Ok(s),
        other => {
            serde_json::to_string(&other).map_err(|e| ToolError::InvalidArguments(e.to_string()))
        }
    }
}

// ============================================================================
// list_scenarios
// ============================================================================

#[derive(Debug, Deserialize)]
struct ListScenariosParams {
    #[serde(default)]
    limit: Option<Value>,
}

fn list_scenarios_tool() -> RegisteredTool {
    ToolBuilder::new("list_scenarios")
        .description("List the scenarios of the configured team")
        .input_schema(json!({
            "type": "object",
            "properties": {
                "limit": {
                    "type": "integer",
                    "description": "Maximum number of scenarios to return (default 50)",
                    "minimum": 1
                }
            }
        }))
        .build(list_scenarios_handler)
}

async fn list_scenarios_handler(ctx: ToolContext, args: Value) -> ToolResult {
    let params: ListScenariosParams = parse_args(args)?;

    let request = UpstreamRequest::get("/scenarios")
        .query("teamId", &ctx.team_id)
        .query("pg[limit]", query_text_or(params.limit, DEFAULT_LIST_LIMIT));
    let envelope = ctx.call(request).await?;

    Ok(extract_field(envelope, "scenarios"))
}

// ============================================================================
// get_scenario
// ============================================================================

fn get_scenario_tool() -> RegisteredTool {
    ToolBuilder::new("get_scenario")
        .description("Get the details of a scenario by ID")
        .input_schema(scenario_id_schema())
        .build(get_scenario_handler)
}

async fn get_scenario_handler(ctx: ToolContext, args: Value) -> ToolResult {
    let params: ScenarioParams = parse_args(args)?;

    let request = UpstreamRequest::get(scenario_path(&params.scenario_id, "")?);
    let envelope = ctx.call(request).await?;

    Ok(extract_field(envelope, "scenario"))
}

// ============================================================================
// create_scenario
// ============================================================================

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CreateScenarioParams {
    blueprint: Value,
    #[serde(default)]
    scheduling: Option<Value>,
    #[serde(default)]
    folder_id: Option<Value>,
}

fn create_scenario_tool() -> RegisteredTool {
    ToolBuilder::new("create_scenario")
        .description("Create a new scenario in the configured team from a blueprint")
        .input_schema(json!({
            "type": "object",
            "properties": {
                "blueprint": {
                    "type": ["object", "string"],
                    "description": "Scenario blueprint (flow, metadata, name)"
                },
                "scheduling": {
                    "type": ["object", "string"],
                    "description": "Scheduling settings (default: on-demand)"
                },
                "folderId": {
                    "type": "integer",
                    "description": "Folder to place the scenario in"
                }
            },
            "required": ["blueprint"]
        }))
        .build(create_scenario_handler)
}

async fn create_scenario_handler(ctx: ToolContext, args: Value) -> ToolResult {
    let params: CreateScenarioParams = parse_args(args)?;

    let scheduling = params
        .scheduling
        .unwrap_or_else(|| json!({ "type": "on-demand" }));

    let mut body = Map::new();
    body.insert("teamId".to_string(), team_id_value(&ctx.team_id));
    body.insert(
        "blueprint".to_string(),
        Value::String(as_json_string(params.blueprint)?),
    );
    body.insert(
        "scheduling".to_string(),
        Value::String(as_json_string(scheduling)?),
    );
    if let Some(folder_id) = params.folder_id {
        body.insert("folderId".to_string(), folder_id);
    }

    let request = UpstreamRequest::post("/scenarios")
        .query("confirmed", true)
        .body(Value::Object(body));
    let envelope = ctx.call(request).await?;

    Ok(extract_field(envelope, "scenario"))
}

// ============================================================================
// get_scenario_blueprint
// ============================================================================

fn get_scenario_blueprint_tool() -> RegisteredTool {
    ToolBuilder::new("get_scenario_blueprint")
        .description("Get the blueprint (workflow definition) of a scenario")
        .input_schema(scenario_id_schema())
        .build(get_scenario_blueprint_handler)
}

async fn get_scenario_blueprint_handler(ctx: ToolContext, args: Value) -> ToolResult {
    let params: ScenarioParams = parse_args(args)?;

    let request = UpstreamRequest::get(scenario_path(&params.scenario_id, "/blueprint")?);
    let envelope = ctx.call(request).await?;

    Ok(extract_blueprint(envelope))
}

/// Make has answered with `response.blueprint`, `blueprint` and bare
/// `response` envelopes; take the first one present.
fn extract_blueprint(envelope: Value) -> Value {
    if let Some(blueprint) = envelope.pointer("/response/blueprint") {
        return blueprint.clone();
    }
    if let Some(blueprint) = envelope.get("blueprint") {
        return blueprint.clone();
    }
    if let Some(response) = envelope.get("response") {
        return response.clone();
    }
    envelope
}

// ============================================================================
// run_scenario
// ============================================================================

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RunScenarioParams {
    scenario_id: ScenarioId,
    #[serde(default)]
    data: Option<Value>,
    #[serde(default)]
    responsive: Option<Value>,
}

fn run_scenario_tool() -> RegisteredTool {
    ToolBuilder::new("run_scenario")
        .description("Run a scenario once, optionally passing input data")
        .input_schema(json!({
            "type": "object",
            "properties": {
                "scenarioId": {
                    "type": "integer",
                    "description": "ID of the scenario to run"
                },
                "data": {
                    "type": "object",
                    "description": "Input data for the scenario's inputs"
                },
                "responsive": {
                    "type": "boolean",
                    "description": "Wait for the run to finish before answering (default true)"
                }
            },
            "required": ["scenarioId"]
        }))
        .build(run_scenario_handler)
}

async fn run_scenario_handler(ctx: ToolContext, args: Value) -> ToolResult {
    let params: RunScenarioParams = parse_args(args)?;

    let mut body = Map::new();
    body.insert(
        "responsive".to_string(),
        params.responsive.unwrap_or(Value::Bool(true)),
    );
    if let Some(data) = params.data {
        body.insert("data".to_string(), data);
    }

    let request = UpstreamRequest::post(scenario_path(&params.scenario_id, "/run")?)
        .body(Value::Object(body));

    // The whole envelope carries executionId, status and outputs.
    Ok(ctx.call(request).await?)
}

// ============================================================================
// start_scenario / stop_scenario
// ============================================================================

fn start_scenario_tool() -> RegisteredTool {
    ToolBuilder::new("start_scenario")
        .description("Activate a scenario so it runs on its schedule")
        .input_schema(scenario_id_schema())
        .build(start_scenario_handler)
}

async fn start_scenario_handler(ctx: ToolContext, args: Value) -> ToolResult {
    let params: ScenarioParams = parse_args(args)?;

    let request = UpstreamRequest::post(scenario_path(&params.scenario_id, "/start")?);
    let envelope = ctx.call(request).await?;

    Ok(extract_field(envelope, "scenario"))
}

fn stop_scenario_tool() -> RegisteredTool {
    ToolBuilder::new("stop_scenario")
        .description("Deactivate a scenario")
        .input_schema(scenario_id_schema())
        .build(stop_scenario_handler)
}

async fn stop_scenario_handler(ctx: ToolContext, args: Value) -> ToolResult {
    let params: ScenarioParams = parse_args(args)?;

    let request = UpstreamRequest::post(scenario_path(&params.scenario_id, "/stop")?);
    let envelope = ctx.call(request).await?;

    Ok(extract_field(envelope, "scenario"))
}

// ============================================================================
// get_scenario_logs
// ============================================================================

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ScenarioLogsParams {
    scenario_id: ScenarioId,
    #[serde(default)]
    limit: Option<Value>,
}

fn get_scenario_logs_tool() -> RegisteredTool {
    ToolBuilder::new("get_scenario_logs")
        .description("Get the most recent execution logs of a scenario")
        .input_schema(json!({
            "type": "object",
            "properties": {
                "scenarioId": {
                    "type": "integer",
                    "description": "ID of the scenario"
                },
                "limit": {
                    "type": "integer",
                    "description": "Maximum number of log entries (default 20)",
                    "minimum": 1
                }
            },
            "required": ["scenarioId"]
        }))
        .build(get_scenario_logs_handler)
}

async fn get_scenario_logs_handler(ctx: ToolContext, args: Value) -> ToolResult {
    let params: ScenarioLogsParams = parse_args(args)?;

    let request = UpstreamRequest::get(scenario_path(&params.scenario_id, "/logs")?)
        .query("pg[limit]", query_text_or(params.limit, DEFAULT_LOG_LIMIT));
    let envelope = ctx.call(request).await?;

    Ok(extract_field(envelope, "scenarioLogs"))
}
