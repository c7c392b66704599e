//! MCP Tools
//!
//! One tool per Make API operation. Each tool performs exactly one upstream
//! call and returns a single field of the response envelope.

pub mod scenarios;
pub mod workspace;

use std::fmt;

use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;

use super::registry::{McpRegistry, ToolError};

/// Default page size for list tools
pub const DEFAULT_LIST_LIMIT: u32 = 50;

/// Default page size for execution logs
pub const DEFAULT_LOG_LIMIT: u32 = 20;

/// Register all tools with the registry
pub fn register_all_tools(registry: &mut McpRegistry) {
    scenarios::register_tools(registry);
    workspace::register_tools(registry);
}

/// Scenario identifiers arrive either as numbers or numeric strings.
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum ScenarioId {
    Number(u64),
    Text(String),
}

impl fmt::Display for ScenarioId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScenarioId::Number(id) => write!(f, "{}", id),
            ScenarioId::Text(id) => write!(f, "{}", id),
        }
    }
}

impl ScenarioId {
    /// The id as exactly one percent-encoded path segment.
    fn path_segment(&self) -> Result<String, ToolError> {
        let raw = self.to_string();
        if raw.is_empty() || raw == "." || raw == ".." {
            return Err(ToolError::InvalidArguments(format!(
                "scenarioId {:?} cannot form a URL path",
                raw
            )));
        }
        Ok(urlencoding::encode(&raw).into_owned())
    }
}

/// `/scenarios/<id><suffix>`, with the id confined to its own segment.
fn scenario_path(id: &ScenarioId, suffix: &str) -> Result<String, ToolError> {
    Ok(format!("/scenarios/{}{}", id.path_segment()?, suffix))
}

/// Query text for an optional argument. Absent means the default; anything
/// else goes to Make as given and Make decides whether it is valid.
fn query_text_or(value: Option<Value>, default: u32) -> String {
    match value {
        None => default.to_string(),
        Some(Value::String(s)) => s,
        Some(other) => other.to_string(),
    }
}

/// Deserialize tool arguments, treating `null` as an empty object.
fn parse_args<T: DeserializeOwned>(args: Value) -> Result<T, ToolError> {
    let args = match args {
        Value::Null => Value::Object(Default::default()),
        other => other,
    };
    serde_json::from_value(args).map_err(|e| ToolError::InvalidArguments(e.to_string()))
}

/// Take one field out of the Make response envelope, `null` when absent.
fn extract_field(envelope: Value, field: &str) -> Value {
    match envelope {
        Value::Object(mut map) => map.remove(field).unwrap_or(Value::Null),
        _ => Value::Null,
    }
}
