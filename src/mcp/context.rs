//! MCP Tool Execution Context
//!
//! Provides access to the Make API for tool implementations.

use std::sync::Arc;

use serde_json::Value;

use crate::make::{MakeApi, UpstreamError, UpstreamRequest};

/// Context provided to tool handlers during execution
#[derive(Clone)]
pub struct ToolContext {
    /// Upstream Make API
    pub make: Arc<dyn MakeApi>,

    /// Team that team-scoped endpoints are queried for
    pub team_id: String,
}

impl ToolContext {
    pub fn new(make: Arc<dyn MakeApi>, team_id: impl Into<String>) -> Self {
        Self {
            make,
            team_id: team_id.into(),
        }
    }

    /// Perform one upstream call
    pub async fn call(&self, request: UpstreamRequest) -> Result<Value, UpstreamError> {
        self.make.call(request).await
    }
}
