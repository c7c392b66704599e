//! Make MCP Server Library
//!
//! Bridges the Make automation platform to MCP clients over SSE.
//! This library exposes the internal modules for testing and potential reuse.

pub mod config;
pub mod make;
pub mod mcp;
pub mod server;

// Re-export commonly used types for convenience
pub use make::{MakeApi, MakeClient, UpstreamError};
pub use mcp::{create_mcp_state, McpState};
pub use server::{make_app, run_server, RequestsLoggingLevel, ServerConfig};
