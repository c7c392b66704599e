//! MCP (Model Context Protocol) Server
//!
//! Exposes the Make API as MCP tools so that LLM clients can list, inspect,
//! run and manage scenarios.
//!
//! ## Architecture
//!
//! - Transport: SSE push channel at `/sse`, call submission at `/messages`
//!   (see `server::sse`)
//! - Auth: none towards clients; Make credentials are forwarded upstream
//! - Tools: one per Make API operation, static catalog

pub mod context;
pub mod handler;
pub mod protocol;
pub mod registry;
pub mod tools;

pub use handler::{create_mcp_state, handle_request, McpState};
pub use protocol::{McpError, McpRequest, McpResponse};
pub use registry::McpRegistry;
