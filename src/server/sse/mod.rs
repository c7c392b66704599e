//! SSE transport for MCP.
//!
//! Bridges the long-lived push channel with short-lived call submissions.

pub mod handler;
pub mod registry;

pub use handler::{message_handler, session_endpoint, sse_handler, SubmitError, MESSAGES_PATH};
pub use registry::{SendError, SessionGuard, SessionId, SessionRegistry};
