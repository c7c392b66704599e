//! Common test infrastructure
//!
//! This module provides all the infrastructure needed for end-to-end tests.
//! Tests should only import from this module, not from internal submodules.
//!
//! # Example
//!
//! ```no_run
//! mod common;
//! use common::{TestServer, TestClient};
//!
//! #[tokio::test]
//! async fn test_ping() {
//!     let server = TestServer::spawn().await;
//!     let client = TestClient::new(server.base_url.clone());
//!
//!     let mut channel = client.open_channel().await;
//!     channel.submit(&client, serde_json::json!({"jsonrpc": "2.0", "id": 1, "method": "ping"})).await;
//!     let event = channel.next_event().await.unwrap();
//!     assert_eq!(event.event, "message");
//! }
//! ```

mod client;
mod constants;
mod server;
mod upstream;

// Public API - this is what tests import
pub use client::{SseChannel, SseEvent, TestClient};
pub use constants::*;
pub use server::TestServer;
#[allow(unused_imports)]
pub use upstream::RecordedRequest;
