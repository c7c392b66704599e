//! Shared constants for end-to-end tests
//!
//! This module contains all constants used across the test suite.
//! When the stub upstream data changes, update only this file.

// ============================================================================
// Make Account
// ============================================================================

/// API key the server is configured with
pub const TEST_API_KEY: &str = "test-api-key";

/// Team the server is configured with
pub const TEST_TEAM_ID: &str = "1234";

// ============================================================================
// Stub Upstream Data
// ============================================================================

/// Scenario the stub upstream knows about
pub const SCENARIO_1_ID: u64 = 101;

/// Name of the scenario the stub upstream knows about
pub const SCENARIO_1_NAME: &str = "Sync Orders";

/// Scenario id the stub upstream answers with 404
pub const MISSING_SCENARIO_ID: u64 = 404;

/// Body of the stub upstream's 404 answer
pub const MISSING_SCENARIO_BODY: &str = r#"{"message":"Scenario not found"}"#;

// ============================================================================
// Timeouts
// ============================================================================

/// Maximum time to wait for server to be ready
pub const SERVER_READY_TIMEOUT_MS: u64 = 5000;

/// Request timeout for short-lived HTTP calls
pub const REQUEST_TIMEOUT_SECS: u64 = 10;

/// Polling interval when waiting for server to be ready
pub const SERVER_READY_POLL_INTERVAL_MS: u64 = 50;

/// How long to wait for an expected event on the push channel
pub const EVENT_TIMEOUT_MS: u64 = 5000;

/// How long to watch the push channel when no event is expected
pub const QUIET_PERIOD_MS: u64 = 300;
