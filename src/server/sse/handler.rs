//! SSE transport route handlers.
//!
//! Two independent HTTP flows joined only by the session id:
//! `GET /sse` opens the push channel and announces where to submit calls,
//! `POST /messages?sessionId=..` submits one call and is acknowledged at
//! once; the call's response is delivered later as an event on the channel.

use std::convert::Infallible;
use std::time::Duration;

use axum::{
    body::Bytes,
    extract::{Query, State},
    http::StatusCode,
    response::{
        sse::{Event, KeepAlive, Sse},
        IntoResponse, Response,
    },
};
use futures::{stream, Stream, StreamExt};
use serde::Deserialize;
use thiserror::Error;
use tracing::{debug, error, info};
use uuid::Uuid;

use super::registry::SessionId;
use crate::mcp::{handle_request, McpRequest};
use crate::server::state::{GuardedMcpState, GuardedSessionRegistry};

/// Path clients submit calls to
pub const MESSAGES_PATH: &str = "/messages";

/// Interval of the keep-alive comment written on idle channels
pub const KEEP_ALIVE_INTERVAL: Duration = Duration::from_secs(30);

/// SSE event announcing the submission address
pub const ENDPOINT_EVENT: &str = "endpoint";

/// SSE event carrying one protocol response
pub const MESSAGE_EVENT: &str = "message";

/// Submission address for a session
pub fn session_endpoint(id: &SessionId) -> String {
    format!("{}?sessionId={}", MESSAGES_PATH, id)
}

/// Synchronous rejection of a call submission.
#[derive(Debug, Error)]
pub enum SubmitError {
    #[error("Missing sessionId query parameter")]
    MissingSessionId,

    #[error("Session not found: {0}")]
    UnknownSession(String),

    #[error("Malformed call: {0}")]
    MalformedCall(String),
}

impl IntoResponse for SubmitError {
    fn into_response(self) -> Response {
        (StatusCode::BAD_REQUEST, self.to_string()).into_response()
    }
}

/// Open a push channel.
///
/// This is the route handler for `GET /sse`. The first event names the
/// submission address; afterwards every response for the session arrives as
/// a `message` event.
pub async fn sse_handler(
    State(sessions): State<GuardedSessionRegistry>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let (guard, outgoing_rx) = sessions.open();
    let endpoint = session_endpoint(&guard.id());
    info!("SSE session {} established", guard.id());

    let handshake = stream::once(async move {
        Ok::<_, Infallible>(Event::default().event(ENDPOINT_EVENT).data(endpoint))
    });

    // The guard travels with the stream; dropping the stream closes the session.
    let messages = stream::unfold((outgoing_rx, guard), |(mut rx, guard)| async move {
        loop {
            let response = rx.recv().await?;
            match serde_json::to_string(&response) {
                Ok(json) => {
                    let event = Event::default().event(MESSAGE_EVENT).data(json);
                    return Some((Ok::<_, Infallible>(event), (rx, guard)));
                }
                Err(e) => error!("Failed to serialize MCP response: {}", e),
            }
        }
    });

    Sse::new(handshake.chain(messages)).keep_alive(KeepAlive::new().interval(KEEP_ALIVE_INTERVAL))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageQuery {
    session_id: Option<String>,
}

/// Submit one protocol call.
///
/// This is the route handler for `POST /messages`. Unknown sessions and
/// unparseable bodies are rejected with 400; everything else is accepted
/// with 202 and processed on its own task.
pub async fn message_handler(
    State(sessions): State<GuardedSessionRegistry>,
    State(mcp_state): State<GuardedMcpState>,
    Query(query): Query<MessageQuery>,
    body: Bytes,
) -> Result<impl IntoResponse, SubmitError> {
    let raw_id = query.session_id.ok_or(SubmitError::MissingSessionId)?;
    let session_id = Uuid::parse_str(&raw_id)
        .ok()
        .filter(|id| sessions.contains(id))
        .ok_or_else(|| SubmitError::UnknownSession(raw_id.clone()))?;

    let request: McpRequest = serde_json::from_slice(&body)
        .map_err(|e| SubmitError::MalformedCall(e.to_string()))?;

    debug!("Session {} submitted {}", session_id, request.method);

    tokio::spawn(async move {
        let Some(response) = handle_request(&mcp_state, request).await else {
            return;
        };
        // The channel may have closed while the call ran.
        if let Err(e) = sessions.send(&session_id, response).await {
            debug!("Dropping response for session {}: {:?}", session_id, e);
        }
    });

    Ok((StatusCode::ACCEPTED, "Accepted"))
}
