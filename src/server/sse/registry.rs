//! SSE session registry.
//!
//! Tracks every open push channel by session id. A session lives exactly as
//! long as its [`SessionGuard`], which the SSE stream owns: when the client
//! disconnects the stream is dropped and the session is removed.

use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use tokio::sync::mpsc;
use tracing::debug;
use uuid::Uuid;

use crate::mcp::McpResponse;

/// Opaque identifier correlating a push channel with call submissions.
pub type SessionId = Uuid;

/// Outgoing messages buffered per session before the stream drains them.
const SESSION_CHANNEL_CAPACITY: usize = 32;

/// Error type for send operations.
#[derive(Debug, Clone, PartialEq)]
pub enum SendError {
    /// No session with this id is registered.
    NotConnected,
    /// The session's stream is gone (client disconnected).
    Disconnected,
}

/// Manages all open SSE sessions.
pub struct SessionRegistry {
    /// session_id -> sender feeding that session's push channel
    sessions: RwLock<HashMap<SessionId, mpsc::Sender<McpResponse>>>,
}

impl Default for SessionRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionRegistry {
    pub fn new() -> Self {
        Self {
            sessions: RwLock::new(HashMap::new()),
        }
    }

    fn read(&self) -> RwLockReadGuard<'_, HashMap<SessionId, mpsc::Sender<McpResponse>>> {
        self.sessions.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, HashMap<SessionId, mpsc::Sender<McpResponse>>> {
        self.sessions.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Open a new session under a fresh id.
    ///
    /// Returns the guard that keeps the session registered and the receiver
    /// of responses addressed to it.
    pub fn open(self: &Arc<Self>) -> (SessionGuard, mpsc::Receiver<McpResponse>) {
        let (tx, rx) = mpsc::channel(SESSION_CHANNEL_CAPACITY);

        let mut sessions = self.write();
        let mut id = Uuid::new_v4();
        while sessions.contains_key(&id) {
            id = Uuid::new_v4();
        }
        sessions.insert(id, tx);
        drop(sessions);

        debug!("Session {} opened", id);
        let guard = SessionGuard {
            id,
            registry: Arc::clone(self),
        };
        (guard, rx)
    }

    /// Remove a session. Returns whether it was registered.
    pub fn close(&self, id: &SessionId) -> bool {
        let removed = self.write().remove(id).is_some();
        if removed {
            debug!("Session {} closed", id);
        }
        removed
    }

    pub fn contains(&self, id: &SessionId) -> bool {
        self.read().contains_key(id)
    }

    /// Get the number of open sessions.
    pub fn session_count(&self) -> usize {
        self.read().len()
    }

    /// Deliver a response on a session's push channel.
    pub async fn send(&self, id: &SessionId, response: McpResponse) -> Result<(), SendError> {
        // Clone the sender so the lock is not held across the await.
        let sender = self.read().get(id).cloned().ok_or(SendError::NotConnected)?;
        sender
            .send(response)
            .await
            .map_err(|_| SendError::Disconnected)
    }
}

/// Keeps a session registered; dropping it closes the session.
pub struct SessionGuard {
    id: SessionId,
    registry: Arc<SessionRegistry>,
}

impl SessionGuard {
    pub fn id(&self) -> SessionId {
        self.id
    }
}

impl Drop for SessionGuard {
    fn drop(&mut self) {
        self.registry.close(&self.id);
    }
}
