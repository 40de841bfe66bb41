//! Session management
//!
//! Conversation state is keyed by an opaque session id. Each key owns
//! exactly one `ConversationState`, handed out behind an async mutex so a
//! traversal completes before the next one starts for that key. Different
//! keys are independent and may be processed concurrently.

use std::sync::Arc;

use dashmap::DashMap;
use tokio::sync::Mutex;

use crate::state::ConversationState;

/// Shared handle to one session's state
pub type SessionHandle = Arc<Mutex<ConversationState>>;

/// Keyed session storage
///
/// Implementations own the storage technology; the engine only needs
/// get-or-create semantics around each traversal.
pub trait SessionStore: Send + Sync {
    /// Get the state for a session id, initializing fresh state for an
    /// unknown key
    fn get_or_create(&self, session_id: &str) -> SessionHandle;

    /// Discard a session. Returns true if it existed.
    fn remove(&self, session_id: &str) -> bool;

    /// Number of live sessions
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// In-memory session store
#[derive(Default)]
pub struct InMemorySessionStore {
    sessions: DashMap<String, SessionHandle>,
}

impl InMemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SessionStore for InMemorySessionStore {
    fn get_or_create(&self, session_id: &str) -> SessionHandle {
        self.sessions
            .entry(session_id.to_string())
            .or_insert_with(|| {
                tracing::debug!(session_id, "Initializing fresh conversation state");
                Arc::new(Mutex::new(ConversationState::new()))
            })
            .clone()
    }

    fn remove(&self, session_id: &str) -> bool {
        self.sessions.remove(session_id).is_some()
    }

    fn len(&self) -> usize {
        self.sessions.len()
    }
}
