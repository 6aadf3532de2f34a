//! Session-keyed agent store
//!
//! Interactive frontends hold one agent set per user session. The store
//! constructs them lazily and evicts on session end, so there is no
//! ambient process-wide model state.

use std::collections::HashMap;

use tracing::debug;

use slr_core::SessionId;

/// Map from session id to a lazily-constructed value (typically a
/// `ScreeningPipeline`)
pub struct SessionStore<T> {
    sessions: HashMap<SessionId, T>,
}

impl<T> SessionStore<T> {
    pub fn new() -> Self {
        Self {
            sessions: HashMap::new(),
        }
    }

    /// Fetch the session's value, constructing it on first access
    pub fn get_or_create(&mut self, session: SessionId, create: impl FnOnce() -> T) -> &mut T {
        self.sessions.entry(session).or_insert_with(|| {
            debug!(%session, "creating session agents");
            create()
        })
    }

    /// Drop a session's value; returns whether it existed
    pub fn evict(&mut self, session: &SessionId) -> bool {
        let existed = self.sessions.remove(session).is_some();
        if existed {
            debug!(%session, "session evicted");
        }
        existed
    }

    pub fn contains(&self, session: &SessionId) -> bool {
        self.sessions.contains_key(session)
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}

impl<T> Default for SessionStore<T> {
    fn default() -> Self {
        Self::new()
    }
}
