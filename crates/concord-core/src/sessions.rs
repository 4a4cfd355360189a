//! In-flight evaluation sessions.
//!
//! Each tribunal round runs under a session token: a shared flag the
//! orchestrator polls between votes. An override cancels a round by
//! setting the flag; nothing is interrupted mid-instruction.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use concord_contracts::agent::SessionId;

/// Tracks the cancellation token for every in-flight evaluation.
pub struct SessionRegistry {
    active: Mutex<HashMap<SessionId, Arc<AtomicBool>>>,
}

impl SessionRegistry {
    pub fn new() -> Self {
        Self {
            active: Mutex::new(HashMap::new()),
        }
    }

    /// Start a round under the given session, replacing any stale token.
    /// The returned flag is false until the session is cancelled.
    pub fn begin(&self, session: SessionId) -> Arc<AtomicBool> {
        let token = Arc::new(AtomicBool::new(false));
        self.active
            .lock()
            .expect("session registry lock poisoned")
            .insert(session, Arc::clone(&token));
        token
    }

    /// Cancel the session's in-flight round, if one exists. Returns true
    /// when a live token was flipped.
    pub fn cancel(&self, session: &SessionId) -> bool {
        let active = self.active.lock().expect("session registry lock poisoned");
        match active.get(session) {
            Some(token) => {
                token.store(true, Ordering::SeqCst);
                true
            }
            None => false,
        }
    }

    /// Remove the session's token once its round has concluded.
    pub fn end(&self, session: &SessionId) {
        self.active
            .lock()
            .expect("session registry lock poisoned")
            .remove(session);
    }

    /// Number of rounds currently in flight.
    pub fn in_flight(&self) -> usize {
        self.active
            .lock()
            .expect("session registry lock poisoned")
            .len()
    }
}

impl Default for SessionRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::Ordering;

    use concord_contracts::agent::SessionId;

    use super::SessionRegistry;

    #[test]
    fn cancel_flips_the_live_token() {
        let registry = SessionRegistry::new();
        let session = SessionId::new();
        let token = registry.begin(session.clone());

        assert!(!token.load(Ordering::SeqCst));
        assert!(registry.cancel(&session));
        assert!(token.load(Ordering::SeqCst));
    }

    #[test]
    fn cancel_without_a_round_is_a_no_op() {
        let registry = SessionRegistry::new();
        assert!(!registry.cancel(&SessionId::new()));
    }

    #[test]
    fn begin_replaces_a_stale_token() {
        let registry = SessionRegistry::new();
        let session = SessionId::new();
        let first = registry.begin(session.clone());
        let second = registry.begin(session.clone());

        registry.cancel(&session);
        assert!(!first.load(Ordering::SeqCst));
        assert!(second.load(Ordering::SeqCst));
    }

    #[test]
    fn end_clears_the_session() {
        let registry = SessionRegistry::new();
        let session = SessionId::new();
        registry.begin(session.clone());
        assert_eq!(registry.in_flight(), 1);
        registry.end(&session);
        assert_eq!(registry.in_flight(), 0);
        assert!(!registry.cancel(&session));
    }
}
