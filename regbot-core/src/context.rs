//! Per-event context bag passed through middleware and into the handler.

use storage::DbSession;

/// Mutable state scoped to exactly one event.
///
/// The database session is placed here by the session-scope middleware and taken back out when
/// the event finishes; it is never shared with another event.
#[derive(Default)]
pub struct EventContext {
    update_id: Option<i64>,
    session: Option<DbSession>,
}

impl EventContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_update_id(update_id: i64) -> Self {
        Self {
            update_id: Some(update_id),
            session: None,
        }
    }

    pub fn update_id(&self) -> Option<i64> {
        self.update_id
    }

    /// Stores the session for this event, returning any session that was already present.
    pub fn set_session(&mut self, session: DbSession) -> Option<DbSession> {
        self.session.replace(session)
    }

    pub fn session_mut(&mut self) -> Option<&mut DbSession> {
        self.session.as_mut()
    }

    pub fn take_session(&mut self) -> Option<DbSession> {
        self.session.take()
    }

    pub fn has_session(&self) -> bool {
        self.session.is_some()
    }
}
