//! Session-scope middleware: one database session per event.

use regbot_core::{BotError, EventContext, Result};
use storage::SessionFactory;
use tracing::{debug, error, warn};

/// Borrows a fresh session from the factory before the handler and returns it afterwards.
///
/// `after` must run once for every successful `before`; the chain guarantees this on handler
/// success, handler error and suppression by a later middleware.
#[derive(Clone)]
pub struct SessionScopeMiddleware {
    factory: SessionFactory,
}

impl SessionScopeMiddleware {
    pub fn new(factory: SessionFactory) -> Self {
        Self { factory }
    }

    pub async fn before(&self, ctx: &mut EventContext) -> Result<()> {
        let session = self.factory.session().await.map_err(|e| {
            error!(error = %e, "Failed to acquire database session");
            BotError::from(e)
        })?;
        if ctx.set_session(session).is_some() {
            warn!("Event context already held a session; replaced");
        }
        debug!(update_id = ?ctx.update_id(), "Session acquired");
        Ok(())
    }

    /// Releases the event's session back to the pool. Safe to call when none is held.
    pub fn after(&self, ctx: &mut EventContext) {
        if let Some(session) = ctx.take_session() {
            drop(session);
            debug!(update_id = ?ctx.update_id(), "Session released");
        }
    }
}
