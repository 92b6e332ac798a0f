//! Closed set of interceptors the chain can hold.

use middleware::{SessionScopeMiddleware, ThrottlingMiddleware};
use regbot_core::{Event, EventContext, Result};

/// Whether the chain proceeds downstream after a middleware's `before`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Suppress,
}

/// An interceptor variant. New capabilities are added as variants, not trait objects.
#[derive(Clone)]
pub enum Middleware {
    /// Per-user debounce. Pre-handler only.
    Throttle(ThrottlingMiddleware),
    /// Per-event database session. Releases the session in `after`.
    SessionScope(SessionScopeMiddleware),
}

impl Middleware {
    pub fn name(&self) -> &'static str {
        match self {
            Middleware::Throttle(_) => "throttle",
            Middleware::SessionScope(_) => "session_scope",
        }
    }

    pub async fn before(&self, event: &Event, ctx: &mut EventContext) -> Result<Flow> {
        match self {
            Middleware::Throttle(throttle) => Ok(if throttle.before(event).await {
                Flow::Continue
            } else {
                Flow::Suppress
            }),
            Middleware::SessionScope(scope) => {
                scope.before(ctx).await?;
                Ok(Flow::Continue)
            }
        }
    }

    pub fn after(&self, ctx: &mut EventContext) {
        match self {
            Middleware::Throttle(_) => {}
            Middleware::SessionScope(scope) => scope.after(ctx),
        }
    }
}

impl From<ThrottlingMiddleware> for Middleware {
    fn from(m: ThrottlingMiddleware) -> Self {
        Middleware::Throttle(m)
    }
}

impl From<SessionScopeMiddleware> for Middleware {
    fn from(m: SessionScopeMiddleware) -> Self {
        Middleware::SessionScope(m)
    }
}
