//! Handler trait: the endpoint a route dispatches to.

use async_trait::async_trait;

use super::event::Event;
use crate::context::EventContext;

/// Business handler invoked by the router for a matching event.
///
/// The context carries the per-event database session when the session-scope middleware is
/// installed. Errors are logged by the transport and never stop it.
#[async_trait]
pub trait Handler: Send + Sync {
    async fn handle(&self, event: &Event, ctx: &mut EventContext) -> crate::error::Result<()>;
}
