use regbot_core::{DispatchOutcome, EventContext, IncomingUpdate, Result};
use tracing::{info, instrument};

use crate::middleware::{Flow, Middleware};
use crate::router::Router;

/// Middleware pipeline around a router; the dispatcher every transport feeds.
#[derive(Clone)]
pub struct HandlerChain {
    middleware: Vec<Middleware>,
    router: Router,
}

impl HandlerChain {
    pub fn new(router: Router) -> Self {
        Self {
            middleware: Vec::new(),
            router,
        }
    }

    /// Appends a middleware; the first added is the outermost.
    pub fn add_middleware(mut self, middleware: impl Into<Middleware>) -> Self {
        self.middleware.push(middleware.into());
        self
    }

    pub fn middleware_names(&self) -> Vec<&'static str> {
        self.middleware.iter().map(Middleware::name).collect()
    }

    pub fn router(&self) -> &Router {
        &self.router
    }

    /// Processes one update with a fresh [`EventContext`].
    ///
    /// `after` runs, in reverse order, for every middleware whose `before` succeeded, including
    /// when a later middleware suppresses or fails, or the handler fails.
    #[instrument(skip(self, update), fields(update_id = update.update_id, kind = update.event.kind()))]
    pub async fn dispatch(&self, update: &IncomingUpdate) -> Result<DispatchOutcome> {
        let event = &update.event;
        let mut ctx = EventContext::with_update_id(update.update_id);
        info!(user_id = ?event.user_id(), "step: handler_chain started");

        let mut entered = 0;
        let mut early: Option<Result<DispatchOutcome>> = None;

        for mw in &self.middleware {
            match mw.before(event, &mut ctx).await {
                Ok(Flow::Continue) => entered += 1,
                Ok(Flow::Suppress) => {
                    entered += 1;
                    info!(
                        user_id = ?event.user_id(),
                        middleware = mw.name(),
                        "step: middleware suppressed event, chain stopped"
                    );
                    early = Some(Ok(DispatchOutcome::Suppressed { by: mw.name() }));
                    break;
                }
                Err(e) => {
                    early = Some(Err(e));
                    break;
                }
            }
        }

        let result = match early {
            Some(result) => result,
            None => self.router.dispatch(event, &mut ctx).await,
        };

        for mw in self.middleware[..entered].iter().rev() {
            mw.after(&mut ctx);
        }

        info!(user_id = ?event.user_id(), ok = result.is_ok(), "step: handler_chain finished");
        result
    }
}
