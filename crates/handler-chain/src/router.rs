//! Event routing: first matching route wins.

use std::sync::Arc;

use regbot_core::{DispatchOutcome, Event, EventContext, Handler, Result};
use tracing::{debug, info};

/// Predicate over the event's shape.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EventFilter {
    /// `/name` command.
    Command(&'static str),
    /// Callback whose data equals the payload.
    Callback(&'static str),
    AnyCallback,
    /// Any message, command or not. Use as the catch-all after command routes.
    Message,
    Any,
}

impl EventFilter {
    pub fn matches(&self, event: &Event) -> bool {
        match (self, event) {
            (EventFilter::Any, _) => true,
            (EventFilter::Command(expected), Event::Command { name, .. }) => name == expected,
            (EventFilter::Callback(expected), Event::CallbackQuery(cb)) => {
                cb.data.as_deref() == Some(*expected)
            }
            (EventFilter::AnyCallback, Event::CallbackQuery(_)) => true,
            (EventFilter::Message, Event::Command { .. } | Event::PlainMessage(_)) => true,
            _ => false,
        }
    }
}

#[derive(Clone)]
struct Route {
    name: &'static str,
    filter: EventFilter,
    handler: Arc<dyn Handler>,
}

/// Ordered list of routes. Nested routers are flattened on [`Router::include`], keeping order.
#[derive(Clone, Default)]
pub struct Router {
    routes: Vec<Route>,
}

impl Router {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn route(mut self, name: &'static str, filter: EventFilter, handler: Arc<dyn Handler>) -> Self {
        self.routes.push(Route {
            name,
            filter,
            handler,
        });
        self
    }

    /// Appends all routes of `other` after the current ones.
    pub fn include(mut self, other: Router) -> Self {
        self.routes.extend(other.routes);
        self
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }

    pub fn route_names(&self) -> Vec<&'static str> {
        self.routes.iter().map(|r| r.name).collect()
    }

    /// Runs the first matching handler. No match is [`DispatchOutcome::Unhandled`], not an error.
    pub async fn dispatch(&self, event: &Event, ctx: &mut EventContext) -> Result<DispatchOutcome> {
        let Some(route) = self.routes.iter().find(|r| r.filter.matches(event)) else {
            debug!(kind = event.kind(), "step: no route matched, event unhandled");
            return Ok(DispatchOutcome::Unhandled);
        };

        info!(
            user_id = ?event.user_id(),
            route = route.name,
            "step: handler processing"
        );
        route.handler.handle(event, ctx).await?;
        info!(user_id = ?event.user_id(), route = route.name, "step: handler done");

        Ok(DispatchOutcome::Handled { route: route.name })
    }
}
