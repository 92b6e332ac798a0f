//! # Handler chain
//!
//! Runs each event through an ordered, closed set of middleware and then a [`Router`] that picks
//! exactly one handler. Middleware `before` runs in registration order; `after` runs in reverse
//! for every middleware whose `before` completed, whatever happened downstream.

mod chain;
mod middleware;
mod router;

pub use chain::HandlerChain;
pub use middleware::{Flow, Middleware};
pub use router::{EventFilter, Router};
