//! # Middleware crate for regbot
//!
//! Interceptors that wrap handler invocation: per-event database session scope and per-user
//! throttling, plus the throttle store they rely on. Composition lives in `handler-chain`.

mod session_middleware;
mod throttle_store;
mod throttling_middleware;

#[cfg(test)]
mod test;

pub use session_middleware::SessionScopeMiddleware;
pub use throttle_store::{InMemoryThrottleStore, RedisThrottleStore, ThrottleStore, ThrottleStoreError};
pub use throttling_middleware::{throttle_key, ThrottlingMiddleware, THROTTLE_SENTINEL};
