use std::sync::Arc;
use std::time::Duration;

use regbot_core::Event;
use tracing::{debug, info, instrument, warn};

use crate::throttle_store::ThrottleStore;

/// Value stored under a throttle key; only its presence matters.
pub const THROTTLE_SENTINEL: &str = "1";

pub fn throttle_key(user_id: i64) -> String {
    format!("throttle:{}", user_id)
}

/// Drops events from a user while a throttle record for that user is live.
///
/// The get-then-set pair is not atomic: two events for the same user delivered concurrently can
/// both pass. Debounce is best-effort.
#[derive(Clone)]
pub struct ThrottlingMiddleware {
    store: Arc<dyn ThrottleStore>,
    window: Duration,
}

impl ThrottlingMiddleware {
    pub fn new(store: Arc<dyn ThrottleStore>, window: Duration) -> Self {
        Self { store, window }
    }

    pub fn window(&self) -> Duration {
        self.window
    }

    /// Returns `true` to continue downstream, `false` to suppress.
    ///
    /// Events without a user pass. Store errors are logged and the event passes.
    #[instrument(skip(self, event), fields(kind = event.kind()))]
    pub async fn before(&self, event: &Event) -> bool {
        let Some(user_id) = event.user_id() else {
            debug!("No user on event, throttle skipped");
            return true;
        };
        let key = throttle_key(user_id);

        match self.store.get(&key).await {
            Ok(Some(_)) => {
                info!(user_id, "Throttled: event suppressed");
                return false;
            }
            Ok(None) => {}
            Err(e) => {
                warn!(user_id, error = %e, "Throttle lookup failed, letting event through");
                return true;
            }
        }

        if let Err(e) = self.store.set_ex(&key, THROTTLE_SENTINEL, self.window).await {
            warn!(user_id, error = %e, "Failed to write throttle record");
        }
        true
    }
}
