use std::sync::Arc;
use std::time::Duration;

use handler_chain::HandlerChain;
use regbot_core::Platform;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, instrument};

use crate::dispatch_logged;

const FETCH_ERROR_BACKOFF: Duration = Duration::from_secs(1);

/// Long-polls the platform and dispatches each update in order until `cancel` fires.
///
/// Events of one batch are processed sequentially. The offset advances past every update that
/// was dispatched, whether its handler succeeded or not. A failed fetch is logged and retried
/// after a short pause.
#[instrument(skip_all, fields(mode = "polling"))]
pub async fn run_polling(
    platform: Arc<dyn Platform>,
    chain: HandlerChain,
    timeout: Duration,
    cancel: CancellationToken,
) {
    info!(timeout_secs = timeout.as_secs(), "Polling started");
    let mut offset: Option<i64> = None;

    'poll: loop {
        let fetched = tokio::select! {
            _ = cancel.cancelled() => break 'poll,
            fetched = platform.get_updates(offset, timeout) => fetched,
        };

        match fetched {
            Ok(updates) => {
                for update in updates {
                    offset = Some(update.update_id + 1);
                    dispatch_logged(&chain, &update).await;
                    if cancel.is_cancelled() {
                        break 'poll;
                    }
                }
            }
            Err(e) => {
                error!(error = %e, "Failed to fetch updates");
                tokio::select! {
                    _ = cancel.cancelled() => break 'poll,
                    _ = tokio::time::sleep(FETCH_ERROR_BACKOFF) => {}
                }
            }
        }
    }

    info!("Polling stopped");
}
