//! # regbot-telegram
//!
//! Telegram side of the bot: [`TelegramPlatform`] implements [`regbot_core::Platform`] over
//! teloxide, [`adapters`] turn Telegram updates into core events, and the two transports
//! ([`run_polling`], [`serve_webhook`]) feed a [`handler_chain::HandlerChain`].

pub mod adapters;
mod platform;
mod polling;
mod webhook;

pub use platform::{TelegramPlatform, REQUEST_TIMEOUT_MARGIN};
pub use polling::run_polling;
pub use webhook::{bind_webhook, serve_webhook, SECRET_TOKEN_HEADER};

use handler_chain::HandlerChain;
use regbot_core::{DispatchOutcome, IncomingUpdate};
use tracing::{debug, error};

/// Dispatches one update, logging the outcome. Errors never propagate to the transport.
pub(crate) async fn dispatch_logged(chain: &HandlerChain, update: &IncomingUpdate) {
    match chain.dispatch(update).await {
        Ok(DispatchOutcome::Handled { route }) => {
            debug!(update_id = update.update_id, route, "Update handled")
        }
        Ok(DispatchOutcome::Unhandled) => {
            debug!(update_id = update.update_id, kind = update.event.kind(), "Update unhandled")
        }
        Ok(DispatchOutcome::Suppressed { by }) => {
            debug!(update_id = update.update_id, middleware = by, "Update suppressed")
        }
        Err(e) => error!(
            update_id = update.update_id,
            user_id = ?update.event.user_id(),
            error = %e,
            "Failed to process update"
        ),
    }
}
