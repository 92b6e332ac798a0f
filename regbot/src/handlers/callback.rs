use std::sync::Arc;

use async_trait::async_trait;
use regbot_core::{Event, EventContext, Handler, Platform, Result};
use tracing::debug;

use super::keyboards::{CALLBACK_HELP, CALLBACK_OPTION_1, CALLBACK_OPTION_2};
use super::texts;

/// Acknowledges main-menu button presses with a short notice.
pub struct MenuCallbackHandler {
    platform: Arc<dyn Platform>,
}

impl MenuCallbackHandler {
    pub fn new(platform: Arc<dyn Platform>) -> Self {
        Self { platform }
    }
}

#[async_trait]
impl Handler for MenuCallbackHandler {
    async fn handle(&self, event: &Event, _ctx: &mut EventContext) -> Result<()> {
        let Event::CallbackQuery(query) = event else {
            return Ok(());
        };
        let notice = match query.data.as_deref() {
            Some(CALLBACK_OPTION_1) => Some(texts::OPTION_1_SELECTED),
            Some(CALLBACK_OPTION_2) => Some(texts::OPTION_2_SELECTED),
            Some(CALLBACK_HELP) => Some(texts::HELP),
            _ => None,
        };
        debug!(user_id = query.from.id, data = ?query.data, "Menu callback");
        self.platform.answer_callback_query(&query.id, notice).await
    }
}
