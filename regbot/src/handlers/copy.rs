use std::sync::Arc;

use async_trait::async_trait;
use regbot_core::{Event, EventContext, Handler, HandlerError, Platform, Result};

use super::keyboards::main_menu;

/// Copies any message back to its sender with the main menu attached.
pub struct CopyHandler {
    platform: Arc<dyn Platform>,
}

impl CopyHandler {
    pub fn new(platform: Arc<dyn Platform>) -> Self {
        Self { platform }
    }
}

#[async_trait]
impl Handler for CopyHandler {
    async fn handle(&self, event: &Event, _ctx: &mut EventContext) -> Result<()> {
        let message = event.message().ok_or(HandlerError::NoMessage)?;
        // Private replies go to the sender; anonymous posts go back to their chat.
        let to_chat = message.from.as_ref().map(|u| u.id).unwrap_or(message.chat_id);
        self.platform
            .copy_message(to_chat, message.chat_id, message.message_id, Some(&main_menu()))
            .await
    }
}
