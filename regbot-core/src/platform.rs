//! Port to the remote messaging platform.
//!
//! [`Platform`] is transport-agnostic; `regbot-telegram` implements it via teloxide and tests
//! substitute a recording double.

use async_trait::async_trait;
use std::time::Duration;

use crate::error::Result;
use crate::types::{IncomingUpdate, InlineKeyboard};

/// The bot's own account as reported by the platform.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BotIdentity {
    pub id: i64,
    pub username: Option<String>,
    pub display_name: String,
}

impl BotIdentity {
    /// `@username` when set, otherwise the display name.
    pub fn handle(&self) -> String {
        match &self.username {
            Some(u) => format!("@{}", u),
            None => self.display_name.clone(),
        }
    }
}

/// Parameters for registering a push endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WebhookRegistration {
    pub url: String,
    /// Echoed back by the platform in a header on every push.
    pub secret_token: String,
    /// Discard events queued while no transport was active.
    pub drop_pending_updates: bool,
}

/// Operations the lifecycle manager, transports and handlers need from the platform.
#[async_trait]
pub trait Platform: Send + Sync {
    /// Returns the bot's own identity; fails on bad credentials or an unreachable platform.
    async fn get_me(&self) -> Result<BotIdentity>;

    async fn set_webhook(&self, registration: &WebhookRegistration) -> Result<()>;

    async fn delete_webhook(&self, drop_pending_updates: bool) -> Result<()>;

    /// Long-polls for updates starting at `offset`; returns an empty batch when `timeout` expires.
    async fn get_updates(&self, offset: Option<i64>, timeout: Duration)
        -> Result<Vec<IncomingUpdate>>;

    async fn send_message(&self, chat_id: i64, text: &str) -> Result<()>;

    async fn copy_message(
        &self,
        to_chat_id: i64,
        from_chat_id: i64,
        message_id: i32,
        keyboard: Option<&InlineKeyboard>,
    ) -> Result<()>;

    async fn answer_callback_query(&self, callback_id: &str, text: Option<&str>) -> Result<()>;

    /// Decodes one pushed webhook body into an update.
    fn decode_update(&self, payload: &[u8]) -> Result<IncomingUpdate>;

    /// Closes the network session; later calls fail. Idempotent.
    async fn close(&self) -> Result<()>;
}
