//! teloxide-backed [`Platform`].

use std::time::Duration;

use async_trait::async_trait;
use regbot_core::{
    BotError, BotIdentity, IncomingUpdate, InlineKeyboard, Platform, Result, WebhookRegistration,
};
use teloxide::prelude::*;
use teloxide::types::{
    CallbackQueryId, ChatId, InlineKeyboardButton, InlineKeyboardMarkup, MessageId, Update,
};
use tokio::sync::RwLock;
use tracing::{info, instrument};

use crate::adapters;

/// Headroom the HTTP client allows on top of the long-poll wait.
pub const REQUEST_TIMEOUT_MARGIN: Duration = Duration::from_secs(10);

/// Holds the teloxide bot (and with it the HTTP client) until [`Platform::close`].
pub struct TelegramPlatform {
    bot: RwLock<Option<Bot>>,
    request_timeout: Duration,
}

impl TelegramPlatform {
    /// Builds the bot client. `api_url` points at a local Bot API server or a test double.
    ///
    /// The HTTP client timeout is `poll_timeout` plus [`REQUEST_TIMEOUT_MARGIN`]; teloxide's
    /// default client gives up after 17s, which would abort every longer `getUpdates`.
    pub fn new(token: &str, api_url: Option<&str>, poll_timeout: Duration) -> Result<Self> {
        let request_timeout = poll_timeout + REQUEST_TIMEOUT_MARGIN;
        let client = teloxide::net::default_reqwest_settings()
            .timeout(request_timeout)
            .build()
            .map_err(|e| BotError::Config(format!("Failed to build HTTP client: {}", e)))?;
        let bot = Bot::with_client(token, client);
        let bot = match api_url {
            Some(url_str) => {
                let url = reqwest::Url::parse(url_str).map_err(|e| {
                    BotError::Config(format!("Invalid TELEGRAM_API_URL {}: {}", url_str, e))
                })?;
                bot.set_api_url(url)
            }
            None => bot,
        };
        Ok(Self {
            bot: RwLock::new(Some(bot)),
            request_timeout,
        })
    }

    pub fn request_timeout(&self) -> Duration {
        self.request_timeout
    }

    pub async fn is_closed(&self) -> bool {
        self.bot.read().await.is_none()
    }

    async fn bot(&self) -> Result<Bot> {
        self.bot
            .read()
            .await
            .clone()
            .ok_or_else(|| BotError::Platform("bot session is closed".to_string()))
    }

    fn map_err(e: teloxide::RequestError) -> BotError {
        BotError::Platform(format!("telegram error: {}", e))
    }

    fn markup(keyboard: &InlineKeyboard) -> InlineKeyboardMarkup {
        let rows: Vec<Vec<InlineKeyboardButton>> = keyboard
            .rows
            .iter()
            .map(|row| {
                row.iter()
                    .map(|b| InlineKeyboardButton::callback(b.label.clone(), b.callback_data.clone()))
                    .collect()
            })
            .collect();
        InlineKeyboardMarkup::new(rows)
    }
}

#[async_trait]
impl Platform for TelegramPlatform {
    async fn get_me(&self) -> Result<BotIdentity> {
        let me = self.bot().await?.get_me().await.map_err(Self::map_err)?;
        Ok(BotIdentity {
            id: me.user.id.0 as i64,
            username: me.user.username.clone(),
            display_name: me.user.first_name.clone(),
        })
    }

    #[instrument(skip(self, registration), fields(url = %registration.url))]
    async fn set_webhook(&self, registration: &WebhookRegistration) -> Result<()> {
        let url = reqwest::Url::parse(&registration.url)
            .map_err(|e| BotError::Config(format!("Invalid webhook url: {}", e)))?;
        self.bot()
            .await?
            .set_webhook(url)
            .secret_token(registration.secret_token.clone())
            .drop_pending_updates(registration.drop_pending_updates)
            .await
            .map_err(Self::map_err)?;
        Ok(())
    }

    async fn delete_webhook(&self, drop_pending_updates: bool) -> Result<()> {
        self.bot()
            .await?
            .delete_webhook()
            .drop_pending_updates(drop_pending_updates)
            .await
            .map_err(Self::map_err)?;
        Ok(())
    }

    async fn get_updates(
        &self,
        offset: Option<i64>,
        timeout: Duration,
    ) -> Result<Vec<IncomingUpdate>> {
        let bot = self.bot().await?;
        let mut request = bot.get_updates().timeout(timeout.as_secs() as u32);
        if let Some(offset) = offset {
            request = request.offset(offset as i32);
        }
        let updates = request.await.map_err(Self::map_err)?;
        Ok(updates.iter().map(adapters::to_incoming).collect())
    }

    async fn send_message(&self, chat_id: i64, text: &str) -> Result<()> {
        self.bot()
            .await?
            .send_message(ChatId(chat_id), text.to_string())
            .await
            .map_err(Self::map_err)?;
        Ok(())
    }

    async fn copy_message(
        &self,
        to_chat_id: i64,
        from_chat_id: i64,
        message_id: i32,
        keyboard: Option<&InlineKeyboard>,
    ) -> Result<()> {
        let bot = self.bot().await?;
        let mut request = bot.copy_message(ChatId(to_chat_id), ChatId(from_chat_id), MessageId(message_id));
        if let Some(keyboard) = keyboard {
            request = request.reply_markup(Self::markup(keyboard));
        }
        request.await.map_err(Self::map_err)?;
        Ok(())
    }

    async fn answer_callback_query(&self, callback_id: &str, text: Option<&str>) -> Result<()> {
        let bot = self.bot().await?;
        let mut request = bot.answer_callback_query(CallbackQueryId(callback_id.to_string()));
        if let Some(text) = text {
            request = request.text(text.to_string());
        }
        request.await.map_err(Self::map_err)?;
        Ok(())
    }

    fn decode_update(&self, payload: &[u8]) -> Result<IncomingUpdate> {
        let update: Update = serde_json::from_slice(payload)
            .map_err(|e| BotError::Platform(format!("malformed update: {}", e)))?;
        Ok(adapters::to_incoming(&update))
    }

    /// Drops the bot and its HTTP client. Does not call the Bot API `close` method, which would
    /// log the bot out of the cloud server.
    async fn close(&self) -> Result<()> {
        if self.bot.write().await.take().is_some() {
            info!("Telegram bot session closed");
        }
        Ok(())
    }
}
