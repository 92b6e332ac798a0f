//! Shared doubles for regbot integration tests.

#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use middleware::{InMemoryThrottleStore, ThrottlingMiddleware};
use regbot::{BotComponents, ManagerSettings, WebhookConfig};
use regbot_core::{
    BotError, BotIdentity, CallbackInfo, Event, IncomingUpdate, InlineKeyboard, MessageInfo,
    Platform, Result, User, WebhookRegistration,
};
use storage::{PoolConfig, SessionFactory, UserManager};

/// Platform double that records every call in order and serves scripted update batches.
#[derive(Default)]
pub struct MockPlatform {
    calls: Mutex<Vec<String>>,
    batches: Mutex<VecDeque<Vec<IncomingUpdate>>>,
    pub copies: Mutex<Vec<(i64, i64, i32, Option<InlineKeyboard>)>>,
    pub sent: Mutex<Vec<(i64, String)>>,
    pub answers: Mutex<Vec<(String, Option<String>)>>,
    pub webhooks: Mutex<Vec<WebhookRegistration>>,
    pub fail_get_me: AtomicBool,
    pub fail_delete_webhook: AtomicBool,
}

impl MockPlatform {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing_get_me() -> Self {
        let platform = Self::default();
        platform.fail_get_me.store(true, Ordering::SeqCst);
        platform
    }

    pub fn push_batch(&self, batch: Vec<IncomingUpdate>) {
        self.batches.lock().unwrap().push_back(batch);
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    /// Index of the first call with this name.
    pub fn position(&self, name: &str) -> Option<usize> {
        self.calls().iter().position(|c| c == name)
    }

    fn record(&self, call: impl Into<String>) {
        self.calls.lock().unwrap().push(call.into());
    }
}

#[async_trait]
impl Platform for MockPlatform {
    async fn get_me(&self) -> Result<BotIdentity> {
        self.record("get_me");
        if self.fail_get_me.load(Ordering::SeqCst) {
            return Err(BotError::Platform("Unauthorized".to_string()));
        }
        Ok(BotIdentity {
            id: 1000,
            username: Some("regbot_test_bot".to_string()),
            display_name: "RegBot".to_string(),
        })
    }

    async fn set_webhook(&self, registration: &WebhookRegistration) -> Result<()> {
        self.record("set_webhook");
        self.webhooks.lock().unwrap().push(registration.clone());
        Ok(())
    }

    async fn delete_webhook(&self, drop_pending_updates: bool) -> Result<()> {
        self.record(format!("delete_webhook({})", drop_pending_updates));
        if self.fail_delete_webhook.load(Ordering::SeqCst) {
            return Err(BotError::Platform("webhook was not set".to_string()));
        }
        Ok(())
    }

    async fn get_updates(&self, _offset: Option<i64>, timeout: Duration) -> Result<Vec<IncomingUpdate>> {
        self.record("get_updates");
        let next = self.batches.lock().unwrap().pop_front();
        match next {
            Some(batch) => Ok(batch),
            None => {
                tokio::time::sleep(timeout).await;
                Ok(Vec::new())
            }
        }
    }

    async fn send_message(&self, chat_id: i64, text: &str) -> Result<()> {
        self.record("send_message");
        self.sent.lock().unwrap().push((chat_id, text.to_string()));
        Ok(())
    }

    async fn copy_message(
        &self,
        to_chat_id: i64,
        from_chat_id: i64,
        message_id: i32,
        keyboard: Option<&InlineKeyboard>,
    ) -> Result<()> {
        self.record("copy_message");
        self.copies
            .lock()
            .unwrap()
            .push((to_chat_id, from_chat_id, message_id, keyboard.cloned()));
        Ok(())
    }

    async fn answer_callback_query(&self, callback_id: &str, text: Option<&str>) -> Result<()> {
        self.record("answer_callback_query");
        self.answers
            .lock()
            .unwrap()
            .push((callback_id.to_string(), text.map(str::to_string)));
        Ok(())
    }

    fn decode_update(&self, _payload: &[u8]) -> Result<IncomingUpdate> {
        Err(BotError::Platform("decode not supported by mock".to_string()))
    }

    async fn close(&self) -> Result<()> {
        self.record("close");
        Ok(())
    }
}

/// In-memory SQLite pool with the `users` table created.
pub async fn memory_sessions() -> SessionFactory {
    let sessions = SessionFactory::connect("sqlite::memory:", &PoolConfig::in_memory())
        .await
        .expect("connect sqlite");
    sessions.ensure_schema().await.expect("create schema");
    sessions
}

pub async fn components(platform: Arc<MockPlatform>, throttle_window: Option<Duration>) -> BotComponents {
    BotComponents {
        platform,
        sessions: memory_sessions().await,
        users: UserManager::new(chrono_tz::Europe::Moscow),
        throttle: throttle_window.map(|window| {
            ThrottlingMiddleware::new(Arc::new(InMemoryThrottleStore::new()), window)
        }),
    }
}

/// Fast shutdown, webhook on an ephemeral localhost port.
pub fn settings() -> ManagerSettings {
    ManagerSettings {
        webhook: WebhookConfig {
            url: "https://bot.example.com".to_string(),
            path: "/webhook".to_string(),
            secret: "s3cret".to_string(),
            host: "127.0.0.1".to_string(),
            port: 0,
        },
        polling_timeout: Duration::from_millis(50),
        shutdown_grace: Duration::from_secs(2),
    }
}

pub fn user(id: i64, first_name: &str, username: Option<&str>) -> User {
    User {
        id,
        username: username.map(str::to_string),
        first_name: Some(first_name.to_string()),
        last_name: None,
    }
}

pub fn message_update(update_id: i64, from: User, text: &str) -> IncomingUpdate {
    IncomingUpdate {
        update_id,
        event: Event::from_message(MessageInfo {
            message_id: update_id as i32,
            chat_id: from.id,
            from: Some(from),
            text: Some(text.to_string()),
        }),
    }
}

pub fn callback_update(update_id: i64, from: User, data: &str) -> IncomingUpdate {
    IncomingUpdate {
        update_id,
        event: Event::CallbackQuery(CallbackInfo {
            id: format!("cb-{}", update_id),
            chat_id: Some(from.id),
            from,
            data: Some(data.to_string()),
        }),
    }
}

/// Polls `cond` every 10ms for up to 2s.
pub async fn wait_until(mut cond: impl FnMut() -> bool) -> bool {
    for _ in 0..200 {
        if cond() {
            return true;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    cond()
}
