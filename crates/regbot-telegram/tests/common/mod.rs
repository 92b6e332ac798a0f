//! Shared doubles for regbot-telegram integration tests.

#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use regbot_core::{
    BotError, BotIdentity, Event, EventContext, Handler, IncomingUpdate, InlineKeyboard,
    MessageInfo, Platform, Result, User, WebhookRegistration,
};

/// Platform whose `get_updates` returns scripted batches, then idles for the poll timeout.
#[derive(Default)]
pub struct ScriptedPlatform {
    batches: Mutex<VecDeque<Result<Vec<IncomingUpdate>>>>,
    pub offsets: Mutex<Vec<Option<i64>>>,
}

impl ScriptedPlatform {
    pub fn with_batches(batches: Vec<Result<Vec<IncomingUpdate>>>) -> Self {
        Self {
            batches: Mutex::new(batches.into()),
            offsets: Mutex::new(Vec::new()),
        }
    }

    pub fn offsets(&self) -> Vec<Option<i64>> {
        self.offsets.lock().unwrap().clone()
    }
}

#[async_trait]
impl Platform for ScriptedPlatform {
    async fn get_me(&self) -> Result<BotIdentity> {
        Ok(BotIdentity {
            id: 1,
            username: Some("testbot".to_string()),
            display_name: "TestBot".to_string(),
        })
    }

    async fn set_webhook(&self, _registration: &WebhookRegistration) -> Result<()> {
        Ok(())
    }

    async fn delete_webhook(&self, _drop_pending_updates: bool) -> Result<()> {
        Ok(())
    }

    async fn get_updates(&self, offset: Option<i64>, timeout: Duration) -> Result<Vec<IncomingUpdate>> {
        self.offsets.lock().unwrap().push(offset);
        let next = self.batches.lock().unwrap().pop_front();
        match next {
            Some(batch) => batch,
            None => {
                tokio::time::sleep(timeout).await;
                Ok(Vec::new())
            }
        }
    }

    async fn send_message(&self, _chat_id: i64, _text: &str) -> Result<()> {
        Ok(())
    }

    async fn copy_message(
        &self,
        _to_chat_id: i64,
        _from_chat_id: i64,
        _message_id: i32,
        _keyboard: Option<&InlineKeyboard>,
    ) -> Result<()> {
        Ok(())
    }

    async fn answer_callback_query(&self, _callback_id: &str, _text: Option<&str>) -> Result<()> {
        Ok(())
    }

    fn decode_update(&self, _payload: &[u8]) -> Result<IncomingUpdate> {
        Err(BotError::Platform("not supported".to_string()))
    }

    async fn close(&self) -> Result<()> {
        Ok(())
    }
}

/// Records the user id of every event it handles; fails on text "boom".
#[derive(Default)]
pub struct RecordingHandler {
    pub seen: Mutex<Vec<Option<i64>>>,
    pub calls: AtomicUsize,
}

impl RecordingHandler {
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Handler for RecordingHandler {
    async fn handle(&self, event: &Event, _ctx: &mut EventContext) -> Result<()> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.seen.lock().unwrap().push(event.user_id());
        if event.message().and_then(|m| m.text.as_deref()) == Some("boom") {
            return Err(BotError::Platform("handler failed".to_string()));
        }
        Ok(())
    }
}

pub fn text_update(update_id: i64, user_id: i64, text: &str) -> IncomingUpdate {
    IncomingUpdate {
        update_id,
        event: Event::from_message(MessageInfo {
            message_id: update_id as i32,
            chat_id: user_id,
            from: Some(User {
                id: user_id,
                username: None,
                first_name: Some("Test".to_string()),
                last_name: None,
            }),
            text: Some(text.to_string()),
        }),
    }
}
