//! Inbound event union, decided once at the ingress boundary and matched exhaustively downstream.

use serde::{Deserialize, Serialize};

use super::user::User;

/// Message payload shared by command and plain-message events.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageInfo {
    pub message_id: i32,
    pub chat_id: i64,
    pub from: Option<User>,
    pub text: Option<String>,
}

/// Inline-button press.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CallbackInfo {
    pub id: String,
    pub from: User,
    pub data: Option<String>,
    /// Chat of the message the keyboard was attached to, when still accessible.
    pub chat_id: Option<i64>,
}

/// One inbound event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Event {
    /// Text message starting with `/name`; `args` is the rest of the text, trimmed.
    Command {
        name: String,
        args: String,
        message: MessageInfo,
    },
    CallbackQuery(CallbackInfo),
    /// Any other message (text or media).
    PlainMessage(MessageInfo),
    /// Update kinds this bot does not route (edited messages, chat member updates, ...).
    Other { kind: String },
}

impl Event {
    /// Classifies a message as [`Event::Command`] or [`Event::PlainMessage`].
    ///
    /// `/start`, `/start@SomeBot` and `/start payload` all yield the command `start`.
    pub fn from_message(message: MessageInfo) -> Self {
        let parsed = message.text.as_deref().and_then(parse_command);
        match parsed {
            Some((name, args)) => Event::Command {
                name,
                args,
                message,
            },
            None => Event::PlainMessage(message),
        }
    }

    /// Message payload for command and plain-message events.
    pub fn message(&self) -> Option<&MessageInfo> {
        match self {
            Event::Command { message, .. } | Event::PlainMessage(message) => Some(message),
            Event::CallbackQuery(_) | Event::Other { .. } => None,
        }
    }

    /// Originating user; only message and callback events carry one.
    pub fn user(&self) -> Option<&User> {
        match self {
            Event::Command { message, .. } | Event::PlainMessage(message) => message.from.as_ref(),
            Event::CallbackQuery(cb) => Some(&cb.from),
            Event::Other { .. } => None,
        }
    }

    pub fn user_id(&self) -> Option<i64> {
        self.user().map(|u| u.id)
    }

    /// Short label for logs.
    pub fn kind(&self) -> &str {
        match self {
            Event::Command { .. } => "command",
            Event::CallbackQuery(_) => "callback_query",
            Event::PlainMessage(_) => "message",
            Event::Other { kind } => kind,
        }
    }
}

/// An event together with the platform's delivery id (used as the polling offset).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IncomingUpdate {
    pub update_id: i64,
    pub event: Event,
}

fn parse_command(text: &str) -> Option<(String, String)> {
    let rest = text.strip_prefix('/')?;
    let (head, args) = match rest.split_once(char::is_whitespace) {
        Some((head, args)) => (head, args.trim()),
        None => (rest, ""),
    };
    let name = head.split('@').next().unwrap_or_default();
    if name.is_empty() {
        return None;
    }
    Some((name.to_string(), args.to_string()))
}
