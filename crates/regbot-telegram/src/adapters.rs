//! Adapters from Telegram (teloxide) types to regbot_core types.
//! The event variant is decided here, once per update.

use regbot_core::{CallbackInfo, Event, IncomingUpdate, MessageInfo, User};
use teloxide::types::{Update, UpdateKind};

pub fn to_core_user(user: &teloxide::types::User) -> User {
    User {
        id: user.id.0 as i64,
        username: user.username.clone(),
        first_name: Some(user.first_name.clone()),
        last_name: user.last_name.clone(),
    }
}

pub fn to_message_info(msg: &teloxide::types::Message) -> MessageInfo {
    MessageInfo {
        message_id: msg.id.0,
        chat_id: msg.chat.id.0,
        from: msg.from.as_ref().map(to_core_user),
        text: msg.text().map(str::to_string),
    }
}

pub fn to_callback_info(query: &teloxide::types::CallbackQuery) -> CallbackInfo {
    CallbackInfo {
        id: query.id.to_string(),
        from: to_core_user(&query.from),
        data: query.data.clone(),
        chat_id: query.message.as_ref().map(|m| m.chat().id.0),
    }
}

pub fn to_incoming(update: &Update) -> IncomingUpdate {
    let event = match &update.kind {
        UpdateKind::Message(msg) => Event::from_message(to_message_info(msg)),
        UpdateKind::CallbackQuery(query) => Event::CallbackQuery(to_callback_info(query)),
        other => Event::Other {
            kind: kind_name(other).to_string(),
        },
    };
    IncomingUpdate {
        update_id: update.id.0 as i64,
        event,
    }
}

fn kind_name(kind: &UpdateKind) -> &'static str {
    match kind {
        UpdateKind::Message(_) => "message",
        UpdateKind::CallbackQuery(_) => "callback_query",
        UpdateKind::EditedMessage(_) => "edited_message",
        UpdateKind::ChannelPost(_) => "channel_post",
        UpdateKind::EditedChannelPost(_) => "edited_channel_post",
        UpdateKind::InlineQuery(_) => "inline_query",
        UpdateKind::MyChatMember(_) => "my_chat_member",
        UpdateKind::ChatMember(_) => "chat_member",
        _ => "other",
    }
}
