//! Unit tests for the middleware crate, kept apart from the code files.


use regbot_core::{CallbackInfo, Event, MessageInfo, User};

pub(crate) fn user(id: i64) -> User {
    User {
        id,
        username: Some(format!("user{}", id)),
        first_name: Some("Test".to_string()),
        last_name: None,
    }
}

pub(crate) fn text_event(user_id: Option<i64>, text: &str) -> Event {
    Event::from_message(MessageInfo {
        message_id: 1,
        chat_id: user_id.unwrap_or(-100),
        from: user_id.map(user),
        text: Some(text.to_string()),
    })
}

pub(crate) fn callback_event(user_id: i64, data: &str) -> Event {
    Event::CallbackQuery(CallbackInfo {
        id: "cb".to_string(),
        from: user(user_id),
        data: Some(data.to_string()),
        chat_id: Some(user_id),
    })
}
