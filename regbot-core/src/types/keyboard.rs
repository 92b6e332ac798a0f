//! Transport-neutral inline keyboard.

use serde::{Deserialize, Serialize};

/// One inline button: visible label plus the callback payload sent back on press.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InlineButton {
    pub label: String,
    pub callback_data: String,
}

impl InlineButton {
    pub fn callback(label: impl Into<String>, callback_data: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            callback_data: callback_data.into(),
        }
    }
}

/// Rows of inline buttons attached to a message.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InlineKeyboard {
    pub rows: Vec<Vec<InlineButton>>,
}

impl InlineKeyboard {
    pub fn new(rows: Vec<Vec<InlineButton>>) -> Self {
        Self { rows }
    }
}
