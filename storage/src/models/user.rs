//! User record and registration result.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// Stored user. `registered_at` is server-local time without an offset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserRecord {
    pub id: i64,
    pub tg_id: i64,
    pub full_name: String,
    pub username: Option<String>,
    pub registered_at: NaiveDateTime,
}

/// Registration request as extracted from an inbound event.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NewUser {
    pub tg_id: Option<i64>,
    pub full_name: Option<String>,
    pub username: Option<String>,
}

impl NewUser {
    pub fn new(tg_id: i64, full_name: impl Into<String>, username: Option<String>) -> Self {
        Self {
            tg_id: Some(tg_id),
            full_name: Some(full_name.into()),
            username,
        }
    }
}

/// Outcome of [`crate::UserManager::add_user`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Registration {
    Created,
    /// A record with the same `tg_id` already exists; nothing was written.
    AlreadyExists,
    /// Input was incomplete or the store failed; the transaction was rolled back.
    Failed(String),
}

impl Registration {
    /// `true` only when a new record was committed.
    pub fn is_created(&self) -> bool {
        matches!(self, Registration::Created)
    }
}
