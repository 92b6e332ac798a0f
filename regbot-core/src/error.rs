//! Error types for the bot core.
//!
//! [`BotError`] is the top-level error; [`HandlerError`] is used for handler failures.

use thiserror::Error;

/// Top-level error (platform transport, database, cache, handler, config, lifecycle, IO).
#[derive(Error, Debug)]
pub enum BotError {
    #[error("Platform error: {0}")]
    Platform(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Cache error: {0}")]
    Cache(String),

    #[error("Handler error: {0}")]
    Handler(#[from] HandlerError),

    #[error("Config error: {0}")]
    Config(String),

    #[error("Lifecycle error: {0}")]
    Lifecycle(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors produced by handlers.
#[derive(Error, Debug)]
pub enum HandlerError {
    #[error("Event carries no message")]
    NoMessage,
}

impl From<storage::StorageError> for BotError {
    fn from(e: storage::StorageError) -> Self {
        BotError::Database(e.to_string())
    }
}

/// Result type for core operations; uses [`BotError`].
pub type Result<T> = std::result::Result<T, BotError>;
