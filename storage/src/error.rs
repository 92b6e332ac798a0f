//! Storage error types.
//!
//! Registration conflicts are not errors; see [`crate::Registration`].

use std::time::Duration;
use thiserror::Error;

/// Errors that can occur when opening the pool or borrowing a session.
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("Failed to connect to database: {0}")]
    Connect(#[source] sqlx::Error),
    #[error("Timed out connecting to database after {0:?}")]
    ConnectTimeout(Duration),
    #[error("Failed to acquire session: {0}")]
    Acquire(#[source] sqlx::Error),
    #[error("Query failed: {0}")]
    Query(#[from] sqlx::Error),
}
