//! Key-value store with per-key expiry, used for throttle records.
//!
//! Individual `get` / `set_ex` calls are atomic in the backing store; a sequence of them is not.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use parking_lot::Mutex;
use redis::aio::ConnectionManager;
use regbot_core::BotError;
use thiserror::Error;
use tracing::info;

#[derive(Error, Debug)]
pub enum ThrottleStoreError {
    #[error("Redis error: {0}")]
    Redis(#[from] redis::RedisError),
}

impl From<ThrottleStoreError> for BotError {
    fn from(e: ThrottleStoreError) -> Self {
        BotError::Cache(e.to_string())
    }
}

/// `GET key` / `SET key value EX seconds`.
#[async_trait]
pub trait ThrottleStore: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<String>, ThrottleStoreError>;

    async fn set_ex(&self, key: &str, value: &str, ttl: Duration) -> Result<(), ThrottleStoreError>;
}

/// Redis-backed store. The connection manager multiplexes and reconnects on its own.
#[derive(Clone)]
pub struct RedisThrottleStore {
    conn: ConnectionManager,
}

impl RedisThrottleStore {
    pub async fn connect(url: &str) -> Result<Self, ThrottleStoreError> {
        info!("Connecting to throttle store: {}", url);
        let client = redis::Client::open(url)?;
        let conn = ConnectionManager::new(client).await?;
        Ok(Self { conn })
    }
}

#[async_trait]
impl ThrottleStore for RedisThrottleStore {
    async fn get(&self, key: &str) -> Result<Option<String>, ThrottleStoreError> {
        let mut conn = self.conn.clone();
        let value: Option<String> = redis::cmd("GET").arg(key).query_async(&mut conn).await?;
        Ok(value)
    }

    async fn set_ex(&self, key: &str, value: &str, ttl: Duration) -> Result<(), ThrottleStoreError> {
        let mut conn = self.conn.clone();
        // EX takes whole seconds; a sub-second window still suppresses for one second.
        let seconds = ttl.as_secs().max(1);
        redis::cmd("SET")
            .arg(key)
            .arg(value)
            .arg("EX")
            .arg(seconds)
            .query_async::<_, ()>(&mut conn)
            .await?;
        Ok(())
    }
}

/// Process-local store for tests and single-node runs without Redis.
#[derive(Default)]
pub struct InMemoryThrottleStore {
    entries: Mutex<HashMap<String, (String, Instant)>>,
}

impl InMemoryThrottleStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored keys, expired or not.
    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }

    /// Number of keys not yet expired.
    pub fn live_keys(&self) -> usize {
        let now = Instant::now();
        self.entries
            .lock()
            .values()
            .filter(|(_, expires)| *expires > now)
            .count()
    }
}

#[async_trait]
impl ThrottleStore for InMemoryThrottleStore {
    async fn get(&self, key: &str) -> Result<Option<String>, ThrottleStoreError> {
        let mut entries = self.entries.lock();
        match entries.get(key) {
            Some((value, expires)) if *expires > Instant::now() => Ok(Some(value.clone())),
            Some(_) => {
                entries.remove(key);
                Ok(None)
            }
            None => Ok(None),
        }
    }

    /// Drops every expired entry before inserting, so keys that are never read again do not
    /// accumulate.
    async fn set_ex(&self, key: &str, value: &str, ttl: Duration) -> Result<(), ThrottleStoreError> {
        let now = Instant::now();
        let mut entries = self.entries.lock();
        entries.retain(|_, (_, expires)| *expires > now);
        entries.insert(key.to_string(), (value.to_string(), now + ttl));
        Ok(())
    }
}
