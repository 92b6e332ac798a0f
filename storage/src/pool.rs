//! Session factory: one sqlx pool, one borrowed connection per event.

use std::time::Duration;

use sqlx::any::AnyPoolOptions;
use sqlx::pool::PoolConnection;
use sqlx::{Any, AnyPool};
use tracing::{info, warn};

use crate::error::StorageError;
use crate::schema::{create_users_table, Backend};

/// A pooled connection borrowed for exactly one event. Returned to the pool on drop.
pub type DbSession = PoolConnection<Any>;

/// Pool tuning. `pool_size + max_overflow` is the hard connection cap.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PoolConfig {
    pub pool_size: u32,
    pub max_overflow: u32,
    /// Connections older than this are closed and replaced.
    pub recycle: Duration,
    /// Ping a connection before handing it out.
    pub pre_ping: bool,
    /// Prefer the most recently returned connection. sqlx has no such switch; kept for config
    /// compatibility and logged when it cannot be honored.
    pub use_lifo: bool,
    /// Wait limit for a free connection.
    pub pool_timeout: Duration,
    /// Wait limit for the initial connection; exceeding it is a hard failure.
    pub connect_timeout: Duration,
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self {
            pool_size: 10,
            max_overflow: 20,
            recycle: Duration::from_secs(1800),
            pre_ping: true,
            use_lifo: true,
            pool_timeout: Duration::from_secs(30),
            connect_timeout: Duration::from_secs(60),
        }
    }
}

impl PoolConfig {
    /// Single-connection pool for `sqlite::memory:`; every new connection would see an empty
    /// database.
    pub fn in_memory() -> Self {
        Self {
            pool_size: 1,
            max_overflow: 0,
            ..Self::default()
        }
    }

    pub fn max_connections(&self) -> u32 {
        (self.pool_size + self.max_overflow).max(1)
    }
}

/// Owns the connection pool and hands out per-event sessions.
#[derive(Clone, Debug)]
pub struct SessionFactory {
    pool: AnyPool,
    backend: Backend,
}

impl SessionFactory {
    /// Opens the pool and checks that the database is reachable within
    /// [`PoolConfig::connect_timeout`].
    pub async fn connect(database_url: &str, config: &PoolConfig) -> Result<Self, StorageError> {
        sqlx::any::install_default_drivers();

        let backend = Backend::from_url(database_url).ok_or_else(|| {
            StorageError::Connect(sqlx::Error::Configuration(
                format!("unsupported database url scheme: {}", redact(database_url)).into(),
            ))
        })?;

        info!(
            backend = ?backend,
            max_connections = config.max_connections(),
            "Initializing database pool: {}",
            redact(database_url)
        );
        if config.use_lifo {
            warn!("DB_POOL_USE_LIFO is set but the pool does not support LIFO reuse; ignoring");
        }

        let options = AnyPoolOptions::new()
            .max_connections(config.max_connections())
            .min_connections(0)
            .max_lifetime(Some(config.recycle))
            .idle_timeout(None)
            .test_before_acquire(config.pre_ping)
            .acquire_timeout(config.pool_timeout);

        let pool = tokio::time::timeout(config.connect_timeout, options.connect(database_url))
            .await
            .map_err(|_| StorageError::ConnectTimeout(config.connect_timeout))?
            .map_err(StorageError::Connect)?;

        Ok(Self { pool, backend })
    }

    pub fn backend(&self) -> Backend {
        self.backend
    }

    /// Borrows one connection. Dropping the session returns it to the pool.
    pub async fn session(&self) -> Result<DbSession, StorageError> {
        self.pool.acquire().await.map_err(StorageError::Acquire)
    }

    /// Creates the `users` table if missing.
    pub async fn ensure_schema(&self) -> Result<(), StorageError> {
        let mut session = self.session().await?;
        create_users_table(&mut session, self.backend).await?;
        info!("Database schema ready");
        Ok(())
    }

    pub fn is_closed(&self) -> bool {
        self.pool.is_closed()
    }

    /// Closes the pool: waits for borrowed sessions to come back, then closes every connection.
    /// Later [`SessionFactory::session`] calls fail. Idempotent.
    pub async fn dispose(&self) {
        if self.pool.is_closed() {
            return;
        }
        self.pool.close().await;
        info!("Database pool disposed");
    }
}

/// Hides the password part of a URL for logging.
fn redact(url: &str) -> String {
    match (url.find("://"), url.rfind('@')) {
        (Some(scheme_end), Some(at)) if at > scheme_end => {
            let creds = &url[scheme_end + 3..at];
            match creds.split_once(':') {
                Some((user, _)) => format!("{}{}:***{}", &url[..scheme_end + 3], user, &url[at..]),
                None => url.to_string(),
            }
        }
        _ => url.to_string(),
    }
}
