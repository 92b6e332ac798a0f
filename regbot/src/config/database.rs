//! Database connection and pool settings.

use std::env;
use std::time::Duration;

use anyhow::{Context, Result};
use storage::PoolConfig;

use super::env_parse;

#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    /// DATABASE_URL, or built from DATABASE_USER / PASSWORD / HOSTNAME / SCHEMA / PORT
    pub url: String,
    pub pool: PoolConfig,
}

impl DatabaseConfig {
    pub fn from_env() -> Result<Self> {
        let url = match env::var("DATABASE_URL") {
            Ok(url) if !url.trim().is_empty() => url,
            _ => mysql_url_from_env()?,
        };
        Ok(Self {
            url,
            pool: pool_from_env()?,
        })
    }
}

fn mysql_url_from_env() -> Result<String> {
    let user = env::var("DATABASE_USER").context("DATABASE_USER not set (or set DATABASE_URL)")?;
    let password = env::var("DATABASE_PASSWORD").unwrap_or_default();
    let host =
        env::var("DATABASE_HOSTNAME").context("DATABASE_HOSTNAME not set (or set DATABASE_URL)")?;
    let schema =
        env::var("DATABASE_SCHEMA").context("DATABASE_SCHEMA not set (or set DATABASE_URL)")?;
    let port: u16 = env_parse("DATABASE_PORT", 3306)?;
    mysql_url(&user, &password, &host, port, &schema)
}

/// Builds a MySQL URL with credentials percent-encoded and `charset=utf8mb4`.
pub(crate) fn mysql_url(
    user: &str,
    password: &str,
    host: &str,
    port: u16,
    schema: &str,
) -> Result<String> {
    let mut url = reqwest::Url::parse("mysql://localhost").context("base mysql url")?;
    url.set_host(Some(host))
        .with_context(|| format!("Invalid DATABASE_HOSTNAME: {}", host))?;
    url.set_port(Some(port))
        .map_err(|_| anyhow::anyhow!("Cannot set port on database url"))?;
    url.set_username(user)
        .map_err(|_| anyhow::anyhow!("Cannot set username on database url"))?;
    if !password.is_empty() {
        url.set_password(Some(password))
            .map_err(|_| anyhow::anyhow!("Cannot set password on database url"))?;
    }
    url.set_path(schema);
    url.query_pairs_mut().append_pair("charset", "utf8mb4");
    Ok(url.to_string())
}

fn pool_from_env() -> Result<PoolConfig> {
    let d = PoolConfig::default();
    Ok(PoolConfig {
        pool_size: env_parse("DB_POOL_SIZE", d.pool_size)?,
        max_overflow: env_parse("DB_MAX_OVERFLOW", d.max_overflow)?,
        recycle: Duration::from_secs(env_parse("DB_POOL_RECYCLE_SECS", d.recycle.as_secs())?),
        pre_ping: env_parse("DB_POOL_PRE_PING", d.pre_ping)?,
        use_lifo: env_parse("DB_POOL_USE_LIFO", d.use_lifo)?,
        pool_timeout: Duration::from_secs(env_parse(
            "DB_POOL_TIMEOUT_SECS",
            d.pool_timeout.as_secs(),
        )?),
        connect_timeout: Duration::from_secs(env_parse(
            "DB_CONNECT_TIMEOUT_SECS",
            d.connect_timeout.as_secs(),
        )?),
    })
}
