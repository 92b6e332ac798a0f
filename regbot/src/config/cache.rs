//! Throttle store (Redis) settings.

use std::time::Duration;

use anyhow::Result;

use super::{env_or, env_parse};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheConfig {
    /// REDIS_HOSTNAME
    pub hostname: String,
    /// REDIS_PORT
    pub port: u16,
    /// THROTTLE_ENABLED: wire the throttling middleware into the chain
    pub throttle_enabled: bool,
    /// THROTTLE_WINDOW_SECS
    pub throttle_window: Duration,
}

impl CacheConfig {
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            hostname: env_or("REDIS_HOSTNAME", "127.0.0.1"),
            port: env_parse("REDIS_PORT", 6379)?,
            throttle_enabled: env_parse("THROTTLE_ENABLED", false)?,
            throttle_window: Duration::from_secs(env_parse("THROTTLE_WINDOW_SECS", 1)?),
        })
    }

    pub fn redis_url(&self) -> String {
        format!("redis://{}:{}/", self.hostname, self.port)
    }
}
