//! BotConfig: BaseConfig + WebhookConfig + DatabaseConfig + CacheConfig.

use anyhow::Result;

use super::{BaseConfig, CacheConfig, DatabaseConfig, WebhookConfig};

/// Full bot config. Use BotConfig::load() for env-based loading, then validate().
#[derive(Debug, Clone)]
pub struct BotConfig {
    pub base: BaseConfig,
    pub webhook: WebhookConfig,
    pub database: DatabaseConfig,
    pub cache: CacheConfig,
}

impl BotConfig {
    /// Load full config from environment variables. If `token` is provided it overrides BOT_TOKEN.
    pub fn load(token: Option<String>) -> Result<Self> {
        Ok(Self {
            base: BaseConfig::load(token)?,
            webhook: WebhookConfig::from_env()?,
            database: DatabaseConfig::from_env()?,
            cache: CacheConfig::from_env()?,
        })
    }

    /// Validate config. Call after load() to fail fast before init.
    pub fn validate(&self) -> Result<()> {
        self.base.validate()?;
        self.webhook.validate()?;
        if self.database.pool.pool_size + self.database.pool.max_overflow == 0 {
            anyhow::bail!("DB_POOL_SIZE + DB_MAX_OVERFLOW must be at least 1");
        }
        if self.cache.throttle_enabled && self.cache.throttle_window.is_zero() {
            anyhow::bail!("THROTTLE_WINDOW_SECS must be at least 1 when throttling is enabled");
        }
        Ok(())
    }

    pub fn bot_token(&self) -> &str {
        &self.base.bot_token
    }
    pub fn telegram_api_url(&self) -> Option<&str> {
        self.base.telegram_api_url.as_deref()
    }
    pub fn log_file(&self) -> &str {
        &self.base.log_file
    }
    pub fn database_url(&self) -> &str {
        &self.database.url
    }
}
