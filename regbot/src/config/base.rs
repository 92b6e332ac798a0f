//! Base config: Telegram connection, logging, timezone and transport timing. Loaded from env.

use std::env;
use std::time::Duration;

use anyhow::{Context, Result};
use chrono_tz::Tz;

use super::{env_or, env_parse};

#[derive(Debug, Clone)]
pub struct BaseConfig {
    /// BOT_TOKEN
    pub bot_token: String,
    /// TELEGRAM_API_URL or TELOXIDE_API_URL
    pub telegram_api_url: Option<String>,
    /// Log file path
    pub log_file: String,
    /// TZ; timezone for `registered_at`
    pub timezone: Tz,
    /// Long-poll wait per getUpdates call
    pub polling_timeout: Duration,
    /// Bound on waiting for in-flight events during stop
    pub shutdown_grace: Duration,
}

impl BaseConfig {
    /// Load from environment variables. `token` overrides BOT_TOKEN if provided.
    pub fn load(token: Option<String>) -> Result<Self> {
        let bot_token = match token {
            Some(t) => t,
            None => env::var("BOT_TOKEN").context("BOT_TOKEN not set")?,
        };
        let telegram_api_url = env::var("TELEGRAM_API_URL")
            .or_else(|_| env::var("TELOXIDE_API_URL"))
            .ok();
        let log_file = env_or("LOG_FILE", "logs/regbot.log");
        let tz_name = env_or("TZ", "Europe/Moscow");
        let timezone: Tz = tz_name
            .parse()
            .map_err(|e| anyhow::anyhow!("TZ is not a valid IANA timezone ({}): {}", tz_name, e))?;
        let polling_timeout = Duration::from_secs(env_parse("POLLING_TIMEOUT_SECS", 10)?);
        let shutdown_grace = Duration::from_secs(env_parse("SHUTDOWN_GRACE_SECS", 10)?);

        Ok(Self {
            bot_token,
            telegram_api_url,
            log_file,
            timezone,
            polling_timeout,
            shutdown_grace,
        })
    }

    /// Validate config (e.g. telegram_api_url must be valid URL if set).
    pub fn validate(&self) -> Result<()> {
        if self.bot_token.trim().is_empty() {
            anyhow::bail!("BOT_TOKEN is empty");
        }
        if let Some(ref url_str) = self.telegram_api_url {
            if reqwest::Url::parse(url_str).is_err() {
                anyhow::bail!(
                    "TELEGRAM_API_URL (or TELOXIDE_API_URL) is set but not a valid URL: {}",
                    url_str
                );
            }
        }
        Ok(())
    }
}
