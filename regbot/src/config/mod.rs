//! Bot configuration, loaded from env: BaseConfig (Telegram, logging, timezone, transport timing)
//! + WebhookConfig + DatabaseConfig + CacheConfig.

mod base;
mod bot_config;
mod cache;
mod database;
mod webhook;


pub use base::BaseConfig;
pub use bot_config::BotConfig;
pub use cache::CacheConfig;
pub use database::DatabaseConfig;
pub use webhook::WebhookConfig;

use std::env;
use std::fmt::Display;
use std::str::FromStr;

use anyhow::{anyhow, Result};

/// Reads `key` and parses it; `default` when unset. A value that does not parse is an error
/// naming the variable.
pub(crate) fn env_parse<T>(key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: Display,
{
    match env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map_err(|e| anyhow!("{} has an invalid value {:?}: {}", key, raw, e)),
        Err(_) => Ok(default),
    }
}

pub(crate) fn env_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}
