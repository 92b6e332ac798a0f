//! Component factory: builds BotComponents from config. Isolates assembly logic from the manager.

use std::sync::Arc;

use anyhow::Result;
use middleware::{RedisThrottleStore, ThrottlingMiddleware};
use regbot_core::{BotError, Platform};
use regbot_telegram::TelegramPlatform;
use storage::{SessionFactory, UserManager};
use tracing::{error, info, instrument};

use super::config::BotConfig;

/// Long-lived dependencies owned by [`crate::BotManager`].
pub struct BotComponents {
    pub platform: Arc<dyn Platform>,
    pub sessions: SessionFactory,
    pub users: UserManager,
    /// `None` when throttling is disabled.
    pub throttle: Option<ThrottlingMiddleware>,
}

/// Opens the platform client, the database pool (creating the schema) and, when enabled, the
/// throttle store. Any failure here is fatal for startup.
#[instrument(skip(config))]
pub async fn build_bot_components(config: &BotConfig) -> Result<BotComponents> {
    let platform: Arc<dyn Platform> = Arc::new(
        TelegramPlatform::new(
            config.bot_token(),
            config.telegram_api_url(),
            config.base.polling_timeout,
        )
        .map_err(|e| {
            error!(error = %e, "Failed to create Telegram client");
            anyhow::anyhow!("Failed to create Telegram client: {}", e)
        })?,
    );

    let sessions = SessionFactory::connect(config.database_url(), &config.database.pool)
        .await
        .map_err(|e| {
            error!(error = %e, "Failed to initialize database pool");
            anyhow::anyhow!("Failed to initialize database pool: {}", e)
        })?;
    sessions.ensure_schema().await.map_err(|e| {
        error!(error = %e, "Failed to create database schema");
        anyhow::anyhow!("Failed to create database schema: {}", e)
    })?;

    let throttle = if config.cache.throttle_enabled {
        let url = config.cache.redis_url();
        let store = RedisThrottleStore::connect(&url).await.map_err(|e| {
            let e = BotError::from(e);
            error!(error = %e, redis = %url, "Failed to connect throttle store");
            anyhow::Error::new(e).context("Failed to connect throttle store")
        })?;
        info!(
            window_secs = config.cache.throttle_window.as_secs(),
            "Throttling enabled"
        );
        Some(ThrottlingMiddleware::new(
            Arc::new(store),
            config.cache.throttle_window,
        ))
    } else {
        info!("Throttling disabled");
        None
    };

    Ok(BotComponents {
        platform,
        sessions,
        users: UserManager::new(config.base.timezone),
        throttle,
    })
}
