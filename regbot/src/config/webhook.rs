//! Webhook transport settings.

use anyhow::Result;

use super::{env_or, env_parse};

pub const DEFAULT_WEBHOOK_SECRET: &str = "default_secret";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WebhookConfig {
    /// WEBHOOK_URL: public base URL the platform pushes to
    pub url: String,
    /// WEBHOOK_PATH: route on this server; appended to `url` when registering
    pub path: String,
    /// WEBHOOK_SECRET: expected in the secret-token header of every push
    pub secret: String,
    /// WEBHOOK_HOST
    pub host: String,
    /// WEBHOOK_PORT
    pub port: u16,
}

impl Default for WebhookConfig {
    fn default() -> Self {
        Self {
            url: "http://localhost".to_string(),
            path: "/webhook".to_string(),
            secret: DEFAULT_WEBHOOK_SECRET.to_string(),
            host: "0.0.0.0".to_string(),
            port: 8080,
        }
    }
}

impl WebhookConfig {
    pub fn from_env() -> Result<Self> {
        let defaults = Self::default();
        Ok(Self {
            url: env_or("WEBHOOK_URL", &defaults.url),
            path: env_or("WEBHOOK_PATH", &defaults.path),
            secret: env_or("WEBHOOK_SECRET", &defaults.secret),
            host: env_or("WEBHOOK_HOST", &defaults.host),
            port: env_parse("WEBHOOK_PORT", defaults.port)?,
        })
    }

    /// URL registered with the platform.
    pub fn endpoint(&self) -> String {
        format!("{}{}", self.url.trim_end_matches('/'), self.path)
    }

    pub fn uses_default_secret(&self) -> bool {
        self.secret == DEFAULT_WEBHOOK_SECRET
    }

    pub fn validate(&self) -> Result<()> {
        if !self.path.starts_with('/') {
            anyhow::bail!("WEBHOOK_PATH must start with '/': {}", self.path);
        }
        if reqwest::Url::parse(&self.endpoint()).is_err() {
            anyhow::bail!("WEBHOOK_URL is not a valid URL: {}", self.url);
        }
        if self.secret.is_empty() {
            anyhow::bail!("WEBHOOK_SECRET is empty");
        }
        Ok(())
    }
}
