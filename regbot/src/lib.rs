//! # regbot
//!
//! Registration bot application: configuration, business handlers, component factory, the
//! [`BotManager`] lifecycle and the process entry point [`run_bot`].

pub mod cli;
pub mod components;
pub mod config;
pub mod handlers;
pub mod manager;
pub mod runner;

pub use cli::{Cli, Commands, ModeArg};
pub use components::{build_bot_components, BotComponents};
pub use config::{BaseConfig, BotConfig, CacheConfig, DatabaseConfig, WebhookConfig};
pub use manager::{BotManager, BotState, ManagerSettings};
pub use runner::{run_bot, run_until_shutdown};
