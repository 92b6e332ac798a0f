//! Command-line interface.

use clap::{Parser, Subcommand, ValueEnum};
use regbot_core::TransportMode;

#[derive(Parser)]
#[command(name = "regbot")]
#[command(about = "Telegram registration bot", long_about = None)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the bot (config from env; token can override BOT_TOKEN).
    Run {
        #[arg(short, long)]
        token: Option<String>,
        /// How updates reach the bot.
        #[arg(short, long, value_enum, default_value_t = ModeArg::Polling)]
        mode: ModeArg,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ModeArg {
    Polling,
    Webhook,
}

impl From<ModeArg> for TransportMode {
    fn from(mode: ModeArg) -> Self {
        match mode {
            ModeArg::Polling => TransportMode::Polling,
            ModeArg::Webhook => TransportMode::Webhook,
        }
    }
}
