//! regbot binary: loads `.env`, parses the CLI and runs the bot until shutdown.

use anyhow::Result;
use clap::Parser;
use regbot::{run_bot, BotConfig, Cli, Commands};

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    match cli.command {
        Commands::Run { token, mode } => {
            let config = BotConfig::load(token)?;
            run_bot(config, mode.into()).await
        }
    }
}
