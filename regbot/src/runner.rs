//! Process entry: logging, components, then the manager until shutdown.

use std::future::Future;
use std::sync::Arc;

use anyhow::{Context, Result};
use regbot_core::{init_tracing, TransportMode};
use tracing::{error, info, instrument, warn};

use super::components::build_bot_components;
use super::config::BotConfig;
use super::manager::{BotManager, BotState, ManagerSettings};

/// Main entry: validate config, init logging, build components, run the transport until a
/// shutdown signal or the transport exits, then always stop the manager.
///
/// Returns `Err` only for fatal startup errors (config, components, `initialize`).
#[instrument(skip_all, fields(mode = %mode))]
pub async fn run_bot(config: BotConfig, mode: TransportMode) -> Result<()> {
    config.validate()?;
    init_tracing(config.log_file())?;

    info!(
        pool_size = config.database.pool.pool_size,
        throttle_enabled = config.cache.throttle_enabled,
        "Initializing bot"
    );

    let components = build_bot_components(&config)
        .await
        .context("Failed to build bot components")?;
    let manager = Arc::new(BotManager::new(
        components,
        ManagerSettings::from_config(&config),
    ));

    run_until_shutdown(manager, mode, shutdown_signal()).await
}

/// Runs `manager.start(mode)` on its own task until it finishes or `shutdown` resolves.
///
/// `stop` runs on every exit path: signal, transport error, transport panic. A panic is logged
/// and treated as a normal stop.
pub async fn run_until_shutdown<S>(
    manager: Arc<BotManager>,
    mode: TransportMode,
    shutdown: S,
) -> Result<()>
where
    S: Future<Output = ()>,
{
    let runner = manager.clone();
    let mut task = tokio::spawn(async move { runner.start(mode).await });

    let outcome = tokio::select! {
        joined = &mut task => Some(joined),
        _ = shutdown => {
            info!("Shutdown signal received, stopping bot");
            None
        }
    };

    manager.stop().await;
    // stop is a no-op when initialize never succeeded; the pool and client still need closing.
    if manager.state() != BotState::Stopped {
        manager.release().await;
    }

    let joined = match outcome {
        Some(joined) => joined,
        None => match tokio::time::timeout(std::time::Duration::from_secs(1), &mut task).await {
            Ok(joined) => joined,
            Err(_) => {
                warn!("Transport task still running after stop; aborting it");
                task.abort();
                return Ok(());
            }
        },
    };

    match joined {
        Ok(Ok(())) => {
            info!("Bot exited");
            Ok(())
        }
        Ok(Err(e)) => {
            error!(error = %e, "Bot failed");
            Err(anyhow::Error::new(e).context("Bot failed"))
        }
        Err(e) if e.is_panic() => {
            error!(error = %e, "Transport task panicked");
            Ok(())
        }
        Err(e) => {
            warn!(error = %e, "Transport task cancelled");
            Ok(())
        }
    }
}

/// Resolves on Ctrl-C or, on unix, SIGTERM. A handler that cannot be installed never fires.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!(error = %e, "Failed to listen for Ctrl-C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
