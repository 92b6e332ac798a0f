//! Bot lifecycle manager: owns the identity, the dispatcher and the single active transport.
//!
//! States move `Uninitialized → Initialized → Running(mode) → Stopped`. A running transport
//! returns the manager to `Initialized` when it exits on its own; `stop` is terminal.

use std::net::SocketAddr;
use std::time::Duration;

use handler_chain::HandlerChain;
use middleware::SessionScopeMiddleware;
use parking_lot::Mutex;
use regbot_core::{BotError, BotIdentity, Result, TransportMode, WebhookRegistration};
use storage::SessionFactory;
use tokio::sync::watch;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, instrument, warn};

use crate::components::BotComponents;
use crate::config::{BotConfig, WebhookConfig};
use crate::handlers::build_router;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BotState {
    Uninitialized,
    Initialized,
    Running(TransportMode),
    Stopped,
}

/// Transport and shutdown settings the manager needs beyond its components.
#[derive(Debug, Clone)]
pub struct ManagerSettings {
    pub webhook: WebhookConfig,
    pub polling_timeout: Duration,
    /// Bound on each shutdown wait: transport drain and pool disposal.
    pub shutdown_grace: Duration,
}

impl ManagerSettings {
    pub fn from_config(config: &BotConfig) -> Self {
        Self {
            webhook: config.webhook.clone(),
            polling_timeout: config.base.polling_timeout,
            shutdown_grace: config.base.shutdown_grace,
        }
    }
}

impl Default for ManagerSettings {
    fn default() -> Self {
        Self {
            webhook: WebhookConfig::default(),
            polling_timeout: Duration::from_secs(10),
            shutdown_grace: Duration::from_secs(10),
        }
    }
}

/// Handle to the running transport: `cancel` asks it to exit, `done` flips once it has.
struct ActiveTransport {
    cancel: CancellationToken,
    done: watch::Receiver<bool>,
}

struct Inner {
    state: BotState,
    identity: Option<BotIdentity>,
    dispatcher: Option<HandlerChain>,
    transport: Option<ActiveTransport>,
    listen_addr: Option<SocketAddr>,
}

/// The one long-lived bot instance of the process. Construct once in the entry point and share
/// it by reference (or `Arc`) with whatever drives the transport and the shutdown path.
pub struct BotManager {
    components: BotComponents,
    settings: ManagerSettings,
    inner: Mutex<Inner>,
    /// Serializes `initialize` and `stop`.
    lifecycle: tokio::sync::Mutex<()>,
}

impl BotManager {
    pub fn new(components: BotComponents, settings: ManagerSettings) -> Self {
        Self {
            components,
            settings,
            inner: Mutex::new(Inner {
                state: BotState::Uninitialized,
                identity: None,
                dispatcher: None,
                transport: None,
                listen_addr: None,
            }),
            lifecycle: tokio::sync::Mutex::new(()),
        }
    }

    /// Builds the dispatcher and caches the bot identity.
    ///
    /// No-op when already initialized or running. A `get_me` failure is returned as is and
    /// leaves the manager `Uninitialized`; there is no retry. `Stopped` is terminal: the pool
    /// and platform session are gone, so a stopped manager cannot be initialized again. Build a
    /// new one from fresh components instead.
    #[instrument(skip(self))]
    pub async fn initialize(&self) -> Result<()> {
        let _guard = self.lifecycle.lock().await;
        let state = self.state();
        match state {
            BotState::Initialized | BotState::Running(_) => {
                info!(state = ?state, "Bot already initialized");
                return Ok(());
            }
            BotState::Stopped => {
                return Err(BotError::Lifecycle(
                    "bot has been stopped and cannot be initialized again".to_string(),
                ))
            }
            BotState::Uninitialized => {}
        }

        let dispatcher = self.build_dispatcher();
        info!(
            middleware = ?dispatcher.middleware_names(),
            routes = ?dispatcher.router().route_names(),
            "Dispatcher built"
        );

        let identity = self.components.platform.get_me().await?;
        info!(bot = %identity.handle(), bot_id = identity.id, "Bot initialized");

        let mut inner = self.inner.lock();
        inner.identity = Some(identity);
        inner.dispatcher = Some(dispatcher);
        inner.state = BotState::Initialized;
        Ok(())
    }

    /// Throttle (when enabled) wraps session scope wraps the router, so suppressed events never
    /// borrow a database connection.
    fn build_dispatcher(&self) -> HandlerChain {
        let router = build_router(self.components.platform.clone(), self.components.users);
        let mut chain = HandlerChain::new(router);
        if let Some(throttle) = &self.components.throttle {
            chain = chain.add_middleware(throttle.clone());
        }
        chain.add_middleware(SessionScopeMiddleware::new(self.components.sessions.clone()))
    }

    /// Runs `mode` until the transport exits or [`BotManager::stop`] cancels it.
    ///
    /// Initializes first when needed. Fails if a transport is already running.
    #[instrument(skip_all, fields(mode = %mode))]
    pub async fn start(&self, mode: TransportMode) -> Result<()> {
        self.initialize().await?;

        let (dispatcher, cancel, done) = {
            let mut inner = self.inner.lock();
            match inner.state {
                BotState::Initialized => {}
                BotState::Running(current) => {
                    return Err(BotError::Lifecycle(format!(
                        "a {} transport is already running",
                        current
                    )))
                }
                other => {
                    return Err(BotError::Lifecycle(format!(
                        "cannot start transport from state {:?}",
                        other
                    )))
                }
            }
            let dispatcher = inner
                .dispatcher
                .clone()
                .ok_or_else(|| BotError::Lifecycle("dispatcher missing".to_string()))?;
            let cancel = CancellationToken::new();
            let (done_tx, done_rx) = watch::channel(false);
            inner.transport = Some(ActiveTransport {
                cancel: cancel.clone(),
                done: done_rx,
            });
            inner.state = BotState::Running(mode);
            (dispatcher, cancel, done_tx)
        };

        info!("Starting transport");
        let result = match mode {
            TransportMode::Webhook => self.run_webhook(dispatcher, cancel).await,
            TransportMode::Polling => self.run_polling(dispatcher, cancel).await,
        };
        {
            let mut inner = self.inner.lock();
            inner.listen_addr = None;
            // Still registered means nobody called stop: the transport ended by itself.
            if inner.transport.take().is_some() {
                inner.state = BotState::Initialized;
            }
        }
        let _ = done.send(true);
        match &result {
            Ok(()) => info!("Transport exited"),
            Err(e) => warn!(error = %e, "Transport exited with error"),
        }
        result
    }

    async fn run_webhook(&self, dispatcher: HandlerChain, cancel: CancellationToken) -> Result<()> {
        let config = &self.settings.webhook;
        if config.uses_default_secret() {
            warn!("WEBHOOK_SECRET is not set; using the built-in default secret");
        }

        let registration = WebhookRegistration {
            url: config.endpoint(),
            secret_token: config.secret.clone(),
            drop_pending_updates: true,
        };
        self.components.platform.set_webhook(&registration).await?;
        info!(url = %registration.url, "Webhook registered");

        let listener = regbot_telegram::bind_webhook(&config.host, config.port).await?;
        self.inner.lock().listen_addr = listener.local_addr().ok();

        regbot_telegram::serve_webhook(
            listener,
            &config.path,
            config.secret.clone(),
            self.components.platform.clone(),
            dispatcher,
            cancel,
        )
        .await?;
        Ok(())
    }

    async fn run_polling(&self, dispatcher: HandlerChain, cancel: CancellationToken) -> Result<()> {
        // A registered webhook makes getUpdates fail; clear it and whatever it queued.
        self.components.platform.delete_webhook(true).await?;
        info!("Webhook cleared before polling");

        regbot_telegram::run_polling(
            self.components.platform.clone(),
            dispatcher,
            self.settings.polling_timeout,
            cancel,
        )
        .await;
        Ok(())
    }

    /// Stops the transport and releases every resource. Idempotent; never fails.
    ///
    /// Each step runs even if an earlier one failed: cancel and drain the transport, delete the
    /// webhook, close the platform session, dispose the pool, clear cached handles.
    #[instrument(skip(self))]
    pub async fn stop(&self) {
        let _guard = self.lifecycle.lock().await;
        let (state, transport) = {
            let mut inner = self.inner.lock();
            (inner.state, inner.transport.take())
        };
        if matches!(state, BotState::Uninitialized | BotState::Stopped) {
            debug!(state = ?state, "Nothing to stop");
            return;
        }
        info!(state = ?state, "Stopping bot");

        let grace = self.settings.shutdown_grace;
        if let Some(mut transport) = transport {
            transport.cancel.cancel();
            let drained = tokio::time::timeout(grace, transport.done.wait_for(|done| *done))
                .await
                .is_ok();
            if drained {
                debug!("Transport drained");
            } else {
                warn!(
                    grace_secs = grace.as_secs(),
                    "Transport did not stop within grace period; abandoning in-flight events"
                );
            }
        }

        if let Err(e) = self.components.platform.delete_webhook(false).await {
            warn!(error = %e, "Failed to delete webhook during shutdown");
        }
        if let Err(e) = self.components.platform.close().await {
            warn!(error = %e, "Failed to close platform session");
        }
        if tokio::time::timeout(grace, self.components.sessions.dispose())
            .await
            .is_err()
        {
            warn!(
                grace_secs = grace.as_secs(),
                "Database pool did not close within grace period"
            );
        }

        let mut inner = self.inner.lock();
        inner.identity = None;
        inner.dispatcher = None;
        inner.listen_addr = None;
        inner.state = BotState::Stopped;
        info!("Bot stopped");
    }

    /// Closes the platform session and disposes the pool whatever the state.
    ///
    /// For exit paths where [`BotManager::stop`] has nothing to stop, such as a failed
    /// `initialize`. Both steps are idempotent.
    #[instrument(skip(self))]
    pub async fn release(&self) {
        let _guard = self.lifecycle.lock().await;
        if let Err(e) = self.components.platform.close().await {
            warn!(error = %e, "Failed to close platform session");
        }
        let grace = self.settings.shutdown_grace;
        if tokio::time::timeout(grace, self.components.sessions.dispose())
            .await
            .is_err()
        {
            warn!(
                grace_secs = grace.as_secs(),
                "Database pool did not close within grace period"
            );
        }
        debug!(state = ?self.state(), "Resources released");
    }

    pub fn get_identity(&self) -> Option<BotIdentity> {
        self.inner.lock().identity.clone()
    }

    pub fn is_initialized(&self) -> bool {
        matches!(
            self.inner.lock().state,
            BotState::Initialized | BotState::Running(_)
        )
    }

    pub fn state(&self) -> BotState {
        self.inner.lock().state
    }

    /// Active transport, if any.
    pub fn mode(&self) -> Option<TransportMode> {
        match self.state() {
            BotState::Running(mode) => Some(mode),
            _ => None,
        }
    }

    /// The dispatcher every transport feeds; `None` before `initialize` and after `stop`.
    pub fn dispatcher(&self) -> Option<HandlerChain> {
        self.inner.lock().dispatcher.clone()
    }

    /// Bound address of the webhook listener while it runs.
    pub fn listen_addr(&self) -> Option<SocketAddr> {
        self.inner.lock().listen_addr
    }

    pub fn sessions(&self) -> &SessionFactory {
        &self.components.sessions
    }
}
