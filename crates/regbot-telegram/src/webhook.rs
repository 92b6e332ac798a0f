//! Webhook listener: one POST route that validates the secret header and dispatches the body.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::routing::post;
use axum::Router;
use handler_chain::HandlerChain;
use regbot_core::Platform;
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;
use tracing::{info, instrument, warn};

use crate::dispatch_logged;

/// Header the platform uses to echo the registered secret token.
pub const SECRET_TOKEN_HEADER: &str = "x-telegram-bot-api-secret-token";

struct WebhookState {
    platform: Arc<dyn Platform>,
    chain: HandlerChain,
    secret: String,
}

/// Binds the listener socket. Port `0` picks a free port (see `local_addr`).
pub async fn bind_webhook(host: &str, port: u16) -> std::io::Result<TcpListener> {
    let listener = TcpListener::bind((host, port)).await?;
    info!(addr = %listener.local_addr()?, "Webhook listener bound");
    Ok(listener)
}

/// Serves webhook pushes on `path` until `cancel` fires, then stops accepting connections and
/// waits for in-flight requests.
#[instrument(skip_all, fields(mode = "webhook", path = %path))]
pub async fn serve_webhook(
    listener: TcpListener,
    path: &str,
    secret: String,
    platform: Arc<dyn Platform>,
    chain: HandlerChain,
    cancel: CancellationToken,
) -> std::io::Result<()> {
    let addr: Option<SocketAddr> = listener.local_addr().ok();
    let state = Arc::new(WebhookState {
        platform,
        chain,
        secret,
    });
    let app = Router::new().route(path, post(receive)).with_state(state);

    info!(addr = ?addr, "Webhook server started");
    axum::serve(listener, app)
        .with_graceful_shutdown(async move { cancel.cancelled().await })
        .await?;
    info!("Webhook server stopped");
    Ok(())
}

async fn receive(
    State(state): State<Arc<WebhookState>>,
    headers: HeaderMap,
    body: Bytes,
) -> StatusCode {
    let presented = headers
        .get(SECRET_TOKEN_HEADER)
        .and_then(|v| v.to_str().ok());
    if presented != Some(state.secret.as_str()) {
        warn!("Rejected webhook request with missing or wrong secret token");
        return StatusCode::UNAUTHORIZED;
    }

    let update = match state.platform.decode_update(&body) {
        Ok(update) => update,
        Err(e) => {
            warn!(error = %e, "Rejected malformed webhook payload");
            return StatusCode::BAD_REQUEST;
        }
    };

    dispatch_logged(&state.chain, &update).await;
    StatusCode::OK
}
