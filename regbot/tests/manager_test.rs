//! Lifecycle tests for BotManager against a recording platform double.

mod common;

use std::sync::atomic::Ordering;
use std::sync::Arc;
use std::time::Duration;

use common::{components, settings, wait_until, MockPlatform};
use regbot::{run_until_shutdown, BotManager, BotState};
use regbot_core::TransportMode;

async fn manager(platform: Arc<MockPlatform>) -> Arc<BotManager> {
    Arc::new(BotManager::new(components(platform, None).await, settings()))
}

/// **Test: stop on a fresh manager is a no-op, however often it is called.**
///
/// **Setup:** Manager that was never initialized.
/// **Action:** Call stop() three times.
/// **Expected:** No platform calls, pool still open, state stays Uninitialized.
#[tokio::test]
async fn test_stop_without_start_is_idempotent() {
    let platform = Arc::new(MockPlatform::new());
    let manager = manager(platform.clone()).await;

    for _ in 0..3 {
        manager.stop().await;
    }

    assert!(platform.calls().is_empty());
    assert!(!manager.sessions().is_closed());
    assert_eq!(manager.state(), BotState::Uninitialized);
    assert!(!manager.is_initialized());
}

/// **Test: initialize caches the identity and builds the dispatcher once.**
///
/// **Setup:** Healthy platform.
/// **Action:** initialize() twice.
/// **Expected:** get_me called once; identity cached; dispatcher has the session-scope middleware.
#[tokio::test]
async fn test_initialize_is_idempotent() {
    let platform = Arc::new(MockPlatform::new());
    let manager = manager(platform.clone()).await;

    manager.initialize().await.unwrap();
    manager.initialize().await.unwrap();

    assert_eq!(platform.calls(), vec!["get_me".to_string()]);
    assert!(manager.is_initialized());
    assert_eq!(manager.state(), BotState::Initialized);
    let identity = manager.get_identity().expect("identity cached");
    assert_eq!(identity.handle(), "@regbot_test_bot");
    let dispatcher = manager.dispatcher().expect("dispatcher built");
    assert_eq!(dispatcher.middleware_names(), vec!["session_scope"]);
    assert_eq!(manager.mode(), None);
}

/// **Test: a get_me failure is fatal and leaves the manager uninitialized.**
///
/// **Setup:** Platform rejecting credentials.
/// **Action:** initialize(), then start(Polling).
/// **Expected:** Both fail; no webhook or polling calls; state Uninitialized.
#[tokio::test]
async fn test_initialize_failure_leaves_uninitialized() {
    let platform = Arc::new(MockPlatform::failing_get_me());
    let manager = manager(platform.clone()).await;

    assert!(manager.initialize().await.is_err());
    assert_eq!(manager.state(), BotState::Uninitialized);
    assert!(manager.get_identity().is_none());
    assert!(manager.dispatcher().is_none());

    assert!(manager.start(TransportMode::Polling).await.is_err());
    assert_eq!(platform.calls(), vec!["get_me", "get_me"]);
    assert_eq!(manager.state(), BotState::Uninitialized);
}

/// **Test: polling clears the webhook before the first fetch; stop releases in order.**
///
/// **Setup:** Healthy platform with no queued updates.
/// **Action:** start(Polling) on a task, wait for a fetch, then stop().
/// **Expected:** delete_webhook(true) precedes get_updates; after stop: delete_webhook(false)
/// before close, pool closed, identity cleared, state Stopped; the start task returns Ok.
#[tokio::test]
async fn test_polling_start_and_stop_order() {
    let platform = Arc::new(MockPlatform::new());
    let manager = manager(platform.clone()).await;

    let runner = manager.clone();
    let task = tokio::spawn(async move { runner.start(TransportMode::Polling).await });

    assert!(wait_until(|| platform.position("get_updates").is_some()).await);
    assert_eq!(manager.state(), BotState::Running(TransportMode::Polling));
    assert_eq!(manager.mode(), Some(TransportMode::Polling));
    let cleared = platform.position("delete_webhook(true)").expect("webhook cleared");
    let fetched = platform.position("get_updates").unwrap();
    assert!(cleared < fetched);

    manager.stop().await;
    task.await.unwrap().unwrap();

    let delete = platform.position("delete_webhook(false)").expect("webhook deleted");
    let close = platform.position("close").expect("session closed");
    assert!(delete < close);
    assert!(manager.sessions().is_closed());
    assert_eq!(manager.state(), BotState::Stopped);
    assert!(!manager.is_initialized());
    assert!(manager.get_identity().is_none());
    assert!(manager.dispatcher().is_none());

    let calls_after_stop = platform.calls().len();
    manager.stop().await;
    assert_eq!(platform.calls().len(), calls_after_stop);
}

/// **Test: webhook mode registers, serves with secret check, and shuts down even if delete fails.**
///
/// **Setup:** Webhook on an ephemeral port; delete_webhook set to fail.
/// **Action:** start(Webhook), send a push with a wrong secret and one with the right secret but
/// an undecodable body, then stop().
/// **Expected:** Registration carries endpoint, secret and drop_pending; 401 then 400; stop still
/// closes the session after the failed delete and disposes the pool.
#[tokio::test]
async fn test_webhook_start_and_stop_when_delete_fails() {
    let platform = Arc::new(MockPlatform::new());
    platform.fail_delete_webhook.store(true, Ordering::SeqCst);
    let manager = manager(platform.clone()).await;

    let runner = manager.clone();
    let task = tokio::spawn(async move { runner.start(TransportMode::Webhook).await });

    assert!(wait_until(|| manager.listen_addr().is_some()).await);
    let addr = manager.listen_addr().unwrap();
    assert_eq!(manager.state(), BotState::Running(TransportMode::Webhook));

    let registration = platform.webhooks.lock().unwrap()[0].clone();
    assert_eq!(registration.url, "https://bot.example.com/webhook");
    assert_eq!(registration.secret_token, "s3cret");
    assert!(registration.drop_pending_updates);

    let client = reqwest::Client::new();
    let url = format!("http://{}/webhook", addr);
    let unauthorized = client
        .post(&url)
        .header(regbot_telegram::SECRET_TOKEN_HEADER, "wrong")
        .body("{}")
        .send()
        .await
        .unwrap();
    assert_eq!(unauthorized.status().as_u16(), 401);
    let malformed = client
        .post(&url)
        .header(regbot_telegram::SECRET_TOKEN_HEADER, "s3cret")
        .body("not json")
        .send()
        .await
        .unwrap();
    assert_eq!(malformed.status().as_u16(), 400);

    manager.stop().await;
    task.await.unwrap().unwrap();

    let delete = platform.position("delete_webhook(false)").expect("delete attempted");
    let close = platform.position("close").expect("session closed");
    assert!(delete < close);
    assert!(manager.sessions().is_closed());
    assert_eq!(manager.state(), BotState::Stopped);
    assert!(manager.listen_addr().is_none());
}

/// **Test: only one transport may run at a time.**
///
/// **Setup:** Manager polling on a task.
/// **Action:** start(Webhook) while running.
/// **Expected:** Error; the polling transport keeps running until stop.
#[tokio::test]
async fn test_start_while_running_fails() {
    let platform = Arc::new(MockPlatform::new());
    let manager = manager(platform.clone()).await;

    let runner = manager.clone();
    let task = tokio::spawn(async move { runner.start(TransportMode::Polling).await });
    assert!(wait_until(|| manager.mode().is_some()).await);

    let second = manager.start(TransportMode::Webhook).await;
    assert!(second.is_err());
    assert_eq!(manager.mode(), Some(TransportMode::Polling));
    assert!(platform.position("set_webhook").is_none());

    manager.stop().await;
    task.await.unwrap().unwrap();
}

/// **Test: a stopped manager cannot be started again.**
#[tokio::test]
async fn test_start_after_stop_fails() {
    let platform = Arc::new(MockPlatform::new());
    let manager = manager(platform.clone()).await;

    manager.initialize().await.unwrap();
    manager.stop().await;

    assert!(manager.start(TransportMode::Polling).await.is_err());
    assert_eq!(manager.state(), BotState::Stopped);
}

/// **Test: shutdown signal stops the manager and the runner exits cleanly.**
///
/// **Setup:** Polling manager driven by run_until_shutdown.
/// **Action:** Shutdown future resolves after 100ms.
/// **Expected:** Ok; the platform session closed and the pool disposed.
#[tokio::test]
async fn test_run_until_shutdown_stops_on_signal() {
    let platform = Arc::new(MockPlatform::new());
    let manager = manager(platform.clone()).await;

    let result = run_until_shutdown(
        manager.clone(),
        TransportMode::Polling,
        tokio::time::sleep(Duration::from_millis(100)),
    )
    .await;

    assert!(result.is_ok());
    assert!(platform.position("close").is_some());
    assert!(manager.sessions().is_closed());
    assert_eq!(manager.state(), BotState::Stopped);
}

/// **Test: a fatal initialization error is returned by the runner and resources are released.**
#[tokio::test]
async fn test_run_until_shutdown_propagates_init_failure() {
    let platform = Arc::new(MockPlatform::failing_get_me());
    let manager = manager(platform.clone()).await;

    let result = run_until_shutdown(
        manager.clone(),
        TransportMode::Polling,
        std::future::pending::<()>(),
    )
    .await;

    assert!(result.is_err());
    assert_eq!(manager.state(), BotState::Uninitialized);
    assert!(manager.sessions().is_closed());
    assert_eq!(platform.calls(), vec!["get_me", "close"]);
}

/// **Test: release closes resources even on a manager that never initialized.**
///
/// **Setup:** Fresh manager.
/// **Action:** release() twice.
/// **Expected:** Pool closed, platform closed, state untouched.
#[tokio::test]
async fn test_release_without_initialize_closes_resources() {
    let platform = Arc::new(MockPlatform::new());
    let manager = manager(platform.clone()).await;

    manager.release().await;
    manager.release().await;

    assert!(manager.sessions().is_closed());
    assert_eq!(platform.calls(), vec!["close", "close"]);
    assert_eq!(manager.state(), BotState::Uninitialized);
}
