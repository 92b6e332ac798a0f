use std::sync::Arc;

use async_trait::async_trait;
use regbot_core::{Event, EventContext, Handler, HandlerError, Platform, Result};
use storage::{NewUser, UserManager};
use tracing::{debug, instrument, warn};

use super::texts;

/// `/start`: greets the user, then registers them.
///
/// Registration is a side effect: its outcome never changes what the user sees.
pub struct StartHandler {
    platform: Arc<dyn Platform>,
    users: UserManager,
}

impl StartHandler {
    pub fn new(platform: Arc<dyn Platform>, users: UserManager) -> Self {
        Self { platform, users }
    }
}

#[async_trait]
impl Handler for StartHandler {
    #[instrument(skip_all, fields(user_id = ?event.user_id()))]
    async fn handle(&self, event: &Event, ctx: &mut EventContext) -> Result<()> {
        let message = event.message().ok_or(HandlerError::NoMessage)?;
        self.platform
            .send_message(message.chat_id, texts::WELCOME)
            .await?;

        let Some(user) = message.from.as_ref() else {
            warn!("Start command without sender, skipping registration");
            return Ok(());
        };
        let Some(session) = ctx.session_mut() else {
            warn!(user_id = user.id, "No database session, skipping registration");
            return Ok(());
        };

        let result = self
            .users
            .add_user(
                session,
                NewUser {
                    tg_id: Some(user.id),
                    full_name: Some(user.full_name()),
                    username: user.username.clone(),
                },
            )
            .await;
        debug!(user_id = user.id, result = ?result, "User registration finished");
        Ok(())
    }
}
