//! Business handlers and the router that wires them.
//!
//! Route order: `/start`, menu callbacks, then every other message (copied back with the menu).

mod callback;
mod copy;
mod keyboards;
mod start;
pub mod texts;

use std::sync::Arc;

use handler_chain::{EventFilter, Router};
use regbot_core::Platform;
use storage::UserManager;

pub use callback::MenuCallbackHandler;
pub use copy::CopyHandler;
pub use keyboards::{main_menu, CALLBACK_HELP, CALLBACK_OPTION_1, CALLBACK_OPTION_2};
pub use start::StartHandler;

pub fn build_router(platform: Arc<dyn Platform>, users: UserManager) -> Router {
    let start = Router::new().route(
        "start",
        EventFilter::Command("start"),
        Arc::new(StartHandler::new(platform.clone(), users)),
    );

    let menu_handler = Arc::new(MenuCallbackHandler::new(platform.clone()));
    let menu = Router::new()
        .route("menu_option_1", EventFilter::Callback(CALLBACK_OPTION_1), menu_handler.clone())
        .route("menu_option_2", EventFilter::Callback(CALLBACK_OPTION_2), menu_handler.clone())
        .route("menu_help", EventFilter::Callback(CALLBACK_HELP), menu_handler);

    let copy = Router::new().route("copy", EventFilter::Message, Arc::new(CopyHandler::new(platform)));

    start.include(menu).include(copy)
}
