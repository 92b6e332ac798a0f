//! Core types: user, event union, keyboards, dispatch outcome, transport mode and the Handler trait.

mod event;
mod handler;
mod keyboard;
mod response;
mod user;

pub use event::{CallbackInfo, Event, IncomingUpdate, MessageInfo};
pub use handler::Handler;
pub use keyboard::{InlineButton, InlineKeyboard};
pub use response::{DispatchOutcome, TransportMode};
pub use user::User;
