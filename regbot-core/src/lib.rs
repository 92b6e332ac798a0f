//! # regbot-core
//!
//! Core types and ports for the registration bot: the inbound [`Event`] union, the per-event
//! [`EventContext`], the [`Handler`] trait, the [`Platform`] port to the messaging platform,
//! error types and tracing initialization. Transport-agnostic; used by the middleware,
//! handler-chain and telegram crates.

pub mod context;
pub mod error;
pub mod logger;
pub mod platform;
pub mod types;

pub use context::EventContext;
pub use error::{BotError, HandlerError, Result};
pub use logger::init_tracing;
pub use platform::{BotIdentity, Platform, WebhookRegistration};
pub use types::{
    CallbackInfo, DispatchOutcome, Event, Handler, IncomingUpdate, InlineButton, InlineKeyboard,
    MessageInfo, TransportMode, User,
};
