//! Storage crate: database session factory and user registration.
//!
//! ## Modules
//!
//! - [`error`] – Storage error types
//! - [`models`] – UserRecord, NewUser, Registration
//! - [`pool`] – PoolConfig, SessionFactory
//! - [`schema`] – users table DDL per backend
//! - [`user_manager`] – UserManager (idempotent registration)

mod error;
mod models;
mod pool;
mod schema;
mod user_manager;


pub use error::StorageError;
pub use models::{NewUser, Registration, UserRecord};
pub use pool::{DbSession, PoolConfig, SessionFactory};
pub use schema::Backend;
pub use user_manager::UserManager;
