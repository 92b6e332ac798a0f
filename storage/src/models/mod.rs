mod user;

pub use user::{NewUser, Registration, UserRecord};
