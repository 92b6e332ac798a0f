//! User registration: the single write this bot performs.
//!
//! `add_user` runs in its own transaction on the caller's session. Every exit path either
//! commits or rolls back.

use chrono::Utc;
use chrono_tz::Tz;
use sqlx::{Connection, Row};
use tracing::{error, info};

use crate::models::{NewUser, Registration, UserRecord};
use crate::pool::DbSession;

const REGISTERED_AT_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// SQLite extended result codes for unique and primary-key violations. MySQL 1062 is covered
/// by `is_unique_violation`; its SQLSTATE 23000 also covers not-null and foreign-key failures.
const UNIQUE_VIOLATION_CODES: &[&str] = &["2067", "1555"];

/// Registers users with a server-local timestamp in the configured timezone.
#[derive(Debug, Clone, Copy)]
pub struct UserManager {
    tz: Tz,
}

impl UserManager {
    pub fn new(tz: Tz) -> Self {
        Self { tz }
    }

    pub fn timezone(&self) -> Tz {
        self.tz
    }

    /// Inserts the user once per `tg_id`.
    ///
    /// Missing `tg_id` or an empty `full_name` yields [`Registration::Failed`] without touching
    /// the store. A duplicate `tg_id` yields [`Registration::AlreadyExists`].
    pub async fn add_user(&self, session: &mut DbSession, user: NewUser) -> Registration {
        let (tg_id, full_name) = match (user.tg_id, user.full_name.as_deref()) {
            (Some(id), Some(name)) if id != 0 && !name.trim().is_empty() => (id, name.to_string()),
            _ => {
                info!(tg_id = ?user.tg_id, "Skipping registration: missing user id or name");
                return Registration::Failed("missing tg_id or full_name".to_string());
            }
        };

        let registered_at = Utc::now()
            .with_timezone(&self.tz)
            .naive_local()
            .format(REGISTERED_AT_FORMAT)
            .to_string();

        let mut tx = match Connection::begin(&mut **session).await {
            Ok(tx) => tx,
            Err(e) => {
                error!(tg_id, error = %e, "Failed to begin registration transaction");
                return Registration::Failed(e.to_string());
            }
        };

        let inserted = sqlx::query(
            "INSERT INTO users (tg_id, full_name, username, registered_at) VALUES (?, ?, ?, ?)",
        )
        .bind(tg_id)
        .bind(full_name)
        .bind(user.username)
        .bind(registered_at)
        .execute(&mut *tx)
        .await;

        match inserted {
            Ok(_) => match tx.commit().await {
                Ok(()) => {
                    info!(tg_id, "User registered");
                    Registration::Created
                }
                Err(e) => {
                    error!(tg_id, error = %e, "Failed to commit registration");
                    Registration::Failed(e.to_string())
                }
            },
            Err(e) => {
                if let Err(rollback) = tx.rollback().await {
                    error!(tg_id, error = %rollback, "Rollback failed");
                }
                if is_unique_violation(&e) {
                    info!(tg_id, "User already registered");
                    Registration::AlreadyExists
                } else {
                    error!(tg_id, error = %e, "Failed to register user");
                    Registration::Failed(e.to_string())
                }
            }
        }
    }

    pub async fn count_by_tg_id(
        &self,
        session: &mut DbSession,
        tg_id: i64,
    ) -> Result<i64, sqlx::Error> {
        let row = sqlx::query("SELECT COUNT(*) AS n FROM users WHERE tg_id = ?")
            .bind(tg_id)
            .fetch_one(&mut **session)
            .await?;
        row.try_get::<i64, _>("n")
    }

    pub async fn find_by_tg_id(
        &self,
        session: &mut DbSession,
        tg_id: i64,
    ) -> Result<Option<UserRecord>, sqlx::Error> {
        let row = sqlx::query(
            "SELECT id, tg_id, full_name, username, CAST(registered_at AS CHAR) AS registered_at \
             FROM users WHERE tg_id = ?",
        )
        .bind(tg_id)
        .fetch_optional(&mut **session)
        .await?;

        let Some(row) = row else {
            return Ok(None);
        };

        let raw: String = row.try_get("registered_at")?;
        let registered_at = chrono::NaiveDateTime::parse_from_str(&raw, REGISTERED_AT_FORMAT)
            .map_err(|e| sqlx::Error::Decode(Box::new(e)))?;

        Ok(Some(UserRecord {
            id: row.try_get("id")?,
            tg_id: row.try_get("tg_id")?,
            full_name: row.try_get("full_name")?,
            username: row.try_get("username")?,
            registered_at,
        }))
    }
}

fn is_unique_violation(err: &sqlx::Error) -> bool {
    match err {
        sqlx::Error::Database(db_err) => {
            db_err.is_unique_violation()
                || db_err
                    .code()
                    .map(|code| UNIQUE_VIOLATION_CODES.iter().any(|c| *c == &*code))
                    .unwrap_or(false)
        }
        _ => false,
    }
}
