//! `users` table DDL. MySQL in production, SQLite for tests.

use crate::pool::DbSession;

/// Database backend, derived from the connection URL scheme.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Backend {
    MySql,
    Sqlite,
}

impl Backend {
    pub fn from_url(url: &str) -> Option<Self> {
        let scheme = url.split(':').next()?;
        match scheme {
            "mysql" | "mariadb" => Some(Backend::MySql),
            "sqlite" => Some(Backend::Sqlite),
            _ => None,
        }
    }

    pub(crate) fn users_ddl(self) -> &'static str {
        match self {
            Backend::MySql => {
                r#"
                CREATE TABLE IF NOT EXISTS users (
                    id BIGINT NOT NULL AUTO_INCREMENT PRIMARY KEY,
                    tg_id BIGINT NOT NULL,
                    full_name VARCHAR(128) NOT NULL,
                    username VARCHAR(32) NULL,
                    registered_at DATETIME NOT NULL,
                    UNIQUE KEY uq_users_tg_id (tg_id)
                ) ENGINE=InnoDB DEFAULT CHARSET=utf8mb4 COLLATE=utf8mb4_unicode_ci
                "#
            }
            Backend::Sqlite => {
                r#"
                CREATE TABLE IF NOT EXISTS users (
                    id INTEGER PRIMARY KEY AUTOINCREMENT,
                    tg_id BIGINT NOT NULL UNIQUE,
                    full_name VARCHAR(128) NOT NULL,
                    username VARCHAR(32),
                    registered_at DATETIME NOT NULL
                )
                "#
            }
        }
    }
}

pub(crate) async fn create_users_table(
    session: &mut DbSession,
    backend: Backend,
) -> Result<(), sqlx::Error> {
    sqlx::query(backend.users_ddl())
        .execute(&mut **session)
        .await?;
    Ok(())
}
