//! Database helpers for credential records.

use sqlx::{PgPool, Row};
use std::fmt;
use thiserror::Error;
use tracing::{info_span, Instrument};
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("username already registered")]
    Duplicate,
    #[error("credential not found")]
    NotFound,
    #[error("credential store unavailable")]
    Unavailable(#[source] sqlx::Error),
}

/// A stored credential.
pub struct Credential {
    pub id: Uuid,
    pub username: String,
    pub password_hash: String,
}

// The hash must never reach the logs, so Debug redacts it.
impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credential")
            .field("id", &self.id)
            .field("username", &self.username)
            .field("password_hash", &"<redacted>")
            .finish()
    }
}

/// Insert a new credential.
///
/// Uniqueness is enforced by the `users.username` constraint, so two
/// concurrent inserts of the same username resolve to exactly one success
/// and one `Duplicate` without application-level locking.
///
/// # Errors
/// `Duplicate` if the username is taken, `Unavailable` for any other
/// database failure.
pub async fn create_credential(
    pool: &PgPool,
    username: &str,
    password_hash: &str,
) -> Result<Credential, StoreError> {
    let query = "INSERT INTO users (username, password_hash) VALUES ($1, $2) RETURNING id";
    let span = info_span!(
        "db.query",
        db.system = "postgresql",
        db.operation = "INSERT",
        db.statement = query
    );
    let row = sqlx::query(query)
        .bind(username)
        .bind(password_hash)
        .fetch_one(pool)
        .instrument(span)
        .await;

    match row {
        Ok(row) => Ok(Credential {
            id: row.get("id"),
            username: username.to_string(),
            password_hash: password_hash.to_string(),
        }),
        Err(err) => {
            if is_unique_violation(&err) {
                return Err(StoreError::Duplicate);
            }
            Err(StoreError::Unavailable(err))
        }
    }
}

/// Look up a credential by username.
///
/// # Errors
/// `NotFound` if no such username exists, `Unavailable` for any other
/// database failure.
pub async fn find_credential(pool: &PgPool, username: &str) -> Result<Credential, StoreError> {
    let query = "SELECT id, username, password_hash FROM users WHERE username = $1";
    let span = info_span!(
        "db.query",
        db.system = "postgresql",
        db.operation = "SELECT",
        db.statement = query
    );
    let row = sqlx::query(query)
        .bind(username)
        .fetch_optional(pool)
        .instrument(span)
        .await
        .map_err(StoreError::Unavailable)?;

    let Some(row) = row else {
        return Err(StoreError::NotFound);
    };

    Ok(Credential {
        id: row.get("id"),
        username: row.get("username"),
        password_hash: row.get("password_hash"),
    })
}

fn is_unique_violation(err: &sqlx::Error) -> bool {
    match err {
        sqlx::Error::Database(db_err) => db_err.code().is_some_and(|code| code.as_ref() == "23505"),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sqlx::postgres::{PgConnectOptions, PgPoolOptions, PgSslMode};
    use std::time::Duration;

    fn unreachable_pool() -> PgPool {
        let options = PgConnectOptions::new()
            .host("127.0.0.1")
            .port(1)
            .username("invalid")
            .database("invalid")
            .ssl_mode(PgSslMode::Disable);
        PgPoolOptions::new()
            .acquire_timeout(Duration::from_millis(200))
            .connect_lazy_with(options)
    }

    #[test]
    fn is_unique_violation_ignores_other_errors() {
        assert!(!is_unique_violation(&sqlx::Error::RowNotFound));
        assert!(!is_unique_violation(&sqlx::Error::PoolTimedOut));
    }

    #[test]
    fn credential_debug_redacts_hash() {
        let credential = Credential {
            id: Uuid::nil(),
            username: "alice".to_string(),
            password_hash: "$argon2id$v=19$super-secret".to_string(),
        };

        let rendered = format!("{credential:?}");
        assert!(rendered.contains("alice"));
        assert!(rendered.contains("<redacted>"));
        assert!(!rendered.contains("argon2id"));
    }

    #[tokio::test]
    async fn create_credential_surfaces_store_unavailable() {
        let pool = unreachable_pool();
        let result = create_credential(&pool, "alice", "hash").await;
        assert!(matches!(result, Err(StoreError::Unavailable(_))));
    }

    #[tokio::test]
    async fn find_credential_surfaces_store_unavailable() {
        let pool = unreachable_pool();
        let result = find_credential(&pool, "alice").await;
        assert!(matches!(result, Err(StoreError::Unavailable(_))));
    }
}
