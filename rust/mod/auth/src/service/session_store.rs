use std::sync::Arc;
use std::time::Duration;

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use rand::RngCore;
use rand::rngs::OsRng;
use sha2::{Digest, Sha256};
use tracing::debug;

use staffvault_sql::{SQLStore, Value};

use crate::model::{IssuedSession, Session};
use crate::service::AuthError;

/// Token entropy in bytes (256 bits).
const TOKEN_BYTES: usize = 32;

/// Server-side session state keyed by an opaque token.
pub trait SessionStore: Send + Sync {
    /// Start a session for `subject_id` that lives for `ttl`.
    fn create(&self, subject_id: &str, ttl: Duration) -> Result<IssuedSession, AuthError>;

    /// Look up a live session. Unknown and expired tokens both yield `None`.
    fn get(&self, token: &str) -> Result<Option<Session>, AuthError>;

    /// Remove a session. Removing an unknown token is not an error.
    fn delete(&self, token: &str) -> Result<(), AuthError>;

    /// Drop every expired session, returning how many were removed.
    fn purge_expired(&self) -> Result<u64, AuthError>;
}

/// Generate an unguessable session token.
pub fn generate_token() -> String {
    let mut bytes = [0u8; TOKEN_BYTES];
    OsRng.fill_bytes(&mut bytes);
    URL_SAFE_NO_PAD.encode(bytes)
}

/// Digest under which a token is stored.
fn token_digest(token: &str) -> String {
    URL_SAFE_NO_PAD.encode(Sha256::digest(token.as_bytes()))
}

/// SessionStore over the `sessions` table.
pub struct SqlSessionStore {
    sql: Arc<dyn SQLStore>,
}

impl SqlSessionStore {
    pub fn new(sql: Arc<dyn SQLStore>) -> Self {
        Self { sql }
    }
}

impl SessionStore for SqlSessionStore {
    fn create(&self, subject_id: &str, ttl: Duration) -> Result<IssuedSession, AuthError> {
        let now = chrono::Utc::now();
        let ttl_secs = i64::try_from(ttl.as_secs()).unwrap_or(i64::MAX);
        let session = Session {
            subject_id: subject_id.to_string(),
            created_at: now.to_rfc3339(),
            expires_at: now.timestamp().saturating_add(ttl_secs),
        };
        let token = generate_token();

        self.sql.exec(
            "INSERT INTO sessions (token_hash, subject_id, created_at, expires_at)
             VALUES (?1, ?2, ?3, ?4)",
            &[
                Value::from(token_digest(&token)),
                Value::from(session.subject_id.as_str()),
                Value::from(session.created_at.as_str()),
                Value::from(session.expires_at),
            ],
        )?;

        Ok(IssuedSession { token, session })
    }

    fn get(&self, token: &str) -> Result<Option<Session>, AuthError> {
        let row = self.sql.query_one(
            "SELECT subject_id, created_at, expires_at FROM sessions
             WHERE token_hash = ?1 AND expires_at > ?2",
            &[
                Value::from(token_digest(token)),
                Value::from(chrono::Utc::now().timestamp()),
            ],
        )?;

        let Some(row) = row else {
            return Ok(None);
        };
        let expires_at = row
            .get_i64("expires_at")
            .ok_or_else(|| AuthError::Storage("sessions.expires_at is not an integer".into()))?;
        Ok(Some(Session {
            subject_id: row.text("subject_id")?,
            created_at: row.text("created_at")?,
            expires_at,
        }))
    }

    fn delete(&self, token: &str) -> Result<(), AuthError> {
        let n = self.sql.exec(
            "DELETE FROM sessions WHERE token_hash = ?1",
            &[Value::from(token_digest(token))],
        )?;
        debug!("session delete removed {} row(s)", n);
        Ok(())
    }

    fn purge_expired(&self) -> Result<u64, AuthError> {
        let n = self.sql.exec(
            "DELETE FROM sessions WHERE expires_at <= ?1",
            &[Value::from(chrono::Utc::now().timestamp())],
        )?;
        Ok(n)
    }
}
