use std::fmt;

use serde::Serialize;

/// Server-side session state reachable through a session token.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Session {
    /// The authenticated subject (credential id).
    pub subject_id: String,

    /// RFC 3339 timestamp when the session was created.
    pub created_at: String,

    /// Unix timestamp (seconds) after which the session is no longer valid.
    pub expires_at: i64,
}

/// A freshly created session together with its bearer token.
///
/// The token is only ever available here; the store keeps a digest of it.
#[derive(Clone)]
pub struct IssuedSession {
    pub token: String,
    pub session: Session,
}

impl fmt::Debug for IssuedSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IssuedSession")
            .field("token", &"<redacted>")
            .field("session", &self.session)
            .finish()
    }
}

/// Outcome of checking a request's session.
///
/// Inserted into request extensions by the access guard, so protected
/// handlers can take `Extension<AuthDecision>`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AuthDecision {
    pub authenticated: bool,
    pub subject_id: Option<String>,
}

impl AuthDecision {
    pub fn granted(subject_id: impl Into<String>) -> Self {
        Self {
            authenticated: true,
            subject_id: Some(subject_id.into()),
        }
    }

    pub fn denied() -> Self {
        Self {
            authenticated: false,
            subject_id: None,
        }
    }
}
