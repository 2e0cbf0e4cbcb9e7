use std::fmt;

use serde::Deserialize;

/// A stored login: username plus the password digest.
///
/// `password_hash` is a self-describing PHC string (algorithm, parameters
/// and salt embedded); the raw password is never stored.
#[derive(Clone, PartialEq)]
pub struct Credential {
    /// Subject id (UUIDv4, no dashes). Sessions are bound to this.
    pub id: String,

    /// Unique login name.
    pub username: String,

    pub password_hash: String,

    pub first_name: String,

    pub last_name: String,

    /// RFC 3339 timestamp.
    pub created_at: String,
}

impl Credential {
    pub fn display_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credential")
            .field("id", &self.id)
            .field("username", &self.username)
            .field("password_hash", &"<redacted>")
            .field("first_name", &self.first_name)
            .field("last_name", &self.last_name)
            .field("created_at", &self.created_at)
            .finish()
    }
}

/// Registration form (`POST /register`).
///
/// Missing form fields deserialize as empty strings so that the service,
/// not the extractor, reports them.
#[derive(Clone, Default, Deserialize)]
pub struct Registration {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
}

impl Registration {
    pub fn new(username: &str, password: &str, first_name: &str, last_name: &str) -> Self {
        Self {
            username: username.to_string(),
            password: password.to_string(),
            first_name: first_name.to_string(),
            last_name: last_name.to_string(),
        }
    }
}

impl fmt::Debug for Registration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registration")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .field("first_name", &self.first_name)
            .field("last_name", &self.last_name)
            .finish()
    }
}

/// Login form (`POST /login`).
#[derive(Clone, Default, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
}

impl LoginRequest {
    pub fn new(username: &str, password: &str) -> Self {
        Self {
            username: username.to_string(),
            password: password.to_string(),
        }
    }
}

impl fmt::Debug for LoginRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoginRequest")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}
