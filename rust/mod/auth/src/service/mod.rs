pub mod cookie;
pub mod credential_store;
pub mod login;
pub mod password;
pub mod policy;
pub mod register;
pub mod schema;
pub mod session_store;

use std::fmt;
use std::sync::Arc;

use axum::http::StatusCode;
use serde::Deserialize;
use thiserror::Error;

use staffvault_sql::{SQLError, SQLStore};

pub use cookie::CookieSigner;
pub use credential_store::{CredentialStore, SqlCredentialStore};
pub use password::PasswordHasher;
pub use policy::{CredentialPolicy, CredentialRule};
pub use session_store::{SessionStore, SqlSessionStore};

/// Auth service error type.
///
/// Everything except `Storage` and `Internal` is recoverable: the form is
/// re-rendered with [`AuthError::user_message`].
#[derive(Debug, Error)]
pub enum AuthError {
    /// Missing or malformed input.
    #[error("{0}")]
    Validation(String),

    /// A configured credential rule rejected the input.
    #[error("{0}")]
    WeakCredential(CredentialRule),

    #[error("username '{0}' is already registered")]
    DuplicateUsername(String),

    #[error("username not registered")]
    UnknownUsername,

    #[error("username or password incorrect")]
    InvalidCredential,

    /// The stored digest could not be parsed or used.
    #[error("corrupt stored credential: {0}")]
    CorruptCredential(String),

    #[error("storage: {0}")]
    Storage(String),

    #[error("internal: {0}")]
    Internal(String),
}

impl AuthError {
    /// Message shown back to the user on the form.
    pub fn user_message(&self) -> String {
        match self {
            AuthError::Validation(m) => m.clone(),
            AuthError::WeakCredential(rule) => rule.to_string(),
            AuthError::DuplicateUsername(_) => "Username has been taken!".to_string(),
            AuthError::UnknownUsername => "Username not registered. Please sign up!".to_string(),
            AuthError::InvalidCredential | AuthError::CorruptCredential(_) => {
                "Username or password incorrect".to_string()
            }
            AuthError::Storage(_) | AuthError::Internal(_) => "Internal server error".to_string(),
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            AuthError::Validation(_) | AuthError::WeakCredential(_) => StatusCode::BAD_REQUEST,
            AuthError::DuplicateUsername(_) => StatusCode::CONFLICT,
            AuthError::UnknownUsername
            | AuthError::InvalidCredential
            | AuthError::CorruptCredential(_) => StatusCode::UNAUTHORIZED,
            AuthError::Storage(_) | AuthError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn is_server_error(&self) -> bool {
        self.status_code().is_server_error()
    }
}

impl From<SQLError> for AuthError {
    fn from(e: SQLError) -> Self {
        AuthError::Storage(e.to_string())
    }
}

impl From<AuthError> for staffvault_core::ServiceError {
    fn from(e: AuthError) -> Self {
        use staffvault_core::ServiceError;
        match e {
            AuthError::Validation(_) | AuthError::WeakCredential(_) => {
                ServiceError::Validation(e.user_message())
            }
            AuthError::DuplicateUsername(_) => ServiceError::Conflict(e.user_message()),
            AuthError::UnknownUsername
            | AuthError::InvalidCredential
            | AuthError::CorruptCredential(_) => ServiceError::Unauthorized(e.user_message()),
            AuthError::Storage(m) => ServiceError::Storage(m),
            AuthError::Internal(m) => ServiceError::Internal(m),
        }
    }
}

// ── Configuration ──

/// Session cookie and lifetime settings.
#[derive(Clone, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// HMAC key for the cookie signature. At least 32 bytes.
    pub secret: String,
    pub cookie_name: String,
    /// Session lifetime in seconds (default: 24h).
    pub ttl_secs: u64,
    /// Emit the `Secure` cookie attribute.
    pub secure: bool,
    /// How often the server evicts expired sessions (default: 5 min).
    pub sweep_interval_secs: u64,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            secret: String::new(),
            cookie_name: "session".to_string(),
            ttl_secs: 86400,
            secure: false,
            sweep_interval_secs: 300,
        }
    }
}

impl fmt::Debug for SessionConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionConfig")
            .field("secret", &"<redacted>")
            .field("cookie_name", &self.cookie_name)
            .field("ttl_secs", &self.ttl_secs)
            .field("secure", &self.secure)
            .field("sweep_interval_secs", &self.sweep_interval_secs)
            .finish()
    }
}

/// Argon2id cost parameters.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct HashConfig {
    pub memory_kib: u32,
    pub iterations: u32,
    pub parallelism: u32,
}

impl Default for HashConfig {
    fn default() -> Self {
        // argon2 crate defaults (OWASP minimum for argon2id).
        Self {
            memory_kib: 19 * 1024,
            iterations: 2,
            parallelism: 1,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoginConfig {
    /// Report unknown usernames with the same message as wrong passwords.
    pub unify_errors: bool,
    /// Where a successful login redirects to.
    pub landing_path: String,
}

impl Default for LoginConfig {
    fn default() -> Self {
        Self {
            unify_errors: false,
            landing_path: "/staff".to_string(),
        }
    }
}

/// Configuration for the auth service.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AuthConfig {
    pub session: SessionConfig,
    pub policy: CredentialPolicy,
    pub hash: HashConfig,
    pub login: LoginConfig,
}

// ── Service ──

/// The Auth service: registration, login, logout and session checks.
///
/// All collaborators are injected; nothing here is process-global.
pub struct AuthService {
    pub(crate) credentials: Arc<dyn CredentialStore>,
    pub(crate) sessions: Arc<dyn SessionStore>,
    pub(crate) hasher: PasswordHasher,
    pub(crate) signer: CookieSigner,
    pub(crate) config: AuthConfig,
}

impl AuthService {
    /// Create an AuthService over explicit stores.
    pub fn new(
        credentials: Arc<dyn CredentialStore>,
        sessions: Arc<dyn SessionStore>,
        config: AuthConfig,
    ) -> Result<Arc<Self>, AuthError> {
        let signer = CookieSigner::new(config.session.secret.as_bytes())?;
        let hasher = PasswordHasher::new(&config.hash)?;
        Ok(Arc::new(Self {
            credentials,
            sessions,
            hasher,
            signer,
            config,
        }))
    }

    /// Create an AuthService backed by SQL tables, initializing the schema.
    pub fn with_sql(sql: Arc<dyn SQLStore>, config: AuthConfig) -> Result<Arc<Self>, AuthError> {
        schema::init_schema(sql.as_ref())?;
        Self::new(
            Arc::new(SqlCredentialStore::new(Arc::clone(&sql))),
            Arc::new(SqlSessionStore::new(sql)),
            config,
        )
    }

    pub fn config(&self) -> &AuthConfig {
        &self.config
    }

    /// Evict expired sessions. Returns the number removed.
    pub fn purge_expired_sessions(&self) -> Result<u64, AuthError> {
        self.sessions.purge_expired()
    }
}
