use std::time::Duration;

use tracing::{debug, error, info, warn};

use crate::model::{AuthDecision, LoginRequest, Session};
use crate::service::{AuthError, AuthService};

/// A successful login.
#[derive(Debug, Clone)]
pub struct LoginSuccess {
    pub session: Session,
    /// Signed value to place in the session cookie.
    pub cookie_value: String,
}

impl AuthService {
    /// Verify a username/password pair and start a session.
    pub fn login(&self, input: LoginRequest) -> Result<LoginSuccess, AuthError> {
        let username = input.username.trim();
        if username.is_empty() || input.password.is_empty() {
            return Err(AuthError::Validation("Ensure that you fill the fields".into()));
        }

        let Some(credential) = self.credentials.find_by_username(username)? else {
            self.hasher.verify_decoy(&input.password);
            warn!(%username, "login for unknown username");
            return Err(if self.config.login.unify_errors {
                AuthError::InvalidCredential
            } else {
                AuthError::UnknownUsername
            });
        };

        match self.hasher.verify(&credential.password_hash, &input.password) {
            Ok(true) => {}
            Ok(false) => {
                warn!(subject = %credential.id, "login with wrong password");
                return Err(AuthError::InvalidCredential);
            }
            Err(AuthError::CorruptCredential(reason)) => {
                error!(subject = %credential.id, %reason, "stored password hash is unusable");
                return Err(AuthError::CorruptCredential(reason));
            }
            Err(e) => return Err(e),
        }

        let ttl = Duration::from_secs(self.config.session.ttl_secs);
        let issued = self.sessions.create(&credential.id, ttl)?;
        let cookie_value = self.signer.sign(&issued.token)?;

        info!(subject = %credential.id, "login succeeded");
        Ok(LoginSuccess {
            session: issued.session,
            cookie_value,
        })
    }

    /// End the session named by a cookie value, if there is one.
    ///
    /// Missing, forged and already-ended sessions are all accepted.
    pub fn logout(&self, cookie_value: Option<&str>) -> Result<(), AuthError> {
        let Some(token) = cookie_value.and_then(|v| self.signer.verify(v)) else {
            debug!("logout without a valid session cookie");
            return Ok(());
        };
        self.sessions.delete(token)?;
        info!("logged out");
        Ok(())
    }

    /// Decide whether a request carrying `cookie_value` is authenticated.
    pub fn authorize(&self, cookie_value: Option<&str>) -> Result<AuthDecision, AuthError> {
        let Some(value) = cookie_value else {
            return Ok(AuthDecision::denied());
        };
        let Some(token) = self.signer.verify(value) else {
            debug!("session cookie failed signature check");
            return Ok(AuthDecision::denied());
        };
        Ok(match self.sessions.get(token)? {
            Some(session) => AuthDecision::granted(session.subject_id),
            None => AuthDecision::denied(),
        })
    }
}
