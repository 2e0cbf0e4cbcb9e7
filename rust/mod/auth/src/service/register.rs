use tracing::info;

use staffvault_core::{new_id, now_rfc3339};

use crate::model::{Credential, Registration};
use crate::service::{AuthError, AuthService};

impl AuthService {
    /// Register a new credential. Does not log the user in.
    ///
    /// The username pre-check only saves hashing work for the common case;
    /// the store's uniqueness constraint decides concurrent registrations.
    pub fn register(&self, input: Registration) -> Result<Credential, AuthError> {
        let username = input.username.trim();
        let first_name = input.first_name.trim();
        let last_name = input.last_name.trim();

        if username.is_empty()
            || input.password.is_empty()
            || first_name.is_empty()
            || last_name.is_empty()
        {
            return Err(AuthError::Validation("Ensure that you fill the fields".into()));
        }

        self.config.policy.check(username, &input.password)?;

        if self.credentials.find_by_username(username)?.is_some() {
            return Err(AuthError::DuplicateUsername(username.to_string()));
        }

        let credential = Credential {
            id: new_id(),
            username: username.to_string(),
            password_hash: self.hasher.hash(&input.password)?,
            first_name: first_name.to_string(),
            last_name: last_name.to_string(),
            created_at: now_rfc3339(),
        };
        self.credentials.insert(&credential)?;

        info!(subject = %credential.id, username = %credential.username, "registered credential");
        Ok(credential)
    }
}
