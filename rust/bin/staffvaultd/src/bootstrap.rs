//! Startup checks: refuse to run with a configuration that would be unsafe
//! or unusable.

use auth::service::cookie::MIN_SECRET_LEN;

use crate::config::ServerConfig;

/// Verify server configuration is ready for production use.
pub fn verify_config(config: &ServerConfig) -> anyhow::Result<()> {
    if config.storage.data_dir.is_empty() {
        anyhow::bail!("Storage data_dir is empty in configuration.");
    }

    let session = &config.auth.session;
    if session.secret.len() < MIN_SECRET_LEN {
        anyhow::bail!(
            "Session secret must be at least {} bytes (got {}).",
            MIN_SECRET_LEN,
            session.secret.len()
        );
    }
    if session.ttl_secs == 0 {
        anyhow::bail!("Session ttl_secs must be greater than zero.");
    }
    if session.sweep_interval_secs == 0 {
        anyhow::bail!("Session sweep_interval_secs must be greater than zero.");
    }
    if session.cookie_name.is_empty() {
        anyhow::bail!("Session cookie_name is empty in configuration.");
    }

    let policy = &config.auth.policy;
    if policy.username_min > policy.username_max {
        anyhow::bail!("Policy username_min is greater than username_max.");
    }
    if policy.password_min > policy.password_max {
        anyhow::bail!("Policy password_min is greater than password_max.");
    }
    Ok(())
}
