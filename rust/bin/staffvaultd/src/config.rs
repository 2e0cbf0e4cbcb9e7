//! Server configuration, loaded from a TOML file.

use std::path::{Path, PathBuf};

use anyhow::Context;
use serde::Deserialize;

use auth::service::AuthConfig;

/// Directory searched for bare context names.
const CONFIG_DIR: &str = "/etc/staffvault";

/// Sqlite file name inside `data_dir` when no explicit path is set.
const SQLITE_FILE: &str = "staffvault.sqlite";

#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    #[serde(default)]
    pub data_dir: String,

    /// Overrides `{data_dir}/staffvault.sqlite`.
    #[serde(default)]
    pub sqlite_path: Option<String>,
}

impl StorageConfig {
    pub fn resolve_sqlite_path(&self) -> PathBuf {
        match &self.sqlite_path {
            Some(p) if !p.is_empty() => PathBuf::from(p),
            _ => Path::new(&self.data_dir).join(SQLITE_FILE),
        }
    }
}

/// Server-side config file.
///
/// `[storage]` is required. The auth sections (`[session]`, `[policy]`,
/// `[hash]`, `[login]`) sit at the top level and fall back to defaults.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub storage: StorageConfig,

    #[serde(flatten)]
    pub auth: AuthConfig,
}

impl ServerConfig {
    /// Resolve `-c` to a file: a bare name maps to
    /// `/etc/staffvault/<name>.toml`, anything with `/` or `.` is a path.
    pub fn resolve_path(name_or_path: &str) -> PathBuf {
        if name_or_path.contains('/') || name_or_path.contains('.') {
            PathBuf::from(name_or_path)
        } else {
            Path::new(CONFIG_DIR).join(format!("{}.toml", name_or_path))
        }
    }

    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config {}", path.display()))?;
        Self::parse(&content).with_context(|| format!("invalid config {}", path.display()))
    }

    pub fn parse(content: &str) -> anyhow::Result<Self> {
        Ok(toml::from_str(content)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolve_names_and_paths() {
        assert_eq!(
            ServerConfig::resolve_path("prod"),
            PathBuf::from("/etc/staffvault/prod.toml")
        );
        assert_eq!(ServerConfig::resolve_path("./dev.toml"), PathBuf::from("./dev.toml"));
        assert_eq!(ServerConfig::resolve_path("local.toml"), PathBuf::from("local.toml"));
    }

    #[test]
    fn parse_full_config() {
        let config = ServerConfig::parse(
            r#"
            [storage]
            data_dir = "/var/lib/staffvault"

            [session]
            secret = "0123456789abcdef0123456789abcdef"
            ttl_secs = 600
            secure = true

            [policy]
            password_symbol = false
            password_min = 10

            [hash]
            memory_kib = 8192

            [login]
            unify_errors = true
            "#,
        )
        .unwrap();

        assert_eq!(
            config.storage.resolve_sqlite_path(),
            PathBuf::from("/var/lib/staffvault/staffvault.sqlite")
        );
        assert_eq!(config.auth.session.ttl_secs, 600);
        assert!(config.auth.session.secure);
        assert_eq!(config.auth.session.cookie_name, "session");
        assert!(!config.auth.policy.password_symbol);
        assert_eq!(config.auth.policy.password_min, 10);
        assert_eq!(config.auth.hash.memory_kib, 8192);
        assert_eq!(config.auth.hash.iterations, 2);
        assert!(config.auth.login.unify_errors);
    }

    #[test]
    fn sqlite_path_override() {
        let config = ServerConfig::parse(
            r#"
            [storage]
            data_dir = "/data"
            sqlite_path = "/elsewhere/db.sqlite"
            "#,
        )
        .unwrap();
        assert_eq!(
            config.storage.resolve_sqlite_path(),
            PathBuf::from("/elsewhere/db.sqlite")
        );
        assert!(config.auth.session.secret.is_empty());
    }

    #[test]
    fn example_config_is_valid() {
        let config = ServerConfig::parse(include_str!(
            "../../../../config/staffvault.example.toml"
        ))
        .unwrap();
        crate::bootstrap::verify_config(&config).unwrap();
        assert_eq!(config.auth.login.landing_path, "/staff");
    }

    #[test]
    fn missing_storage_is_an_error() {
        assert!(ServerConfig::parse("[session]\nsecret = \"x\"\n").is_err());
    }

    #[test]
    fn load_reports_missing_file() {
        let err = ServerConfig::load(Path::new("/nonexistent/staffvault.toml")).unwrap_err();
        assert!(err.to_string().contains("failed to read config"));
    }
}
