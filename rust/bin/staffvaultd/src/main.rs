//! `staffvaultd`: the staff records server.
//!
//! Usage:
//!   staffvaultd -c <context-name-or-path> [--listen <addr>]
//!
//! The context name resolves to `/etc/staffvault/<name>.toml`.
//! If a path with `/` or `.` is given, it's used directly.

mod bootstrap;
mod config;
mod routes;
mod sweeper;

use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use tokio_util::sync::CancellationToken;
use tracing::{error, info};

use auth::AuthModule;
use staff::StaffModule;
use staffvault_core::Module;
use staffvault_sql::{SQLStore, SqliteStore};

use config::ServerConfig;

/// Staff Vault server.
#[derive(Parser, Debug)]
#[command(name = "staffvaultd", about = "Staff Vault server")]
struct Cli {
    /// Context name or path to config file.
    #[arg(short = 'c', long = "config", required = true)]
    config: String,

    /// Listen address.
    #[arg(long = "listen", default_value = "0.0.0.0:8080")]
    listen: String,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let cli = Cli::parse();

    let config_path = ServerConfig::resolve_path(&cli.config);
    info!("Loading configuration from {}", config_path.display());
    let server_config = ServerConfig::load(&config_path)?;

    bootstrap::verify_config(&server_config)?;

    let sqlite_path = server_config.storage.resolve_sqlite_path();
    let sql: Arc<dyn SQLStore> = Arc::new(
        SqliteStore::open(&sqlite_path)
            .map_err(|e| anyhow::anyhow!("failed to open SQL store: {}", e))?,
    );
    info!("SQL store opened at {}", sqlite_path.display());

    let auth_module = AuthModule::new(Arc::clone(&sql), server_config.auth.clone())?;
    info!("{} module initialized", auth_module.name());

    let staff_module = StaffModule::new(sql)?;
    info!("{} module initialized", staff_module.name());

    let sweeper = sweeper::start(
        Arc::clone(auth_module.service()),
        Duration::from_secs(server_config.auth.session.sweep_interval_secs),
    );

    let app = routes::build_router(&auth_module, &staff_module);

    let listener = tokio::net::TcpListener::bind(&cli.listen).await?;
    info!("Staff Vault server listening on {}", cli.listen);
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(sweeper.clone()))
        .await?;

    sweeper.cancel();
    info!("Server stopped");
    Ok(())
}

/// Resolves on Ctrl-C and stops background work.
async fn shutdown_signal(sweeper: CancellationToken) {
    if let Err(e) = tokio::signal::ctrl_c().await {
        // Without a signal handler, keep serving until the process is killed.
        error!("failed to listen for shutdown signal: {e}");
        std::future::pending::<()>().await;
    }
    info!("Shutdown requested");
    sweeper.cancel();
}
