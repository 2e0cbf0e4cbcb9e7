//! Background eviction of expired sessions.

use std::sync::Arc;
use std::time::Duration;

use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info};

use auth::service::AuthService;

/// Start the session sweeper. Cancel the returned token to stop it.
pub fn start(auth: Arc<AuthService>, interval: Duration) -> CancellationToken {
    let cancel = CancellationToken::new();
    let stop = cancel.clone();

    tokio::spawn(async move {
        info!("session sweeper started (interval={interval:?})");
        loop {
            tokio::select! {
                _ = stop.cancelled() => {
                    info!("session sweeper stopped");
                    break;
                }
                _ = tokio::time::sleep(interval) => {
                    debug!("session sweep");
                    match auth.purge_expired_sessions() {
                        Ok(0) => {}
                        Ok(n) => info!("session sweeper: evicted {n} expired sessions"),
                        Err(e) => error!("session sweeper error: {e}"),
                    }
                }
            }
        }
    });

    cancel
}
