//! Auth module: credentials, password hashing, sessions and the access guard.
//!
//! # Flow
//!
//! - **Register**: validate, apply the credential policy, hash, insert.
//! - **Login**: look up, verify, create a session, hand back a signed cookie.
//! - **Guard**: every protected request must carry a cookie that names a
//!   live session, else it is redirected to `/login`.
//! - **Logout**: delete the session and clear the cookie.
//!
//! # Usage
//!
//! ```ignore
//! use auth::{AuthModule, service::AuthConfig};
//!
//! let module = AuthModule::new(sql, AuthConfig::default())?;
//! let app = module.routes().merge(module.protect(private_routes));
//! ```

pub mod api;
pub mod model;
pub mod service;

use std::sync::Arc;

use axum::Router;

use staffvault_core::{Module, ServiceError};
use staffvault_sql::SQLStore;

use crate::service::{AuthConfig, AuthService};

/// Auth module implementing the Module trait.
pub struct AuthModule {
    service: Arc<AuthService>,
}

impl AuthModule {
    /// Create the module over a SQL store, initializing its tables.
    pub fn new(sql: Arc<dyn SQLStore>, config: AuthConfig) -> Result<Self, ServiceError> {
        let service = AuthService::with_sql(sql, config).map_err(ServiceError::from)?;
        Ok(Self { service })
    }

    pub fn from_service(service: Arc<AuthService>) -> Self {
        Self { service }
    }

    pub fn service(&self) -> &Arc<AuthService> {
        &self.service
    }

    /// Wrap `router` so each of its routes requires a session.
    pub fn protect(&self, router: Router) -> Router {
        api::protect(Arc::clone(&self.service), router)
    }
}

impl Module for AuthModule {
    fn name(&self) -> &str {
        "auth"
    }

    fn routes(&self) -> Router {
        api::build_router(Arc::clone(&self.service))
    }
}
