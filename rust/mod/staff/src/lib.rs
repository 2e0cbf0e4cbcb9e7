//! Staff records: the CRUD pages a logged-in user works with.
//!
//! The routes built here carry no access control of their own; the server
//! mounts them behind the auth module's session guard.

pub mod api;
pub mod model;
pub mod service;

use std::sync::Arc;

use axum::Router;
use staffvault_core::{Module, ServiceError};
use staffvault_sql::SQLStore;

use service::StaffService;

/// Staff Module: staff record management.
pub struct StaffModule {
    service: Arc<StaffService>,
}

impl StaffModule {
    pub fn new(sql: Arc<dyn SQLStore>) -> Result<Self, ServiceError> {
        Ok(Self {
            service: Arc::new(StaffService::new(sql)?),
        })
    }

    pub fn service(&self) -> Arc<StaffService> {
        Arc::clone(&self.service)
    }
}

impl Module for StaffModule {
    fn name(&self) -> &str {
        "staff"
    }

    fn routes(&self) -> Router {
        api::build_router(self.service())
    }
}
