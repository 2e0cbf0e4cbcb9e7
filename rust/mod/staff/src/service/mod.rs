pub mod records;
pub mod schema;

use std::sync::Arc;

use axum::http::StatusCode;
use thiserror::Error;

use staffvault_core::ServiceError;
use staffvault_sql::{SQLError, SQLStore};

#[derive(Debug, Error)]
pub enum StaffError {
    /// A form field is missing or malformed.
    #[error("{0}")]
    Validation(String),

    #[error("staff record '{0}' not found")]
    NotFound(String),

    #[error("storage: {0}")]
    Storage(String),
}

impl StaffError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            StaffError::Validation(_) => StatusCode::BAD_REQUEST,
            StaffError::NotFound(_) => StatusCode::NOT_FOUND,
            StaffError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<SQLError> for StaffError {
    fn from(e: SQLError) -> Self {
        StaffError::Storage(e.to_string())
    }
}

impl From<StaffError> for ServiceError {
    fn from(e: StaffError) -> Self {
        match e {
            StaffError::Validation(m) => ServiceError::Validation(m),
            StaffError::NotFound(_) => ServiceError::NotFound(e.to_string()),
            StaffError::Storage(m) => ServiceError::Storage(m),
        }
    }
}

/// Staff service: record CRUD over the `staff` table.
pub struct StaffService {
    pub(crate) sql: Arc<dyn SQLStore>,
}

impl StaffService {
    pub fn new(sql: Arc<dyn SQLStore>) -> Result<Self, StaffError> {
        schema::init_schema(sql.as_ref())?;
        Ok(Self { sql })
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn errors_map_to_service_errors() {
        let e: ServiceError = StaffError::NotFound("abc".into()).into();
        assert_eq!(e.status_code(), StatusCode::NOT_FOUND);
        let e: ServiceError = StaffError::Validation("bad".into()).into();
        assert_eq!(e.status_code(), StatusCode::BAD_REQUEST);
        assert!(StaffError::Storage("disk".into()).status_code().is_server_error());
    }

    #[test]
    fn schema_init_is_idempotent() {
        let sql = Arc::new(staffvault_sql::SqliteStore::open_in_memory().unwrap());
        StaffService::new(sql.clone()).unwrap();
        StaffService::new(sql).unwrap();
    }
}
