use thiserror::Error;

#[derive(Error, Debug)]
pub enum SQLError {
    #[error("query error: {0}")]
    Query(String),

    #[error("execution error: {0}")]
    Execution(String),

    /// A UNIQUE or PRIMARY KEY constraint rejected the statement.
    #[error("unique constraint violated: {0}")]
    UniqueViolation(String),

    #[error("connection error: {0}")]
    Connection(String),
}

impl SQLError {
    pub fn is_unique_violation(&self) -> bool {
        matches!(self, SQLError::UniqueViolation(_))
    }
}
