use staffvault_sql::SQLStore;

use crate::service::AuthError;

/// Initialize the SQLite schema for credentials and sessions.
///
/// `credentials.username` carries the UNIQUE constraint that is the real
/// guard against two concurrent registrations of one name.
pub fn init_schema(sql: &dyn SQLStore) -> Result<(), AuthError> {
    let statements = [
        "CREATE TABLE IF NOT EXISTS credentials (
            id TEXT PRIMARY KEY,
            username TEXT NOT NULL UNIQUE,
            password_hash TEXT NOT NULL,
            first_name TEXT NOT NULL,
            last_name TEXT NOT NULL,
            created_at TEXT NOT NULL
        )",

        // Only a digest of the token is kept; expires_at is unix seconds.
        "CREATE TABLE IF NOT EXISTS sessions (
            token_hash TEXT PRIMARY KEY,
            subject_id TEXT NOT NULL,
            created_at TEXT NOT NULL,
            expires_at INTEGER NOT NULL,
            FOREIGN KEY (subject_id) REFERENCES credentials(id) ON DELETE CASCADE
        )",
        "CREATE INDEX IF NOT EXISTS idx_sessions_subject ON sessions(subject_id)",
        "CREATE INDEX IF NOT EXISTS idx_sessions_expires ON sessions(expires_at)",
    ];

    for stmt in &statements {
        sql.exec(stmt, &[])?;
    }

    Ok(())
}
