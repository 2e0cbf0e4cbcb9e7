use staffvault_sql::{SQLError, SQLStore};

const SCHEMA: &[&str] = &[
    "CREATE TABLE IF NOT EXISTS staff (
        id TEXT PRIMARY KEY,
        first_name TEXT NOT NULL,
        last_name TEXT NOT NULL,
        position TEXT NOT NULL,
        age REAL NOT NULL,
        salary REAL NOT NULL,
        years_of_service REAL NOT NULL,
        date_of_birth TEXT NOT NULL,
        has_official_car INTEGER NOT NULL,
        created_at TEXT NOT NULL,
        updated_at TEXT NOT NULL
    )",
    "CREATE INDEX IF NOT EXISTS idx_staff_first_name ON staff(first_name)",
];

/// Create the staff table if it does not exist.
pub fn init_schema(sql: &dyn SQLStore) -> Result<(), SQLError> {
    for ddl in SCHEMA {
        sql.exec(ddl, &[])?;
    }
    Ok(())
}
