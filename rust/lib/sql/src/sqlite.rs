use std::path::Path;
use std::sync::Mutex;
use std::time::Duration;

use rusqlite::types::ValueRef;
use rusqlite::{Connection, ffi};
use tracing::debug;

use crate::error::SQLError;
use crate::traits::{Row, SQLStore, Value};

/// How long a statement waits on a locked database file before failing.
const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// SqliteStore is a SQLStore implementation backed by rusqlite (bundled SQLite).
///
/// A single connection is shared behind a mutex, so statements from
/// concurrent requests are serialized. Uniqueness is still enforced by the
/// database itself, never by the caller.
pub struct SqliteStore {
    conn: Mutex<Connection>,
}

impl SqliteStore {
    /// Open or create a SQLite database at the given path.
    pub fn open(path: &Path) -> Result<Self, SQLError> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)
                .map_err(|e| SQLError::Connection(format!("{}: {}", parent.display(), e)))?;
        }

        let conn = Connection::open(path).map_err(|e| SQLError::Connection(e.to_string()))?;
        conn.busy_timeout(BUSY_TIMEOUT)
            .map_err(|e| SQLError::Connection(e.to_string()))?;
        conn.execute_batch("PRAGMA journal_mode=WAL; PRAGMA foreign_keys=ON;")
            .map_err(|e| SQLError::Connection(e.to_string()))?;

        debug!("opened sqlite database at {}", path.display());
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Create an in-memory SQLite database (useful for tests).
    pub fn open_in_memory() -> Result<Self, SQLError> {
        let conn = Connection::open_in_memory().map_err(|e| SQLError::Connection(e.to_string()))?;
        conn.execute_batch("PRAGMA foreign_keys=ON;")
            .map_err(|e| SQLError::Connection(e.to_string()))?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }
}

fn bind_params(params: &[Value]) -> Vec<&dyn rusqlite::types::ToSql> {
    params
        .iter()
        .map(|v| -> &dyn rusqlite::types::ToSql {
            match v {
                Value::Null => &rusqlite::types::Null,
                Value::Integer(i) => i,
                Value::Real(f) => f,
                Value::Text(s) => s,
                Value::Blob(b) => b,
            }
        })
        .collect()
}

/// Map a rusqlite failure, singling out UNIQUE / PRIMARY KEY violations so
/// callers can turn them into domain conflicts.
fn classify(err: rusqlite::Error, fallback: fn(String) -> SQLError) -> SQLError {
    if let rusqlite::Error::SqliteFailure(ref cause, _) = err {
        if cause.extended_code == ffi::SQLITE_CONSTRAINT_UNIQUE
            || cause.extended_code == ffi::SQLITE_CONSTRAINT_PRIMARYKEY
        {
            return SQLError::UniqueViolation(err.to_string());
        }
    }
    fallback(err.to_string())
}

impl SQLStore for SqliteStore {
    fn query(&self, sql: &str, params: &[Value]) -> Result<Vec<Row>, SQLError> {
        let conn = self
            .conn
            .lock()
            .map_err(|e| SQLError::Query(e.to_string()))?;

        let mut stmt = conn
            .prepare(sql)
            .map_err(|e| classify(e, SQLError::Query))?;

        let column_names: Vec<String> = stmt
            .column_names()
            .iter()
            .map(|s| s.to_string())
            .collect();

        let rows = stmt
            .query_map(bind_params(params).as_slice(), |row| {
                let columns = column_names
                    .iter()
                    .enumerate()
                    .map(|(i, name)| Ok((name.clone(), row_value_at(row, i)?)))
                    .collect::<rusqlite::Result<Vec<_>>>()?;
                Ok(Row { columns })
            })
            .map_err(|e| classify(e, SQLError::Query))?;

        let result = rows
            .map(|row| row.map_err(|e| classify(e, SQLError::Query)))
            .collect::<Result<Vec<_>, _>>();
        result
    }

    fn exec(&self, sql: &str, params: &[Value]) -> Result<u64, SQLError> {
        let conn = self
            .conn
            .lock()
            .map_err(|e| SQLError::Execution(e.to_string()))?;

        let affected = conn
            .execute(sql, bind_params(params).as_slice())
            .map_err(|e| classify(e, SQLError::Execution))?;

        Ok(affected as u64)
    }
}

/// Read a column using SQLite's own storage class for the cell.
fn row_value_at(row: &rusqlite::Row, idx: usize) -> rusqlite::Result<Value> {
    Ok(match row.get_ref(idx)? {
        ValueRef::Null => Value::Null,
        ValueRef::Integer(i) => Value::Integer(i),
        ValueRef::Real(f) => Value::Real(f),
        ValueRef::Text(t) => Value::Text(String::from_utf8_lossy(t).into_owned()),
        ValueRef::Blob(b) => Value::Blob(b.to_vec()),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store_with_table() -> SqliteStore {
        let store = SqliteStore::open_in_memory().unwrap();
        store
            .exec(
                "CREATE TABLE people (id TEXT PRIMARY KEY, name TEXT NOT NULL UNIQUE, score REAL, active INTEGER)",
                &[],
            )
            .unwrap();
        store
    }

    #[test]
    fn insert_and_query_round_trip() {
        let store = store_with_table();
        let n = store
            .exec(
                "INSERT INTO people (id, name, score, active) VALUES (?1, ?2, ?3, ?4)",
                &["p1".into(), "ada".into(), 3.0.into(), true.into()],
            )
            .unwrap();
        assert_eq!(n, 1);

        let row = store
            .query_one("SELECT * FROM people WHERE id = ?1", &["p1".into()])
            .unwrap()
            .unwrap();
        assert_eq!(row.get_str("name"), Some("ada"));
        assert_eq!(row.get_f64("score"), Some(3.0));
        assert_eq!(row.get_bool("active"), Some(true));
        assert!(row.text("missing").is_err());
    }

    #[test]
    fn unique_violation_is_classified() {
        let store = store_with_table();
        store
            .exec("INSERT INTO people (id, name) VALUES ('a', 'dup')", &[])
            .unwrap();

        let err = store
            .exec("INSERT INTO people (id, name) VALUES ('b', 'dup')", &[])
            .unwrap_err();
        assert!(err.is_unique_violation(), "got {err:?}");

        let err = store
            .exec("INSERT INTO people (id, name) VALUES ('a', 'other')", &[])
            .unwrap_err();
        assert!(err.is_unique_violation(), "got {err:?}");
    }

    #[test]
    fn other_failures_are_not_unique_violations() {
        let store = store_with_table();
        let err = store
            .exec("INSERT INTO people (id) VALUES ('x')", &[])
            .unwrap_err();
        assert!(!err.is_unique_violation());

        let err = store.query("SELECT * FROM nowhere", &[]).unwrap_err();
        assert!(matches!(err, SQLError::Query(_)));
    }

    #[test]
    fn open_creates_parent_directories() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested/db.sqlite");
        let store = SqliteStore::open(&path).unwrap();
        store.exec("CREATE TABLE t (x INTEGER)", &[]).unwrap();
        assert!(path.exists());
    }
}
