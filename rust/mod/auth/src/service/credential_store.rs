use std::sync::Arc;

use staffvault_sql::{Row, SQLError, SQLStore, Value};

use crate::model::Credential;
use crate::service::AuthError;

/// Persistence for credentials.
///
/// `insert` must reject a username that already exists with
/// [`AuthError::DuplicateUsername`], atomically with the write.
pub trait CredentialStore: Send + Sync {
    fn find_by_username(&self, username: &str) -> Result<Option<Credential>, AuthError>;

    fn insert(&self, credential: &Credential) -> Result<(), AuthError>;
}

/// CredentialStore over the `credentials` table.
pub struct SqlCredentialStore {
    sql: Arc<dyn SQLStore>,
}

impl SqlCredentialStore {
    pub fn new(sql: Arc<dyn SQLStore>) -> Self {
        Self { sql }
    }
}

impl CredentialStore for SqlCredentialStore {
    fn find_by_username(&self, username: &str) -> Result<Option<Credential>, AuthError> {
        let row = self.sql.query_one(
            "SELECT id, username, password_hash, first_name, last_name, created_at
             FROM credentials WHERE username = ?1",
            &[Value::from(username)],
        )?;
        row.map(|r| credential_from_row(&r)).transpose()
    }

    fn insert(&self, credential: &Credential) -> Result<(), AuthError> {
        self.sql
            .exec(
                "INSERT INTO credentials (id, username, password_hash, first_name, last_name, created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
                &[
                    Value::from(credential.id.as_str()),
                    Value::from(credential.username.as_str()),
                    Value::from(credential.password_hash.as_str()),
                    Value::from(credential.first_name.as_str()),
                    Value::from(credential.last_name.as_str()),
                    Value::from(credential.created_at.as_str()),
                ],
            )
            .map_err(|e| match e {
                SQLError::UniqueViolation(_) => {
                    AuthError::DuplicateUsername(credential.username.clone())
                }
                other => AuthError::from(other),
            })?;
        Ok(())
    }
}

fn credential_from_row(row: &Row) -> Result<Credential, AuthError> {
    Ok(Credential {
        id: row.text("id")?,
        username: row.text("username")?,
        password_hash: row.text("password_hash")?,
        first_name: row.text("first_name")?,
        last_name: row.text("last_name")?,
        created_at: row.text("created_at")?,
    })
}

#[cfg(test)]
mod tests {
    use staffvault_core::{new_id, now_rfc3339};
    use staffvault_sql::SqliteStore;

    use super::*;
    use crate::service::schema::init_schema;

    fn store() -> SqlCredentialStore {
        let sql = Arc::new(SqliteStore::open_in_memory().unwrap());
        init_schema(sql.as_ref()).unwrap();
        SqlCredentialStore::new(sql)
    }

    fn credential(username: &str) -> Credential {
        Credential {
            id: new_id(),
            username: username.to_string(),
            password_hash: "$argon2id$v=19$m=1024,t=1,p=1$c2FsdHNhbHQ$aGFzaA".to_string(),
            first_name: "Ada".to_string(),
            last_name: "Lovelace".to_string(),
            created_at: now_rfc3339(),
        }
    }

    #[test]
    fn insert_then_find() {
        let store = store();
        let cred = credential("ada");
        store.insert(&cred).unwrap();

        let found = store.find_by_username("ada").unwrap().unwrap();
        assert_eq!(found, cred);
        assert!(store.find_by_username("nobody").unwrap().is_none());
    }

    #[test]
    fn lookup_is_exact() {
        let store = store();
        store.insert(&credential("ada")).unwrap();
        assert!(store.find_by_username("Ada").unwrap().is_none());
        assert!(store.find_by_username("ada ").unwrap().is_none());
    }

    #[test]
    fn duplicate_username_is_rejected_by_the_table() {
        let store = store();
        store.insert(&credential("ada")).unwrap();
        let err = store.insert(&credential("ada")).unwrap_err();
        assert!(matches!(err, AuthError::DuplicateUsername(ref u) if u == "ada"), "{err:?}");
    }
}
