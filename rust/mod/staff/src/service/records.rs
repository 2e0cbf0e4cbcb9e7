use chrono::NaiveDate;
use tracing::info;

use staffvault_core::{ListParams, ListResult, new_id, now_rfc3339};
use staffvault_sql::{Row, SQLError, Value};

use super::{StaffError, StaffService};
use crate::model::{DATE_FORMAT, StaffInput, StaffRecord};

const COLUMNS: &str = "id, first_name, last_name, position, age, salary, years_of_service, \
                       date_of_birth, has_official_car, created_at, updated_at";

impl StaffService {
    pub fn create(&self, input: StaffInput) -> Result<StaffRecord, StaffError> {
        let now = now_rfc3339();
        let record = StaffRecord {
            id: new_id(),
            first_name: input.first_name,
            last_name: input.last_name,
            position: input.position,
            age: input.age,
            salary: input.salary,
            years_of_service: input.years_of_service,
            date_of_birth: input.date_of_birth,
            has_official_car: input.has_official_car,
            created_at: now.clone(),
            updated_at: now,
        };

        self.sql.exec(
            &format!(
                "INSERT INTO staff ({}) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)",
                COLUMNS
            ),
            &[
                Value::from(record.id.as_str()),
                Value::from(record.first_name.as_str()),
                Value::from(record.last_name.as_str()),
                Value::from(record.position.as_str()),
                Value::from(record.age),
                Value::from(record.salary),
                Value::from(record.years_of_service),
                Value::from(record.date_of_birth.format(DATE_FORMAT).to_string()),
                Value::from(record.has_official_car),
                Value::from(record.created_at.as_str()),
                Value::from(record.updated_at.as_str()),
            ],
        )?;

        info!(id = %record.id, "staff record created");
        Ok(record)
    }

    pub fn get(&self, id: &str) -> Result<StaffRecord, StaffError> {
        let row = self.sql.query_one(
            &format!("SELECT {} FROM staff WHERE id = ?1", COLUMNS),
            &[Value::from(id)],
        )?;
        match row {
            Some(r) => Ok(record_from_row(&r)?),
            None => Err(StaffError::NotFound(id.to_string())),
        }
    }

    /// One page of records, oldest first, plus the total count.
    pub fn list(&self, params: &ListParams) -> Result<ListResult<StaffRecord>, StaffError> {
        let limit = params.effective_limit();
        let rows = self.sql.query(
            &format!(
                "SELECT {} FROM staff ORDER BY created_at, id LIMIT ?1 OFFSET ?2",
                COLUMNS
            ),
            &[
                Value::Integer(limit as i64),
                Value::Integer(params.offset as i64),
            ],
        )?;
        let items = rows
            .iter()
            .map(record_from_row)
            .collect::<Result<Vec<_>, _>>()?;

        let total = self
            .sql
            .query_one("SELECT COUNT(*) AS n FROM staff", &[])?
            .and_then(|r| r.get_i64("n"))
            .unwrap_or(0);

        Ok(ListResult {
            items,
            total: total as usize,
        })
    }

    /// Replace every editable field; `created_at` is kept.
    pub fn update(&self, id: &str, input: StaffInput) -> Result<StaffRecord, StaffError> {
        let current = self.get(id)?;
        let record = StaffRecord {
            id: current.id,
            first_name: input.first_name,
            last_name: input.last_name,
            position: input.position,
            age: input.age,
            salary: input.salary,
            years_of_service: input.years_of_service,
            date_of_birth: input.date_of_birth,
            has_official_car: input.has_official_car,
            created_at: current.created_at,
            updated_at: now_rfc3339(),
        };

        let affected = self.sql.exec(
            "UPDATE staff SET first_name = ?1, last_name = ?2, position = ?3, age = ?4,
                 salary = ?5, years_of_service = ?6, date_of_birth = ?7,
                 has_official_car = ?8, updated_at = ?9
             WHERE id = ?10",
            &[
                Value::from(record.first_name.as_str()),
                Value::from(record.last_name.as_str()),
                Value::from(record.position.as_str()),
                Value::from(record.age),
                Value::from(record.salary),
                Value::from(record.years_of_service),
                Value::from(record.date_of_birth.format(DATE_FORMAT).to_string()),
                Value::from(record.has_official_car),
                Value::from(record.updated_at.as_str()),
                Value::from(id),
            ],
        )?;
        // Deleted between the read and the write.
        if affected == 0 {
            return Err(StaffError::NotFound(id.to_string()));
        }

        info!(%id, "staff record updated");
        Ok(record)
    }

    pub fn delete(&self, id: &str) -> Result<(), StaffError> {
        let affected = self
            .sql
            .exec("DELETE FROM staff WHERE id = ?1", &[Value::from(id)])?;
        if affected == 0 {
            return Err(StaffError::NotFound(id.to_string()));
        }
        info!(%id, "staff record deleted");
        Ok(())
    }

    /// Exact, case-sensitive match on first name.
    pub fn search_by_first_name(&self, first_name: &str) -> Result<Vec<StaffRecord>, StaffError> {
        let rows = self.sql.query(
            &format!(
                "SELECT {} FROM staff WHERE first_name = ?1 ORDER BY created_at, id",
                COLUMNS
            ),
            &[Value::from(first_name.trim())],
        )?;
        Ok(rows
            .iter()
            .map(record_from_row)
            .collect::<Result<Vec<_>, _>>()?)
    }
}

fn record_from_row(row: &Row) -> Result<StaffRecord, SQLError> {
    let number = |name: &str| {
        row.get_f64(name)
            .ok_or_else(|| SQLError::Query(format!("missing numeric column '{}'", name)))
    };
    let dob = row.text("date_of_birth")?;

    Ok(StaffRecord {
        id: row.text("id")?,
        first_name: row.text("first_name")?,
        last_name: row.text("last_name")?,
        position: row.text("position")?,
        age: number("age")?,
        salary: number("salary")?,
        years_of_service: number("years_of_service")?,
        date_of_birth: NaiveDate::parse_from_str(&dob, DATE_FORMAT)
            .map_err(|e| SQLError::Query(format!("bad date_of_birth '{}': {}", dob, e)))?,
        has_official_car: row.get_bool("has_official_car").unwrap_or(false),
        created_at: row.text("created_at")?,
        updated_at: row.text("updated_at")?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::service::testing::{sample_form, test_service};

    fn create(svc: &StaffService, first_name: &str) -> StaffRecord {
        svc.create(sample_form(first_name).validate().unwrap()).unwrap()
    }

    #[test]
    fn create_then_get() {
        let svc = test_service();
        let created = create(&svc, "Grace");
        let fetched = svc.get(&created.id).unwrap();
        assert_eq!(fetched, created);
        assert_eq!(fetched.salary, 4100.0);
        assert!(fetched.has_official_car);
    }

    #[test]
    fn get_unknown_is_not_found() {
        let svc = test_service();
        assert!(matches!(svc.get("missing"), Err(StaffError::NotFound(_))));
    }

    #[test]
    fn list_paginates_with_total() {
        let svc = test_service();
        for name in ["A", "B", "C"] {
            create(&svc, name);
        }
        let page = svc.list(&ListParams { limit: 2, offset: 0 }).unwrap();
        assert_eq!(page.items.len(), 2);
        assert_eq!(page.total, 3);

        let rest = svc.list(&ListParams { limit: 2, offset: 2 }).unwrap();
        assert_eq!(rest.items.len(), 1);
        assert!(!page.items.iter().any(|r| r.id == rest.items[0].id));
    }

    #[test]
    fn update_replaces_fields_and_keeps_created_at() {
        let svc = test_service();
        let created = create(&svc, "Grace");

        let mut form = sample_form("Grace");
        form.position = "Commodore".into();
        form.has_official_car = "no".into();
        let updated = svc.update(&created.id, form.validate().unwrap()).unwrap();

        assert_eq!(updated.created_at, created.created_at);
        let fetched = svc.get(&created.id).unwrap();
        assert_eq!(fetched.position, "Commodore");
        assert!(!fetched.has_official_car);
    }

    #[test]
    fn update_and_delete_unknown_are_not_found() {
        let svc = test_service();
        let input = sample_form("Grace").validate().unwrap();
        assert!(matches!(svc.update("missing", input), Err(StaffError::NotFound(_))));
        assert!(matches!(svc.delete("missing"), Err(StaffError::NotFound(_))));
    }

    #[test]
    fn delete_removes_record() {
        let svc = test_service();
        let created = create(&svc, "Grace");
        svc.delete(&created.id).unwrap();
        assert!(matches!(svc.get(&created.id), Err(StaffError::NotFound(_))));
    }

    #[test]
    fn search_matches_first_name_exactly() {
        let svc = test_service();
        create(&svc, "Grace");
        create(&svc, "Grace");
        create(&svc, "Ada");

        assert_eq!(svc.search_by_first_name("Grace").unwrap().len(), 2);
        assert_eq!(svc.search_by_first_name(" Ada ").unwrap().len(), 1);
        assert!(svc.search_by_first_name("grace").unwrap().is_empty());
        assert!(svc.search_by_first_name("Nobody").unwrap().is_empty());
    }
}
