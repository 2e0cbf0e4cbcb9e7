use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::service::StaffError;

/// Date format used for `date_of_birth` in forms and storage.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// A stored staff record.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StaffRecord {
    pub id: String,
    pub first_name: String,
    pub last_name: String,
    pub position: String,
    pub age: f64,
    pub salary: f64,
    pub years_of_service: f64,
    pub date_of_birth: NaiveDate,
    pub has_official_car: bool,
    pub created_at: String,
    pub updated_at: String,
}

/// Validated field values for create and update.
#[derive(Debug, Clone, PartialEq)]
pub struct StaffInput {
    pub first_name: String,
    pub last_name: String,
    pub position: String,
    pub age: f64,
    pub salary: f64,
    pub years_of_service: f64,
    pub date_of_birth: NaiveDate,
    pub has_official_car: bool,
}

/// Raw staff form as posted by the browser. Every field is text so that a
/// rejected submission can be rendered back unchanged.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct StaffForm {
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub position: String,
    #[serde(default)]
    pub age: String,
    #[serde(default)]
    pub salary: String,
    #[serde(default)]
    pub years_of_service: String,
    #[serde(default)]
    pub date_of_birth: String,
    #[serde(default)]
    pub has_official_car: String,
}

impl StaffForm {
    /// Prefill values for editing an existing record.
    pub fn from_record(record: &StaffRecord) -> Self {
        Self {
            first_name: record.first_name.clone(),
            last_name: record.last_name.clone(),
            position: record.position.clone(),
            age: record.age.to_string(),
            salary: record.salary.to_string(),
            years_of_service: record.years_of_service.to_string(),
            date_of_birth: record.date_of_birth.format(DATE_FORMAT).to_string(),
            has_official_car: if record.has_official_car { "yes" } else { "no" }.to_string(),
        }
    }

    pub fn validate(&self) -> Result<StaffInput, StaffError> {
        let fields = [
            &self.first_name,
            &self.last_name,
            &self.position,
            &self.age,
            &self.salary,
            &self.years_of_service,
            &self.date_of_birth,
            &self.has_official_car,
        ];
        if fields.iter().any(|f| f.trim().is_empty()) {
            return Err(StaffError::Validation(
                "Ensure that you fill the fields".to_string(),
            ));
        }

        Ok(StaffInput {
            first_name: self.first_name.trim().to_string(),
            last_name: self.last_name.trim().to_string(),
            position: self.position.trim().to_string(),
            age: parse_amount("age", &self.age)?,
            salary: parse_amount("salary", &self.salary)?,
            years_of_service: parse_amount("years_of_service", &self.years_of_service)?,
            date_of_birth: NaiveDate::parse_from_str(self.date_of_birth.trim(), DATE_FORMAT)
                .map_err(|_| {
                    StaffError::Validation(
                        "date_of_birth must be a date in YYYY-MM-DD format".to_string(),
                    )
                })?,
            has_official_car: parse_flag(&self.has_official_car)?,
        })
    }
}

fn parse_amount(field: &str, raw: &str) -> Result<f64, StaffError> {
    match raw.trim().parse::<f64>() {
        Ok(v) if v.is_finite() && v >= 0.0 => Ok(v),
        _ => Err(StaffError::Validation(format!(
            "{} must be a non-negative number",
            field
        ))),
    }
}

fn parse_flag(raw: &str) -> Result<bool, StaffError> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "true" | "on" | "yes" | "1" => Ok(true),
        "false" | "off" | "no" | "0" => Ok(false),
        _ => Err(StaffError::Validation(
            "has_official_car must be yes or no".to_string(),
        )),
    }
}
