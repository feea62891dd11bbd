use chrono::{DateTime, NaiveDate, Utc};
use personnel_core_api::{FieldValue, Patch};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::str::FromStr;
use uuid::Uuid;

use crate::models::Identifiable;

/// Database model for the employee status enum
///
/// `active -> archived` (soft delete) is one-way; reactivation would be a
/// distinct explicit update, never implied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "employee_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum EmployeeStatus {
    Active,
    OnLeave,
    Terminated,
    Archived,
}

impl std::fmt::Display for EmployeeStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EmployeeStatus::Active => write!(f, "active"),
            EmployeeStatus::OnLeave => write!(f, "on_leave"),
            EmployeeStatus::Terminated => write!(f, "terminated"),
            EmployeeStatus::Archived => write!(f, "archived"),
        }
    }
}

impl FromStr for EmployeeStatus {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "active" => Ok(EmployeeStatus::Active),
            "on_leave" => Ok(EmployeeStatus::OnLeave),
            "terminated" => Ok(EmployeeStatus::Terminated),
            "archived" => Ok(EmployeeStatus::Archived),
            _ => Err(()),
        }
    }
}

impl From<EmployeeStatus> for FieldValue {
    fn from(value: EmployeeStatus) -> Self {
        FieldValue::Text(value.to_string())
    }
}

/// Database model for an employee personnel record
///
/// `salary_encrypted` is the persisted form of the one sensitive field this
/// record carries; the plaintext never reaches the store. `deleted_at` is the
/// soft-delete marker; rows are never removed by the application.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct EmployeeModel {
    pub id: Uuid,

    /// Link to the identity provider's user, when the employee has a login.
    /// Drives the `is_self` input of the redaction decision.
    pub user_id: Option<Uuid>,

    /// Unique HR code, e.g. "EMP-00042"
    pub employee_number: String,

    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: Option<String>,
    pub date_of_birth: Option<NaiveDate>,
    pub address: Option<String>,
    pub emergency_contact: Option<String>,

    pub department_id: Option<Uuid>,
    pub position: Option<String>,
    pub hire_date: NaiveDate,
    pub status: EmployeeStatus,
    pub manager_id: Option<Uuid>,

    /// Ciphertext token produced by the field cipher; None when no salary
    /// was ever recorded.
    pub salary_encrypted: Option<String>,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>,
}

impl EmployeeModel {
    pub fn is_active(&self) -> bool {
        self.deleted_at.is_none()
    }
}

impl Identifiable for EmployeeModel {
    fn get_id(&self) -> Uuid {
        self.id
    }
}

/// Command payload for creating an employee record.
///
/// `salary` is accepted in plaintext here and exists only transiently; it is
/// encrypted before persistence and never written to the ledger in clear.
#[derive(Debug, Clone, Deserialize)]
pub struct NewEmployee {
    pub employee_number: String,
    pub user_id: Option<Uuid>,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub date_of_birth: Option<NaiveDate>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub emergency_contact: Option<String>,
    #[serde(default)]
    pub department_id: Option<Uuid>,
    #[serde(default)]
    pub position: Option<String>,
    pub hire_date: NaiveDate,
    #[serde(default = "default_status")]
    pub status: EmployeeStatus,
    #[serde(default)]
    pub manager_id: Option<Uuid>,
    #[serde(default)]
    pub salary: Option<Decimal>,
}

fn default_status() -> EmployeeStatus {
    EmployeeStatus::Active
}

/// Partial-update command: absent fields are left untouched, explicit null
/// clears nullable fields, and a value replaces the stored one.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct EmployeeUpdate {
    #[serde(default)]
    pub first_name: Patch<String>,
    #[serde(default)]
    pub last_name: Patch<String>,
    #[serde(default)]
    pub email: Patch<String>,
    #[serde(default)]
    pub phone: Patch<String>,
    #[serde(default)]
    pub date_of_birth: Patch<NaiveDate>,
    #[serde(default)]
    pub address: Patch<String>,
    #[serde(default)]
    pub emergency_contact: Patch<String>,
    #[serde(default)]
    pub department_id: Patch<Uuid>,
    #[serde(default)]
    pub position: Patch<String>,
    #[serde(default)]
    pub hire_date: Patch<NaiveDate>,
    #[serde(default)]
    pub status: Patch<EmployeeStatus>,
    #[serde(default)]
    pub manager_id: Patch<Uuid>,
    #[serde(default)]
    pub salary: Patch<Decimal>,
}

/// Read projection handed to the presentation layer.
///
/// `salary` holds the transiently decrypted canonical string (or the
/// decryption sentinel for a corrupt token) and is nulled out by the
/// redaction policy for viewers who may not see it. The key is always
/// serialized so API consumers get a stable shape.
#[derive(Debug, Clone, Serialize)]
pub struct EmployeeView {
    pub id: Uuid,
    pub user_id: Option<Uuid>,
    pub employee_number: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: Option<String>,
    pub date_of_birth: Option<NaiveDate>,
    pub address: Option<String>,
    pub emergency_contact: Option<String>,
    pub department_id: Option<Uuid>,
    pub position: Option<String>,
    pub hire_date: NaiveDate,
    pub status: EmployeeStatus,
    pub manager_id: Option<Uuid>,
    pub salary: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl EmployeeView {
    pub fn from_model(model: &EmployeeModel, salary: Option<String>) -> Self {
        Self {
            id: model.id,
            user_id: model.user_id,
            employee_number: model.employee_number.clone(),
            first_name: model.first_name.clone(),
            last_name: model.last_name.clone(),
            email: model.email.clone(),
            phone: model.phone.clone(),
            date_of_birth: model.date_of_birth,
            address: model.address.clone(),
            emergency_contact: model.emergency_contact.clone(),
            department_id: model.department_id,
            position: model.position.clone(),
            hire_date: model.hire_date,
            status: model.status,
            manager_id: model.manager_id,
            salary,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_round_trips_through_str() {
        for status in [
            EmployeeStatus::Active,
            EmployeeStatus::OnLeave,
            EmployeeStatus::Terminated,
            EmployeeStatus::Archived,
        ] {
            assert_eq!(status.to_string().parse::<EmployeeStatus>(), Ok(status));
        }
    }

    #[test]
    fn update_deserializes_partial_payload() {
        let update: EmployeeUpdate =
            serde_json::from_str(r#"{"status": "on_leave", "phone": null}"#).unwrap();
        assert_eq!(update.status, Patch::Set(EmployeeStatus::OnLeave));
        assert_eq!(update.phone, Patch::Clear);
        assert!(update.first_name.is_keep());
        assert!(update.salary.is_keep());
    }

    #[test]
    fn view_serializes_salary_key_even_when_redacted() {
        let model = EmployeeModel {
            id: Uuid::new_v4(),
            user_id: None,
            employee_number: "EMP-00001".to_string(),
            first_name: "Ada".to_string(),
            last_name: "Lovelace".to_string(),
            email: "ada@example.com".to_string(),
            phone: None,
            date_of_birth: None,
            address: None,
            emergency_contact: None,
            department_id: None,
            position: None,
            hire_date: NaiveDate::from_ymd_opt(2020, 1, 6).unwrap(),
            status: EmployeeStatus::Active,
            manager_id: None,
            salary_encrypted: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
            deleted_at: None,
        };

        let view = EmployeeView::from_model(&model, None);
        let json = serde_json::to_value(&view).unwrap();
        assert!(json.as_object().unwrap().contains_key("salary"));
        assert_eq!(json["salary"], serde_json::Value::Null);
    }
}
