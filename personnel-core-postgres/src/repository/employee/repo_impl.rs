use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use std::sync::Arc;
use uuid::Uuid;

use personnel_core_db::models::employee::EmployeeModel;
use personnel_core_db::repository::{EmployeeStore, StoreError};

/// Postgres-backed employee record store. Rows are soft-deleted only; the
/// listing predicate `deleted_at IS NULL` keeps archived records invisible.
pub struct EmployeeRepositoryImpl {
    pub(crate) pool: Arc<PgPool>,
}

impl EmployeeRepositoryImpl {
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl EmployeeStore for EmployeeRepositoryImpl {
    async fn load(&self, id: Uuid) -> Result<Option<EmployeeModel>, StoreError> {
        self.load_impl(id).await
    }

    async fn save(&self, employee: EmployeeModel) -> Result<EmployeeModel, StoreError> {
        self.save_impl(employee).await
    }

    async fn mark_deleted(&self, id: Uuid, deleted_at: DateTime<Utc>) -> Result<bool, StoreError> {
        self.mark_deleted_impl(id, deleted_at).await
    }
}

#[cfg(test)]
mod tests {
    use crate::test_helper::setup_repositories;
    use chrono::{NaiveDate, Utc};
    use personnel_core_db::models::employee::{EmployeeModel, EmployeeStatus};
    use personnel_core_db::repository::EmployeeStore;
    use uuid::Uuid;

    fn new_test_employee() -> EmployeeModel {
        let now = Utc::now();
        let tag = Uuid::new_v4().simple().to_string();
        EmployeeModel {
            id: Uuid::new_v4(),
            user_id: None,
            employee_number: format!("EMP-{}", &tag[..8]),
            first_name: "Test".to_string(),
            last_name: "Person".to_string(),
            email: format!("{tag}@example.com"),
            phone: None,
            date_of_birth: None,
            address: None,
            emergency_contact: None,
            department_id: None,
            position: None,
            hire_date: NaiveDate::from_ymd_opt(2022, 5, 2).unwrap(),
            status: EmployeeStatus::Active,
            manager_id: None,
            salary_encrypted: Some("opaque-token".to_string()),
            created_at: now,
            updated_at: now,
            deleted_at: None,
        }
    }

    #[tokio::test]
    #[ignore = "requires a running Postgres (DATABASE_URL)"]
    async fn save_load_and_soft_delete_round_trip(
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        let repos = setup_repositories().await?;
        let store = repos.employee_store();

        let model = new_test_employee();
        let id = model.id;
        store.save(model.clone()).await?;

        let loaded = store.load(id).await?.expect("record should exist");
        assert_eq!(loaded.email, model.email);
        assert_eq!(loaded.salary_encrypted.as_deref(), Some("opaque-token"));

        assert!(store.mark_deleted(id, Utc::now()).await?);
        assert!(!store.mark_deleted(id, Utc::now()).await?);
        assert!(store.load(id).await?.is_none());

        Ok(())
    }
}
