use chrono::{DateTime, Utc};
use uuid::Uuid;

use personnel_core_db::models::employee::EmployeeStatus;
use personnel_core_db::repository::StoreError;

use super::repo_impl::EmployeeRepositoryImpl;

impl EmployeeRepositoryImpl {
    pub(super) async fn mark_deleted_impl(
        &self,
        id: Uuid,
        deleted_at: DateTime<Utc>,
    ) -> Result<bool, StoreError> {
        // Guarded on deleted_at so repeat calls affect zero rows.
        let result = sqlx::query(
            r#"
            UPDATE employees
            SET deleted_at = $2, status = $3, updated_at = $2
            WHERE id = $1 AND deleted_at IS NULL
            "#,
        )
        .bind(id)
        .bind(deleted_at)
        .bind(EmployeeStatus::Archived)
        .execute(self.pool.as_ref())
        .await?;

        Ok(result.rows_affected() > 0)
    }
}
