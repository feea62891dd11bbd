use uuid::Uuid;

use personnel_core_db::models::employee::EmployeeModel;
use personnel_core_db::repository::StoreError;

use super::repo_impl::EmployeeRepositoryImpl;

impl EmployeeRepositoryImpl {
    pub(super) async fn load_impl(
        &self,
        id: Uuid,
    ) -> Result<Option<EmployeeModel>, StoreError> {
        let employee = sqlx::query_as::<_, EmployeeModel>(
            r#"
            SELECT id, user_id, employee_number, first_name, last_name, email,
                   phone, date_of_birth, address, emergency_contact,
                   department_id, position, hire_date, status, manager_id,
                   salary_encrypted, created_at, updated_at, deleted_at
            FROM employees
            WHERE id = $1 AND deleted_at IS NULL
            "#,
        )
        .bind(id)
        .fetch_optional(self.pool.as_ref())
        .await?;

        Ok(employee)
    }
}
