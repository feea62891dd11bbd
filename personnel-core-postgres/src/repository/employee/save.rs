use personnel_core_db::models::employee::EmployeeModel;
use personnel_core_db::repository::StoreError;

use super::repo_impl::EmployeeRepositoryImpl;

impl EmployeeRepositoryImpl {
    pub(super) async fn save_impl(
        &self,
        employee: EmployeeModel,
    ) -> Result<EmployeeModel, StoreError> {
        sqlx::query(
            r#"
            INSERT INTO employees
            (id, user_id, employee_number, first_name, last_name, email,
             phone, date_of_birth, address, emergency_contact,
             department_id, position, hire_date, status, manager_id,
             salary_encrypted, created_at, updated_at, deleted_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10,
                    $11, $12, $13, $14, $15, $16, $17, $18, $19)
            ON CONFLICT (id) DO UPDATE SET
                user_id = EXCLUDED.user_id,
                employee_number = EXCLUDED.employee_number,
                first_name = EXCLUDED.first_name,
                last_name = EXCLUDED.last_name,
                email = EXCLUDED.email,
                phone = EXCLUDED.phone,
                date_of_birth = EXCLUDED.date_of_birth,
                address = EXCLUDED.address,
                emergency_contact = EXCLUDED.emergency_contact,
                department_id = EXCLUDED.department_id,
                position = EXCLUDED.position,
                hire_date = EXCLUDED.hire_date,
                status = EXCLUDED.status,
                manager_id = EXCLUDED.manager_id,
                salary_encrypted = EXCLUDED.salary_encrypted,
                updated_at = EXCLUDED.updated_at,
                deleted_at = EXCLUDED.deleted_at
            "#,
        )
        .bind(employee.id)
        .bind(employee.user_id)
        .bind(&employee.employee_number)
        .bind(&employee.first_name)
        .bind(&employee.last_name)
        .bind(&employee.email)
        .bind(&employee.phone)
        .bind(employee.date_of_birth)
        .bind(&employee.address)
        .bind(&employee.emergency_contact)
        .bind(employee.department_id)
        .bind(&employee.position)
        .bind(employee.hire_date)
        .bind(employee.status)
        .bind(employee.manager_id)
        .bind(&employee.salary_encrypted)
        .bind(employee.created_at)
        .bind(employee.updated_at)
        .bind(employee.deleted_at)
        .execute(self.pool.as_ref())
        .await?;

        Ok(employee)
    }
}
