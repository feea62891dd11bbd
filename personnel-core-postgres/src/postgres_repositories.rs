use sqlx::PgPool;
use std::sync::Arc;

use crate::repository::audit::AuditLedgerRepositoryImpl;
use crate::repository::employee::EmployeeRepositoryImpl;

/// Factory for Postgres-backed store implementations sharing one pool.
pub struct PostgresRepositories {
    pool: Arc<PgPool>,
}

impl PostgresRepositories {
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }

    /// Apply the embedded migrations.
    pub async fn migrate(&self) -> Result<(), sqlx::migrate::MigrateError> {
        sqlx::migrate!().run(self.pool.as_ref()).await
    }

    pub fn employee_store(&self) -> EmployeeRepositoryImpl {
        EmployeeRepositoryImpl::new(self.pool.clone())
    }

    pub fn audit_ledger(&self) -> AuditLedgerRepositoryImpl {
        AuditLedgerRepositoryImpl::new(self.pool.clone())
    }
}
