use async_trait::async_trait;
use sqlx::PgPool;
use std::sync::Arc;

use personnel_core_db::models::audit::AuditEntryModel;
use personnel_core_db::repository::{AuditLedger, AuditQuery, Page, PageRequest, StoreError};

/// Postgres-backed append-only ledger. No update or delete statement exists
/// for `audit_entries` anywhere in this crate.
pub struct AuditLedgerRepositoryImpl {
    pub(crate) pool: Arc<PgPool>,
}

impl AuditLedgerRepositoryImpl {
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AuditLedger for AuditLedgerRepositoryImpl {
    async fn append(&self, entry: AuditEntryModel) -> Result<(), StoreError> {
        self.append_impl(entry).await
    }

    async fn query(
        &self,
        filter: &AuditQuery,
        page: PageRequest,
    ) -> Result<Page<AuditEntryModel>, StoreError> {
        self.query_impl(filter, page).await
    }
}
