use personnel_core_db::models::audit::AuditEntryModel;
use personnel_core_db::repository::StoreError;

use super::repo_impl::AuditLedgerRepositoryImpl;

impl AuditLedgerRepositoryImpl {
    pub(super) async fn append_impl(&self, entry: AuditEntryModel) -> Result<(), StoreError> {
        sqlx::query(
            r#"
            INSERT INTO audit_entries
            (id, actor_id, action, entity_type, entity_id, changes, ip_address, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            "#,
        )
        .bind(entry.id)
        .bind(entry.actor_id)
        .bind(entry.action)
        .bind(&entry.entity_type)
        .bind(entry.entity_id)
        .bind(&entry.changes)
        .bind(&entry.ip_address)
        .bind(entry.created_at)
        .execute(self.pool.as_ref())
        .await?;

        Ok(())
    }
}
