use personnel_core_db::models::audit::AuditEntryModel;
use personnel_core_db::repository::{AuditQuery, Page, PageRequest, StoreError};

use super::repo_impl::AuditLedgerRepositoryImpl;

impl AuditLedgerRepositoryImpl {
    pub(super) async fn query_impl(
        &self,
        filter: &AuditQuery,
        page: PageRequest,
    ) -> Result<Page<AuditEntryModel>, StoreError> {
        let total: i64 = sqlx::query_scalar(
            r#"
            SELECT COUNT(*) FROM audit_entries
            WHERE ($1::varchar IS NULL OR entity_type = $1)
              AND ($2::uuid IS NULL OR entity_id = $2)
              AND ($3::uuid IS NULL OR actor_id = $3)
            "#,
        )
        .bind(filter.entity_type.as_deref())
        .bind(filter.entity_id)
        .bind(filter.actor_id)
        .fetch_one(self.pool.as_ref())
        .await?;

        // seq breaks timestamp ties in insertion order.
        let items = sqlx::query_as::<_, AuditEntryModel>(
            r#"
            SELECT id, actor_id, action, entity_type, entity_id, changes,
                   ip_address, created_at
            FROM audit_entries
            WHERE ($1::varchar IS NULL OR entity_type = $1)
              AND ($2::uuid IS NULL OR entity_id = $2)
              AND ($3::uuid IS NULL OR actor_id = $3)
            ORDER BY created_at DESC, seq ASC
            LIMIT $4 OFFSET $5
            "#,
        )
        .bind(filter.entity_type.as_deref())
        .bind(filter.entity_id)
        .bind(filter.actor_id)
        .bind(page.limit as i64)
        .bind(page.offset as i64)
        .fetch_all(self.pool.as_ref())
        .await?;

        Ok(Page::new(items, total as usize, page.limit, page.offset))
    }
}
