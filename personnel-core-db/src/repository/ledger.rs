use async_trait::async_trait;
use uuid::Uuid;

use crate::models::audit::AuditEntryModel;
use crate::repository::pagination::{Page, PageRequest};
use crate::repository::StoreError;

/// Optional filters for ledger queries. All unset means "everything".
#[derive(Debug, Clone, Default)]
pub struct AuditQuery {
    pub entity_type: Option<String>,
    pub entity_id: Option<Uuid>,
    pub actor_id: Option<Uuid>,
}

impl AuditQuery {
    pub fn for_entity(entity_type: impl Into<String>, entity_id: Uuid) -> Self {
        Self {
            entity_type: Some(entity_type.into()),
            entity_id: Some(entity_id),
            actor_id: None,
        }
    }
}

/// Append-only store for audit entries.
///
/// Entries are never updated or deleted by the application; `query` orders by
/// `created_at` descending and must not reorder entries relative to their own
/// insertion (ties stay in insertion order).
#[async_trait]
pub trait AuditLedger: Send + Sync {
    async fn append(&self, entry: AuditEntryModel) -> Result<(), StoreError>;

    async fn query(
        &self,
        filter: &AuditQuery,
        page: PageRequest,
    ) -> Result<Page<AuditEntryModel>, StoreError>;
}
