use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::models::employee::EmployeeModel;
use crate::repository::StoreError;

/// Record store contract for employee personnel records.
///
/// Soft-deleted rows are invisible through `load`; the row itself is never
/// removed so the audit ledger keeps its referential context. Concurrent
/// updates to the same record rely on the store's own concurrency control
/// (last-writer-wins unless the backend provides better).
#[async_trait]
pub trait EmployeeStore: Send + Sync {
    /// Load an active record by id. Soft-deleted records are absent.
    async fn load(&self, id: Uuid) -> Result<Option<EmployeeModel>, StoreError>;

    /// Insert or replace a record, returning the persisted state.
    async fn save(&self, employee: EmployeeModel) -> Result<EmployeeModel, StoreError>;

    /// Set the soft-delete marker and archive the record.
    ///
    /// Returns `true` only when an active record existed; repeat calls for
    /// the same id return `false`.
    async fn mark_deleted(&self, id: Uuid, deleted_at: DateTime<Utc>) -> Result<bool, StoreError>;
}
