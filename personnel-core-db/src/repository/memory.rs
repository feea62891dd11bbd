use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::Mutex;
use uuid::Uuid;

use crate::models::audit::AuditEntryModel;
use crate::models::employee::{EmployeeModel, EmployeeStatus};
use crate::repository::ledger::{AuditLedger, AuditQuery};
use crate::repository::pagination::{Page, PageRequest};
use crate::repository::record_store::EmployeeStore;
use crate::repository::StoreError;

/// In-memory employee store for tests and embedded deployments.
#[derive(Debug, Default)]
pub struct MemoryEmployeeStore {
    rows: Mutex<HashMap<Uuid, EmployeeModel>>,
}

impl MemoryEmployeeStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Raw row access, bypassing the soft-delete filter. Useful for
    /// asserting on persisted ciphertext in tests.
    pub fn raw(&self, id: Uuid) -> Option<EmployeeModel> {
        self.rows.lock().expect("store lock poisoned").get(&id).cloned()
    }
}

#[async_trait]
impl EmployeeStore for MemoryEmployeeStore {
    async fn load(&self, id: Uuid) -> Result<Option<EmployeeModel>, StoreError> {
        let rows = self.rows.lock().expect("store lock poisoned");
        Ok(rows.get(&id).filter(|e| e.is_active()).cloned())
    }

    async fn save(&self, employee: EmployeeModel) -> Result<EmployeeModel, StoreError> {
        let mut rows = self.rows.lock().expect("store lock poisoned");
        rows.insert(employee.id, employee.clone());
        Ok(employee)
    }

    async fn mark_deleted(&self, id: Uuid, deleted_at: DateTime<Utc>) -> Result<bool, StoreError> {
        let mut rows = self.rows.lock().expect("store lock poisoned");
        match rows.get_mut(&id) {
            Some(row) if row.is_active() => {
                row.deleted_at = Some(deleted_at);
                row.status = EmployeeStatus::Archived;
                row.updated_at = deleted_at;
                Ok(true)
            }
            _ => Ok(false),
        }
    }
}

/// In-memory append-only ledger.
#[derive(Debug, Default)]
pub struct MemoryAuditLedger {
    entries: Mutex<Vec<AuditEntryModel>>,
}

impl MemoryAuditLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of every entry in insertion order, for assertions.
    pub fn all(&self) -> Vec<AuditEntryModel> {
        self.entries.lock().expect("ledger lock poisoned").clone()
    }
}

fn matches(entry: &AuditEntryModel, filter: &AuditQuery) -> bool {
    if let Some(entity_type) = &filter.entity_type {
        if &entry.entity_type != entity_type {
            return false;
        }
    }
    if let Some(entity_id) = filter.entity_id {
        if entry.entity_id != Some(entity_id) {
            return false;
        }
    }
    if let Some(actor_id) = filter.actor_id {
        if entry.actor_id != Some(actor_id) {
            return false;
        }
    }
    true
}

#[async_trait]
impl AuditLedger for MemoryAuditLedger {
    async fn append(&self, entry: AuditEntryModel) -> Result<(), StoreError> {
        self.entries.lock().expect("ledger lock poisoned").push(entry);
        Ok(())
    }

    async fn query(
        &self,
        filter: &AuditQuery,
        page: PageRequest,
    ) -> Result<Page<AuditEntryModel>, StoreError> {
        let entries = self.entries.lock().expect("ledger lock poisoned");
        let mut selected: Vec<AuditEntryModel> =
            entries.iter().filter(|e| matches(e, filter)).cloned().collect();
        // Stable sort keeps insertion order for equal timestamps.
        selected.sort_by(|a, b| b.created_at.cmp(&a.created_at));

        let total = selected.len();
        let items: Vec<AuditEntryModel> = selected
            .into_iter()
            .skip(page.offset)
            .take(page.limit)
            .collect();

        Ok(Page::new(items, total, page.limit, page.offset))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::audit::AuditAction;
    use chrono::TimeZone;

    fn entry_at(entity_id: Uuid, secs: i64) -> AuditEntryModel {
        AuditEntryModel {
            id: Uuid::new_v4(),
            actor_id: Some(Uuid::new_v4()),
            action: AuditAction::Update,
            entity_type: "employee".to_string(),
            entity_id: Some(entity_id),
            changes: None,
            ip_address: None,
            created_at: Utc.timestamp_opt(secs, 0).unwrap(),
        }
    }

    #[tokio::test]
    async fn query_orders_most_recent_first() {
        let ledger = MemoryAuditLedger::new();
        let entity = Uuid::new_v4();

        let e1 = entry_at(entity, 1);
        let e2 = entry_at(entity, 2);
        let e3 = entry_at(entity, 3);
        for entry in [&e1, &e2, &e3] {
            ledger.append(entry.clone()).await.unwrap();
        }

        let page = ledger
            .query(
                &AuditQuery::for_entity("employee", entity),
                PageRequest::new(10, 0),
            )
            .await
            .unwrap();

        let ids: Vec<Uuid> = page.items.iter().map(|e| e.id).collect();
        assert_eq!(ids, vec![e3.id, e2.id, e1.id]);
        assert_eq!(page.total, 3);
    }

    #[tokio::test]
    async fn query_filters_and_paginates() {
        let ledger = MemoryAuditLedger::new();
        let wanted = Uuid::new_v4();
        let other = Uuid::new_v4();

        for secs in 1..=5 {
            ledger.append(entry_at(wanted, secs)).await.unwrap();
        }
        ledger.append(entry_at(other, 6)).await.unwrap();

        let page = ledger
            .query(
                &AuditQuery::for_entity("employee", wanted),
                PageRequest::new(2, 2),
            )
            .await
            .unwrap();

        assert_eq!(page.total, 5);
        assert_eq!(page.items.len(), 2);
        // Window [2, 4) of [5, 4, 3, 2, 1]
        assert_eq!(
            page.items
                .iter()
                .map(|e| e.created_at.timestamp())
                .collect::<Vec<_>>(),
            vec![3, 2]
        );
    }

    #[tokio::test]
    async fn query_filters_by_actor() {
        let ledger = MemoryAuditLedger::new();
        let actor = Uuid::new_v4();
        let mut entry = entry_at(Uuid::new_v4(), 1);
        entry.actor_id = Some(actor);
        ledger.append(entry).await.unwrap();
        ledger.append(entry_at(Uuid::new_v4(), 2)).await.unwrap();

        let filter = AuditQuery {
            actor_id: Some(actor),
            ..Default::default()
        };
        let page = ledger.query(&filter, PageRequest::default()).await.unwrap();
        assert_eq!(page.total, 1);
        assert_eq!(page.items[0].actor_id, Some(actor));
    }

    #[tokio::test]
    async fn mark_deleted_archives_once() {
        let store = MemoryEmployeeStore::new();
        let id = Uuid::new_v4();
        let now = Utc::now();
        let model = EmployeeModel {
            id,
            user_id: None,
            employee_number: "EMP-00007".to_string(),
            first_name: "Grace".to_string(),
            last_name: "Hopper".to_string(),
            email: "grace@example.com".to_string(),
            phone: None,
            date_of_birth: None,
            address: None,
            emergency_contact: None,
            department_id: None,
            position: None,
            hire_date: now.date_naive(),
            status: EmployeeStatus::Active,
            manager_id: None,
            salary_encrypted: None,
            created_at: now,
            updated_at: now,
            deleted_at: None,
        };
        store.save(model).await.unwrap();

        assert!(store.mark_deleted(id, Utc::now()).await.unwrap());
        assert!(!store.mark_deleted(id, Utc::now()).await.unwrap());

        // Row survives but is invisible through load
        assert!(store.load(id).await.unwrap().is_none());
        let raw = store.raw(id).unwrap();
        assert_eq!(raw.status, EmployeeStatus::Archived);
        assert!(raw.deleted_at.is_some());
    }
}
