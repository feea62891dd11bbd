use chrono::Utc;
use std::sync::Arc;
use uuid::Uuid;

use personnel_core_api::{ActorContext, ChangeSet, CoreError, CoreResult};
use personnel_core_db::models::audit::{AuditAction, AuditEntryModel};
use personnel_core_db::repository::{AuditLedger, AuditQuery, Page, PageRequest};

/// Appends immutable audit entries to the ledger and answers trail queries.
///
/// The recorder is only invoked after a successful domain commit. An append
/// failure therefore never rolls anything back: it is logged as a gap and
/// surfaced as `AuditWriteFailure` for callers to downgrade to a warning.
pub struct ChangeRecorder {
    ledger: Arc<dyn AuditLedger>,
}

impl ChangeRecorder {
    pub fn new(ledger: Arc<dyn AuditLedger>) -> Self {
        Self { ledger }
    }

    /// Append one audit entry. The change set is normalized into the
    /// ledger's JSON shape, rewriting identifier values to canonical
    /// strings at every nesting depth.
    pub async fn record(
        &self,
        actor_id: Option<Uuid>,
        action: AuditAction,
        entity_type: &str,
        entity_id: Option<Uuid>,
        changes: Option<ChangeSet>,
        ip_address: Option<String>,
    ) -> CoreResult<AuditEntryModel> {
        let entry = AuditEntryModel {
            id: Uuid::new_v4(),
            actor_id,
            action,
            entity_type: entity_type.to_string(),
            entity_id,
            changes: changes.filter(|c| !c.is_empty()).map(ChangeSet::into_json),
            ip_address,
            created_at: Utc::now(),
        };

        match self.ledger.append(entry.clone()).await {
            Ok(()) => Ok(entry),
            Err(err) => {
                tracing::warn!(
                    entity_type,
                    entity_id = ?entry.entity_id,
                    action = %entry.action,
                    error = %err,
                    "audit ledger append failed; domain state has no matching entry"
                );
                Err(CoreError::AuditWriteFailure(err.to_string()))
            }
        }
    }

    /// Record a successful sign-in of the given principal.
    pub async fn record_login(&self, actor: &ActorContext) -> CoreResult<AuditEntryModel> {
        self.record(
            Some(actor.actor_id),
            AuditAction::Login,
            "user",
            Some(actor.actor_id),
            None,
            actor.ip_address.clone(),
        )
        .await
    }

    /// Query the ledger, most recent entries first.
    pub async fn query(
        &self,
        filter: &AuditQuery,
        page: PageRequest,
    ) -> CoreResult<Page<AuditEntryModel>> {
        self.ledger
            .query(filter, page)
            .await
            .map_err(|e| CoreError::DatabaseError(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use personnel_core_api::{ChangeMap, FieldValue, Role};
    use personnel_core_db::repository::{MemoryAuditLedger, StoreError};
    use serde_json::json;

    struct FailingLedger;

    #[async_trait]
    impl AuditLedger for FailingLedger {
        async fn append(&self, _entry: AuditEntryModel) -> Result<(), StoreError> {
            Err("ledger unavailable".into())
        }

        async fn query(
            &self,
            _filter: &AuditQuery,
            page: PageRequest,
        ) -> Result<Page<AuditEntryModel>, StoreError> {
            Ok(Page::new(Vec::new(), 0, page.limit, page.offset))
        }
    }

    #[tokio::test]
    async fn record_appends_normalized_changes() {
        let ledger = Arc::new(MemoryAuditLedger::new());
        let recorder = ChangeRecorder::new(ledger.clone());

        let actor = Uuid::new_v4();
        let entity = Uuid::new_v4();
        let department = Uuid::new_v4();

        let mut new = ChangeMap::new();
        new.insert("department_id".to_string(), FieldValue::Id(department));
        new.insert(
            "transfers".to_string(),
            FieldValue::Seq(vec![FieldValue::Map(ChangeMap::from([(
                "from".to_string(),
                FieldValue::Id(entity),
            )]))]),
        );

        recorder
            .record(
                Some(actor),
                AuditAction::Create,
                "employee",
                Some(entity),
                Some(ChangeSet::created(new)),
                Some("10.0.0.8".to_string()),
            )
            .await
            .unwrap();

        let stored = ledger.all();
        assert_eq!(stored.len(), 1);
        let entry = &stored[0];
        assert_eq!(entry.actor_id, Some(actor));
        assert_eq!(entry.entity_type, "employee");
        assert_eq!(entry.ip_address.as_deref(), Some("10.0.0.8"));
        // Identifier leaves are stored as canonical strings at every depth
        assert_eq!(
            entry.changes,
            Some(json!({
                "new": {
                    "department_id": department.to_string(),
                    "transfers": [{"from": entity.to_string()}],
                }
            }))
        );
    }

    #[tokio::test]
    async fn empty_change_set_is_stored_as_absent() {
        let ledger = Arc::new(MemoryAuditLedger::new());
        let recorder = ChangeRecorder::new(ledger.clone());

        recorder
            .record(
                None,
                AuditAction::Delete,
                "employee",
                Some(Uuid::new_v4()),
                Some(ChangeSet::default()),
                None,
            )
            .await
            .unwrap();

        assert_eq!(ledger.all()[0].changes, None);
    }

    #[tokio::test]
    async fn append_failure_surfaces_as_audit_write_failure() {
        let recorder = ChangeRecorder::new(Arc::new(FailingLedger));
        let err = recorder
            .record(None, AuditAction::Update, "employee", None, None, None)
            .await
            .unwrap_err();
        assert!(matches!(err, CoreError::AuditWriteFailure(_)));
    }

    #[tokio::test]
    async fn login_entries_target_the_acting_user() {
        let ledger = Arc::new(MemoryAuditLedger::new());
        let recorder = ChangeRecorder::new(ledger.clone());
        let actor = ActorContext::new(Uuid::new_v4(), Role::Employee).with_ip("192.0.2.1");

        recorder.record_login(&actor).await.unwrap();

        let entry = &ledger.all()[0];
        assert_eq!(entry.action, AuditAction::Login);
        assert_eq!(entry.entity_type, "user");
        assert_eq!(entry.entity_id, Some(actor.actor_id));
        assert_eq!(entry.changes, None);
    }
}
