use chrono::Utc;
use std::sync::Arc;
use uuid::Uuid;

use personnel_core_api::{
    ActorContext, ChangeMap, ChangeSet, CoreError, CoreResult, FieldValue, Patch,
};
use personnel_core_db::models::audit::{AuditAction, AuditEntryModel};
use personnel_core_db::models::employee::{EmployeeModel, EmployeeUpdate, EmployeeView, NewEmployee};
use personnel_core_db::repository::{
    AuditQuery, EmployeeStore, Page, PageRequest, StoreError,
};

use crate::cipher::FieldCipher;
use crate::recorder::ChangeRecorder;
use crate::redaction::{self, SENSITIVE_PLACEHOLDER};

/// Entity tag used on the ledger for employee records.
pub const EMPLOYEE_ENTITY: &str = "employee";

/// Service-level entry points for audited mutations of employee records.
///
/// Each operation is one logical unit of work: load prior state, apply the
/// requested change, encrypt sensitive fields, persist, then hand the diff to
/// the change recorder. The domain write and the ledger append are two
/// separate operations in that order; a gap after a committed write is
/// logged, never rolled back.
pub struct EmployeeService {
    store: Arc<dyn EmployeeStore>,
    recorder: ChangeRecorder,
    cipher: Arc<FieldCipher>,
}

fn store_err(err: StoreError) -> CoreError {
    CoreError::DatabaseError(err.to_string())
}

/// Apply a patch to a required field, capturing old/new diff values.
/// Explicit null on a required field is a validation error.
fn patch_required<T>(
    name: &str,
    patch: Patch<T>,
    slot: &mut T,
    old: &mut ChangeMap,
    new: &mut ChangeMap,
) -> CoreResult<()>
where
    T: Clone + Into<FieldValue>,
{
    match patch {
        Patch::Keep => Ok(()),
        Patch::Clear => Err(CoreError::ValidationError(format!(
            "field '{name}' cannot be null"
        ))),
        Patch::Set(value) => {
            old.insert(name.to_string(), slot.clone().into());
            new.insert(name.to_string(), value.clone().into());
            *slot = value;
            Ok(())
        }
    }
}

/// Apply a patch to a nullable field, capturing old/new diff values.
fn patch_optional<T>(
    name: &str,
    patch: Patch<T>,
    slot: &mut Option<T>,
    old: &mut ChangeMap,
    new: &mut ChangeMap,
) where
    T: Clone + Into<FieldValue>,
{
    match patch {
        Patch::Keep => {}
        Patch::Clear => {
            old.insert(name.to_string(), slot.take().into());
            new.insert(name.to_string(), FieldValue::Null);
        }
        Patch::Set(value) => {
            old.insert(name.to_string(), slot.clone().into());
            new.insert(name.to_string(), value.clone().into());
            *slot = Some(value);
        }
    }
}

impl EmployeeService {
    pub fn new(
        store: Arc<dyn EmployeeStore>,
        recorder: ChangeRecorder,
        cipher: Arc<FieldCipher>,
    ) -> Self {
        Self {
            store,
            recorder,
            cipher,
        }
    }

    /// Create a record with its salary encrypted at rest, then append a
    /// `create` entry whose `new` side carries the non-sensitive payload.
    pub async fn create_with_audit(
        &self,
        input: NewEmployee,
        actor: &ActorContext,
    ) -> CoreResult<EmployeeView> {
        let now = Utc::now();
        let salary_plain = input.salary;
        let salary_encrypted = match &salary_plain {
            Some(amount) => Some(self.cipher.encrypt(&amount.to_string())?),
            None => None,
        };

        let model = EmployeeModel {
            id: Uuid::new_v4(),
            user_id: input.user_id,
            employee_number: input.employee_number,
            first_name: input.first_name,
            last_name: input.last_name,
            email: input.email,
            phone: input.phone,
            date_of_birth: input.date_of_birth,
            address: input.address,
            emergency_contact: input.emergency_contact,
            department_id: input.department_id,
            position: input.position,
            hire_date: input.hire_date,
            status: input.status,
            manager_id: input.manager_id,
            salary_encrypted,
            created_at: now,
            updated_at: now,
            deleted_at: None,
        };

        let saved = self.store.save(model).await.map_err(store_err)?;

        let mut new = ChangeMap::new();
        new.insert("employee_number".into(), saved.employee_number.clone().into());
        new.insert("user_id".into(), saved.user_id.into());
        new.insert("first_name".into(), saved.first_name.clone().into());
        new.insert("last_name".into(), saved.last_name.clone().into());
        new.insert("email".into(), saved.email.clone().into());
        new.insert("phone".into(), saved.phone.clone().into());
        new.insert("date_of_birth".into(), saved.date_of_birth.into());
        new.insert("address".into(), saved.address.clone().into());
        new.insert(
            "emergency_contact".into(),
            saved.emergency_contact.clone().into(),
        );
        new.insert("department_id".into(), saved.department_id.into());
        new.insert("position".into(), saved.position.clone().into());
        new.insert("hire_date".into(), saved.hire_date.into());
        new.insert("status".into(), saved.status.into());
        new.insert("manager_id".into(), saved.manager_id.into());
        if salary_plain.is_some() {
            new.insert("salary".into(), SENSITIVE_PLACEHOLDER.into());
        }

        self.record_or_warn(
            actor,
            AuditAction::Create,
            saved.id,
            Some(ChangeSet::created(new)),
        )
        .await;

        Ok(EmployeeView::from_model(
            &saved,
            salary_plain.map(|d| d.to_string()),
        ))
    }

    /// Partial update: absent fields stay untouched, explicit null clears
    /// nullable fields, sensitive values are re-encrypted. Returns `Ok(None)`
    /// when no active record exists; the collaborator decides the surfaced
    /// error.
    pub async fn update_with_audit(
        &self,
        id: Uuid,
        update: EmployeeUpdate,
        actor: &ActorContext,
    ) -> CoreResult<Option<EmployeeView>> {
        let Some(mut model) = self.store.load(id).await.map_err(store_err)? else {
            return Ok(None);
        };

        let mut old = ChangeMap::new();
        let mut new = ChangeMap::new();

        patch_required("first_name", update.first_name, &mut model.first_name, &mut old, &mut new)?;
        patch_required("last_name", update.last_name, &mut model.last_name, &mut old, &mut new)?;
        patch_required("email", update.email, &mut model.email, &mut old, &mut new)?;
        patch_required("hire_date", update.hire_date, &mut model.hire_date, &mut old, &mut new)?;
        patch_required("status", update.status, &mut model.status, &mut old, &mut new)?;
        patch_optional("phone", update.phone, &mut model.phone, &mut old, &mut new);
        patch_optional("date_of_birth", update.date_of_birth, &mut model.date_of_birth, &mut old, &mut new);
        patch_optional("address", update.address, &mut model.address, &mut old, &mut new);
        patch_optional("emergency_contact", update.emergency_contact, &mut model.emergency_contact, &mut old, &mut new);
        patch_optional("department_id", update.department_id, &mut model.department_id, &mut old, &mut new);
        patch_optional("position", update.position, &mut model.position, &mut old, &mut new);
        patch_optional("manager_id", update.manager_id, &mut model.manager_id, &mut old, &mut new);

        // Sensitive field: the diff records that it changed, never the value.
        match update.salary {
            Patch::Keep => {}
            Patch::Clear => {
                old.insert("salary".into(), self.salary_marker(&model));
                new.insert("salary".into(), FieldValue::Null);
                model.salary_encrypted = None;
            }
            Patch::Set(amount) => {
                old.insert("salary".into(), self.salary_marker(&model));
                model.salary_encrypted = Some(self.cipher.encrypt(&amount.to_string())?);
                new.insert("salary".into(), SENSITIVE_PLACEHOLDER.into());
            }
        }

        if old.is_empty() && new.is_empty() {
            // Nothing requested; no write, no audit entry.
            return Ok(Some(self.project(&model)));
        }

        model.updated_at = Utc::now();
        let saved = self.store.save(model).await.map_err(store_err)?;

        self.record_or_warn(
            actor,
            AuditAction::Update,
            saved.id,
            Some(ChangeSet::updated(old, new)),
        )
        .await;

        Ok(Some(self.project(&saved)))
    }

    /// One-way `active -> archived` transition. The row is never removed, so
    /// the audit trail keeps its referent. Returns whether an active record
    /// existed; repeat calls are no-ops with no ledger entry.
    pub async fn soft_delete_with_audit(
        &self,
        id: Uuid,
        actor: &ActorContext,
    ) -> CoreResult<bool> {
        let deleted = self
            .store
            .mark_deleted(id, Utc::now())
            .await
            .map_err(store_err)?;

        if deleted {
            self.record_or_warn(actor, AuditAction::Delete, id, None).await;
        }
        Ok(deleted)
    }

    /// Read path: decrypt the sensitive field transiently and apply the
    /// redaction policy for the viewer.
    pub async fn get_for_viewer(
        &self,
        id: Uuid,
        viewer: &ActorContext,
    ) -> CoreResult<Option<EmployeeView>> {
        let Some(model) = self.store.load(id).await.map_err(store_err)? else {
            return Ok(None);
        };
        let is_self = model.user_id == Some(viewer.actor_id);
        let view = self.project(&model);
        Ok(Some(redaction::redact_view(view, viewer.role, is_self)))
    }

    /// Audit trail for one record, most recent first.
    pub async fn audit_history(
        &self,
        id: Uuid,
        page: PageRequest,
    ) -> CoreResult<Page<AuditEntryModel>> {
        self.recorder
            .query(&AuditQuery::for_entity(EMPLOYEE_ENTITY, id), page)
            .await
    }

    fn project(&self, model: &EmployeeModel) -> EmployeeView {
        let salary = model
            .salary_encrypted
            .as_deref()
            .map(|token| self.cipher.decrypt(token));
        EmployeeView::from_model(model, salary)
    }

    fn salary_marker(&self, model: &EmployeeModel) -> FieldValue {
        if model.salary_encrypted.is_some() {
            SENSITIVE_PLACEHOLDER.into()
        } else {
            FieldValue::Null
        }
    }

    async fn record_or_warn(
        &self,
        actor: &ActorContext,
        action: AuditAction,
        entity_id: Uuid,
        changes: Option<ChangeSet>,
    ) {
        let result = self
            .recorder
            .record(
                Some(actor.actor_id),
                action,
                EMPLOYEE_ENTITY,
                Some(entity_id),
                changes,
                actor.ip_address.clone(),
            )
            .await;
        if let Err(err) = result {
            // The domain write already committed; keep it and log the gap.
            tracing::warn!(%entity_id, error = %err, "continuing with audit gap");
        }
    }
}
