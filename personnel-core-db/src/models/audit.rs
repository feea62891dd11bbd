use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::str::FromStr;
use uuid::Uuid;

use crate::models::Identifiable;

/// Database model for the audit action enum
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "audit_action", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum AuditAction {
    Create,
    Update,
    Delete,
    Login,
    Upload,
    Download,
}

impl std::fmt::Display for AuditAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AuditAction::Create => write!(f, "create"),
            AuditAction::Update => write!(f, "update"),
            AuditAction::Delete => write!(f, "delete"),
            AuditAction::Login => write!(f, "login"),
            AuditAction::Upload => write!(f, "upload"),
            AuditAction::Download => write!(f, "download"),
        }
    }
}

impl FromStr for AuditAction {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "create" => Ok(AuditAction::Create),
            "update" => Ok(AuditAction::Update),
            "delete" => Ok(AuditAction::Delete),
            "login" => Ok(AuditAction::Login),
            "upload" => Ok(AuditAction::Upload),
            "download" => Ok(AuditAction::Download),
            _ => Err(()),
        }
    }
}

/// # Documentation
/// - One immutable fact on the audit ledger, created exactly once per
///   mutation event and never modified or deleted by the application.
/// - `changes` carries the normalized `{old, new}` diff as JSON; identifier
///   values inside it are stored in canonical string form.
/// - `actor_id` is nullable so entries outlive deletion of the acting user.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct AuditEntryModel {
    pub id: Uuid,
    pub actor_id: Option<Uuid>,
    pub action: AuditAction,
    /// Free-form tag naming the affected aggregate, e.g. "employee"
    pub entity_type: String,
    pub entity_id: Option<Uuid>,
    pub changes: Option<serde_json::Value>,
    pub ip_address: Option<String>,
    /// Set once at append time, never mutated
    pub created_at: DateTime<Utc>,
}

impl Identifiable for AuditEntryModel {
    fn get_id(&self) -> Uuid {
        self.id
    }
}
