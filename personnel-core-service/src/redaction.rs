use personnel_core_api::Role;
use personnel_core_db::models::employee::EmployeeView;

/// Fields whose values are visible only to privileged viewers or the record's
/// own subject. Any field named here but unknown to a view stays hidden.
pub const SENSITIVE_FIELDS: &[&str] = &["salary"];

/// Marker written into audit diffs in place of sensitive plaintext. The
/// ledger records that the field changed, never what it changed to.
pub const SENSITIVE_PLACEHOLDER: &str = "[redacted]";

pub fn is_sensitive(field: &str) -> bool {
    SENSITIVE_FIELDS.contains(&field)
}

/// The two-input access decision: role alone is not enough, because an
/// unprivileged employee must always see their own sensitive fields.
pub fn sensitive_visible(role: Role, is_self: bool) -> bool {
    match role {
        Role::Admin | Role::Manager => true,
        Role::Employee => is_self,
    }
}

/// Total per-field visibility table. Non-sensitive fields are always
/// visible; sensitive ones follow the role/self decision; anything listed as
/// sensitive without an explicit allow stays hidden (fail closed).
pub fn field_visible(field: &str, role: Role, is_self: bool) -> bool {
    if !is_sensitive(field) {
        return true;
    }
    sensitive_visible(role, is_self)
}

/// Replace hidden sensitive fields with an absence marker. The field keys
/// survive serialization so consumers keep a stable shape.
pub fn redact_view(mut view: EmployeeView, role: Role, is_self: bool) -> EmployeeView {
    if !field_visible("salary", role, is_self) {
        view.salary = None;
    }
    view
}
