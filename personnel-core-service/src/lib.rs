pub mod cipher;
pub mod employee;
pub mod recorder;
pub mod redaction;

pub use cipher::{FieldCipher, DECRYPT_ERROR_SENTINEL};
pub use employee::EmployeeService;
pub use recorder::ChangeRecorder;
pub use redaction::{redact_view, sensitive_visible, SENSITIVE_FIELDS, SENSITIVE_PLACEHOLDER};
