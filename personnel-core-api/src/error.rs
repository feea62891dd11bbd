use thiserror::Error;

/// Error taxonomy for the audited-mutation subsystem.
///
/// `NotFound` is the only variant meant to surface to external callers as-is;
/// everything else is internal and should be classified, not leaked raw.
#[derive(Error, Debug)]
pub enum CoreError {
    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Not found: {0}")]
    NotFound(String),

    /// Key material was missing or invalid at construction time. Fatal at
    /// process initialization unless the permissive cipher mode was chosen
    /// explicitly.
    #[error("Encryption unavailable: {0}")]
    EncryptionUnavailable(String),

    /// The ledger append failed after the domain write already committed.
    /// Never rolls back the committed mutation; callers log and continue.
    #[error("Audit write failed: {0}")]
    AuditWriteFailure(String),

    #[error("Internal error: {0}")]
    InternalError(String),

    #[error("Database error: {0}")]
    DatabaseError(String),
}

pub type CoreResult<T> = Result<T, CoreError>;
