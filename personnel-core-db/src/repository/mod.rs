pub mod ledger;
pub mod memory;
pub mod pagination;
pub mod record_store;

// Re-exports
pub use ledger::*;
pub use memory::*;
pub use pagination::*;
pub use record_store::*;

/// Error type shared by all store traits. The service layer maps this into
/// its own taxonomy; implementations just bubble their driver errors up.
pub type StoreError = Box<dyn std::error::Error + Send + Sync>;
