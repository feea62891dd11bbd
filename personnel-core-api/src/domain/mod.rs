pub mod actor;
pub mod change;
pub mod patch;
pub mod role;

// Re-exports
pub use actor::*;
pub use change::*;
pub use patch::*;
pub use role::*;
