use uuid::Uuid;

pub mod audit;
pub mod employee;

// Re-exports
pub use audit::*;
pub use employee::*;

/// Trait for entities that can be uniquely identified by a UUID
pub trait Identifiable {
    /// Returns the unique identifier of the entity
    fn get_id(&self) -> Uuid;
}
