pub mod postgres_repositories;
pub mod repository;

pub use postgres_repositories::PostgresRepositories;
pub use repository::audit::AuditLedgerRepositoryImpl;
pub use repository::employee::EmployeeRepositoryImpl;

#[cfg(test)]
pub mod test_helper;
