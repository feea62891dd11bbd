mod append;
mod query;
mod repo_impl;

pub use repo_impl::AuditLedgerRepositoryImpl;
