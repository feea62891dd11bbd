mod load;
mod mark_deleted;
mod repo_impl;
mod save;

pub use repo_impl::EmployeeRepositoryImpl;
