pub mod audit;
pub mod employee;
