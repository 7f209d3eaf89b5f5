pub mod employees_model;
pub mod employees_traits;

pub use employees_model::{EmployeeProfile, JobCatalogEntry};
pub use employees_traits::EmployeeDirectoryTrait;
