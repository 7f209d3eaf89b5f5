use crate::employees::employees_model::{EmployeeProfile, JobCatalogEntry};
use crate::errors::Result;

/// Read-only access to the employee directory and the job catalog.
pub trait EmployeeDirectoryTrait: Send + Sync {
    fn resolve(&self, employee_id: &str) -> Result<Option<EmployeeProfile>>;
    fn get_cargo(&self, cargo_id: &str) -> Result<Option<JobCatalogEntry>>;
}
