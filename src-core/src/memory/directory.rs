use crate::employees::{EmployeeDirectoryTrait, EmployeeProfile, JobCatalogEntry};
use crate::errors::Result;
use dashmap::DashMap;

#[derive(Debug, Default)]
pub struct InMemoryEmployeeDirectory {
    employees: DashMap<String, EmployeeProfile>,
    cargos: DashMap<String, JobCatalogEntry>,
}

impl InMemoryEmployeeDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_employee(&self, employee: EmployeeProfile) {
        self.employees.insert(employee.id.clone(), employee);
    }

    pub fn add_cargo(&self, cargo: JobCatalogEntry) {
        self.cargos.insert(cargo.cargo_id.clone(), cargo);
    }
}

impl EmployeeDirectoryTrait for InMemoryEmployeeDirectory {
    fn resolve(&self, employee_id: &str) -> Result<Option<EmployeeProfile>> {
        Ok(self.employees.get(employee_id).map(|e| e.value().clone()))
    }

    fn get_cargo(&self, cargo_id: &str) -> Result<Option<JobCatalogEntry>> {
        Ok(self.cargos.get(cargo_id).map(|c| c.value().clone()))
    }
}
