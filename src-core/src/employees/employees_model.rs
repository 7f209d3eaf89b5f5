use crate::metrics::RoleFamily;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Directory view of an employee at compute time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmployeeProfile {
    pub id: String,
    pub name: String,
    pub cargo_id: String,
    pub department: Option<String>,
    pub squad: Option<String>,
    /// Seniority level, 1 to 5
    pub level: u8,
}

/// Job catalog ("cargo") record with its reference compensation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobCatalogEntry {
    pub cargo_id: String,
    pub name: String,
    pub role_family: Option<RoleFamily>,
    pub fixed_amount: Option<Decimal>,
    pub variable_amount: Option<Decimal>,
}

impl JobCatalogEntry {
    pub fn role_family(&self) -> RoleFamily {
        self.role_family
            .unwrap_or_else(|| RoleFamily::from_cargo_name(&self.name))
    }

    /// Fixed/variable split when the catalog carries both figures.
    pub fn compensation_split(&self) -> Option<(Decimal, Decimal)> {
        match (self.fixed_amount, self.variable_amount) {
            (Some(fixed), Some(variable)) => Some((fixed, variable)),
            _ => None,
        }
    }
}
