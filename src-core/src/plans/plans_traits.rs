use crate::errors::Result;
use crate::plans::plans_model::{CompensationPlan, PlanStatus};
use async_trait::async_trait;
use chrono::NaiveDate;

#[async_trait]
pub trait CompensationPlanRepositoryTrait: Send + Sync {
    fn get_plan(&self, plan_id: &str) -> Result<Option<CompensationPlan>>;

    /// The APPROVED plan whose window contains `month_start`, if any.
    fn get_covering_plan(
        &self,
        employee_id: &str,
        month_start: NaiveDate,
    ) -> Result<Option<CompensationPlan>>;

    fn list_for_employee(&self, employee_id: &str) -> Result<Vec<CompensationPlan>>;

    async fn upsert_plan(&self, plan: CompensationPlan) -> Result<CompensationPlan>;

    /// Writes `plan` only while the stored row still has `expected` status.
    /// Returns `None` when the precondition failed.
    async fn update_if_status(
        &self,
        plan: CompensationPlan,
        expected: PlanStatus,
    ) -> Result<Option<CompensationPlan>>;
}
