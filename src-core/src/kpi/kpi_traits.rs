use crate::errors::Result;
use crate::kpi::kpi_model::KpiSnapshot;
use async_trait::async_trait;
use chrono::NaiveDate;

#[async_trait]
pub trait KpiSnapshotRepositoryTrait: Send + Sync {
    fn get_snapshot(&self, employee_id: &str, month: NaiveDate) -> Result<Option<KpiSnapshot>>;

    /// One snapshot per employee and month; a second upsert replaces the first.
    async fn upsert_snapshot(&self, snapshot: KpiSnapshot) -> Result<KpiSnapshot>;
}
