use crate::errors::Result;
use crate::payouts::payouts_model::{Payout, PayoutFilter};
use async_trait::async_trait;
use chrono::NaiveDate;

/// Payout storage keyed by (employee, month).
#[async_trait]
pub trait PayoutRepositoryTrait: Send + Sync {
    fn get_payout(&self, payout_id: &str) -> Result<Option<Payout>>;

    fn get_for_employee_month(&self, employee_id: &str, month: NaiveDate) -> Result<Option<Payout>>;

    fn list(&self, filter: &PayoutFilter) -> Result<Vec<Payout>>;

    /// Conditional upsert on the (employee, month) key.
    ///
    /// `expected_version: None` requires that no row exists yet, `Some(v)`
    /// requires the stored row to still be at version `v`. Returns `None`
    /// when the precondition failed and nothing was written.
    async fn upsert_if_version(
        &self,
        payout: Payout,
        expected_version: Option<i64>,
    ) -> Result<Option<Payout>>;
}
