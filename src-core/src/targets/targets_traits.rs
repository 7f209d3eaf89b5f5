use crate::errors::Result;
use crate::targets::targets_model::TargetMatrix;
use async_trait::async_trait;
use chrono::NaiveDate;

#[async_trait]
pub trait TargetRepositoryTrait: Send + Sync {
    fn load_matrix(&self, month: NaiveDate, squad: Option<&str>) -> Result<Option<TargetMatrix>>;

    fn list_for_year(&self, year: i32, squad: Option<&str>) -> Result<Vec<TargetMatrix>>;

    /// Replaces whatever was stored for the matrix month and squad.
    async fn save_matrix(&self, matrix: TargetMatrix) -> Result<TargetMatrix>;
}
