use crate::errors::Result;
use crate::metrics::metrics_model::MetricConfiguration;
use async_trait::async_trait;
use chrono::NaiveDate;

/// Storage of per-cargo metric weight tables.
#[async_trait]
pub trait MetricConfigRepositoryTrait: Send + Sync {
    /// Active configurations whose scope matches exactly: `squad: None` lists
    /// only the generic rows, never the squad-specific ones.
    fn list_active(
        &self,
        cargo_id: &str,
        month: NaiveDate,
        squad: Option<&str>,
    ) -> Result<Vec<MetricConfiguration>>;

    async fn upsert_config(&self, config: MetricConfiguration) -> Result<MetricConfiguration>;
}
