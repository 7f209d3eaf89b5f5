use crate::calendar::{month_start, BusinessCalendar};
use crate::errors::Result;
use crate::settings::EngineSettings;
use crate::targets::cascade::{sanitize_root, TargetCascade};
use crate::targets::targets_model::{AnnualRollup, FunnelStage, TargetMatrix, TargetPeriod};
use crate::targets::targets_traits::TargetRepositoryTrait;
use chrono::NaiveDate;
use std::sync::Arc;

/// Builds, edits and persists funnel target matrices.
///
/// Matrices are plain values owned by the caller between edits; only
/// [`TargetService::save`] touches the repository.
pub struct TargetService<T: TargetRepositoryTrait> {
    target_repo: Arc<T>,
    calendar: Arc<dyn BusinessCalendar>,
    settings: Arc<EngineSettings>,
    cascade: TargetCascade,
}

impl<T: TargetRepositoryTrait> TargetService<T> {
    pub fn new(
        target_repo: Arc<T>,
        calendar: Arc<dyn BusinessCalendar>,
        settings: Arc<EngineSettings>,
    ) -> Self {
        let cascade = TargetCascade::new(settings.funnel.clone());
        TargetService {
            target_repo,
            calendar,
            settings,
            cascade,
        }
    }

    /// Full matrix for `month` derived from a daily booking root value.
    pub fn cascade_targets(&self, root_day_value: f64, month: NaiveDate, squad: Option<String>) -> TargetMatrix {
        let month = month_start(month);
        let week_days = self
            .calendar
            .business_days_in_week(month, self.settings.week_convention);
        let month_days = self.calendar.business_days_in_month(month);

        self.cascade
            .build(sanitize_root(root_day_value), month, squad, week_days, month_days)
    }

    /// Re-applies the cascade from `root_value`, discarding manual overrides.
    pub fn recalculate_all(&self, matrix: &mut TargetMatrix, root_value: f64) {
        self.cascade.recalculate_all(matrix, sanitize_root(root_value));
    }

    pub fn edit_day(&self, matrix: &mut TargetMatrix, stage: FunnelStage, value: f64) {
        self.cascade.set_stage_day(matrix, stage, sanitize_root(value));
    }

    pub fn override_period(
        &self,
        matrix: &mut TargetMatrix,
        stage: FunnelStage,
        period: TargetPeriod,
        value: i64,
    ) -> Result<()> {
        matrix.override_period(stage, period, value)
    }

    pub fn load(&self, month: NaiveDate, squad: Option<&str>) -> Result<Option<TargetMatrix>> {
        self.target_repo.load_matrix(month_start(month), squad)
    }

    pub async fn save(&self, matrix: TargetMatrix) -> Result<TargetMatrix> {
        log::info!(
            "Saving targets for {} ({:?}), root {}",
            matrix.month,
            matrix.squad,
            matrix.root_day()
        );
        self.target_repo.save_matrix(matrix).await
    }

    pub fn annual_rollup(&self, year: i32, squad: Option<&str>) -> Result<AnnualRollup> {
        let matrices = self.target_repo.list_for_year(year, squad)?;
        Ok(AnnualRollup::from_matrices(
            year,
            squad.map(str::to_string),
            &matrices,
        ))
    }
}
