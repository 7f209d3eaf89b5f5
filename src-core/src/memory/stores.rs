use crate::calendar::month_start;
use crate::errors::Result;
use crate::kpi::{KpiSnapshot, KpiSnapshotRepositoryTrait};
use crate::metrics::{MetricConfigRepositoryTrait, MetricConfiguration};
use crate::payouts::{Payout, PayoutFilter, PayoutRepositoryTrait};
use crate::plans::{CompensationPlan, CompensationPlanRepositoryTrait, PlanStatus};
use crate::targets::{TargetMatrix, TargetRepositoryTrait};
use async_trait::async_trait;
use chrono::{Datelike, NaiveDate};
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;

#[derive(Debug, Default)]
pub struct InMemoryPlanRepository {
    plans: DashMap<String, CompensationPlan>,
}

impl InMemoryPlanRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CompensationPlanRepositoryTrait for InMemoryPlanRepository {
    fn get_plan(&self, plan_id: &str) -> Result<Option<CompensationPlan>> {
        Ok(self.plans.get(plan_id).map(|p| p.value().clone()))
    }

    fn get_covering_plan(
        &self,
        employee_id: &str,
        month_start: NaiveDate,
    ) -> Result<Option<CompensationPlan>> {
        Ok(self
            .plans
            .iter()
            .filter(|p| {
                p.employee_id == employee_id
                    && p.status == PlanStatus::Approved
                    && p.covers(month_start)
            })
            .max_by_key(|p| p.effective_from)
            .map(|p| p.value().clone()))
    }

    fn list_for_employee(&self, employee_id: &str) -> Result<Vec<CompensationPlan>> {
        let mut plans: Vec<CompensationPlan> = self
            .plans
            .iter()
            .filter(|p| p.employee_id == employee_id)
            .map(|p| p.value().clone())
            .collect();
        plans.sort_by_key(|p| p.effective_from);
        Ok(plans)
    }

    async fn upsert_plan(&self, plan: CompensationPlan) -> Result<CompensationPlan> {
        self.plans.insert(plan.id.clone(), plan.clone());
        Ok(plan)
    }

    async fn update_if_status(
        &self,
        plan: CompensationPlan,
        expected: PlanStatus,
    ) -> Result<Option<CompensationPlan>> {
        match self.plans.get_mut(&plan.id) {
            Some(mut stored) if stored.status == expected => {
                *stored = plan.clone();
                Ok(Some(plan))
            }
            _ => Ok(None),
        }
    }
}

#[derive(Debug, Default)]
pub struct InMemoryKpiRepository {
    snapshots: DashMap<(String, NaiveDate), KpiSnapshot>,
}

impl InMemoryKpiRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl KpiSnapshotRepositoryTrait for InMemoryKpiRepository {
    fn get_snapshot(&self, employee_id: &str, month: NaiveDate) -> Result<Option<KpiSnapshot>> {
        Ok(self
            .snapshots
            .get(&(employee_id.to_string(), month_start(month)))
            .map(|s| s.value().clone()))
    }

    async fn upsert_snapshot(&self, mut snapshot: KpiSnapshot) -> Result<KpiSnapshot> {
        snapshot.month = month_start(snapshot.month);
        self.snapshots.insert(
            (snapshot.employee_id.clone(), snapshot.month),
            snapshot.clone(),
        );
        Ok(snapshot)
    }
}

#[derive(Debug, Default)]
pub struct InMemoryMetricConfigRepository {
    configs: DashMap<String, MetricConfiguration>,
}

impl InMemoryMetricConfigRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl MetricConfigRepositoryTrait for InMemoryMetricConfigRepository {
    fn list_active(
        &self,
        cargo_id: &str,
        month: NaiveDate,
        squad: Option<&str>,
    ) -> Result<Vec<MetricConfiguration>> {
        let month = month_start(month);
        let mut configs: Vec<MetricConfiguration> = self
            .configs
            .iter()
            .filter(|c| {
                c.active
                    && c.scope.cargo_id == cargo_id
                    && month_start(c.scope.month) == month
                    && c.scope.squad.as_deref() == squad
            })
            .map(|c| c.value().clone())
            .collect();
        configs.sort_by(|a, b| a.id.cmp(&b.id));
        Ok(configs)
    }

    async fn upsert_config(&self, config: MetricConfiguration) -> Result<MetricConfiguration> {
        self.configs.insert(config.id.clone(), config.clone());
        Ok(config)
    }
}

#[derive(Debug, Default)]
pub struct InMemoryPayoutRepository {
    payouts: DashMap<(String, NaiveDate), Payout>,
}

impl InMemoryPayoutRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl PayoutRepositoryTrait for InMemoryPayoutRepository {
    fn get_payout(&self, payout_id: &str) -> Result<Option<Payout>> {
        Ok(self
            .payouts
            .iter()
            .find(|p| p.id == payout_id)
            .map(|p| p.value().clone()))
    }

    fn get_for_employee_month(&self, employee_id: &str, month: NaiveDate) -> Result<Option<Payout>> {
        Ok(self
            .payouts
            .get(&(employee_id.to_string(), month_start(month)))
            .map(|p| p.value().clone()))
    }

    fn list(&self, filter: &PayoutFilter) -> Result<Vec<Payout>> {
        let mut payouts: Vec<Payout> = self
            .payouts
            .iter()
            .filter(|p| filter.matches(p.value()))
            .map(|p| p.value().clone())
            .collect();
        payouts.sort_by(|a, b| {
            a.month
                .cmp(&b.month)
                .then_with(|| a.employee_id.cmp(&b.employee_id))
        });
        Ok(payouts)
    }

    async fn upsert_if_version(
        &self,
        payout: Payout,
        expected_version: Option<i64>,
    ) -> Result<Option<Payout>> {
        let key = (payout.employee_id.clone(), month_start(payout.month));
        match (self.payouts.entry(key), expected_version) {
            (Entry::Occupied(mut stored), Some(version)) if stored.get().version == version => {
                stored.insert(payout.clone());
                Ok(Some(payout))
            }
            (Entry::Vacant(slot), None) => {
                slot.insert(payout.clone());
                Ok(Some(payout))
            }
            _ => Ok(None),
        }
    }
}

#[derive(Debug, Default)]
pub struct InMemoryTargetRepository {
    matrices: DashMap<(NaiveDate, Option<String>), TargetMatrix>,
}

impl InMemoryTargetRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl TargetRepositoryTrait for InMemoryTargetRepository {
    fn load_matrix(&self, month: NaiveDate, squad: Option<&str>) -> Result<Option<TargetMatrix>> {
        Ok(self
            .matrices
            .get(&(month_start(month), squad.map(str::to_string)))
            .map(|m| m.value().clone()))
    }

    fn list_for_year(&self, year: i32, squad: Option<&str>) -> Result<Vec<TargetMatrix>> {
        let mut matrices: Vec<TargetMatrix> = self
            .matrices
            .iter()
            .filter(|m| m.month.year() == year && m.squad.as_deref() == squad)
            .map(|m| m.value().clone())
            .collect();
        matrices.sort_by_key(|m| m.month);
        Ok(matrices)
    }

    async fn save_matrix(&self, mut matrix: TargetMatrix) -> Result<TargetMatrix> {
        matrix.month = month_start(matrix.month);
        self.matrices
            .insert((matrix.month, matrix.squad.clone()), matrix.clone());
        Ok(matrix)
    }
}
