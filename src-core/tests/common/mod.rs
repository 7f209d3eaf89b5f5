#![allow(dead_code)]

use chrono::NaiveDate;
use fechamento_core::calendar::WeekdayCalendar;
use fechamento_core::employees::{EmployeeProfile, JobCatalogEntry};
use fechamento_core::kpi::{KpiSnapshot, KpiSnapshotRepositoryTrait};
use fechamento_core::memory::{
    InMemoryAuditLog, InMemoryEmployeeDirectory, InMemoryKpiRepository,
    InMemoryMetricConfigRepository, InMemoryPayoutRepository, InMemoryPlanRepository,
    InMemoryTargetRepository,
};
use fechamento_core::payouts::PayoutService;
use fechamento_core::plans::{
    CompensationPlan, NewCompensationPlan, PlanService, PlanTargets, PlanWeights,
};
use fechamento_core::settings::EngineSettings;
use fechamento_core::targets::TargetService;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use std::sync::Arc;

/// Fully wired engine over in-memory stores.
pub struct Harness {
    pub directory: Arc<InMemoryEmployeeDirectory>,
    pub kpis: Arc<InMemoryKpiRepository>,
    pub configs: Arc<InMemoryMetricConfigRepository>,
    pub plans: Arc<InMemoryPlanRepository>,
    pub payouts: Arc<InMemoryPayoutRepository>,
    pub targets: Arc<InMemoryTargetRepository>,
    pub audit: Arc<InMemoryAuditLog>,
    pub settings: Arc<EngineSettings>,
    pub plan_service: Arc<PlanService>,
    pub payout_service: Arc<PayoutService>,
    pub target_service: TargetService<InMemoryTargetRepository>,
}

pub fn harness() -> Harness {
    let directory = Arc::new(InMemoryEmployeeDirectory::new());
    let kpis = Arc::new(InMemoryKpiRepository::new());
    let configs = Arc::new(InMemoryMetricConfigRepository::new());
    let plans = Arc::new(InMemoryPlanRepository::new());
    let payouts = Arc::new(InMemoryPayoutRepository::new());
    let targets = Arc::new(InMemoryTargetRepository::new());
    let audit = Arc::new(InMemoryAuditLog::new());
    let calendar = Arc::new(WeekdayCalendar::new());
    let settings = Arc::new(EngineSettings::default());

    let plan_service = Arc::new(PlanService::new(
        plans.clone(),
        directory.clone(),
        audit.clone(),
        settings.clone(),
    ));
    let payout_service = Arc::new(PayoutService::new(
        plan_service.clone(),
        kpis.clone(),
        payouts.clone(),
        configs.clone(),
        directory.clone(),
        calendar.clone(),
        audit.clone(),
        settings.clone(),
    ));
    let target_service = TargetService::new(targets.clone(), calendar, settings.clone());

    Harness {
        directory,
        kpis,
        configs,
        plans,
        payouts,
        targets,
        audit,
        settings,
        plan_service,
        payout_service,
        target_service,
    }
}

pub fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap()
}

/// March 2025 has 21 weekdays.
pub fn march_2025() -> NaiveDate {
    date(2025, 3, 1)
}

pub fn sdr(id: &str, level: u8) -> EmployeeProfile {
    EmployeeProfile {
        id: id.to_string(),
        name: format!("SDR {}", id),
        cargo_id: "sdr-inside".to_string(),
        department: Some("Comercial".to_string()),
        squad: None,
        level,
    }
}

pub fn catalog_entry(cargo_id: &str, fixed: Decimal, variable: Decimal) -> JobCatalogEntry {
    JobCatalogEntry {
        cargo_id: cargo_id.to_string(),
        name: cargo_id.to_string(),
        role_family: None,
        fixed_amount: Some(fixed),
        variable_amount: Some(variable),
    }
}

pub fn snapshot(employee_id: &str, month: NaiveDate, organization_score: Decimal) -> KpiSnapshot {
    KpiSnapshot {
        employee_id: employee_id.to_string(),
        month,
        scheduled_meetings: 84,
        held_meetings: 59,
        no_shows: 10,
        call_attempts: 1764,
        contracts: 0,
        organization_score,
    }
}

pub async fn record(h: &Harness, kpi: KpiSnapshot) {
    h.kpis.upsert_snapshot(kpi).await.unwrap();
}

/// Creates, submits and approves a plan.
pub async fn approved_plan(h: &Harness, plan: NewCompensationPlan) -> CompensationPlan {
    let plan = h.plan_service.create_plan(plan, "hr-1").await.unwrap();
    h.plan_service.submit_plan(&plan.id, "hr-1").await.unwrap();
    h.plan_service.approve_plan(&plan.id, "manager-1").await.unwrap()
}

pub fn new_plan(employee_id: &str, from: NaiveDate, to: Option<NaiveDate>) -> NewCompensationPlan {
    NewCompensationPlan {
        employee_id: employee_id.to_string(),
        cargo_id: "sdr-inside".to_string(),
        effective_from: from,
        effective_to: to,
        fixed_amount: dec!(2500),
        variable_amount: dec!(1500),
        ote_total: Some(dec!(4000)),
        bonus_base: dec!(300),
        bonus_stretch: dec!(500),
        business_days_assumed: 22,
        weights: PlanWeights::default(),
        targets: PlanTargets::default(),
    }
}
