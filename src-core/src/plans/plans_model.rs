use crate::calendar::month_start;
use chrono::{NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum PlanStatus {
    Draft,
    Pending,
    Approved,
    Rejected,
}

impl PlanStatus {
    /// Draft -> Pending -> Approved | Rejected
    pub fn can_transition_to(self, next: PlanStatus) -> bool {
        matches!(
            (self, next),
            (PlanStatus::Draft, PlanStatus::Pending)
                | (PlanStatus::Pending, PlanStatus::Approved)
                | (PlanStatus::Pending, PlanStatus::Rejected)
        )
    }
}

impl fmt::Display for PlanStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            PlanStatus::Draft => "DRAFT",
            PlanStatus::Pending => "PENDING",
            PlanStatus::Approved => "APPROVED",
            PlanStatus::Rejected => "REJECTED",
        };
        f.write_str(s)
    }
}

/// Declared metric split of a plan, in percent.
///
/// Informational: it is validated and reviewed with the plan, but payouts
/// weigh metrics with the resolved metric configuration of the cargo.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanWeights {
    pub agendamentos: Decimal,
    pub realizadas: Decimal,
    pub tentativas: Decimal,
    pub organizacao: Decimal,
}

impl PlanWeights {
    pub fn total(&self) -> Decimal {
        self.agendamentos + self.realizadas + self.tentativas + self.organizacao
    }
}

impl Default for PlanWeights {
    fn default() -> Self {
        PlanWeights {
            agendamentos: dec!(35),
            realizadas: dec!(35),
            tentativas: dec!(15),
            organizacao: dec!(15),
        }
    }
}

/// Per-plan target figures. Missing values fall back to engine settings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanTargets {
    /// Meetings to book per business day
    pub daily_booking_quota: Option<Decimal>,
    /// Monthly held-meetings target, also the contracts target
    pub held_meetings_target: Option<Decimal>,
    pub daily_attempt_quota: Option<Decimal>,
    pub organization_target: Option<Decimal>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompensationPlan {
    pub id: String,
    pub employee_id: String,
    pub cargo_id: String,
    pub effective_from: NaiveDate,
    /// `None` keeps the plan open-ended
    pub effective_to: Option<NaiveDate>,
    pub fixed_amount: Decimal,
    pub variable_amount: Decimal,
    pub ote_total: Decimal,
    pub bonus_base: Decimal,
    pub bonus_stretch: Decimal,
    pub business_days_assumed: u32,
    pub weights: PlanWeights,
    pub targets: PlanTargets,
    pub status: PlanStatus,
    pub approved_by: Option<String>,
    pub approved_at: Option<NaiveDateTime>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl CompensationPlan {
    /// Whether the plan window contains the first day of `month`.
    pub fn covers(&self, month: NaiveDate) -> bool {
        let start = month_start(month);
        self.effective_from <= start && self.effective_to.map_or(true, |to| start <= to)
    }

    /// Rejected plans never count towards any month.
    pub fn is_in_force(&self) -> bool {
        self.status != PlanStatus::Rejected
    }

    pub fn overlaps(&self, from: NaiveDate, to: Option<NaiveDate>) -> bool {
        let self_end = self.effective_to.unwrap_or(NaiveDate::MAX);
        let other_end = to.unwrap_or(NaiveDate::MAX);
        self.effective_from <= other_end && from <= self_end
    }
}

/// Input for creating a plan through the approval workflow.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewCompensationPlan {
    pub employee_id: String,
    pub cargo_id: String,
    pub effective_from: NaiveDate,
    pub effective_to: Option<NaiveDate>,
    pub fixed_amount: Decimal,
    pub variable_amount: Decimal,
    /// When given it must equal fixed + variable
    pub ote_total: Option<Decimal>,
    pub bonus_base: Decimal,
    pub bonus_stretch: Decimal,
    pub business_days_assumed: u32,
    #[serde(default)]
    pub weights: PlanWeights,
    #[serde(default)]
    pub targets: PlanTargets,
}
