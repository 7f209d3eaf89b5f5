//! Per-metric target derivation and percent achieved.
//!
//! Every metric has its own target rule; there is no single formula. The
//! evaluator is total: unknown metrics and metrics without a data source
//! evaluate to zero instead of failing.

use crate::kpi::KpiSnapshot;
use crate::metrics::MetricKind;
use crate::plans::CompensationPlan;
use crate::settings::{EvaluationRules, NoShowPolicy};
use rust_decimal::{Decimal, RoundingStrategy};
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Evaluation {
    pub meta: Decimal,
    pub realizado: Decimal,
    pub pct: Decimal,
}

impl Evaluation {
    pub fn zero() -> Self {
        Evaluation {
            meta: Decimal::ZERO,
            realizado: Decimal::ZERO,
            pct: Decimal::ZERO,
        }
    }

    /// Whether the metric should count towards the global average.
    pub fn has_signal(&self) -> bool {
        !self.realizado.is_zero() || !self.pct.is_zero()
    }
}

pub(crate) fn round2(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

fn round_count(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
}

/// `realizado / meta * 100`, zero when there is no target.
pub fn percent_achieved(realizado: Decimal, meta: Decimal) -> Decimal {
    if meta <= Decimal::ZERO {
        return Decimal::ZERO;
    }
    round2(realizado / meta * dec!(100))
}

/// Inverse scoring for no-shows.
///
/// The no-show rate is measured against booked meetings. A rate equal to the
/// policy's acceptable rate scores 100%, zero no-shows scores
/// `100 / (1 - acceptable)`, and a 100% rate scores 0. Without bookings there
/// is nothing to score.
pub fn no_show_performance(no_shows: u32, scheduled: u32, policy: &NoShowPolicy) -> Decimal {
    if scheduled == 0 {
        return Decimal::ZERO;
    }
    let rate = (Decimal::from(no_shows) / Decimal::from(scheduled)).min(Decimal::ONE);
    let acceptable = policy.acceptable_rate_percent / dec!(100);
    let headroom = Decimal::ONE - acceptable;
    if headroom <= Decimal::ZERO {
        return Decimal::ZERO;
    }

    let pct = (Decimal::ONE - rate) / headroom * dec!(100);
    round2(pct.max(Decimal::ZERO).min(policy.max_percent))
}

pub fn evaluate(
    metric: &MetricKind,
    kpi: &KpiSnapshot,
    plan: &CompensationPlan,
    business_days_in_month: u32,
    daily_quota: Decimal,
    target_override: Option<Decimal>,
    rules: &EvaluationRules,
) -> Evaluation {
    let days = Decimal::from(business_days_in_month);
    let scheduled = Decimal::from(kpi.scheduled_meetings);

    let (meta, realizado) = match metric {
        MetricKind::Agendamentos => (target_override.unwrap_or(daily_quota * days), scheduled),
        MetricKind::Realizadas => (
            // Based on what was actually booked, not on the booking target
            target_override.unwrap_or_else(|| round_count(scheduled * rules.held_meeting_conversion)),
            Decimal::from(kpi.held_meetings),
        ),
        MetricKind::Tentativas => {
            let quota = plan
                .targets
                .daily_attempt_quota
                .unwrap_or(rules.daily_attempt_quota);
            (target_override.unwrap_or(quota * days), Decimal::from(kpi.call_attempts))
        }
        MetricKind::Organizacao => {
            let meta = target_override
                .or(plan.targets.organization_target)
                .unwrap_or(rules.organization_target);
            let score = kpi.organization_score.max(Decimal::ZERO).min(dec!(100));
            return Evaluation {
                meta,
                realizado: score,
                pct: round2(score),
            };
        }
        MetricKind::NoShow => {
            let meta = target_override.unwrap_or_else(|| {
                round_count(scheduled * rules.no_show.acceptable_rate_percent / dec!(100))
            });
            return Evaluation {
                meta,
                realizado: Decimal::from(kpi.no_shows),
                pct: no_show_performance(kpi.no_shows, kpi.scheduled_meetings, &rules.no_show),
            };
        }
        MetricKind::Contratos => (
            target_override
                .or(plan.targets.held_meetings_target)
                .unwrap_or(rules.default_contract_target),
            Decimal::from(kpi.contracts),
        ),
        MetricKind::R2Agendadas | MetricKind::OutsideSales => {
            return Evaluation {
                meta: target_override.unwrap_or(Decimal::ZERO),
                ..Evaluation::zero()
            };
        }
        MetricKind::Unknown(key) => {
            log::warn!("Unknown metric {:?} evaluated as zero", key);
            return Evaluation::zero();
        }
    };

    Evaluation {
        meta,
        realizado,
        pct: percent_achieved(realizado, meta),
    }
}
