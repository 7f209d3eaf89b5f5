//! Turns a plan, a KPI snapshot and the resolved metric set into a payout
//! breakdown. Pure: no I/O, no clock, identical inputs give identical output.

use crate::kpi::KpiSnapshot;
use crate::metrics::{MetricConfiguration, MetricKind};
use crate::payouts::evaluator::{evaluate, round2};
use crate::payouts::payouts_model::{MetricResult, PayoutBreakdown};
use crate::plans::CompensationPlan;
use crate::settings::EngineSettings;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

/// Upstream state of one employee for one month.
#[derive(Debug, Clone, Copy)]
pub struct PayoutInput<'a> {
    pub plan: &'a CompensationPlan,
    pub kpi: &'a KpiSnapshot,
    pub metrics: &'a [MetricConfiguration],
    pub business_days_in_month: u32,
}

pub fn compute_for_employee_month(input: &PayoutInput<'_>, settings: &EngineSettings) -> PayoutBreakdown {
    let plan = input.plan;
    let daily_quota = plan
        .targets
        .daily_booking_quota
        .unwrap_or(settings.evaluation.default_daily_booking_quota);

    let mut metrics = Vec::with_capacity(input.metrics.len());
    let mut signal_pcts = Vec::new();

    for config in input.metrics {
        let valor_base = round2(plan.variable_amount * config.weight_percent / dec!(100));
        let evaluation = evaluate(
            &config.metric,
            input.kpi,
            plan,
            input.business_days_in_month,
            daily_quota,
            config.target_override,
            &settings.evaluation,
        );

        // Inert and unknown metrics never pay, whatever the lowest tier says
        let multiplier =
            if config.metric.is_inert() || matches!(config.metric, MetricKind::Unknown(_)) {
                Decimal::ZERO
            } else {
                settings.multiplier_table.multiplier_for(evaluation.pct)
            };

        if evaluation.has_signal() {
            signal_pcts.push(evaluation.pct);
        }

        metrics.push(MetricResult {
            metric: config.metric.clone(),
            label: config.label.clone(),
            weight_percent: config.weight_percent,
            valor_base,
            meta: evaluation.meta,
            realizado: evaluation.realizado,
            pct: evaluation.pct,
            multiplier,
            valor_final: round2(valor_base * multiplier),
        });
    }

    let global_pct = if signal_pcts.is_empty() {
        Decimal::ZERO
    } else {
        signal_pcts.iter().copied().sum::<Decimal>() / Decimal::from(signal_pcts.len())
    };

    let bonus_stretch = if global_pct >= settings.stretch_threshold_percent {
        plan.bonus_stretch
    } else {
        Decimal::ZERO
    };
    let total_variable: Decimal = metrics.iter().map(|m| m.valor_final).sum();

    log::debug!(
        "Payout for {} in {}: {} metrics, global pct {}, variable {}",
        input.kpi.employee_id,
        input.kpi.month,
        metrics.len(),
        global_pct,
        total_variable
    );

    PayoutBreakdown {
        plan_id: plan.id.clone(),
        business_days_in_month: input.business_days_in_month,
        metrics,
        global_pct,
        total_variable,
        total_fixed: plan.fixed_amount,
        bonus_base: plan.bonus_base,
        bonus_stretch,
        total_bonus: plan.bonus_base + bonus_stretch,
    }
}
