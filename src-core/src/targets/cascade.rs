//! Funnel target cascade.
//!
//! One daily booking figure (`agendamento`) drives every downstream stage
//! through fixed proportions. Each stage is rounded half-up before it feeds
//! the next one, so `100` bookings yield `70` held R1 meetings and
//! `round(70 * 0.35) = 25` contracts.

use crate::errors::{Result, ValidationError};
use crate::targets::targets_model::{FunnelStage, StageTargets, TargetMatrix};
use chrono::NaiveDate;
use num_traits::{FromPrimitive, ToPrimitive};
use rust_decimal::{Decimal, RoundingStrategy};
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::str::FromStr;

/// Stage-to-stage conversion ratios.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FunnelProportions {
    /// agendamento -> r1_agendada
    pub r1_agendada: Decimal,
    /// r1_agendada -> r1_realizada
    pub r1_realizada: Decimal,
    /// r1_agendada -> no_show
    pub no_show: Decimal,
    /// r1_realizada -> contrato
    pub contrato: Decimal,
    /// contrato -> r2_agendada
    pub r2_agendada: Decimal,
    /// r2_agendada -> r2_realizada
    pub r2_realizada: Decimal,
    /// r2_realizada -> venda_realizada
    pub venda_realizada: Decimal,
}

impl Default for FunnelProportions {
    fn default() -> Self {
        FunnelProportions {
            r1_agendada: dec!(1.00),
            r1_realizada: dec!(0.70),
            no_show: dec!(0.30),
            contrato: dec!(0.35),
            r2_agendada: dec!(1.00),
            r2_realizada: dec!(0.75),
            venda_realizada: dec!(0.60),
        }
    }
}

impl FunnelProportions {
    /// `(stage, source stage, ratio)` in evaluation order.
    pub fn steps(&self) -> [(FunnelStage, FunnelStage, Decimal); 7] {
        [
            (FunnelStage::R1Agendada, FunnelStage::Agendamento, self.r1_agendada),
            (FunnelStage::R1Realizada, FunnelStage::R1Agendada, self.r1_realizada),
            (FunnelStage::NoShow, FunnelStage::R1Agendada, self.no_show),
            (FunnelStage::Contrato, FunnelStage::R1Realizada, self.contrato),
            (FunnelStage::R2Agendada, FunnelStage::Contrato, self.r2_agendada),
            (FunnelStage::R2Realizada, FunnelStage::R2Agendada, self.r2_realizada),
            (FunnelStage::VendaRealizada, FunnelStage::R2Realizada, self.venda_realizada),
        ]
    }

    pub fn validate(&self) -> Result<()> {
        if let Some((stage, _, ratio)) = self.steps().iter().find(|(_, _, r)| *r < Decimal::ZERO) {
            return Err(ValidationError::InvalidInput(format!(
                "funnel ratio for {} is negative ({})",
                stage.key(),
                ratio
            ))
            .into());
        }
        Ok(())
    }
}

/// Largest accepted daily root value; larger inputs are capped.
pub const MAX_ROOT_VALUE: i64 = 1_000_000_000;

/// Coerces a root input to a usable value: negative or non-finite input is
/// zero, anything above [`MAX_ROOT_VALUE`] is capped.
pub fn sanitize_root(value: f64) -> Decimal {
    if !value.is_finite() || value < 0.0 {
        log::warn!("Stale cascade input {} coerced to zero", value);
        return Decimal::ZERO;
    }
    if value > MAX_ROOT_VALUE as f64 {
        log::warn!("Cascade input {} capped to {}", value, MAX_ROOT_VALUE);
        return Decimal::from(MAX_ROOT_VALUE);
    }
    Decimal::from_f64(value).unwrap_or_else(|| {
        log::warn!("Cascade input {} out of range, coerced to zero", value);
        Decimal::ZERO
    })
}

/// Parses a raw root value; non-numeric text is treated as zero.
pub fn parse_root(raw: &str) -> Decimal {
    let trimmed = raw.trim().replace(',', ".");
    match Decimal::from_str(&trimmed) {
        Ok(value) if value > Decimal::from(MAX_ROOT_VALUE) => {
            log::warn!("Cascade input {:?} capped to {}", raw, MAX_ROOT_VALUE);
            Decimal::from(MAX_ROOT_VALUE)
        }
        Ok(value) if value >= Decimal::ZERO => value,
        _ => {
            log::warn!("Stale cascade input {:?} coerced to zero", raw);
            Decimal::ZERO
        }
    }
}

/// Whole-number stage value, saturating at `i64::MAX`.
fn round_stage(value: Decimal) -> i64 {
    if value <= Decimal::ZERO {
        return 0;
    }
    value
        .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
        .to_i64()
        .unwrap_or_else(|| {
            log::warn!("Stage target {} out of range, saturated", value);
            i64::MAX
        })
}

/// Generates and edits [`TargetMatrix`] values.
#[derive(Debug, Clone, Default)]
pub struct TargetCascade {
    proportions: FunnelProportions,
}

impl TargetCascade {
    pub fn new(proportions: FunnelProportions) -> Self {
        TargetCascade { proportions }
    }

    /// Day values of every stage derived from the root.
    pub fn day_values(&self, root: Decimal) -> BTreeMap<FunnelStage, i64> {
        let mut days = BTreeMap::new();
        days.insert(FunnelStage::Agendamento, round_stage(root.max(Decimal::ZERO)));

        for (stage, source, ratio) in self.proportions.steps() {
            let source_value = days.get(&source).copied().unwrap_or(0);
            let value = Decimal::from(source_value)
                .checked_mul(ratio)
                .map_or(i64::MAX, round_stage);
            days.insert(stage, value);
        }
        days
    }

    pub fn build(
        &self,
        root: Decimal,
        month: NaiveDate,
        squad: Option<String>,
        business_days_in_week: u32,
        business_days_in_month: u32,
    ) -> TargetMatrix {
        let mut matrix = TargetMatrix {
            month,
            squad,
            business_days_in_week,
            business_days_in_month,
            stages: BTreeMap::new(),
        };
        self.recalculate_all(&mut matrix, root);
        matrix
    }

    /// Re-applies the full cascade from `root`, dropping every override.
    pub fn recalculate_all(&self, matrix: &mut TargetMatrix, root: Decimal) {
        let (week, month) = (matrix.business_days_in_week, matrix.business_days_in_month);
        matrix.stages = self
            .day_values(root)
            .into_iter()
            .map(|(stage, day)| (stage, StageTargets::derived(day, week, month)))
            .collect();

        log::debug!(
            "Cascaded root {} for {} ({:?}): {} days/week, {} days/month",
            matrix.root_day(),
            matrix.month,
            matrix.squad,
            week,
            month
        );
    }

    /// Edits a day value. The root recomputes the whole matrix, any other
    /// stage only recomputes its own week and month.
    pub fn set_stage_day(&self, matrix: &mut TargetMatrix, stage: FunnelStage, value: Decimal) {
        let value = if value < Decimal::ZERO {
            log::warn!("Negative day target for {} coerced to zero", stage.key());
            Decimal::ZERO
        } else {
            value
        };

        if stage.is_root() {
            self.recalculate_all(matrix, value);
            return;
        }

        let mut targets = StageTargets::derived(
            round_stage(value),
            matrix.business_days_in_week,
            matrix.business_days_in_month,
        );
        targets.day_overridden = true;
        matrix.stages.insert(stage, targets);
    }
}
