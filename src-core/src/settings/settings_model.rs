//! Business tables driving the engine.
//!
//! Every figure that is a business decision rather than a rule of the
//! computation lives here, so a deployment can override it from JSON and
//! tests can exercise the engine with alternative tables.

use crate::calendar::WeekConvention;
use crate::errors::{Error, Result, ValidationError};
use crate::metrics::{MetricKind, MetricWeight, RoleFamily};
use crate::payouts::MultiplierTable;
use crate::plans::{PlanTargets, PlanWeights};
use crate::targets::FunnelProportions;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

/// Reference compensation for a seniority level.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LevelCompensation {
    pub level: u8,
    pub fixed_amount: Decimal,
    pub variable_amount: Decimal,
}

impl LevelCompensation {
    pub fn new(level: u8, fixed_amount: Decimal, variable_amount: Decimal) -> Self {
        LevelCompensation {
            level,
            fixed_amount,
            variable_amount,
        }
    }
}

/// Scoring of the inverse no-show metric.
///
/// A no-show rate equal to `acceptable_rate_percent` of booked meetings scores
/// 100%; fewer no-shows score proportionally higher, capped at `max_percent`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct NoShowPolicy {
    pub acceptable_rate_percent: Decimal,
    pub max_percent: Decimal,
}

impl Default for NoShowPolicy {
    fn default() -> Self {
        NoShowPolicy {
            acceptable_rate_percent: dec!(30),
            max_percent: dec!(150),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EvaluationRules {
    pub daily_attempt_quota: Decimal,
    pub default_daily_booking_quota: Decimal,
    /// Share of booked meetings expected to be held
    pub held_meeting_conversion: Decimal,
    pub default_contract_target: Decimal,
    pub organization_target: Decimal,
    pub no_show: NoShowPolicy,
}

impl Default for EvaluationRules {
    fn default() -> Self {
        EvaluationRules {
            daily_attempt_quota: dec!(84),
            default_daily_booking_quota: dec!(4),
            held_meeting_conversion: dec!(0.70),
            default_contract_target: dec!(10),
            organization_target: dec!(100),
            no_show: NoShowPolicy::default(),
        }
    }
}

/// Figures used when a plan has to be provisioned automatically.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PlanDefaults {
    pub weights: PlanWeights,
    pub targets: PlanTargets,
    pub bonus_base: Decimal,
    pub bonus_stretch: Decimal,
    pub business_days_assumed: u32,
    pub levels: Vec<LevelCompensation>,
    /// Recorded as approver of provisioned plans
    pub provisioning_actor: String,
}

impl PlanDefaults {
    pub fn level(&self, level: u8) -> Option<&LevelCompensation> {
        self.levels.iter().find(|l| l.level == level)
    }
}

impl Default for PlanDefaults {
    fn default() -> Self {
        PlanDefaults {
            weights: PlanWeights::default(),
            targets: PlanTargets {
                daily_booking_quota: Some(dec!(4)),
                held_meetings_target: None,
                daily_attempt_quota: Some(dec!(84)),
                organization_target: Some(dec!(100)),
            },
            bonus_base: dec!(300),
            bonus_stretch: dec!(500),
            business_days_assumed: 22,
            levels: vec![
                LevelCompensation::new(1, dec!(2000), dec!(1000)),
                LevelCompensation::new(2, dec!(2300), dec!(1200)),
                LevelCompensation::new(3, dec!(2600), dec!(1400)),
                LevelCompensation::new(4, dec!(3000), dec!(1600)),
                LevelCompensation::new(5, dec!(3500), dec!(1800)),
            ],
            provisioning_actor: "system".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EngineSettings {
    pub multiplier_table: MultiplierTable,
    pub sdr_weights: Vec<MetricWeight>,
    pub closer_weights: Vec<MetricWeight>,
    pub evaluation: EvaluationRules,
    pub plan_defaults: PlanDefaults,
    /// Global average percent at which the stretch bonus is paid
    pub stretch_threshold_percent: Decimal,
    pub funnel: FunnelProportions,
    pub week_convention: WeekConvention,
}

impl Default for EngineSettings {
    fn default() -> Self {
        EngineSettings {
            multiplier_table: MultiplierTable::default(),
            sdr_weights: vec![
                MetricWeight::new(MetricKind::Agendamentos, dec!(33)),
                MetricWeight::new(MetricKind::Realizadas, dec!(33)),
                MetricWeight::new(MetricKind::Tentativas, dec!(17)),
                MetricWeight::new(MetricKind::Organizacao, dec!(17)),
            ],
            closer_weights: vec![
                MetricWeight::new(MetricKind::Contratos, dec!(40)),
                MetricWeight::new(MetricKind::Realizadas, dec!(40)),
                MetricWeight::new(MetricKind::Organizacao, dec!(20)),
            ],
            evaluation: EvaluationRules::default(),
            plan_defaults: PlanDefaults::default(),
            stretch_threshold_percent: dec!(100),
            funnel: FunnelProportions::default(),
            week_convention: WeekConvention::default(),
        }
    }
}

impl EngineSettings {
    /// Parses settings from JSON; absent keys keep their defaults.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let settings: EngineSettings = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn role_defaults(&self, family: RoleFamily) -> &[MetricWeight] {
        match family {
            RoleFamily::Sdr => &self.sdr_weights,
            RoleFamily::Closer => &self.closer_weights,
        }
    }

    pub fn validate(&self) -> Result<()> {
        for (name, weights) in [("sdrWeights", &self.sdr_weights), ("closerWeights", &self.closer_weights)] {
            if weights.is_empty() {
                return Err(invalid(format!("{} must not be empty", name)));
            }
            if weights.iter().any(|w| w.weight_percent < Decimal::ZERO) {
                return Err(invalid(format!("{} contains a negative weight", name)));
            }
        }

        if self.plan_defaults.levels.is_empty() {
            return Err(invalid("planDefaults.levels must not be empty".to_string()));
        }
        if self.plan_defaults.business_days_assumed == 0 {
            return Err(invalid("planDefaults.businessDaysAssumed must be positive".to_string()));
        }
        if self.evaluation.no_show.acceptable_rate_percent < Decimal::ZERO
            || self.evaluation.no_show.acceptable_rate_percent >= dec!(100)
        {
            return Err(invalid(
                "evaluation.noShow.acceptableRatePercent must be within [0, 100)".to_string(),
            ));
        }
        if self.stretch_threshold_percent <= Decimal::ZERO {
            return Err(invalid("stretchThresholdPercent must be positive".to_string()));
        }
        self.funnel.validate()
    }
}

fn invalid(msg: String) -> Error {
    Error::Settings(ValidationError::InvalidInput(msg).to_string())
}
