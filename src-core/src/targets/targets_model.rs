use crate::errors::{Result, ValidationError};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Stages of the sales funnel, in cascade order. `Agendamento` is the root.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FunnelStage {
    Agendamento,
    R1Agendada,
    R1Realizada,
    NoShow,
    Contrato,
    R2Agendada,
    R2Realizada,
    VendaRealizada,
}

impl FunnelStage {
    pub const ALL: [FunnelStage; 8] = [
        FunnelStage::Agendamento,
        FunnelStage::R1Agendada,
        FunnelStage::R1Realizada,
        FunnelStage::NoShow,
        FunnelStage::Contrato,
        FunnelStage::R2Agendada,
        FunnelStage::R2Realizada,
        FunnelStage::VendaRealizada,
    ];

    pub fn key(&self) -> &'static str {
        match self {
            FunnelStage::Agendamento => "agendamento",
            FunnelStage::R1Agendada => "r1_agendada",
            FunnelStage::R1Realizada => "r1_realizada",
            FunnelStage::NoShow => "no_show",
            FunnelStage::Contrato => "contrato",
            FunnelStage::R2Agendada => "r2_agendada",
            FunnelStage::R2Realizada => "r2_realizada",
            FunnelStage::VendaRealizada => "venda_realizada",
        }
    }

    pub fn is_root(&self) -> bool {
        *self == FunnelStage::Agendamento
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TargetPeriod {
    Day,
    Week,
    Month,
}

/// Day/week/month targets of one funnel stage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StageTargets {
    pub day: i64,
    pub week: i64,
    pub month: i64,
    pub day_overridden: bool,
    pub week_overridden: bool,
    pub month_overridden: bool,
}

impl StageTargets {
    pub fn derived(day: i64, business_days_in_week: u32, business_days_in_month: u32) -> Self {
        StageTargets {
            day,
            week: day.saturating_mul(business_days_in_week as i64),
            month: day.saturating_mul(business_days_in_month as i64),
            day_overridden: false,
            week_overridden: false,
            month_overridden: false,
        }
    }
}

/// Flat persisted form of one cell of the matrix.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TargetEntry {
    pub metric: FunnelStage,
    pub period: TargetPeriod,
    pub value: i64,
    pub overridden: bool,
}

/// Funnel targets of one month, optionally scoped to a squad.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TargetMatrix {
    pub month: NaiveDate,
    pub squad: Option<String>,
    pub business_days_in_week: u32,
    pub business_days_in_month: u32,
    pub stages: BTreeMap<FunnelStage, StageTargets>,
}

impl TargetMatrix {
    pub fn root_day(&self) -> i64 {
        self.stages
            .get(&FunnelStage::Agendamento)
            .map(|s| s.day)
            .unwrap_or(0)
    }

    pub fn value(&self, stage: FunnelStage, period: TargetPeriod) -> i64 {
        self.stages
            .get(&stage)
            .map(|s| match period {
                TargetPeriod::Day => s.day,
                TargetPeriod::Week => s.week,
                TargetPeriod::Month => s.month,
            })
            .unwrap_or(0)
    }

    /// Manually sets a week or month value. Nothing else is recomputed.
    ///
    /// Day values go through the cascade instead, see
    /// [`TargetCascade::set_stage_day`](crate::targets::TargetCascade::set_stage_day).
    pub fn override_period(&mut self, stage: FunnelStage, period: TargetPeriod, value: i64) -> Result<()> {
        let value = if value < 0 {
            log::warn!("Negative {:?} target for {} coerced to zero", period, stage.key());
            0
        } else {
            value
        };

        let targets = self.stages.entry(stage).or_insert_with(|| StageTargets::derived(0, 0, 0));
        match period {
            TargetPeriod::Week => {
                targets.week = value;
                targets.week_overridden = true;
            }
            TargetPeriod::Month => {
                targets.month = value;
                targets.month_overridden = true;
            }
            TargetPeriod::Day => {
                return Err(ValidationError::InvalidInput(format!(
                    "day target of {} must be edited through the cascade",
                    stage.key()
                ))
                .into())
            }
        }
        Ok(())
    }

    /// Rebuilds a matrix from its persisted cells. Stages without any cell
    /// come back as zero.
    pub fn from_entries(
        month: NaiveDate,
        squad: Option<String>,
        business_days_in_week: u32,
        business_days_in_month: u32,
        entries: &[TargetEntry],
    ) -> Self {
        let mut stages: BTreeMap<FunnelStage, StageTargets> = FunnelStage::ALL
            .iter()
            .map(|stage| (*stage, StageTargets::derived(0, 0, 0)))
            .collect();

        for entry in entries {
            if let Some(targets) = stages.get_mut(&entry.metric) {
                match entry.period {
                    TargetPeriod::Day => {
                        targets.day = entry.value;
                        targets.day_overridden = entry.overridden;
                    }
                    TargetPeriod::Week => {
                        targets.week = entry.value;
                        targets.week_overridden = entry.overridden;
                    }
                    TargetPeriod::Month => {
                        targets.month = entry.value;
                        targets.month_overridden = entry.overridden;
                    }
                }
            }
        }

        TargetMatrix {
            month,
            squad,
            business_days_in_week,
            business_days_in_month,
            stages,
        }
    }

    pub fn entries(&self) -> Vec<TargetEntry> {
        self.stages
            .iter()
            .flat_map(|(stage, t)| {
                [
                    (TargetPeriod::Day, t.day, t.day_overridden),
                    (TargetPeriod::Week, t.week, t.week_overridden),
                    (TargetPeriod::Month, t.month, t.month_overridden),
                ]
                .into_iter()
                .map(move |(period, value, overridden)| TargetEntry {
                    metric: *stage,
                    period,
                    value,
                    overridden,
                })
            })
            .collect()
    }
}

/// Read-only yearly sum of month targets per stage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnnualRollup {
    pub year: i32,
    pub squad: Option<String>,
    /// Months that had a saved matrix; absent months count as zero
    pub months_present: usize,
    pub totals: BTreeMap<FunnelStage, i64>,
}

impl AnnualRollup {
    pub fn from_matrices(year: i32, squad: Option<String>, matrices: &[TargetMatrix]) -> Self {
        let mut totals: BTreeMap<FunnelStage, i64> =
            FunnelStage::ALL.iter().map(|stage| (*stage, 0)).collect();

        for matrix in matrices {
            for (stage, targets) in &matrix.stages {
                *totals.entry(*stage).or_insert(0) += targets.month;
            }
        }

        AnnualRollup {
            year,
            squad,
            months_present: matrices.len(),
            totals,
        }
    }
}
