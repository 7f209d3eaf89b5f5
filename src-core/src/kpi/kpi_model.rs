use crate::calendar::month_start;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Realized activity counts of one employee for one month.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KpiSnapshot {
    pub employee_id: String,
    pub month: NaiveDate,
    pub scheduled_meetings: u32,
    pub held_meetings: u32,
    pub no_shows: u32,
    pub call_attempts: u32,
    pub contracts: u32,
    /// 0 to 100
    pub organization_score: Decimal,
}

impl KpiSnapshot {
    /// All-zero snapshot used when nothing was recorded for the month.
    pub fn empty(employee_id: &str, month: NaiveDate) -> Self {
        KpiSnapshot {
            employee_id: employee_id.to_string(),
            month: month_start(month),
            scheduled_meetings: 0,
            held_meetings: 0,
            no_shows: 0,
            call_attempts: 0,
            contracts: 0,
            organization_score: Decimal::ZERO,
        }
    }
}
