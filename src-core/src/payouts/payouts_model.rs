use crate::errors::{Error, Result};
use crate::metrics::MetricKind;
use chrono::{NaiveDate, NaiveDateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum PayoutStatus {
    Draft,
    /// Terminal; further changes only through adjustments
    Approved,
}

impl fmt::Display for PayoutStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PayoutStatus::Draft => f.write_str("DRAFT"),
            PayoutStatus::Approved => f.write_str("APPROVED"),
        }
    }
}

/// Scored line of one metric in a payout.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricResult {
    pub metric: MetricKind,
    pub label: String,
    pub weight_percent: Decimal,
    /// Share of the variable pool at stake for this metric
    pub valor_base: Decimal,
    pub meta: Decimal,
    pub realizado: Decimal,
    pub pct: Decimal,
    pub multiplier: Decimal,
    pub valor_final: Decimal,
}

/// Output of the pure aggregation step, persisted verbatim for audit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PayoutBreakdown {
    pub plan_id: String,
    pub business_days_in_month: u32,
    pub metrics: Vec<MetricResult>,
    /// Mean pct over metrics that carry any signal
    pub global_pct: Decimal,
    pub total_variable: Decimal,
    pub total_fixed: Decimal,
    pub bonus_base: Decimal,
    pub bonus_stretch: Decimal,
    pub total_bonus: Decimal,
}

/// Organization data frozen when the payout was computed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrgSnapshot {
    pub employee_name: String,
    pub cargo_id: String,
    pub department: Option<String>,
    pub squad: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Adjustment {
    pub id: String,
    /// Signed amount added to the total compensation
    pub value: Decimal,
    pub reason: String,
    pub actor: String,
    pub timestamp: NaiveDateTime,
}

/// Adjustment as submitted by a user, before it is stamped.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewAdjustment {
    pub value: Decimal,
    pub reason: String,
}

impl NewAdjustment {
    /// Builds an adjustment from raw form input.
    pub fn parse(raw_value: &str, reason: &str) -> Result<Self> {
        let normalized = raw_value.trim().replace(',', ".");
        let value = Decimal::from_str(&normalized).map_err(|_| {
            Error::InvalidAdjustment(format!("value {:?} is not a number", raw_value))
        })?;
        let adjustment = NewAdjustment {
            value,
            reason: reason.to_string(),
        };
        adjustment.validate()?;
        Ok(adjustment)
    }

    pub fn validate(&self) -> Result<()> {
        if self.reason.trim().is_empty() {
            return Err(Error::InvalidAdjustment("a reason is required".to_string()));
        }
        Ok(())
    }

    pub fn stamp(self, actor: &str) -> Adjustment {
        Adjustment {
            id: Uuid::new_v4().to_string(),
            value: self.value,
            reason: self.reason.trim().to_string(),
            actor: actor.to_string(),
            timestamp: Utc::now().naive_utc(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Payout {
    pub id: String,
    pub employee_id: String,
    pub month: NaiveDate,
    pub org: OrgSnapshot,
    #[serde(flatten)]
    pub breakdown: PayoutBreakdown,
    pub adjustments: Vec<Adjustment>,
    /// fixed + variable + adjustments; bonuses are reported apart
    pub total_compensation: Decimal,
    pub status: PayoutStatus,
    pub approved_by: Option<String>,
    pub approved_at: Option<NaiveDateTime>,
    /// Bumped on every write, used as the optimistic concurrency token
    pub version: i64,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl Payout {
    pub fn new_draft(
        employee_id: &str,
        month: NaiveDate,
        org: OrgSnapshot,
        breakdown: PayoutBreakdown,
    ) -> Self {
        let now = Utc::now().naive_utc();
        let mut payout = Payout {
            id: Uuid::new_v4().to_string(),
            employee_id: employee_id.to_string(),
            month,
            org,
            breakdown,
            adjustments: Vec::new(),
            total_compensation: Decimal::ZERO,
            status: PayoutStatus::Draft,
            approved_by: None,
            approved_at: None,
            version: 1,
            created_at: now,
            updated_at: now,
        };
        payout.refresh_totals();
        payout
    }

    pub fn adjustments_total(&self) -> Decimal {
        self.adjustments.iter().map(|a| a.value).sum()
    }

    pub fn refresh_totals(&mut self) {
        self.total_compensation =
            self.breakdown.total_fixed + self.breakdown.total_variable + self.adjustments_total();
    }

    pub fn is_draft(&self) -> bool {
        self.status == PayoutStatus::Draft
    }

    /// Copy with a bumped version and fresh update time, ready to be written.
    pub fn next_revision(&self) -> Payout {
        let mut next = self.clone();
        next.version += 1;
        next.updated_at = Utc::now().naive_utc();
        next
    }
}

/// Criteria for listing payouts; `None` fields match everything.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PayoutFilter {
    pub month: Option<NaiveDate>,
    pub status: Option<PayoutStatus>,
    pub department: Option<String>,
    pub employee_id: Option<String>,
}

impl PayoutFilter {
    pub fn matches(&self, payout: &Payout) -> bool {
        self.month.map_or(true, |m| payout.month == m)
            && self.status.map_or(true, |s| payout.status == s)
            && self
                .department
                .as_ref()
                .map_or(true, |d| payout.org.department.as_ref() == Some(d))
            && self
                .employee_id
                .as_ref()
                .map_or(true, |e| &payout.employee_id == e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn draft() -> Payout {
        let breakdown = PayoutBreakdown {
            plan_id: "plan-1".to_string(),
            business_days_in_month: 22,
            metrics: Vec::new(),
            global_pct: Decimal::ZERO,
            total_variable: dec!(800),
            total_fixed: dec!(2000),
            bonus_base: dec!(300),
            bonus_stretch: Decimal::ZERO,
            total_bonus: dec!(300),
        };
        let org = OrgSnapshot {
            employee_name: "Ana".to_string(),
            cargo_id: "sdr".to_string(),
            department: Some("Comercial".to_string()),
            squad: None,
        };
        Payout::new_draft("emp-1", NaiveDate::from_ymd_opt(2025, 3, 1).unwrap(), org, breakdown)
    }

    #[test]
    fn totals_exclude_bonus_and_include_adjustments() {
        let mut payout = draft();
        assert_eq!(payout.total_compensation, dec!(2800));

        payout.adjustments.push(NewAdjustment::parse("-50", "Chargeback").unwrap().stamp("admin"));
        payout.adjustments.push(NewAdjustment::parse("125.5", "Spiff").unwrap().stamp("admin"));
        payout.refresh_totals();
        assert_eq!(payout.total_compensation, dec!(2875.5));
    }

    #[test]
    fn next_revision_keeps_identity() {
        let payout = draft();
        let next = payout.next_revision();
        assert_eq!(next.id, payout.id);
        assert_eq!(next.version, payout.version + 1);
        assert!(next.updated_at >= payout.updated_at);
    }

    #[test]
    fn filter_matches_on_every_given_field() {
        let payout = draft();
        assert!(PayoutFilter::default().matches(&payout));
        assert!(PayoutFilter {
            department: Some("Comercial".to_string()),
            status: Some(PayoutStatus::Draft),
            ..Default::default()
        }
        .matches(&payout));
        assert!(!PayoutFilter {
            employee_id: Some("emp-2".to_string()),
            ..Default::default()
        }
        .matches(&payout));
    }

    #[test]
    fn parse_adjustment_input() {
        let adj = NewAdjustment::parse(" -150,50 ", "Chargeback").unwrap();
        assert_eq!(adj.value, dec!(-150.50));

        assert!(matches!(
            NewAdjustment::parse("abc", "Chargeback"),
            Err(Error::InvalidAdjustment(_))
        ));
        assert!(matches!(
            NewAdjustment::parse("100", "   "),
            Err(Error::InvalidAdjustment(_))
        ));
    }
}
