//! Percent-achieved to payout-multiplier step function.

use crate::errors::{Error, Result, ValidationError};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

/// One breakpoint: from `min_percent` upward the multiplier applies.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MultiplierTier {
    pub min_percent: Decimal,
    pub multiplier: Decimal,
}

impl MultiplierTier {
    pub fn new(min_percent: Decimal, multiplier: Decimal) -> Self {
        MultiplierTier {
            min_percent,
            multiplier,
        }
    }
}

/// Ordered breakpoints where the largest threshold not above `pct` wins.
///
/// Below the first threshold the multiplier is 0. Tables are validated on
/// construction: thresholds strictly increase, multipliers never decrease,
/// stay within `[0, 1]` and reach 1 at or before 100%.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<MultiplierTier>", into = "Vec<MultiplierTier>")]
pub struct MultiplierTable {
    tiers: Vec<MultiplierTier>,
}

impl MultiplierTable {
    pub fn new(tiers: Vec<MultiplierTier>) -> Result<Self> {
        if tiers.is_empty() {
            return Err(invalid("multiplier table needs at least one tier"));
        }

        for pair in tiers.windows(2) {
            if pair[1].min_percent <= pair[0].min_percent {
                return Err(invalid(&format!(
                    "thresholds must strictly increase ({} then {})",
                    pair[0].min_percent, pair[1].min_percent
                )));
            }
            if pair[1].multiplier < pair[0].multiplier {
                return Err(invalid(&format!(
                    "multipliers must not decrease ({} then {})",
                    pair[0].multiplier, pair[1].multiplier
                )));
            }
        }

        if let Some(tier) = tiers
            .iter()
            .find(|t| t.min_percent < Decimal::ZERO || t.multiplier < Decimal::ZERO || t.multiplier > Decimal::ONE)
        {
            return Err(invalid(&format!(
                "tier at {}% has multiplier {} outside [0, 1]",
                tier.min_percent, tier.multiplier
            )));
        }

        let table = MultiplierTable { tiers };
        if table.multiplier_for(dec!(100)) != Decimal::ONE {
            return Err(invalid("multiplier must be 1 at 100%"));
        }
        Ok(table)
    }

    pub fn multiplier_for(&self, pct: Decimal) -> Decimal {
        self.tiers
            .iter()
            .rev()
            .find(|tier| tier.min_percent <= pct)
            .map(|tier| tier.multiplier)
            .unwrap_or(Decimal::ZERO)
    }

    pub fn tiers(&self) -> &[MultiplierTier] {
        &self.tiers
    }
}

impl Default for MultiplierTable {
    fn default() -> Self {
        MultiplierTable {
            tiers: vec![
                MultiplierTier::new(dec!(70), dec!(0.5)),
                MultiplierTier::new(dec!(85), dec!(0.7)),
                MultiplierTier::new(dec!(100), dec!(1)),
            ],
        }
    }
}

impl TryFrom<Vec<MultiplierTier>> for MultiplierTable {
    type Error = Error;

    fn try_from(tiers: Vec<MultiplierTier>) -> Result<Self> {
        MultiplierTable::new(tiers)
    }
}

impl From<MultiplierTable> for Vec<MultiplierTier> {
    fn from(table: MultiplierTable) -> Self {
        table.tiers
    }
}

fn invalid(msg: &str) -> Error {
    Error::Validation(ValidationError::InvalidInput(msg.to_string()))
}
