//! Progressive resource-fee tiers
//!
//! Each tier charges its own rate only on the part of the fee that falls
//! inside it (marginal, not flat):
//!
//! ```text
//! Tier 1      0 – 4,000 万元   25%
//! Tier 2  4,000 – 8,000 万元   75%
//! Tier 3        > 8,000 万元   66.67%
//! ```
//!
//! The rate rises then falls. That sequence comes from the contract and is
//! reproduced as-is.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use solwind_common::money::{checked_mul, checked_sum, round_money};
use solwind_common::CalcError;

/// One contiguous fee band
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tier {
    /// Lower bound (万元), exclusive of the amount below it
    pub floor: Decimal,
    /// Upper bound (万元); `None` for the open-ended top tier
    pub ceiling: Option<Decimal>,
    /// Marginal rate applied inside the band
    pub rate: Decimal,
}

impl Tier {
    /// Part of `total` that falls inside this band
    fn portion(&self, total: Decimal) -> Decimal {
        if total <= self.floor {
            return Decimal::ZERO;
        }
        let top = match self.ceiling {
            Some(ceiling) => total.min(ceiling),
            None => total,
        };
        top - self.floor
    }
}

/// Ordered, contiguous set of tiers
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TierSchedule {
    tiers: Vec<Tier>,
}

impl TierSchedule {
    /// Build and validate a schedule
    pub fn new(tiers: Vec<Tier>) -> Result<Self, CalcError> {
        let schedule = Self { tiers };
        schedule.validate()?;
        Ok(schedule)
    }

    /// The contractual resource-fee schedule
    pub fn contractual() -> Self {
        Self {
            tiers: vec![
                Tier {
                    floor: dec!(0),
                    ceiling: Some(dec!(4000)),
                    rate: dec!(0.25),
                },
                Tier {
                    floor: dec!(4000),
                    ceiling: Some(dec!(8000)),
                    rate: dec!(0.75),
                },
                Tier {
                    floor: dec!(8000),
                    ceiling: None,
                    rate: dec!(0.6667),
                },
            ],
        }
    }

    pub fn tiers(&self) -> &[Tier] {
        &self.tiers
    }

    /// Tiers must start at 0, be contiguous and ascending, carry
    /// non-negative rates, and only the last may be open-ended.
    pub fn validate(&self) -> Result<(), CalcError> {
        let invalid = |msg: String| -> Result<(), CalcError> { Err(CalcError::InvalidTierSchedule(msg)) };

        let Some(first) = self.tiers.first() else {
            return invalid("schedule has no tiers".to_string());
        };
        if !first.floor.is_zero() {
            return invalid(format!("first tier starts at {}, not 0", first.floor));
        }

        let last_index = self.tiers.len() - 1;
        for (i, tier) in self.tiers.iter().enumerate() {
            if tier.rate.is_sign_negative() && !tier.rate.is_zero() {
                return invalid(format!("tier {} has negative rate {}", i + 1, tier.rate));
            }
            match tier.ceiling {
                Some(ceiling) if ceiling <= tier.floor => {
                    return invalid(format!("tier {} ceiling {} not above floor {}", i + 1, ceiling, tier.floor));
                }
                Some(ceiling) => {
                    if let Some(next) = self.tiers.get(i + 1) {
                        if next.floor != ceiling {
                            return invalid(format!("gap or overlap between tier {} and {}", i + 1, i + 2));
                        }
                    }
                }
                None if i != last_index => {
                    return invalid(format!("tier {} is open-ended but not last", i + 1));
                }
                None => {}
            }
        }
        Ok(())
    }

    /// Unrounded share of `total`. Zero for non-positive totals.
    pub fn raw_share(&self, total: Decimal) -> Result<Decimal, CalcError> {
        if total <= Decimal::ZERO {
            return Ok(Decimal::ZERO);
        }
        let portions = self
            .tiers
            .iter()
            .map(|tier| checked_mul("resource_fee_total", tier.portion(total), tier.rate))
            .collect::<Result<Vec<_>, _>>()?;
        checked_sum("resource_fee_total", portions)
    }

    /// Share of `total`, rounded to 2 places
    pub fn share(&self, total: Decimal) -> Result<Decimal, CalcError> {
        self.raw_share(total).map(round_money)
    }
}

impl Default for TierSchedule {
    fn default() -> Self {
        Self::contractual()
    }
}
