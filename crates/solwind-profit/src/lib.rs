//! # Profit
//!
//! Revenue, ROI and net profit for a developed project.
//!
//! ## Revenue Model
//!
//! ```text
//! Total = Commission + Resource Share
//! ROI   = (Total − Own Cost) / Own Cost × 100
//! ```
//!
//! Where:
//! - Commission: capacity-linked development fee less extra investment, floored at 0
//! - Resource Share: marginal tiered share of the partner's resource fee
//! - Own Cost: zero means no cost basis, so ROI is not applicable
//!
//! All amounts are 万元, rounded half-up to 2 places.

pub mod analysis;
pub mod calculator;
pub mod revenue;

pub use analysis::{AnalysisSummary, ProfitAnalysis};
pub use calculator::ProfitCalculator;
pub use revenue::{
    CommissionContext, CommissionStrategy, DevelopmentFeeCommission, LegacyMarketRateCommission, Tier,
    TierSchedule,
};

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use solwind_common::{CalcError, DEFAULT_DEV_FEE_RATE};

/// Profit calculator configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProfitConfig {
    /// Rate used when inputs carry no development fee rate (元/W)
    #[serde(with = "rust_decimal::serde::str")]
    pub default_dev_fee_rate: Decimal,
    /// Resource-fee tiers
    pub tiers: TierSchedule,
}

impl ProfitConfig {
    pub fn validate(&self) -> Result<(), CalcError> {
        CalcError::ensure_non_negative("default_dev_fee_rate", self.default_dev_fee_rate)?;
        self.tiers.validate()
    }
}

impl Default for ProfitConfig {
    fn default() -> Self {
        Self {
            default_dev_fee_rate: DEFAULT_DEV_FEE_RATE,
            tiers: TierSchedule::contractual(),
        }
    }
}
