//! Commission revenue strategies
//!
//! Two formulas exist. The caller always picks one explicitly; they are
//! never mixed within one analysis.
//!
//! ```text
//! Development fee (current):
//!   revenue = max(0, MW × 1,000,000 × rate / 10,000 − extra_investment)
//!
//! Market rate (legacy, kept for old records):
//!   revenue = total_project_cost × 0.45 × (market_profit_rate / 100) − extra_investment
//! ```
//!
//! Each strategy also decides how much of the partner's resource fee counts
//! as income: the current contract applies the tier schedule, the legacy one
//! takes the fee as-is.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use solwind_common::money::{checked_div, checked_mul, checked_sub, mw_to_watts, round_money, yuan_to_wan};
use solwind_common::CalcError;
use tracing::warn;

use super::tiers::TierSchedule;

/// Values a commission formula may draw on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CommissionContext {
    /// Installed capacity (MW), already validated positive
    pub capacity_mw: Decimal,
    /// Extra investment required by the government (万元)
    pub extra_investment: Decimal,
}

/// A commission revenue formula
pub trait CommissionStrategy: Send + Sync {
    /// Stable name for logs and stored records
    fn name(&self) -> &'static str;

    /// Commission revenue (万元), rounded to 2 places
    fn commission(&self, ctx: &CommissionContext) -> Result<Decimal, CalcError>;

    /// Resource income (万元) drawn from the partner's resource fee
    fn resource_revenue(&self, resource_fee_total: Decimal, tiers: &TierSchedule) -> Result<Decimal, CalcError> {
        tiers.share(resource_fee_total)
    }
}

/// Capacity-linked development fee, floored at zero
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DevelopmentFeeCommission {
    /// Fee rate (元/W)
    pub dev_fee_rate: Decimal,
}

impl DevelopmentFeeCommission {
    pub fn new(dev_fee_rate: Decimal) -> Self {
        Self { dev_fee_rate }
    }
}

impl CommissionStrategy for DevelopmentFeeCommission {
    fn name(&self) -> &'static str {
        "development_fee"
    }

    fn commission(&self, ctx: &CommissionContext) -> Result<Decimal, CalcError> {
        CalcError::ensure_non_negative("dev_fee_rate", self.dev_fee_rate)?;

        let watts = mw_to_watts("capacity_mw", ctx.capacity_mw)?;
        let fee_yuan = checked_mul("dev_fee_rate", watts, self.dev_fee_rate)?;
        let revenue = checked_sub("extra_investment", yuan_to_wan(fee_yuan), ctx.extra_investment)?;

        // Deficits are absorbed, not carried forward
        Ok(round_money(revenue.max(Decimal::ZERO)))
    }
}

/// Share of the project cost counted as commission under the legacy formula
pub const LEGACY_COST_SHARE: Decimal = dec!(0.45);

/// Legacy market-rate commission.
///
/// Superseded by [`DevelopmentFeeCommission`]; only for re-deriving records
/// created under the old contract. Not floored: it can go negative. The
/// resource fee is taken in full, without tiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LegacyMarketRateCommission {
    /// Total project cost (万元)
    pub total_project_cost: Decimal,
    /// Market fair profit rate (%)
    pub market_profit_rate: Decimal,
}

impl CommissionStrategy for LegacyMarketRateCommission {
    fn name(&self) -> &'static str {
        "legacy_market_rate"
    }

    fn commission(&self, ctx: &CommissionContext) -> Result<Decimal, CalcError> {
        CalcError::ensure_non_negative("total_project_cost", self.total_project_cost)?;
        CalcError::ensure_non_negative("market_profit_rate", self.market_profit_rate)?;
        warn!(strategy = self.name(), "using legacy commission formula");

        let share = checked_mul("total_project_cost", self.total_project_cost, LEGACY_COST_SHARE)?;
        let rate = checked_div("market_profit_rate", self.market_profit_rate, dec!(100))?;
        let gross = checked_mul("market_profit_rate", share, rate)?;
        let revenue = checked_sub("extra_investment", gross, ctx.extra_investment)?;
        Ok(round_money(revenue))
    }

    fn resource_revenue(&self, resource_fee_total: Decimal, _tiers: &TierSchedule) -> Result<Decimal, CalcError> {
        Ok(round_money(resource_fee_total.max(Decimal::ZERO)))
    }
}
