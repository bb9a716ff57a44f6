//! Profit calculator
//!
//! One call turns the raw inputs into all five outputs, in a fixed order:
//!
//! ```text
//! commission → resource share → total → ROI → net profit
//! ```
//!
//! Inputs are validated before any arithmetic. On failure nothing is
//! returned; there are no partial results.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use solwind_common::money::{checked_add, checked_div, checked_mul, checked_sub, round_money};
use solwind_common::{CalcError, ProfitInputs, ProfitResult, Roi};
use tracing::{debug, instrument};

use crate::revenue::{CommissionContext, CommissionStrategy, DevelopmentFeeCommission};
use crate::ProfitConfig;

/// Stateless profit calculator
#[derive(Debug, Clone, Default)]
pub struct ProfitCalculator {
    config: ProfitConfig,
}

impl ProfitCalculator {
    pub fn new(config: ProfitConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ProfitConfig {
        &self.config
    }

    /// Development fee commission (万元)
    pub fn commission_revenue(
        &self,
        capacity_mw: Decimal,
        dev_fee_rate: Option<Decimal>,
        extra_investment: Decimal,
    ) -> Result<Decimal, CalcError> {
        if capacity_mw <= Decimal::ZERO {
            return Err(CalcError::MissingCapacity);
        }
        CalcError::ensure_non_negative("extra_investment", extra_investment)?;

        let strategy = self.development_fee(dev_fee_rate);
        strategy.commission(&CommissionContext {
            capacity_mw,
            extra_investment,
        })
    }

    /// Tiered share of the resource fee (万元). Zero for non-positive totals.
    pub fn resource_share_revenue(&self, resource_fee_total: Decimal) -> Result<Decimal, CalcError> {
        self.config.tiers.share(resource_fee_total)
    }

    /// Commission plus resource share (万元)
    pub fn total_revenue(
        &self,
        commission_revenue: Decimal,
        resource_share_revenue: Decimal,
    ) -> Result<Decimal, CalcError> {
        checked_add("total_revenue", commission_revenue, resource_share_revenue).map(round_money)
    }

    /// ROI in percent; not applicable without a positive cost basis
    pub fn roi(&self, total_revenue: Decimal, own_cost: Decimal) -> Result<Roi, CalcError> {
        if own_cost <= Decimal::ZERO {
            return Ok(Roi::NotApplicable);
        }
        let net = checked_sub("own_cost", total_revenue, own_cost)?;
        let ratio = checked_div("own_cost", net, own_cost)?;
        Ok(Roi::Percent(round_money(checked_mul("own_cost", ratio, dec!(100))?)))
    }

    /// Total revenue less own cost; zero own cost means no cost basis
    pub fn net_profit(&self, total_revenue: Decimal, own_cost: Decimal) -> Result<Decimal, CalcError> {
        if own_cost > Decimal::ZERO {
            checked_sub("own_cost", total_revenue, own_cost).map(round_money)
        } else {
            Ok(round_money(total_revenue))
        }
    }

    /// Full analysis with the development fee commission
    #[instrument(skip(self))]
    pub fn analyze(&self, inputs: &ProfitInputs) -> Result<ProfitResult, CalcError> {
        inputs.validate()?;
        let strategy = self.development_fee(inputs.dev_fee_rate);
        self.run(&strategy, inputs)
    }

    /// Full analysis with an explicitly chosen commission strategy
    #[instrument(skip(self, strategy), fields(strategy = strategy.name()))]
    pub fn analyze_with(
        &self,
        strategy: &dyn CommissionStrategy,
        inputs: &ProfitInputs,
    ) -> Result<ProfitResult, CalcError> {
        inputs.validate()?;
        self.run(strategy, inputs)
    }

    /// A missing or zero rate means "use the configured default"
    fn development_fee(&self, dev_fee_rate: Option<Decimal>) -> DevelopmentFeeCommission {
        let rate = dev_fee_rate
            .filter(|rate| !rate.is_zero())
            .unwrap_or(self.config.default_dev_fee_rate);
        DevelopmentFeeCommission::new(rate)
    }

    /// Inputs are validated by the caller
    fn run(&self, strategy: &dyn CommissionStrategy, inputs: &ProfitInputs) -> Result<ProfitResult, CalcError> {
        let capacity_mw = inputs.require_capacity()?;

        let commission_revenue = strategy.commission(&CommissionContext {
            capacity_mw,
            extra_investment: inputs.extra_investment,
        })?;
        let resource_share_revenue = strategy.resource_revenue(inputs.resource_fee_total, &self.config.tiers)?;
        let total_revenue = self.total_revenue(commission_revenue, resource_share_revenue)?;
        let roi = self.roi(total_revenue, inputs.own_cost)?;
        let net_profit = self.net_profit(total_revenue, inputs.own_cost)?;

        debug!(
            %commission_revenue,
            %resource_share_revenue,
            %total_revenue,
            %roi,
            %net_profit,
            "profit analysis complete"
        );

        Ok(ProfitResult {
            commission_revenue,
            resource_share_revenue,
            total_revenue,
            roi,
            net_profit,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::revenue::LegacyMarketRateCommission;

    fn calculator() -> ProfitCalculator {
        ProfitCalculator::default()
    }

    #[test]
    fn test_commission_revenue() {
        let calc = calculator();
        assert_eq!(calc.commission_revenue(dec!(50), Some(dec!(0.1)), dec!(0)).unwrap(), dec!(500.00));
        assert_eq!(calc.commission_revenue(dec!(50), None, dec!(600)).unwrap(), dec!(0.00));
    }

    #[test]
    fn test_commission_requires_capacity() {
        let calc = calculator();
        assert_eq!(
            calc.commission_revenue(dec!(0), None, dec!(0)),
            Err(CalcError::MissingCapacity)
        );
    }

    #[test]
    fn test_zero_rate_falls_back_to_default() {
        let calc = calculator();
        assert_eq!(calc.commission_revenue(dec!(50), Some(dec!(0)), dec!(0)).unwrap(), dec!(500.00));

        let result = calc.analyze(&ProfitInputs::new(dec!(50)).with_dev_fee_rate(dec!(0))).unwrap();
        assert_eq!(result.commission_revenue, dec!(500.00));
    }

    #[test]
    fn test_roi() {
        let calc = calculator();
        assert_eq!(calc.roi(dec!(600), dec!(300)).unwrap(), Roi::Percent(dec!(100.00)));
        assert_eq!(calc.roi(dec!(300), dec!(300)).unwrap(), Roi::Percent(dec!(0.00)));
        assert_eq!(calc.roi(dec!(100), dec!(300)).unwrap(), Roi::Percent(dec!(-66.67)));
        assert_eq!(calc.roi(dec!(600), dec!(0)).unwrap(), Roi::NotApplicable);
    }

    #[test]
    fn test_net_profit() {
        let calc = calculator();
        assert_eq!(calc.net_profit(dec!(600), dec!(300)).unwrap(), dec!(300.00));
        assert_eq!(calc.net_profit(dec!(600), dec!(0)).unwrap(), dec!(600.00));
    }

    #[test]
    fn test_out_of_range_inputs_are_errors() {
        let calc = calculator();

        // ROI ratio exceeds the decimal range
        let inputs = ProfitInputs::new(dec!(100000)).with_own_cost(dec!(0.0000000000000000000001));
        assert!(matches!(calc.analyze(&inputs), Err(CalcError::InvalidInput { field: "own_cost", .. })));

        // Capacity in watts exceeds the decimal range
        let inputs = ProfitInputs::new(dec!(100000000000000000000000));
        assert!(matches!(calc.analyze(&inputs), Err(CalcError::InvalidInput { field: "capacity_mw", .. })));

        assert!(calc.total_revenue(Decimal::MAX, dec!(1)).is_err());
    }

    #[test]
    fn test_analyze_pv_project() {
        let inputs = ProfitInputs::new(dec!(100))
            .with_extra_investment(dec!(200))
            .with_resource_fee_total(dec!(5000))
            .with_own_cost(dec!(1500));
        let result = calculator().analyze(&inputs).unwrap();

        // 100 × 1e6 × 0.1 / 1e4 − 200
        assert_eq!(result.commission_revenue, dec!(800.00));
        // 1000 + 1000 × 0.75
        assert_eq!(result.resource_share_revenue, dec!(1750.00));
        assert_eq!(result.total_revenue, dec!(2550.00));
        assert_eq!(result.roi, Roi::Percent(dec!(70.00)));
        assert_eq!(result.net_profit, dec!(1050.00));
    }

    #[test]
    fn test_analyze_without_cost_basis() {
        let inputs = ProfitInputs::new(dec!(50)).with_resource_fee_total(dec!(10000));
        let result = calculator().analyze(&inputs).unwrap();

        assert_eq!(result.commission_revenue, dec!(500.00));
        assert_eq!(result.resource_share_revenue, dec!(5333.40));
        assert_eq!(result.total_revenue, dec!(5833.40));
        assert_eq!(result.roi, Roi::NotApplicable);
        assert_eq!(result.net_profit, dec!(5833.40));
    }

    #[test]
    fn test_analyze_rejects_before_arithmetic() {
        let calc = calculator();
        let mut inputs = ProfitInputs::new(dec!(50)).with_own_cost(dec!(-1));
        assert!(matches!(calc.analyze(&inputs), Err(CalcError::InvalidInput { field: "own_cost", .. })));

        inputs.capacity_mw = None;
        assert_eq!(calc.analyze(&inputs), Err(CalcError::MissingCapacity));
    }

    #[test]
    fn test_analyze_is_idempotent() {
        let calc = calculator();
        let inputs = ProfitInputs::new(dec!(73.4))
            .with_dev_fee_rate(dec!(0.12))
            .with_extra_investment(dec!(33.3))
            .with_resource_fee_total(dec!(8123.45))
            .with_own_cost(dec!(999.99));
        let first = calc.analyze(&inputs).unwrap();
        let second = calc.analyze(&inputs).unwrap();
        assert_eq!(first, second);
        assert_eq!(
            serde_json::to_string(&first).unwrap(),
            serde_json::to_string(&second).unwrap()
        );
    }

    #[test]
    fn test_analyze_with_legacy_strategy() {
        let legacy = LegacyMarketRateCommission {
            total_project_cost: dec!(63000),
            market_profit_rate: dec!(12),
        };
        let inputs = ProfitInputs::new(dec!(100))
            .with_extra_investment(dec!(1000))
            .with_resource_fee_total(dec!(0));
        let result = calculator().analyze_with(&legacy, &inputs).unwrap();

        // 63000 × 0.45 × 0.12 − 1000
        assert_eq!(result.commission_revenue, dec!(2402.00));
        assert_eq!(result.total_revenue, dec!(2402.00));
    }

    #[test]
    fn test_legacy_strategy_takes_resource_fee_in_full() {
        let legacy = LegacyMarketRateCommission {
            total_project_cost: dec!(63000),
            market_profit_rate: dec!(12),
        };
        let inputs = ProfitInputs::new(dec!(100))
            .with_extra_investment(dec!(1000))
            .with_resource_fee_total(dec!(10000));
        let result = calculator().analyze_with(&legacy, &inputs).unwrap();

        assert_eq!(result.resource_share_revenue, dec!(10000.00));
        assert_eq!(result.total_revenue, dec!(12402.00));

        // The current strategy applies the tiers to the same fee
        let current = calculator().analyze(&inputs).unwrap();
        assert_eq!(current.resource_share_revenue, dec!(5333.40));
    }

    #[test]
    fn test_configured_default_rate() {
        let calc = ProfitCalculator::new(ProfitConfig {
            default_dev_fee_rate: dec!(0.15),
            ..ProfitConfig::default()
        });
        let result = calc.analyze(&ProfitInputs::new(dec!(10))).unwrap();
        assert_eq!(result.commission_revenue, dec!(150.00));
    }
}
