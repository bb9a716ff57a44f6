//! Profit analysis types
//!
//! Inputs are four contract parameters plus the project capacity. Results are
//! always produced together from one input set and never edited in place.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::CalcError;

/// Default development fee rate, 元/W
pub const DEFAULT_DEV_FEE_RATE: Decimal = Decimal::from_parts(1, 0, 0, false, 1);

/// Raw inputs to a profit analysis
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProfitInputs {
    /// Installed capacity (MW). Must be present and positive.
    pub capacity_mw: Option<Decimal>,

    /// Development fee rate (元/W). `None` uses the configured default.
    #[serde(default)]
    pub dev_fee_rate: Option<Decimal>,

    /// Extra investment required by the government (万元)
    #[serde(default)]
    pub extra_investment: Decimal,

    /// Total resource fee collected by the partner (万元)
    #[serde(default)]
    pub resource_fee_total: Decimal,

    /// Own cost incurred (万元). Zero means no cost basis.
    #[serde(default)]
    pub own_cost: Decimal,
}

impl ProfitInputs {
    /// Inputs for a project of the given capacity with every parameter at its default
    pub fn new(capacity_mw: Decimal) -> Self {
        Self {
            capacity_mw: Some(capacity_mw),
            dev_fee_rate: None,
            extra_investment: Decimal::ZERO,
            resource_fee_total: Decimal::ZERO,
            own_cost: Decimal::ZERO,
        }
    }

    pub fn with_dev_fee_rate(mut self, rate: Decimal) -> Self {
        self.dev_fee_rate = Some(rate);
        self
    }

    pub fn with_extra_investment(mut self, amount: Decimal) -> Self {
        self.extra_investment = amount;
        self
    }

    pub fn with_resource_fee_total(mut self, amount: Decimal) -> Self {
        self.resource_fee_total = amount;
        self
    }

    pub fn with_own_cost(mut self, amount: Decimal) -> Self {
        self.own_cost = amount;
        self
    }

    /// Positive capacity, or `MissingCapacity`
    pub fn require_capacity(&self) -> Result<Decimal, CalcError> {
        match self.capacity_mw {
            Some(capacity) if capacity > Decimal::ZERO => Ok(capacity),
            _ => Err(CalcError::MissingCapacity),
        }
    }

    /// Check every input before any arithmetic runs
    pub fn validate(&self) -> Result<(), CalcError> {
        self.require_capacity()?;
        if let Some(rate) = self.dev_fee_rate {
            CalcError::ensure_non_negative("dev_fee_rate", rate)?;
        }
        CalcError::ensure_non_negative("extra_investment", self.extra_investment)?;
        CalcError::ensure_non_negative("resource_fee_total", self.resource_fee_total)?;
        CalcError::ensure_non_negative("own_cost", self.own_cost)?;
        Ok(())
    }
}

/// Return on investment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum Roi {
    /// No positive cost basis was supplied
    NotApplicable,
    /// Percentage, 2 decimal places
    Percent(Decimal),
}

impl Roi {
    /// Percentage for storage; not-applicable maps to `None`
    pub fn as_percent(&self) -> Option<Decimal> {
        match self {
            Roi::NotApplicable => None,
            Roi::Percent(p) => Some(*p),
        }
    }

    pub fn is_applicable(&self) -> bool {
        matches!(self, Roi::Percent(_))
    }
}

impl std::fmt::Display for Roi {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Roi::NotApplicable => f.write_str("N/A"),
            Roi::Percent(p) => write!(f, "{}%", p),
        }
    }
}

/// The five outputs of a profit analysis, in 万元 (ROI in percent)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfitResult {
    /// Capacity-linked development fee, net of extra investment
    pub commission_revenue: Decimal,

    /// Tiered share of the resource fee
    pub resource_share_revenue: Decimal,

    /// Commission plus resource share
    pub total_revenue: Decimal,

    /// Return on own cost
    pub roi: Roi,

    /// Total revenue less own cost (when own cost is positive)
    pub net_profit: Decimal,
}
