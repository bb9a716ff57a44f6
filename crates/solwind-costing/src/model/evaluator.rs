//! Cost model evaluator
//!
//! Scales unit costs by installed capacity and returns amounts in 万元:
//!
//! ```text
//! 元/W     P = MW × 1,000,000 × Σcost / 10,000
//! 万元/MW  P = MW × Σcost
//! 万元     P = cost                      (line items only)
//! ```
//!
//! Each result is rounded once, at the end, with [`round_money`]. Breakdown
//! entries are rounded individually, so their sum may differ from the
//! separately rounded total by a fraction of a cent per category.

use indexmap::IndexMap;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use solwind_common::money::{checked_mul, mw_to_watts, round_money, yuan_to_wan};
use solwind_common::{CalcError, CostCatalog, CostLineItem, UnitLabel};
use tracing::{debug, instrument, warn};

/// What to do with a unit label the evaluator does not recognize
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UnitPolicy {
    /// Price the entry at zero and log a warning. Existing records with blank
    /// labels depend on this.
    #[default]
    Lenient,
    /// Fail with [`CalcError::InvalidUnit`]
    Strict,
}

/// Stateless cost evaluator
#[derive(Debug, Clone, Copy, Default)]
pub struct CostModelEvaluator {
    policy: UnitPolicy,
}

impl CostModelEvaluator {
    pub fn new(policy: UnitPolicy) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> UnitPolicy {
        self.policy
    }

    /// Total cost of a catalog at the given capacity, in 万元
    #[instrument(skip(self, catalog), fields(technology = %catalog.technology, unit = %catalog.unit))]
    pub fn total_cost(&self, catalog: &CostCatalog, capacity_mw: Decimal) -> Result<Decimal, CalcError> {
        Self::check_catalog_inputs(catalog, capacity_mw)?;

        let unit_cost_total = catalog.unit_cost_total()?;
        let total = self.scale(&catalog.unit, unit_cost_total, capacity_mw, false)?;
        let total = round_money(total);

        debug!(%unit_cost_total, %total, "catalog total cost");
        Ok(total)
    }

    /// Per-category cost of a catalog at the given capacity, in catalog order
    #[instrument(skip(self, catalog), fields(technology = %catalog.technology, unit = %catalog.unit))]
    pub fn breakdown(
        &self,
        catalog: &CostCatalog,
        capacity_mw: Decimal,
    ) -> Result<IndexMap<String, Decimal>, CalcError> {
        Self::check_catalog_inputs(catalog, capacity_mw)?;

        catalog
            .items
            .iter()
            .map(|(category, unit_cost)| {
                let amount = self.scale(&catalog.unit, *unit_cost, capacity_mw, false)?;
                Ok::<_, CalcError>((category.clone(), round_money(amount)))
            })
            .collect()
    }

    /// Cost of a single line item, in 万元
    pub fn line_item_cost(&self, item: &CostLineItem, capacity_mw: Decimal) -> Result<Decimal, CalcError> {
        CalcError::ensure_non_negative("capacity_mw", capacity_mw)?;
        CalcError::ensure_non_negative("unit_cost", item.unit_cost)?;

        let amount = self.scale(&item.unit, item.unit_cost, capacity_mw, true)?;
        Ok(round_money(amount))
    }

    /// Recompute a line item and store the rounded total on it
    pub fn recompute_line_item(
        &self,
        item: &mut CostLineItem,
        capacity_mw: Decimal,
    ) -> Result<Decimal, CalcError> {
        let total = self.line_item_cost(item, capacity_mw)?;
        item.set_computed_total(total);
        Ok(total)
    }

    fn check_catalog_inputs(catalog: &CostCatalog, capacity_mw: Decimal) -> Result<(), CalcError> {
        CalcError::ensure_non_negative("capacity_mw", capacity_mw)?;
        for unit_cost in catalog.items.values() {
            CalcError::ensure_non_negative("unit_cost", *unit_cost)?;
        }
        Ok(())
    }

    /// Unrounded amount for `unit_cost` in `unit`.
    ///
    /// Fixed 万元 amounts are only meaningful for line items; a catalog priced
    /// in 万元 is treated as unrecognized.
    fn scale(
        &self,
        unit: &UnitLabel,
        unit_cost: Decimal,
        capacity_mw: Decimal,
        allow_fixed: bool,
    ) -> Result<Decimal, CalcError> {
        match unit {
            UnitLabel::YuanPerWatt => {
                let watts = mw_to_watts("capacity_mw", capacity_mw)?;
                Ok(yuan_to_wan(checked_mul("unit_cost", watts, unit_cost)?))
            }
            UnitLabel::WanYuanPerMw => checked_mul("unit_cost", capacity_mw, unit_cost),
            UnitLabel::WanYuan if allow_fixed => Ok(unit_cost),
            other => self.unrecognized(other),
        }
    }

    fn unrecognized(&self, unit: &UnitLabel) -> Result<Decimal, CalcError> {
        match self.policy {
            UnitPolicy::Lenient => {
                warn!(label = %unit, "unrecognized unit label, costing at zero");
                Ok(Decimal::ZERO)
            }
            UnitPolicy::Strict => Err(CalcError::InvalidUnit {
                label: unit.as_str().to_string(),
            }),
        }
    }
}
