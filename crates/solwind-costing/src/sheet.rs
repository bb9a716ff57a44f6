//! Per-project cost sheet
//!
//! A project starts from its technology's catalog: every catalog sub-item
//! becomes a line item carrying the catalog unit. Users then add their own
//! items (including fixed 万元 amounts) or drop seeded ones. The project
//! total is the sum of the individually rounded line totals.

use indexmap::IndexMap;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use solwind_common::money::{checked_add, checked_sum, round_money};
use solwind_common::{CalcError, CostCatalog, CostLineItem};
use tracing::debug;

use crate::model::CostModelEvaluator;

/// Line items making up one project's cost estimate
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LineItemSheet {
    pub items: Vec<CostLineItem>,
}

impl LineItemSheet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a sheet from a catalog.
    ///
    /// Categories with sub-items contribute one row per sub-item; categories
    /// without any contribute a single row named after the category.
    pub fn seed_from_catalog(catalog: &CostCatalog) -> Result<Self, CalcError> {
        let mut items = Vec::new();
        for (category, unit_cost) in &catalog.items {
            match catalog.details.get(category) {
                Some(sub_items) if !sub_items.is_empty() => {
                    for (name, cost) in sub_items {
                        items.push(Self::seeded_row(category, name, *cost, catalog)?);
                    }
                }
                _ => items.push(Self::seeded_row(category, category, *unit_cost, catalog)?),
            }
        }
        debug!(technology = %catalog.technology, rows = items.len(), "seeded cost sheet");
        Ok(Self { items })
    }

    fn seeded_row(
        category: &str,
        name: &str,
        unit_cost: Decimal,
        catalog: &CostCatalog,
    ) -> Result<CostLineItem, CalcError> {
        Ok(CostLineItem::new(category, name, unit_cost, catalog.unit.clone())?.seeded())
    }

    /// Add a line item, rejecting negative unit costs
    pub fn add_item(&mut self, item: CostLineItem) -> Result<(), CalcError> {
        CalcError::ensure_non_negative("unit_cost", item.unit_cost)?;
        self.items.push(item);
        Ok(())
    }

    /// Remove the item at `index`
    pub fn remove_item(&mut self, index: usize) -> Option<CostLineItem> {
        (index < self.items.len()).then(|| self.items.remove(index))
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Recompute every item at `capacity_mw` and return the project total.
    ///
    /// Items are only updated once all of them have been priced.
    pub fn recompute_all(
        &mut self,
        evaluator: &CostModelEvaluator,
        capacity_mw: Decimal,
    ) -> Result<Decimal, CalcError> {
        let totals = self
            .items
            .iter()
            .map(|item| evaluator.line_item_cost(item, capacity_mw))
            .collect::<Result<Vec<_>, _>>()?;

        for (item, total) in self.items.iter_mut().zip(&totals) {
            item.set_computed_total(*total);
        }
        checked_sum("total_cost", totals).map(round_money)
    }

    /// Project total without touching the cached item totals
    pub fn project_total(&self, evaluator: &CostModelEvaluator, capacity_mw: Decimal) -> Result<Decimal, CalcError> {
        let mut total = Decimal::ZERO;
        for item in &self.items {
            total = checked_add("total_cost", total, evaluator.line_item_cost(item, capacity_mw)?)?;
        }
        Ok(round_money(total))
    }

    /// Per-category subtotals, in first-seen order
    pub fn category_subtotals(
        &self,
        evaluator: &CostModelEvaluator,
        capacity_mw: Decimal,
    ) -> Result<IndexMap<String, Decimal>, CalcError> {
        let mut subtotals: IndexMap<String, Decimal> = IndexMap::new();
        for item in &self.items {
            let cost = evaluator.line_item_cost(item, capacity_mw)?;
            let subtotal = subtotals.entry(item.category.clone()).or_insert(Decimal::ZERO);
            *subtotal = checked_add("total_cost", *subtotal, cost)?;
        }
        for value in subtotals.values_mut() {
            *value = round_money(*value);
        }
        Ok(subtotals)
    }
}
