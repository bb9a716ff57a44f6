//! # Costing
//!
//! Cost model evaluation and per-project cost breakdowns for Solwind.
//!
//! ## Cost Formula
//!
//! ```text
//! P_total(PV)   = Capacity × 1,000,000 × Σ unit_cost(元/W) / 10,000
//! P_total(Wind) = Capacity × Σ unit_cost(万元/MW)
//! ```
//!
//! Where:
//! - Capacity: installed capacity in MW
//! - P_total: total project cost in 万元, rounded half-up to 2 places
//!
//! The total feeds reporting only; profit analysis does not consume it.

pub mod model;
pub mod sheet;

use indexmap::IndexMap;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use solwind_common::{Result, Technology, UnitLabel};
use tracing::instrument;

pub use model::{CatalogRegistry, CostModelEvaluator, UnitPolicy};
pub use sheet::LineItemSheet;

/// Costing configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CostingConfig {
    /// Handling of unrecognized unit labels
    #[serde(default)]
    pub unit_policy: UnitPolicy,
    /// Optional JSON file replacing the built-in catalogs
    #[serde(default)]
    pub catalog_file: Option<String>,
}

/// Cost estimate for one technology at one capacity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CostEstimate {
    pub technology: Technology,
    pub capacity_mw: Decimal,
    pub unit: UnitLabel,
    /// Σ unit cost, in `unit`
    pub unit_cost_total: Decimal,
    /// Total project cost (万元)
    pub total_cost: Decimal,
    /// Category -> cost (万元)
    pub breakdown: IndexMap<String, Decimal>,
}

/// Costing service
pub struct CostingService {
    registry: CatalogRegistry,
    evaluator: CostModelEvaluator,
}

impl CostingService {
    /// Build the service, loading the catalog file when one is configured
    pub fn new(config: &CostingConfig) -> Result<Self> {
        let registry = match &config.catalog_file {
            Some(path) => CatalogRegistry::from_json_file(path)?,
            None => CatalogRegistry::builtin(),
        };
        Ok(Self::with_registry(registry, config.unit_policy))
    }

    pub fn with_registry(registry: CatalogRegistry, policy: UnitPolicy) -> Self {
        Self {
            registry,
            evaluator: CostModelEvaluator::new(policy),
        }
    }

    pub fn registry(&self) -> &CatalogRegistry {
        &self.registry
    }

    pub fn registry_mut(&mut self) -> &mut CatalogRegistry {
        &mut self.registry
    }

    pub fn evaluator(&self) -> &CostModelEvaluator {
        &self.evaluator
    }

    /// Estimate total cost and breakdown from the technology's catalog
    #[instrument(skip(self))]
    pub fn estimate(&self, technology: Technology, capacity_mw: Decimal) -> Result<CostEstimate> {
        let catalog = self.registry.require(technology)?;
        let total_cost = self.evaluator.total_cost(catalog, capacity_mw)?;
        let breakdown = self.evaluator.breakdown(catalog, capacity_mw)?;

        Ok(CostEstimate {
            technology,
            capacity_mw,
            unit: catalog.unit.clone(),
            unit_cost_total: catalog.unit_cost_total()?,
            total_cost,
            breakdown,
        })
    }

    /// Total cost only
    pub fn total_cost(&self, technology: Technology, capacity_mw: Decimal) -> Result<Decimal> {
        let catalog = self.registry.require(technology)?;
        Ok(self.evaluator.total_cost(catalog, capacity_mw)?)
    }

    /// Line-item sheet seeded from the technology's catalog and priced at `capacity_mw`
    pub fn seed_sheet(&self, technology: Technology, capacity_mw: Decimal) -> Result<(LineItemSheet, Decimal)> {
        let catalog = self.registry.require(technology)?;
        let mut sheet = LineItemSheet::seed_from_catalog(catalog)?;
        let total = sheet.recompute_all(&self.evaluator, capacity_mw)?;
        Ok((sheet, total))
    }
}

impl Default for CostingService {
    fn default() -> Self {
        Self::with_registry(CatalogRegistry::builtin(), UnitPolicy::default())
    }
}
