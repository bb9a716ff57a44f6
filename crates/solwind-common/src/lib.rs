//! # Solwind Common
//!
//! Shared types, errors, and money helpers for the Solwind renewable-energy
//! project platform.
//!
//! ## Core Types
//!
//! - [`CostCatalog`]/[`CostLineItem`]: unit-cost tables and per-project rows
//! - [`UnitLabel`]: 元/W, 万元/MW or fixed 万元
//! - [`ProfitInputs`]/[`ProfitResult`]: profit analysis contract
//! - [`ProjectRecord`]: project attributes consumed by the calculators
//!
//! ## Money
//!
//! - [`money::round_money`]: the one rounding routine (2 places, half-up)
//!
//! ## Security
//!
//! - [`security::permissions`]: fixed role → permission table

pub mod error;
pub mod money;
pub mod security;
pub mod types;

// Re-export commonly used types at crate root
pub use error::{CalcError, Result, SolwindError};
pub use types::{
    cost::{CostCatalog, CostLineItem, Technology, UnitLabel},
    profit::{ProfitInputs, ProfitResult, Roi, DEFAULT_DEV_FEE_RATE},
    project::{ProjectRecord, ProjectStage},
};

/// Solwind version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
