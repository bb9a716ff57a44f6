//! Cost model module
//!
//! - Catalog registry with the reference PV and wind catalogs
//! - Evaluator that scales unit costs by capacity

pub mod catalog;
pub mod evaluator;

pub use catalog::CatalogRegistry;
pub use evaluator::{CostModelEvaluator, UnitPolicy};
