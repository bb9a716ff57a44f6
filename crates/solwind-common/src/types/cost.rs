//! Cost catalog types
//!
//! A catalog lists per-category unit costs for one technology. The unit label
//! decides how a unit cost scales with installed capacity:
//!
//! ```text
//! yuan-per-watt    amount = MW × 1,000,000 × cost / 10,000
//! wan-yuan-per-MW  amount = MW × cost
//! wan-yuan         amount = cost            (line items only)
//! ```
//!
//! Results are always in 万元.

use std::fmt;
use std::str::FromStr;

use indexmap::IndexMap;
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::CalcError;
use crate::money::checked_sum;

/// Unit attached to a unit cost.
///
/// Parsing never fails: labels the platform does not know about are kept
/// verbatim in [`UnitLabel::Unrecognized`] so stored data with blank or
/// mistyped labels still loads.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum UnitLabel {
    /// 元/W
    YuanPerWatt,
    /// 万元/MW
    WanYuanPerMw,
    /// 万元, a fixed amount independent of capacity
    WanYuan,
    /// Anything else, including an empty label
    Unrecognized(String),
}

impl UnitLabel {
    /// Canonical string form
    pub fn as_str(&self) -> &str {
        match self {
            UnitLabel::YuanPerWatt => "yuan-per-watt",
            UnitLabel::WanYuanPerMw => "wan-yuan-per-MW",
            UnitLabel::WanYuan => "wan-yuan",
            UnitLabel::Unrecognized(raw) => raw,
        }
    }

    /// Label as it appears on reports
    pub fn display_label(&self) -> &str {
        match self {
            UnitLabel::YuanPerWatt => "元/W",
            UnitLabel::WanYuanPerMw => "万元/MW",
            UnitLabel::WanYuan => "万元",
            UnitLabel::Unrecognized(raw) => raw,
        }
    }

    /// Whether a whole catalog may be priced in this unit
    pub fn is_catalog_unit(&self) -> bool {
        matches!(self, UnitLabel::YuanPerWatt | UnitLabel::WanYuanPerMw)
    }
}

impl From<&str> for UnitLabel {
    fn from(raw: &str) -> Self {
        match raw.trim() {
            "yuan-per-watt" | "元/W" => UnitLabel::YuanPerWatt,
            "wan-yuan-per-MW" | "万元/MW" => UnitLabel::WanYuanPerMw,
            "wan-yuan" | "万元" => UnitLabel::WanYuan,
            _ => UnitLabel::Unrecognized(raw.to_string()),
        }
    }
}

impl fmt::Display for UnitLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for UnitLabel {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for UnitLabel {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Ok(UnitLabel::from(raw.as_str()))
    }
}

/// Generation technology a catalog applies to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Technology {
    /// 集中式光伏
    #[serde(rename = "centralized-pv", alias = "集中式光伏")]
    CentralizedPv,
    /// 陆上风电
    #[serde(rename = "onshore-wind", alias = "陆上风电")]
    OnshoreWind,
}

impl Technology {
    pub const ALL: [Technology; 2] = [Technology::CentralizedPv, Technology::OnshoreWind];

    pub fn key(&self) -> &'static str {
        match self {
            Technology::CentralizedPv => "centralized-pv",
            Technology::OnshoreWind => "onshore-wind",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Technology::CentralizedPv => "集中式光伏",
            Technology::OnshoreWind => "陆上风电",
        }
    }
}

impl fmt::Display for Technology {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for Technology {
    type Err = CalcError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "centralized-pv" | "集中式光伏" => Ok(Technology::CentralizedPv),
            "onshore-wind" | "陆上风电" => Ok(Technology::OnshoreWind),
            other => Err(CalcError::InvalidInput {
                field: "technology",
                value: other.to_string(),
            }),
        }
    }
}

/// Technology-specific table of per-category unit costs
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CostCatalog {
    /// Technology this catalog prices
    pub technology: Technology,

    /// Unit shared by every entry in the catalog
    pub unit: UnitLabel,

    /// Category name -> unit cost, in catalog order
    pub items: IndexMap<String, Decimal>,

    /// Category name -> sub-item name -> unit cost.
    /// Used to seed per-project line items; not part of the rollup.
    #[serde(default)]
    pub details: IndexMap<String, IndexMap<String, Decimal>>,
}

impl CostCatalog {
    pub fn new(technology: Technology, unit: UnitLabel) -> Self {
        Self {
            technology,
            unit,
            items: IndexMap::new(),
            details: IndexMap::new(),
        }
    }

    /// Add a category with its unit cost
    pub fn with_item(mut self, category: impl Into<String>, unit_cost: Decimal) -> Self {
        self.items.insert(category.into(), unit_cost);
        self
    }

    /// Add a sub-item under an existing or future category
    pub fn with_detail(
        mut self,
        category: impl Into<String>,
        item: impl Into<String>,
        unit_cost: Decimal,
    ) -> Self {
        self.details
            .entry(category.into())
            .or_default()
            .insert(item.into(), unit_cost);
        self
    }

    /// Sum of all category unit costs
    pub fn unit_cost_total(&self) -> Result<Decimal, CalcError> {
        checked_sum("unit_cost", self.items.values().copied())
    }

    /// Check catalog invariants: catalog unit, non-negative costs, and
    /// detail groups that refer to known categories.
    pub fn validate(&self) -> Result<(), CalcError> {
        if !self.unit.is_catalog_unit() {
            return Err(CalcError::InvalidUnit {
                label: self.unit.as_str().to_string(),
            });
        }

        for (category, cost) in &self.items {
            if cost.is_sign_negative() && !cost.is_zero() {
                return Err(CalcError::InvalidCatalog(format!(
                    "{}: negative unit cost {} for {}",
                    self.technology, cost, category
                )));
            }
        }

        for (category, sub_items) in &self.details {
            if !self.items.contains_key(category) {
                return Err(CalcError::InvalidCatalog(format!(
                    "{}: details reference unknown category {}",
                    self.technology, category
                )));
            }
            if let Some((item, cost)) = sub_items
                .iter()
                .find(|(_, c)| c.is_sign_negative() && !c.is_zero())
            {
                return Err(CalcError::InvalidCatalog(format!(
                    "{}: negative unit cost {} for {}/{}",
                    self.technology, cost, category, item
                )));
            }
        }

        Ok(())
    }
}

/// One row of a project's own cost breakdown
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CostLineItem {
    /// Cost category, e.g. 设备费
    pub category: String,

    /// Item within the category, e.g. 逆变器
    pub item: String,

    /// Unit cost, interpreted through `unit`
    pub unit_cost: Decimal,

    /// Unit of `unit_cost`
    pub unit: UnitLabel,

    /// Free-form description
    #[serde(default)]
    pub description: Option<String>,

    /// False when the row was seeded from a catalog
    #[serde(default = "default_true")]
    pub is_custom: bool,

    /// Cached result of the last recompute, in 万元. Ignored on input.
    #[serde(default, skip_deserializing)]
    total_cost: Option<Decimal>,
}

fn default_true() -> bool {
    true
}

impl CostLineItem {
    /// Create a custom line item. Fails on a negative unit cost.
    pub fn new(
        category: impl Into<String>,
        item: impl Into<String>,
        unit_cost: Decimal,
        unit: UnitLabel,
    ) -> Result<Self, CalcError> {
        CalcError::ensure_non_negative("unit_cost", unit_cost)?;
        Ok(Self {
            category: category.into(),
            item: item.into(),
            unit_cost,
            unit,
            description: None,
            is_custom: true,
            total_cost: None,
        })
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Mark the row as seeded from a catalog
    pub fn seeded(mut self) -> Self {
        self.is_custom = false;
        self
    }

    /// Last computed total, if the item has been recomputed
    pub fn total_cost(&self) -> Option<Decimal> {
        self.total_cost
    }

    /// Store a freshly computed total. Only the cost evaluator calls this.
    pub fn set_computed_total(&mut self, total: Decimal) {
        self.total_cost = Some(total);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_unit_label_parsing() {
        assert_eq!(UnitLabel::from("yuan-per-watt"), UnitLabel::YuanPerWatt);
        assert_eq!(UnitLabel::from("元/W"), UnitLabel::YuanPerWatt);
        assert_eq!(UnitLabel::from("万元/MW"), UnitLabel::WanYuanPerMw);
        assert_eq!(UnitLabel::from("wan-yuan"), UnitLabel::WanYuan);
        assert_eq!(UnitLabel::from(""), UnitLabel::Unrecognized(String::new()));
        assert_eq!(
            UnitLabel::from("元/kW"),
            UnitLabel::Unrecognized("元/kW".to_string())
        );
    }

    #[test]
    fn test_unit_label_serde_round_trip() {
        let json = serde_json::to_string(&UnitLabel::WanYuanPerMw).unwrap();
        assert_eq!(json, "\"wan-yuan-per-MW\"");
        let legacy: UnitLabel = serde_json::from_str("\"元/W\"").unwrap();
        assert_eq!(legacy, UnitLabel::YuanPerWatt);
    }

    #[test]
    fn test_technology_parsing() {
        assert_eq!("陆上风电".parse::<Technology>().unwrap(), Technology::OnshoreWind);
        assert_eq!(
            "centralized-pv".parse::<Technology>().unwrap(),
            Technology::CentralizedPv
        );
        assert!("offshore-wind".parse::<Technology>().is_err());
    }

    #[test]
    fn test_catalog_unit_cost_total() {
        let catalog = CostCatalog::new(Technology::CentralizedPv, UnitLabel::YuanPerWatt)
            .with_item("设备费", dec!(1.72))
            .with_item("工程费", dec!(0.70))
            .with_item("其他费用", dec!(0.33));
        assert_eq!(catalog.unit_cost_total().unwrap(), dec!(2.75));
        assert!(catalog.validate().is_ok());
    }

    #[test]
    fn test_catalog_rejects_fixed_unit() {
        let catalog = CostCatalog::new(Technology::OnshoreWind, UnitLabel::WanYuan)
            .with_item("设备费", dec!(400));
        assert!(matches!(
            catalog.validate(),
            Err(CalcError::InvalidUnit { .. })
        ));
    }

    #[test]
    fn test_catalog_rejects_negative_cost() {
        let catalog = CostCatalog::new(Technology::OnshoreWind, UnitLabel::WanYuanPerMw)
            .with_item("设备费", dec!(-1));
        assert!(matches!(
            catalog.validate(),
            Err(CalcError::InvalidCatalog(_))
        ));
    }

    #[test]
    fn test_catalog_rejects_orphan_details() {
        let catalog = CostCatalog::new(Technology::OnshoreWind, UnitLabel::WanYuanPerMw)
            .with_item("设备费", dec!(400))
            .with_detail("运维费", "巡检", dec!(5));
        assert!(matches!(
            catalog.validate(),
            Err(CalcError::InvalidCatalog(_))
        ));
    }

    #[test]
    fn test_line_item_rejects_negative_cost() {
        assert!(CostLineItem::new("设备费", "逆变器", dec!(-0.15), UnitLabel::YuanPerWatt).is_err());
        let item = CostLineItem::new("设备费", "逆变器", dec!(0.15), UnitLabel::YuanPerWatt).unwrap();
        assert!(item.is_custom);
        assert_eq!(item.total_cost(), None);
    }

    #[test]
    fn test_line_item_total_is_never_read_from_input() {
        let item: CostLineItem = serde_json::from_str(
            r#"{"category": "其他费用", "item": "勘察设计", "unit_cost": "50", "unit": "万元", "total_cost": "999"}"#,
        )
        .unwrap();
        assert_eq!(item.unit, UnitLabel::WanYuan);
        assert!(item.is_custom);
        assert_eq!(item.total_cost(), None);
    }
}
