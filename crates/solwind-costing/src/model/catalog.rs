//! Catalog registry
//!
//! Holds one catalog per technology. Starts from the built-in reference
//! catalogs; admins may replace them or load a JSON file of catalogs.

use std::collections::BTreeMap;
use std::path::Path;

use rust_decimal_macros::dec;
use solwind_common::{CostCatalog, Result, SolwindError, Technology, UnitLabel};
use tracing::info;

/// Catalogs keyed by technology
#[derive(Debug, Clone, PartialEq)]
pub struct CatalogRegistry {
    catalogs: BTreeMap<Technology, CostCatalog>,
}

impl CatalogRegistry {
    /// Registry with no catalogs
    pub fn empty() -> Self {
        Self {
            catalogs: BTreeMap::new(),
        }
    }

    /// Registry seeded with the reference PV and wind catalogs
    pub fn builtin() -> Self {
        let mut registry = Self::empty();
        for catalog in [Self::centralized_pv(), Self::onshore_wind()] {
            registry.catalogs.insert(catalog.technology, catalog);
        }
        registry
    }

    /// Load catalogs from a JSON array file. The file replaces the built-ins.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            SolwindError::Config(format!("Failed to read catalog file {}: {}", path.display(), e))
        })?;
        let registry = Self::from_json_str(&content)?;
        info!(path = %path.display(), count = registry.len(), "loaded cost catalogs");
        Ok(registry)
    }

    /// Parse catalogs from a JSON array
    pub fn from_json_str(content: &str) -> Result<Self> {
        let catalogs: Vec<CostCatalog> = serde_json::from_str(content)?;
        let mut registry = Self::empty();
        for catalog in catalogs {
            registry.upsert(catalog)?;
        }
        Ok(registry)
    }

    /// Insert or replace the catalog for its technology after validating it
    pub fn upsert(&mut self, catalog: CostCatalog) -> Result<Option<CostCatalog>> {
        catalog.validate()?;
        Ok(self.catalogs.insert(catalog.technology, catalog))
    }

    pub fn get(&self, technology: Technology) -> Option<&CostCatalog> {
        self.catalogs.get(&technology)
    }

    /// Catalog for `technology`, or `NotFound`
    pub fn require(&self, technology: Technology) -> Result<&CostCatalog> {
        self.get(technology)
            .ok_or_else(|| SolwindError::NotFound(format!("cost catalog for {}", technology)))
    }

    pub fn iter(&self) -> impl Iterator<Item = &CostCatalog> {
        self.catalogs.values()
    }

    pub fn len(&self) -> usize {
        self.catalogs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.catalogs.is_empty()
    }

    /// 集中式光伏, priced in 元/W
    pub fn centralized_pv() -> CostCatalog {
        CostCatalog::new(Technology::CentralizedPv, UnitLabel::YuanPerWatt)
            .with_item("设备费", dec!(1.72))
            .with_item("工程费", dec!(0.70))
            .with_item("其他费用", dec!(0.33))
            .with_detail("设备费", "光伏组件", dec!(1.10))
            .with_detail("设备费", "逆变器", dec!(0.15))
            .with_detail("设备费", "支架", dec!(0.25))
            .with_detail("设备费", "箱变、开关柜", dec!(0.10))
            .with_detail("设备费", "电缆", dec!(0.12))
            .with_detail("工程费", "建安工程(含桩基)", dec!(0.50))
            .with_detail("工程费", "送出线路工程", dec!(0.20))
            .with_detail("其他费用", "土地费用/租金", dec!(0.18))
            .with_detail("其他费用", "项目前期费", dec!(0.05))
            .with_detail("其他费用", "管理费", dec!(0.10))
    }

    /// 陆上风电, priced in 万元/MW
    pub fn onshore_wind() -> CostCatalog {
        CostCatalog::new(Technology::OnshoreWind, UnitLabel::WanYuanPerMw)
            .with_item("设备费", dec!(400))
            .with_item("工程费", dec!(170))
            .with_item("其他费用", dec!(60))
            .with_detail("设备费", "风力发电机组", dec!(280))
            .with_detail("设备费", "塔筒", dec!(80))
            .with_detail("设备费", "箱变、主变", dec!(40))
            .with_detail("工程费", "道路与基础工程", dec!(90))
            .with_detail("工程费", "安装与吊装工程", dec!(50))
            .with_detail("工程费", "集电线路工程", dec!(30))
            .with_detail("其他费用", "土地征用/租金", dec!(20))
            .with_detail("其他费用", "项目前期费", dec!(15))
            .with_detail("其他费用", "管理与并网费", dec!(25))
    }
}

impl Default for CatalogRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}
