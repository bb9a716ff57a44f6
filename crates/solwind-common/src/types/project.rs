//! Project records as handed over by the persistence layer

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::cost::Technology;

/// Lifecycle stage of a project
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProjectStage {
    /// 机会挖掘
    #[default]
    #[serde(alias = "机会挖掘")]
    Opportunity,
    /// 前期开发
    #[serde(alias = "前期开发")]
    Development,
    /// 投资决策
    #[serde(alias = "投资决策")]
    InvestmentDecision,
    /// 建设执行
    #[serde(alias = "建设执行")]
    Construction,
    /// 并网运营
    #[serde(alias = "并网运营")]
    Operation,
}

impl ProjectStage {
    pub const ALL: [ProjectStage; 5] = [
        ProjectStage::Opportunity,
        ProjectStage::Development,
        ProjectStage::InvestmentDecision,
        ProjectStage::Construction,
        ProjectStage::Operation,
    ];

    pub fn display_name(&self) -> &'static str {
        match self {
            ProjectStage::Opportunity => "机会挖掘",
            ProjectStage::Development => "前期开发",
            ProjectStage::InvestmentDecision => "投资决策",
            ProjectStage::Construction => "建设执行",
            ProjectStage::Operation => "并网运营",
        }
    }
}

/// Core project attributes consumed by the calculators
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectRecord {
    /// Persistence id
    pub id: i64,

    /// Unique project name
    pub name: String,

    /// Generation technology
    pub technology: Technology,

    /// Installed capacity (MW)
    #[serde(default)]
    pub capacity_mw: Option<Decimal>,

    /// Current lifecycle stage
    #[serde(default)]
    pub stage: ProjectStage,

    /// Managing user name
    #[serde(default)]
    pub manager: Option<String>,

    /// Creation timestamp
    pub created_at: DateTime<Utc>,
}

impl ProjectRecord {
    pub fn new(id: i64, name: impl Into<String>, technology: Technology, capacity_mw: Decimal) -> Self {
        Self {
            id,
            name: name.into(),
            technology,
            capacity_mw: Some(capacity_mw),
            stage: ProjectStage::default(),
            manager: None,
            created_at: Utc::now(),
        }
    }

    pub fn with_stage(mut self, stage: ProjectStage) -> Self {
        self.stage = stage;
        self
    }

    pub fn with_manager(mut self, manager: impl Into<String>) -> Self {
        self.manager = Some(manager.into());
        self
    }

    pub fn with_created_at(mut self, created_at: DateTime<Utc>) -> Self {
        self.created_at = created_at;
        self
    }

    /// Capacity if present and positive
    pub fn positive_capacity(&self) -> Option<Decimal> {
        self.capacity_mw.filter(|c| *c > Decimal::ZERO)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_stage_aliases() {
        let stage: ProjectStage = serde_json::from_str("\"建设执行\"").unwrap();
        assert_eq!(stage, ProjectStage::Construction);
        let stage: ProjectStage = serde_json::from_str("\"operation\"").unwrap();
        assert_eq!(stage, ProjectStage::Operation);
    }

    #[test]
    fn test_new_projects_start_as_opportunities() {
        assert_eq!(ProjectStage::default(), ProjectStage::Opportunity);
        let project = ProjectRecord::new(1, "a", Technology::OnshoreWind, dec!(10));
        assert_eq!(project.stage, ProjectStage::Opportunity);
    }

    #[test]
    fn test_positive_capacity() {
        let project = ProjectRecord::new(1, "测试光伏项目A", Technology::CentralizedPv, dec!(100));
        assert_eq!(project.positive_capacity(), Some(dec!(100)));

        let mut empty = project.clone();
        empty.capacity_mw = Some(dec!(0));
        assert_eq!(empty.positive_capacity(), None);
    }
}
