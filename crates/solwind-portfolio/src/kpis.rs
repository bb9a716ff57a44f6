//! Dashboard KPI aggregation

use std::collections::BTreeMap;

use chrono::{DateTime, Duration, Utc};
use indexmap::IndexMap;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use solwind_common::money::{checked_add, checked_div, checked_sum, round_money};
use solwind_common::{ProjectStage, Result, Technology};
use solwind_costing::CostingService;
use solwind_profit::analysis::counts_towards_average;
use tracing::{debug, instrument};

use crate::PortfolioEntry;

/// Window for the "recent projects" count
pub const RECENT_WINDOW_DAYS: i64 = 30;

/// Count and installed capacity for one group of projects
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupStats {
    pub count: usize,
    /// MW
    pub capacity_mw: Decimal,
}

impl GroupStats {
    fn add(&mut self, capacity_mw: Decimal) -> Result<()> {
        self.count += 1;
        self.capacity_mw = checked_add("capacity_mw", self.capacity_mw, capacity_mw)?;
        Ok(())
    }
}

/// Portfolio-wide indicators
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PortfolioKpis {
    pub total_projects: usize,
    /// MW, 1 decimal place
    pub total_capacity_mw: Decimal,
    /// Σ catalog total cost (万元)
    pub total_investment: Decimal,
    /// Σ total revenue of calculated analyses (万元)
    pub total_revenue: Decimal,
    /// Σ net profit of calculated analyses (万元)
    pub total_net_profit: Decimal,
    /// Mean of positive ROIs (%); 0 when there are none
    pub average_roi: Decimal,
    /// Every stage is present, even at 0
    pub stage_counts: BTreeMap<ProjectStage, usize>,
    pub technology_stats: BTreeMap<Technology, GroupStats>,
    /// Keyed by manager name, in order of first appearance
    pub manager_stats: IndexMap<String, GroupStats>,
    pub projects_with_analysis: usize,
    /// Created within [`RECENT_WINDOW_DAYS`] of `as_of`
    pub recent_projects: usize,
    pub as_of: DateTime<Utc>,
}

impl PortfolioKpis {
    /// Aggregate KPIs over `entries`.
    ///
    /// Projects without a positive capacity contribute no investment, revenue,
    /// profit or ROI. A technology with no catalog contributes no investment.
    #[instrument(skip(entries, costing), fields(projects = entries.len()))]
    pub fn compute(entries: &[PortfolioEntry], costing: &CostingService, as_of: DateTime<Utc>) -> Result<Self> {
        let recent_cutoff = as_of - Duration::days(RECENT_WINDOW_DAYS);

        let mut stage_counts: BTreeMap<ProjectStage, usize> =
            ProjectStage::ALL.iter().map(|stage| (*stage, 0)).collect();
        let mut technology_stats: BTreeMap<Technology, GroupStats> = BTreeMap::new();
        let mut manager_stats: IndexMap<String, GroupStats> = IndexMap::new();

        let mut total_capacity = Decimal::ZERO;
        let mut total_investment = Decimal::ZERO;
        let mut total_revenue = Decimal::ZERO;
        let mut total_net_profit = Decimal::ZERO;
        let mut roi_values: Vec<Decimal> = Vec::new();
        let mut projects_with_analysis = 0;
        let mut recent_projects = 0;

        for entry in entries {
            let project = &entry.project;
            let capacity = project.capacity_mw.unwrap_or(Decimal::ZERO);
            total_capacity = checked_add("capacity_mw", total_capacity, capacity)?;

            *stage_counts.entry(project.stage).or_insert(0) += 1;
            technology_stats.entry(project.technology).or_default().add(capacity)?;
            if let Some(manager) = &project.manager {
                manager_stats.entry(manager.clone()).or_default().add(capacity)?;
            }
            if project.created_at >= recent_cutoff {
                recent_projects += 1;
            }
            if entry.analysis.is_some() {
                projects_with_analysis += 1;
            }

            let Some(capacity) = project.positive_capacity() else {
                continue;
            };

            if let Some(catalog) = costing.registry().get(project.technology) {
                let cost = costing.evaluator().total_cost(catalog, capacity)?;
                total_investment = checked_add("total_investment", total_investment, cost)?;
            } else {
                debug!(project_id = project.id, technology = %project.technology, "no catalog, skipping investment");
            }

            if let Some(result) = entry.analysis.as_ref().and_then(|a| a.result.as_ref()) {
                total_revenue = checked_add("total_revenue", total_revenue, result.total_revenue)?;
                total_net_profit = checked_add("net_profit", total_net_profit, result.net_profit)?;
                if counts_towards_average(&result.roi) {
                    roi_values.extend(result.roi.as_percent());
                }
            }
        }

        let average_roi = if roi_values.is_empty() {
            round_money(Decimal::ZERO)
        } else {
            let count = Decimal::from(roi_values.len());
            round_money(checked_div("roi", checked_sum("roi", roi_values)?, count)?)
        };

        Ok(Self {
            total_projects: entries.len(),
            total_capacity_mw: total_capacity.round_dp_with_strategy(1, RoundingStrategy::MidpointAwayFromZero),
            total_investment: round_money(total_investment),
            total_revenue: round_money(total_revenue),
            total_net_profit: round_money(total_net_profit),
            average_roi,
            stage_counts,
            technology_stats,
            manager_stats,
            projects_with_analysis,
            recent_projects,
            as_of,
        })
    }
}
