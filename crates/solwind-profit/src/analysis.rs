//! Stored profit analysis records
//!
//! A record holds the last inputs and the result derived from them. The two
//! are only ever replaced together.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use solwind_common::{CalcError, ProfitInputs, ProfitResult, Roi};
use tracing::info;
use uuid::Uuid;

use crate::calculator::ProfitCalculator;

/// Profit analysis attached to one project
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProfitAnalysis {
    pub id: Uuid,
    pub project_id: i64,
    pub inputs: ProfitInputs,
    /// Catalog total for the project (万元). Reporting only.
    #[serde(default)]
    pub total_project_cost: Option<Decimal>,
    /// `None` until the first successful calculation
    #[serde(default)]
    pub result: Option<ProfitResult>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ProfitAnalysis {
    pub fn new(project_id: i64, inputs: ProfitInputs) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::now_v7(),
            project_id,
            inputs,
            total_project_cost: None,
            result: None,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn with_total_project_cost(mut self, total: Decimal) -> Self {
        self.total_project_cost = Some(total);
        self
    }

    /// Recompute from the stored inputs and the project's current capacity.
    ///
    /// On error the record is left exactly as it was.
    pub fn recalculate(
        &mut self,
        calculator: &ProfitCalculator,
        capacity_mw: Option<Decimal>,
    ) -> Result<&ProfitResult, CalcError> {
        let inputs = ProfitInputs {
            capacity_mw,
            ..self.inputs.clone()
        };
        let result = calculator.analyze(&inputs)?;

        self.inputs = inputs;
        self.updated_at = Utc::now();
        info!(project_id = self.project_id, analysis_id = %self.id, "profit analysis recalculated");
        Ok(self.result.insert(result))
    }

    /// Numeric ROI when calculated and applicable
    pub fn roi_percent(&self) -> Option<Decimal> {
        self.result.as_ref().and_then(|r| r.roi.as_percent())
    }

    pub fn summary(&self) -> AnalysisSummary {
        AnalysisSummary {
            project_id: self.project_id,
            capacity_mw: self.inputs.capacity_mw,
            total_project_cost: self.total_project_cost,
            commission_revenue: self.result.map(|r| r.commission_revenue),
            resource_share_revenue: self.result.map(|r| r.resource_share_revenue),
            total_revenue: self.result.map(|r| r.total_revenue),
            roi: self.result.map(|r| r.roi.to_string()),
            net_profit: self.result.map(|r| r.net_profit),
            updated_at: self.updated_at,
        }
    }
}

/// Flat view of an analysis for display and export
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisSummary {
    pub project_id: i64,
    pub capacity_mw: Option<Decimal>,
    pub total_project_cost: Option<Decimal>,
    pub commission_revenue: Option<Decimal>,
    pub resource_share_revenue: Option<Decimal>,
    pub total_revenue: Option<Decimal>,
    /// "12.50%" or "N/A"
    pub roi: Option<String>,
    pub net_profit: Option<Decimal>,
    pub updated_at: DateTime<Utc>,
}

impl AnalysisSummary {
    pub fn is_calculated(&self) -> bool {
        self.total_revenue.is_some()
    }
}

/// Whether a stored ROI counts towards a portfolio average
pub fn counts_towards_average(roi: &Roi) -> bool {
    matches!(roi, Roi::Percent(p) if *p > Decimal::ZERO)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn inputs() -> ProfitInputs {
        ProfitInputs {
            capacity_mw: None,
            dev_fee_rate: Some(dec!(0.1)),
            extra_investment: dec!(0),
            resource_fee_total: dec!(4000),
            own_cost: dec!(750),
        }
    }

    #[test]
    fn test_new_analysis_is_uncalculated() {
        let analysis = ProfitAnalysis::new(7, inputs());
        assert!(analysis.result.is_none());
        assert_eq!(analysis.created_at, analysis.updated_at);
        assert!(!analysis.summary().is_calculated());
    }

    #[test]
    fn test_recalculate_replaces_result() {
        let calc = ProfitCalculator::default();
        let mut analysis = ProfitAnalysis::new(7, inputs()).with_total_project_cost(dec!(27500));

        let result = *analysis.recalculate(&calc, Some(dec!(50))).unwrap();
        assert_eq!(result.commission_revenue, dec!(500.00));
        assert_eq!(result.resource_share_revenue, dec!(1000.00));
        assert_eq!(result.total_revenue, dec!(1500.00));
        assert_eq!(result.roi, Roi::Percent(dec!(100.00)));
        assert_eq!(analysis.inputs.capacity_mw, Some(dec!(50)));
        assert_eq!(analysis.roi_percent(), Some(dec!(100.00)));

        // Capacity change flows through every output
        let result = *analysis.recalculate(&calc, Some(dec!(100))).unwrap();
        assert_eq!(result.commission_revenue, dec!(1000.00));
        assert_eq!(result.total_revenue, dec!(2000.00));
        assert_eq!(result.net_profit, dec!(1250.00));
    }

    #[test]
    fn test_failed_recalculate_leaves_record_untouched() {
        let calc = ProfitCalculator::default();
        let mut analysis = ProfitAnalysis::new(7, inputs());
        analysis.recalculate(&calc, Some(dec!(50))).unwrap();
        let before = analysis.clone();

        assert_eq!(analysis.recalculate(&calc, None).unwrap_err(), CalcError::MissingCapacity);
        assert_eq!(analysis, before);
    }

    #[test]
    fn test_summary() {
        let calc = ProfitCalculator::default();
        let mut analysis = ProfitAnalysis::new(3, inputs().with_own_cost(dec!(0)));
        analysis.recalculate(&calc, Some(dec!(20))).unwrap();

        let summary = analysis.summary();
        assert!(summary.is_calculated());
        assert_eq!(summary.roi.as_deref(), Some("N/A"));
        assert_eq!(summary.total_revenue, Some(dec!(1200.00)));
    }

    #[test]
    fn test_counts_towards_average() {
        assert!(counts_towards_average(&Roi::Percent(dec!(12.5))));
        assert!(!counts_towards_average(&Roi::Percent(dec!(0))));
        assert!(!counts_towards_average(&Roi::Percent(dec!(-3))));
        assert!(!counts_towards_average(&Roi::NotApplicable));
    }

    #[test]
    fn test_record_round_trips_through_json() {
        let calc = ProfitCalculator::default();
        let mut analysis = ProfitAnalysis::new(9, inputs());
        analysis.recalculate(&calc, Some(dec!(10))).unwrap();

        let json = serde_json::to_string(&analysis).unwrap();
        let back: ProfitAnalysis = serde_json::from_str(&json).unwrap();
        assert_eq!(back, analysis);
    }
}
