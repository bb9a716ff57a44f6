//! # Portfolio
//!
//! Dashboard indicators across every project: capacity, investment,
//! revenue, profit, average ROI, and counts by stage, technology and manager.

pub mod kpis;

pub use kpis::{GroupStats, PortfolioKpis, RECENT_WINDOW_DAYS};

use serde::{Deserialize, Serialize};
use solwind_common::{ProjectRecord, Result, SolwindError};
use solwind_profit::ProfitAnalysis;

/// A project together with its stored profit analysis, if any
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PortfolioEntry {
    pub project: ProjectRecord,
    #[serde(default)]
    pub analysis: Option<ProfitAnalysis>,
}

impl PortfolioEntry {
    pub fn new(project: ProjectRecord) -> Self {
        Self {
            project,
            analysis: None,
        }
    }

    pub fn with_analysis(mut self, analysis: ProfitAnalysis) -> Self {
        self.analysis = Some(analysis);
        self
    }
}

/// Parse a JSON array of portfolio entries.
///
/// An analysis must belong to the project it is attached to.
pub fn entries_from_json(content: &str) -> Result<Vec<PortfolioEntry>> {
    let entries: Vec<PortfolioEntry> = serde_json::from_str(content)?;
    for entry in &entries {
        if let Some(analysis) = &entry.analysis {
            if analysis.project_id != entry.project.id {
                return Err(SolwindError::Serialization(format!(
                    "analysis {} belongs to project {}, attached to project {}",
                    analysis.id, analysis.project_id, entry.project.id
                )));
            }
        }
    }
    Ok(entries)
}
