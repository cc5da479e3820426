use std::path::Path;

use serde::Serialize;
use serde_json::Value;
use tracing::{info, warn};

use crate::dashboard::analytics::HIGH_SCORE_CUTOFF;
use crate::dashboard::table::CandidateTable;

/// Ceiling for the derived opportunity score.
const MAX_OPPORTUNITY_SCORE: f64 = 85.0;

/// Reads the pre-computed insights report. Absent or unparsable files are
/// logged and yield `None`.
pub fn load_report(path: &Path) -> Option<Value> {
    let text = match std::fs::read_to_string(path) {
        Ok(text) => text,
        Err(e) => {
            warn!("Insights report not loaded from {}: {e}", path.display());
            return None;
        }
    };
    match serde_json::from_str::<Value>(&text) {
        Ok(report) => {
            info!("Loaded insights report from {}", path.display());
            Some(report)
        }
        Err(e) => {
            warn!("Insights report at {} is not valid JSON: {e}", path.display());
            None
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ExecutiveSummary {
    pub total_candidates_analyzed: usize,
    pub high_value_opportunities: usize,
    pub global_talent_reach: usize,
    pub market_opportunity_score: f64,
    pub key_recommendation: &'static str,
}

#[derive(Debug, Clone, Serialize)]
pub struct Action {
    pub action: &'static str,
    pub priority: &'static str,
    pub description: String,
    pub timeline: &'static str,
}

#[derive(Debug, Clone, Serialize)]
pub struct Recommendations {
    pub immediate_actions: Vec<Action>,
}

#[derive(Debug, Clone, Serialize)]
pub struct DerivedInsights {
    pub executive_summary: ExecutiveSummary,
    pub actionable_recommendations: Recommendations,
}

/// Short executive summary computed from the table when no report was generated.
pub fn derive_insights(table: &CandidateTable) -> DerivedInsights {
    let total = table.len();
    let high_scores = table
        .rows
        .iter()
        .filter(|r| r.overall_score >= HIGH_SCORE_CUTOFF)
        .count();
    let countries = table.distinct_countries();
    let share = if table.is_empty() {
        0.0
    } else {
        high_scores as f64 / total as f64 * 100.0
    };

    DerivedInsights {
        executive_summary: ExecutiveSummary {
            total_candidates_analyzed: total,
            high_value_opportunities: high_scores,
            global_talent_reach: countries,
            market_opportunity_score: share.min(MAX_OPPORTUNITY_SCORE),
            key_recommendation:
                "Focus on geographic arbitrage and high-value candidates for optimal hiring strategy",
        },
        actionable_recommendations: Recommendations {
            immediate_actions: vec![
                Action {
                    action: "Focus on high-scoring candidates",
                    priority: "HIGH",
                    description: format!(
                        "Target the top {high_scores} candidates with scores above {HIGH_SCORE_CUTOFF} for immediate interviews"
                    ),
                    timeline: "1-2 weeks",
                },
                Action {
                    action: "Geographic diversification",
                    priority: "MEDIUM",
                    description: format!(
                        "Expand search across {countries} available countries to build diverse teams"
                    ),
                    timeline: "2-4 weeks",
                },
            ],
        },
    }
}
