//! Corpus-relative fields: percentiles, tiers and value-for-money.
//!
//! Runs once over the finished record set; the per-candidate records are moved
//! into the enriched output unchanged.

use crate::features::stats::percentile_ranks;
use crate::models::features::{CorpusFeatures, EnrichedRecord, FeatureRecord};

/// Ordered bin edges with one label per bin. Every bin is `(lo, hi]`, so a
/// value equal to the lowest edge is unbinned.
#[derive(Debug, Clone, Copy)]
pub struct Tiers {
    pub edges: [f64; 5],
    pub labels: [&'static str; 4],
}

pub const VALUE_TIERS: Tiers = Tiers {
    edges: [0.0, 50.0, 70.0, 85.0, 100.0],
    labels: ["Low", "Medium", "High", "Excellent"],
};

pub const ENHANCED_VALUE_TIERS: Tiers = Tiers {
    edges: [0.0, 80.0, 110.0, 140.0, 162.0],
    labels: ["Low", "Medium", "High", "Excellent"],
};

pub const EXPERIENCE_TIERS: Tiers = Tiers {
    edges: [-1.0, 0.0, 2.0, 5.0, 20.0],
    labels: ["Entry", "Junior", "Mid", "Senior"],
};

pub const BUDGET_TIERS: Tiers = Tiers {
    edges: [0.0, 60_000.0, 100_000.0, 140_000.0, 300_000.0],
    labels: ["Budget", "Standard", "Premium", "Executive"],
};

impl Tiers {
    /// Label for `value`, or `None` outside every bin.
    pub fn classify(&self, value: f64) -> Option<&'static str> {
        self.edges
            .windows(2)
            .zip(self.labels)
            .find(|(w, _)| value > w[0] && value <= w[1])
            .map(|(_, label)| label)
    }
}

/// Score per thousand of expected salary. No salary means no ratio.
pub fn value_for_money(score: f64, salary: u64) -> f64 {
    if salary == 0 {
        0.0
    } else {
        score / (salary as f64 / 1000.0)
    }
}

pub fn post_process(records: Vec<FeatureRecord>) -> Vec<EnrichedRecord> {
    let column = |f: fn(&FeatureRecord) -> f64| -> Vec<f64> { records.iter().map(f).collect() };

    let score_pct = percentile_ranks(&column(|r| r.scores.overall_score));
    let enhanced_pct = percentile_ranks(&column(|r| r.scores.enhanced_overall_score));
    let salary_pct = percentile_ranks(&column(|r| r.salary.salary_full_time as f64));
    let prestige_pct = percentile_ranks(&column(|r| f64::from(r.experience.company_prestige_score)));

    records
        .into_iter()
        .enumerate()
        .map(|(i, record)| {
            let salary = record.salary.salary_full_time;
            let corpus = CorpusFeatures {
                score_percentile: score_pct[i],
                enhanced_score_percentile: enhanced_pct[i],
                salary_percentile: salary_pct[i],
                prestige_percentile: prestige_pct[i],
                value_tier: VALUE_TIERS.classify(record.scores.overall_score),
                enhanced_value_tier: ENHANCED_VALUE_TIERS
                    .classify(record.scores.enhanced_overall_score),
                experience_tier: EXPERIENCE_TIERS
                    .classify(record.experience.total_experiences as f64),
                budget_category: BUDGET_TIERS.classify(salary as f64),
                value_for_money: value_for_money(record.scores.overall_score, salary),
                enhanced_value_for_money: value_for_money(
                    record.scores.enhanced_overall_score,
                    salary,
                ),
            };
            EnrichedRecord { record, corpus }
        })
        .collect()
}
