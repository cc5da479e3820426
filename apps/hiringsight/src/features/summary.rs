//! Dataset-level summary document written next to the feature table.

use indexmap::IndexMap;
use serde::Serialize;

use crate::features::stats::{grouped_means, mean, median, ordered_counts, round2, sample_std};
use crate::models::features::{EnrichedRecord, NONE_LABEL};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DatasetSummary {
    pub total_candidates: usize,
    pub avg_overall_score: f64,
    pub avg_enhanced_score: f64,
    pub score_std: f64,
    pub countries_represented: usize,
    pub avg_salary: f64,
    pub median_salary: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TopBands {
    pub top_10_percent: usize,
    pub top_25_percent: usize,
    pub top_50_percent: usize,
}

impl TopBands {
    fn from_percentiles(pcts: impl Iterator<Item = f64> + Clone) -> Self {
        let at_least = |cut: f64| pcts.clone().filter(|p| *p >= cut).count();
        Self {
            top_10_percent: at_least(90.0),
            top_25_percent: at_least(75.0),
            top_50_percent: at_least(50.0),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoreDistribution {
    pub basic_scoring: TopBands,
    pub enhanced_scoring: TopBands,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SalaryStatistics {
    pub by_experience: IndexMap<String, f64>,
    pub by_country: IndexMap<String, f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SummaryReport {
    pub dataset_summary: DatasetSummary,
    pub score_distribution: ScoreDistribution,
    pub geographic_distribution: IndexMap<String, usize>,
    pub experience_distribution: IndexMap<String, usize>,
    pub skill_category_distribution: IndexMap<String, usize>,
    pub salary_statistics: SalaryStatistics,
    pub top_skills: Vec<(String, usize)>,
}

const TOP_COUNTRIES: usize = 10;
const TOP_SKILLS: usize = 20;

/// Group means with keys sorted lexicographically.
fn sorted_means<'a>(pairs: impl Iterator<Item = (&'a str, f64)>) -> IndexMap<String, f64> {
    let mut means = grouped_means(pairs);
    means.sort_keys();
    means
}

pub fn build_summary(records: &[EnrichedRecord]) -> SummaryReport {
    let overall: Vec<f64> = records.iter().map(|e| e.record.scores.overall_score).collect();
    let enhanced: Vec<f64> = records
        .iter()
        .map(|e| e.record.scores.enhanced_overall_score)
        .collect();
    let salaries: Vec<f64> = records
        .iter()
        .map(|e| e.record.salary.salary_full_time as f64)
        .collect();

    let countries = ordered_counts(records.iter().map(|e| e.record.location.country.as_str()));

    let dataset_summary = DatasetSummary {
        total_candidates: records.len(),
        avg_overall_score: round2(mean(&overall)),
        avg_enhanced_score: round2(mean(&enhanced)),
        score_std: round2(sample_std(&overall)),
        countries_represented: countries.len(),
        avg_salary: round2(mean(&salaries)),
        median_salary: round2(median(&salaries)),
    };

    let score_distribution = ScoreDistribution {
        basic_scoring: TopBands::from_percentiles(records.iter().map(|e| e.corpus.score_percentile)),
        enhanced_scoring: TopBands::from_percentiles(
            records.iter().map(|e| e.corpus.enhanced_score_percentile),
        ),
    };

    let by_experience = sorted_means(records.iter().map(|e| {
        (
            e.record.scores.experience_level.as_str(),
            e.record.salary.salary_full_time as f64,
        )
    }));
    let mut by_country = sorted_means(records.iter().map(|e| {
        (
            e.record.location.country.as_str(),
            e.record.salary.salary_full_time as f64,
        )
    }));
    by_country.truncate(TOP_COUNTRIES);

    let mut top_skills = ordered_counts(
        records
            .iter()
            .flat_map(|e| e.record.original_skills.iter().map(String::as_str)),
    );
    top_skills.truncate(TOP_SKILLS);
    let top_skills: Vec<(String, usize)> = top_skills.into_iter().collect();

    let mut geographic = countries;
    geographic.truncate(TOP_COUNTRIES);

    SummaryReport {
        dataset_summary,
        score_distribution,
        geographic_distribution: geographic,
        experience_distribution: ordered_counts(
            records
                .iter()
                .map(|e| e.record.scores.experience_level.as_str()),
        ),
        skill_category_distribution: ordered_counts(records.iter().map(|e| {
            e.record
                .skills
                .primary_skill_category
                .map(|c| c.as_str())
                .unwrap_or(NONE_LABEL)
        })),
        salary_statistics: SalaryStatistics {
            by_experience,
            by_country,
        },
        top_skills,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::location::TableResolver;
    use crate::features::pipeline::FeatureEngineer;
    use crate::features::post_process::post_process;
    use crate::features::taxonomy::Taxonomy;
    use serde_json::json;
    use std::sync::Arc;

    fn enriched(input: Vec<serde_json::Value>) -> Vec<EnrichedRecord> {
        let taxonomy = Arc::new(Taxonomy::default());
        let engineer = FeatureEngineer::new(
            Arc::clone(&taxonomy),
            Box::new(TableResolver::new(&taxonomy)),
        );
        post_process(engineer.engineer_all(&input).records)
    }

    #[test]
    fn test_summary_counts_and_rounding() {
        let records = enriched(vec![
            json!({"location": "Berlin, Germany", "skills": ["Python", "SQL"],
                   "annual_salary_expectation": {"full-time": "$100,000"}}),
            json!({"location": "Toronto, Canada", "skills": ["Python"],
                   "annual_salary_expectation": {"full-time": "$50,000"}}),
            json!({"location": "Munich, Germany", "skills": ["React"]}),
        ]);
        let summary = build_summary(&records);

        assert_eq!(summary.dataset_summary.total_candidates, 3);
        assert_eq!(summary.dataset_summary.countries_represented, 2);
        assert_eq!(summary.dataset_summary.avg_salary, 50_000.0);
        assert_eq!(summary.dataset_summary.median_salary, 50_000.0);
        assert_eq!(
            summary.geographic_distribution.into_iter().collect::<Vec<_>>(),
            vec![("Germany".to_string(), 2), ("Canada".to_string(), 1)]
        );
        assert_eq!(summary.top_skills[0], ("Python".to_string(), 2));
        assert_eq!(
            summary.salary_statistics.by_country.into_iter().collect::<Vec<_>>(),
            vec![("Canada".to_string(), 50_000.0), ("Germany".to_string(), 50_000.0)]
        );
    }

    #[test]
    fn test_summary_serializes_maps_in_order() {
        let records = enriched(vec![
            json!({"location": "Paris, France"}),
            json!({"location": "Lima, Peru"}),
            json!({"location": "Lima, Peru"}),
        ]);
        let value = serde_json::to_value(build_summary(&records)).unwrap();
        let keys: Vec<&String> = value["geographic_distribution"]
            .as_object()
            .unwrap()
            .keys()
            .collect();
        assert_eq!(keys, vec!["Peru", "France"]);
        assert_eq!(value["top_skills"], json!([]));
        assert_eq!(value["skill_category_distribution"]["None"], json!(3));
    }

    #[test]
    fn test_summary_of_empty_table() {
        let summary = build_summary(&[]);
        assert_eq!(summary.dataset_summary.total_candidates, 0);
        assert_eq!(summary.dataset_summary.score_std, 0.0);
        assert_eq!(summary.score_distribution.basic_scoring.top_50_percent, 0);
    }
}
