//! Aggregate views computed from the loaded table on each request.

use std::collections::{BTreeMap, BTreeSet};

use indexmap::IndexMap;
use serde::Serialize;

use crate::dashboard::table::{CandidateTable, GENERAL_CATEGORY, UNKNOWN};
use crate::features::stats::{mean, median, ordered_counts, quantile};
use crate::models::table::{parse_skills, CandidateRow};

pub const HIGH_SCORE_CUTOFF: f64 = 80.0;
const HIGH_VALUE_MAX_SALARY: u64 = 100_000;
const SALARY_SCORE_POINTS: usize = 100;
const TOP_SKILLS: usize = 20;
const MIN_COUNTRY_GROUP: usize = 3;
const MAX_COUNTRY_OPTIONS: usize = 50;
const MAX_CATEGORY_OPTIONS: usize = 20;
/// Salary bounds reported when no candidate has a salary.
const DEFAULT_SALARY_RANGE: (f64, f64) = (0.0, 200_000.0);

// ── Overview ───────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize)]
pub struct Overview {
    pub total_candidates: usize,
    pub average_score: f64,
    pub countries: usize,
    pub high_value_candidates: usize,
    pub skill_distribution: IndexMap<String, usize>,
    pub geographic_distribution: IndexMap<String, usize>,
    pub experience_distribution: IndexMap<String, usize>,
    pub last_updated: Option<String>,
}

pub fn is_high_value(row: &CandidateRow) -> bool {
    row.overall_score >= HIGH_SCORE_CUTOFF && row.salary_full_time < HIGH_VALUE_MAX_SALARY
}

pub fn overview(table: &CandidateTable) -> Overview {
    let rows = &table.rows;
    let scores: Vec<f64> = rows.iter().map(|r| r.overall_score).collect();

    let mut skills = ordered_counts(rows.iter().map(|r| r.primary_skill_category.as_str()));
    skills.truncate(10);

    Overview {
        total_candidates: rows.len(),
        average_score: mean(&scores),
        countries: table.distinct_countries(),
        high_value_candidates: rows.iter().filter(|r| is_high_value(r)).count(),
        skill_distribution: skills,
        geographic_distribution: ordered_counts(rows.iter().map(|r| r.continent.as_str())),
        experience_distribution: ordered_counts(rows.iter().map(|r| r.experience_level.as_str())),
        last_updated: table
            .last_updated
            .map(|t| t.format("%Y-%m-%d").to_string()),
    }
}

// ── Market analytics ───────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize)]
pub struct SalaryScorePoint {
    pub overall_score: f64,
    pub salary_full_time: u64,
    pub name: String,
    pub country: String,
    pub primary_skill_category: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CountryStats {
    pub avg_score: f64,
    pub avg_salary: f64,
    pub candidate_count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SalaryRanges {
    pub min: f64,
    pub max: f64,
    pub median: f64,
    pub q1: f64,
    pub q3: f64,
    pub mean: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct MarketInsights {
    pub total_countries: usize,
    pub avg_skills_per_candidate: f64,
    pub big_tech_percentage: f64,
    pub total_candidates_with_salary: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct MarketAnalytics {
    pub salary_score_data: Vec<SalaryScorePoint>,
    pub high_demand_skills: IndexMap<String, usize>,
    pub country_statistics: IndexMap<String, CountryStats>,
    pub skill_distribution: IndexMap<String, usize>,
    pub experience_distribution: IndexMap<String, usize>,
    pub salary_ranges: Option<SalaryRanges>,
    pub market_insights: MarketInsights,
}

/// Per-country averages for countries with at least three candidates, in
/// lexicographic order. The salary mean ignores candidates without one.
fn country_statistics(rows: &[CandidateRow]) -> IndexMap<String, CountryStats> {
    let mut groups: BTreeMap<&str, Vec<&CandidateRow>> = BTreeMap::new();
    for row in rows.iter().filter(|r| r.country != UNKNOWN) {
        groups.entry(row.country.as_str()).or_default().push(row);
    }

    groups
        .into_iter()
        .filter(|(_, group)| group.len() >= MIN_COUNTRY_GROUP)
        .map(|(country, group)| {
            let scores: Vec<f64> = group.iter().map(|r| r.overall_score).collect();
            let salaries: Vec<f64> = group
                .iter()
                .filter(|r| r.salary_full_time > 0)
                .map(|r| r.salary_full_time as f64)
                .collect();
            (
                country.to_string(),
                CountryStats {
                    avg_score: mean(&scores),
                    avg_salary: mean(&salaries),
                    candidate_count: group.len(),
                },
            )
        })
        .collect()
}

fn salary_ranges(salaries: &[f64]) -> Option<SalaryRanges> {
    if salaries.is_empty() {
        return None;
    }
    Some(SalaryRanges {
        min: salaries.iter().copied().fold(f64::INFINITY, f64::min),
        max: salaries.iter().copied().fold(f64::NEG_INFINITY, f64::max),
        median: median(salaries),
        q1: quantile(salaries, 0.25),
        q3: quantile(salaries, 0.75),
        mean: mean(salaries),
    })
}

pub fn market_analytics(table: &CandidateTable) -> MarketAnalytics {
    let rows = &table.rows;
    let priced: Vec<&CandidateRow> = rows
        .iter()
        .filter(|r| r.salary_full_time > 0 && r.overall_score > 0.0)
        .collect();

    let salary_score_data = priced
        .iter()
        .take(SALARY_SCORE_POINTS)
        .map(|r| SalaryScorePoint {
            overall_score: r.overall_score,
            salary_full_time: r.salary_full_time,
            name: r.name.clone(),
            country: r.country.clone(),
            primary_skill_category: r.primary_skill_category.clone(),
        })
        .collect();

    let mut skills = ordered_counts(rows.iter().flat_map(|r| parse_skills(&r.original_skills)));
    skills.truncate(TOP_SKILLS);

    let country_statistics = country_statistics(rows);

    let salaries: Vec<f64> = priced.iter().map(|r| r.salary_full_time as f64).collect();
    let total_skills: Vec<f64> = rows.iter().map(|r| r.total_skills as f64).collect();
    let big_tech_percentage = if rows.is_empty() {
        0.0
    } else {
        rows.iter().filter(|r| r.has_big_tech).count() as f64 / rows.len() as f64 * 100.0
    };

    MarketAnalytics {
        salary_score_data,
        high_demand_skills: skills,
        market_insights: MarketInsights {
            total_countries: country_statistics.len(),
            avg_skills_per_candidate: mean(&total_skills),
            big_tech_percentage,
            total_candidates_with_salary: priced.len(),
        },
        country_statistics,
        skill_distribution: ordered_counts(
            rows.iter()
                .map(|r| r.primary_skill_category.as_str())
                .filter(|c| *c != GENERAL_CATEGORY && *c != UNKNOWN),
        ),
        experience_distribution: ordered_counts(
            rows.iter()
                .map(|r| r.experience_level.as_str())
                .filter(|l| *l != UNKNOWN),
        ),
        salary_ranges: salary_ranges(&salaries),
    }
}

// ── Filter options ─────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Range {
    pub min: f64,
    pub max: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct FilterOptions {
    pub countries: Vec<String>,
    pub skill_categories: Vec<String>,
    pub experience_levels: Vec<String>,
    pub score_range: Range,
    pub salary_range: Range,
}

fn sorted_distinct<'a>(values: impl Iterator<Item = &'a str>, limit: usize) -> Vec<String> {
    values
        .collect::<BTreeSet<_>>()
        .into_iter()
        .take(limit)
        .map(String::from)
        .collect()
}

pub fn filter_options(table: &CandidateTable) -> FilterOptions {
    let rows = &table.rows;

    let scores: Vec<f64> = rows.iter().map(|r| r.overall_score).collect();
    let score_range = Range {
        min: scores.iter().copied().fold(f64::INFINITY, f64::min),
        max: scores.iter().copied().fold(f64::NEG_INFINITY, f64::max),
    };
    let score_range = if scores.is_empty() {
        Range { min: 0.0, max: 0.0 }
    } else {
        score_range
    };

    let salaries: Vec<u64> = rows
        .iter()
        .map(|r| r.salary_full_time)
        .filter(|s| *s > 0)
        .collect();
    let salary_range = match (salaries.iter().min(), salaries.iter().max()) {
        (Some(min), Some(max)) => Range {
            min: *min as f64,
            max: *max as f64,
        },
        _ => Range {
            min: DEFAULT_SALARY_RANGE.0,
            max: DEFAULT_SALARY_RANGE.1,
        },
    };

    FilterOptions {
        countries: sorted_distinct(
            rows.iter()
                .map(|r| r.country.as_str())
                .filter(|c| *c != UNKNOWN),
            MAX_COUNTRY_OPTIONS,
        ),
        skill_categories: sorted_distinct(
            rows.iter()
                .map(|r| r.primary_skill_category.as_str())
                .filter(|c| *c != GENERAL_CATEGORY),
            MAX_CATEGORY_OPTIONS,
        ),
        experience_levels: sorted_distinct(
            rows.iter().map(|r| r.experience_level.as_str()),
            usize::MAX,
        ),
        score_range,
        salary_range,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dashboard::table::fixtures::row;

    fn table() -> CandidateTable {
        let mut rows = vec![
            row(0, "A", "Germany", 90.0, 80_000),
            row(1, "B", "Germany", 50.0, 0),
            row(2, "C", "Germany", 70.0, 120_000),
            row(3, "D", "India", 85.0, 30_000),
            row(4, "E", "Unknown", 0.0, 50_000),
        ];
        rows[0].original_skills = "Python, SQL".to_string();
        rows[3].original_skills = "Python".to_string();
        rows[3].has_big_tech = true;
        rows[4].primary_skill_category = "None".to_string();
        CandidateTable::from_rows(rows)
    }

    #[test]
    fn test_overview_counts_high_value() {
        let o = overview(&table());
        assert_eq!(o.total_candidates, 5);
        assert_eq!(o.countries, 3);
        // A (90, 80k) and D (85, 30k).
        assert_eq!(o.high_value_candidates, 2);
        assert!((o.average_score - 59.0).abs() < 1e-9);
        assert_eq!(o.last_updated, None);
    }

    #[test]
    fn test_market_analytics() {
        let m = market_analytics(&table());
        // E has score 0 and B no salary.
        assert_eq!(m.salary_score_data.len(), 3);
        assert_eq!(m.high_demand_skills.get_index(0), Some((&"Python".to_string(), &2)));
        assert_eq!(
            m.country_statistics.into_iter().collect::<Vec<_>>(),
            vec![(
                "Germany".to_string(),
                CountryStats {
                    avg_score: 70.0,
                    avg_salary: 100_000.0,
                    candidate_count: 3
                }
            )]
        );
        assert_eq!(m.market_insights.total_countries, 1);
        assert!((m.market_insights.big_tech_percentage - 20.0).abs() < 1e-9);
        let ranges = m.salary_ranges.unwrap();
        assert_eq!(ranges.min, 30_000.0);
        assert_eq!(ranges.median, 80_000.0);
        assert_eq!(ranges.q1, 55_000.0);
        assert!(!m.skill_distribution.contains_key(GENERAL_CATEGORY));
    }

    #[test]
    fn test_filter_options() {
        let f = filter_options(&table());
        assert_eq!(f.countries, vec!["Germany", "India"]);
        assert_eq!(f.skill_categories, vec!["backend"]);
        assert_eq!(f.score_range, Range { min: 0.0, max: 90.0 });
        assert_eq!(
            f.salary_range,
            Range {
                min: 30_000.0,
                max: 120_000.0
            }
        );
    }

    #[test]
    fn test_filter_options_without_salaries() {
        let f = filter_options(&CandidateTable::from_rows(vec![row(0, "A", "Peru", 10.0, 0)]));
        assert_eq!(
            f.salary_range,
            Range {
                min: 0.0,
                max: 200_000.0
            }
        );
    }
}
