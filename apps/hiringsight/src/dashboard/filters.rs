use serde::{Deserialize, Serialize};

use crate::errors::AppError;
use crate::models::table::CandidateRow;

pub const DEFAULT_LIMIT: usize = 50;
const MAX_LIMIT: usize = 200;
const MAX_OFFSET: usize = 10_000;

/// Query string of `GET /api/v1/candidates`. Blank text filters are ignored.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CandidateQuery {
    pub min_score: Option<f64>,
    pub max_score: Option<f64>,
    pub min_salary: Option<u64>,
    pub max_salary: Option<u64>,
    pub country: Option<String>,
    pub skill_category: Option<String>,
    pub experience_level: Option<String>,
    pub has_big_tech: Option<bool>,
    pub search: Option<String>,
    pub limit: Option<usize>,
    pub offset: Option<usize>,
}

pub fn validate_pagination(
    limit: Option<usize>,
    offset: Option<usize>,
) -> Result<(usize, usize), AppError> {
    let limit = limit.unwrap_or(DEFAULT_LIMIT);
    let offset = offset.unwrap_or(0);

    if !(1..=MAX_LIMIT).contains(&limit) {
        return Err(AppError::Validation(format!(
            "limit must be between 1 and {MAX_LIMIT}"
        )));
    }
    if offset > MAX_OFFSET {
        return Err(AppError::Validation(format!(
            "offset must be between 0 and {MAX_OFFSET}"
        )));
    }
    Ok((limit, offset))
}

/// Case-insensitive substring test.
fn contains_ci(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}

fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|s| !s.is_empty())
}

impl CandidateQuery {
    pub fn matches(&self, row: &CandidateRow) -> bool {
        if self.min_score.is_some_and(|min| row.overall_score < min) {
            return false;
        }
        if self.max_score.is_some_and(|max| row.overall_score > max) {
            return false;
        }
        if self.min_salary.is_some_and(|min| row.salary_full_time < min) {
            return false;
        }
        if self.max_salary.is_some_and(|max| row.salary_full_time > max) {
            return false;
        }
        if non_blank(&self.country).is_some_and(|c| !contains_ci(&row.country, c)) {
            return false;
        }
        if non_blank(&self.skill_category)
            .is_some_and(|c| !contains_ci(&row.primary_skill_category, c))
        {
            return false;
        }
        if non_blank(&self.experience_level)
            .is_some_and(|l| !contains_ci(&row.experience_level, l))
        {
            return false;
        }
        if self.has_big_tech.is_some_and(|b| row.has_big_tech != b) {
            return false;
        }
        if let Some(term) = non_blank(&self.search) {
            let hit = [
                &row.name,
                &row.country,
                &row.original_skills,
                &row.original_work_experiences,
            ]
            .iter()
            .any(|field| contains_ci(field, term));
            if !hit {
                return false;
            }
        }
        true
    }
}

/// One entry of the candidate list.
#[derive(Debug, Clone, Serialize)]
pub struct CandidateSummary {
    pub id: usize,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub country: String,
    pub city: String,
    pub continent: String,
    pub overall_score: f64,
    pub enhanced_overall_score: f64,
    pub salary_full_time: u64,
    pub experience_level: String,
    pub primary_skill_category: String,
    pub total_skills: usize,
    pub total_experiences: usize,
    pub has_big_tech: bool,
    pub has_senior_role: bool,
    pub is_full_stack: bool,
    pub skills_diversity_score: f64,
    pub original_skills: String,
    pub original_work_experiences: String,
}

impl From<&CandidateRow> for CandidateSummary {
    fn from(row: &CandidateRow) -> Self {
        Self {
            id: row.candidate_id,
            name: row.name.clone(),
            email: row.email.clone(),
            phone: row.phone.clone(),
            country: row.country.clone(),
            city: row.city.clone(),
            continent: row.continent.clone(),
            overall_score: row.overall_score,
            enhanced_overall_score: row.enhanced_overall_score,
            salary_full_time: row.salary_full_time,
            experience_level: row.experience_level.clone(),
            primary_skill_category: row.primary_skill_category.clone(),
            total_skills: row.total_skills,
            total_experiences: row.total_experiences,
            has_big_tech: row.has_big_tech,
            has_senior_role: row.has_senior_role,
            is_full_stack: row.is_full_stack,
            skills_diversity_score: row.skills_diversity_score,
            original_skills: row.original_skills.clone(),
            original_work_experiences: row.original_work_experiences.clone(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct CandidatePage {
    pub candidates: Vec<CandidateSummary>,
    pub total_filtered: usize,
    pub total_returned: usize,
    pub has_more: bool,
    pub next_offset: Option<usize>,
}

/// Filters, sorts by overall score (highest first, stable) and slices one page.
pub fn search_candidates(
    rows: &[CandidateRow],
    query: &CandidateQuery,
    limit: usize,
    offset: usize,
) -> CandidatePage {
    let mut matched: Vec<&CandidateRow> = rows.iter().filter(|r| query.matches(r)).collect();
    matched.sort_by(|a, b| b.overall_score.total_cmp(&a.overall_score));

    let total_filtered = matched.len();
    let candidates: Vec<CandidateSummary> = matched
        .into_iter()
        .skip(offset)
        .take(limit)
        .map(CandidateSummary::from)
        .collect();

    let end = offset + limit;
    let has_more = end < total_filtered;
    CandidatePage {
        total_returned: candidates.len(),
        candidates,
        total_filtered,
        has_more,
        next_offset: has_more.then_some(end),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dashboard::table::fixtures::row;

    fn rows() -> Vec<CandidateRow> {
        let mut a = row(0, "Ada", "Germany", 60.0, 90_000);
        a.original_skills = "Python, SQL".to_string();
        a.has_big_tech = true;
        let b = row(1, "Bo", "Canada", 85.0, 120_000);
        let mut c = row(2, "Cy", "Germany", 85.0, 0);
        c.experience_level = "Mid-Level".to_string();
        vec![a, b, c]
    }

    #[test]
    fn test_sorted_by_score_descending_stable() {
        let page = search_candidates(&rows(), &CandidateQuery::default(), 50, 0);
        let ids: Vec<usize> = page.candidates.iter().map(|c| c.id).collect();
        assert_eq!(ids, vec![1, 2, 0]);
        assert!(!page.has_more);
        assert_eq!(page.next_offset, None);
    }

    #[test]
    fn test_filters_combine() {
        let query = CandidateQuery {
            country: Some("germ".to_string()),
            min_score: Some(70.0),
            ..CandidateQuery::default()
        };
        let page = search_candidates(&rows(), &query, 50, 0);
        assert_eq!(page.total_filtered, 1);
        assert_eq!(page.candidates[0].name, "Cy");
    }

    #[test]
    fn test_search_covers_skills_text() {
        let query = CandidateQuery {
            search: Some("sql".to_string()),
            ..CandidateQuery::default()
        };
        let page = search_candidates(&rows(), &query, 50, 0);
        assert_eq!(page.total_filtered, 1);
        assert_eq!(page.candidates[0].id, 0);
    }

    #[test]
    fn test_big_tech_and_level_filters() {
        let query = CandidateQuery {
            has_big_tech: Some(false),
            experience_level: Some("mid".to_string()),
            ..CandidateQuery::default()
        };
        let page = search_candidates(&rows(), &query, 50, 0);
        assert_eq!(page.total_filtered, 1);
        assert_eq!(page.candidates[0].id, 2);
    }

    #[test]
    fn test_pagination_reports_next_offset() {
        let page = search_candidates(&rows(), &CandidateQuery::default(), 2, 0);
        assert_eq!(page.total_returned, 2);
        assert!(page.has_more);
        assert_eq!(page.next_offset, Some(2));
    }

    #[test]
    fn test_validate_pagination_bounds() {
        assert_eq!(validate_pagination(None, None).unwrap(), (50, 0));
        assert!(validate_pagination(Some(0), None).is_err());
        assert!(validate_pagination(Some(201), None).is_err());
        assert!(validate_pagination(Some(10), Some(10_001)).is_err());
    }
}
