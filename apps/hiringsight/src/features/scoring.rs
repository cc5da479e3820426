//! Candidate scoring: two independent score families.
//!
//! Basic (0–100 overall):   experience 25 · skills 30 · education 20 · market 20 · completeness 12→10
//! Detailed (0–162 overall): experience 50 · skills 40 · education 40 · market 20 · completeness 12
//!
//! Every calculator reads the raw submission directly; only the two aggregates
//! combine other scores.

use std::sync::Arc;

use thiserror::Error;

use crate::features::extractors::{
    clean_salary, contains_any, count_categories, count_high_demand, diversity_fraction,
    is_tech_degree,
};
use crate::features::location::{split_location, OTHER};
use crate::features::taxonomy::Taxonomy;
use crate::models::features::{ExperienceLevel, ScoreCard};
use crate::models::submission::{
    CandidateSubmission, Education, Field, SalaryExpectation, WorkExperience,
};

pub const MAX_OVERALL: f64 = 100.0;
pub const MAX_ENHANCED: f64 = 162.0;

/// Which threshold ladder to apply to an experience score.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Ladder {
    /// Input range 0–25.
    Basic,
    /// Input range 0–50.
    Detailed,
}

/// A score outside its declared range, or not a finite number.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("{field} = {value} is outside [0, {max}]")]
pub struct ScoreRangeError {
    pub field: &'static str,
    pub value: f64,
    pub max: f64,
}

/// Inputs to the two aggregate scores.
#[derive(Debug, Clone, Copy, Default)]
pub struct ScoreParts {
    pub experience: u32,
    pub skills: u32,
    pub education: u32,
    pub market_value: u32,
    pub completeness: u32,
    pub detailed_experience: u32,
    pub detailed_skills: f64,
    pub detailed_education: u32,
}

#[derive(Debug, Clone)]
pub struct CandidateScorer {
    taxonomy: Arc<Taxonomy>,
}

impl CandidateScorer {
    pub fn new(taxonomy: Arc<Taxonomy>) -> Self {
        Self { taxonomy }
    }

    fn roles<'a>(experiences: &'a Field<Vec<WorkExperience>>) -> &'a [WorkExperience] {
        experiences.present().map(Vec::as_slice).unwrap_or(&[])
    }

    fn skill_list<'a>(skills: &'a Field<Vec<String>>) -> &'a [String] {
        skills.present().map(Vec::as_slice).unwrap_or(&[])
    }

    /// min(count × 8, 25)
    pub fn experience_basic(&self, experiences: &Field<Vec<WorkExperience>>) -> u32 {
        let count = Self::roles(experiences).len() as u32;
        count.saturating_mul(8).min(25)
    }

    /// min(count × 4, 20) + 5 for any senior role + 10 for any big-tech employer, capped at 50.
    pub fn experience_detailed(&self, experiences: &Field<Vec<WorkExperience>>) -> u32 {
        let roles = Self::roles(experiences);
        if roles.is_empty() {
            return 0;
        }

        let mut score = (roles.len() as u32).saturating_mul(4).min(20);
        if roles
            .iter()
            .any(|r| contains_any(&r.role_name, &self.taxonomy.senior_keywords))
        {
            score += 5;
        }
        if roles
            .iter()
            .any(|r| contains_any(&r.company, &self.taxonomy.big_tech_companies))
        {
            score += 10;
        }
        score.min(50)
    }

    /// min(count × 2, 20) + min(high_demand × 2, 10)
    pub fn skills_basic(&self, skills: &Field<Vec<String>>) -> u32 {
        let skills = Self::skill_list(skills);
        if skills.is_empty() {
            return 0;
        }
        let count = skills.len() as u32;
        let high_demand = count_high_demand(skills, &self.taxonomy) as u32;
        (count.saturating_mul(2).min(20) + high_demand.saturating_mul(2).min(10)).min(30)
    }

    /// min(count, 15) + min(high_demand × 3, 15) + diversity × 10, capped at 40.
    pub fn skills_detailed(&self, skills: &Field<Vec<String>>) -> f64 {
        let skills = Self::skill_list(skills);
        if skills.is_empty() {
            return 0.0;
        }
        let count = (skills.len() as u32).min(15);
        let high_demand = (count_high_demand(skills, &self.taxonomy) as u32)
            .saturating_mul(3)
            .min(15);
        let counts = count_categories(skills, &self.taxonomy);
        let score = f64::from(count + high_demand) + diversity_fraction(&counts) * 10.0;
        score.min(40.0)
    }

    pub fn education_basic(&self, education: &Field<Education>) -> u32 {
        match education {
            Field::Present(e) => self.taxonomy.basic_degree_points.points_for(&e.highest_level),
            Field::Malformed | Field::Absent => 0,
        }
    }

    /// Level points + school rank bonus (top 25 → 10, else top 50 → 5) + 5 for a
    /// tech subject, capped at 40. Zero without at least one degree.
    pub fn education_detailed(&self, education: &Field<Education>) -> u32 {
        let (level, degrees) = match education {
            Field::Present(Education {
                highest_level,
                degrees: Field::Present(degrees),
            }) => (highest_level, degrees),
            _ => return 0,
        };

        let mut score = self.taxonomy.detailed_degree_points.points_for(level);
        if degrees.iter().any(|d| d.is_top25) {
            score += 10;
        } else if degrees.iter().any(|d| d.is_top50) {
            score += 5;
        }
        if degrees.iter().any(|d| is_tech_degree(d, &self.taxonomy)) {
            score += 5;
        }
        score.min(40)
    }

    /// Cheaper (location-adjusted) full-time expectations score higher.
    pub fn market_value(
        &self,
        salary: &Field<SalaryExpectation>,
        location: &Field<String>,
    ) -> u32 {
        let full_time = match salary {
            Field::Present(s) => clean_salary(&s.full_time),
            Field::Malformed | Field::Absent => return 0,
        };
        if full_time == 0 {
            return 0;
        }

        let country = match location {
            Field::Present(l) => split_location(l).0,
            Field::Malformed | Field::Absent => OTHER.to_string(),
        };
        let adjusted = full_time as f64 * self.taxonomy.salary_multiplier(&country);

        if adjusted < 50_000.0 {
            20
        } else if adjusted < 80_000.0 {
            15
        } else if adjusted < 120_000.0 {
            10
        } else {
            5
        }
    }

    /// 2 points per required field (name, email, skills, work history, education),
    /// 1 per optional field (phone, location). Skills count only as a list.
    pub fn completeness(&self, candidate: &CandidateSubmission) -> u32 {
        let filled_text = |f: &Field<String>| f.present().is_some_and(|s| !s.trim().is_empty());
        let filled = &candidate.filled;

        let required = [
            filled_text(&candidate.name),
            filled_text(&candidate.email),
            filled.skills_list,
            filled.work_experiences,
            filled.education,
        ];
        let optional = [filled.phone, filled.location];

        let required_points = required.iter().filter(|f| **f).count() as u32 * 2;
        let optional_points = optional.iter().filter(|f| **f).count() as u32;
        required_points + optional_points
    }

    pub fn overall_basic(&self, parts: &ScoreParts) -> f64 {
        let completeness = (f64::from(parts.completeness) * (10.0 / 12.0)).min(10.0);
        let score = f64::from(parts.experience + parts.skills + parts.education + parts.market_value)
            + completeness;
        score.min(MAX_OVERALL)
    }

    pub fn overall_enhanced(&self, parts: &ScoreParts) -> f64 {
        let score = f64::from(
            parts.detailed_experience
                + parts.detailed_education
                + parts.market_value
                + parts.completeness,
        ) + parts.detailed_skills;
        score.min(MAX_ENHANCED)
    }

    /// Runs every calculator and assembles the score card.
    pub fn score(&self, candidate: &CandidateSubmission) -> ScoreCard {
        let parts = ScoreParts {
            experience: self.experience_basic(&candidate.work_experiences),
            skills: self.skills_basic(&candidate.skills),
            education: self.education_basic(&candidate.education),
            market_value: self
                .market_value(&candidate.annual_salary_expectation, &candidate.location),
            completeness: self.completeness(candidate),
            detailed_experience: self.experience_detailed(&candidate.work_experiences),
            detailed_skills: self.skills_detailed(&candidate.skills),
            detailed_education: self.education_detailed(&candidate.education),
        };

        ScoreCard {
            experience_score: parts.experience,
            skills_score: parts.skills,
            education_score: parts.education,
            market_value_score: parts.market_value,
            completeness_score: parts.completeness,
            detailed_experience_score: parts.detailed_experience,
            detailed_skills_score: parts.detailed_skills,
            detailed_education_score: parts.detailed_education,
            overall_score: self.overall_basic(&parts),
            enhanced_overall_score: self.overall_enhanced(&parts),
            experience_level: experience_level(parts.experience, Ladder::Basic),
            enhanced_experience_level: experience_level(parts.detailed_experience, Ladder::Detailed),
        }
    }
}

pub fn experience_level(score: u32, ladder: Ladder) -> ExperienceLevel {
    let (senior, mid, junior) = match ladder {
        Ladder::Basic => (20, 15, 8),
        Ladder::Detailed => (40, 25, 10),
    };
    match score {
        s if s >= senior => ExperienceLevel::Senior,
        s if s >= mid => ExperienceLevel::MidLevel,
        s if s >= junior => ExperienceLevel::Junior,
        _ => ExperienceLevel::EntryLevel,
    }
}

/// Checks every component against its declared range.
pub fn check_ranges(card: &ScoreCard) -> Result<(), ScoreRangeError> {
    let checks: [(&'static str, f64, f64); 10] = [
        ("experience_score", f64::from(card.experience_score), 25.0),
        ("skills_score", f64::from(card.skills_score), 30.0),
        ("education_score", f64::from(card.education_score), 20.0),
        ("market_value_score", f64::from(card.market_value_score), 20.0),
        ("completeness_score", f64::from(card.completeness_score), 12.0),
        (
            "detailed_experience_score",
            f64::from(card.detailed_experience_score),
            50.0,
        ),
        ("detailed_skills_score", card.detailed_skills_score, 40.0),
        (
            "detailed_education_score",
            f64::from(card.detailed_education_score),
            40.0,
        ),
        ("overall_score", card.overall_score, MAX_OVERALL),
        ("enhanced_overall_score", card.enhanced_overall_score, MAX_ENHANCED),
    ];

    for (field, value, max) in checks {
        if !value.is_finite() || !(0.0..=max).contains(&value) {
            return Err(ScoreRangeError { field, value, max });
        }
    }
    Ok(())
}
