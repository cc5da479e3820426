use serde::{Deserialize, Serialize};

use crate::features::taxonomy::SkillCategory;
use crate::models::submission::WorkExperience;

/// Bucket a single role name falls into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RoleType {
    Engineering,
    Management,
    Analytics,
    Research,
    Other,
}

impl RoleType {
    pub fn as_str(&self) -> &'static str {
        match self {
            RoleType::Engineering => "Engineering",
            RoleType::Management => "Management",
            RoleType::Analytics => "Analytics",
            RoleType::Research => "Research",
            RoleType::Other => "Other",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ExperienceLevel {
    Senior,
    #[serde(rename = "Mid-Level")]
    MidLevel,
    Junior,
    #[serde(rename = "Entry-Level")]
    EntryLevel,
}

impl ExperienceLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            ExperienceLevel::Senior => "Senior",
            ExperienceLevel::MidLevel => "Mid-Level",
            ExperienceLevel::Junior => "Junior",
            ExperienceLevel::EntryLevel => "Entry-Level",
        }
    }
}

/// Label used in the table for "no value" categoricals.
pub const NONE_LABEL: &str = "None";

#[derive(Debug, Clone, PartialEq)]
pub struct Identity {
    pub candidate_id: usize,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub submitted_at: String,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SalaryFeatures {
    pub salary_full_time: u64,
    pub salary_part_time: u64,
    pub has_salary_info: bool,
    pub salary_ratio_pt_ft: f64,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct AvailabilityFeatures {
    pub available_full_time: bool,
    pub available_part_time: bool,
    pub both_available: bool,
    pub availability_flexibility: usize,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExperienceFeatures {
    pub total_experiences: usize,
    pub unique_companies: usize,
    pub has_big_tech: bool,
    pub has_senior_role: bool,
    pub has_lead_role: bool,
    pub most_common_role_type: Option<RoleType>,
    pub experience_diversity_score: f64,
    pub company_prestige_score: u32,
    pub avg_prestige_per_role: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct EducationFeatures {
    pub highest_education_level: String,
    pub total_degrees: usize,
    pub has_cs_degree: bool,
    pub has_top_school: bool,
    pub has_high_gpa: bool,
}

impl Default for EducationFeatures {
    fn default() -> Self {
        Self {
            highest_education_level: NONE_LABEL.to_string(),
            total_degrees: 0,
            has_cs_degree: false,
            has_top_school: false,
            has_high_gpa: false,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SkillFeatures {
    pub total_skills: usize,
    /// Matches per category, indexed by `SkillCategory::index`.
    pub category_counts: [usize; 8],
    pub is_full_stack: bool,
    pub high_demand_skills: usize,
    pub skills_diversity_score: f64,
    pub primary_skill_category: Option<SkillCategory>,
}

impl SkillFeatures {
    pub fn count(&self, category: SkillCategory) -> usize {
        self.category_counts[category.index()]
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct LocationFeatures {
    pub country: String,
    pub city: String,
    pub continent: String,
    pub timezone_group: String,
    pub is_major_tech_hub: bool,
}

impl LocationFeatures {
    pub fn unknown() -> Self {
        Self {
            country: "Unknown".to_string(),
            city: "Unknown".to_string(),
            continent: "Unknown".to_string(),
            timezone_group: "Unknown".to_string(),
            is_major_tech_hub: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ScoreCard {
    pub experience_score: u32,
    pub skills_score: u32,
    pub education_score: u32,
    pub market_value_score: u32,
    pub completeness_score: u32,
    pub detailed_experience_score: u32,
    pub detailed_skills_score: f64,
    pub detailed_education_score: u32,
    pub overall_score: f64,
    pub enhanced_overall_score: f64,
    pub experience_level: ExperienceLevel,
    pub enhanced_experience_level: ExperienceLevel,
}

/// One fully engineered candidate. Built once per run and never edited.
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureRecord {
    pub identity: Identity,
    pub salary: SalaryFeatures,
    pub availability: AvailabilityFeatures,
    pub experience: ExperienceFeatures,
    pub education: EducationFeatures,
    pub skills: SkillFeatures,
    pub location: LocationFeatures,
    pub scores: ScoreCard,
    pub original_skills: Vec<String>,
    pub original_work_experiences: Vec<WorkExperience>,
}

/// Fields that depend on the whole table rather than one candidate.
#[derive(Debug, Clone, PartialEq)]
pub struct CorpusFeatures {
    pub score_percentile: f64,
    pub enhanced_score_percentile: f64,
    pub salary_percentile: f64,
    pub prestige_percentile: f64,
    pub value_tier: Option<&'static str>,
    pub enhanced_value_tier: Option<&'static str>,
    pub experience_tier: Option<&'static str>,
    pub budget_category: Option<&'static str>,
    pub value_for_money: f64,
    pub enhanced_value_for_money: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct EnrichedRecord {
    pub record: FeatureRecord,
    pub corpus: CorpusFeatures,
}
