use serde::{Deserialize, Serialize};

use crate::features::taxonomy::SkillCategory;
use crate::models::features::{EnrichedRecord, NONE_LABEL};
use crate::models::submission::WorkExperience;

/// Flat row of the exported feature table. Column order is the field order.
///
/// Written by the `engineer` run and read back by the dashboard API, so every
/// field must survive a CSV round trip.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CandidateRow {
    pub candidate_id: usize,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub submitted_at: String,

    pub salary_full_time: u64,
    pub salary_part_time: u64,
    pub has_salary_info: bool,
    pub salary_ratio_pt_ft: f64,

    pub available_full_time: bool,
    pub available_part_time: bool,
    pub both_available: bool,
    pub availability_flexibility: usize,

    pub total_experiences: usize,
    pub unique_companies: usize,
    pub has_big_tech: bool,
    pub has_senior_role: bool,
    pub has_lead_role: bool,
    pub most_common_role_type: String,
    pub experience_diversity_score: f64,
    pub company_prestige_score: u32,
    pub avg_prestige_per_role: f64,

    pub highest_education_level: String,
    pub total_degrees: usize,
    pub has_cs_degree: bool,
    pub has_top_school: bool,
    pub has_high_gpa: bool,

    pub total_skills: usize,
    pub frontend_skills: usize,
    pub backend_skills: usize,
    pub mobile_skills: usize,
    pub data_skills: usize,
    pub cloud_skills: usize,
    pub database_skills: usize,
    pub devops_skills: usize,
    pub language_skills: usize,
    pub is_full_stack: bool,
    pub high_demand_skills: usize,
    pub skills_diversity_score: f64,
    pub primary_skill_category: String,

    pub country: String,
    pub city: String,
    pub continent: String,
    pub timezone_group: String,
    pub is_major_tech_hub: bool,

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
    pub experience_level: String,
    pub enhanced_experience_level: String,

    pub original_skills: String,
    pub original_work_experiences: String,

    pub score_percentile: f64,
    pub enhanced_score_percentile: f64,
    pub salary_percentile: f64,
    pub prestige_percentile: f64,
    pub value_tier: Option<String>,
    pub enhanced_value_tier: Option<String>,
    pub experience_tier: Option<String>,
    pub budget_category: Option<String>,
    pub value_for_money: f64,
    pub enhanced_value_for_money: f64,
}

pub fn join_skills(skills: &[String]) -> String {
    skills.join(", ")
}

pub fn join_work_experiences(roles: &[WorkExperience]) -> String {
    roles
        .iter()
        .map(|r| format!("{}: {}", r.company, r.role_name))
        .collect::<Vec<_>>()
        .join("; ")
}

/// Splits the comma-joined skills column back into individual skills.
pub fn parse_skills(text: &str) -> Vec<&str> {
    text.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect()
}

impl From<&EnrichedRecord> for CandidateRow {
    fn from(enriched: &EnrichedRecord) -> Self {
        let r = &enriched.record;
        let c = &enriched.corpus;
        Self {
            candidate_id: r.identity.candidate_id,
            name: r.identity.name.clone(),
            email: r.identity.email.clone(),
            phone: r.identity.phone.clone(),
            submitted_at: r.identity.submitted_at.clone(),

            salary_full_time: r.salary.salary_full_time,
            salary_part_time: r.salary.salary_part_time,
            has_salary_info: r.salary.has_salary_info,
            salary_ratio_pt_ft: r.salary.salary_ratio_pt_ft,

            available_full_time: r.availability.available_full_time,
            available_part_time: r.availability.available_part_time,
            both_available: r.availability.both_available,
            availability_flexibility: r.availability.availability_flexibility,

            total_experiences: r.experience.total_experiences,
            unique_companies: r.experience.unique_companies,
            has_big_tech: r.experience.has_big_tech,
            has_senior_role: r.experience.has_senior_role,
            has_lead_role: r.experience.has_lead_role,
            most_common_role_type: r
                .experience
                .most_common_role_type
                .map(|t| t.as_str())
                .unwrap_or(NONE_LABEL)
                .to_string(),
            experience_diversity_score: r.experience.experience_diversity_score,
            company_prestige_score: r.experience.company_prestige_score,
            avg_prestige_per_role: r.experience.avg_prestige_per_role,

            highest_education_level: r.education.highest_education_level.clone(),
            total_degrees: r.education.total_degrees,
            has_cs_degree: r.education.has_cs_degree,
            has_top_school: r.education.has_top_school,
            has_high_gpa: r.education.has_high_gpa,

            total_skills: r.skills.total_skills,
            frontend_skills: r.skills.count(SkillCategory::Frontend),
            backend_skills: r.skills.count(SkillCategory::Backend),
            mobile_skills: r.skills.count(SkillCategory::Mobile),
            data_skills: r.skills.count(SkillCategory::Data),
            cloud_skills: r.skills.count(SkillCategory::Cloud),
            database_skills: r.skills.count(SkillCategory::Database),
            devops_skills: r.skills.count(SkillCategory::Devops),
            language_skills: r.skills.count(SkillCategory::Language),
            is_full_stack: r.skills.is_full_stack,
            high_demand_skills: r.skills.high_demand_skills,
            skills_diversity_score: r.skills.skills_diversity_score,
            primary_skill_category: r
                .skills
                .primary_skill_category
                .map(|c| c.as_str())
                .unwrap_or(NONE_LABEL)
                .to_string(),

            country: r.location.country.clone(),
            city: r.location.city.clone(),
            continent: r.location.continent.clone(),
            timezone_group: r.location.timezone_group.clone(),
            is_major_tech_hub: r.location.is_major_tech_hub,

            experience_score: r.scores.experience_score,
            skills_score: r.scores.skills_score,
            education_score: r.scores.education_score,
            market_value_score: r.scores.market_value_score,
            completeness_score: r.scores.completeness_score,
            detailed_experience_score: r.scores.detailed_experience_score,
            detailed_skills_score: r.scores.detailed_skills_score,
            detailed_education_score: r.scores.detailed_education_score,
            overall_score: r.scores.overall_score,
            enhanced_overall_score: r.scores.enhanced_overall_score,
            experience_level: r.scores.experience_level.as_str().to_string(),
            enhanced_experience_level: r.scores.enhanced_experience_level.as_str().to_string(),

            original_skills: join_skills(&r.original_skills),
            original_work_experiences: join_work_experiences(&r.original_work_experiences),

            score_percentile: c.score_percentile,
            enhanced_score_percentile: c.enhanced_score_percentile,
            salary_percentile: c.salary_percentile,
            prestige_percentile: c.prestige_percentile,
            value_tier: c.value_tier.map(String::from),
            enhanced_value_tier: c.enhanced_value_tier.map(String::from),
            experience_tier: c.experience_tier.map(String::from),
            budget_category: c.budget_category.map(String::from),
            value_for_money: c.value_for_money,
            enhanced_value_for_money: c.enhanced_value_for_money,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_work_experiences_joined_as_pairs() {
        let roles = vec![
            WorkExperience {
                company: "Google".to_string(),
                role_name: "Engineer".to_string(),
            },
            WorkExperience {
                company: "Acme Inc".to_string(),
                role_name: "Analyst".to_string(),
            },
        ];
        assert_eq!(
            join_work_experiences(&roles),
            "Google: Engineer; Acme Inc: Analyst"
        );
    }

    #[test]
    fn test_parse_skills_trims_and_drops_empty() {
        assert_eq!(
            parse_skills("React, Node JS,, SQL "),
            vec!["React", "Node JS", "SQL"]
        );
        assert!(parse_skills("").is_empty());
    }
}
