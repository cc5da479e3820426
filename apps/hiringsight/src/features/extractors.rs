//! Per-field feature extractors.
//!
//! Each extractor is total: malformed and absent inputs map to the block's
//! default instead of an error.

use std::collections::HashSet;

use crate::features::taxonomy::{SkillCategory, Taxonomy};
use crate::models::features::{
    AvailabilityFeatures, EducationFeatures, ExperienceFeatures, RoleType, SalaryFeatures,
    SkillFeatures, NONE_LABEL,
};
use crate::models::submission::{
    Degree, Education, Field, SalaryExpectation, SalaryValue, WorkExperience,
};

/// Normalizes one salary figure to whole currency units. Strings keep only their
/// digits; anything unparsable or negative is 0.
pub fn clean_salary(value: &Field<SalaryValue>) -> u64 {
    match value {
        Field::Present(SalaryValue::Text(text)) => {
            let digits: String = text.chars().filter(|c| c.is_ascii_digit()).collect();
            digits.parse::<u64>().unwrap_or(0)
        }
        Field::Present(SalaryValue::Number(n)) if n.is_finite() && *n > 0.0 => n.trunc() as u64,
        Field::Present(SalaryValue::Number(_)) | Field::Malformed | Field::Absent => 0,
    }
}

pub fn extract_salary(expectation: &Field<SalaryExpectation>) -> SalaryFeatures {
    let salary = match expectation {
        Field::Present(s) => s,
        Field::Malformed | Field::Absent => return SalaryFeatures::default(),
    };

    let full_time = clean_salary(&salary.full_time);
    let part_time = clean_salary(&salary.part_time);

    SalaryFeatures {
        salary_full_time: full_time,
        salary_part_time: part_time,
        has_salary_info: full_time > 0 || part_time > 0,
        salary_ratio_pt_ft: if full_time > 0 {
            part_time as f64 / full_time as f64
        } else {
            0.0
        },
    }
}

pub fn extract_availability(availability: &Field<Vec<String>>) -> AvailabilityFeatures {
    let modes = match availability {
        Field::Present(modes) => modes,
        Field::Malformed | Field::Absent => return AvailabilityFeatures::default(),
    };

    let full_time = modes.iter().any(|m| m == "full-time");
    let part_time = modes.iter().any(|m| m == "part-time");

    AvailabilityFeatures {
        available_full_time: full_time,
        available_part_time: part_time,
        both_available: full_time && part_time,
        availability_flexibility: modes.len(),
    }
}

/// First matching rule wins; matching is case-insensitive.
pub fn classify_role(role_name: &str) -> RoleType {
    let role = role_name.to_lowercase();
    if role.contains("engineer") || role.contains("developer") {
        RoleType::Engineering
    } else if role.contains("manager") || role.contains("lead") {
        RoleType::Management
    } else if role.contains("analyst") || role.contains("data") {
        RoleType::Analytics
    } else if role.contains("researcher") {
        RoleType::Research
    } else {
        RoleType::Other
    }
}

/// Majority vote; ties go to the type seen first.
fn most_common_role(roles: &[WorkExperience]) -> Option<RoleType> {
    let mut tally: Vec<(RoleType, usize)> = Vec::new();
    for role in roles {
        let kind = classify_role(&role.role_name);
        match tally.iter_mut().find(|(t, _)| *t == kind) {
            Some((_, count)) => *count += 1,
            None => tally.push((kind, 1)),
        }
    }

    let mut best: Option<(RoleType, usize)> = None;
    for (kind, count) in tally {
        if best.map_or(true, |(_, c)| count > c) {
            best = Some((kind, count));
        }
    }
    best.map(|(kind, _)| kind)
}

pub fn contains_any(haystack: &str, needles: &[String]) -> bool {
    needles.iter().any(|n| haystack.contains(n.as_str()))
}

/// Prestige points for one employer: big tech 10, academic 5, anything else 1.
pub fn company_prestige(company: &str, taxonomy: &Taxonomy) -> u32 {
    if contains_any(company, &taxonomy.big_tech_companies) {
        10
    } else if company.contains("University") || company.contains("Institute") {
        5
    } else {
        1
    }
}

pub fn extract_experience(
    experiences: &Field<Vec<WorkExperience>>,
    taxonomy: &Taxonomy,
) -> ExperienceFeatures {
    let roles = match experiences {
        Field::Present(roles) if !roles.is_empty() => roles,
        Field::Present(_) | Field::Malformed | Field::Absent => {
            return ExperienceFeatures::default()
        }
    };

    let total = roles.len();
    let unique_companies = roles
        .iter()
        .map(|r| r.company.as_str())
        .collect::<HashSet<_>>()
        .len();
    let prestige: u32 = roles
        .iter()
        .map(|r| company_prestige(&r.company, taxonomy))
        .sum();

    ExperienceFeatures {
        total_experiences: total,
        unique_companies,
        has_big_tech: roles
            .iter()
            .any(|r| contains_any(&r.company, &taxonomy.big_tech_companies)),
        has_senior_role: roles
            .iter()
            .any(|r| contains_any(&r.role_name, &taxonomy.senior_keywords)),
        has_lead_role: roles
            .iter()
            .any(|r| contains_any(&r.role_name, &taxonomy.lead_keywords)),
        most_common_role_type: most_common_role(roles),
        experience_diversity_score: unique_companies as f64 / total as f64,
        company_prestige_score: prestige,
        avg_prestige_per_role: prestige as f64 / total as f64,
    }
}

pub fn is_tech_degree(degree: &Degree, taxonomy: &Taxonomy) -> bool {
    contains_any(&degree.subject, &taxonomy.tech_subjects)
}

pub fn extract_education(education: &Field<Education>, taxonomy: &Taxonomy) -> EducationFeatures {
    let education = match education {
        Field::Present(e) => e,
        Field::Malformed | Field::Absent => return EducationFeatures::default(),
    };

    let highest_education_level = if education.highest_level.is_empty() {
        NONE_LABEL.to_string()
    } else {
        education.highest_level.clone()
    };

    let degrees = match &education.degrees {
        Field::Present(degrees) => degrees,
        Field::Malformed | Field::Absent => {
            return EducationFeatures {
                highest_education_level,
                ..EducationFeatures::default()
            }
        }
    };

    EducationFeatures {
        highest_education_level,
        total_degrees: degrees.len(),
        has_cs_degree: degrees.iter().any(|d| is_tech_degree(d, taxonomy)),
        has_top_school: degrees.iter().any(|d| d.is_top50 || d.is_top25),
        has_high_gpa: degrees
            .iter()
            .any(|d| contains_any(&d.gpa, &taxonomy.high_gpa_markers)),
    }
}

/// Exact-string matches per category.
pub fn count_categories(skills: &[String], taxonomy: &Taxonomy) -> [usize; 8] {
    let mut counts = [0usize; 8];
    for category in SkillCategory::ALL {
        let members = taxonomy.category_members(category);
        counts[category.index()] = skills.iter().filter(|s| members.contains(s)).count();
    }
    counts
}

/// Fraction of categories with at least one match.
pub fn diversity_fraction(counts: &[usize; 8]) -> f64 {
    let covered = counts.iter().filter(|c| **c > 0).count();
    covered as f64 / counts.len() as f64
}

pub fn count_high_demand(skills: &[String], taxonomy: &Taxonomy) -> usize {
    skills.iter().filter(|s| taxonomy.is_high_demand(s)).count()
}

pub fn extract_skills(skills: &Field<Vec<String>>, taxonomy: &Taxonomy) -> SkillFeatures {
    let skills = match skills {
        Field::Present(skills) if !skills.is_empty() => skills,
        Field::Present(_) | Field::Malformed | Field::Absent => return SkillFeatures::default(),
    };

    let counts = count_categories(skills, taxonomy);

    // Strictly greater keeps the earliest declared category on ties.
    let mut primary: Option<(SkillCategory, usize)> = None;
    for category in SkillCategory::ALL {
        let count = counts[category.index()];
        if count > 0 && primary.map_or(true, |(_, best)| count > best) {
            primary = Some((category, count));
        }
    }

    SkillFeatures {
        total_skills: skills.len(),
        category_counts: counts,
        is_full_stack: counts[SkillCategory::Frontend.index()] > 0
            && counts[SkillCategory::Backend.index()] > 0,
        high_demand_skills: count_high_demand(skills, taxonomy),
        skills_diversity_score: diversity_fraction(&counts),
        primary_skill_category: primary.map(|(c, _)| c),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text(s: &str) -> Field<SalaryValue> {
        Field::Present(SalaryValue::Text(s.to_string()))
    }

    fn role(company: &str, role_name: &str) -> WorkExperience {
        WorkExperience {
            company: company.to_string(),
            role_name: role_name.to_string(),
        }
    }

    fn skills(items: &[&str]) -> Field<Vec<String>> {
        Field::Present(items.iter().map(|s| s.to_string()).collect())
    }

    #[test]
    fn test_clean_salary_keeps_only_digits() {
        assert_eq!(clean_salary(&text("$120,000")), 120000);
        assert_eq!(clean_salary(&text("USD 85k-90k")), 8590);
        assert_eq!(clean_salary(&text("negotiable")), 0);
        assert_eq!(clean_salary(&text("99999999999999999999999")), 0);
    }

    #[test]
    fn test_clean_salary_numbers() {
        assert_eq!(clean_salary(&Field::Present(SalaryValue::Number(75000.9))), 75000);
        assert_eq!(clean_salary(&Field::Present(SalaryValue::Number(-5.0))), 0);
        assert_eq!(clean_salary(&Field::Malformed), 0);
    }

    #[test]
    fn test_salary_ratio_and_flags() {
        let features = extract_salary(&Field::Present(SalaryExpectation {
            full_time: text("$100,000"),
            part_time: text("$50,000"),
        }));
        assert_eq!(features.salary_full_time, 100000);
        assert!(features.has_salary_info);
        assert!((features.salary_ratio_pt_ft - 0.5).abs() < f64::EPSILON);
    }

    #[test]
    fn test_salary_ratio_zero_without_full_time() {
        let features = extract_salary(&Field::Present(SalaryExpectation {
            full_time: Field::Absent,
            part_time: text("$30,000"),
        }));
        assert_eq!(features.salary_ratio_pt_ft, 0.0);
        assert!(features.has_salary_info);
    }

    #[test]
    fn test_availability_both_modes() {
        let features = extract_availability(&skills(&["full-time", "part-time"]));
        assert!(features.both_available);
        assert_eq!(features.availability_flexibility, 2);
    }

    #[test]
    fn test_availability_absent_defaults() {
        assert_eq!(
            extract_availability(&Field::Malformed),
            AvailabilityFeatures::default()
        );
    }

    #[test]
    fn test_classify_role_priority() {
        assert_eq!(classify_role("Lead Software Engineer"), RoleType::Engineering);
        assert_eq!(classify_role("Team Lead"), RoleType::Management);
        assert_eq!(classify_role("Data Manager"), RoleType::Management);
        assert_eq!(classify_role("DATA analyst"), RoleType::Analytics);
        assert_eq!(classify_role("Researcher"), RoleType::Research);
        assert_eq!(classify_role("Designer"), RoleType::Other);
    }

    #[test]
    fn test_experience_prestige_example() {
        let t = Taxonomy::default();
        let features = extract_experience(
            &Field::Present(vec![
                role("Google", "Software Engineer"),
                role("Acme Inc", "Analyst"),
                role("Google", "Senior Engineer"),
            ]),
            &t,
        );
        assert_eq!(features.total_experiences, 3);
        assert_eq!(features.unique_companies, 2);
        assert!(features.has_big_tech);
        assert!(features.has_senior_role);
        assert!(!features.has_lead_role);
        assert_eq!(features.company_prestige_score, 21);
        assert!((features.avg_prestige_per_role - 7.0).abs() < f64::EPSILON);
        assert_eq!(features.most_common_role_type, Some(RoleType::Engineering));
    }

    #[test]
    fn test_academic_prestige() {
        let t = Taxonomy::default();
        assert_eq!(company_prestige("Stanford University", &t), 5);
        assert_eq!(company_prestige("Max Planck Institute", &t), 5);
        assert_eq!(company_prestige("Google Research Institute", &t), 10);
    }

    #[test]
    fn test_role_vote_tie_goes_to_first_seen() {
        let roles = vec![role("A", "Analyst"), role("B", "Developer")];
        assert_eq!(most_common_role(&roles), Some(RoleType::Analytics));
    }

    #[test]
    fn test_lead_role_separate_from_senior() {
        let t = Taxonomy::default();
        let features = extract_experience(&Field::Present(vec![role("Acme", "Product Manager")]), &t);
        assert!(features.has_lead_role);
        assert!(!features.has_senior_role);
    }

    #[test]
    fn test_education_features() {
        let t = Taxonomy::default();
        let features = extract_education(
            &Field::Present(Education {
                highest_level: "Master's Degree".to_string(),
                degrees: Field::Present(vec![Degree {
                    subject: "Computer Science".to_string(),
                    gpa: "GPA 3.5-3.9".to_string(),
                    is_top50: true,
                    is_top25: false,
                }]),
            }),
            &t,
        );
        assert_eq!(features.highest_education_level, "Master's Degree");
        assert_eq!(features.total_degrees, 1);
        assert!(features.has_cs_degree);
        assert!(features.has_top_school);
        assert!(features.has_high_gpa);
    }

    #[test]
    fn test_education_without_degrees_keeps_level() {
        let t = Taxonomy::default();
        let features = extract_education(
            &Field::Present(Education {
                highest_level: "Doctorate".to_string(),
                degrees: Field::Malformed,
            }),
            &t,
        );
        assert_eq!(features.highest_education_level, "Doctorate");
        assert_eq!(features.total_degrees, 0);
    }

    #[test]
    fn test_education_absent_is_none_label() {
        let t = Taxonomy::default();
        assert_eq!(
            extract_education(&Field::Absent, &t).highest_education_level,
            "None"
        );
    }

    #[test]
    fn test_skills_full_stack_example() {
        let t = Taxonomy::default();
        let features = extract_skills(&skills(&["React", "Node JS"]), &t);
        assert_eq!(features.count(SkillCategory::Frontend), 1);
        assert_eq!(features.count(SkillCategory::Backend), 1);
        assert!(features.is_full_stack);
        assert_eq!(features.high_demand_skills, 2);
        assert_eq!(features.primary_skill_category, Some(SkillCategory::Frontend));
        assert!((features.skills_diversity_score - 0.25).abs() < f64::EPSILON);
    }

    #[test]
    fn test_skills_exact_match_only() {
        let t = Taxonomy::default();
        let features = extract_skills(&skills(&["react", "ReactJS"]), &t);
        assert_eq!(features.count(SkillCategory::Frontend), 0);
        assert_eq!(features.primary_skill_category, None);
        assert_eq!(features.total_skills, 2);
    }

    #[test]
    fn test_primary_category_prefers_larger_count() {
        let t = Taxonomy::default();
        let features = extract_skills(&skills(&["React", "SQL", "MySQL"]), &t);
        assert_eq!(features.primary_skill_category, Some(SkillCategory::Database));
    }

    #[test]
    fn test_primary_category_tie_uses_declaration_order() {
        let t = Taxonomy::default();
        // Docker counts for cloud and devops; cloud is declared first.
        let features = extract_skills(&skills(&["Docker"]), &t);
        assert_eq!(features.primary_skill_category, Some(SkillCategory::Cloud));
    }

    #[test]
    fn test_skills_absent_defaults() {
        let t = Taxonomy::default();
        let features = extract_skills(&Field::Absent, &t);
        assert_eq!(features.total_skills, 0);
        assert_eq!(features.primary_skill_category, None);
    }
}
