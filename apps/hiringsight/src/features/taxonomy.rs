//! Reference tables shared by the extractors and the scorer.
//!
//! Built once at startup and handed around behind an `Arc`. Tests construct
//! alternate tables by mutating a `Taxonomy::default()` before sharing it.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Fixed skill categories. Declaration order is the tie-break order for the
/// primary category and the column order of the feature table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SkillCategory {
    Frontend,
    Backend,
    Mobile,
    Data,
    Cloud,
    Database,
    Devops,
    Language,
}

impl SkillCategory {
    pub const ALL: [SkillCategory; 8] = [
        SkillCategory::Frontend,
        SkillCategory::Backend,
        SkillCategory::Mobile,
        SkillCategory::Data,
        SkillCategory::Cloud,
        SkillCategory::Database,
        SkillCategory::Devops,
        SkillCategory::Language,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SkillCategory::Frontend => "frontend",
            SkillCategory::Backend => "backend",
            SkillCategory::Mobile => "mobile",
            SkillCategory::Data => "data",
            SkillCategory::Cloud => "cloud",
            SkillCategory::Database => "database",
            SkillCategory::Devops => "devops",
            SkillCategory::Language => "language",
        }
    }

    pub fn index(&self) -> usize {
        *self as usize
    }
}

impl fmt::Display for SkillCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Points awarded per highest education level, keyed by the literal level string.
#[derive(Debug, Clone)]
pub struct DegreePoints {
    pub entries: Vec<(String, u32)>,
}

impl DegreePoints {
    fn from_pairs(pairs: &[(&str, u32)]) -> Self {
        Self {
            entries: pairs.iter().map(|(k, v)| (k.to_string(), *v)).collect(),
        }
    }

    pub fn points_for(&self, level: &str) -> u32 {
        self.entries
            .iter()
            .find(|(name, _)| name == level)
            .map(|(_, points)| *points)
            .unwrap_or(0)
    }
}

#[derive(Debug, Clone)]
pub struct Taxonomy {
    /// Member skills per category, indexed by `SkillCategory::index`.
    pub skill_categories: [Vec<String>; 8],
    pub high_demand_skills: Vec<String>,
    pub big_tech_companies: Vec<String>,
    /// Keywords that mark a senior role for detailed experience scoring.
    pub senior_keywords: Vec<String>,
    /// Keywords behind the `has_lead_role` flag; not used for scoring.
    pub lead_keywords: Vec<String>,
    pub tech_subjects: Vec<String>,
    pub high_gpa_markers: Vec<String>,
    pub basic_degree_points: DegreePoints,
    pub detailed_degree_points: DegreePoints,
    pub salary_multipliers: Vec<(String, f64)>,
    pub default_salary_multiplier: f64,
    pub tech_hubs: Vec<String>,
    pub continent_fallback: Vec<(String, String)>,
    pub timezone_fallback: Vec<(String, String)>,
}

impl Taxonomy {
    pub fn category_members(&self, category: SkillCategory) -> &[String] {
        &self.skill_categories[category.index()]
    }

    pub fn is_high_demand(&self, skill: &str) -> bool {
        self.high_demand_skills.iter().any(|s| s == skill)
    }

    pub fn salary_multiplier(&self, country: &str) -> f64 {
        self.salary_multipliers
            .iter()
            .find(|(name, _)| name == country)
            .map(|(_, m)| *m)
            .unwrap_or(self.default_salary_multiplier)
    }
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

fn pairs(items: &[(&str, &str)]) -> Vec<(String, String)> {
    items
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

impl Default for Taxonomy {
    fn default() -> Self {
        Self {
            skill_categories: [
                strings(&[
                    "React",
                    "Angular",
                    "Vue JS",
                    "HTML/CSS",
                    "JavaScript",
                    "TypeScript",
                    "Bootstrap",
                    "Next JS",
                ]),
                strings(&[
                    "Node JS",
                    "Django",
                    "Flask",
                    "Express",
                    "FastAPI",
                    "Spring Boot",
                    "Laravel",
                    "PHP",
                ]),
                strings(&["React Native", "Flutter", "Swift", "Kotlin", "Android", "iOS"]),
                strings(&[
                    "Machine Learning",
                    "Data Analysis",
                    "Pandas",
                    "Tensorflow",
                    "Pytorch",
                    "Computer Vision",
                    "NLP",
                ]),
                strings(&[
                    "Amazon Web Services",
                    "Azure",
                    "Google Cloud Platform",
                    "Docker",
                    "Kubernetes",
                ]),
                strings(&["SQL", "PostgreSQL", "MongoDB", "NoSQL", "Redis", "MySQL"]),
                strings(&["Jenkins", "Terraform", "Ansible", "CI/CD", "Docker", "Kubernetes"]),
                strings(&[
                    "Python",
                    "Java",
                    "JavaScript",
                    "TypeScript",
                    "C++",
                    "C#",
                    "Go",
                    "Rust",
                ]),
            ],
            high_demand_skills: strings(&[
                "React",
                "JavaScript",
                "Python",
                "Node JS",
                "TypeScript",
                "Java",
                "Machine Learning",
                "SQL",
                "Amazon Web Services",
                "Docker",
            ]),
            big_tech_companies: strings(&[
                "Google",
                "Amazon",
                "Microsoft",
                "Apple",
                "Meta",
                "Netflix",
                "Tesla",
                "Uber",
                "Airbnb",
                "Spotify",
                "Stripe",
            ]),
            senior_keywords: strings(&[
                "Senior",
                "Lead",
                "Principal",
                "Staff",
                "Director",
                "VP",
                "CTO",
                "Co-Founder",
                "Head of",
                "Chief",
            ]),
            lead_keywords: strings(&["Lead", "Manager", "Director", "VP", "CTO"]),
            tech_subjects: strings(&[
                "Computer Science",
                "Information Technology",
                "Software",
                "Data Science",
                "Machine Learning",
            ]),
            high_gpa_markers: strings(&["GPA 3.5-3.9", "GPA 4.0", "Summa Cum Laude", "Cum Laude"]),
            basic_degree_points: DegreePoints::from_pairs(&[
                ("Doctorate", 20),
                ("Master's Degree", 15),
                ("Bachelor's Degree", 10),
                ("Associate's Degree", 5),
                ("High School Diploma", 2),
            ]),
            detailed_degree_points: DegreePoints::from_pairs(&[
                ("Doctorate", 25),
                ("Master's Degree", 20),
                ("Bachelor's Degree", 15),
                ("Associate's Degree", 10),
                ("High School Diploma", 5),
            ]),
            salary_multipliers: [
                ("United States", 1.0),
                ("Canada", 0.8),
                ("Germany", 0.9),
                ("United Kingdom", 0.9),
                ("Australia", 0.8),
                ("India", 0.3),
                ("Brazil", 0.4),
                ("Mexico", 0.5),
                ("Argentina", 0.4),
                ("Pakistan", 0.2),
                ("Bangladesh", 0.2),
            ]
            .iter()
            .map(|(k, v)| (k.to_string(), *v))
            .collect(),
            default_salary_multiplier: 0.5,
            tech_hubs: strings(&[
                "San Francisco",
                "New York",
                "Seattle",
                "Austin",
                "Boston",
                "Toronto",
                "Berlin",
                "London",
                "Bangalore",
                "Sydney",
            ]),
            continent_fallback: pairs(&[
                ("United States", "North America"),
                ("Canada", "North America"),
                ("Mexico", "North America"),
                ("Brazil", "South America"),
                ("Argentina", "South America"),
                ("Peru", "South America"),
                ("Germany", "Europe"),
                ("Spain", "Europe"),
                ("United Kingdom", "Europe"),
                ("France", "Europe"),
                ("India", "Asia"),
                ("Pakistan", "Asia"),
                ("Bangladesh", "Asia"),
                ("China", "Asia"),
                ("Australia", "Oceania"),
                ("Egypt", "Africa"),
            ]),
            timezone_fallback: pairs(&[
                ("United States", "Americas"),
                ("Canada", "Americas"),
                ("Brazil", "Americas"),
                ("Argentina", "Americas"),
                ("Germany", "Europe"),
                ("Spain", "Europe"),
                ("United Kingdom", "Europe"),
                ("India", "Asia"),
                ("Pakistan", "Asia"),
                ("Bangladesh", "Asia"),
                ("China", "Asia"),
                ("Australia", "Asia-Pacific"),
            ]),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_order_matches_index() {
        for (i, category) in SkillCategory::ALL.iter().enumerate() {
            assert_eq!(category.index(), i);
        }
    }

    #[test]
    fn test_docker_belongs_to_cloud_and_devops() {
        let t = Taxonomy::default();
        assert!(t.category_members(SkillCategory::Cloud).contains(&"Docker".to_string()));
        assert!(t.category_members(SkillCategory::Devops).contains(&"Docker".to_string()));
    }

    #[test]
    fn test_unknown_degree_level_scores_zero() {
        let t = Taxonomy::default();
        assert_eq!(t.basic_degree_points.points_for("Master's Degree"), 15);
        assert_eq!(t.basic_degree_points.points_for("Masters"), 0);
    }

    #[test]
    fn test_salary_multiplier_default() {
        let t = Taxonomy::default();
        assert_eq!(t.salary_multiplier("India"), 0.3);
        assert_eq!(t.salary_multiplier("Atlantis"), 0.5);
    }
}
