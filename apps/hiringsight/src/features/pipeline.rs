//! Per-candidate orchestration: parse, extract, score, and catch-and-skip.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde_json::Value;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::features::extractors::{
    extract_availability, extract_education, extract_experience, extract_salary, extract_skills,
};
use crate::features::location::{extract_location, LocationResolver};
use crate::features::scoring::{check_ranges, CandidateScorer, ScoreRangeError};
use crate::features::taxonomy::Taxonomy;
use crate::models::features::{FeatureRecord, Identity};
use crate::models::submission::{json_kind, CandidateSubmission, Field};

/// Whole-run failures. Nothing is written when one of these occurs.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{path} is not valid JSON: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("{path} must contain a JSON array of submissions, found {found}")]
    NotAnArray { path: PathBuf, found: &'static str },
}

/// Why a single candidate was left out of the table.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SkipReason {
    #[error("submission is a JSON {0}, expected an object")]
    NotAnObject(&'static str),

    #[error(transparent)]
    ScoreOutOfRange(#[from] ScoreRangeError),
}

#[derive(Debug, Clone, PartialEq)]
pub struct SkippedCandidate {
    pub candidate_id: usize,
    pub reason: SkipReason,
}

/// Output of one pass over the input. Records keep ascending ids with gaps where
/// candidates were skipped.
#[derive(Debug, Default)]
pub struct EngineeringRun {
    pub records: Vec<FeatureRecord>,
    pub skipped: Vec<SkippedCandidate>,
}

/// Reads the submissions file and checks its top-level shape.
pub fn load_submissions(path: &Path) -> Result<Vec<Value>, PipelineError> {
    let text = std::fs::read_to_string(path).map_err(|source| PipelineError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let value: Value = serde_json::from_str(&text).map_err(|source| PipelineError::Parse {
        path: path.to_path_buf(),
        source,
    })?;
    match value {
        Value::Array(items) => Ok(items),
        other => Err(PipelineError::NotAnArray {
            path: path.to_path_buf(),
            found: json_kind(&other),
        }),
    }
}

fn text_or_empty(field: &Field<String>) -> String {
    field.present().cloned().unwrap_or_default()
}

pub struct FeatureEngineer {
    taxonomy: Arc<Taxonomy>,
    scorer: CandidateScorer,
    resolver: Box<dyn LocationResolver>,
}

impl FeatureEngineer {
    pub fn new(taxonomy: Arc<Taxonomy>, resolver: Box<dyn LocationResolver>) -> Self {
        Self {
            scorer: CandidateScorer::new(Arc::clone(&taxonomy)),
            taxonomy,
            resolver,
        }
    }

    /// Builds the feature record for one raw submission.
    pub fn engineer_candidate(
        &self,
        candidate_id: usize,
        raw: &Value,
    ) -> Result<FeatureRecord, SkipReason> {
        let submission = CandidateSubmission::from_value(raw)
            .ok_or_else(|| SkipReason::NotAnObject(json_kind(raw)))?;
        let taxonomy = self.taxonomy.as_ref();

        let scores = self.scorer.score(&submission);
        check_ranges(&scores)?;

        Ok(FeatureRecord {
            identity: Identity {
                candidate_id,
                name: text_or_empty(&submission.name),
                email: text_or_empty(&submission.email),
                phone: text_or_empty(&submission.phone),
                submitted_at: text_or_empty(&submission.submitted_at),
            },
            salary: extract_salary(&submission.annual_salary_expectation),
            availability: extract_availability(&submission.work_availability),
            experience: extract_experience(&submission.work_experiences, taxonomy),
            education: extract_education(&submission.education, taxonomy),
            skills: extract_skills(&submission.skills, taxonomy),
            location: extract_location(&submission.location, taxonomy, self.resolver.as_ref()),
            scores,
            original_skills: submission.skills.present().cloned().unwrap_or_default(),
            original_work_experiences: submission
                .work_experiences
                .present()
                .cloned()
                .unwrap_or_default(),
        })
    }

    /// Engineers every submission in input order. Failures are recorded and
    /// never shift the ids of later candidates.
    pub fn engineer_all(&self, submissions: &[Value]) -> EngineeringRun {
        let mut run = EngineeringRun::default();

        for (candidate_id, raw) in submissions.iter().enumerate() {
            match self.engineer_candidate(candidate_id, raw) {
                Ok(record) => {
                    debug!(
                        candidate_id,
                        overall = record.scores.overall_score,
                        "Candidate engineered"
                    );
                    run.records.push(record);
                }
                Err(reason) => {
                    warn!(candidate_id, "Skipping candidate: {reason}");
                    run.skipped.push(SkippedCandidate {
                        candidate_id,
                        reason,
                    });
                }
            }
        }

        info!(
            processed = run.records.len(),
            skipped = run.skipped.len(),
            total = submissions.len(),
            "Feature engineering finished"
        );
        run
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::export::export;
    use crate::features::location::TableResolver;
    use crate::features::post_process::post_process;
    use crate::features::summary::build_summary;
    use crate::models::features::{ExperienceLevel, RoleType, NONE_LABEL};
    use serde_json::json;
    use std::io::Write;

    fn engineer() -> FeatureEngineer {
        let taxonomy = Arc::new(Taxonomy::default());
        let resolver = Box::new(TableResolver::new(&taxonomy));
        FeatureEngineer::new(taxonomy, resolver)
    }

    #[test]
    fn test_full_submission() {
        let raw = json!({
            "name": "Grace Hopper",
            "email": "grace@example.com",
            "phone": "+1 555 0100",
            "submitted_at": "2025-01-27 09:00:00.000000",
            "location": "Seattle, United States",
            "annual_salary_expectation": {"full-time": "$95,000"},
            "work_availability": ["full-time", "part-time"],
            "work_experiences": [
                {"company": "Google", "roleName": "Senior Software Engineer"},
                {"company": "Acme", "roleName": "Data Analyst"}
            ],
            "education": {
                "highest_level": "Master's Degree",
                "degrees": [{"subject": "Computer Science", "gpa": "GPA 3.5-3.9", "isTop50": true, "isTop25": false}]
            },
            "skills": ["React", "Node JS", "Python"]
        });

        let record = engineer().engineer_candidate(7, &raw).unwrap();
        assert_eq!(record.identity.candidate_id, 7);
        assert_eq!(record.salary.salary_full_time, 95_000);
        assert!(record.availability.both_available);
        assert_eq!(record.experience.most_common_role_type, Some(RoleType::Engineering));
        assert!(record.education.has_high_gpa);
        assert!(record.skills.is_full_stack);
        assert_eq!(record.location.country, "United States");
        assert!(record.location.is_major_tech_hub);
        assert_eq!(record.scores.completeness_score, 12);
        // 95000 × 1.0 falls in the 80k–120k band.
        assert_eq!(record.scores.market_value_score, 10);
        assert_eq!(record.scores.experience_level, ExperienceLevel::MidLevel);
        assert_eq!(record.original_skills.len(), 3);
    }

    #[test]
    fn test_empty_object_gets_defaults() {
        let record = engineer().engineer_candidate(0, &json!({})).unwrap();
        assert_eq!(record.identity.name, "");
        assert_eq!(record.skills.total_skills, 0);
        assert_eq!(record.skills.primary_skill_category, None);
        assert_eq!(record.education.highest_education_level, NONE_LABEL);
        assert_eq!(record.location.country, "Unknown");
        assert_eq!(record.scores.overall_score, 0.0);
        assert_eq!(record.scores.experience_level, ExperienceLevel::EntryLevel);
    }

    #[test]
    fn test_non_object_is_skipped_without_shifting_ids() {
        let input = vec![json!({"name": "A"}), json!(42), json!({"name": "C"})];
        let run = engineer().engineer_all(&input);

        let ids: Vec<usize> = run.records.iter().map(|r| r.identity.candidate_id).collect();
        assert_eq!(ids, vec![0, 2]);
        assert_eq!(
            run.skipped,
            vec![SkippedCandidate {
                candidate_id: 1,
                reason: SkipReason::NotAnObject("number"),
            }]
        );
    }

    #[test]
    fn test_exported_table_is_byte_identical_across_runs() {
        let input = vec![
            json!({
                "skills": ["Python", "AWS"],
                "location": "Berlin, Germany",
                "annual_salary_expectation": {"full-time": "$85,000"},
                "work_experiences": [{"company": "Meta", "roleName": "Engineer"}]
            }),
            json!("not a candidate"),
            json!({"skills": ["React"], "location": "Lima, Peru"}),
        ];
        let dir = tempfile::tempdir().unwrap();
        let e = engineer();

        let write = |name: &str| {
            let records = post_process(e.engineer_all(&input).records);
            let summary = build_summary(&records);
            let base = dir.path().join(name);
            export(base.to_str().unwrap(), &records, &summary).unwrap()
        };
        let first = write("first");
        let second = write("second");

        assert_eq!(
            std::fs::read(&first.table).unwrap(),
            std::fs::read(&second.table).unwrap()
        );
        assert_eq!(
            std::fs::read(&first.summary).unwrap(),
            std::fs::read(&second.summary).unwrap()
        );
    }

    #[test]
    fn test_load_submissions_rejects_non_array() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "{{\"name\": \"x\"}}").unwrap();
        let err = load_submissions(file.path()).unwrap_err();
        assert!(matches!(err, PipelineError::NotAnArray { found: "object", .. }));
    }

    #[test]
    fn test_load_submissions_reports_bad_json() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "[{{").unwrap();
        assert!(matches!(
            load_submissions(file.path()),
            Err(PipelineError::Parse { .. })
        ));
    }

    #[test]
    fn test_load_submissions_missing_file() {
        let err = load_submissions(Path::new("/nonexistent/submissions.json")).unwrap_err();
        assert!(matches!(err, PipelineError::Read { .. }));
    }
}
