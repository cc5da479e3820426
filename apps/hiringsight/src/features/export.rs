use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::info;

use crate::features::summary::SummaryReport;
use crate::models::features::EnrichedRecord;
use crate::models::table::CandidateRow;

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("failed to create {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write table {path}: {source}")]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("failed to write summary {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Files produced by one export.
#[derive(Debug, Clone, PartialEq)]
pub struct OutputPaths {
    pub table: PathBuf,
    pub summary: PathBuf,
}

impl OutputPaths {
    /// `<base>.csv` and `<base>_summary.json`.
    pub fn for_base(base: &str) -> Self {
        Self {
            table: PathBuf::from(format!("{base}.csv")),
            summary: PathBuf::from(format!("{base}_summary.json")),
        }
    }
}

pub fn write_table(path: &Path, records: &[EnrichedRecord]) -> Result<(), ExportError> {
    let csv_err = |source| ExportError::Csv {
        path: path.to_path_buf(),
        source,
    };

    let mut writer = csv::Writer::from_path(path).map_err(csv_err)?;
    for record in records {
        writer.serialize(CandidateRow::from(record)).map_err(csv_err)?;
    }
    writer.flush().map_err(|source| ExportError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(())
}

pub fn write_summary(path: &Path, summary: &SummaryReport) -> Result<(), ExportError> {
    let file = File::create(path).map_err(|source| ExportError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::to_writer_pretty(BufWriter::new(file), summary).map_err(|source| {
        ExportError::Json {
            path: path.to_path_buf(),
            source,
        }
    })
}

pub fn export(
    base: &str,
    records: &[EnrichedRecord],
    summary: &SummaryReport,
) -> Result<OutputPaths, ExportError> {
    let paths = OutputPaths::for_base(base);
    write_table(&paths.table, records)?;
    write_summary(&paths.summary, summary)?;
    info!(
        rows = records.len(),
        table = %paths.table.display(),
        summary = %paths.summary.display(),
        "Results saved"
    );
    Ok(paths)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::location::TableResolver;
    use crate::features::pipeline::FeatureEngineer;
    use crate::features::post_process::post_process;
    use crate::features::summary::build_summary;
    use crate::features::taxonomy::Taxonomy;
    use serde_json::json;
    use std::sync::Arc;

    #[test]
    fn test_export_writes_table_and_summary() {
        let taxonomy = Arc::new(Taxonomy::default());
        let engineer = FeatureEngineer::new(
            Arc::clone(&taxonomy),
            Box::new(TableResolver::new(&taxonomy)),
        );
        let input = vec![
            json!({
                "name": "Lin",
                "skills": ["Python", "SQL"],
                "work_experiences": [{"company": "Meta", "roleName": "Engineer"}],
                "location": "Toronto, Canada"
            }),
            json!({}),
        ];
        let records = post_process(engineer.engineer_all(&input).records);
        let summary = build_summary(&records);

        let dir = tempfile::tempdir().unwrap();
        let base = dir.path().join("out");
        let paths = export(base.to_str().unwrap(), &records, &summary).unwrap();

        let mut reader = csv::Reader::from_path(&paths.table).unwrap();
        let headers = reader.headers().unwrap().clone();
        assert_eq!(&headers[0], "candidate_id");
        assert_eq!(&headers[headers.len() - 1], "enhanced_value_for_money");

        let rows: Vec<CandidateRow> = reader.deserialize().map(|r| r.unwrap()).collect();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].original_skills, "Python, SQL");
        assert_eq!(rows[0].original_work_experiences, "Meta: Engineer");
        assert_eq!(rows[1].primary_skill_category, "None");
        assert_eq!(rows[1].country, "Unknown");

        let text = std::fs::read_to_string(&paths.summary).unwrap();
        let value: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(value["dataset_summary"]["total_candidates"], json!(2));
    }

    #[test]
    fn test_export_into_missing_directory_fails() {
        let records = Vec::new();
        let summary = build_summary(&records);
        let err = export("/nonexistent-dir/out", &records, &summary).unwrap_err();
        assert!(matches!(err, ExportError::Csv { .. }));
    }
}
