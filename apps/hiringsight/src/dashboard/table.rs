use std::collections::HashSet;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use thiserror::Error;
use tracing::{error, info, warn};

use crate::models::features::NONE_LABEL;
use crate::models::table::CandidateRow;

/// Shown in place of a blank candidate name.
pub const ANONYMOUS_NAME: &str = "Anonymous Candidate";
/// Category label for candidates whose skills matched nothing.
pub const GENERAL_CATEGORY: &str = "general";
pub const UNKNOWN: &str = "Unknown";

#[derive(Debug, Error)]
pub enum TableError {
    #[error("failed to open {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed row in {path}: {source}")]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },
}

/// The exported feature table, loaded once and shared read-only.
#[derive(Debug, Clone, Default)]
pub struct CandidateTable {
    pub rows: Vec<CandidateRow>,
    pub last_updated: Option<DateTime<Utc>>,
}

impl CandidateTable {
    pub fn from_rows(rows: Vec<CandidateRow>) -> Self {
        let rows = rows.into_iter().map(normalize).collect();
        Self {
            rows,
            last_updated: None,
        }
    }

    pub fn load(path: &Path) -> Result<Self, TableError> {
        let csv_err = |source| TableError::Csv {
            path: path.to_path_buf(),
            source,
        };

        let mut reader = csv::Reader::from_path(path).map_err(csv_err)?;
        let rows = reader
            .deserialize::<CandidateRow>()
            .collect::<Result<Vec<_>, _>>()
            .map_err(csv_err)?;

        let modified = std::fs::metadata(path)
            .and_then(|m| m.modified())
            .map_err(|source| TableError::Io {
                path: path.to_path_buf(),
                source,
            })?;

        let mut table = Self::from_rows(rows);
        table.last_updated = Some(DateTime::<Utc>::from(modified));
        Ok(table)
    }

    /// Loads the table when the file exists. A missing or unreadable table is
    /// logged and the service runs without data.
    pub fn load_if_present(path: &Path) -> Option<Self> {
        if !path.exists() {
            warn!("Data file not found at {}", path.display());
            return None;
        }
        match Self::load(path) {
            Ok(table) => {
                info!(
                    candidates = table.len(),
                    "Loaded candidate table from {}",
                    path.display()
                );
                Some(table)
            }
            Err(e) => {
                error!("Error loading data: {e}");
                None
            }
        }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn distinct_countries(&self) -> usize {
        self.rows
            .iter()
            .map(|r| r.country.as_str())
            .collect::<HashSet<_>>()
            .len()
    }
}

/// Fills blanks the way the dashboard displays them.
fn normalize(mut row: CandidateRow) -> CandidateRow {
    if row.name.trim().is_empty() {
        row.name = ANONYMOUS_NAME.to_string();
    }
    if row.primary_skill_category.is_empty() || row.primary_skill_category == NONE_LABEL {
        row.primary_skill_category = GENERAL_CATEGORY.to_string();
    }
    for field in [&mut row.country, &mut row.continent, &mut row.timezone_group] {
        if field.is_empty() {
            *field = UNKNOWN.to_string();
        }
    }
    if row.experience_level.is_empty() {
        row.experience_level = "Entry".to_string();
    }
    row
}
