use std::sync::Arc;

use serde_json::Value;

use crate::config::Config;
use crate::dashboard::table::CandidateTable;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// `None` when the exported table was missing or unreadable at startup.
    pub table: Option<Arc<CandidateTable>>,
    /// Pre-computed insights report, served verbatim when present.
    pub insights: Option<Arc<Value>>,
    pub config: Config,
}

impl AppState {
    /// Loads the table and report named by `config`. Never fails; missing data
    /// is reported by the endpoints instead.
    pub fn load(config: Config) -> Self {
        let table = CandidateTable::load_if_present(&config.table_path()).map(Arc::new);
        let insights = crate::dashboard::insights::load_report(&config.insights_path).map(Arc::new);
        Self {
            table,
            insights,
            config,
        }
    }
}
