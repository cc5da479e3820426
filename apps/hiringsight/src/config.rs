use std::path::PathBuf;

use anyhow::{anyhow, Context, Result};

use crate::features::location::ResolverChoice;

/// Application configuration loaded from environment variables.
/// Every variable has a default; command-line flags override them in `main`.
#[derive(Debug, Clone)]
pub struct Config {
    pub input_path: PathBuf,
    /// Output files are `<output_base>.csv` and `<output_base>_summary.json`.
    pub output_base: String,
    pub insights_path: PathBuf,
    pub geo_resolver: ResolverChoice,
    pub port: u16,
    pub rust_log: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            input_path: PathBuf::from("form-submissions.json"),
            output_base: "engineered_candidates_final".to_string(),
            insights_path: PathBuf::from("comprehensive_hiring_insights.json"),
            geo_resolver: ResolverChoice::Auto,
            port: 8000,
            rust_log: "info".to_string(),
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        let defaults = Config::default();
        Ok(Config {
            input_path: env_or("INPUT_PATH")
                .map(PathBuf::from)
                .unwrap_or(defaults.input_path),
            output_base: env_or("OUTPUT_BASE").unwrap_or(defaults.output_base),
            insights_path: env_or("INSIGHTS_PATH")
                .map(PathBuf::from)
                .unwrap_or(defaults.insights_path),
            geo_resolver: match env_or("GEO_RESOLVER") {
                Some(v) => v
                    .parse()
                    .map_err(|e: String| anyhow!("GEO_RESOLVER: {e}"))?,
                None => defaults.geo_resolver,
            },
            port: match env_or("PORT") {
                Some(v) => v
                    .parse::<u16>()
                    .context("PORT must be a valid port number")?,
                None => defaults.port,
            },
            rust_log: env_or("RUST_LOG").unwrap_or(defaults.rust_log),
        })
    }

    pub fn table_path(&self) -> PathBuf {
        PathBuf::from(format!("{}.csv", self.output_base))
    }
}

/// Non-empty value of an environment variable.
fn env_or(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.is_empty())
}
