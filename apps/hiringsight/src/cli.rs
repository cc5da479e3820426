//! Command-line interface. Flags override the environment-derived `Config`.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::config::Config;
use crate::features::location::ResolverChoice;

#[derive(Parser)]
#[command(name = "hiringsight")]
#[command(about = "Candidate feature engineering and hiring dashboard API")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Engineer features and scores from a submissions export
    Engineer {
        /// JSON array of candidate submissions
        #[arg(short, long)]
        input: Option<PathBuf>,

        /// Output base name; writes <base>.csv and <base>_summary.json
        #[arg(short, long)]
        output_base: Option<String>,

        /// Location resolver: auto, catalog or table
        #[arg(long)]
        geo_resolver: Option<ResolverChoice>,
    },

    /// Serve the read-only dashboard API over an exported table
    Serve {
        /// Port to listen on
        #[arg(short, long)]
        port: Option<u16>,

        /// Base name of the exported table (<base>.csv)
        #[arg(short, long)]
        output_base: Option<String>,

        /// Pre-computed insights report
        #[arg(long)]
        insights: Option<PathBuf>,
    },
}

impl Commands {
    /// Applies flag overrides on top of `config`.
    pub fn apply(&self, mut config: Config) -> Config {
        match self {
            Commands::Engineer {
                input,
                output_base,
                geo_resolver,
            } => {
                if let Some(input) = input {
                    config.input_path = input.clone();
                }
                if let Some(base) = output_base {
                    config.output_base = base.clone();
                }
                if let Some(choice) = geo_resolver {
                    config.geo_resolver = *choice;
                }
            }
            Commands::Serve {
                port,
                output_base,
                insights,
            } => {
                if let Some(port) = port {
                    config.port = *port;
                }
                if let Some(base) = output_base {
                    config.output_base = base.clone();
                }
                if let Some(insights) = insights {
                    config.insights_path = insights.clone();
                }
            }
        }
        config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_engineer_flags_override_config() {
        let cli = Cli::parse_from([
            "hiringsight",
            "engineer",
            "--input",
            "subs.json",
            "--geo-resolver",
            "table",
        ]);
        let config = cli.command.apply(Config::default());
        assert_eq!(config.input_path, PathBuf::from("subs.json"));
        assert_eq!(config.geo_resolver, ResolverChoice::Table);
        assert_eq!(config.output_base, "engineered_candidates_final");
    }

    #[test]
    fn test_serve_flags_override_config() {
        let cli = Cli::parse_from(["hiringsight", "serve", "-p", "9001"]);
        let config = cli.command.apply(Config::default());
        assert_eq!(config.port, 9001);
    }

    #[test]
    fn test_rejects_unknown_resolver() {
        assert!(Cli::try_parse_from(["hiringsight", "engineer", "--geo-resolver", "gps"]).is_err());
    }
}
