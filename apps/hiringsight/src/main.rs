mod cli;
mod config;
mod dashboard;
mod errors;
mod features;
mod models;
mod routes;
mod state;

use anyhow::{Context, Result};
use clap::Parser;
use std::net::SocketAddr;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use std::sync::Arc;

use crate::cli::{Cli, Commands};
use crate::config::Config;
use crate::features::export::export;
use crate::features::location::select_resolver;
use crate::features::pipeline::{load_submissions, FeatureEngineer};
use crate::features::post_process::post_process;
use crate::features::summary::build_summary;
use crate::features::taxonomy::Taxonomy;
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = cli.command.apply(Config::from_env()?);

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    match cli.command {
        Commands::Engineer { .. } => engineer(&config),
        Commands::Serve { .. } => serve(config).await,
    }
}

/// Batch run: load, engineer, post-process, export.
fn engineer(config: &Config) -> Result<()> {
    info!("Starting HiringSight feature engineering v{}", env!("CARGO_PKG_VERSION"));

    let submissions = load_submissions(&config.input_path)?;
    info!(
        "Loaded {} submissions from {}",
        submissions.len(),
        config.input_path.display()
    );

    let taxonomy = Arc::new(Taxonomy::default());
    let resolver = select_resolver(config.geo_resolver, &taxonomy);
    let engineer = FeatureEngineer::new(Arc::clone(&taxonomy), resolver);

    let run = engineer.engineer_all(&submissions);
    let records = post_process(run.records);
    let summary = build_summary(&records);

    export(&config.output_base, &records, &summary)
        .with_context(|| format!("exporting results to {}", config.output_base))?;

    info!(
        candidates = summary.dataset_summary.total_candidates,
        skipped = run.skipped.len(),
        avg_overall_score = summary.dataset_summary.avg_overall_score,
        avg_enhanced_score = summary.dataset_summary.avg_enhanced_score,
        countries = summary.dataset_summary.countries_represented,
        "Feature engineering complete"
    );
    Ok(())
}

async fn serve(config: Config) -> Result<()> {
    info!("Starting HiringSight API v{}", env!("CARGO_PKG_VERSION"));

    let port = config.port;
    let state = AppState::load(config);

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{port}").parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
