use std::sync::Arc;

use axum::{
    extract::{Query, State},
    Json,
};
use serde_json::{json, Value};

use crate::dashboard::analytics::{
    filter_options, market_analytics, overview, FilterOptions, MarketAnalytics, Overview,
};
use crate::dashboard::filters::{search_candidates, validate_pagination, CandidatePage, CandidateQuery};
use crate::dashboard::insights::derive_insights;
use crate::dashboard::table::CandidateTable;
use crate::errors::AppError;
use crate::state::AppState;

pub const ENDPOINTS: [&str; 5] = [
    "/api/v1/overview",
    "/api/v1/candidates",
    "/api/v1/insights/comprehensive",
    "/api/v1/analytics/market",
    "/api/v1/filters/options",
];

fn require_table(state: &AppState) -> Result<&Arc<CandidateTable>, AppError> {
    state.table.as_ref().ok_or(AppError::DataUnavailable)
}

/// GET /
pub async fn handle_root(State(state): State<AppState>) -> Json<Value> {
    let version = env!("CARGO_PKG_VERSION");
    match &state.table {
        Some(table) => Json(json!({
            "message": "HiringSight API",
            "version": version,
            "status": "ready",
            "total_candidates": table.len(),
            "countries": table.distinct_countries(),
            "endpoints": ENDPOINTS,
        })),
        None => Json(json!({
            "message": "HiringSight API",
            "version": version,
            "status": "data_not_loaded",
            "error": format!(
                "Please check if {} exists",
                state.config.table_path().display()
            ),
        })),
    }
}

/// GET /api/v1/overview
pub async fn handle_overview(State(state): State<AppState>) -> Result<Json<Overview>, AppError> {
    let table = require_table(&state)?;
    Ok(Json(overview(table)))
}

/// GET /api/v1/candidates
pub async fn handle_candidates(
    State(state): State<AppState>,
    Query(query): Query<CandidateQuery>,
) -> Result<Json<CandidatePage>, AppError> {
    let table = require_table(&state)?;
    let (limit, offset) = validate_pagination(query.limit, query.offset)?;
    Ok(Json(search_candidates(&table.rows, &query, limit, offset)))
}

/// GET /api/v1/analytics/market
pub async fn handle_market_analytics(
    State(state): State<AppState>,
) -> Result<Json<MarketAnalytics>, AppError> {
    let table = require_table(&state)?;
    Ok(Json(market_analytics(table)))
}

/// GET /api/v1/filters/options
pub async fn handle_filter_options(
    State(state): State<AppState>,
) -> Result<Json<FilterOptions>, AppError> {
    let table = require_table(&state)?;
    Ok(Json(filter_options(table)))
}

/// GET /api/v1/insights/comprehensive
/// Serves the pre-computed report verbatim; falls back to a summary derived from the table.
pub async fn handle_insights(State(state): State<AppState>) -> Result<Json<Value>, AppError> {
    if let Some(report) = &state.insights {
        return Ok(Json(report.as_ref().clone()));
    }
    let table = require_table(&state)?;
    let derived = serde_json::to_value(derive_insights(table))
        .map_err(|e| AppError::Internal(e.into()))?;
    Ok(Json(derived))
}
