pub mod health;

use axum::{routing::get, Router};

use crate::dashboard::handlers;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        .route("/", get(handlers::handle_root))
        // Dashboard API
        .route("/api/v1/overview", get(handlers::handle_overview))
        .route("/api/v1/candidates", get(handlers::handle_candidates))
        .route(
            "/api/v1/analytics/market",
            get(handlers::handle_market_analytics),
        )
        .route(
            "/api/v1/filters/options",
            get(handlers::handle_filter_options),
        )
        .route(
            "/api/v1/insights/comprehensive",
            get(handlers::handle_insights),
        )
        .with_state(state)
}
