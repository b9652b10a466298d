// HTTP routes

mod dashboard;
mod entries;
mod fixed_expenses;
mod goals;
mod http;
mod owner;

use axum::{
    Router,
    routing::{delete, get, patch, post},
};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};

use crate::clock::Clock;
use crate::config::AppConfig;
use crate::finance_repo::FinanceRepo;

pub use owner::OWNER_HEADER;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) repo: Arc<FinanceRepo>,
    pub(crate) clock: Arc<dyn Clock>,
    pub(crate) config: AppConfig,
}

pub fn app(repo: Arc<FinanceRepo>, clock: Arc<dyn Clock>, config: AppConfig) -> Router {
    let state = AppState {
        repo,
        clock,
        config,
    };
    Router::new()
        .route("/", get(|| async { "pocketgoals: personal finance tracker" })) // GET /
        .route("/version", get(http::version_handler)) // GET /version
        .route("/health", get(|| async { "ok" })) // GET /health
        .route("/api/goals", get(goals::list).post(goals::create))
        .route("/api/goals/backfill", post(goals::refresh))
        .route(
            "/api/goals/{id}",
            get(goals::get_one).put(goals::update).delete(goals::remove),
        )
        .route("/api/goals/{id}/deposits", post(goals::deposit))
        .route("/api/entries", get(entries::list).post(entries::create))
        .route("/api/entries/{id}", delete(entries::remove))
        .route(
            "/api/fixed-expenses",
            get(fixed_expenses::list).post(fixed_expenses::create),
        )
        .route(
            "/api/fixed-expenses/{id}",
            patch(fixed_expenses::toggle).delete(fixed_expenses::remove),
        )
        .route("/api/dashboard", get(dashboard::get_dashboard))
        .layer(CorsLayer::new().allow_origin(Any))
        .with_state(state)
}
