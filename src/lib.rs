//! Spaced-repetition review engine with daily budgets, plus coach feedback
//! statistics over automated-judgment model versions.

use std::sync::Arc;

use axum::{
    Json, Router,
    routing::{get, post},
};
use serde_json::{Value, json};
use tower_http::cors::CorsLayer;

pub mod config;
pub mod data;
pub mod db;
pub mod features;
pub mod handlers;
pub mod schema;
pub mod utils;

pub use config::Config;
pub use db::DbPool;

use handlers::{analysis, cards, judgment, student};
use utils::Clock;

/// Everything a request needs; cloned into each handler.
#[derive(Clone)]
pub struct AppState {
    pub pool: DbPool,
    pub config: Arc<Config>,
    pub clock: Arc<dyn Clock>,
}

impl AppState {
    pub fn new(pool: DbPool, config: Config, clock: Arc<dyn Clock>) -> Self {
        AppState {
            pool,
            config: Arc::new(config),
            clock,
        }
    }
}

pub fn app(state: AppState) -> Router {
    let student_router = Router::new()
        .route(
            "/student",
            get(student::list_students).post(student::create_student),
        )
        .route(
            "/student/",
            get(student::list_students).post(student::create_student),
        )
        .route(
            "/student/{student_id}",
            get(student::get_student).put(student::update_student),
        )
        .route(
            "/student/{student_id}/daily_review_deck",
            get(student::daily_review_deck),
        );

    let card_router = Router::new()
        .route("/cards", post(cards::create_card))
        .route("/cards/", post(cards::create_card))
        .route("/cards/{card_id}", get(cards::get_card))
        .route("/cards/{card_id}/review", post(cards::review_card));

    let filter_router = Router::new()
        .route(
            "/filter/logs",
            get(judgment::list_logs).post(judgment::record_judgment),
        )
        .route("/filter/feedback", post(judgment::submit_feedback));

    let analysis_router = Router::new()
        .route("/analysis/feedback-summary", get(analysis::feedback_summary))
        .route("/analysis/ab-test-summary", get(analysis::ab_test_summary));

    let api_router = Router::new()
        .merge(student_router)
        .merge(card_router)
        .merge(filter_router)
        .merge(analysis_router);

    Router::new()
        .route("/", get(root))
        .nest("/api/v1", api_router)
        .layer(CorsLayer::permissive())
        .with_state(state)
}

async fn root() -> Json<Value> {
    Json(json!({ "message": "Welcome to the Pacer API" }))
}
