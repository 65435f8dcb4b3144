pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};

use crate::screening::handlers;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    let max_upload_bytes = state.config.max_upload_bytes;

    Router::new()
        .route("/health", get(health::health_handler))
        // Screening API
        .route(
            "/api/v1/screenings",
            post(handlers::handle_create_screening),
        )
        .route(
            "/api/v1/screenings/folder",
            post(handlers::handle_folder_screening),
        )
        .route("/api/v1/screenings/:id", get(handlers::handle_get_screening))
        // Report scoring API
        .route("/api/v1/reports/score", post(handlers::handle_score_report))
        .route(
            "/api/v1/reports/score-batch",
            post(handlers::handle_score_batch),
        )
        .layer(DefaultBodyLimit::max(max_upload_bytes))
        .with_state(state)
}
