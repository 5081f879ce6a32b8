use crate::handlers;
use crate::state::AppState;
use axum::{routing::{get, post}, Router};

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::index))
        .route("/view/:view", post(handlers::switch_view))
        .route("/submit", post(handlers::submit_form))
        .route("/api/records", get(handlers::get_records))
        .route("/api/stats", get(handlers::get_stats))
        .route("/api/draft", get(handlers::get_draft).post(handlers::edit_draft))
        .route("/api/submit", post(handlers::submit))
        .route("/api/refresh", post(handlers::refresh))
        .route("/api/view", get(handlers::get_view).post(handlers::set_view))
        .with_state(state)
}
