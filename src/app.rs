use crate::handlers;
use crate::state::AppState;
use axum::{routing::{get, post}, Router};

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::index))
        .route("/slice/:category", post(handlers::choose_form))
        .route("/api/view", get(handlers::get_view))
        .route("/api/entries", get(handlers::get_entries))
        .route("/api/slice", post(handlers::choose))
        .with_state(state)
}
