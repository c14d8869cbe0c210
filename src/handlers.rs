use crate::errors::AppError;
use crate::host::{self, HostQuery, RequestHost};
use crate::models::{Category, SliceRequest, SliceView, Store};
use crate::state::AppState;
use crate::store;
use crate::ui::render_index;
use crate::view::build_view;
use axum::{
    Json,
    extract::{Path, Query, State},
    http::HeaderMap,
    response::{Html, Redirect},
};
use std::sync::Arc;
use tracing::info;

pub async fn index(
    State(state): State<AppState>,
    Query(query): Query<HostQuery>,
    headers: HeaderMap,
) -> Html<String> {
    let entries = state.store.lock().await.entries.clone();

    let host = RequestHost::from_request(&query, &headers);
    let environment = host::startup(&host).await;

    let view = build_view(&entries, environment);
    Html(render_index(&view, environment, host.ready_signalled()))
}

pub async fn get_view(
    State(state): State<AppState>,
    Query(query): Query<HostQuery>,
    headers: HeaderMap,
) -> Json<SliceView> {
    let host = RequestHost::from_request(&query, &headers);
    let environment = host::detect(&host).await;
    let store = state.store.lock().await;
    Json(build_view(&store.entries, environment))
}

pub async fn get_entries(State(state): State<AppState>) -> Json<Store> {
    let store = state.store.lock().await;
    Json(store.clone())
}

pub async fn choose(
    State(state): State<AppState>,
    Query(query): Query<HostQuery>,
    headers: HeaderMap,
    Json(payload): Json<SliceRequest>,
) -> Result<Json<SliceView>, AppError> {
    let category = Category::parse_known(&payload.category)
        .ok_or_else(|| AppError::unknown_category(&payload.category))?;

    let updated = apply_choice(&state, category).await?;

    let host = RequestHost::from_request(&query, &headers);
    let environment = host::detect(&host).await;
    Ok(Json(build_view(&updated.entries, environment)))
}

pub async fn choose_form(
    State(state): State<AppState>,
    Query(query): Query<HostQuery>,
    headers: HeaderMap,
    Path(tag): Path<String>,
) -> Result<Redirect, AppError> {
    let category = Category::parse_known(&tag).ok_or_else(|| AppError::unknown_category(&tag))?;
    apply_choice(&state, category).await?;

    let host = RequestHost::from_request(&query, &headers);
    let environment = host::detect(&host).await;
    Ok(Redirect::to(&format!("/{}", environment.query_suffix())))
}

/// Appends under the session lock. The write-through is file IO, so it runs
/// on the blocking pool.
async fn apply_choice(state: &AppState, category: Category) -> Result<Store, AppError> {
    let mut current = state.store.lock().await;

    let snapshot = current.clone();
    let storage = Arc::clone(&state.storage);
    let chosen = category.clone();
    let updated =
        tokio::task::spawn_blocking(move || store::append(&snapshot, chosen, storage.as_ref()))
            .await
            .map_err(AppError::internal)?;
    *current = updated.clone();

    info!(category = %category, entries = updated.entries.len(), "slice chosen");
    Ok(updated)
}
