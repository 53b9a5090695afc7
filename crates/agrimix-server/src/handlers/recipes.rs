use agrimix_api::{
    OkResponse, RecipeDetailResponse, RecipeRequest, RecipeSummaryResponse, RecomputeResponse,
};
use agrimix_engine::recompute_all;
use agrimix_model::RecipeId;
use agrimix_store as store;
use agrimix_store::Scope;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::response::{IntoResponse, Response};
use axum::Json;
use tracing::info;

use super::support::{require_json, store_error_response};
use crate::AppState;

pub(crate) async fn list(State(state): State<AppState>) -> Response {
    let conn = state.db.lock().await;
    match store::list_recipes(&conn, Scope::ActiveOnly) {
        Ok(rows) => Json(
            rows.into_iter()
                .map(RecipeSummaryResponse::from_row)
                .collect::<Vec<_>>(),
        )
        .into_response(),
        Err(err) => store_error_response(&err),
    }
}

pub(crate) async fn get_one(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Response {
    let conn = state.db.lock().await;
    match store::get_recipe(&conn, RecipeId::new(id), Scope::ActiveOnly) {
        Ok(details) => Json(RecipeDetailResponse::from_details(details)).into_response(),
        Err(err) => store_error_response(&err),
    }
}

pub(crate) async fn create(
    State(state): State<AppState>,
    payload: Result<Json<RecipeRequest>, JsonRejection>,
) -> Response {
    let request = match require_json(payload) {
        Ok(request) => request,
        Err(response) => return response,
    };
    let now = state.clock.now();
    let mut conn = state.db.lock().await;
    match store::create_recipe(&mut conn, &request.into_input(), now) {
        Ok(details) => Json(RecipeDetailResponse::from_details(details)).into_response(),
        Err(err) => store_error_response(&err),
    }
}

pub(crate) async fn update(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    payload: Result<Json<RecipeRequest>, JsonRejection>,
) -> Response {
    let request = match require_json(payload) {
        Ok(request) => request,
        Err(response) => return response,
    };
    let now = state.clock.now();
    let mut conn = state.db.lock().await;
    match store::update_recipe(&mut conn, RecipeId::new(id), &request.into_input(), now) {
        Ok(details) => Json(RecipeDetailResponse::from_details(details)).into_response(),
        Err(err) => store_error_response(&err),
    }
}

pub(crate) async fn delete(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Response {
    let now = state.clock.now();
    let mut conn = state.db.lock().await;
    match store::delete_recipe(&mut conn, RecipeId::new(id), now) {
        Ok(()) => Json(OkResponse::ok()).into_response(),
        Err(err) => store_error_response(&err),
    }
}

pub(crate) async fn copy(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Response {
    let now = state.clock.now();
    let mut conn = state.db.lock().await;
    match store::copy_recipe(&mut conn, RecipeId::new(id), now) {
        Ok(details) => Json(RecipeDetailResponse::from_details(details)).into_response(),
        Err(err) => store_error_response(&err),
    }
}

/// Full recompute: every live recipe re-costed from the ledger in one
/// transaction, staleness cleared. Safe to call at any time.
pub(crate) async fn update_prices(State(state): State<AppState>) -> Response {
    let now = state.clock.now();
    let mut conn = state.db.lock().await;
    match recompute_all(&mut conn, now) {
        Ok(updated_count) => {
            info!(updated_count, "recipe costs recomputed");
            Json(RecomputeResponse { updated_count }).into_response()
        }
        Err(err) => store_error_response(&store::StoreError::Engine(err)),
    }
}

/// Read-only staleness report: recipes whose stored cost predates the
/// latest ledger prices.
pub(crate) async fn check_price_updates(State(state): State<AppState>) -> Response {
    let conn = state.db.lock().await;
    match store::list_stale_recipes(&conn) {
        Ok(rows) => {
            info!(count = rows.len(), "stale recipes reported");
            Json(
                rows.into_iter()
                    .map(RecipeSummaryResponse::from_row)
                    .collect::<Vec<_>>(),
            )
            .into_response()
        }
        Err(err) => store_error_response(&err),
    }
}
