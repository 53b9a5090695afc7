use agrimix_api::{SettingsRequest, SettingsResponse};
use agrimix_store as store;
use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::response::{IntoResponse, Response};
use axum::Json;

use super::support::{require_json, store_error_response};
use crate::AppState;

/// Settings reads go through the TTL cache; a stale slot is refreshed from
/// the database transparently.
pub(crate) async fn get_all(State(state): State<AppState>) -> Response {
    let conn = state.db.lock().await;
    match state.settings_cache.get(&conn) {
        Ok(settings) => Json(SettingsResponse::from_settings(settings)).into_response(),
        Err(err) => store_error_response(&err),
    }
}

/// Write-through: persist, then invalidate the cache so the next read sees
/// the new values regardless of TTL.
pub(crate) async fn update(
    State(state): State<AppState>,
    payload: Result<Json<SettingsRequest>, JsonRejection>,
) -> Response {
    let request = match require_json(payload) {
        Ok(request) => request,
        Err(response) => return response,
    };
    let now = state.clock.now();
    let conn = state.db.lock().await;
    match store::update_settings(&conn, &request.into_input(), now) {
        Ok(settings) => {
            state.settings_cache.invalidate();
            Json(SettingsResponse::from_settings(settings)).into_response()
        }
        Err(err) => store_error_response(&err),
    }
}
