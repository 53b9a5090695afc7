use std::path::PathBuf;

use agrimix_api::{BackupRequest, BackupResponse};
use agrimix_store as store;
use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::response::{IntoResponse, Response};
use axum::Json;
use tracing::info;

use super::support::{require_json, store_error_response};
use crate::AppState;

/// Copy the database file into the requested directory. The connection
/// mutex is held for the duration so no write lands mid-copy.
pub(crate) async fn create_backup(
    State(state): State<AppState>,
    payload: Result<Json<BackupRequest>, JsonRejection>,
) -> Response {
    let request = match require_json(payload) {
        Ok(request) => request,
        Err(response) => return response,
    };
    let now = state.clock.now();
    let _guard = state.db.lock().await;
    match store::backup_database(
        &state.config.db_path,
        &PathBuf::from(&request.backup_path),
        now,
    ) {
        Ok(info) => {
            info!(path = %info.path.display(), "database backup written");
            Json(BackupResponse::from_info(&info)).into_response()
        }
        Err(err) => store_error_response(&err),
    }
}

/// Restore the newest backup from the requested directory, saving a
/// pre-restore copy of the current file first.
pub(crate) async fn restore(
    State(state): State<AppState>,
    payload: Result<Json<BackupRequest>, JsonRejection>,
) -> Response {
    let request = match require_json(payload) {
        Ok(request) => request,
        Err(response) => return response,
    };
    let now = state.clock.now();
    let _guard = state.db.lock().await;
    match store::restore_latest(
        &state.config.db_path,
        &PathBuf::from(&request.backup_path),
        now,
    ) {
        Ok(info) => {
            info!(path = %info.path.display(), "database restored from backup");
            Json(BackupResponse::from_info(&info)).into_response()
        }
        Err(err) => store_error_response(&err),
    }
}
