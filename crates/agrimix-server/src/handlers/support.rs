use agrimix_api::{api_error_from_store, ApiError, ApiErrorCode};
use agrimix_store::StoreError;
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use tracing::error;

pub(crate) fn api_error_response(err: ApiError) -> Response {
    let status = StatusCode::from_u16(err.code.status())
        .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    (status, Json(err)).into_response()
}

pub(crate) fn store_error_response(err: &StoreError) -> Response {
    let api = api_error_from_store(err);
    if api.code == ApiErrorCode::Internal {
        error!(error = %err, "request failed");
    }
    api_error_response(api)
}

/// Unwrap an extracted JSON body, turning axum's rejection into the wire
/// envelope instead of its plain-text default.
pub(crate) fn require_json<T>(
    payload: Result<Json<T>, JsonRejection>,
) -> Result<T, Response> {
    match payload {
        Ok(Json(value)) => Ok(value),
        Err(rejection) => Err(api_error_response(ApiError::validation(format!(
            "malformed payload: {rejection}"
        )))),
    }
}
