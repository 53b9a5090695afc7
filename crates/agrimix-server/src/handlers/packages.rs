use agrimix_api::{OkResponse, PackageRequest, PackageResponse, PriceRequest, PriceResponse};
use agrimix_model::PackageId;
use agrimix_store as store;
use agrimix_store::Scope;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::response::{IntoResponse, Response};
use axum::Json;
use tracing::info;

use super::support::{api_error_response, require_json, store_error_response};
use crate::AppState;

pub(crate) async fn list(State(state): State<AppState>) -> Response {
    let conn = state.db.lock().await;
    match store::list_packages(&conn, Scope::ActiveOnly) {
        Ok(packages) => Json(
            packages
                .into_iter()
                .map(PackageResponse::from_package)
                .collect::<Vec<_>>(),
        )
        .into_response(),
        Err(err) => store_error_response(&err),
    }
}

pub(crate) async fn create(
    State(state): State<AppState>,
    payload: Result<Json<PackageRequest>, JsonRejection>,
) -> Response {
    let request = match require_json(payload) {
        Ok(request) => request,
        Err(response) => return response,
    };
    let input = match request.into_input() {
        Ok(input) => input,
        Err(err) => return api_error_response(err),
    };
    let conn = state.db.lock().await;
    match store::create_package(&conn, &input) {
        Ok(package) => Json(PackageResponse::from_package(package)).into_response(),
        Err(err) => store_error_response(&err),
    }
}

pub(crate) async fn update(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    payload: Result<Json<PackageRequest>, JsonRejection>,
) -> Response {
    let request = match require_json(payload) {
        Ok(request) => request,
        Err(response) => return response,
    };
    let input = match request.into_input() {
        Ok(input) => input,
        Err(err) => return api_error_response(err),
    };
    let conn = state.db.lock().await;
    match store::update_package(&conn, PackageId::new(id), &input) {
        Ok(package) => Json(PackageResponse::from_package(package)).into_response(),
        Err(err) => store_error_response(&err),
    }
}

pub(crate) async fn delete(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Response {
    let now = state.clock.now();
    let conn = state.db.lock().await;
    match store::delete_package(&conn, PackageId::new(id), now) {
        Ok(()) => Json(OkResponse::ok()).into_response(),
        Err(err) => store_error_response(&err),
    }
}

/// Packaging side of the Price Ledger: same transaction discipline as the
/// stock side, staleness flags commit with the price.
pub(crate) async fn set_price(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    payload: Result<Json<PriceRequest>, JsonRejection>,
) -> Response {
    let request = match require_json(payload) {
        Ok(request) => request,
        Err(response) => return response,
    };
    let mut conn = state.db.lock().await;
    match store::set_package_price(&mut conn, PackageId::new(id), request.new_price) {
        Ok(previous) => {
            info!(package_id = id, previous, new = request.new_price, "package price updated");
            Json(PriceResponse {
                previous_price: previous,
                new_price: request.new_price,
            })
            .into_response()
        }
        Err(err) => store_error_response(&err),
    }
}
