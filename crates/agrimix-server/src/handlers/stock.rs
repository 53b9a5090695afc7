use agrimix_api::{OkResponse, PriceRequest, PriceResponse, StockItemResponse, StockRequest};
use agrimix_model::StockItemId;
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
    match store::list_stock(&conn, Scope::ActiveOnly) {
        Ok(items) => Json(
            items
                .into_iter()
                .map(StockItemResponse::from_item)
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
    match store::get_stock_item(&conn, StockItemId::new(id), Scope::ActiveOnly) {
        Ok(item) => Json(StockItemResponse::from_item(item)).into_response(),
        Err(err) => store_error_response(&err),
    }
}

pub(crate) async fn create(
    State(state): State<AppState>,
    payload: Result<Json<StockRequest>, JsonRejection>,
) -> Response {
    let request = match require_json(payload) {
        Ok(request) => request,
        Err(response) => return response,
    };
    let conn = state.db.lock().await;
    match store::create_stock_item(&conn, &request.into_input()) {
        Ok(item) => Json(StockItemResponse::from_item(item)).into_response(),
        Err(err) => store_error_response(&err),
    }
}

pub(crate) async fn update(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    payload: Result<Json<StockRequest>, JsonRejection>,
) -> Response {
    let request = match require_json(payload) {
        Ok(request) => request,
        Err(response) => return response,
    };
    let now = state.clock.now();
    let conn = state.db.lock().await;
    match store::update_stock_item(&conn, StockItemId::new(id), &request.into_input(), now) {
        Ok(item) => Json(StockItemResponse::from_item(item)).into_response(),
        Err(err) => store_error_response(&err),
    }
}

pub(crate) async fn delete(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Response {
    let now = state.clock.now();
    let conn = state.db.lock().await;
    match store::delete_stock_item(&conn, StockItemId::new(id), now) {
        Ok(()) => Json(OkResponse::ok()).into_response(),
        Err(err) => store_error_response(&err),
    }
}

/// Price Ledger entry point: persists the new price and flags every recipe
/// using this material in one transaction.
pub(crate) async fn set_price(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    payload: Result<Json<PriceRequest>, JsonRejection>,
) -> Response {
    let request = match require_json(payload) {
        Ok(request) => request,
        Err(response) => return response,
    };
    let now = state.clock.now();
    let mut conn = state.db.lock().await;
    match store::set_stock_price(&mut conn, StockItemId::new(id), request.new_price, now) {
        Ok(previous) => {
            info!(stock_id = id, previous, new = request.new_price, "stock price updated");
            Json(PriceResponse {
                previous_price: previous,
                new_price: request.new_price,
            })
            .into_response()
        }
        Err(err) => store_error_response(&err),
    }
}
