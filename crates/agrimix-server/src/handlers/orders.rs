use agrimix_api::{
    ActiveOrderResponse, OkResponse, OrderRequest, OrderResponse, OrderStatusRequest,
};
use agrimix_model::OrderId;
use agrimix_store as store;
use agrimix_store::Scope;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::response::{IntoResponse, Response};
use axum::Json;

use super::support::{api_error_response, require_json, store_error_response};
use crate::AppState;

pub(crate) async fn list(State(state): State<AppState>) -> Response {
    let conn = state.db.lock().await;
    match store::list_orders(&conn, Scope::ActiveOnly) {
        Ok(orders) => Json(
            orders
                .into_iter()
                .map(OrderResponse::from_order)
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
    match store::get_order(&conn, OrderId::new(id), Scope::ActiveOnly) {
        Ok(order) => Json(OrderResponse::from_order(order)).into_response(),
        Err(err) => store_error_response(&err),
    }
}

pub(crate) async fn list_active(State(state): State<AppState>) -> Response {
    let conn = state.db.lock().await;
    match store::list_active_orders(&conn) {
        Ok(rows) => Json(
            rows.into_iter()
                .map(ActiveOrderResponse::from_row)
                .collect::<Vec<_>>(),
        )
        .into_response(),
        Err(err) => store_error_response(&err),
    }
}

pub(crate) async fn create(
    State(state): State<AppState>,
    payload: Result<Json<OrderRequest>, JsonRejection>,
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
    match store::create_order(&conn, &input) {
        Ok(order) => Json(OrderResponse::from_order(order)).into_response(),
        Err(err) => store_error_response(&err),
    }
}

pub(crate) async fn update_status(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    payload: Result<Json<OrderStatusRequest>, JsonRejection>,
) -> Response {
    let request = match require_json(payload) {
        Ok(request) => request,
        Err(response) => return response,
    };
    let status = match request.parse_status() {
        Ok(status) => status,
        Err(err) => return api_error_response(err),
    };
    let conn = state.db.lock().await;
    match store::update_order_status(&conn, OrderId::new(id), status) {
        Ok(order) => Json(OrderResponse::from_order(order)).into_response(),
        Err(err) => store_error_response(&err),
    }
}

pub(crate) async fn delete(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Response {
    let now = state.clock.now();
    let conn = state.db.lock().await;
    match store::delete_order(&conn, OrderId::new(id), now) {
        Ok(()) => Json(OkResponse::ok()).into_response(),
        Err(err) => store_error_response(&err),
    }
}
