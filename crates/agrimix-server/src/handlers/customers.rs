use std::collections::BTreeMap;

use agrimix_api::{
    parse_customer_list_params, BulkCustomersRequest, BulkResponse, CustomerRequest,
    CustomerResponse, OkResponse,
};
use agrimix_model::CustomerId;
use agrimix_store as store;
use agrimix_store::Scope;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, Query, State};
use axum::response::{IntoResponse, Response};
use axum::Json;

use super::support::{api_error_response, require_json, store_error_response};
use crate::AppState;

pub(crate) async fn list(
    State(state): State<AppState>,
    Query(params): Query<BTreeMap<String, String>>,
) -> Response {
    let filter = match parse_customer_list_params(&params) {
        Ok(filter) => filter,
        Err(err) => return api_error_response(err),
    };
    let conn = state.db.lock().await;
    match store::list_customers(&conn, &filter, Scope::ActiveOnly) {
        Ok(customers) => Json(
            customers
                .into_iter()
                .map(CustomerResponse::from_customer)
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
    match store::get_customer(&conn, CustomerId::new(id), Scope::ActiveOnly) {
        Ok(customer) => Json(CustomerResponse::from_customer(customer)).into_response(),
        Err(err) => store_error_response(&err),
    }
}

pub(crate) async fn create(
    State(state): State<AppState>,
    payload: Result<Json<CustomerRequest>, JsonRejection>,
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
    match store::create_customer(&conn, &input) {
        Ok(customer) => Json(CustomerResponse::from_customer(customer)).into_response(),
        Err(err) => store_error_response(&err),
    }
}

pub(crate) async fn update(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    payload: Result<Json<CustomerRequest>, JsonRejection>,
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
    match store::update_customer(&conn, CustomerId::new(id), &input) {
        Ok(customer) => Json(CustomerResponse::from_customer(customer)).into_response(),
        Err(err) => store_error_response(&err),
    }
}

pub(crate) async fn delete(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Response {
    let now = state.clock.now();
    let conn = state.db.lock().await;
    match store::delete_customer(&conn, CustomerId::new(id), now) {
        Ok(()) => Json(OkResponse::ok()).into_response(),
        Err(err) => store_error_response(&err),
    }
}

pub(crate) async fn create_bulk(
    State(state): State<AppState>,
    payload: Result<Json<BulkCustomersRequest>, JsonRejection>,
) -> Response {
    let request = match require_json(payload) {
        Ok(request) => request,
        Err(response) => return response,
    };
    let mut inputs = Vec::with_capacity(request.customers.len());
    for customer in request.customers {
        match customer.into_input() {
            Ok(input) => inputs.push(input),
            Err(err) => return api_error_response(err),
        }
    }
    let mut conn = state.db.lock().await;
    match store::create_bulk_customers(&mut conn, &inputs) {
        Ok(added) => Json(BulkResponse { added }).into_response(),
        Err(err) => store_error_response(&err),
    }
}
