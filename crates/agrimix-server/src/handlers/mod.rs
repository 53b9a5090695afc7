pub(crate) mod backup;
pub(crate) mod customers;
pub(crate) mod orders;
pub(crate) mod packages;
pub(crate) mod recipes;
pub(crate) mod settings;
pub(crate) mod stock;
mod support;

use axum::response::{IntoResponse, Response};

pub(crate) async fn healthz() -> Response {
    axum::Json(serde_json::json!({"status": "ok"})).into_response()
}
