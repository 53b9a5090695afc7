#![forbid(unsafe_code)]
//! Wire contract of the agrimix HTTP surface.
//!
//! Requests and responses are defined here once and consumed by the server
//! crate; nothing in this crate touches the network or the database beyond
//! translating storage errors into the wire envelope.

mod dto;
mod error_mapping;
mod errors;
mod params;

pub use dto::{
    ActiveOrderResponse, BackupRequest, BackupResponse, BulkCustomersRequest, BulkResponse,
    CustomerRequest, CustomerResponse, IngredientRequest, IngredientResponse, OkResponse,
    OrderRequest, OrderResponse, OrderStatusRequest, PackageRequest, PackageResponse,
    PriceRequest, PriceResponse, RecipeDetailResponse, RecipeRequest, RecipeSummaryResponse,
    RecomputeResponse, SettingsRequest, SettingsResponse, StockItemResponse, StockRequest,
};
pub use error_mapping::api_error_from_store;
pub use errors::{ApiError, ApiErrorCode};
pub use params::parse_customer_list_params;

pub const CRATE_NAME: &str = "agrimix-api";
