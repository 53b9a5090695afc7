// SPDX-License-Identifier: Apache-2.0

use agrimix_model::{
    Customer, CustomerId, CustomerKind, NutrientProfile, NutrientValues, Order, OrderStatus,
    Package, PackageId, PackageUnit, RecipeId, RecipeIngredient, Settings, StockItem,
    StockItemId, DEFAULT_STOCK_CATEGORY, DEFAULT_STOCK_UNIT,
};
use agrimix_store::{
    ActiveOrderRow, BackupInfo, CustomerInput, IngredientInput, OrderInput, PackageInput,
    RecipeDetails, RecipeInput, RecipeRow, SettingsInput, StockItemInput,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::ApiError;

// ---------------------------------------------------------------------------
// Requests

#[derive(Debug, Clone, Deserialize)]
pub struct CustomerRequest {
    pub name: String,
    pub kind: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
}

impl CustomerRequest {
    pub fn into_input(self) -> Result<CustomerInput, ApiError> {
        let kind = CustomerKind::parse(&self.kind)
            .map_err(|_| ApiError::invalid_param("kind", &self.kind))?;
        Ok(CustomerInput {
            name: self.name,
            kind,
            email: self.email,
            phone: self.phone,
            address: self.address,
        })
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct BulkCustomersRequest {
    pub customers: Vec<CustomerRequest>,
}

fn default_stock_unit() -> String {
    DEFAULT_STOCK_UNIT.to_string()
}

fn default_stock_category() -> String {
    DEFAULT_STOCK_CATEGORY.to_string()
}

#[derive(Debug, Clone, Deserialize)]
pub struct StockRequest {
    pub name: String,
    #[serde(default)]
    pub code: Option<String>,
    #[serde(default)]
    pub quantity: f64,
    #[serde(default)]
    pub min_quantity: f64,
    #[serde(default = "default_stock_unit")]
    pub unit: String,
    #[serde(default = "default_stock_category")]
    pub category: String,
    #[serde(default)]
    pub price: f64,
    #[serde(flatten)]
    pub nutrients: NutrientValues,
}

impl StockRequest {
    #[must_use]
    pub fn into_input(self) -> StockItemInput {
        StockItemInput {
            name: self.name,
            code: self.code,
            quantity: self.quantity,
            min_quantity: self.min_quantity,
            unit: self.unit,
            category: self.category,
            price: self.price,
            nutrients: self.nutrients,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct PackageRequest {
    pub size: f64,
    pub unit: String,
    pub price: f64,
}

impl PackageRequest {
    pub fn into_input(self) -> Result<PackageInput, ApiError> {
        let unit = PackageUnit::parse(&self.unit)
            .map_err(|_| ApiError::invalid_param("unit", &self.unit))?;
        Ok(PackageInput {
            size: self.size,
            unit,
            price: self.price,
        })
    }
}

#[derive(Debug, Clone, Copy, Deserialize)]
pub struct PriceRequest {
    pub new_price: f64,
}

#[derive(Debug, Clone, Copy, Deserialize)]
pub struct IngredientRequest {
    pub stock_id: i64,
    pub quantity: f64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RecipeRequest {
    pub name: String,
    pub customer_id: i64,
    #[serde(default)]
    pub density: Option<String>,
    pub packages: Vec<i64>,
    pub ingredients: Vec<IngredientRequest>,
}

impl RecipeRequest {
    #[must_use]
    pub fn into_input(self) -> RecipeInput {
        RecipeInput {
            name: self.name,
            customer_id: CustomerId::new(self.customer_id),
            density: self.density,
            packages: self.packages.into_iter().map(PackageId::new).collect(),
            ingredients: self
                .ingredients
                .into_iter()
                .map(|line| IngredientInput {
                    stock_id: StockItemId::new(line.stock_id),
                    quantity: line.quantity,
                })
                .collect(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct OrderRequest {
    pub customer_id: i64,
    pub recipe_id: i64,
    pub quantity: f64,
    #[serde(default)]
    pub total: f64,
    #[serde(default)]
    pub status: Option<String>,
}

impl OrderRequest {
    pub fn into_input(self) -> Result<OrderInput, ApiError> {
        let status = match &self.status {
            None => OrderStatus::Pending,
            Some(raw) => OrderStatus::parse(raw)
                .map_err(|_| ApiError::invalid_param("status", raw))?,
        };
        Ok(OrderInput {
            customer_id: CustomerId::new(self.customer_id),
            recipe_id: RecipeId::new(self.recipe_id),
            quantity: self.quantity,
            total: self.total,
            status,
        })
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct OrderStatusRequest {
    pub status: String,
}

impl OrderStatusRequest {
    pub fn parse_status(&self) -> Result<OrderStatus, ApiError> {
        OrderStatus::parse(&self.status)
            .map_err(|_| ApiError::invalid_param("status", &self.status))
    }
}

fn default_margin_a() -> f64 {
    Settings::DEFAULT_MARGIN_LIST_A
}
fn default_margin_b() -> f64 {
    Settings::DEFAULT_MARGIN_LIST_B
}
fn default_margin_c() -> f64 {
    Settings::DEFAULT_MARGIN_LIST_C
}

#[derive(Debug, Clone, Copy, Deserialize)]
pub struct SettingsRequest {
    #[serde(default)]
    pub fx_rate_usd: f64,
    #[serde(default = "default_margin_a")]
    pub margin_list_a: f64,
    #[serde(default = "default_margin_b")]
    pub margin_list_b: f64,
    #[serde(default = "default_margin_c")]
    pub margin_list_c: f64,
}

impl SettingsRequest {
    #[must_use]
    pub const fn into_input(self) -> SettingsInput {
        SettingsInput {
            fx_rate_usd: self.fx_rate_usd,
            margin_list_a: self.margin_list_a,
            margin_list_b: self.margin_list_b,
            margin_list_c: self.margin_list_c,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct BackupRequest {
    pub backup_path: String,
}

// ---------------------------------------------------------------------------
// Responses

#[derive(Debug, Clone, Serialize)]
pub struct CustomerResponse {
    pub id: i64,
    pub name: String,
    pub kind: &'static str,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub balance: f64,
    pub created_at: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>,
}

impl CustomerResponse {
    #[must_use]
    pub fn from_customer(customer: Customer) -> Self {
        Self {
            id: customer.id.as_i64(),
            name: customer.name,
            kind: customer.kind.as_str(),
            email: customer.email,
            phone: customer.phone,
            address: customer.address,
            balance: customer.balance,
            created_at: customer.created_at,
            deleted_at: customer.lifecycle.deleted_at(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct StockItemResponse {
    pub id: i64,
    pub name: String,
    pub code: Option<String>,
    pub quantity: f64,
    pub min_quantity: f64,
    pub unit: String,
    pub category: String,
    pub price: f64,
    #[serde(flatten)]
    pub nutrients: NutrientValues,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>,
}

impl StockItemResponse {
    #[must_use]
    pub fn from_item(item: StockItem) -> Self {
        Self {
            id: item.id.as_i64(),
            name: item.name,
            code: item.code,
            quantity: item.quantity,
            min_quantity: item.min_quantity,
            unit: item.unit,
            category: item.category,
            price: item.price,
            nutrients: item.nutrients,
            created_at: item.created_at,
            updated_at: item.updated_at,
            deleted_at: item.lifecycle.deleted_at(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct PackageResponse {
    pub id: i64,
    pub size: f64,
    pub unit: &'static str,
    pub price: f64,
    pub created_at: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>,
}

impl PackageResponse {
    #[must_use]
    pub fn from_package(package: Package) -> Self {
        Self {
            id: package.id.as_i64(),
            size: package.size,
            unit: package.unit.as_str(),
            price: package.price,
            created_at: package.created_at,
            deleted_at: package.lifecycle.deleted_at(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct RecipeSummaryResponse {
    pub id: i64,
    pub name: String,
    pub customer_id: i64,
    pub customer_name: Option<String>,
    pub density: Option<String>,
    pub total_cost: f64,
    pub is_price_updated: bool,
    pub last_price_update: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>,
    pub packages: Vec<i64>,
}

impl RecipeSummaryResponse {
    #[must_use]
    pub fn from_row(row: RecipeRow) -> Self {
        Self {
            id: row.recipe.id.as_i64(),
            name: row.recipe.name,
            customer_id: row.recipe.customer_id.as_i64(),
            customer_name: row.customer_name,
            density: row.recipe.density,
            total_cost: row.recipe.total_cost,
            is_price_updated: row.recipe.price_state.as_flag(),
            last_price_update: row.recipe.last_price_update,
            created_at: row.recipe.created_at,
            deleted_at: row.recipe.lifecycle.deleted_at(),
            packages: row.packages.into_iter().map(PackageId::as_i64).collect(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct IngredientResponse {
    pub id: i64,
    pub stock_id: i64,
    pub name: String,
    pub quantity: f64,
    pub price: f64,
    pub total: f64,
}

impl IngredientResponse {
    #[must_use]
    pub fn from_ingredient(line: RecipeIngredient) -> Self {
        Self {
            id: line.id.as_i64(),
            stock_id: line.stock_id.as_i64(),
            name: line.name,
            quantity: line.quantity,
            price: line.unit_price,
            total: line.line_total,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct RecipeDetailResponse {
    #[serde(flatten)]
    pub summary: RecipeSummaryResponse,
    pub ingredients: Vec<IngredientResponse>,
    pub nutrients: NutrientProfile,
}

impl RecipeDetailResponse {
    #[must_use]
    pub fn from_details(details: RecipeDetails) -> Self {
        Self {
            summary: RecipeSummaryResponse::from_row(RecipeRow {
                recipe: details.recipe,
                customer_name: details.customer_name,
                packages: details.packages,
            }),
            ingredients: details
                .ingredients
                .into_iter()
                .map(IngredientResponse::from_ingredient)
                .collect(),
            nutrients: details.nutrients,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct OrderResponse {
    pub id: i64,
    pub customer_id: i64,
    pub recipe_id: i64,
    pub quantity: f64,
    pub total: f64,
    pub status: &'static str,
    pub created_at: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>,
}

impl OrderResponse {
    #[must_use]
    pub fn from_order(order: Order) -> Self {
        Self {
            id: order.id.as_i64(),
            customer_id: order.customer_id.as_i64(),
            recipe_id: order.recipe_id.as_i64(),
            quantity: order.quantity,
            total: order.total,
            status: order.status.as_str(),
            created_at: order.created_at,
            deleted_at: order.lifecycle.deleted_at(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ActiveOrderResponse {
    #[serde(flatten)]
    pub order: OrderResponse,
    pub customer_name: Option<String>,
    pub recipe_name: Option<String>,
}

impl ActiveOrderResponse {
    #[must_use]
    pub fn from_row(row: ActiveOrderRow) -> Self {
        Self {
            order: OrderResponse::from_order(row.order),
            customer_name: row.customer_name,
            recipe_name: row.recipe_name,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct SettingsResponse {
    pub fx_rate_usd: f64,
    pub margin_list_a: f64,
    pub margin_list_b: f64,
    pub margin_list_c: f64,
    pub updated_at: DateTime<Utc>,
}

impl SettingsResponse {
    #[must_use]
    pub fn from_settings(settings: Settings) -> Self {
        Self {
            fx_rate_usd: settings.fx_rate_usd,
            margin_list_a: settings.margin_list_a,
            margin_list_b: settings.margin_list_b,
            margin_list_c: settings.margin_list_c,
            updated_at: settings.updated_at,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize)]
pub struct RecomputeResponse {
    pub updated_count: usize,
}

#[derive(Debug, Clone, Copy, Serialize)]
pub struct PriceResponse {
    pub previous_price: f64,
    pub new_price: f64,
}

#[derive(Debug, Clone, Copy, Serialize)]
pub struct BulkResponse {
    pub added: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct BackupResponse {
    pub path: String,
    pub size_bytes: u64,
}

impl BackupResponse {
    #[must_use]
    pub fn from_info(info: &BackupInfo) -> Self {
        Self {
            path: info.path.display().to_string(),
            size_bytes: info.size_bytes,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize)]
pub struct OkResponse {
    pub ok: bool,
}

impl OkResponse {
    #[must_use]
    pub const fn ok() -> Self {
        Self { ok: true }
    }
}
