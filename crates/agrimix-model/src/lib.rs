#![forbid(unsafe_code)]
//! Agrimix domain model SSOT.
//!
//! Every entity the storage layer persists and the API serves is defined
//! here once: typed ids, fixed enumerations with their wire spellings, the
//! nutrient attribute set carried by raw materials, and the validation
//! errors creation paths report.

mod customer;
mod ids;
mod nutrients;
mod order;
mod package;
mod recipe;
mod settings;
mod stock;
mod validate;

pub use customer::{Customer, CustomerKind};
pub use ids::{CustomerId, IngredientId, OrderId, PackageId, RecipeId, StockItemId};
pub use nutrients::{NutrientProfile, NutrientValues, NUTRIENT_FIELDS};
pub use order::{Order, OrderStatus};
pub use package::{Package, PackageUnit};
pub use recipe::{PriceState, Recipe, RecipeIngredient, COPY_SUFFIX};
pub use settings::Settings;
pub use stock::{StockItem, DEFAULT_STOCK_CATEGORY, DEFAULT_STOCK_UNIT};
pub use validate::{parse_entity_name, validate_quantity, validate_unit_price, ValidationError};

pub const CRATE_NAME: &str = "agrimix-model";

pub const NAME_MAX_LEN: usize = 256;
