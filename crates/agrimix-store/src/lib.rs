#![forbid(unsafe_code)]
//! Relational storage for agrimix.
//!
//! One embedded SQLite database owns every table; repositories here are
//! plain functions over a borrowed [`rusqlite::Connection`], with mutations
//! that span rows taking `&mut Connection` so they can run as one
//! transaction. Reads state their soft-delete intent through [`Scope`].

mod backup;
mod cache;
mod customers;
mod error;
mod orders;
mod packages;
mod recipes;
mod rows;
mod schema;
mod scope;
mod settings;
mod stock;

pub use backup::{backup_database, restore_latest, BackupInfo};
pub use cache::SettingsCache;
pub use customers::{create_bulk_customers, create_customer, delete_customer, get_customer, list_customers, update_customer, CustomerFilter, CustomerInput};
pub use error::StoreError;
pub use orders::{create_order, delete_order, get_order, list_active_orders, list_orders, update_order_status, ActiveOrderRow, OrderInput};
pub use packages::{create_package, delete_package, get_package, list_packages, set_package_price, update_package, PackageInput};
pub use recipes::{copy_recipe, create_recipe, delete_recipe, get_recipe, list_recipes, list_stale_recipes, update_recipe, IngredientInput, RecipeDetails, RecipeInput, RecipeRow};
pub use schema::bootstrap;
pub use scope::Scope;
pub use settings::{get_settings, update_settings, SettingsInput};
pub use stock::{create_stock_item, delete_stock_item, get_stock_item, list_stock, set_stock_price, update_stock_item, StockItemInput};

pub const CRATE_NAME: &str = "agrimix-store";
