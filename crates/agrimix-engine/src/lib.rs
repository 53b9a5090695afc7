#![forbid(unsafe_code)]
//! Recipe costing core.
//!
//! Pure calculators ([`recipe_cost`], [`nutrient_profile`]) are separated
//! from the batch operations that execute against the shared SQLite
//! connection ([`recompute_all`], staleness marking). The calculators never
//! touch storage or the wall clock; the batch operations take both as
//! explicit inputs.

mod cost;
mod error;
mod nutrients;
mod price;
mod recompute;
mod row_decode;
mod staleness;

pub use cost::{recipe_cost, CostLine, PriceLookup};
pub use error::EngineError;
pub use nutrients::{nutrient_profile, recipe_nutrient_profile, NutrientLine};
pub use price::{package_unit_price, stock_unit_price, LedgerPrices};
pub use recompute::{recompute_all, recompute_one};
pub use row_decode::nutrients_from_row;
pub use staleness::{mark_stale_for_package, mark_stale_for_stock, stale_recipe_ids};

pub const CRATE_NAME: &str = "agrimix-engine";

#[cfg(test)]
mod engine_tests;
