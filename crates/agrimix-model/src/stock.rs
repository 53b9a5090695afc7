// SPDX-License-Identifier: Apache-2.0

use agrimix_core::Lifecycle;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{NutrientValues, StockItemId};

/// A raw material held in stock. `price` is the current ledger unit price;
/// recipes snapshot it into their ingredient lines and are marked stale when
/// it moves.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StockItem {
    pub id: StockItemId,
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
    pub lifecycle: Lifecycle,
}

pub const DEFAULT_STOCK_UNIT: &str = "kg";
pub const DEFAULT_STOCK_CATEGORY: &str = "raw_material";
