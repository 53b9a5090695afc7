// SPDX-License-Identifier: Apache-2.0

use agrimix_core::Lifecycle;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{CustomerId, IngredientId, RecipeId, StockItemId};

/// Whether a recipe's stored `total_cost` still reflects current ledger
/// prices. Stored as the nullable `is_price_updated` column; an absent flag
/// counts as stale, never as fresh.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PriceState {
    Fresh,
    Stale,
}

impl PriceState {
    #[must_use]
    pub const fn from_flag(flag: Option<bool>) -> Self {
        match flag {
            Some(true) => Self::Fresh,
            Some(false) | None => Self::Stale,
        }
    }

    #[must_use]
    pub const fn as_flag(self) -> bool {
        matches!(self, Self::Fresh)
    }

    #[must_use]
    pub const fn is_fresh(self) -> bool {
        matches!(self, Self::Fresh)
    }
}

/// A formulation owned by one customer. Ingredient lines and package
/// associations are owned rows: they are replaced wholesale on update and
/// removed with the recipe.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recipe {
    pub id: RecipeId,
    pub name: String,
    pub customer_id: CustomerId,
    pub density: Option<String>,
    pub total_cost: f64,
    pub price_state: PriceState,
    pub last_price_update: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub lifecycle: Lifecycle,
}

/// One raw-material line of a recipe. `unit_price` and `line_total` are
/// snapshots from when the line was written; costing always re-reads the
/// ledger, the snapshot stays for display and audit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecipeIngredient {
    pub id: IngredientId,
    pub recipe_id: RecipeId,
    pub stock_id: StockItemId,
    pub name: String,
    pub quantity: f64,
    pub unit_price: f64,
    pub line_total: f64,
}

/// Marker appended to a duplicated recipe's name.
pub const COPY_SUFFIX: &str = " (copy)";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn absent_flag_is_stale() {
        assert_eq!(PriceState::from_flag(Some(true)), PriceState::Fresh);
        assert_eq!(PriceState::from_flag(Some(false)), PriceState::Stale);
        assert_eq!(PriceState::from_flag(None), PriceState::Stale);
        assert!(PriceState::from_flag(Some(true)).as_flag());
        assert!(!PriceState::from_flag(None).as_flag());
    }
}
