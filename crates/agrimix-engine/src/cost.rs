// SPDX-License-Identifier: Apache-2.0

use std::collections::BTreeMap;

use agrimix_model::StockItemId;

/// Source of current unit prices. The ledger is the only implementation in
/// production; tests substitute a plain map.
pub trait PriceLookup {
    fn unit_price(&self, id: StockItemId) -> Option<f64>;
}

impl PriceLookup for BTreeMap<StockItemId, f64> {
    fn unit_price(&self, id: StockItemId) -> Option<f64> {
        self.get(&id).copied()
    }
}

/// What costing needs from an ingredient line. The snapshot price stored on
/// the row is deliberately absent: cost always re-reads the ledger.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CostLine {
    pub stock_id: StockItemId,
    pub quantity: f64,
}

/// Total cost of a recipe: quantity times current unit price, summed over
/// its lines. A line whose material cannot be resolved contributes zero
/// instead of failing the recipe.
#[must_use]
pub fn recipe_cost(lines: &[CostLine], prices: &impl PriceLookup) -> f64 {
    lines
        .iter()
        .map(|line| line.quantity * prices.unit_price(line.stock_id).unwrap_or(0.0))
        .sum()
}
