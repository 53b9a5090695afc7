// SPDX-License-Identifier: Apache-2.0

use agrimix_model::{PackageId, RecipeId, StockItemId};
use rusqlite::{params, Connection};

use crate::EngineError;

/// Mark every live recipe whose ingredient set references the material as
/// stale. Runs inside the caller's price-update transaction so the new
/// price and the staleness flags commit together. Returns the number of
/// recipes flipped.
pub fn mark_stale_for_stock(
    conn: &Connection,
    stock_id: StockItemId,
) -> Result<usize, EngineError> {
    let changed = conn.execute(
        "UPDATE recipes SET is_price_updated = 0
         WHERE deleted_at IS NULL AND id IN (
             SELECT DISTINCT recipe_id FROM recipe_ingredients WHERE stock_id = ?
         )",
        params![stock_id.as_i64()],
    )?;
    Ok(changed)
}

/// Packaging counterpart of [`mark_stale_for_stock`]: packaging never
/// enters `total_cost`, but a packaging price change still invalidates the
/// quote a recipe's stored numbers back.
pub fn mark_stale_for_package(
    conn: &Connection,
    package_id: PackageId,
) -> Result<usize, EngineError> {
    let changed = conn.execute(
        "UPDATE recipes SET is_price_updated = 0
         WHERE deleted_at IS NULL AND id IN (
             SELECT DISTINCT recipe_id FROM recipe_packages WHERE package_id = ?
         )",
        params![package_id.as_i64()],
    )?;
    Ok(changed)
}

/// Live recipes whose stored cost no longer reflects the ledger. An absent
/// flag counts as stale.
pub fn stale_recipe_ids(conn: &Connection) -> Result<Vec<RecipeId>, EngineError> {
    let mut stmt = conn.prepare_cached(
        "SELECT id FROM recipes
         WHERE deleted_at IS NULL
           AND (is_price_updated = 0 OR is_price_updated IS NULL)
         ORDER BY id",
    )?;
    let ids = stmt
        .query_map([], |row| row.get::<_, i64>(0).map(RecipeId::new))?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(ids)
}
