// SPDX-License-Identifier: Apache-2.0

use agrimix_core::to_db_datetime;
use agrimix_model::{RecipeId, StockItemId};
use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension};

use crate::cost::{recipe_cost, CostLine};
use crate::price::LedgerPrices;
use crate::EngineError;

/// Recompute one live recipe's cost from current ledger prices, persist it,
/// and make the recipe fresh. Runs against the caller's connection, which
/// is expected to hold the surrounding transaction. Returns the new total.
pub fn recompute_one(
    conn: &Connection,
    recipe_id: RecipeId,
    now: DateTime<Utc>,
) -> Result<f64, EngineError> {
    let live: Option<i64> = conn
        .query_row(
            "SELECT id FROM recipes WHERE id = ? AND deleted_at IS NULL",
            params![recipe_id.as_i64()],
            |row| row.get(0),
        )
        .optional()?;
    if live.is_none() {
        return Err(EngineError::RecipeNotFound(recipe_id));
    }

    let total = current_cost(conn, recipe_id)?;
    conn.execute(
        "UPDATE recipes
         SET total_cost = ?, is_price_updated = 1, last_price_update = ?
         WHERE id = ?",
        params![total, to_db_datetime(now), recipe_id.as_i64()],
    )?;
    Ok(total)
}

/// Full recompute over every live recipe, stale or not, as one transaction.
/// Either all of them commit with fresh costs or none do. Returns the
/// number of recipes updated.
pub fn recompute_all(conn: &mut Connection, now: DateTime<Utc>) -> Result<usize, EngineError> {
    let tx = conn.transaction().map_err(EngineError::Storage)?;

    let ids = {
        let mut stmt = tx.prepare("SELECT id FROM recipes WHERE deleted_at IS NULL ORDER BY id")?;
        let ids = stmt
            .query_map([], |row| row.get::<_, i64>(0).map(RecipeId::new))?
            .collect::<Result<Vec<_>, _>>()?;
        ids
    };

    for id in &ids {
        recompute_one(&tx, *id, now)?;
    }

    tx.commit().map_err(EngineError::Storage)?;
    Ok(ids.len())
}

/// Load the recipe's lines and run the pure calculator against the live
/// ledger. The lookup is unfiltered by `deleted_at`: a soft-deleted
/// material still has a priced row, and a line whose material row is gone
/// entirely degrades to zero contribution.
fn current_cost(conn: &Connection, recipe_id: RecipeId) -> Result<f64, EngineError> {
    let mut stmt = conn.prepare_cached(
        "SELECT stock_id, quantity FROM recipe_ingredients WHERE recipe_id = ?",
    )?;
    let lines = stmt
        .query_map(params![recipe_id.as_i64()], |row| {
            Ok(CostLine {
                stock_id: StockItemId::new(row.get(0)?),
                quantity: row.get(1)?,
            })
        })?
        .collect::<Result<Vec<_>, _>>()?;

    Ok(recipe_cost(&lines, &LedgerPrices::new(conn)))
}
