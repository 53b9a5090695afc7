// SPDX-License-Identifier: Apache-2.0

use agrimix_model::{PackageId, StockItemId};
use rusqlite::{params, Connection, OptionalExtension};

use crate::cost::PriceLookup;
use crate::EngineError;

/// Current ledger price of a raw material. Soft-deleted rows still
/// resolve; only a physically absent row is `None`.
pub fn stock_unit_price(
    conn: &Connection,
    id: StockItemId,
) -> Result<Option<f64>, EngineError> {
    let price = conn
        .query_row(
            "SELECT price FROM stock WHERE id = ?",
            params![id.as_i64()],
            |row| row.get(0),
        )
        .optional()?;
    Ok(price)
}

/// Packaging counterpart of [`stock_unit_price`].
pub fn package_unit_price(
    conn: &Connection,
    id: PackageId,
) -> Result<Option<f64>, EngineError> {
    let price = conn
        .query_row(
            "SELECT price FROM packages WHERE id = ?",
            params![id.as_i64()],
            |row| row.get(0),
        )
        .optional()?;
    Ok(price)
}

/// [`PriceLookup`] over the live ledger, the production implementation the
/// cost calculator runs against. A lookup that fails at the storage level
/// reads as missing, which costing already degrades to zero contribution.
pub struct LedgerPrices<'conn> {
    conn: &'conn Connection,
}

impl<'conn> LedgerPrices<'conn> {
    #[must_use]
    pub const fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }
}

impl PriceLookup for LedgerPrices<'_> {
    fn unit_price(&self, id: StockItemId) -> Option<f64> {
        stock_unit_price(self.conn, id).ok().flatten()
    }
}
