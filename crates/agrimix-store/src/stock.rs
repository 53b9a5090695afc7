// SPDX-License-Identifier: Apache-2.0

use agrimix_core::{to_db_datetime, Lifecycle};
use agrimix_engine::{mark_stale_for_stock, nutrients_from_row, stock_unit_price};
use agrimix_model::{
    parse_entity_name, validate_quantity, validate_unit_price, NutrientValues, StockItem,
    StockItemId, NUTRIENT_FIELDS,
};
use chrono::{DateTime, Utc};
use rusqlite::types::Value;
use rusqlite::{params, params_from_iter, Connection, OptionalExtension, Row};

use crate::error::{Result, StoreError};
use crate::rows::{datetime_col, opt_datetime_col};
use crate::Scope;

#[derive(Debug, Clone)]
pub struct StockItemInput {
    pub name: String,
    pub code: Option<String>,
    pub quantity: f64,
    pub min_quantity: f64,
    pub unit: String,
    pub category: String,
    pub price: f64,
    pub nutrients: NutrientValues,
}

fn stock_from_row(row: &Row<'_>) -> rusqlite::Result<StockItem> {
    Ok(StockItem {
        id: StockItemId::new(row.get("id")?),
        name: row.get("name")?,
        code: row.get("code")?,
        quantity: row.get("quantity")?,
        min_quantity: row.get("min_quantity")?,
        unit: row.get("unit")?,
        category: row.get("category")?,
        price: row.get("price")?,
        nutrients: nutrients_from_row(row)?,
        created_at: datetime_col(row, "created_at")?,
        updated_at: datetime_col(row, "updated_at")?,
        lifecycle: Lifecycle::from_deleted_at(opt_datetime_col(row, "deleted_at")?),
    })
}

pub fn list_stock(conn: &Connection, scope: Scope) -> Result<Vec<StockItem>> {
    let sql = format!(
        "SELECT * FROM stock s WHERE {} ORDER BY s.created_at DESC, s.id DESC",
        scope.predicate("s")
    );
    let mut stmt = conn.prepare(&sql)?;
    let items = stmt
        .query_map([], stock_from_row)?
        .collect::<std::result::Result<Vec<_>, _>>()?;
    Ok(items)
}

pub fn get_stock_item(conn: &Connection, id: StockItemId, scope: Scope) -> Result<StockItem> {
    let sql = format!(
        "SELECT * FROM stock s WHERE s.id = ? AND {}",
        scope.predicate("s")
    );
    conn.query_row(&sql, params![id.as_i64()], stock_from_row)
        .optional()?
        .ok_or(StoreError::NotFound {
            entity: "stock item",
            id: id.as_i64(),
        })
}

fn assert_name_free(conn: &Connection, name: &str, exclude: Option<StockItemId>) -> Result<()> {
    let existing: Option<String> = conn
        .query_row(
            "SELECT name FROM stock
             WHERE LOWER(name) = LOWER(?) AND deleted_at IS NULL AND id != ?",
            params![name, exclude.map_or(-1, StockItemId::as_i64)],
            |row| row.get(0),
        )
        .optional()?;
    match existing {
        Some(existing) => Err(StoreError::DuplicateName {
            entity: "stock item",
            name: existing,
        }),
        None => Ok(()),
    }
}

fn validated(input: &StockItemInput) -> Result<(String, f64, f64)> {
    let name = parse_entity_name("stock name", &input.name)?;
    let price = validate_unit_price("stock price", input.price)?;
    let quantity = validate_quantity("stock quantity", input.quantity)?;
    validate_quantity("stock min quantity", input.min_quantity)?;
    Ok((name, price, quantity))
}

pub fn create_stock_item(conn: &Connection, input: &StockItemInput) -> Result<StockItem> {
    let (name, price, quantity) = validated(input)?;
    assert_name_free(conn, &name, None)?;

    let nutrient_columns = NUTRIENT_FIELDS.join(", ");
    let nutrient_placeholders = vec!["?"; NUTRIENT_FIELDS.len()].join(", ");
    let sql = format!(
        "INSERT INTO stock (name, code, quantity, min_quantity, unit, category, price, {nutrient_columns})
         VALUES (?, ?, ?, ?, ?, ?, ?, {nutrient_placeholders})"
    );

    let mut values: Vec<Value> = vec![
        Value::Text(name),
        input.code.clone().map_or(Value::Null, Value::Text),
        Value::Real(quantity),
        Value::Real(input.min_quantity),
        Value::Text(input.unit.clone()),
        Value::Text(input.category.clone()),
        Value::Real(price),
    ];
    for field in NUTRIENT_FIELDS {
        values.push(input.nutrients.get(field).map_or(Value::Null, Value::Real));
    }
    conn.execute(&sql, params_from_iter(values.iter()))?;

    get_stock_item(conn, StockItemId::new(conn.last_insert_rowid()), Scope::ActiveOnly)
}

pub fn update_stock_item(
    conn: &Connection,
    id: StockItemId,
    input: &StockItemInput,
    now: DateTime<Utc>,
) -> Result<StockItem> {
    let (name, price, quantity) = validated(input)?;
    get_stock_item(conn, id, Scope::ActiveOnly)?;
    assert_name_free(conn, &name, Some(id))?;

    let nutrient_assignments = NUTRIENT_FIELDS
        .iter()
        .map(|field| format!("{field} = ?"))
        .collect::<Vec<_>>()
        .join(", ");
    let sql = format!(
        "UPDATE stock
         SET name = ?, code = ?, quantity = ?, min_quantity = ?, unit = ?, category = ?,
             price = ?, {nutrient_assignments}, updated_at = ?
         WHERE id = ? AND deleted_at IS NULL"
    );

    let mut values: Vec<Value> = vec![
        Value::Text(name),
        input.code.clone().map_or(Value::Null, Value::Text),
        Value::Real(quantity),
        Value::Real(input.min_quantity),
        Value::Text(input.unit.clone()),
        Value::Text(input.category.clone()),
        Value::Real(price),
    ];
    for field in NUTRIENT_FIELDS {
        values.push(input.nutrients.get(field).map_or(Value::Null, Value::Real));
    }
    values.push(Value::Text(to_db_datetime(now)));
    values.push(Value::Integer(id.as_i64()));
    conn.execute(&sql, params_from_iter(values.iter()))?;

    get_stock_item(conn, id, Scope::ActiveOnly)
}

pub fn delete_stock_item(conn: &Connection, id: StockItemId, now: DateTime<Utc>) -> Result<()> {
    let changed = conn.execute(
        "UPDATE stock SET deleted_at = ? WHERE id = ? AND deleted_at IS NULL",
        params![to_db_datetime(now), id.as_i64()],
    )?;
    if changed == 0 {
        return Err(StoreError::NotFound {
            entity: "stock item",
            id: id.as_i64(),
        });
    }
    Ok(())
}

/// Price Ledger entry point for raw materials. Persists the validated new
/// price and marks every referencing live recipe stale in the same
/// transaction, so no recipe can observe the new price while still flagged
/// fresh. Returns the previous price.
pub fn set_stock_price(
    conn: &mut Connection,
    id: StockItemId,
    new_price: f64,
    now: DateTime<Utc>,
) -> Result<f64> {
    let new_price = validate_unit_price("stock price", new_price)?;
    let tx = conn.transaction()?;

    let previous = stock_unit_price(&tx, id)?.ok_or(StoreError::NotFound {
        entity: "stock item",
        id: id.as_i64(),
    })?;

    tx.execute(
        "UPDATE stock SET price = ?, updated_at = ? WHERE id = ?",
        params![new_price, to_db_datetime(now), id.as_i64()],
    )?;
    mark_stale_for_stock(&tx, id)?;

    tx.commit()?;
    Ok(previous)
}
