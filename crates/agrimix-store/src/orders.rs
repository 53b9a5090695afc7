// SPDX-License-Identifier: Apache-2.0

use agrimix_core::{to_db_datetime, Lifecycle};
use agrimix_model::{CustomerId, Order, OrderId, OrderStatus, RecipeId};
use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension, Row};

use crate::error::{Result, StoreError};
use crate::rows::{column_parse_error, datetime_col, opt_datetime_col};
use crate::Scope;

#[derive(Debug, Clone, Copy)]
pub struct OrderInput {
    pub customer_id: CustomerId,
    pub recipe_id: RecipeId,
    pub quantity: f64,
    pub total: f64,
    pub status: OrderStatus,
}

/// Pending-order listing joins in the names the dispatch screen shows.
#[derive(Debug, Clone, PartialEq)]
pub struct ActiveOrderRow {
    pub order: Order,
    pub customer_name: Option<String>,
    pub recipe_name: Option<String>,
}

fn order_from_row(row: &Row<'_>) -> rusqlite::Result<Order> {
    let status_raw: String = row.get("status")?;
    Ok(Order {
        id: OrderId::new(row.get("id")?),
        customer_id: CustomerId::new(row.get("customer_id")?),
        recipe_id: RecipeId::new(row.get("recipe_id")?),
        quantity: row.get("quantity")?,
        total: row.get("total")?,
        status: OrderStatus::parse(&status_raw).map_err(column_parse_error)?,
        created_at: datetime_col(row, "created_at")?,
        lifecycle: Lifecycle::from_deleted_at(opt_datetime_col(row, "deleted_at")?),
    })
}

pub fn list_orders(conn: &Connection, scope: Scope) -> Result<Vec<Order>> {
    let sql = format!(
        "SELECT * FROM orders o WHERE {} ORDER BY o.created_at DESC, o.id DESC",
        scope.predicate("o")
    );
    let mut stmt = conn.prepare(&sql)?;
    let orders = stmt
        .query_map([], order_from_row)?
        .collect::<std::result::Result<Vec<_>, _>>()?;
    Ok(orders)
}

pub fn get_order(conn: &Connection, id: OrderId, scope: Scope) -> Result<Order> {
    let sql = format!(
        "SELECT * FROM orders o WHERE o.id = ? AND {}",
        scope.predicate("o")
    );
    conn.query_row(&sql, params![id.as_i64()], order_from_row)
        .optional()?
        .ok_or(StoreError::NotFound {
            entity: "order",
            id: id.as_i64(),
        })
}

pub fn list_active_orders(conn: &Connection) -> Result<Vec<ActiveOrderRow>> {
    let mut stmt = conn.prepare_cached(
        "SELECT o.*, c.name AS customer_name, r.name AS recipe_name
         FROM orders o
         LEFT JOIN customers c ON o.customer_id = c.id
         LEFT JOIN recipes r ON o.recipe_id = r.id
         WHERE o.deleted_at IS NULL AND o.status = 'pending'
         ORDER BY o.created_at DESC, o.id DESC",
    )?;
    let rows = stmt
        .query_map([], |row| {
            Ok(ActiveOrderRow {
                order: order_from_row(row)?,
                customer_name: row.get("customer_name")?,
                recipe_name: row.get("recipe_name")?,
            })
        })?
        .collect::<std::result::Result<Vec<_>, _>>()?;
    Ok(rows)
}

pub fn create_order(conn: &Connection, input: &OrderInput) -> Result<Order> {
    let recipe_live: Option<i64> = conn
        .query_row(
            "SELECT id FROM recipes WHERE id = ? AND deleted_at IS NULL",
            params![input.recipe_id.as_i64()],
            |row| row.get(0),
        )
        .optional()?;
    if recipe_live.is_none() {
        return Err(StoreError::NotFound {
            entity: "recipe",
            id: input.recipe_id.as_i64(),
        });
    }
    let customer_live: Option<i64> = conn
        .query_row(
            "SELECT id FROM customers WHERE id = ? AND deleted_at IS NULL",
            params![input.customer_id.as_i64()],
            |row| row.get(0),
        )
        .optional()?;
    if customer_live.is_none() {
        return Err(StoreError::NotFound {
            entity: "customer",
            id: input.customer_id.as_i64(),
        });
    }

    conn.execute(
        "INSERT INTO orders (customer_id, recipe_id, quantity, total, status)
         VALUES (?, ?, ?, ?, ?)",
        params![
            input.customer_id.as_i64(),
            input.recipe_id.as_i64(),
            input.quantity,
            input.total,
            input.status.as_str(),
        ],
    )?;
    get_order(conn, OrderId::new(conn.last_insert_rowid()), Scope::ActiveOnly)
}

/// Forward-only status change: pending may confirm or cancel, terminal
/// states stay put.
pub fn update_order_status(
    conn: &Connection,
    id: OrderId,
    to: OrderStatus,
) -> Result<Order> {
    let current = get_order(conn, id, Scope::ActiveOnly)?;
    if !current.status.can_transition_to(to) {
        return Err(StoreError::InvalidTransition {
            from: current.status,
            to,
        });
    }

    conn.execute(
        "UPDATE orders SET status = ? WHERE id = ? AND deleted_at IS NULL",
        params![to.as_str(), id.as_i64()],
    )?;
    get_order(conn, id, Scope::ActiveOnly)
}

pub fn delete_order(conn: &Connection, id: OrderId, now: DateTime<Utc>) -> Result<()> {
    let changed = conn.execute(
        "UPDATE orders SET deleted_at = ? WHERE id = ? AND deleted_at IS NULL",
        params![to_db_datetime(now), id.as_i64()],
    )?;
    if changed == 0 {
        return Err(StoreError::NotFound {
            entity: "order",
            id: id.as_i64(),
        });
    }
    Ok(())
}
