// SPDX-License-Identifier: Apache-2.0

use agrimix_core::{to_db_datetime, Lifecycle};
use agrimix_model::{parse_entity_name, Customer, CustomerId, CustomerKind};
use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension, Row};

use crate::error::{Result, StoreError};
use crate::rows::{column_parse_error, datetime_col, opt_datetime_col};
use crate::Scope;

#[derive(Debug, Clone)]
pub struct CustomerInput {
    pub name: String,
    pub kind: CustomerKind,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct CustomerFilter {
    /// Case-insensitive substring match on the name.
    pub search: Option<String>,
    pub kind: Option<CustomerKind>,
}

fn customer_from_row(row: &Row<'_>) -> rusqlite::Result<Customer> {
    let kind_raw: String = row.get("kind")?;
    Ok(Customer {
        id: CustomerId::new(row.get("id")?),
        name: row.get("name")?,
        kind: CustomerKind::parse(&kind_raw).map_err(column_parse_error)?,
        email: row.get("email")?,
        phone: row.get("phone")?,
        address: row.get("address")?,
        balance: row.get("balance")?,
        created_at: datetime_col(row, "created_at")?,
        lifecycle: Lifecycle::from_deleted_at(opt_datetime_col(row, "deleted_at")?),
    })
}

pub fn list_customers(
    conn: &Connection,
    filter: &CustomerFilter,
    scope: Scope,
) -> Result<Vec<Customer>> {
    let mut sql = format!("SELECT * FROM customers c WHERE {}", scope.predicate("c"));
    let mut params: Vec<rusqlite::types::Value> = Vec::new();

    if let Some(search) = &filter.search {
        sql.push_str(" AND LOWER(c.name) LIKE LOWER(?)");
        params.push(rusqlite::types::Value::Text(format!("%{search}%")));
    }
    if let Some(kind) = filter.kind {
        sql.push_str(" AND c.kind = ?");
        params.push(rusqlite::types::Value::Text(kind.as_str().to_string()));
    }
    sql.push_str(" ORDER BY c.id DESC");

    let mut stmt = conn.prepare(&sql)?;
    let customers = stmt
        .query_map(rusqlite::params_from_iter(params.iter()), customer_from_row)?
        .collect::<std::result::Result<Vec<_>, _>>()?;
    Ok(customers)
}

pub fn get_customer(conn: &Connection, id: CustomerId, scope: Scope) -> Result<Customer> {
    let sql = format!(
        "SELECT * FROM customers c WHERE c.id = ? AND {}",
        scope.predicate("c")
    );
    conn.query_row(&sql, params![id.as_i64()], customer_from_row)
        .optional()?
        .ok_or(StoreError::NotFound {
            entity: "customer",
            id: id.as_i64(),
        })
}

/// Case-insensitive live-name collision check, optionally ignoring one row
/// (the row being updated).
fn find_name_collision(
    conn: &Connection,
    name: &str,
    exclude: Option<CustomerId>,
) -> Result<Option<String>> {
    let existing: Option<String> = match exclude {
        None => conn
            .query_row(
                "SELECT name FROM customers
                 WHERE LOWER(name) = LOWER(?) AND deleted_at IS NULL",
                params![name],
                |row| row.get(0),
            )
            .optional()?,
        Some(id) => conn
            .query_row(
                "SELECT name FROM customers
                 WHERE LOWER(name) = LOWER(?) AND deleted_at IS NULL AND id != ?",
                params![name, id.as_i64()],
                |row| row.get(0),
            )
            .optional()?,
    };
    Ok(existing)
}

pub fn create_customer(conn: &Connection, input: &CustomerInput) -> Result<Customer> {
    let name = parse_entity_name("customer name", &input.name)?;
    if let Some(existing) = find_name_collision(conn, &name, None)? {
        return Err(StoreError::DuplicateName {
            entity: "customer",
            name: existing,
        });
    }

    conn.execute(
        "INSERT INTO customers (name, kind, email, phone, address, balance)
         VALUES (?, ?, ?, ?, ?, 0)",
        params![
            name,
            input.kind.as_str(),
            input.email,
            input.phone,
            input.address,
        ],
    )?;
    let id = CustomerId::new(conn.last_insert_rowid());
    get_customer(conn, id, Scope::ActiveOnly)
}

pub fn update_customer(
    conn: &Connection,
    id: CustomerId,
    input: &CustomerInput,
) -> Result<Customer> {
    let name = parse_entity_name("customer name", &input.name)?;
    // existence first so a rename onto a missing row reports not-found
    get_customer(conn, id, Scope::ActiveOnly)?;
    if let Some(existing) = find_name_collision(conn, &name, Some(id))? {
        return Err(StoreError::DuplicateName {
            entity: "customer",
            name: existing,
        });
    }

    conn.execute(
        "UPDATE customers
         SET name = ?, kind = ?, email = ?, phone = ?, address = ?
         WHERE id = ? AND deleted_at IS NULL",
        params![
            name,
            input.kind.as_str(),
            input.email,
            input.phone,
            input.address,
            id.as_i64(),
        ],
    )?;
    get_customer(conn, id, Scope::ActiveOnly)
}

pub fn delete_customer(conn: &Connection, id: CustomerId, now: DateTime<Utc>) -> Result<()> {
    let changed = conn.execute(
        "UPDATE customers SET deleted_at = ? WHERE id = ? AND deleted_at IS NULL",
        params![to_db_datetime(now), id.as_i64()],
    )?;
    if changed == 0 {
        return Err(StoreError::NotFound {
            entity: "customer",
            id: id.as_i64(),
        });
    }
    Ok(())
}

/// Insert a batch of customers as one transaction. Any duplicate inside the
/// payload or against live rows rejects the whole batch before any write.
pub fn create_bulk_customers(
    conn: &mut Connection,
    inputs: &[CustomerInput],
) -> Result<usize> {
    let tx = conn.transaction()?;

    let mut seen = std::collections::BTreeSet::new();
    for input in inputs {
        let name = parse_entity_name("customer name", &input.name)?;
        if !seen.insert(name.to_lowercase()) {
            return Err(StoreError::DuplicateName {
                entity: "customer",
                name,
            });
        }
        if let Some(existing) = find_name_collision(&tx, &name, None)? {
            return Err(StoreError::DuplicateName {
                entity: "customer",
                name: existing,
            });
        }
    }

    for input in inputs {
        let name = parse_entity_name("customer name", &input.name)?;
        tx.execute(
            "INSERT INTO customers (name, kind, email, phone, address, balance)
             VALUES (?, ?, ?, ?, ?, 0)",
            params![
                name,
                input.kind.as_str(),
                input.email,
                input.phone,
                input.address,
            ],
        )?;
    }

    tx.commit()?;
    Ok(inputs.len())
}
