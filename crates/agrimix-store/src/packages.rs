// SPDX-License-Identifier: Apache-2.0

use agrimix_core::{to_db_datetime, Lifecycle};
use agrimix_engine::{mark_stale_for_package, package_unit_price};
use agrimix_model::{validate_quantity, validate_unit_price, Package, PackageId, PackageUnit};
use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension, Row};

use crate::error::{Result, StoreError};
use crate::rows::{column_parse_error, datetime_col, opt_datetime_col};
use crate::Scope;

#[derive(Debug, Clone, Copy)]
pub struct PackageInput {
    pub size: f64,
    pub unit: PackageUnit,
    pub price: f64,
}

fn package_from_row(row: &Row<'_>) -> rusqlite::Result<Package> {
    let unit_raw: String = row.get("unit")?;
    Ok(Package {
        id: PackageId::new(row.get("id")?),
        size: row.get("size")?,
        unit: PackageUnit::parse(&unit_raw).map_err(column_parse_error)?,
        price: row.get("price")?,
        created_at: datetime_col(row, "created_at")?,
        lifecycle: Lifecycle::from_deleted_at(opt_datetime_col(row, "deleted_at")?),
    })
}

pub fn list_packages(conn: &Connection, scope: Scope) -> Result<Vec<Package>> {
    let sql = format!(
        "SELECT * FROM packages p WHERE {} ORDER BY p.size, p.unit",
        scope.predicate("p")
    );
    let mut stmt = conn.prepare(&sql)?;
    let packages = stmt
        .query_map([], package_from_row)?
        .collect::<std::result::Result<Vec<_>, _>>()?;
    Ok(packages)
}

pub fn get_package(conn: &Connection, id: PackageId, scope: Scope) -> Result<Package> {
    let sql = format!(
        "SELECT * FROM packages p WHERE p.id = ? AND {}",
        scope.predicate("p")
    );
    conn.query_row(&sql, params![id.as_i64()], package_from_row)
        .optional()?
        .ok_or(StoreError::NotFound {
            entity: "package",
            id: id.as_i64(),
        })
}

fn assert_size_unit_free(
    conn: &Connection,
    size: f64,
    unit: PackageUnit,
    exclude: Option<PackageId>,
) -> Result<()> {
    let existing: Option<i64> = conn
        .query_row(
            "SELECT id FROM packages
             WHERE size = ? AND unit = ? AND deleted_at IS NULL AND id != ?",
            params![size, unit.as_str(), exclude.map_or(-1, PackageId::as_i64)],
            |row| row.get(0),
        )
        .optional()?;
    if existing.is_some() {
        return Err(StoreError::DuplicatePackage {
            size,
            unit: unit.as_str(),
        });
    }
    Ok(())
}

fn validated(input: &PackageInput) -> Result<(f64, f64)> {
    let size = validate_quantity("package size", input.size)?;
    if size <= 0.0 {
        return Err(StoreError::Validation(
            agrimix_model::ValidationError::InvalidValue {
                field: "package size",
                value: size.to_string(),
            },
        ));
    }
    let price = validate_unit_price("package price", input.price)?;
    Ok((size, price))
}

pub fn create_package(conn: &Connection, input: &PackageInput) -> Result<Package> {
    let (size, price) = validated(input)?;
    assert_size_unit_free(conn, size, input.unit, None)?;

    conn.execute(
        "INSERT INTO packages (size, unit, price) VALUES (?, ?, ?)",
        params![size, input.unit.as_str(), price],
    )?;
    get_package(conn, PackageId::new(conn.last_insert_rowid()), Scope::ActiveOnly)
}

pub fn update_package(conn: &Connection, id: PackageId, input: &PackageInput) -> Result<Package> {
    let (size, price) = validated(input)?;
    get_package(conn, id, Scope::ActiveOnly)?;
    assert_size_unit_free(conn, size, input.unit, Some(id))?;

    conn.execute(
        "UPDATE packages SET size = ?, unit = ?, price = ?
         WHERE id = ? AND deleted_at IS NULL",
        params![size, input.unit.as_str(), price, id.as_i64()],
    )?;
    get_package(conn, id, Scope::ActiveOnly)
}

pub fn delete_package(conn: &Connection, id: PackageId, now: DateTime<Utc>) -> Result<()> {
    let changed = conn.execute(
        "UPDATE packages SET deleted_at = ? WHERE id = ? AND deleted_at IS NULL",
        params![to_db_datetime(now), id.as_i64()],
    )?;
    if changed == 0 {
        return Err(StoreError::NotFound {
            entity: "package",
            id: id.as_i64(),
        });
    }
    Ok(())
}

/// Price Ledger entry point for packaging. Same transaction discipline as
/// the stock side: price write and staleness flags commit together.
/// Returns the previous price.
pub fn set_package_price(
    conn: &mut Connection,
    id: PackageId,
    new_price: f64,
) -> Result<f64> {
    let new_price = validate_unit_price("package price", new_price)?;
    let tx = conn.transaction()?;

    let previous = package_unit_price(&tx, id)?.ok_or(StoreError::NotFound {
        entity: "package",
        id: id.as_i64(),
    })?;

    tx.execute(
        "UPDATE packages SET price = ? WHERE id = ?",
        params![new_price, id.as_i64()],
    )?;
    mark_stale_for_package(&tx, id)?;

    tx.commit()?;
    Ok(previous)
}
