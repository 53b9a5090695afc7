// SPDX-License-Identifier: Apache-2.0

use std::collections::BTreeMap;

use agrimix_core::{to_db_datetime, Lifecycle};
use agrimix_engine::{recipe_nutrient_profile, recompute_one, stale_recipe_ids};
use agrimix_model::{
    parse_entity_name, validate_quantity, CustomerId, IngredientId, NutrientProfile, PackageId,
    PriceState, Recipe, RecipeId, RecipeIngredient, StockItemId, COPY_SUFFIX,
};
use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension, Row};

use crate::error::{Result, StoreError};
use crate::rows::{datetime_col, opt_datetime_col};
use crate::Scope;

/// One requested ingredient line. The stored name/price/total snapshot is
/// captured server-side from the live material at write time.
#[derive(Debug, Clone, Copy)]
pub struct IngredientInput {
    pub stock_id: StockItemId,
    pub quantity: f64,
}

#[derive(Debug, Clone)]
pub struct RecipeInput {
    pub name: String,
    pub customer_id: CustomerId,
    pub density: Option<String>,
    pub packages: Vec<PackageId>,
    pub ingredients: Vec<IngredientInput>,
}

/// List shape: the recipe plus what the overview screen joins in.
#[derive(Debug, Clone, PartialEq)]
pub struct RecipeRow {
    pub recipe: Recipe,
    pub customer_name: Option<String>,
    pub packages: Vec<PackageId>,
}

/// Detail shape: the row plus owned lines and the computed aggregate.
#[derive(Debug, Clone, PartialEq)]
pub struct RecipeDetails {
    pub recipe: Recipe,
    pub customer_name: Option<String>,
    pub packages: Vec<PackageId>,
    pub ingredients: Vec<RecipeIngredient>,
    pub nutrients: NutrientProfile,
}

fn recipe_from_row(row: &Row<'_>) -> rusqlite::Result<Recipe> {
    Ok(Recipe {
        id: RecipeId::new(row.get("id")?),
        name: row.get("name")?,
        customer_id: CustomerId::new(row.get("customer_id")?),
        density: row.get("density")?,
        total_cost: row.get("total_cost")?,
        price_state: PriceState::from_flag(row.get("is_price_updated")?),
        last_price_update: opt_datetime_col(row, "last_price_update")?,
        created_at: datetime_col(row, "created_at")?,
        lifecycle: Lifecycle::from_deleted_at(opt_datetime_col(row, "deleted_at")?),
    })
}

fn ingredient_from_row(row: &Row<'_>) -> rusqlite::Result<RecipeIngredient> {
    Ok(RecipeIngredient {
        id: IngredientId::new(row.get("id")?),
        recipe_id: RecipeId::new(row.get("recipe_id")?),
        stock_id: StockItemId::new(row.get("stock_id")?),
        name: row.get("name")?,
        quantity: row.get("quantity")?,
        unit_price: row.get("price")?,
        line_total: row.get("total")?,
    })
}

fn package_ids_by_recipe(conn: &Connection) -> Result<BTreeMap<i64, Vec<PackageId>>> {
    let mut stmt = conn.prepare_cached(
        "SELECT recipe_id, package_id FROM recipe_packages ORDER BY recipe_id, package_id",
    )?;
    let mut grouped: BTreeMap<i64, Vec<PackageId>> = BTreeMap::new();
    let rows = stmt.query_map([], |row| {
        Ok((row.get::<_, i64>(0)?, row.get::<_, i64>(1)?))
    })?;
    for row in rows {
        let (recipe_id, package_id) = row?;
        grouped
            .entry(recipe_id)
            .or_default()
            .push(PackageId::new(package_id));
    }
    Ok(grouped)
}

fn recipe_package_ids(conn: &Connection, id: RecipeId) -> Result<Vec<PackageId>> {
    let mut stmt = conn.prepare_cached(
        "SELECT package_id FROM recipe_packages WHERE recipe_id = ? ORDER BY package_id",
    )?;
    let ids = stmt
        .query_map(params![id.as_i64()], |row| {
            row.get::<_, i64>(0).map(PackageId::new)
        })?
        .collect::<std::result::Result<Vec<_>, _>>()?;
    Ok(ids)
}

pub fn list_recipes(conn: &Connection, scope: Scope) -> Result<Vec<RecipeRow>> {
    let sql = format!(
        "SELECT r.*, c.name AS customer_name
         FROM recipes r
         LEFT JOIN customers c ON r.customer_id = c.id
         WHERE {}
         ORDER BY r.created_at DESC, r.id DESC",
        scope.predicate("r")
    );
    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt
        .query_map([], |row| {
            Ok((recipe_from_row(row)?, row.get::<_, Option<String>>("customer_name")?))
        })?
        .collect::<std::result::Result<Vec<_>, _>>()?;

    let mut grouped = package_ids_by_recipe(conn)?;
    Ok(rows
        .into_iter()
        .map(|(recipe, customer_name)| {
            let packages = grouped.remove(&recipe.id.as_i64()).unwrap_or_default();
            RecipeRow {
                recipe,
                customer_name,
                packages,
            }
        })
        .collect())
}

pub fn get_recipe(conn: &Connection, id: RecipeId, scope: Scope) -> Result<RecipeDetails> {
    let sql = format!(
        "SELECT r.*, c.name AS customer_name
         FROM recipes r
         LEFT JOIN customers c ON r.customer_id = c.id
         WHERE r.id = ? AND {}",
        scope.predicate("r")
    );
    let found = conn
        .query_row(&sql, params![id.as_i64()], |row| {
            Ok((recipe_from_row(row)?, row.get::<_, Option<String>>("customer_name")?))
        })
        .optional()?;
    let (recipe, customer_name) = found.ok_or(StoreError::NotFound {
        entity: "recipe",
        id: id.as_i64(),
    })?;

    let mut stmt = conn.prepare_cached(
        "SELECT * FROM recipe_ingredients WHERE recipe_id = ? ORDER BY id",
    )?;
    let ingredients = stmt
        .query_map(params![id.as_i64()], ingredient_from_row)?
        .collect::<std::result::Result<Vec<_>, _>>()?;

    Ok(RecipeDetails {
        packages: recipe_package_ids(conn, id)?,
        nutrients: recipe_nutrient_profile(conn, id)?,
        recipe,
        customer_name,
        ingredients,
    })
}

/// Recipes whose stored cost no longer reflects the ledger.
pub fn list_stale_recipes(conn: &Connection) -> Result<Vec<RecipeRow>> {
    let mut rows = Vec::new();
    for id in stale_recipe_ids(conn)? {
        let details = get_recipe(conn, id, Scope::ActiveOnly)?;
        rows.push(RecipeRow {
            recipe: details.recipe,
            customer_name: details.customer_name,
            packages: details.packages,
        });
    }
    Ok(rows)
}

fn validate_input(conn: &Connection, input: &RecipeInput) -> Result<String> {
    let name = parse_entity_name("recipe name", &input.name)?;
    if input.ingredients.is_empty() {
        return Err(StoreError::Validation(
            agrimix_model::ValidationError::Empty("recipe ingredients"),
        ));
    }
    if input.packages.is_empty() {
        return Err(StoreError::Validation(
            agrimix_model::ValidationError::Empty("recipe packages"),
        ));
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

    for package_id in &input.packages {
        let live: Option<i64> = conn
            .query_row(
                "SELECT id FROM packages WHERE id = ? AND deleted_at IS NULL",
                params![package_id.as_i64()],
                |row| row.get(0),
            )
            .optional()?;
        if live.is_none() {
            return Err(StoreError::NotFound {
                entity: "package",
                id: package_id.as_i64(),
            });
        }
    }

    for line in &input.ingredients {
        validate_quantity("ingredient quantity", line.quantity)?;
    }

    Ok(name)
}

/// Write the owned rows of a recipe: package associations plus ingredient
/// lines with their name/price/total snapshots taken from the live material
/// right now. Soft-deleted materials are not valid for new composition.
fn insert_owned_rows(conn: &Connection, id: RecipeId, input: &RecipeInput) -> Result<()> {
    for package_id in &input.packages {
        conn.execute(
            "INSERT INTO recipe_packages (recipe_id, package_id) VALUES (?, ?)",
            params![id.as_i64(), package_id.as_i64()],
        )?;
    }

    for line in &input.ingredients {
        let material: Option<(String, f64)> = conn
            .query_row(
                "SELECT name, price FROM stock WHERE id = ? AND deleted_at IS NULL",
                params![line.stock_id.as_i64()],
                |row| Ok((row.get(0)?, row.get(1)?)),
            )
            .optional()?;
        let (name, price) = material.ok_or(StoreError::NotFound {
            entity: "stock item",
            id: line.stock_id.as_i64(),
        })?;
        conn.execute(
            "INSERT INTO recipe_ingredients (recipe_id, stock_id, name, quantity, price, total)
             VALUES (?, ?, ?, ?, ?, ?)",
            params![
                id.as_i64(),
                line.stock_id.as_i64(),
                name,
                line.quantity,
                price,
                line.quantity * price,
            ],
        )?;
    }
    Ok(())
}

pub fn create_recipe(
    conn: &mut Connection,
    input: &RecipeInput,
    now: DateTime<Utc>,
) -> Result<RecipeDetails> {
    let tx = conn.transaction()?;
    let name = validate_input(&tx, input)?;

    tx.execute(
        "INSERT INTO recipes (name, customer_id, density) VALUES (?, ?, ?)",
        params![name, input.customer_id.as_i64(), input.density],
    )?;
    let id = RecipeId::new(tx.last_insert_rowid());

    insert_owned_rows(&tx, id, input)?;
    // a new recipe starts Fresh: its cost reflects the ledger as of now
    recompute_one(&tx, id, now)?;

    let details = get_recipe(&tx, id, Scope::ActiveOnly)?;
    tx.commit()?;
    Ok(details)
}

pub fn update_recipe(
    conn: &mut Connection,
    id: RecipeId,
    input: &RecipeInput,
    now: DateTime<Utc>,
) -> Result<RecipeDetails> {
    let tx = conn.transaction()?;

    let live: Option<i64> = tx
        .query_row(
            "SELECT id FROM recipes WHERE id = ? AND deleted_at IS NULL",
            params![id.as_i64()],
            |row| row.get(0),
        )
        .optional()?;
    if live.is_none() {
        return Err(StoreError::NotFound {
            entity: "recipe",
            id: id.as_i64(),
        });
    }
    let name = validate_input(&tx, input)?;

    tx.execute(
        "UPDATE recipes SET name = ?, customer_id = ?, density = ?
         WHERE id = ? AND deleted_at IS NULL",
        params![name, input.customer_id.as_i64(), input.density, id.as_i64()],
    )?;

    // owned rows are replaced wholesale, snapshots re-captured
    tx.execute(
        "DELETE FROM recipe_packages WHERE recipe_id = ?",
        params![id.as_i64()],
    )?;
    tx.execute(
        "DELETE FROM recipe_ingredients WHERE recipe_id = ?",
        params![id.as_i64()],
    )?;
    insert_owned_rows(&tx, id, input)?;
    recompute_one(&tx, id, now)?;

    let details = get_recipe(&tx, id, Scope::ActiveOnly)?;
    tx.commit()?;
    Ok(details)
}

pub fn delete_recipe(conn: &mut Connection, id: RecipeId, now: DateTime<Utc>) -> Result<()> {
    let tx = conn.transaction()?;

    let changed = tx.execute(
        "UPDATE recipes SET deleted_at = ? WHERE id = ? AND deleted_at IS NULL",
        params![to_db_datetime(now), id.as_i64()],
    )?;
    if changed == 0 {
        return Err(StoreError::NotFound {
            entity: "recipe",
            id: id.as_i64(),
        });
    }

    // owned rows do not outlive the recipe
    tx.execute(
        "DELETE FROM recipe_packages WHERE recipe_id = ?",
        params![id.as_i64()],
    )?;
    tx.execute(
        "DELETE FROM recipe_ingredients WHERE recipe_id = ?",
        params![id.as_i64()],
    )?;

    tx.commit()?;
    Ok(())
}

/// Duplicate a recipe with its lines and package set. Snapshots on the
/// copied lines are preserved verbatim; the copy's cost is still computed
/// from the ledger so it starts Fresh like any new recipe.
pub fn copy_recipe(
    conn: &mut Connection,
    id: RecipeId,
    now: DateTime<Utc>,
) -> Result<RecipeDetails> {
    let tx = conn.transaction()?;

    let source: Option<(String, i64, Option<String>)> = tx
        .query_row(
            "SELECT name, customer_id, density FROM recipes
             WHERE id = ? AND deleted_at IS NULL",
            params![id.as_i64()],
            |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?)),
        )
        .optional()?;
    let (name, customer_id, density) = source.ok_or(StoreError::NotFound {
        entity: "recipe",
        id: id.as_i64(),
    })?;

    tx.execute(
        "INSERT INTO recipes (name, customer_id, density) VALUES (?, ?, ?)",
        params![format!("{name}{COPY_SUFFIX}"), customer_id, density],
    )?;
    let copy_id = RecipeId::new(tx.last_insert_rowid());

    tx.execute(
        "INSERT INTO recipe_ingredients (recipe_id, stock_id, name, quantity, price, total)
         SELECT ?, stock_id, name, quantity, price, total
         FROM recipe_ingredients WHERE recipe_id = ?",
        params![copy_id.as_i64(), id.as_i64()],
    )?;
    tx.execute(
        "INSERT INTO recipe_packages (recipe_id, package_id)
         SELECT ?, package_id FROM recipe_packages WHERE recipe_id = ?",
        params![copy_id.as_i64(), id.as_i64()],
    )?;
    recompute_one(&tx, copy_id, now)?;

    let details = get_recipe(&tx, copy_id, Scope::ActiveOnly)?;
    tx.commit()?;
    Ok(details)
}
