use super::*;
use agrimix_model::{NutrientValues, RecipeId, StockItemId};
use chrono::{TimeZone, Utc};
use proptest::prelude::*;
use rusqlite::{params, Connection};
use std::collections::BTreeMap;

fn setup_db() -> Connection {
    let conn = Connection::open_in_memory().expect("open memory db");
    conn.execute_batch(
        "
        CREATE TABLE stock (
          id INTEGER PRIMARY KEY,
          name TEXT NOT NULL,
          quantity REAL NOT NULL DEFAULT 0,
          price REAL NOT NULL DEFAULT 0,
          n_content REAL, p_content REAL, k_content REAL, mg_content REAL,
          ca_content REAL, s_content REAL, fe_content REAL, zn_content REAL,
          b_content REAL, mn_content REAL, cu_content REAL, mo_content REAL,
          na_content REAL, si_content REAL, h_content REAL, c_content REAL,
          o_content REAL, cl_content REAL, al_content REAL, organic_content REAL,
          alginic_acid_content REAL, mgo_content REAL, protein_content REAL,
          moisture_content REAL, ash_content REAL, ph_content REAL,
          deleted_at DATETIME
        );
        CREATE TABLE recipes (
          id INTEGER PRIMARY KEY,
          name TEXT NOT NULL,
          customer_id INTEGER NOT NULL DEFAULT 1,
          total_cost REAL NOT NULL DEFAULT 0,
          is_price_updated BOOLEAN DEFAULT 1,
          last_price_update DATETIME,
          deleted_at DATETIME
        );
        CREATE TABLE recipe_ingredients (
          id INTEGER PRIMARY KEY,
          recipe_id INTEGER NOT NULL,
          stock_id INTEGER NOT NULL,
          name TEXT NOT NULL,
          quantity REAL NOT NULL,
          price REAL NOT NULL,
          total REAL NOT NULL
        );
        CREATE TABLE recipe_packages (
          id INTEGER PRIMARY KEY,
          recipe_id INTEGER NOT NULL,
          package_id INTEGER NOT NULL
        );
        ",
    )
    .expect("schema");
    conn
}

fn insert_material(conn: &Connection, id: i64, name: &str, price: f64) {
    conn.execute(
        "INSERT INTO stock (id, name, price) VALUES (?, ?, ?)",
        params![id, name, price],
    )
    .expect("insert material");
}

fn insert_recipe(conn: &Connection, id: i64, name: &str) {
    conn.execute(
        "INSERT INTO recipes (id, name) VALUES (?, ?)",
        params![id, name],
    )
    .expect("insert recipe");
}

fn insert_line(conn: &Connection, recipe_id: i64, stock_id: i64, quantity: f64, snapshot: f64) {
    conn.execute(
        "INSERT INTO recipe_ingredients (recipe_id, stock_id, name, quantity, price, total)
         VALUES (?, ?, 'line', ?, ?, ?)",
        params![recipe_id, stock_id, quantity, snapshot, quantity * snapshot],
    )
    .expect("insert line");
}

fn recipe_total(conn: &Connection, id: i64) -> f64 {
    conn.query_row("SELECT total_cost FROM recipes WHERE id = ?", [id], |row| {
        row.get(0)
    })
    .expect("recipe total")
}

fn fixed_now() -> chrono::DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 2, 1, 10, 0, 0).unwrap()
}

#[test]
fn price_change_scenario_recomputes_to_new_ledger_price() {
    let conn = setup_db();
    insert_material(&conn, 1, "MAP", 5.0);
    insert_material(&conn, 2, "Urea", 2.0);
    insert_recipe(&conn, 10, "npk blend");
    insert_line(&conn, 10, 1, 10.0, 5.0);
    insert_line(&conn, 10, 2, 5.0, 2.0);

    let total =
        recompute_one(&conn, RecipeId::new(10), fixed_now()).expect("initial recompute");
    assert_eq!(total, 60.0);
    assert!(stale_recipe_ids(&conn).expect("stale").is_empty());

    conn.execute("UPDATE stock SET price = 6.0 WHERE id = 1", [])
        .expect("price update");
    let flipped = mark_stale_for_stock(&conn, StockItemId::new(1)).expect("mark stale");
    assert_eq!(flipped, 1);
    assert_eq!(
        stale_recipe_ids(&conn).expect("stale"),
        vec![RecipeId::new(10)]
    );

    let total = recompute_one(&conn, RecipeId::new(10), fixed_now()).expect("recompute");
    assert_eq!(total, 70.0);
    assert_eq!(recipe_total(&conn, 10), 70.0);
    assert!(stale_recipe_ids(&conn).expect("stale").is_empty());
}

#[test]
fn staleness_only_touches_recipes_referencing_the_material() {
    let conn = setup_db();
    insert_material(&conn, 1, "shared", 3.0);
    insert_material(&conn, 2, "other", 4.0);
    for recipe_id in 1..=10 {
        insert_recipe(&conn, recipe_id, "r");
        // recipes 1-3 use the shared material, the rest use the other one
        let stock_id = if recipe_id <= 3 { 1 } else { 2 };
        insert_line(&conn, recipe_id, stock_id, 2.0, 3.0);
    }

    let flipped = mark_stale_for_stock(&conn, StockItemId::new(1)).expect("mark stale");
    assert_eq!(flipped, 3);
    let stale = stale_recipe_ids(&conn).expect("stale");
    assert_eq!(
        stale,
        vec![RecipeId::new(1), RecipeId::new(2), RecipeId::new(3)]
    );
}

#[test]
fn recompute_all_covers_every_live_recipe_and_clears_staleness() {
    let mut conn = setup_db();
    insert_material(&conn, 1, "a", 3.0);
    for recipe_id in 1..=10 {
        insert_recipe(&conn, recipe_id, "r");
        insert_line(&conn, recipe_id, 1, 2.0, 3.0);
    }
    conn.execute(
        "UPDATE recipes SET is_price_updated = 0 WHERE id <= 3",
        [],
    )
    .expect("flag");
    // a soft-deleted recipe must not be part of the batch
    conn.execute(
        "UPDATE recipes SET deleted_at = '2025-01-01 00:00:00' WHERE id = 10",
        [],
    )
    .expect("soft delete");

    let updated = recompute_all(&mut conn, fixed_now()).expect("recompute all");
    assert_eq!(updated, 9);
    assert!(stale_recipe_ids(&conn).expect("stale").is_empty());
    assert_eq!(recipe_total(&conn, 1), 6.0);
}

#[test]
fn recompute_all_is_idempotent() {
    let mut conn = setup_db();
    insert_material(&conn, 1, "a", 7.5);
    insert_recipe(&conn, 1, "r");
    insert_line(&conn, 1, 1, 4.0, 7.5);

    let first = recompute_all(&mut conn, fixed_now()).expect("first run");
    let total_after_first = recipe_total(&conn, 1);
    let second = recompute_all(&mut conn, fixed_now()).expect("second run");

    assert_eq!(first, second);
    assert_eq!(recipe_total(&conn, 1), total_after_first);
    assert!(stale_recipe_ids(&conn).expect("stale").is_empty());
}

#[test]
fn missing_material_row_degrades_to_zero_contribution() {
    let conn = setup_db();
    insert_material(&conn, 1, "a", 5.0);
    insert_recipe(&conn, 1, "r");
    insert_line(&conn, 1, 1, 2.0, 5.0);
    insert_line(&conn, 1, 999, 3.0, 4.0);

    let total = recompute_one(&conn, RecipeId::new(1), fixed_now()).expect("recompute");
    assert_eq!(total, 10.0);
}

#[test]
fn soft_deleted_material_still_costs_but_is_excluded_from_nutrients() {
    let conn = setup_db();
    insert_material(&conn, 1, "live", 2.0);
    insert_material(&conn, 2, "gone", 5.0);
    conn.execute(
        "UPDATE stock SET n_content = 10.0, deleted_at = '2025-01-01 00:00:00' WHERE id = 2",
        [],
    )
    .expect("soft delete");
    conn.execute("UPDATE stock SET n_content = 20.0 WHERE id = 1", [])
        .expect("nutrients");
    insert_recipe(&conn, 1, "r");
    insert_line(&conn, 1, 1, 3.0, 2.0);
    insert_line(&conn, 1, 2, 1.0, 5.0);

    // cost keeps using the soft-deleted row's last price
    let total = recompute_one(&conn, RecipeId::new(1), fixed_now()).expect("recompute");
    assert_eq!(total, 11.0);

    // the aggregate only sees the live line: 3 * 20 / 3
    let profile = recipe_nutrient_profile(&conn, RecipeId::new(1)).expect("profile");
    assert_eq!(profile.value("n_content"), 20.0);
}

#[test]
fn recompute_one_rejects_missing_or_deleted_recipe() {
    let conn = setup_db();
    insert_recipe(&conn, 1, "r");
    conn.execute(
        "UPDATE recipes SET deleted_at = '2025-01-01 00:00:00' WHERE id = 1",
        [],
    )
    .expect("soft delete");

    let err = recompute_one(&conn, RecipeId::new(1), fixed_now()).expect_err("deleted");
    assert!(matches!(err, EngineError::RecipeNotFound(_)));
    let err = recompute_one(&conn, RecipeId::new(99), fixed_now()).expect_err("missing");
    assert!(matches!(err, EngineError::RecipeNotFound(_)));
}

#[test]
fn package_price_change_marks_referencing_recipes() {
    let conn = setup_db();
    insert_recipe(&conn, 1, "with package");
    insert_recipe(&conn, 2, "without");
    conn.execute(
        "INSERT INTO recipe_packages (recipe_id, package_id) VALUES (1, 7)",
        [],
    )
    .expect("association");

    let flipped =
        mark_stale_for_package(&conn, agrimix_model::PackageId::new(7)).expect("mark stale");
    assert_eq!(flipped, 1);
    assert_eq!(
        stale_recipe_ids(&conn).expect("stale"),
        vec![RecipeId::new(1)]
    );
}

#[test]
fn nutrient_profile_with_zero_quantity_is_all_zeros() {
    let profile = nutrient_profile(&[]);
    for field in agrimix_model::NUTRIENT_FIELDS {
        assert_eq!(profile.value(field), 0.0);
    }

    let lines = vec![NutrientLine {
        quantity: 0.0,
        values: NutrientValues {
            n: Some(21.0),
            ..NutrientValues::default()
        },
    }];
    let profile = nutrient_profile(&lines);
    assert_eq!(profile.value("n_content"), 0.0);
}

#[test]
fn nutrient_profile_weights_by_quantity_over_total() {
    let lines = vec![
        NutrientLine {
            quantity: 3.0,
            values: NutrientValues {
                n: Some(20.0),
                k: Some(8.0),
                ..NutrientValues::default()
            },
        },
        NutrientLine {
            quantity: 1.0,
            values: NutrientValues {
                n: Some(10.0),
                ..NutrientValues::default()
            },
        },
    ];
    let profile = nutrient_profile(&lines);
    // n: (3*20 + 1*10) / 4
    assert_eq!(profile.value("n_content"), 17.5);
    // k only declared on the first material, denominator stays the full total
    assert_eq!(profile.value("k_content"), 6.0);
    assert_eq!(profile.value("p_content"), 0.0);
}

#[test]
fn ledger_resolves_soft_deleted_rows_but_not_missing_ones() {
    let conn = setup_db();
    insert_material(&conn, 1, "gone", 9.5);
    conn.execute(
        "UPDATE stock SET deleted_at = '2025-01-01 00:00:00' WHERE id = 1",
        [],
    )
    .expect("soft delete");

    assert_eq!(
        stock_unit_price(&conn, StockItemId::new(1)).expect("lookup"),
        Some(9.5)
    );
    assert_eq!(
        stock_unit_price(&conn, StockItemId::new(99)).expect("lookup"),
        None
    );

    let prices = LedgerPrices::new(&conn);
    assert_eq!(prices.unit_price(StockItemId::new(1)), Some(9.5));
    assert_eq!(prices.unit_price(StockItemId::new(99)), None);
}

#[test]
fn pure_cost_matches_ledger_lookup() {
    let mut prices = BTreeMap::new();
    prices.insert(StockItemId::new(1), 5.0);
    prices.insert(StockItemId::new(2), 2.0);
    let lines = vec![
        CostLine {
            stock_id: StockItemId::new(1),
            quantity: 10.0,
        },
        CostLine {
            stock_id: StockItemId::new(2),
            quantity: 5.0,
        },
        CostLine {
            stock_id: StockItemId::new(3),
            quantity: 100.0,
        },
    ];
    // the unknown material contributes nothing
    assert_eq!(recipe_cost(&lines, &prices), 60.0);
}

proptest! {
    #[test]
    fn cost_is_the_sum_of_line_products(
        entries in proptest::collection::vec((1i64..50, 0.0f64..1000.0, 0.0f64..1000.0), 0..20)
    ) {
        let mut prices = BTreeMap::new();
        let mut lines = Vec::new();
        let mut expected = 0.0f64;
        for (id, quantity, price) in entries {
            let stock_id = StockItemId::new(id);
            prices.insert(stock_id, price);
            lines.push(CostLine { stock_id, quantity });
        }
        for line in &lines {
            expected += line.quantity * prices[&line.stock_id];
        }
        let total = recipe_cost(&lines, &prices);
        prop_assert!((total - expected).abs() < 1e-9_f64.max(expected.abs() * 1e-12));
    }
}
