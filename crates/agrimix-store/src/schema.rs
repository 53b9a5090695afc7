// SPDX-License-Identifier: Apache-2.0

use agrimix_model::Settings;
use rusqlite::{params, Connection};

use crate::error::Result;

/// Create every table if missing, enforce foreign keys, and seed first-run
/// defaults. Safe to run on every startup; existing data is never touched.
pub fn bootstrap(conn: &Connection) -> Result<()> {
    conn.execute_batch("PRAGMA encoding = 'UTF-8'; PRAGMA foreign_keys = ON;")?;
    conn.execute_batch(DDL)?;
    seed_defaults(conn)?;
    Ok(())
}

const DDL: &str = "
CREATE TABLE IF NOT EXISTS customers (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NOT NULL,
    kind TEXT NOT NULL CHECK(kind IN ('buyer', 'supplier', 'toller', 'internal', 'other')),
    email TEXT,
    phone TEXT,
    address TEXT,
    balance REAL NOT NULL DEFAULT 0,
    created_at DATETIME NOT NULL DEFAULT CURRENT_TIMESTAMP,
    deleted_at DATETIME DEFAULT NULL
);

CREATE TABLE IF NOT EXISTS stock (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NOT NULL,
    code TEXT DEFAULT NULL,
    quantity REAL NOT NULL DEFAULT 0,
    min_quantity REAL NOT NULL DEFAULT 0,
    unit TEXT NOT NULL DEFAULT 'kg',
    category TEXT NOT NULL DEFAULT 'raw_material',
    price REAL NOT NULL DEFAULT 0,
    n_content REAL, p_content REAL, k_content REAL, mg_content REAL,
    ca_content REAL, s_content REAL, fe_content REAL, zn_content REAL,
    b_content REAL, mn_content REAL, cu_content REAL, mo_content REAL,
    na_content REAL, si_content REAL, h_content REAL, c_content REAL,
    o_content REAL, cl_content REAL, al_content REAL, organic_content REAL,
    alginic_acid_content REAL, mgo_content REAL, protein_content REAL,
    moisture_content REAL, ash_content REAL, ph_content REAL,
    created_at DATETIME NOT NULL DEFAULT CURRENT_TIMESTAMP,
    updated_at DATETIME NOT NULL DEFAULT CURRENT_TIMESTAMP,
    deleted_at DATETIME DEFAULT NULL
);

CREATE TABLE IF NOT EXISTS recipes (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NOT NULL,
    customer_id INTEGER NOT NULL,
    density TEXT,
    total_cost REAL NOT NULL DEFAULT 0,
    is_price_updated BOOLEAN DEFAULT 1,
    last_price_update DATETIME,
    created_at DATETIME NOT NULL DEFAULT CURRENT_TIMESTAMP,
    deleted_at DATETIME DEFAULT NULL,
    FOREIGN KEY (customer_id) REFERENCES customers(id)
);

CREATE TABLE IF NOT EXISTS recipe_ingredients (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    recipe_id INTEGER NOT NULL,
    stock_id INTEGER NOT NULL,
    name TEXT NOT NULL,
    quantity REAL NOT NULL,
    price REAL NOT NULL,
    total REAL NOT NULL,
    created_at DATETIME NOT NULL DEFAULT CURRENT_TIMESTAMP,
    FOREIGN KEY (recipe_id) REFERENCES recipes(id) ON DELETE CASCADE,
    FOREIGN KEY (stock_id) REFERENCES stock(id)
);

CREATE TABLE IF NOT EXISTS packages (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    size REAL NOT NULL,
    unit TEXT NOT NULL CHECK(unit IN ('L', 'Kg')),
    price REAL NOT NULL,
    created_at DATETIME NOT NULL DEFAULT CURRENT_TIMESTAMP,
    deleted_at DATETIME DEFAULT NULL
);

CREATE TABLE IF NOT EXISTS recipe_packages (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    recipe_id INTEGER NOT NULL,
    package_id INTEGER NOT NULL,
    created_at DATETIME NOT NULL DEFAULT CURRENT_TIMESTAMP,
    FOREIGN KEY (recipe_id) REFERENCES recipes(id) ON DELETE CASCADE,
    FOREIGN KEY (package_id) REFERENCES packages(id)
);

CREATE TABLE IF NOT EXISTS orders (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    customer_id INTEGER NOT NULL,
    recipe_id INTEGER NOT NULL,
    quantity REAL NOT NULL DEFAULT 0,
    total REAL NOT NULL DEFAULT 0,
    status TEXT NOT NULL CHECK(status IN ('pending', 'confirmed', 'cancelled')) DEFAULT 'pending',
    created_at DATETIME NOT NULL DEFAULT CURRENT_TIMESTAMP,
    deleted_at DATETIME DEFAULT NULL,
    FOREIGN KEY (customer_id) REFERENCES customers(id),
    FOREIGN KEY (recipe_id) REFERENCES recipes(id)
);

CREATE TABLE IF NOT EXISTS settings (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    fx_rate_usd REAL NOT NULL DEFAULT 0,
    margin_list_a REAL NOT NULL DEFAULT 20,
    margin_list_b REAL NOT NULL DEFAULT 35,
    margin_list_c REAL NOT NULL DEFAULT 50,
    created_at DATETIME NOT NULL DEFAULT CURRENT_TIMESTAMP,
    updated_at DATETIME NOT NULL DEFAULT CURRENT_TIMESTAMP
);

CREATE INDEX IF NOT EXISTS idx_recipe_ingredients_recipe ON recipe_ingredients(recipe_id);
CREATE INDEX IF NOT EXISTS idx_recipe_ingredients_stock ON recipe_ingredients(stock_id);
CREATE INDEX IF NOT EXISTS idx_recipe_packages_recipe ON recipe_packages(recipe_id);
CREATE INDEX IF NOT EXISTS idx_recipe_packages_package ON recipe_packages(package_id);
CREATE INDEX IF NOT EXISTS idx_orders_status ON orders(status);
";

fn seed_defaults(conn: &Connection) -> Result<()> {
    let live_stock: i64 = conn.query_row(
        "SELECT COUNT(*) FROM stock WHERE deleted_at IS NULL",
        [],
        |row| row.get(0),
    )?;
    if live_stock == 0 {
        let defaults: [(&str, f64, f64, f64); 5] = [
            ("MAP", 1000.0, 100.0, 15.0),
            ("Potassium Sulphate", 800.0, 100.0, 12.0),
            ("Urea", 1200.0, 150.0, 8.0),
            ("Ammonium Sulphate", 900.0, 100.0, 10.0),
            ("Magnesium Sulphate", 500.0, 50.0, 9.0),
        ];
        for (name, quantity, min_quantity, price) in defaults {
            conn.execute(
                "INSERT INTO stock (name, quantity, min_quantity, price)
                 SELECT ?, ?, ?, ?
                 WHERE NOT EXISTS (
                     SELECT 1 FROM stock WHERE LOWER(name) = LOWER(?) AND deleted_at IS NULL
                 )",
                params![name, quantity, min_quantity, price, name],
            )?;
        }
    }

    let live_packages: i64 = conn.query_row(
        "SELECT COUNT(*) FROM packages WHERE deleted_at IS NULL",
        [],
        |row| row.get(0),
    )?;
    if live_packages == 0 {
        let defaults: [(f64, &str, f64); 4] = [
            (1.0, "L", 2.5),
            (5.0, "L", 5.0),
            (20.0, "L", 15.0),
            (25.0, "Kg", 12.5),
        ];
        for (size, unit, price) in defaults {
            conn.execute(
                "INSERT INTO packages (size, unit, price)
                 SELECT ?, ?, ?
                 WHERE NOT EXISTS (
                     SELECT 1 FROM packages WHERE size = ? AND unit = ? AND deleted_at IS NULL
                 )",
                params![size, unit, price, size, unit],
            )?;
        }
    }

    conn.execute(
        "INSERT OR IGNORE INTO settings (id, fx_rate_usd, margin_list_a, margin_list_b, margin_list_c)
         VALUES (1, ?, ?, ?, ?)",
        params![
            Settings::DEFAULT_FX_RATE_USD,
            Settings::DEFAULT_MARGIN_LIST_A,
            Settings::DEFAULT_MARGIN_LIST_B,
            Settings::DEFAULT_MARGIN_LIST_C,
        ],
    )?;

    Ok(())
}
