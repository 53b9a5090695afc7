// SPDX-License-Identifier: Apache-2.0

use agrimix_core::to_db_datetime;
use agrimix_model::{validate_unit_price, Settings};
use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension, Row};

use crate::error::{Result, StoreError};
use crate::rows::datetime_col;

#[derive(Debug, Clone, Copy)]
pub struct SettingsInput {
    pub fx_rate_usd: f64,
    pub margin_list_a: f64,
    pub margin_list_b: f64,
    pub margin_list_c: f64,
}

fn settings_from_row(row: &Row<'_>) -> rusqlite::Result<Settings> {
    Ok(Settings {
        fx_rate_usd: row.get("fx_rate_usd")?,
        margin_list_a: row.get("margin_list_a")?,
        margin_list_b: row.get("margin_list_b")?,
        margin_list_c: row.get("margin_list_c")?,
        updated_at: datetime_col(row, "updated_at")?,
    })
}

pub fn get_settings(conn: &Connection) -> Result<Settings> {
    conn.query_row("SELECT * FROM settings WHERE id = 1", [], settings_from_row)
        .optional()?
        .ok_or(StoreError::NotFound {
            entity: "settings",
            id: 1,
        })
}

pub fn update_settings(
    conn: &Connection,
    input: &SettingsInput,
    now: DateTime<Utc>,
) -> Result<Settings> {
    validate_unit_price("fx rate", input.fx_rate_usd)?;
    validate_unit_price("margin list a", input.margin_list_a)?;
    validate_unit_price("margin list b", input.margin_list_b)?;
    validate_unit_price("margin list c", input.margin_list_c)?;

    conn.execute(
        "UPDATE settings
         SET fx_rate_usd = ?, margin_list_a = ?, margin_list_b = ?, margin_list_c = ?,
             updated_at = ?
         WHERE id = 1",
        params![
            input.fx_rate_usd,
            input.margin_list_a,
            input.margin_list_b,
            input.margin_list_c,
            to_db_datetime(now),
        ],
    )?;
    get_settings(conn)
}
