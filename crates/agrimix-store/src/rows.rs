// SPDX-License-Identifier: Apache-2.0

use agrimix_core::from_db_datetime;
use chrono::{DateTime, Utc};
use rusqlite::types::Type;
use rusqlite::Row;

/// Read a non-null DATETIME column stored in the shared DB spelling.
pub(crate) fn datetime_col(row: &Row<'_>, column: &str) -> rusqlite::Result<DateTime<Utc>> {
    let raw: String = row.get(column)?;
    from_db_datetime(&raw).map_err(|err| {
        rusqlite::Error::FromSqlConversionFailure(0, Type::Text, Box::new(err))
    })
}

pub(crate) fn opt_datetime_col(
    row: &Row<'_>,
    column: &str,
) -> rusqlite::Result<Option<DateTime<Utc>>> {
    let raw: Option<String> = row.get(column)?;
    raw.map(|value| {
        from_db_datetime(&value).map_err(|err| {
            rusqlite::Error::FromSqlConversionFailure(0, Type::Text, Box::new(err))
        })
    })
    .transpose()
}

/// Wrap an enum-parse failure so it surfaces as a column conversion error.
pub(crate) fn column_parse_error<E>(err: E) -> rusqlite::Error
where
    E: std::error::Error + Send + Sync + 'static,
{
    rusqlite::Error::FromSqlConversionFailure(0, Type::Text, Box::new(err))
}
