use chrono::{DateTime, NaiveDateTime, Utc};

/// Single timestamp spelling shared by every table: UTC, second precision,
/// the same shape SQLite's `datetime('now')` emits.
pub const DB_DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

#[must_use]
pub fn to_db_datetime(value: DateTime<Utc>) -> String {
    value.format(DB_DATETIME_FORMAT).to_string()
}

pub fn from_db_datetime(raw: &str) -> Result<DateTime<Utc>, chrono::ParseError> {
    NaiveDateTime::parse_from_str(raw, DB_DATETIME_FORMAT).map(|naive| naive.and_utc())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn round_trips_db_spelling() {
        let at = Utc.with_ymd_and_hms(2025, 1, 15, 9, 5, 59).unwrap();
        let raw = to_db_datetime(at);
        assert_eq!(raw, "2025-01-15 09:05:59");
        assert_eq!(from_db_datetime(&raw).expect("parse"), at);
    }
}
