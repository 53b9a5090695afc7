use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Soft-delete state of a row. Rows are never physically removed; deletion
/// records the timestamp and excludes the row from active reads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
#[non_exhaustive]
pub enum Lifecycle {
    Active,
    Deleted { at: DateTime<Utc> },
}

impl Lifecycle {
    #[must_use]
    pub fn from_deleted_at(deleted_at: Option<DateTime<Utc>>) -> Self {
        match deleted_at {
            None => Self::Active,
            Some(at) => Self::Deleted { at },
        }
    }

    #[must_use]
    pub const fn is_active(self) -> bool {
        matches!(self, Self::Active)
    }

    #[must_use]
    pub const fn deleted_at(self) -> Option<DateTime<Utc>> {
        match self {
            Self::Active => None,
            Self::Deleted { at } => Some(at),
        }
    }
}

impl Default for Lifecycle {
    fn default() -> Self {
        Self::Active
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn round_trips_through_deleted_at_column() {
        assert_eq!(Lifecycle::from_deleted_at(None), Lifecycle::Active);
        assert!(Lifecycle::from_deleted_at(None).is_active());

        let at = Utc.with_ymd_and_hms(2024, 6, 1, 8, 30, 0).unwrap();
        let deleted = Lifecycle::from_deleted_at(Some(at));
        assert!(!deleted.is_active());
        assert_eq!(deleted.deleted_at(), Some(at));
    }
}
