// SPDX-License-Identifier: Apache-2.0

use agrimix_core::Lifecycle;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{PackageId, ValidationError};

/// Fill unit of a packaging option. `L` and `Kg` are the exact spellings
/// stored in the database and sent by clients.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[non_exhaustive]
pub enum PackageUnit {
    #[serde(rename = "L")]
    Litre,
    #[serde(rename = "Kg")]
    Kilogram,
}

impl PackageUnit {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Litre => "L",
            Self::Kilogram => "Kg",
        }
    }

    pub fn parse(input: &str) -> Result<Self, ValidationError> {
        match input {
            "L" => Ok(Self::Litre),
            "Kg" => Ok(Self::Kilogram),
            _ => Err(ValidationError::InvalidValue {
                field: "package unit",
                value: input.to_string(),
            }),
        }
    }
}

/// A packaging option. `(size, unit)` is unique among non-deleted rows;
/// packaging price changes mark referencing recipes stale but never enter a
/// recipe's `total_cost` (packaging is priced at order time).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Package {
    pub id: PackageId,
    pub size: f64,
    pub unit: PackageUnit,
    pub price: f64,
    pub created_at: DateTime<Utc>,
    pub lifecycle: Lifecycle,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unit_parses_only_the_two_wire_spellings() {
        assert_eq!(PackageUnit::parse("L").expect("litre"), PackageUnit::Litre);
        assert_eq!(
            PackageUnit::parse("Kg").expect("kilogram"),
            PackageUnit::Kilogram
        );
        assert!(PackageUnit::parse("kg").is_err());
        assert!(PackageUnit::parse("l").is_err());
        assert!(PackageUnit::parse("").is_err());
    }
}
