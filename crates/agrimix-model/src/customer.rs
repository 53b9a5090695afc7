// SPDX-License-Identifier: Apache-2.0

use agrimix_core::Lifecycle;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{CustomerId, ValidationError};

/// Account classification. `Toller` is a contract manufacturer producing on
/// our behalf; `Internal` marks the company's own house accounts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[non_exhaustive]
pub enum CustomerKind {
    Buyer,
    Supplier,
    Toller,
    Internal,
    Other,
}

impl CustomerKind {
    pub const ALL: [Self; 5] = [
        Self::Buyer,
        Self::Supplier,
        Self::Toller,
        Self::Internal,
        Self::Other,
    ];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Buyer => "buyer",
            Self::Supplier => "supplier",
            Self::Toller => "toller",
            Self::Internal => "internal",
            Self::Other => "other",
        }
    }

    pub fn parse(input: &str) -> Result<Self, ValidationError> {
        match input {
            "buyer" => Ok(Self::Buyer),
            "supplier" => Ok(Self::Supplier),
            "toller" => Ok(Self::Toller),
            "internal" => Ok(Self::Internal),
            "other" => Ok(Self::Other),
            _ => Err(ValidationError::InvalidValue {
                field: "customer kind",
                value: input.to_string(),
            }),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Customer {
    pub id: CustomerId,
    pub name: String,
    pub kind: CustomerKind,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub balance: f64,
    pub created_at: DateTime<Utc>,
    pub lifecycle: Lifecycle,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_round_trips_through_wire_spelling() {
        for kind in CustomerKind::ALL {
            assert_eq!(CustomerKind::parse(kind.as_str()).expect("parse"), kind);
        }
        assert!(CustomerKind::parse("Buyer").is_err());
        assert!(CustomerKind::parse("").is_err());
    }
}
