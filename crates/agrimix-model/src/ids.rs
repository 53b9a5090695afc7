// SPDX-License-Identifier: Apache-2.0

use std::fmt;

use serde::{Deserialize, Serialize};

macro_rules! row_id {
    ($(#[$doc:meta])* $name:ident) => {
        $(#[$doc])*
        #[derive(
            Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
        )]
        #[serde(transparent)]
        pub struct $name(i64);

        impl $name {
            #[must_use]
            pub const fn new(value: i64) -> Self {
                Self(value)
            }

            #[must_use]
            pub const fn as_i64(self) -> i64 {
                self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<i64> for $name {
            fn from(value: i64) -> Self {
                Self(value)
            }
        }

        impl From<$name> for i64 {
            fn from(value: $name) -> Self {
                value.0
            }
        }
    };
}

row_id!(
    /// Rowid of a `customers` row.
    CustomerId
);
row_id!(
    /// Rowid of a `stock` row (a raw material).
    StockItemId
);
row_id!(
    /// Rowid of a `packages` row.
    PackageId
);
row_id!(
    /// Rowid of a `recipes` row.
    RecipeId
);
row_id!(
    /// Rowid of a `recipe_ingredients` row.
    IngredientId
);
row_id!(
    /// Rowid of an `orders` row.
    OrderId
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_serialize_as_bare_integers() {
        let id = RecipeId::new(42);
        assert_eq!(serde_json::to_string(&id).expect("serialize id"), "42");
        let back: RecipeId = serde_json::from_str("42").expect("deserialize id");
        assert_eq!(back, id);
    }
}
