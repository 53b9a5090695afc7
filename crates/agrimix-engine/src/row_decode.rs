// SPDX-License-Identifier: Apache-2.0

use agrimix_model::{NutrientValues, NUTRIENT_FIELDS};
use rusqlite::Row;

/// Decode the nutrient columns of a `stock` row. The row must carry every
/// column named in [`NUTRIENT_FIELDS`]; select `s.*` or list them all.
pub fn nutrients_from_row(row: &Row<'_>) -> rusqlite::Result<NutrientValues> {
    let mut values = NutrientValues::default();
    for field in NUTRIENT_FIELDS {
        values.set_field(field, row.get::<_, Option<f64>>(field)?);
    }
    Ok(values)
}
