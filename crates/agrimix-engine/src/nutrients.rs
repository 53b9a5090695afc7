// SPDX-License-Identifier: Apache-2.0

use agrimix_core::round2;
use agrimix_model::{NutrientProfile, NutrientValues, RecipeId, NUTRIENT_FIELDS};
use rusqlite::{params, Connection};

use crate::row_decode::nutrients_from_row;
use crate::EngineError;

/// One active ingredient as the aggregator sees it.
#[derive(Debug, Clone, PartialEq)]
pub struct NutrientLine {
    pub quantity: f64,
    pub values: NutrientValues,
}

/// Quantity-weighted nutrient aggregate across active ingredients.
///
/// The denominator is the total quantity of every active line; a field a
/// material never declared contributes nothing to that field's numerator.
/// Zero total quantity yields the all-zero profile rather than dividing.
/// Every value is rounded to two decimals.
#[must_use]
pub fn nutrient_profile(lines: &[NutrientLine]) -> NutrientProfile {
    let mut profile = NutrientProfile::zeroed();

    let total_quantity: f64 = lines.iter().map(|line| line.quantity).sum();
    if total_quantity <= 0.0 {
        return profile;
    }

    for field in NUTRIENT_FIELDS {
        let weighted: f64 = lines
            .iter()
            .filter_map(|line| {
                line.values
                    .get(field)
                    .map(|value| value * line.quantity)
            })
            .sum();
        profile.set(field, round2(weighted / total_quantity));
    }

    profile
}

/// Load a recipe's active ingredients and aggregate their nutrient content.
/// Soft-deleted materials are excluded here even though costing still sees
/// them; this computation never mutates stored state.
pub fn recipe_nutrient_profile(
    conn: &Connection,
    recipe_id: RecipeId,
) -> Result<NutrientProfile, EngineError> {
    let mut stmt = conn.prepare_cached(
        "SELECT ri.quantity AS line_quantity, s.*
         FROM recipe_ingredients ri
         JOIN stock s ON ri.stock_id = s.id
         WHERE ri.recipe_id = ? AND s.deleted_at IS NULL",
    )?;
    let lines = stmt
        .query_map(params![recipe_id.as_i64()], |row| {
            Ok(NutrientLine {
                quantity: row.get("line_quantity")?,
                values: nutrients_from_row(row)?,
            })
        })?
        .collect::<Result<Vec<_>, _>>()?;

    Ok(nutrient_profile(&lines))
}
