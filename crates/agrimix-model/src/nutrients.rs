// SPDX-License-Identifier: Apache-2.0

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

macro_rules! nutrient_set {
    ($($field:ident => $column:literal),+ $(,)?) => {
        /// Content attributes a raw material may declare. Values are
        /// percentages or measures as entered; `None` means the attribute
        /// was never analysed for this material, which is different from a
        /// measured zero.
        #[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
        #[serde(default)]
        pub struct NutrientValues {
            $(
                #[serde(rename = $column)]
                pub $field: Option<f64>,
            )+
        }

        /// Column spellings of every nutrient attribute, in declaration
        /// order. Aggregation and the storage layer iterate this list so the
        /// set has a single home.
        pub const NUTRIENT_FIELDS: [&str; 26] = [$($column,)+];

        impl NutrientValues {
            #[must_use]
            pub fn get(&self, field: &str) -> Option<f64> {
                match field {
                    $($column => self.$field,)+
                    _ => None,
                }
            }

            /// Returns false when `field` is not part of the set.
            pub fn set_field(&mut self, field: &str, value: Option<f64>) -> bool {
                match field {
                    $($column => {
                        self.$field = value;
                        true
                    })+
                    _ => false,
                }
            }
        }
    };
}

nutrient_set! {
    n => "n_content",
    p => "p_content",
    k => "k_content",
    mg => "mg_content",
    ca => "ca_content",
    s => "s_content",
    fe => "fe_content",
    zn => "zn_content",
    b => "b_content",
    mn => "mn_content",
    cu => "cu_content",
    mo => "mo_content",
    na => "na_content",
    si => "si_content",
    h => "h_content",
    c => "c_content",
    o => "o_content",
    cl => "cl_content",
    al => "al_content",
    organic => "organic_content",
    alginic_acid => "alginic_acid_content",
    mgo => "mgo_content",
    protein => "protein_content",
    moisture => "moisture_content",
    ash => "ash_content",
    ph => "ph_content",
}

/// Quantity-weighted nutrient aggregate of a recipe, keyed by the column
/// spellings in [`NUTRIENT_FIELDS`]. Every field is always present; recipes
/// with no measurable content report zeros.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct NutrientProfile {
    values: BTreeMap<&'static str, f64>,
}

impl NutrientProfile {
    #[must_use]
    pub fn zeroed() -> Self {
        Self {
            values: NUTRIENT_FIELDS.iter().map(|field| (*field, 0.0)).collect(),
        }
    }

    /// `field` must come from [`NUTRIENT_FIELDS`]; the aggregator only
    /// writes fields it iterated from that list.
    pub fn set(&mut self, field: &'static str, value: f64) {
        debug_assert!(NUTRIENT_FIELDS.contains(&field));
        self.values.insert(field, value);
    }

    #[must_use]
    pub fn value(&self, field: &str) -> f64 {
        self.values.get(field).copied().unwrap_or(0.0)
    }

    #[must_use]
    pub fn iter(&self) -> impl Iterator<Item = (&'static str, f64)> + '_ {
        self.values.iter().map(|(field, value)| (*field, *value))
    }
}

impl Default for NutrientProfile {
    fn default() -> Self {
        Self::zeroed()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn field_list_and_accessor_agree() {
        let values = NutrientValues {
            n: Some(21.0),
            ph: Some(6.5),
            ..NutrientValues::default()
        };
        assert_eq!(values.get("n_content"), Some(21.0));
        assert_eq!(values.get("ph_content"), Some(6.5));
        assert_eq!(values.get("k_content"), None);
        assert_eq!(values.get("not_a_field"), None);
        assert_eq!(NUTRIENT_FIELDS.len(), 26);
    }

    #[test]
    fn zeroed_profile_covers_every_field() {
        let profile = NutrientProfile::zeroed();
        for field in NUTRIENT_FIELDS {
            assert_eq!(profile.value(field), 0.0, "missing field {field}");
        }
    }
}
