// SPDX-License-Identifier: Apache-2.0

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Singleton pricing settings: the USD exchange rate quotes are converted
/// with and the three margin tiers applied to price lists.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    pub fx_rate_usd: f64,
    pub margin_list_a: f64,
    pub margin_list_b: f64,
    pub margin_list_c: f64,
    pub updated_at: DateTime<Utc>,
}

impl Settings {
    pub const DEFAULT_FX_RATE_USD: f64 = 36.0;
    pub const DEFAULT_MARGIN_LIST_A: f64 = 20.0;
    pub const DEFAULT_MARGIN_LIST_B: f64 = 35.0;
    pub const DEFAULT_MARGIN_LIST_C: f64 = 50.0;
}
