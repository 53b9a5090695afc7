// SPDX-License-Identifier: Apache-2.0

use std::collections::BTreeMap;

use agrimix_model::CustomerKind;
use agrimix_store::CustomerFilter;

use crate::ApiError;

/// Parse the customer-list query string: optional case-insensitive `search`
/// substring and optional `kind`. An unknown kind is rejected rather than
/// silently matching nothing.
pub fn parse_customer_list_params(
    query: &BTreeMap<String, String>,
) -> Result<CustomerFilter, ApiError> {
    let search = query
        .get("search")
        .map(String::as_str)
        .filter(|raw| !raw.trim().is_empty())
        .map(str::to_string);

    let kind = match query.get("kind") {
        None => None,
        Some(raw) if raw.trim().is_empty() || raw == "all" => None,
        Some(raw) => Some(
            CustomerKind::parse(raw).map_err(|_| ApiError::invalid_param("kind", raw))?,
        ),
    };

    Ok(CustomerFilter { search, kind })
}
