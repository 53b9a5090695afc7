// SPDX-License-Identifier: Apache-2.0

use agrimix_store::StoreError;
use serde_json::json;

use crate::{ApiError, ApiErrorCode};

/// Translate a storage failure into the wire envelope. Validation and
/// not-found keep their structure; anything that points at the database
/// itself degrades to an opaque internal error.
#[must_use]
pub fn api_error_from_store(err: &StoreError) -> ApiError {
    match err {
        StoreError::NotFound { entity, id } => ApiError::not_found(entity, *id),
        StoreError::DuplicateName { entity, name } => ApiError::new(
            ApiErrorCode::Duplicate,
            format!("a {entity} named `{name}` already exists"),
            json!({"entity": entity, "name": name}),
        ),
        StoreError::DuplicatePackage { size, unit } => ApiError::new(
            ApiErrorCode::Duplicate,
            format!("a {size} {unit} package already exists"),
            json!({"size": size, "unit": unit}),
        ),
        StoreError::InvalidTransition { from, to } => ApiError::new(
            ApiErrorCode::Conflict,
            format!(
                "order status cannot move from {} to {}",
                from.as_str(),
                to.as_str()
            ),
            json!({"from": from.as_str(), "to": to.as_str()}),
        ),
        StoreError::Validation(validation) => ApiError::validation(validation.to_string()),
        StoreError::Engine(engine) => ApiError::internal(engine.to_string()),
        StoreError::Sqlite(_) => ApiError::internal("database operation failed"),
        StoreError::Backup(io) => ApiError::new(
            ApiErrorCode::Internal,
            "backup operation failed",
            json!({"reason": io.to_string()}),
        ),
        _ => ApiError::internal("storage failure"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use agrimix_model::ValidationError;

    #[test]
    fn storage_failures_keep_their_kind_on_the_wire() {
        let err = api_error_from_store(&StoreError::NotFound {
            entity: "recipe",
            id: 7,
        });
        assert_eq!(err.code, ApiErrorCode::NotFound);

        let err = api_error_from_store(&StoreError::DuplicateName {
            entity: "customer",
            name: "Acme".to_string(),
        });
        assert_eq!(err.code, ApiErrorCode::Duplicate);

        let err = api_error_from_store(&StoreError::Validation(ValidationError::Negative(
            "price",
        )));
        assert_eq!(err.code, ApiErrorCode::ValidationFailed);
    }
}
