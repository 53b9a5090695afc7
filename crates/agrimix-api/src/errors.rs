// SPDX-License-Identifier: Apache-2.0

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[non_exhaustive]
pub enum ApiErrorCode {
    ValidationFailed,
    InvalidParameter,
    NotFound,
    Duplicate,
    Conflict,
    Internal,
}

impl ApiErrorCode {
    /// HTTP status each code maps to. Kept here so every handler agrees.
    #[must_use]
    pub const fn status(self) -> u16 {
        match self {
            Self::ValidationFailed | Self::InvalidParameter => 400,
            Self::NotFound => 404,
            Self::Duplicate | Self::Conflict => 409,
            Self::Internal => 500,
        }
    }
}

/// The one failure shape every endpoint returns.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ApiError {
    pub code: ApiErrorCode,
    pub message: String,
    pub details: Value,
}

impl ApiError {
    #[must_use]
    pub fn new(code: ApiErrorCode, message: impl Into<String>, details: Value) -> Self {
        Self {
            code,
            message: message.into(),
            details,
        }
    }

    #[must_use]
    pub fn invalid_param(name: &str, value: &str) -> Self {
        Self::new(
            ApiErrorCode::InvalidParameter,
            format!("invalid parameter: {name}"),
            json!({"parameter": name, "value": value}),
        )
    }

    #[must_use]
    pub fn validation(message: impl Into<String>) -> Self {
        Self::new(ApiErrorCode::ValidationFailed, message, json!({}))
    }

    #[must_use]
    pub fn not_found(entity: &str, id: i64) -> Self {
        Self::new(
            ApiErrorCode::NotFound,
            format!("{entity} not found"),
            json!({"entity": entity, "id": id}),
        )
    }

    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ApiErrorCode::Internal, message, json!({}))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_map_to_stable_statuses() {
        assert_eq!(ApiErrorCode::ValidationFailed.status(), 400);
        assert_eq!(ApiErrorCode::InvalidParameter.status(), 400);
        assert_eq!(ApiErrorCode::NotFound.status(), 404);
        assert_eq!(ApiErrorCode::Duplicate.status(), 409);
        assert_eq!(ApiErrorCode::Conflict.status(), 409);
        assert_eq!(ApiErrorCode::Internal.status(), 500);
    }

    #[test]
    fn envelope_serializes_code_message_details() {
        let err = ApiError::invalid_param("kind", "vendor");
        let value = serde_json::to_value(&err).expect("serialize");
        assert_eq!(value["code"], "InvalidParameter");
        assert_eq!(value["details"]["parameter"], "kind");
    }
}
