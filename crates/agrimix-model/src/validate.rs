// SPDX-License-Identifier: Apache-2.0

use std::fmt::{Display, Formatter};

use crate::NAME_MAX_LEN;

#[derive(Debug, Clone, PartialEq)]
#[non_exhaustive]
pub enum ValidationError {
    Empty(&'static str),
    TooLong(&'static str, usize),
    InvalidValue {
        field: &'static str,
        value: String,
    },
    NotFinite(&'static str),
    Negative(&'static str),
}

impl Display for ValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Empty(field) => write!(f, "{field} must not be empty"),
            Self::TooLong(field, max) => write!(f, "{field} exceeds max length {max}"),
            Self::InvalidValue { field, value } => {
                write!(f, "invalid {field}: `{value}`")
            }
            Self::NotFinite(field) => write!(f, "{field} must be a finite number"),
            Self::Negative(field) => write!(f, "{field} must not be negative"),
        }
    }
}

impl std::error::Error for ValidationError {}

/// Trim and validate a user-supplied display name. Leading/trailing
/// whitespace is dropped rather than rejected; what remains must be
/// non-empty and within the length cap.
pub fn parse_entity_name(
    field: &'static str,
    input: &str,
) -> Result<String, ValidationError> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::Empty(field));
    }
    if trimmed.len() > NAME_MAX_LEN {
        return Err(ValidationError::TooLong(field, NAME_MAX_LEN));
    }
    Ok(trimmed.to_string())
}

/// Unit prices must be finite and non-negative; rejecting bad input is a
/// validation error, never a silent clamp.
pub fn validate_unit_price(field: &'static str, value: f64) -> Result<f64, ValidationError> {
    if !value.is_finite() {
        return Err(ValidationError::NotFinite(field));
    }
    if value < 0.0 {
        return Err(ValidationError::Negative(field));
    }
    Ok(value)
}

/// Quantities follow the same rule as prices.
pub fn validate_quantity(field: &'static str, value: f64) -> Result<f64, ValidationError> {
    if !value.is_finite() {
        return Err(ValidationError::NotFinite(field));
    }
    if value < 0.0 {
        return Err(ValidationError::Negative(field));
    }
    Ok(value)
}
