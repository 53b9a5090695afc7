// SPDX-License-Identifier: Apache-2.0

use std::fmt;

use agrimix_engine::EngineError;
use agrimix_model::{OrderStatus, ValidationError};

pub type Result<T> = std::result::Result<T, StoreError>;

#[derive(Debug)]
#[non_exhaustive]
pub enum StoreError {
    /// The id does not resolve to a live row of the named entity.
    NotFound { entity: &'static str, id: i64 },
    /// Another live row already carries this name (case-insensitive).
    DuplicateName { entity: &'static str, name: String },
    /// A live package with this (size, unit) pair already exists.
    DuplicatePackage { size: f64, unit: &'static str },
    /// The requested order-status change is not forward-only.
    InvalidTransition {
        from: OrderStatus,
        to: OrderStatus,
    },
    Validation(ValidationError),
    Engine(EngineError),
    Sqlite(rusqlite::Error),
    Backup(std::io::Error),
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotFound { entity, id } => write!(f, "{entity} {id} not found"),
            Self::DuplicateName { entity, name } => {
                write!(f, "a {entity} named `{name}` already exists")
            }
            Self::DuplicatePackage { size, unit } => {
                write!(f, "a {size} {unit} package already exists")
            }
            Self::InvalidTransition { from, to } => write!(
                f,
                "order status cannot move from {} to {}",
                from.as_str(),
                to.as_str()
            ),
            Self::Validation(err) => write!(f, "{err}"),
            Self::Engine(err) => write!(f, "{err}"),
            Self::Sqlite(err) => write!(f, "database error: {err}"),
            Self::Backup(err) => write!(f, "backup io error: {err}"),
        }
    }
}

impl std::error::Error for StoreError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Engine(err) => Some(err),
            Self::Sqlite(err) => Some(err),
            Self::Backup(err) => Some(err),
            _ => None,
        }
    }
}

impl From<ValidationError> for StoreError {
    fn from(value: ValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<EngineError> for StoreError {
    fn from(value: EngineError) -> Self {
        Self::Engine(value)
    }
}

impl From<rusqlite::Error> for StoreError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Sqlite(value)
    }
}

impl From<std::io::Error> for StoreError {
    fn from(value: std::io::Error) -> Self {
        Self::Backup(value)
    }
}
