// SPDX-License-Identifier: Apache-2.0

use std::fmt;

use agrimix_model::RecipeId;

#[derive(Debug)]
#[non_exhaustive]
pub enum EngineError {
    RecipeNotFound(RecipeId),
    Storage(rusqlite::Error),
}

impl fmt::Display for EngineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::RecipeNotFound(id) => write!(f, "recipe {id} not found"),
            Self::Storage(err) => write!(f, "storage error: {err}"),
        }
    }
}

impl std::error::Error for EngineError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::RecipeNotFound(_) => None,
            Self::Storage(err) => Some(err),
        }
    }
}

impl From<rusqlite::Error> for EngineError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Storage(value)
    }
}
