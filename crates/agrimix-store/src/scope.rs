// SPDX-License-Identifier: Apache-2.0

/// Soft-delete intent of a read. Callers must pick one; there is no
/// implicit default, so "forgot to filter deleted rows" cannot happen
/// silently.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scope {
    ActiveOnly,
    IncludeDeleted,
}

impl Scope {
    /// WHERE fragment for the given table alias, always safe to AND onto an
    /// existing clause.
    #[must_use]
    pub fn predicate(self, alias: &str) -> String {
        match self {
            Self::ActiveOnly => format!("{alias}.deleted_at IS NULL"),
            Self::IncludeDeleted => "1=1".to_string(),
        }
    }
}
