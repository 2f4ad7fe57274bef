//! Table schemas.
//!
//! A [`Schema`] is the ordered set of column declarations a table is
//! validated against, together with the policy for table columns the schema
//! does not declare.

use crate::ColumnSpec;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;

/// What happens to table columns that have no schema entry.
///
/// There is no default: every schema states its policy explicitly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExtraColumnPolicy {
    /// Copy the column into the output unvalidated
    PassThrough,
    /// Leave the column out of the output
    Drop,
}

impl fmt::Display for ExtraColumnPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExtraColumnPolicy::PassThrough => f.write_str("pass_through"),
            ExtraColumnPolicy::Drop => f.write_str("drop"),
        }
    }
}

/// Ordered mapping from column name to [`ColumnSpec`].
///
/// Built with [`SchemaBuilder`](crate::SchemaBuilder); immutable afterwards.
#[derive(Debug, Clone)]
pub struct Schema {
    pub(crate) columns: IndexMap<String, ColumnSpec>,
    pub(crate) extra_columns: ExtraColumnPolicy,
}

impl Schema {
    /// Declared columns, in declaration order.
    pub fn columns(&self) -> impl Iterator<Item = &ColumnSpec> {
        self.columns.values()
    }

    /// Declared column names, in declaration order.
    pub fn column_names(&self) -> impl Iterator<Item = &str> {
        self.columns.keys().map(String::as_str)
    }

    /// Looks up a column declaration by name.
    pub fn column(&self, name: &str) -> Option<&ColumnSpec> {
        self.columns.get(name)
    }

    /// Returns true if `name` is declared.
    pub fn contains(&self, name: &str) -> bool {
        self.columns.contains_key(name)
    }

    /// Number of declared columns.
    pub fn len(&self) -> usize {
        self.columns.len()
    }

    /// Returns true if no columns are declared.
    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// Policy for undeclared table columns.
    pub fn extra_columns(&self) -> ExtraColumnPolicy {
        self.extra_columns
    }

    /// Returns a copy of this schema with a different extra-column policy.
    pub fn with_extra_columns(&self, policy: ExtraColumnPolicy) -> Schema {
        Schema {
            columns: self.columns.clone(),
            extra_columns: policy,
        }
    }
}
