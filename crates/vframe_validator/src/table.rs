//! Table representation for validation.
//!
//! This module provides [`Table`], a column-oriented set of raw values
//! supplied to (and produced by) the validator.

use crate::{Result, ValidationError};
use indexmap::IndexMap;
use serde::Serialize;
use vframe_core::Value;

/// An ordered mapping from column name to an equal-length sequence of values.
///
/// # Example
///
/// ```rust
/// use vframe_validator::Table;
/// use vframe_core::Value;
///
/// let table = Table::new()
///     .with_column("id", vec![Value::Int(1), Value::Int(2)])?
///     .with_column("name", vec![Value::from("a"), Value::Null])?;
///
/// assert_eq!(table.row_count(), 2);
/// assert_eq!(table.column_names().collect::<Vec<_>>(), vec!["id", "name"]);
/// # Ok::<(), vframe_validator::ValidationError>(())
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Table {
    columns: IndexMap<String, Vec<Value>>,
}

impl Table {
    /// Creates an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a column and returns the table.
    pub fn with_column(mut self, name: impl Into<String>, values: Vec<Value>) -> Result<Self> {
        self.push_column(name, values)?;
        Ok(self)
    }

    /// Appends a column.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError::DuplicateColumn` if the name is taken and
    /// `ValidationError::RaggedColumn` if the length differs from the
    /// existing columns.
    pub fn push_column(&mut self, name: impl Into<String>, values: Vec<Value>) -> Result<()> {
        let name = name.into();
        if self.columns.contains_key(&name) {
            return Err(ValidationError::DuplicateColumn(name));
        }
        if !self.columns.is_empty() && values.len() != self.row_count() {
            return Err(ValidationError::ragged(name, self.row_count(), values.len()));
        }
        self.columns.insert(name, values);
        Ok(())
    }

    /// Gets a column's values by name.
    pub fn column(&self, name: &str) -> Option<&[Value]> {
        self.columns.get(name).map(Vec::as_slice)
    }

    /// Column names, in table order.
    pub fn column_names(&self) -> impl Iterator<Item = &str> {
        self.columns.keys().map(String::as_str)
    }

    /// Returns true if the table has a column with this name.
    pub fn contains(&self, name: &str) -> bool {
        self.columns.contains_key(name)
    }

    /// Number of rows (0 for a table without columns).
    pub fn row_count(&self) -> usize {
        self.columns.values().next().map_or(0, Vec::len)
    }

    /// Number of columns.
    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    /// Returns true if the table has no columns.
    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// Iterates over `(name, values)` pairs in table order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[Value])> {
        self.columns
            .iter()
            .map(|(name, values)| (name.as_str(), values.as_slice()))
    }

    /// Inserts a column without checks. Used by the validator, which only
    /// ever writes columns of the input's row count.
    pub(crate) fn insert_unchecked(&mut self, name: String, values: Vec<Value>) {
        self.columns.insert(name, values);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_empty_table() {
        let table = Table::new();
        assert!(table.is_empty());
        assert_eq!(table.row_count(), 0);
        assert_eq!(table.column_count(), 0);
        assert!(table.column("x").is_none());
    }

    #[test]
    fn test_duplicate_column_rejected() {
        let err = Table::new()
            .with_column("a", vec![Value::Int(1)])
            .unwrap()
            .with_column("a", vec![Value::Int(2)])
            .unwrap_err();
        assert_eq!(err, ValidationError::DuplicateColumn("a".to_string()));
    }

    #[test]
    fn test_ragged_column_rejected() {
        let mut table = Table::new();
        table
            .push_column("a", vec![Value::Int(1), Value::Int(2)])
            .unwrap();
        let err = table.push_column("b", vec![Value::Int(1)]).unwrap_err();
        assert_eq!(err, ValidationError::ragged("b", 2, 1));
        assert_eq!(table.column_count(), 1);
    }

    #[test]
    fn test_iter_preserves_order() {
        let table = Table::new()
            .with_column("z", vec![Value::Null])
            .unwrap()
            .with_column("a", vec![Value::Bool(true)])
            .unwrap();
        let names: Vec<&str> = table.iter().map(|(name, _)| name).collect();
        assert_eq!(names, vec!["z", "a"]);
        assert!(table.contains("a"));
    }

    #[test]
    fn test_serializes_as_column_object() {
        let table = Table::new()
            .with_column("n", vec![Value::Int(1), Value::Float(f64::NAN)])
            .unwrap();
        let json = serde_json::to_string(&table).unwrap();
        assert_eq!(json, r#"{"n":[1,null]}"#);
    }
}
