//! Builder pattern for creating schemas.
//!
//! This module provides ergonomic builders for declaring columns and
//! assembling them into a [`Schema`]. Every malformed declaration is rejected
//! with a [`SchemaError`] when `build()` is called.

use crate::{
    Bound, BoolStrings, ColumnCheck, ColumnSpec, ColumnType, ExtraColumnPolicy, HookScope, Result,
    Schema, SchemaError,
};
use indexmap::IndexMap;
use std::sync::Arc;

/// Builder for creating a [`Schema`].
///
/// # Example
///
/// ```rust
/// use vframe_core::{ColumnBuilder, ColumnType, ExtraColumnPolicy, SchemaBuilder};
///
/// let schema = SchemaBuilder::new(ExtraColumnPolicy::PassThrough)
///     .column(ColumnBuilder::new("age", ColumnType::Integer).lower(0).upper(150).build()?)
///     .column(ColumnBuilder::new("tags", ColumnType::List).max_items(3).build()?)
///     .build()?;
///
/// assert_eq!(schema.len(), 2);
/// # Ok::<(), vframe_core::SchemaError>(())
/// ```
#[derive(Debug)]
pub struct SchemaBuilder {
    columns: Vec<ColumnSpec>,
    extra_columns: ExtraColumnPolicy,
}

impl SchemaBuilder {
    /// Creates a new schema builder.
    ///
    /// # Arguments
    ///
    /// * `extra_columns` - What to do with table columns the schema does not declare
    pub fn new(extra_columns: ExtraColumnPolicy) -> Self {
        Self {
            columns: Vec::new(),
            extra_columns,
        }
    }

    /// Adds a column declaration.
    pub fn column(mut self, column: ColumnSpec) -> Self {
        self.columns.push(column);
        self
    }

    /// Adds multiple column declarations.
    pub fn columns(mut self, columns: impl IntoIterator<Item = ColumnSpec>) -> Self {
        self.columns.extend(columns);
        self
    }

    /// Builds the schema.
    ///
    /// # Errors
    ///
    /// Returns `SchemaError::DuplicateColumn` if a name is declared twice.
    pub fn build(self) -> Result<Schema> {
        let mut columns = IndexMap::with_capacity(self.columns.len());
        for column in self.columns {
            if columns.contains_key(&column.name) {
                return Err(SchemaError::DuplicateColumn(column.name));
            }
            columns.insert(column.name.clone(), column);
        }

        Ok(Schema {
            columns,
            extra_columns: self.extra_columns,
        })
    }
}

/// Builder for creating a [`ColumnSpec`].
///
/// Columns are nullable unless stated otherwise.
///
/// # Example
///
/// ```rust
/// use vframe_core::{ColumnBuilder, ColumnType};
///
/// let column = ColumnBuilder::new("code", ColumnType::String)
///     .min_length(1)
///     .max_length(5)
///     .nullable(false)
///     .build()
///     .unwrap();
///
/// assert_eq!(column.to_string(), "String(min_length=1, max_length=5, nullable=false)");
/// ```
pub struct ColumnBuilder {
    name: String,
    column_type: ColumnType,
    nullable: bool,
    lower: Option<Bound>,
    upper: Option<Bound>,
    min_items: Option<usize>,
    max_items: Option<usize>,
    min_length: Option<usize>,
    max_length: Option<usize>,
    bool_strings: Option<BoolStrings>,
    check: Option<Arc<dyn ColumnCheck>>,
    check_scope: HookScope,
    description: Option<String>,
}

impl ColumnBuilder {
    /// Creates a new column builder.
    ///
    /// # Arguments
    ///
    /// * `name` - Column name
    /// * `column_type` - Declared type
    pub fn new(name: impl Into<String>, column_type: ColumnType) -> Self {
        Self {
            name: name.into(),
            column_type,
            nullable: true,
            lower: None,
            upper: None,
            min_items: None,
            max_items: None,
            min_length: None,
            max_length: None,
            bool_strings: None,
            check: None,
            check_scope: HookScope::default(),
            description: None,
        }
    }

    /// Sets whether null-equivalent values pass.
    pub fn nullable(mut self, nullable: bool) -> Self {
        self.nullable = nullable;
        self
    }

    /// Sets the inclusive lower bound (Integer, Float, Datetime).
    pub fn lower(mut self, lower: impl Into<Bound>) -> Self {
        self.lower = Some(lower.into());
        self
    }

    /// Sets the inclusive upper bound (Integer, Float, Datetime).
    pub fn upper(mut self, upper: impl Into<Bound>) -> Self {
        self.upper = Some(upper.into());
        self
    }

    /// Sets the minimum item count (List, Tuple, Set, Dictionary).
    pub fn min_items(mut self, min_items: usize) -> Self {
        self.min_items = Some(min_items);
        self
    }

    /// Sets the maximum item count (List, Tuple, Set, Dictionary).
    pub fn max_items(mut self, max_items: usize) -> Self {
        self.max_items = Some(max_items);
        self
    }

    /// Sets the minimum character count (String).
    pub fn min_length(mut self, min_length: usize) -> Self {
        self.min_length = Some(min_length);
        self
    }

    /// Sets the maximum character count (String).
    pub fn max_length(mut self, max_length: usize) -> Self {
        self.max_length = Some(max_length);
        self
    }

    /// Sets the string-to-boolean mapping (Boolean).
    pub fn bool_strings(mut self, bool_strings: BoolStrings) -> Self {
        self.bool_strings = Some(bool_strings);
        self
    }

    /// Registers a custom check.
    pub fn check(mut self, check: impl ColumnCheck + 'static) -> Self {
        self.check = Some(Arc::new(check));
        self
    }

    /// Registers an already shared custom check.
    pub fn shared_check(mut self, check: Arc<dyn ColumnCheck>) -> Self {
        self.check = Some(check);
        self
    }

    /// Sets which cells the custom check sees.
    pub fn check_scope(mut self, scope: HookScope) -> Self {
        self.check_scope = scope;
        self
    }

    /// Sets the column description.
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Builds the column specification.
    ///
    /// # Errors
    ///
    /// Returns a [`SchemaError`] if a constraint does not apply to the column
    /// type, a bound has the wrong kind or is not finite, a range is
    /// inverted, or the boolean mapping is ambiguous.
    pub fn build(self) -> Result<ColumnSpec> {
        if self.name.trim().is_empty() {
            return Err(SchemaError::EmptyColumnName);
        }

        self.validate_bounds()?;
        self.validate_sizes()?;

        if self.bool_strings.is_some() && self.column_type != ColumnType::Boolean {
            return Err(SchemaError::inapplicable(
                &self.name,
                "bool_strings",
                self.column_type,
            ));
        }
        let bool_strings = self.bool_strings.unwrap_or_default();
        if let Some(value) = bool_strings.ambiguous() {
            return Err(SchemaError::AmbiguousBoolString {
                column: self.name,
                value: value.to_string(),
            });
        }

        Ok(ColumnSpec {
            name: self.name,
            column_type: self.column_type,
            nullable: self.nullable,
            lower: self.lower,
            upper: self.upper,
            min_items: self.min_items,
            max_items: self.max_items,
            min_length: self.min_length,
            max_length: self.max_length,
            bool_strings,
            check: self.check,
            check_scope: self.check_scope,
            description: self.description,
        })
    }

    fn validate_bounds(&self) -> Result<()> {
        for (label, bound) in [("lower", &self.lower), ("upper", &self.upper)] {
            let Some(bound) = bound else { continue };

            if !self.column_type.supports_bounds() {
                return Err(SchemaError::inapplicable(&self.name, label, self.column_type));
            }

            let (compatible, expected) = if self.column_type.is_numeric() {
                (bound.is_numeric(), "an integer or float")
            } else {
                (matches!(bound, Bound::DateTime(_)), "a date/time")
            };
            if !compatible {
                return Err(SchemaError::IncompatibleBound {
                    column: self.name.clone(),
                    bound: label,
                    column_type: self.column_type,
                    expected,
                });
            }

            if !bound.is_finite() {
                return Err(SchemaError::NonFiniteBound {
                    column: self.name.clone(),
                    bound: label,
                });
            }
        }

        if let (Some(lower), Some(upper)) = (&self.lower, &self.upper) {
            if lower.partial_cmp_bound(upper) == Some(std::cmp::Ordering::Greater) {
                return Err(SchemaError::inverted(&self.name, "bounds", lower, upper));
            }
        }

        Ok(())
    }

    fn validate_sizes(&self) -> Result<()> {
        let ranges = [
            ("items", "min_items", self.min_items, "max_items", self.max_items),
            ("length", "min_length", self.min_length, "max_length", self.max_length),
        ];

        for (range, min_label, min, max_label, max) in ranges {
            let applies = match range {
                "items" => self.column_type.is_container(),
                _ => self.column_type == ColumnType::String,
            };
            if !applies {
                if min.is_some() {
                    return Err(SchemaError::inapplicable(&self.name, min_label, self.column_type));
                }
                if max.is_some() {
                    return Err(SchemaError::inapplicable(&self.name, max_label, self.column_type));
                }
            }
            if let (Some(min), Some(max)) = (min, max) {
                if min > max {
                    return Err(SchemaError::inverted(&self.name, range, min, max));
                }
            }
        }

        Ok(())
    }
}

impl std::fmt::Debug for ColumnBuilder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ColumnBuilder")
            .field("name", &self.name)
            .field("column_type", &self.column_type)
            .field("nullable", &self.nullable)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::UniqueCheck;
    use chrono::NaiveDate;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_column_builder_minimal() {
        let column = ColumnBuilder::new("user_id", ColumnType::String).build().unwrap();

        assert_eq!(column.name(), "user_id");
        assert_eq!(column.column_type(), ColumnType::String);
        assert!(column.nullable()); // Default is true
        assert!(column.lower().is_none());
        assert!(column.check().is_none());
        assert_eq!(column.check_scope(), HookScope::PassedCells);
        assert_eq!(column.size_range(), Some((None, None)));
    }

    #[test]
    fn test_column_builder_full() {
        let column = ColumnBuilder::new("age", ColumnType::Integer)
            .lower(-1)
            .upper(6)
            .nullable(false)
            .description("Age in years")
            .check(UniqueCheck)
            .check_scope(HookScope::WholeColumn)
            .build()
            .unwrap();

        assert_eq!(column.lower(), Some(Bound::Int(-1)));
        assert_eq!(column.upper(), Some(Bound::Int(6)));
        assert!(!column.nullable());
        assert_eq!(column.description(), Some("Age in years"));
        assert_eq!(column.check().map(|c| c.name()), Some("unique"));
        assert_eq!(column.check_scope(), HookScope::WholeColumn);
        assert_eq!(
            column.to_string(),
            "Integer(lower=-1, upper=6, nullable=false, check=unique)"
        );
    }

    #[test]
    fn test_empty_name_rejected() {
        let err = ColumnBuilder::new("  ", ColumnType::Object).build().unwrap_err();
        assert_eq!(err, SchemaError::EmptyColumnName);
    }

    #[test]
    fn test_min_items_greater_than_max_items() {
        let err = ColumnBuilder::new("tags", ColumnType::List)
            .min_items(4)
            .max_items(3)
            .build()
            .unwrap_err();
        assert_eq!(err, SchemaError::inverted("tags", "items", 4, 3));
    }

    #[test]
    fn test_min_length_greater_than_max_length() {
        let err = ColumnBuilder::new("code", ColumnType::String)
            .min_length(6)
            .max_length(5)
            .build()
            .unwrap_err();
        assert!(matches!(err, SchemaError::InvertedRange { range: "length", .. }));
    }

    #[test]
    fn test_lower_greater_than_upper() {
        let err = ColumnBuilder::new("score", ColumnType::Float)
            .lower(10.0)
            .upper(1)
            .build()
            .unwrap_err();
        assert!(matches!(err, SchemaError::InvertedRange { range: "bounds", .. }));
    }

    #[test]
    fn test_inapplicable_constraints() {
        let err = ColumnBuilder::new("name", ColumnType::String)
            .min_items(1)
            .build()
            .unwrap_err();
        assert_eq!(
            err,
            SchemaError::inapplicable("name", "min_items", ColumnType::String)
        );

        let err = ColumnBuilder::new("tags", ColumnType::Set)
            .max_length(3)
            .build()
            .unwrap_err();
        assert_eq!(err, SchemaError::inapplicable("tags", "max_length", ColumnType::Set));

        let err = ColumnBuilder::new("flag", ColumnType::Boolean)
            .upper(1)
            .build()
            .unwrap_err();
        assert_eq!(err, SchemaError::inapplicable("flag", "upper", ColumnType::Boolean));

        let err = ColumnBuilder::new("n", ColumnType::Integer)
            .bool_strings(BoolStrings::default())
            .build()
            .unwrap_err();
        assert_eq!(err, SchemaError::inapplicable("n", "bool_strings", ColumnType::Integer));
    }

    #[test]
    fn test_incompatible_bounds() {
        let day = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let err = ColumnBuilder::new("n", ColumnType::Integer)
            .lower(day)
            .build()
            .unwrap_err();
        assert!(matches!(err, SchemaError::IncompatibleBound { bound: "lower", .. }));

        let err = ColumnBuilder::new("at", ColumnType::Datetime)
            .upper(5)
            .build()
            .unwrap_err();
        assert!(matches!(err, SchemaError::IncompatibleBound { bound: "upper", .. }));

        let err = ColumnBuilder::new("x", ColumnType::Float)
            .upper(f64::NAN)
            .build()
            .unwrap_err();
        assert!(matches!(err, SchemaError::NonFiniteBound { .. }));
    }

    #[test]
    fn test_datetime_bounds_accepted() {
        let column = ColumnBuilder::new("at", ColumnType::Datetime)
            .lower(NaiveDate::from_ymd_opt(2024, 1, 1).unwrap())
            .upper(NaiveDate::from_ymd_opt(2024, 12, 31).unwrap())
            .build()
            .unwrap();
        assert!(matches!(column.lower(), Some(Bound::DateTime(_))));
    }

    #[test]
    fn test_ambiguous_bool_strings() {
        let err = ColumnBuilder::new("flag", ColumnType::Boolean)
            .bool_strings(BoolStrings::new(["yes", "on"], ["no", "on"]))
            .build()
            .unwrap_err();
        assert_eq!(
            err,
            SchemaError::AmbiguousBoolString {
                column: "flag".to_string(),
                value: "on".to_string(),
            }
        );
    }

    #[test]
    fn test_schema_builder_preserves_order() {
        let schema = SchemaBuilder::new(ExtraColumnPolicy::Drop)
            .column(ColumnBuilder::new("b", ColumnType::Integer).build().unwrap())
            .columns(vec![
                ColumnBuilder::new("a", ColumnType::Float).build().unwrap(),
                ColumnBuilder::new("c", ColumnType::Object).build().unwrap(),
            ])
            .build()
            .unwrap();

        assert_eq!(schema.column_names().collect::<Vec<_>>(), vec!["b", "a", "c"]);
        assert_eq!(schema.extra_columns(), ExtraColumnPolicy::Drop);
        assert!(schema.contains("a"));
        assert_eq!(
            schema.column("a").map(|c| c.column_type()),
            Some(ColumnType::Float)
        );
    }

    #[test]
    fn test_schema_builder_duplicate_column() {
        let err = SchemaBuilder::new(ExtraColumnPolicy::PassThrough)
            .column(ColumnBuilder::new("id", ColumnType::Integer).build().unwrap())
            .column(ColumnBuilder::new("id", ColumnType::String).build().unwrap())
            .build()
            .unwrap_err();
        assert_eq!(err, SchemaError::DuplicateColumn("id".to_string()));
    }

    #[test]
    fn test_with_extra_columns_returns_new_schema() {
        let schema = SchemaBuilder::new(ExtraColumnPolicy::PassThrough)
            .column(ColumnBuilder::new("id", ColumnType::Integer).build().unwrap())
            .build()
            .unwrap();
        let dropped = schema.with_extra_columns(ExtraColumnPolicy::Drop);

        assert_eq!(schema.extra_columns(), ExtraColumnPolicy::PassThrough);
        assert_eq!(dropped.extra_columns(), ExtraColumnPolicy::Drop);
        assert_eq!(dropped.len(), 1);
    }

    #[test]
    fn test_empty_schema_is_allowed() {
        let schema = SchemaBuilder::new(ExtraColumnPolicy::Drop).build().unwrap();
        assert!(schema.is_empty());
    }
}
