//! Error types for schema construction.
//!
//! Every error in this module is raised while a schema is being built and is
//! fatal: a malformed schema is never handed to the validator.

use crate::ColumnType;
use thiserror::Error;

/// Result type for schema construction.
pub type Result<T> = std::result::Result<T, SchemaError>;

/// Errors raised when a column specification or schema is malformed.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SchemaError {
    /// Column declared without a name
    #[error("Column name cannot be empty")]
    EmptyColumnName,

    /// The same column name was declared twice
    #[error("Duplicate column name: {0}")]
    DuplicateColumn(String),

    /// Constraint attached to a type it does not apply to
    #[error("Constraint '{constraint}' is not applicable to {column_type} column '{column}'")]
    InapplicableConstraint {
        /// Column name
        column: String,
        /// Constraint name (e.g. "min_items")
        constraint: &'static str,
        /// Declared type of the column
        column_type: ColumnType,
    },

    /// Bound of the wrong kind for the column type
    #[error("Bound '{bound}' on {column_type} column '{column}' must be {expected}")]
    IncompatibleBound {
        /// Column name
        column: String,
        /// Which bound ("lower" or "upper")
        bound: &'static str,
        /// Declared type of the column
        column_type: ColumnType,
        /// Human-readable description of accepted bounds
        expected: &'static str,
    },

    /// NaN or infinite float used as a bound
    #[error("Bound '{bound}' on column '{column}' must be finite")]
    NonFiniteBound {
        /// Column name
        column: String,
        /// Which bound ("lower" or "upper")
        bound: &'static str,
    },

    /// Lower end of a range is greater than the upper end
    #[error("Invalid {range} range for column '{column}': {lower} > {upper}")]
    InvertedRange {
        /// Column name
        column: String,
        /// Range name ("bounds", "items" or "length")
        range: &'static str,
        /// Rendered lower end
        lower: String,
        /// Rendered upper end
        upper: String,
    },

    /// A string maps to both `true` and `false`
    #[error("Boolean column '{column}' maps '{value}' to both true and false")]
    AmbiguousBoolString {
        /// Column name
        column: String,
        /// Offending string
        value: String,
    },

    /// A stock check could not be constructed
    #[error("Invalid check '{check}': {message}")]
    InvalidCheck {
        /// Check name
        check: String,
        /// Failure details
        message: String,
    },
}

impl SchemaError {
    /// Creates a new inapplicable-constraint error.
    pub fn inapplicable(
        column: impl Into<String>,
        constraint: &'static str,
        column_type: ColumnType,
    ) -> Self {
        Self::InapplicableConstraint {
            column: column.into(),
            constraint,
            column_type,
        }
    }

    /// Creates a new inverted-range error.
    pub fn inverted(
        column: impl Into<String>,
        range: &'static str,
        lower: impl ToString,
        upper: impl ToString,
    ) -> Self {
        Self::InvertedRange {
            column: column.into(),
            range,
            lower: lower.to_string(),
            upper: upper.to_string(),
        }
    }
}
