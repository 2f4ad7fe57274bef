//! Error types for validation operations.
//!
//! Only fatal conditions are errors. Cell-level failures (type mismatches and
//! constraint violations) are recorded in the
//! [`ValidationResult`](crate::ValidationResult) instead.

use thiserror::Error;

/// Result type for validation operations.
pub type Result<T> = std::result::Result<T, ValidationError>;

/// Fatal errors raised while building a table or validating it.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Declared columns are absent from the table
    #[error("Missing required column(s): {}", .0.join(", "))]
    MissingColumn(Vec<String>),

    /// A custom check returned output of the wrong shape
    #[error(
        "Check '{check}' on column '{column}' returned {actual} {part} entries, expected {expected}"
    )]
    HookContract {
        /// Column the check is registered on
        column: String,
        /// Check name
        check: String,
        /// Which part of the outcome was malformed ("mask" or "reason")
        part: &'static str,
        /// Expected length
        expected: usize,
        /// Returned length
        actual: usize,
    },

    /// A column name was added to a table twice
    #[error("Duplicate column in table: {0}")]
    DuplicateColumn(String),

    /// A column's length differs from the table's row count
    #[error("Column '{column}' has {actual} values, expected {expected}")]
    RaggedColumn {
        /// Column name
        column: String,
        /// Row count of the table
        expected: usize,
        /// Length of the offending column
        actual: usize,
    },
}

impl ValidationError {
    /// Creates a new missing-column error.
    pub fn missing_columns<I, S>(columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::MissingColumn(columns.into_iter().map(Into::into).collect())
    }

    /// Creates a new hook contract error.
    pub fn hook_contract(
        column: impl Into<String>,
        check: impl Into<String>,
        part: &'static str,
        expected: usize,
        actual: usize,
    ) -> Self {
        Self::HookContract {
            column: column.into(),
            check: check.into(),
            part,
            expected,
            actual,
        }
    }

    /// Creates a new ragged-column error.
    pub fn ragged(column: impl Into<String>, expected: usize, actual: usize) -> Self {
        Self::RaggedColumn {
            column: column.into(),
            expected,
            actual,
        }
    }
}
