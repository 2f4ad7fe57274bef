//! Validation report types.
//!
//! A [`ValidationResult`] is produced fresh by every validation call. It holds
//! the coerced table, one pass/fail mask per declared column, the itemized
//! cell failures and any advisory warnings.

use crate::Table;
use indexmap::IndexMap;
use serde::{Serialize, Serializer};
use std::collections::BTreeMap;
use std::fmt;
use vframe_core::{ExtraColumnPolicy, Value};

/// Why a cell failed.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ReasonCode {
    /// No coercion rule produced a canonical value
    TypeMismatch,
    /// Null-equivalent value in a non-nullable column
    NullNotAllowed,
    /// Value below the inclusive lower bound
    BelowLower,
    /// Value above the inclusive upper bound
    AboveUpper,
    /// Item or character count below the minimum
    BelowMinSize,
    /// Item or character count above the maximum
    AboveMaxSize,
    /// Reason reported by a custom check
    Custom(String),
}

impl ReasonCode {
    /// Stable text form of the reason.
    pub fn as_str(&self) -> &str {
        match self {
            ReasonCode::TypeMismatch => "type_mismatch",
            ReasonCode::NullNotAllowed => "null_not_allowed",
            ReasonCode::BelowLower => "below_lower",
            ReasonCode::AboveUpper => "above_upper",
            ReasonCode::BelowMinSize => "below_min_size",
            ReasonCode::AboveMaxSize => "above_max_size",
            ReasonCode::Custom(reason) => reason,
        }
    }

    /// Returns true for reasons raised by a custom check.
    pub fn is_custom(&self) -> bool {
        matches!(self, ReasonCode::Custom(_))
    }
}

impl fmt::Display for ReasonCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for ReasonCode {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// One failing cell.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CellFailure {
    /// Column name
    pub column: String,
    /// Zero-based row index
    pub row: usize,
    /// Why the cell failed
    pub reason: ReasonCode,
    /// The cell's value in the coerced table (raw value on type mismatch)
    pub value: Value,
}

impl fmt::Display for CellFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}[{}]: {} (value: {})",
            self.column, self.row, self.reason, self.value
        )
    }
}

/// Advisory, non-fatal findings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ValidationWarning {
    /// A table column has no schema entry
    ExtraColumn {
        /// Column name
        column: String,
        /// What was done with it
        policy: ExtraColumnPolicy,
    },
}

impl fmt::Display for ValidationWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationWarning::ExtraColumn { column, policy } => match policy {
                ExtraColumnPolicy::PassThrough => write!(
                    f,
                    "Column '{column}' is not declared in the schema; passed through unvalidated"
                ),
                ExtraColumnPolicy::Drop => {
                    write!(f, "Column '{column}' is not declared in the schema; dropped")
                }
            },
        }
    }
}

/// Statistics about a validation run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ValidationStats {
    /// Number of rows in the table
    pub rows: usize,
    /// Number of declared columns validated
    pub columns_validated: usize,
    /// Number of cells checked (rows x declared columns)
    pub cells_checked: usize,
    /// Number of failing cells
    pub cells_failed: usize,
    /// Duration of the run in milliseconds
    pub duration_ms: u64,
}

/// Outcome of validating a table against a schema.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ValidationResult {
    pub(crate) valid: bool,
    pub(crate) coerced: Table,
    pub(crate) masks: IndexMap<String, Vec<bool>>,
    pub(crate) failures: Vec<CellFailure>,
    pub(crate) warnings: Vec<ValidationWarning>,
    pub(crate) stats: ValidationStats,
}

impl ValidationResult {
    /// True if every cell of every declared column passed.
    pub fn is_valid(&self) -> bool {
        self.valid
    }

    /// The coerced output table.
    pub fn coerced(&self) -> &Table {
        &self.coerced
    }

    /// Consumes the result, returning the coerced table.
    pub fn into_coerced(self) -> Table {
        self.coerced
    }

    /// Pass/fail masks, one per declared column, in schema order.
    pub fn masks(&self) -> &IndexMap<String, Vec<bool>> {
        &self.masks
    }

    /// Pass/fail mask of one declared column.
    pub fn mask(&self, column: &str) -> Option<&[bool]> {
        self.masks.get(column).map(Vec::as_slice)
    }

    /// All failures, ordered by schema column and then by row.
    pub fn failures(&self) -> &[CellFailure] {
        &self.failures
    }

    /// Failures of one column, in row order.
    pub fn failures_for<'a>(&'a self, column: &'a str) -> impl Iterator<Item = &'a CellFailure> {
        self.failures.iter().filter(move |f| f.column == column)
    }

    /// Number of failures per reason.
    pub fn reason_counts(&self) -> BTreeMap<String, usize> {
        let mut counts = BTreeMap::new();
        for failure in &self.failures {
            *counts.entry(failure.reason.to_string()).or_insert(0) += 1;
        }
        counts
    }

    /// Advisory warnings.
    pub fn warnings(&self) -> &[ValidationWarning] {
        &self.warnings
    }

    /// Run statistics.
    pub fn stats(&self) -> &ValidationStats {
        &self.stats
    }
}
