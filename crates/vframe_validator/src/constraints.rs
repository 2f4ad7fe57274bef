//! Constraint checking logic.
//!
//! The checker runs a fixed sequence of whole-column passes over a verdict
//! vector:
//! - Nullability: null-equivalent cells pass (nullable) or fail with
//!   `null_not_allowed`
//! - Type: cells the coercion engine could not convert fail with
//!   `type_mismatch`
//! - Bounds: inclusive `lower` / `upper` comparison
//! - Size: inclusive item count (containers) or character count (String)
//!
//! Every pass only touches cells that are still [`Verdict::Pending`], so a
//! failing cell records exactly one reason: the first check it failed.

use crate::{CellOutcome, CoercedColumn, ReasonCode};
use std::cmp::Ordering;
use vframe_core::{ColumnSpec, Value};

/// Per-cell state while a column is being checked.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    /// No check has failed the cell yet
    Pending,
    /// Null-equivalent cell in a nullable column; passes, skips all checks
    Null,
    /// The cell failed
    Failed(ReasonCode),
}

impl Verdict {
    /// True unless the cell failed.
    pub fn passed(&self) -> bool {
        !matches!(self, Verdict::Failed(_))
    }

    /// True for cells still subject to further checks.
    pub fn is_pending(&self) -> bool {
        matches!(self, Verdict::Pending)
    }

    /// The failure reason, if the cell failed.
    pub fn reason(&self) -> Option<&ReasonCode> {
        match self {
            Verdict::Failed(reason) => Some(reason),
            _ => None,
        }
    }

    /// Consumes the verdict, returning the failure reason if any.
    pub fn into_reason(self) -> Option<ReasonCode> {
        match self {
            Verdict::Failed(reason) => Some(reason),
            _ => None,
        }
    }
}

/// Evaluates the builtin constraints of a column.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConstraintChecker;

impl ConstraintChecker {
    /// Creates a new constraint checker.
    pub fn new() -> Self {
        Self
    }

    /// Runs every builtin pass over a coerced column.
    ///
    /// Returns one verdict per cell.
    pub fn check(&self, spec: &ColumnSpec, column: &CoercedColumn) -> Vec<Verdict> {
        let mut verdicts = vec![Verdict::Pending; column.values.len()];

        self.check_nullability(spec, column, &mut verdicts);
        self.check_type(column, &mut verdicts);
        self.check_bounds(spec, &column.values, &mut verdicts);
        self.check_size(spec, &column.values, &mut verdicts);

        verdicts
    }

    fn check_nullability(
        &self,
        spec: &ColumnSpec,
        column: &CoercedColumn,
        verdicts: &mut [Verdict],
    ) {
        let verdict = if spec.nullable() {
            Verdict::Null
        } else {
            Verdict::Failed(ReasonCode::NullNotAllowed)
        };
        for (slot, outcome) in verdicts.iter_mut().zip(&column.outcomes) {
            if *outcome == CellOutcome::Null {
                *slot = verdict.clone();
            }
        }
    }

    fn check_type(&self, column: &CoercedColumn, verdicts: &mut [Verdict]) {
        for (slot, outcome) in verdicts.iter_mut().zip(&column.outcomes) {
            if slot.is_pending() && *outcome == CellOutcome::TypeMismatch {
                *slot = Verdict::Failed(ReasonCode::TypeMismatch);
            }
        }
    }

    fn check_bounds(&self, spec: &ColumnSpec, values: &[Value], verdicts: &mut [Verdict]) {
        if let Some(lower) = spec.lower() {
            fail_pending(values, verdicts, ReasonCode::BelowLower, |value| {
                lower.compare(value) == Some(Ordering::Less)
            });
        }
        if let Some(upper) = spec.upper() {
            fail_pending(values, verdicts, ReasonCode::AboveUpper, |value| {
                upper.compare(value) == Some(Ordering::Greater)
            });
        }
    }

    fn check_size(&self, spec: &ColumnSpec, values: &[Value], verdicts: &mut [Verdict]) {
        let Some((min, max)) = spec.size_range() else {
            return;
        };
        let size = |value: &Value| value.item_count().or_else(|| value.char_count());

        if let Some(min) = min {
            fail_pending(values, verdicts, ReasonCode::BelowMinSize, |value| {
                size(value).is_some_and(|n| n < min)
            });
        }
        if let Some(max) = max {
            fail_pending(values, verdicts, ReasonCode::AboveMaxSize, |value| {
                size(value).is_some_and(|n| n > max)
            });
        }
    }
}

/// Marks every pending cell for which `violates` holds as failed.
fn fail_pending<F>(values: &[Value], verdicts: &mut [Verdict], reason: ReasonCode, violates: F)
where
    F: Fn(&Value) -> bool,
{
    for (slot, value) in verdicts.iter_mut().zip(values) {
        if slot.is_pending() && violates(value) {
            *slot = Verdict::Failed(reason.clone());
        }
    }
}
