//! Custom check execution.
//!
//! A column's [`ColumnCheck`](vframe_core::ColumnCheck) runs after the builtin
//! passes. Depending on the column's [`HookScope`] it sees either the
//! canonical values of the cells that passed every builtin check, or the whole
//! output column. Either way its failures are merged only into cells that are
//! still pending, so a cell never carries two reasons and nullable nulls
//! always pass.

use crate::{ReasonCode, Result, ValidationError, Verdict};
use tracing::debug;
use vframe_core::{ColumnSpec, HookScope, Value};

/// Runs custom checks and merges their outcomes into the verdicts.
#[derive(Debug, Clone, Copy, Default)]
pub struct HookRunner;

impl HookRunner {
    /// Creates a new hook runner.
    pub fn new() -> Self {
        Self
    }

    /// Runs the column's custom check, if any.
    ///
    /// Returns the number of cells the check failed.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError::HookContract` if the check's mask or reason
    /// list has the wrong length.
    pub fn run(&self, spec: &ColumnSpec, values: &[Value], verdicts: &mut [Verdict]) -> Result<usize> {
        let Some(check) = spec.check() else {
            return Ok(0);
        };

        let rows: Vec<usize> = match spec.check_scope() {
            HookScope::PassedCells => verdicts
                .iter()
                .enumerate()
                .filter(|(_, verdict)| verdict.is_pending())
                .map(|(row, _)| row)
                .collect(),
            HookScope::WholeColumn => (0..values.len()).collect(),
        };
        if rows.is_empty() {
            debug!("Skipping check '{}' on column '{}': no cells", check.name(), spec.name());
            return Ok(0);
        }

        let input: Vec<Value> = match spec.check_scope() {
            HookScope::PassedCells => rows.iter().map(|row| values[*row].clone()).collect(),
            HookScope::WholeColumn => values.to_vec(),
        };
        let outcome = check.check(&input);

        if outcome.mask.len() != input.len() {
            return Err(ValidationError::hook_contract(
                spec.name(),
                check.name(),
                "mask",
                input.len(),
                outcome.mask.len(),
            ));
        }
        if let Some(reasons) = &outcome.reasons {
            let failures = outcome.failure_count();
            if reasons.len() != failures {
                return Err(ValidationError::hook_contract(
                    spec.name(),
                    check.name(),
                    "reason",
                    failures,
                    reasons.len(),
                ));
            }
        }

        let default_reason = format!("custom:{}", check.name());
        let mut failed = 0;
        for (row, reason) in rows.into_iter().zip(outcome.cell_reasons(&default_reason)) {
            let Some(reason) = reason else { continue };
            let slot = &mut verdicts[row];
            if slot.is_pending() {
                *slot = Verdict::Failed(ReasonCode::Custom(reason));
                failed += 1;
            }
        }

        debug!(
            "Check '{}' on column '{}' failed {} cell(s)",
            check.name(),
            spec.name(),
            failed
        );
        Ok(failed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use vframe_core::{CheckOutcome, ColumnBuilder, ColumnType, FnCheck, UniqueCheck};

    fn odd_check() -> FnCheck<impl Fn(&[Value]) -> CheckOutcome + Send + Sync> {
        FnCheck::new("odd", |values: &[Value]| {
            CheckOutcome::from_mask(
                values
                    .iter()
                    .map(|v| v.as_int().is_some_and(|i| i % 2 != 0))
                    .collect(),
            )
        })
    }

    #[test]
    fn test_passed_cells_scope_sees_only_pending() {
        let spec = ColumnBuilder::new("n", ColumnType::Integer)
            .check(FnCheck::new("seen", |values: &[Value]| {
                // Only the two pending integers are handed over.
                assert_eq!(values, &[Value::Int(2), Value::Int(3)]);
                CheckOutcome::from_mask(vec![false, true])
            }))
            .build()
            .unwrap();
        let values = vec![Value::Int(2), Value::Null, Value::from("x"), Value::Int(3)];
        let mut verdicts = vec![
            Verdict::Pending,
            Verdict::Null,
            Verdict::Failed(ReasonCode::TypeMismatch),
            Verdict::Pending,
        ];

        let failed = HookRunner::new().run(&spec, &values, &mut verdicts).unwrap();

        assert_eq!(failed, 1);
        assert_eq!(
            verdicts,
            vec![
                Verdict::Failed(ReasonCode::Custom("custom:seen".to_string())),
                Verdict::Null,
                Verdict::Failed(ReasonCode::TypeMismatch),
                Verdict::Pending,
            ]
        );
    }

    #[test]
    fn test_whole_column_scope_never_overrides() {
        let spec = ColumnBuilder::new("n", ColumnType::Integer)
            .check(odd_check())
            .check_scope(HookScope::WholeColumn)
            .build()
            .unwrap();
        let values = vec![Value::Int(2), Value::Null, Value::Int(3)];
        let mut verdicts = vec![Verdict::Pending, Verdict::Null, Verdict::Pending];

        HookRunner::new().run(&spec, &values, &mut verdicts).unwrap();

        assert_eq!(
            verdicts,
            vec![
                Verdict::Failed(ReasonCode::Custom("custom:odd".to_string())),
                Verdict::Null,
                Verdict::Pending,
            ]
        );
    }

    #[test]
    fn test_reasons_are_used() {
        let spec = ColumnBuilder::new("s", ColumnType::String)
            .check(UniqueCheck)
            .build()
            .unwrap();
        let values = vec![Value::from("a"), Value::from("a")];
        let mut verdicts = vec![Verdict::Pending, Verdict::Pending];

        HookRunner::new().run(&spec, &values, &mut verdicts).unwrap();

        assert_eq!(
            verdicts[1],
            Verdict::Failed(ReasonCode::Custom("duplicate".to_string()))
        );
    }

    #[test]
    fn test_wrong_mask_length_is_fatal() {
        let spec = ColumnBuilder::new("n", ColumnType::Integer)
            .check(FnCheck::new("short", |_: &[Value]| {
                CheckOutcome::from_mask(vec![true])
            }))
            .build()
            .unwrap();
        let values = vec![Value::Int(1), Value::Int(2)];
        let mut verdicts = vec![Verdict::Pending, Verdict::Pending];

        let err = HookRunner::new().run(&spec, &values, &mut verdicts).unwrap_err();
        assert_eq!(err, ValidationError::hook_contract("n", "short", "mask", 2, 1));
    }

    #[test]
    fn test_wrong_reason_count_is_fatal() {
        let spec = ColumnBuilder::new("n", ColumnType::Integer)
            .check(FnCheck::new("chatty", |_: &[Value]| {
                CheckOutcome::with_reasons(vec![false, true], vec!["a".into(), "b".into()])
            }))
            .build()
            .unwrap();
        let values = vec![Value::Int(1), Value::Int(2)];
        let mut verdicts = vec![Verdict::Pending, Verdict::Pending];

        let err = HookRunner::new().run(&spec, &values, &mut verdicts).unwrap_err();
        assert!(matches!(err, ValidationError::HookContract { part: "reason", .. }));
    }

    #[test]
    fn test_no_check_is_a_no_op() {
        let spec = ColumnBuilder::new("n", ColumnType::Integer).build().unwrap();
        let mut verdicts = vec![Verdict::Pending];
        assert_eq!(
            HookRunner::new()
                .run(&spec, &[Value::Int(1)], &mut verdicts)
                .unwrap(),
            0
        );
    }
}
