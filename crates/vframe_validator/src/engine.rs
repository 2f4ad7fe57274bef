//! Main validation engine.
//!
//! This module provides [`TableValidator`], which orchestrates coercion,
//! constraint checking and custom checks for every declared column and
//! aggregates the outcome into a [`ValidationResult`].

use crate::{
    CellFailure, CellOutcome, CoercionEngine, ConstraintChecker, HookRunner, Result, Table,
    ValidationError, ValidationResult, ValidationStats, ValidationWarning,
};
use indexmap::IndexMap;
use std::time::Instant;
use tracing::{debug, info, warn};
use vframe_core::{ExtraColumnPolicy, Schema};

/// Main validation engine.
///
/// Holds the stateless coercion engine, constraint checker and hook runner.
/// A single instance can validate any number of tables, from any number of
/// threads.
///
/// # Example
///
/// ```rust
/// use vframe_core::{ColumnBuilder, ColumnType, ExtraColumnPolicy, SchemaBuilder, Value};
/// use vframe_validator::{Table, TableValidator};
///
/// let schema = SchemaBuilder::new(ExtraColumnPolicy::PassThrough)
///     .column(ColumnBuilder::new("age", ColumnType::Integer).lower(-1).upper(6).build()?)
///     .build()?;
/// let table = Table::new()
///     .with_column("age", vec![Value::Int(7), Value::from("3")])?;
///
/// let result = TableValidator::new().validate(&schema, &table)?;
///
/// assert!(!result.is_valid());
/// for failure in result.failures() {
///     println!("{failure}");
/// }
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct TableValidator {
    coercion: CoercionEngine,
    checker: ConstraintChecker,
    hooks: HookRunner,
}

impl TableValidator {
    /// Creates a new table validator.
    pub fn new() -> Self {
        Self {
            coercion: CoercionEngine::new(),
            checker: ConstraintChecker::new(),
            hooks: HookRunner::new(),
        }
    }

    /// Validates a table against a schema.
    ///
    /// The table is not modified; the coerced values are returned in a new
    /// table inside the result.
    ///
    /// # Arguments
    ///
    /// * `schema` - The schema to validate against
    /// * `table` - The data to validate
    ///
    /// # Errors
    ///
    /// Returns `ValidationError::MissingColumn` if any declared column is
    /// absent from the table (checked before any cell is processed), and
    /// `ValidationError::HookContract` if a custom check returns a malformed
    /// outcome.
    pub fn validate(&self, schema: &Schema, table: &Table) -> Result<ValidationResult> {
        let start = Instant::now();
        let rows = table.row_count();

        info!(
            "Validating {} rows against {} declared columns",
            rows,
            schema.len()
        );

        let missing: Vec<&str> = schema
            .column_names()
            .filter(|name| !table.contains(name))
            .collect();
        if !missing.is_empty() {
            return Err(ValidationError::missing_columns(missing));
        }

        let mut masks = IndexMap::with_capacity(schema.len());
        let mut failures = Vec::new();
        let mut coerced_columns = IndexMap::with_capacity(schema.len());

        for spec in schema.columns() {
            let raw = table.column(spec.name()).unwrap_or_default();

            let coerced = self.coercion.coerce_column(spec, raw);
            let mut verdicts = self.checker.check(spec, &coerced);
            self.hooks.run(spec, &coerced.values, &mut verdicts)?;

            let mut mask = Vec::with_capacity(verdicts.len());
            for (row, verdict) in verdicts.into_iter().enumerate() {
                mask.push(verdict.passed());
                if let Some(reason) = verdict.into_reason() {
                    failures.push(CellFailure {
                        column: spec.name().to_string(),
                        row,
                        reason,
                        value: coerced.values[row].clone(),
                    });
                }
            }

            debug!(
                "Column '{}' ({}): {} coerced, {} null, {} failed",
                spec.name(),
                spec.column_type(),
                coerced.count(CellOutcome::Coerced),
                coerced.count(CellOutcome::Null),
                mask.iter().filter(|ok| !**ok).count()
            );

            masks.insert(spec.name().to_string(), mask);
            coerced_columns.insert(spec.name(), coerced.values);
        }

        let mut output = Table::new();
        let mut warnings = Vec::new();
        for (name, values) in table.iter() {
            if let Some(coerced) = coerced_columns.shift_remove(name) {
                output.insert_unchecked(name.to_string(), coerced);
                continue;
            }

            let policy = schema.extra_columns();
            warn!("Column '{}' is not declared in the schema ({})", name, policy);
            warnings.push(ValidationWarning::ExtraColumn {
                column: name.to_string(),
                policy,
            });
            if policy == ExtraColumnPolicy::PassThrough {
                output.insert_unchecked(name.to_string(), values.to_vec());
            }
        }

        let valid = failures.is_empty();
        let stats = ValidationStats {
            rows,
            columns_validated: schema.len(),
            cells_checked: rows * schema.len(),
            cells_failed: failures.len(),
            duration_ms: start.elapsed().as_millis() as u64,
        };

        if valid {
            info!("Validation passed ({} cells checked)", stats.cells_checked);
        } else {
            info!(
                "Validation failed: {} of {} cells failed",
                stats.cells_failed, stats.cells_checked
            );
        }

        Ok(ValidationResult {
            valid,
            coerced: output,
            masks,
            failures,
            warnings,
            stats,
        })
    }
}

/// Validates a table against a schema with a default [`TableValidator`].
///
/// See [`TableValidator::validate`].
pub fn validate(schema: &Schema, table: &Table) -> Result<ValidationResult> {
    TableValidator::new().validate(schema, table)
}
