//! Custom column checks.
//!
//! A [`ColumnCheck`] is a user-supplied function registered on a column at
//! schema-construction time. It receives a batch of canonical values and
//! returns a pass/fail mask, optionally with one reason string per failure.
//!
//! This module also ships a few stock checks:
//! - [`PatternCheck`]: text form must match a regex
//! - [`AllowedValuesCheck`]: value must be one of a fixed set
//! - [`UniqueCheck`]: value must not repeat an earlier value
//! - [`AllOf`]: conjunction of several checks

use crate::{SchemaError, Value};
use regex::Regex;
use std::collections::HashSet;
use std::sync::Arc;

/// Result of running a custom check over a batch of values.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CheckOutcome {
    /// One entry per input value; `false` marks a failure
    pub mask: Vec<bool>,
    /// Optional reasons, one per `false` entry in `mask`, in order
    pub reasons: Option<Vec<String>>,
}

impl CheckOutcome {
    /// Creates an outcome without reasons.
    pub fn from_mask(mask: Vec<bool>) -> Self {
        Self {
            mask,
            reasons: None,
        }
    }

    /// Creates an outcome with one reason per failure.
    pub fn with_reasons(mask: Vec<bool>, reasons: Vec<String>) -> Self {
        Self {
            mask,
            reasons: Some(reasons),
        }
    }

    /// Builds an outcome by evaluating `f` on every value; `Err` carries the
    /// reason for that cell.
    pub fn evaluate<F>(values: &[Value], mut f: F) -> Self
    where
        F: FnMut(&Value) -> Result<(), String>,
    {
        let mut mask = Vec::with_capacity(values.len());
        let mut reasons = Vec::new();
        for value in values {
            match f(value) {
                Ok(()) => mask.push(true),
                Err(reason) => {
                    mask.push(false);
                    reasons.push(reason);
                }
            }
        }
        Self::with_reasons(mask, reasons)
    }

    /// Number of failing entries.
    pub fn failure_count(&self) -> usize {
        self.mask.iter().filter(|ok| !**ok).count()
    }

    /// Spreads the per-failure reasons over the mask: one entry per value,
    /// `Some(reason)` for failures. Failures without a reason get `default`.
    pub fn cell_reasons(&self, default: &str) -> Vec<Option<String>> {
        let mut reasons = self.reasons.iter().flatten();
        self.mask
            .iter()
            .map(|ok| {
                if *ok {
                    None
                } else {
                    Some(
                        reasons
                            .next()
                            .cloned()
                            .unwrap_or_else(|| default.to_string()),
                    )
                }
            })
            .collect()
    }
}

/// A custom check applied to a column's values after the builtin checks.
pub trait ColumnCheck: Send + Sync {
    /// Name used in reports and as the default failure reason.
    fn name(&self) -> &str;

    /// Runs the check over a batch of values.
    ///
    /// The returned mask must have exactly one entry per input value, and
    /// `reasons`, when present, exactly one entry per failure.
    fn check(&self, values: &[Value]) -> CheckOutcome;
}

/// Adapts a closure into a [`ColumnCheck`].
///
/// # Example
///
/// ```rust
/// use vframe_core::{CheckOutcome, ColumnCheck, FnCheck, Value};
///
/// let even = FnCheck::new("even", |values: &[Value]| {
///     CheckOutcome::from_mask(
///         values.iter().map(|v| v.as_int().is_some_and(|i| i % 2 == 0)).collect(),
///     )
/// });
///
/// let outcome = even.check(&[Value::Int(2), Value::Int(3)]);
/// assert_eq!(outcome.mask, vec![true, false]);
/// ```
pub struct FnCheck<F> {
    name: String,
    f: F,
}

impl<F> FnCheck<F>
where
    F: Fn(&[Value]) -> CheckOutcome + Send + Sync,
{
    /// Wraps `f` under the given name.
    pub fn new(name: impl Into<String>, f: F) -> Self {
        Self {
            name: name.into(),
            f,
        }
    }
}

impl<F> ColumnCheck for FnCheck<F>
where
    F: Fn(&[Value]) -> CheckOutcome + Send + Sync,
{
    fn name(&self) -> &str {
        &self.name
    }

    fn check(&self, values: &[Value]) -> CheckOutcome {
        (self.f)(values)
    }
}

/// Text form of a value must match a regular expression.
#[derive(Debug, Clone)]
pub struct PatternCheck {
    regex: Regex,
}

impl PatternCheck {
    /// Compiles the pattern.
    pub fn new(pattern: &str) -> Result<Self, SchemaError> {
        let regex = Regex::new(pattern).map_err(|e| SchemaError::InvalidCheck {
            check: "pattern".to_string(),
            message: e.to_string(),
        })?;
        Ok(Self { regex })
    }

    /// Source pattern.
    pub fn pattern(&self) -> &str {
        self.regex.as_str()
    }
}

impl ColumnCheck for PatternCheck {
    fn name(&self) -> &str {
        "pattern"
    }

    fn check(&self, values: &[Value]) -> CheckOutcome {
        CheckOutcome::evaluate(values, |value| {
            let matched = match value {
                Value::Str(s) => self.regex.is_match(s),
                other => self.regex.is_match(&other.to_string()),
            };
            if matched {
                Ok(())
            } else {
                Err("pattern_mismatch".to_string())
            }
        })
    }
}

/// Value must be one of a fixed set. Integers and floats compare numerically.
#[derive(Debug, Clone)]
pub struct AllowedValuesCheck {
    allowed: Vec<Value>,
}

impl AllowedValuesCheck {
    /// Creates the check from the allowed values.
    pub fn new(allowed: impl IntoIterator<Item = Value>) -> Self {
        Self {
            allowed: allowed.into_iter().collect(),
        }
    }

    /// The allowed values.
    pub fn allowed(&self) -> &[Value] {
        &self.allowed
    }
}

fn loosely_equal(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Int(x), Value::Float(y)) | (Value::Float(y), Value::Int(x)) => *x as f64 == *y,
        _ => a == b,
    }
}

impl ColumnCheck for AllowedValuesCheck {
    fn name(&self) -> &str {
        "allowed_values"
    }

    fn check(&self, values: &[Value]) -> CheckOutcome {
        CheckOutcome::evaluate(values, |value| {
            if self.allowed.iter().any(|a| loosely_equal(a, value)) {
                Ok(())
            } else {
                Err("not_allowed".to_string())
            }
        })
    }
}

/// Value must not repeat an earlier value in the batch. The first occurrence
/// passes; later occurrences fail.
#[derive(Debug, Clone, Copy, Default)]
pub struct UniqueCheck;

impl ColumnCheck for UniqueCheck {
    fn name(&self) -> &str {
        "unique"
    }

    fn check(&self, values: &[Value]) -> CheckOutcome {
        let mut seen = HashSet::new();
        CheckOutcome::evaluate(values, |value| {
            let key = format!("{}:{}", value.type_name(), value);
            if seen.insert(key) {
                Ok(())
            } else {
                Err("duplicate".to_string())
            }
        })
    }
}

/// Conjunction of several checks. A failing cell takes the reason of the
/// first check that failed it.
#[derive(Clone)]
pub struct AllOf {
    name: String,
    checks: Vec<Arc<dyn ColumnCheck>>,
}

impl AllOf {
    /// Combines the given checks.
    pub fn new(checks: Vec<Arc<dyn ColumnCheck>>) -> Self {
        let names: Vec<&str> = checks.iter().map(|c| c.name()).collect();
        Self {
            name: format!("all_of({})", names.join(", ")),
            checks,
        }
    }

    /// Number of combined checks.
    pub fn len(&self) -> usize {
        self.checks.len()
    }

    /// Returns true if no checks are combined.
    pub fn is_empty(&self) -> bool {
        self.checks.is_empty()
    }
}

impl ColumnCheck for AllOf {
    fn name(&self) -> &str {
        &self.name
    }

    fn check(&self, values: &[Value]) -> CheckOutcome {
        let mut cells: Vec<Option<String>> = vec![None; values.len()];

        for check in &self.checks {
            let outcome = check.check(values);
            if outcome.mask.len() != values.len() {
                // Surface the broken contract to the caller unchanged.
                return outcome;
            }
            let default = format!("custom:{}", check.name());
            for (cell, reason) in cells.iter_mut().zip(outcome.cell_reasons(&default)) {
                if cell.is_none() {
                    *cell = reason;
                }
            }
        }

        let mask = cells.iter().map(Option::is_none).collect();
        let reasons = cells.into_iter().flatten().collect();
        CheckOutcome::with_reasons(mask, reasons)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_pattern_check() {
        let check = PatternCheck::new(r"^[A-Z]{2}\d$").unwrap();
        let outcome = check.check(&[Value::from("AB1"), Value::from("ab1"), Value::Int(5)]);
        assert_eq!(outcome.mask, vec![true, false, false]);
        assert_eq!(
            outcome.reasons,
            Some(vec!["pattern_mismatch".to_string(), "pattern_mismatch".to_string()])
        );
    }

    #[test]
    fn test_invalid_pattern() {
        let err = PatternCheck::new("[invalid(regex").unwrap_err();
        assert!(matches!(err, SchemaError::InvalidCheck { .. }));
    }

    #[test]
    fn test_allowed_values_numeric_equality() {
        let check = AllowedValuesCheck::new(vec![Value::Int(1), Value::from("a")]);
        let outcome = check.check(&[Value::Float(1.0), Value::from("a"), Value::Int(2)]);
        assert_eq!(outcome.mask, vec![true, true, false]);
        assert_eq!(outcome.failure_count(), 1);
    }

    #[test]
    fn test_unique_check_flags_repeats() {
        let outcome = UniqueCheck.check(&[
            Value::Int(1),
            Value::from("1"),
            Value::Int(1),
            Value::Int(2),
        ]);
        assert_eq!(outcome.mask, vec![true, true, false, true]);
    }

    #[test]
    fn test_cell_reasons_defaults() {
        let outcome = CheckOutcome::from_mask(vec![true, false]);
        assert_eq!(
            outcome.cell_reasons("custom:x"),
            vec![None, Some("custom:x".to_string())]
        );
    }

    #[test]
    fn test_all_of_takes_first_reason() {
        let checks: Vec<Arc<dyn ColumnCheck>> = vec![
            Arc::new(AllowedValuesCheck::new(vec![Value::from("a"), Value::from("b")])),
            Arc::new(UniqueCheck),
        ];
        let combined = AllOf::new(checks);
        assert_eq!(combined.name(), "all_of(allowed_values, unique)");

        let outcome = combined.check(&[Value::from("a"), Value::from("c"), Value::from("a")]);
        assert_eq!(outcome.mask, vec![true, false, false]);
        assert_eq!(
            outcome.reasons,
            Some(vec!["not_allowed".to_string(), "duplicate".to_string()])
        );
    }

    #[test]
    fn test_fn_check() {
        let check = FnCheck::new("positive", |values: &[Value]| {
            CheckOutcome::evaluate(values, |v| match v.as_int() {
                Some(i) if i > 0 => Ok(()),
                _ => Err("not_positive".to_string()),
            })
        });
        let outcome = check.check(&[Value::Int(3), Value::Int(-3)]);
        assert_eq!(outcome.mask, vec![true, false]);
        assert_eq!(check.name(), "positive");
    }
}
