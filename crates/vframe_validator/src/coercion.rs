//! Coercion engine.
//!
//! Every column type owns a static, ordered table of [`CoercionRule`]s. For
//! each cell the first rule whose predicate accepts the raw value decides the
//! outcome: its converter either yields the canonical value or the cell is a
//! type mismatch and keeps its raw value. Cells matching no rule are type
//! mismatches as well.
//!
//! Null-equivalent cells are not coerced; they are left for the nullability
//! pass of the constraint checker.

use crate::parse_literal;
use regex::Regex;
use std::sync::LazyLock;
use vframe_core::{ColumnSpec, ColumnType, Value};

/// Decimal or exponent notation, surrounding whitespace allowed.
static NUMERIC_TEXT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*[+-]?(\d+\.?\d*|\.\d+)([eE][+-]?\d+)?\s*$").expect("valid numeric regex")
});

/// One `(accept-predicate, converter)` entry of a type's rule table.
#[derive(Clone, Copy)]
pub struct CoercionRule {
    /// Rule name, used in logs
    pub name: &'static str,
    accepts: fn(&Value) -> bool,
    convert: fn(&Value, &ColumnSpec) -> Option<Value>,
}

impl CoercionRule {
    const fn new(
        name: &'static str,
        accepts: fn(&Value) -> bool,
        convert: fn(&Value, &ColumnSpec) -> Option<Value>,
    ) -> Self {
        Self {
            name,
            accepts,
            convert,
        }
    }

    /// Returns true if this rule handles the raw value.
    pub fn accepts(&self, value: &Value) -> bool {
        (self.accepts)(value)
    }

    /// Converts an accepted raw value; `None` means type mismatch.
    pub fn convert(&self, value: &Value, spec: &ColumnSpec) -> Option<Value> {
        (self.convert)(value, spec)
    }
}

impl std::fmt::Debug for CoercionRule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("CoercionRule").field(&self.name).finish()
    }
}

static INTEGER_RULES: [CoercionRule; 3] = [
    CoercionRule::new("int", is_int, keep),
    CoercionRule::new("float_integral", is_float, float_to_int),
    CoercionRule::new("numeric_text", is_numeric_text, text_to_int),
];

static FLOAT_RULES: [CoercionRule; 3] = [
    CoercionRule::new("float", is_float, keep),
    CoercionRule::new("int", is_int, int_to_float),
    CoercionRule::new("numeric_text", is_numeric_text, text_to_float),
];

static BOOLEAN_RULES: [CoercionRule; 2] = [
    CoercionRule::new("bool", is_bool, keep),
    CoercionRule::new("mapped_text", is_text, text_to_bool),
];

static DATETIME_RULES: [CoercionRule; 2] = [
    CoercionRule::new("datetime", is_datetime, keep),
    CoercionRule::new("iso_text", is_text, text_to_datetime),
];

static STRING_RULES: [CoercionRule; 1] = [CoercionRule::new("text", is_text, keep)];

static LIST_RULES: [CoercionRule; 2] = [
    CoercionRule::new("list", is_list, keep),
    CoercionRule::new("literal_text", is_text, text_to_list),
];

static TUPLE_RULES: [CoercionRule; 2] = [
    CoercionRule::new("tuple", is_tuple, keep),
    CoercionRule::new("literal_text", is_text, text_to_tuple),
];

static SET_RULES: [CoercionRule; 2] = [
    CoercionRule::new("set", is_set, renormalise),
    CoercionRule::new("literal_text", is_text, text_to_set),
];

static DICTIONARY_RULES: [CoercionRule; 2] = [
    CoercionRule::new("dict", is_dict, renormalise),
    CoercionRule::new("literal_text", is_text, text_to_dict),
];

static OBJECT_RULES: [CoercionRule; 1] = [CoercionRule::new("any", is_any, keep)];

/// Returns the ordered rule table for a column type.
pub fn rules_for(column_type: ColumnType) -> &'static [CoercionRule] {
    match column_type {
        ColumnType::Integer => &INTEGER_RULES,
        ColumnType::Float => &FLOAT_RULES,
        ColumnType::Boolean => &BOOLEAN_RULES,
        ColumnType::Datetime => &DATETIME_RULES,
        ColumnType::String => &STRING_RULES,
        ColumnType::List => &LIST_RULES,
        ColumnType::Tuple => &TUPLE_RULES,
        ColumnType::Set => &SET_RULES,
        ColumnType::Dictionary => &DICTIONARY_RULES,
        ColumnType::Object => &OBJECT_RULES,
    }
}

fn is_any(_: &Value) -> bool {
    true
}

fn is_int(value: &Value) -> bool {
    matches!(value, Value::Int(_))
}

fn is_float(value: &Value) -> bool {
    matches!(value, Value::Float(_))
}

fn is_bool(value: &Value) -> bool {
    matches!(value, Value::Bool(_))
}

fn is_text(value: &Value) -> bool {
    matches!(value, Value::Str(_))
}

fn is_numeric_text(value: &Value) -> bool {
    value.as_str().is_some_and(|s| NUMERIC_TEXT.is_match(s))
}

fn is_datetime(value: &Value) -> bool {
    matches!(value, Value::DateTime(_))
}

fn is_list(value: &Value) -> bool {
    matches!(value, Value::List(_))
}

fn is_tuple(value: &Value) -> bool {
    matches!(value, Value::Tuple(_))
}

fn is_set(value: &Value) -> bool {
    matches!(value, Value::Set(_))
}

fn is_dict(value: &Value) -> bool {
    matches!(value, Value::Dict(_))
}

fn keep(value: &Value, _: &ColumnSpec) -> Option<Value> {
    Some(value.clone())
}

fn renormalise(value: &Value, _: &ColumnSpec) -> Option<Value> {
    match value {
        Value::Set(items) => Some(Value::set(items.iter().cloned())),
        Value::Dict(entries) => Some(Value::dict(entries.iter().cloned())),
        _ => None,
    }
}

fn float_to_int(value: &Value, _: &ColumnSpec) -> Option<Value> {
    value.as_float().and_then(integral).map(Value::Int)
}

/// `f` as an integer if it is finite, has no fractional part and fits i64.
fn integral(f: f64) -> Option<i64> {
    // 2^63 is exactly representable; anything at or above it overflows i64.
    const LIMIT: f64 = 9_223_372_036_854_775_808.0;
    (f.is_finite() && f.fract() == 0.0 && (-LIMIT..LIMIT).contains(&f)).then_some(f as i64)
}

fn text_to_int(value: &Value, _: &ColumnSpec) -> Option<Value> {
    let text = value.as_str()?.trim();
    match text.parse::<i64>() {
        Ok(i) => Some(Value::Int(i)),
        Err(_) => text.parse::<f64>().ok().and_then(integral).map(Value::Int),
    }
}

fn int_to_float(value: &Value, _: &ColumnSpec) -> Option<Value> {
    value.as_float().map(Value::Float)
}

fn text_to_float(value: &Value, _: &ColumnSpec) -> Option<Value> {
    value.as_str()?.trim().parse::<f64>().ok().map(Value::Float)
}

fn text_to_bool(value: &Value, spec: &ColumnSpec) -> Option<Value> {
    spec.bool_strings().lookup(value.as_str()?).map(Value::Bool)
}

fn text_to_datetime(value: &Value, _: &ColumnSpec) -> Option<Value> {
    vframe_core::parse_iso_datetime(value.as_str()?).map(Value::DateTime)
}

fn text_to_list(value: &Value, _: &ColumnSpec) -> Option<Value> {
    parse_container(value).filter(is_list)
}

fn text_to_tuple(value: &Value, _: &ColumnSpec) -> Option<Value> {
    parse_container(value).filter(is_tuple)
}

fn text_to_set(value: &Value, _: &ColumnSpec) -> Option<Value> {
    parse_container(value).filter(is_set)
}

fn text_to_dict(value: &Value, _: &ColumnSpec) -> Option<Value> {
    parse_container(value).filter(is_dict)
}

fn parse_container(value: &Value) -> Option<Value> {
    parse_literal(value.as_str()?).ok()
}

/// Per-cell result of coercion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CellOutcome {
    /// The cell now holds its canonical value
    Coerced,
    /// The raw value is null-equivalent for the column type
    Null,
    /// No rule produced a canonical value; the raw value is kept
    TypeMismatch,
}

/// A coerced column: output values plus one outcome per cell.
#[derive(Debug, Clone, PartialEq)]
pub struct CoercedColumn {
    /// Canonical values, or raw values where coercion did not apply
    pub values: Vec<Value>,
    /// One outcome per value
    pub outcomes: Vec<CellOutcome>,
}

impl CoercedColumn {
    /// Number of cells with the given outcome.
    pub fn count(&self, outcome: CellOutcome) -> usize {
        self.outcomes.iter().filter(|o| **o == outcome).count()
    }
}

/// Applies a column type's rule table to a whole column.
#[derive(Debug, Clone, Copy, Default)]
pub struct CoercionEngine;

impl CoercionEngine {
    /// Creates a new coercion engine.
    pub fn new() -> Self {
        Self
    }

    /// Coerces one raw value.
    ///
    /// Returns the canonical value, or `None` on a type mismatch. Does not
    /// apply the null-equivalence predicate.
    pub fn coerce_value(&self, spec: &ColumnSpec, raw: &Value) -> Option<Value> {
        rules_for(spec.column_type())
            .iter()
            .find(|rule| rule.accepts(raw))
            .and_then(|rule| rule.convert(raw, spec))
    }

    /// Coerces a whole column in a single pass.
    pub fn coerce_column(&self, spec: &ColumnSpec, raw: &[Value]) -> CoercedColumn {
        let (values, outcomes) = raw
            .iter()
            .map(|value| {
                if spec.is_null_equivalent(value) {
                    return (value.clone(), CellOutcome::Null);
                }
                match self.coerce_value(spec, value) {
                    Some(canonical) => (canonical, CellOutcome::Coerced),
                    None => (value.clone(), CellOutcome::TypeMismatch),
                }
            })
            .unzip();

        CoercedColumn { values, outcomes }
    }
}
