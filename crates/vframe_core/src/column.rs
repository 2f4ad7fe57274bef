//! Column specifications.
//!
//! A [`ColumnSpec`] is the declaration for one column: its [`ColumnType`] and
//! the constraints applicable to that type. Specs are produced by
//! [`ColumnBuilder`](crate::ColumnBuilder), which rejects malformed
//! declarations, and are immutable afterwards.

use crate::value::cmp_int_float;
use crate::{ColumnCheck, Value};
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::sync::Arc;

/// Declared type of a column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColumnType {
    /// Whole numbers
    Integer,
    /// Floating-point numbers
    Float,
    /// true / false
    Boolean,
    /// Date and time values
    Datetime,
    /// Text
    String,
    /// `[a, b]`
    List,
    /// `(a, b)`
    Tuple,
    /// `{a, b}`
    Set,
    /// `{k: v}`
    Dictionary,
    /// Anything, left untouched
    Object,
}

impl ColumnType {
    /// All column types, in declaration order.
    pub const ALL: [ColumnType; 10] = [
        ColumnType::Integer,
        ColumnType::Float,
        ColumnType::Boolean,
        ColumnType::Datetime,
        ColumnType::String,
        ColumnType::List,
        ColumnType::Tuple,
        ColumnType::Set,
        ColumnType::Dictionary,
        ColumnType::Object,
    ];

    /// Returns true for Integer and Float.
    pub fn is_numeric(&self) -> bool {
        matches!(self, ColumnType::Integer | ColumnType::Float)
    }

    /// Returns true for the container types.
    pub fn is_container(&self) -> bool {
        matches!(
            self,
            ColumnType::List | ColumnType::Tuple | ColumnType::Set | ColumnType::Dictionary
        )
    }

    /// Returns true if `lower`/`upper` bounds apply to this type.
    pub fn supports_bounds(&self) -> bool {
        self.is_numeric() || *self == ColumnType::Datetime
    }

    /// Null-equivalence predicate for this type.
    ///
    /// Numeric and date/time columns treat a NaN float as null in addition to
    /// `Null`; every other type only treats `Null` as null.
    pub fn is_null_equivalent(&self, value: &Value) -> bool {
        match self {
            ColumnType::Integer | ColumnType::Float | ColumnType::Datetime => {
                value.is_null() || value.is_nan()
            }
            _ => value.is_null(),
        }
    }

    /// Lowercase name, as used in schema documents.
    pub fn as_str(&self) -> &'static str {
        match self {
            ColumnType::Integer => "integer",
            ColumnType::Float => "float",
            ColumnType::Boolean => "boolean",
            ColumnType::Datetime => "datetime",
            ColumnType::String => "string",
            ColumnType::List => "list",
            ColumnType::Tuple => "tuple",
            ColumnType::Set => "set",
            ColumnType::Dictionary => "dictionary",
            ColumnType::Object => "object",
        }
    }
}

impl fmt::Display for ColumnType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ColumnType::Integer => "Integer",
            ColumnType::Float => "Float",
            ColumnType::Boolean => "Boolean",
            ColumnType::Datetime => "Datetime",
            ColumnType::String => "String",
            ColumnType::List => "List",
            ColumnType::Tuple => "Tuple",
            ColumnType::Set => "Set",
            ColumnType::Dictionary => "Dictionary",
            ColumnType::Object => "Object",
        };
        f.write_str(name)
    }
}

/// An inclusive lower or upper bound.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Bound {
    /// Integer bound
    Int(i64),
    /// Float bound
    Float(f64),
    /// Date/time bound
    DateTime(NaiveDateTime),
}

impl Bound {
    /// Compares a canonical cell value against this bound.
    ///
    /// Returns `None` when the two are not comparable (e.g. a date/time value
    /// against a numeric bound).
    pub fn compare(&self, value: &Value) -> Option<Ordering> {
        match (value, self) {
            (Value::Int(v), Bound::Int(b)) => Some(v.cmp(b)),
            (Value::Int(v), Bound::Float(b)) => cmp_int_float(*v, *b),
            (Value::Float(v), Bound::Int(b)) => cmp_int_float(*b, *v).map(Ordering::reverse),
            (Value::Float(v), Bound::Float(b)) => v.partial_cmp(b),
            (Value::DateTime(v), Bound::DateTime(b)) => Some(v.cmp(b)),
            _ => None,
        }
    }

    pub(crate) fn is_numeric(&self) -> bool {
        matches!(self, Bound::Int(_) | Bound::Float(_))
    }

    pub(crate) fn is_finite(&self) -> bool {
        match self {
            Bound::Float(f) => f.is_finite(),
            _ => true,
        }
    }

    /// Orders two bounds of compatible kinds.
    pub(crate) fn partial_cmp_bound(&self, other: &Bound) -> Option<Ordering> {
        match other {
            Bound::Int(i) => self.compare(&Value::Int(*i)).map(Ordering::reverse),
            Bound::Float(f) => self.compare(&Value::Float(*f)).map(Ordering::reverse),
            Bound::DateTime(dt) => self.compare(&Value::DateTime(*dt)).map(Ordering::reverse),
        }
    }
}

impl fmt::Display for Bound {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Bound::Int(i) => write!(f, "{i}"),
            Bound::Float(x) => write!(f, "{x}"),
            Bound::DateTime(dt) => write!(f, "{dt}"),
        }
    }
}

impl From<i64> for Bound {
    fn from(i: i64) -> Self {
        Bound::Int(i)
    }
}

impl From<i32> for Bound {
    fn from(i: i32) -> Self {
        Bound::Int(i64::from(i))
    }
}

impl From<f64> for Bound {
    fn from(f: f64) -> Self {
        Bound::Float(f)
    }
}

impl From<NaiveDateTime> for Bound {
    fn from(dt: NaiveDateTime) -> Self {
        Bound::DateTime(dt)
    }
}

impl From<NaiveDate> for Bound {
    fn from(date: NaiveDate) -> Self {
        Bound::DateTime(date.and_time(NaiveTime::MIN))
    }
}

/// Explicit string-to-boolean mapping for Boolean columns.
///
/// Text outside both sets is a type mismatch; there is no truthiness fallback.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoolStrings {
    /// Strings that coerce to `true`
    pub true_values: Vec<String>,
    /// Strings that coerce to `false`
    pub false_values: Vec<String>,
    /// Whether matching is case-sensitive
    pub case_sensitive: bool,
}

impl BoolStrings {
    /// Creates a mapping from explicit true/false sets.
    pub fn new<T, F>(true_values: T, false_values: F) -> Self
    where
        T: IntoIterator,
        T::Item: Into<String>,
        F: IntoIterator,
        F::Item: Into<String>,
    {
        Self {
            true_values: true_values.into_iter().map(Into::into).collect(),
            false_values: false_values.into_iter().map(Into::into).collect(),
            case_sensitive: true,
        }
    }

    /// Sets case sensitivity.
    pub fn case_sensitive(mut self, case_sensitive: bool) -> Self {
        self.case_sensitive = case_sensitive;
        self
    }

    /// Looks up a string, returning the boolean it maps to.
    pub fn lookup(&self, text: &str) -> Option<bool> {
        let matches = |candidate: &String| {
            if self.case_sensitive {
                candidate == text
            } else {
                candidate.to_lowercase() == text.to_lowercase()
            }
        };
        if self.true_values.iter().any(matches) {
            Some(true)
        } else if self.false_values.iter().any(matches) {
            Some(false)
        } else {
            None
        }
    }

    /// Returns the first string present in both sets, if any.
    pub(crate) fn ambiguous(&self) -> Option<&str> {
        self.true_values
            .iter()
            .find(|t| {
                let lowered = t.to_lowercase();
                self.false_values.iter().any(|f| {
                    if self.case_sensitive {
                        f == *t
                    } else {
                        f.to_lowercase() == lowered
                    }
                })
            })
            .map(String::as_str)
    }
}

impl Default for BoolStrings {
    fn default() -> Self {
        Self::new(["True", "true"], ["False", "false"])
    }
}

/// Which cells a column's custom check is applied to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HookScope {
    /// Only canonical values of cells that passed every builtin check
    #[default]
    PassedCells,
    /// The whole output column (coerced values, raw values for failed cells)
    WholeColumn,
}

/// Declaration of one column.
///
/// Constructed through [`ColumnBuilder`](crate::ColumnBuilder); constraints
/// that do not apply to the column type are rejected there.
#[derive(Clone)]
pub struct ColumnSpec {
    pub(crate) name: String,
    pub(crate) column_type: ColumnType,
    pub(crate) nullable: bool,
    pub(crate) lower: Option<Bound>,
    pub(crate) upper: Option<Bound>,
    pub(crate) min_items: Option<usize>,
    pub(crate) max_items: Option<usize>,
    pub(crate) min_length: Option<usize>,
    pub(crate) max_length: Option<usize>,
    pub(crate) bool_strings: BoolStrings,
    pub(crate) check: Option<Arc<dyn ColumnCheck>>,
    pub(crate) check_scope: HookScope,
    pub(crate) description: Option<String>,
}

impl ColumnSpec {
    /// Column name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Declared type.
    pub fn column_type(&self) -> ColumnType {
        self.column_type
    }

    /// Whether null-equivalent values pass.
    pub fn nullable(&self) -> bool {
        self.nullable
    }

    /// Inclusive lower bound.
    pub fn lower(&self) -> Option<Bound> {
        self.lower
    }

    /// Inclusive upper bound.
    pub fn upper(&self) -> Option<Bound> {
        self.upper
    }

    /// Inclusive `(min, max)` size range: item count for containers,
    /// character count for String. `None` when the type has no size unit.
    pub fn size_range(&self) -> Option<(Option<usize>, Option<usize>)> {
        if self.column_type.is_container() {
            Some((self.min_items, self.max_items))
        } else if self.column_type == ColumnType::String {
            Some((self.min_length, self.max_length))
        } else {
            None
        }
    }

    /// Minimum item count (container types).
    pub fn min_items(&self) -> Option<usize> {
        self.min_items
    }

    /// Maximum item count (container types).
    pub fn max_items(&self) -> Option<usize> {
        self.max_items
    }

    /// Minimum character count (String).
    pub fn min_length(&self) -> Option<usize> {
        self.min_length
    }

    /// Maximum character count (String).
    pub fn max_length(&self) -> Option<usize> {
        self.max_length
    }

    /// String-to-boolean mapping (Boolean).
    pub fn bool_strings(&self) -> &BoolStrings {
        &self.bool_strings
    }

    /// Custom check, if one was registered.
    pub fn check(&self) -> Option<&dyn ColumnCheck> {
        self.check.as_deref()
    }

    /// Which cells the custom check sees.
    pub fn check_scope(&self) -> HookScope {
        self.check_scope
    }

    /// Optional human-readable description.
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Null-equivalence predicate for this column.
    pub fn is_null_equivalent(&self, value: &Value) -> bool {
        self.column_type.is_null_equivalent(value)
    }
}

impl fmt::Debug for ColumnSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ColumnSpec")
            .field("name", &self.name)
            .field("column_type", &self.column_type)
            .field("nullable", &self.nullable)
            .field("lower", &self.lower)
            .field("upper", &self.upper)
            .field("min_items", &self.min_items)
            .field("max_items", &self.max_items)
            .field("min_length", &self.min_length)
            .field("max_length", &self.max_length)
            .field("check", &self.check.as_ref().map(|c| c.name().to_string()))
            .field("check_scope", &self.check_scope)
            .finish()
    }
}

/// Renders the declaration the way it reads in code, e.g.
/// `Integer(lower=-1, upper=6, nullable=false)`.
impl fmt::Display for ColumnSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut parts = Vec::new();
        if let Some(lower) = &self.lower {
            parts.push(format!("lower={lower}"));
        }
        if let Some(upper) = &self.upper {
            parts.push(format!("upper={upper}"));
        }
        if let Some((min, max)) = self.size_range() {
            let (min_key, max_key) = if self.column_type == ColumnType::String {
                ("min_length", "max_length")
            } else {
                ("min_items", "max_items")
            };
            if let Some(min) = min {
                parts.push(format!("{min_key}={min}"));
            }
            if let Some(max) = max {
                parts.push(format!("{max_key}={max}"));
            }
        }
        parts.push(format!("nullable={}", self.nullable));
        if let Some(check) = &self.check {
            parts.push(format!("check={}", check.name()));
        }
        write!(f, "{}({})", self.column_type, parts.join(", "))
    }
}
