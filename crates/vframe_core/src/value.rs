//! Cell values.
//!
//! This module provides [`Value`], the representation shared by raw input
//! cells and canonical (coerced) cells.

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use serde::{Serialize, Serializer};
use std::cmp::Ordering;
use std::fmt;

/// A single cell value.
///
/// Raw cells arrive in any of these shapes; after coercion a cell holds the
/// canonical shape for its column type.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// Absent / none
    Null,
    /// Boolean value
    Bool(bool),
    /// Integer value
    Int(i64),
    /// Floating point value (NaN is the numeric null sentinel)
    Float(f64),
    /// Text value
    Str(String),
    /// Date/time value (timezone-naive, UTC when converted from an offset)
    DateTime(NaiveDateTime),
    /// Ordered, mutable-style sequence
    List(Vec<Value>),
    /// Ordered, fixed sequence
    Tuple(Vec<Value>),
    /// Unique elements in first-occurrence order
    Set(Vec<Value>),
    /// Unique keys in insertion order
    Dict(Vec<(Value, Value)>),
}

impl Value {
    /// Builds a set, dropping repeated elements. Elements are compared with
    /// [`Value::key_eq`], so `1`, `1.0` and `True` collapse to the first one.
    pub fn set(items: impl IntoIterator<Item = Value>) -> Self {
        let mut unique: Vec<Value> = Vec::new();
        for item in items {
            if !unique.iter().any(|seen| seen.key_eq(&item)) {
                unique.push(item);
            }
        }
        Value::Set(unique)
    }

    /// Builds a dictionary. A repeated key (per [`Value::key_eq`]) keeps its
    /// first position and takes the last value.
    pub fn dict(pairs: impl IntoIterator<Item = (Value, Value)>) -> Self {
        let mut entries: Vec<(Value, Value)> = Vec::new();
        for (key, value) in pairs {
            match entries.iter_mut().find(|(k, _)| k.key_eq(&key)) {
                Some(entry) => entry.1 = value,
                None => entries.push((key, value)),
            }
        }
        Value::Dict(entries)
    }

    /// Equality used for set elements and dictionary keys.
    ///
    /// Numbers compare by value across kinds: `Int(1)`, `Float(1.0)` and
    /// `Bool(true)` are the same key. Tuples compare element-wise under the
    /// same rule; everything else compares structurally.
    pub fn key_eq(&self, other: &Value) -> bool {
        match (self, other) {
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Bool(b), other) | (other, Value::Bool(b)) => {
                Value::Int(i64::from(*b)).key_eq(other)
            }
            (Value::Int(i), Value::Float(f)) | (Value::Float(f), Value::Int(i)) => {
                cmp_int_float(*i, *f) == Some(Ordering::Equal)
            }
            (Value::Tuple(a), Value::Tuple(b)) => {
                a.len() == b.len() && a.iter().zip(b).all(|(x, y)| x.key_eq(y))
            }
            _ => self == other,
        }
    }

    /// Returns true if this value is `Null`.
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Returns true if this value is a NaN float.
    pub fn is_nan(&self) -> bool {
        matches!(self, Value::Float(f) if f.is_nan())
    }

    /// Returns the type name of this value.
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "bool",
            Value::Int(_) => "int",
            Value::Float(_) => "float",
            Value::Str(_) => "str",
            Value::DateTime(_) => "datetime",
            Value::List(_) => "list",
            Value::Tuple(_) => "tuple",
            Value::Set(_) => "set",
            Value::Dict(_) => "dict",
        }
    }

    /// Attempts to get this value as text.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s),
            _ => None,
        }
    }

    /// Attempts to get this value as an integer.
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int(i) => Some(*i),
            _ => None,
        }
    }

    /// Attempts to get this value as a float. Integers widen.
    pub fn as_float(&self) -> Option<f64> {
        match self {
            Value::Float(f) => Some(*f),
            Value::Int(i) => Some(*i as f64),
            _ => None,
        }
    }

    /// Attempts to get this value as a boolean.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Attempts to get this value as a date/time.
    pub fn as_datetime(&self) -> Option<NaiveDateTime> {
        match self {
            Value::DateTime(dt) => Some(*dt),
            _ => None,
        }
    }

    /// Number of items held by a container value.
    pub fn item_count(&self) -> Option<usize> {
        match self {
            Value::List(items) | Value::Tuple(items) | Value::Set(items) => Some(items.len()),
            Value::Dict(entries) => Some(entries.len()),
            _ => None,
        }
    }

    /// Number of characters in a text value.
    pub fn char_count(&self) -> Option<usize> {
        self.as_str().map(|s| s.chars().count())
    }

    /// Converts a JSON value into a cell value.
    ///
    /// Arrays become lists and objects become dictionaries with text keys.
    pub fn from_json(json: serde_json::Value) -> Self {
        match json {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::Bool(b) => Value::Bool(b),
            serde_json::Value::Number(n) => match n.as_i64() {
                Some(i) => Value::Int(i),
                None => n.as_f64().map(Value::Float).unwrap_or(Value::Null),
            },
            serde_json::Value::String(s) => Value::Str(s),
            serde_json::Value::Array(items) => {
                Value::List(items.into_iter().map(Value::from_json).collect())
            }
            serde_json::Value::Object(map) => Value::Dict(
                map.into_iter()
                    .map(|(k, v)| (Value::Str(k), Value::from_json(v)))
                    .collect(),
            ),
        }
    }

    /// Converts this value to JSON.
    ///
    /// Non-finite floats become `null` and date/times become ISO-8601 text.
    /// JSON has no tuple or set, and only text object keys, so tuples, sets
    /// and dictionaries with non-text keys are written as their literal text
    /// (`(1, 2)`, `{1, 2}`, `{1: 'a'}`) when their elements are scalars.
    /// Reading that text back into a column of the same type restores the
    /// value.
    pub fn to_json(&self) -> serde_json::Value {
        match self {
            Value::Null => serde_json::Value::Null,
            Value::Bool(b) => serde_json::Value::Bool(*b),
            Value::Int(i) => serde_json::Value::from(*i),
            Value::Float(f) => serde_json::Number::from_f64(*f)
                .map(serde_json::Value::Number)
                .unwrap_or(serde_json::Value::Null),
            Value::Str(s) => serde_json::Value::String(s.clone()),
            Value::DateTime(dt) => {
                serde_json::Value::String(dt.format("%Y-%m-%dT%H:%M:%S%.f").to_string())
            }
            Value::Tuple(items) | Value::Set(items)
                if items.iter().all(Value::is_literal_scalar) =>
            {
                serde_json::Value::String(self.to_string())
            }
            Value::List(items) | Value::Tuple(items) | Value::Set(items) => {
                serde_json::Value::Array(items.iter().map(Value::to_json).collect())
            }
            Value::Dict(entries)
                if entries.iter().any(|(k, _)| !matches!(k, Value::Str(_)))
                    && entries
                        .iter()
                        .all(|(k, v)| k.is_literal_scalar() && v.is_literal_scalar()) =>
            {
                serde_json::Value::String(self.to_string())
            }
            Value::Dict(entries) => serde_json::Value::Object(
                entries
                    .iter()
                    .map(|(k, v)| {
                        let key = match k {
                            Value::Str(s) => s.clone(),
                            other => other.to_string(),
                        };
                        (key, v.to_json())
                    })
                    .collect(),
            ),
        }
    }

    /// Scalars whose `Display` inside a container reads back unchanged.
    fn is_literal_scalar(&self) -> bool {
        match self {
            Value::Null | Value::Bool(_) | Value::Int(_) | Value::Str(_) => true,
            Value::Float(f) => f.is_finite(),
            _ => false,
        }
    }

    fn write_literal(&self, f: &mut fmt::Formatter<'_>, nested: bool) -> fmt::Result {
        match self {
            Value::Null => write!(f, "None"),
            Value::Bool(true) => write!(f, "True"),
            Value::Bool(false) => write!(f, "False"),
            Value::Int(i) => write!(f, "{i}"),
            Value::Float(x) if x.is_nan() => write!(f, "nan"),
            Value::Float(x) if x.is_finite() && x.fract() == 0.0 => write!(f, "{x:.1}"),
            Value::Float(x) => write!(f, "{x}"),
            Value::Str(s) if nested => write!(f, "'{}'", s.replace('\\', "\\\\").replace('\'', "\\'")),
            Value::Str(s) => write!(f, "{s}"),
            Value::DateTime(dt) => write!(f, "{dt}"),
            Value::List(items) => write_items(f, "[", items, "]"),
            Value::Tuple(items) if items.len() == 1 => {
                write!(f, "(")?;
                items[0].write_literal(f, true)?;
                write!(f, ",)")
            }
            Value::Tuple(items) => write_items(f, "(", items, ")"),
            Value::Set(items) if items.is_empty() => write!(f, "set()"),
            Value::Set(items) => write_items(f, "{", items, "}"),
            Value::Dict(entries) => {
                write!(f, "{{")?;
                for (i, (k, v)) in entries.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    k.write_literal(f, true)?;
                    write!(f, ": ")?;
                    v.write_literal(f, true)?;
                }
                write!(f, "}}")
            }
        }
    }
}

fn write_items(f: &mut fmt::Formatter<'_>, open: &str, items: &[Value], close: &str) -> fmt::Result {
    write!(f, "{open}")?;
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            write!(f, ", ")?;
        }
        item.write_literal(f, true)?;
    }
    write!(f, "{close}")
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.write_literal(f, false)
    }
}

/// Serializes through [`Value::to_json`].
impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_json().serialize(serializer)
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Str(s)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Str(s.to_string())
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Int(i)
    }
}

impl From<f64> for Value {
    fn from(f: f64) -> Self {
        Value::Float(f)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<NaiveDateTime> for Value {
    fn from(dt: NaiveDateTime) -> Self {
        Value::DateTime(dt)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or(Value::Null)
    }
}

/// Exact ordering of an integer against a float, without rounding the
/// integer through `f64`. `None` when the float is NaN.
pub(crate) fn cmp_int_float(i: i64, f: f64) -> Option<Ordering> {
    // 2^63 is exactly representable; i64 covers [-2^63, 2^63)
    const LIMIT: f64 = 9_223_372_036_854_775_808.0;
    if f.is_nan() {
        return None;
    }
    if f >= LIMIT {
        return Some(Ordering::Less);
    }
    if f < -LIMIT {
        return Some(Ordering::Greater);
    }
    let floor = f.floor();
    let whole = floor as i64;
    match i.cmp(&whole) {
        Ordering::Equal if floor < f => Some(Ordering::Less),
        ordering => Some(ordering),
    }
}

/// Parses an ISO-8601 date or date/time string.
///
/// Supports:
/// - Date only (e.g., "2024-01-15"), taken as midnight
/// - Date and time with `T` or space separator, optional fractional seconds
///   (e.g., "2024-01-15T10:30:00", "2024-01-15 10:30:00.250")
/// - Date and time without seconds (e.g., "2024-01-15T10:30")
/// - RFC 3339 with offset (e.g., "2024-01-15T10:30:00+02:00"), normalised to UTC
pub fn parse_iso_datetime(text: &str) -> Option<NaiveDateTime> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
        return Some(dt.with_timezone(&Utc).naive_utc());
    }

    const FORMATS: [&str; 4] = [
        "%Y-%m-%dT%H:%M:%S%.f",
        "%Y-%m-%d %H:%M:%S%.f",
        "%Y-%m-%dT%H:%M",
        "%Y-%m-%d %H:%M",
    ];
    if let Some(dt) = FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(text, format).ok())
    {
        return Some(dt);
    }

    NaiveDate::parse_from_str(text, "%Y-%m-%d")
        .ok()
        .map(|date| date.and_time(NaiveTime::MIN))
}
