//! Table files.
//!
//! - JSON: either an object mapping column names to arrays of cells
//!   (`{"a": [1, 2], "b": ["x", null]}`), or an array of row objects
//!   (`[{"a": 1, "b": "x"}, {"a": 2}]`). Column order follows the document;
//!   keys missing from a row are null.
//! - CSV: a header row followed by records. Every non-empty cell is read as
//!   text, so all typing is left to coercion. An empty cell is null unless
//!   [`CsvOptions::empty_as_null`] is off, in which case it is `""`.

use crate::{ParserError, Result};
use indexmap::IndexMap;
use serde_json::Map;
use vframe_core::Value;
use vframe_validator::Table;

/// Parse a table from a JSON string.
///
/// # Errors
///
/// Returns `ParserError::InvalidTable` when the document is neither an
/// object of arrays nor an array of objects, and `ParserError::TableError`
/// when columns differ in length.
///
/// # Example
///
/// ```rust
/// use vframe_parser::parse_table_json;
///
/// let table = parse_table_json(r#"{"id": [1, 2], "tags": [["a"], []]}"#).unwrap();
/// assert_eq!(table.row_count(), 2);
/// ```
pub fn parse_table_json(content: &str) -> Result<Table> {
    let document: serde_json::Value = serde_json::from_str(content)?;

    match document {
        serde_json::Value::Object(columns) => from_columns(columns),
        serde_json::Value::Array(rows) => from_records(rows),
        other => Err(ParserError::InvalidTable(format!(
            "expected an object of columns or an array of rows, found {}",
            json_kind(&other)
        ))),
    }
}

fn from_columns(columns: Map<String, serde_json::Value>) -> Result<Table> {
    let mut table = Table::new();
    for (name, cells) in columns {
        let serde_json::Value::Array(values) = cells else {
            return Err(ParserError::InvalidTable(format!(
                "column '{name}' must be an array, found {}",
                json_kind(&cells)
            )));
        };
        table.push_column(name, values.into_iter().map(Value::from_json).collect())?;
    }
    Ok(table)
}

fn from_records(rows: Vec<serde_json::Value>) -> Result<Table> {
    let row_count = rows.len();
    let mut columns: IndexMap<String, Vec<Value>> = IndexMap::new();

    for (index, row) in rows.into_iter().enumerate() {
        let serde_json::Value::Object(fields) = row else {
            return Err(ParserError::InvalidTable(format!(
                "row {index} must be an object, found {}",
                json_kind(&row)
            )));
        };
        for (name, cell) in fields {
            let column = columns
                .entry(name)
                .or_insert_with(|| vec![Value::Null; index]);
            column.push(Value::from_json(cell));
        }
        for column in columns.values_mut() {
            column.resize(index + 1, Value::Null);
        }
    }

    let mut table = Table::new();
    for (name, mut cells) in columns {
        cells.resize(row_count, Value::Null);
        table.push_column(name, cells)?;
    }
    Ok(table)
}

fn json_kind(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "a boolean",
        serde_json::Value::Number(_) => "a number",
        serde_json::Value::String(_) => "a string",
        serde_json::Value::Array(_) => "an array",
        serde_json::Value::Object(_) => "an object",
    }
}

/// Options for reading CSV tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CsvOptions {
    /// Read empty cells as null rather than as empty text
    pub empty_as_null: bool,
}

impl Default for CsvOptions {
    fn default() -> Self {
        Self {
            empty_as_null: true,
        }
    }
}

/// Parse a table from a CSV string with a header row, reading empty cells
/// as null.
///
/// # Errors
///
/// Returns `ParserError::CsvError` for malformed CSV (including records
/// with the wrong number of fields) and `ParserError::TableError` for
/// repeated header names.
///
/// # Example
///
/// ```rust
/// use vframe_core::Value;
/// use vframe_parser::parse_table_csv;
///
/// let table = parse_table_csv("id,score\n1,0.5\n2,\n").unwrap();
/// assert_eq!(
///     table.column("score"),
///     Some(&[Value::from("0.5"), Value::Null][..])
/// );
/// ```
pub fn parse_table_csv(content: &str) -> Result<Table> {
    parse_table_csv_with(content, CsvOptions::default())
}

/// Parse a table from a CSV string with a header row.
///
/// # Example
///
/// ```rust
/// use vframe_core::Value;
/// use vframe_parser::{CsvOptions, parse_table_csv_with};
///
/// let options = CsvOptions { empty_as_null: false };
/// let table = parse_table_csv_with("code,n\n,1\nAB,2\n", options).unwrap();
/// assert_eq!(table.column("code"), Some(&[Value::from(""), Value::from("AB")][..]));
/// ```
pub fn parse_table_csv_with(content: &str, options: CsvOptions) -> Result<Table> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .from_reader(content.as_bytes());

    let headers: Vec<String> = reader.headers()?.iter().map(str::to_string).collect();
    let mut columns: Vec<Vec<Value>> = vec![Vec::new(); headers.len()];

    for record in reader.records() {
        let record = record?;
        for (column, field) in columns.iter_mut().zip(record.iter()) {
            column.push(if field.is_empty() && options.empty_as_null {
                Value::Null
            } else {
                Value::from(field)
            });
        }
    }

    let mut table = Table::new();
    for (name, cells) in headers.into_iter().zip(columns) {
        table.push_column(name, cells)?;
    }
    Ok(table)
}
