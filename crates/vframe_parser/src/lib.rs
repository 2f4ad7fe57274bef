//! Schema documents and table files for vframe.
//!
//! This crate loads a [`Schema`] from a YAML or TOML document and a
//! [`Table`] from a JSON or CSV file. It is a thin outer layer: library
//! callers can always build schemas and tables in code instead.
//!
//! # Example
//!
//! ```rust
//! use vframe_parser::{parse_schema_yaml, parse_table_csv};
//!
//! let yaml = r#"
//! extra_columns: drop
//! columns:
//!   - name: user_id
//!     type: integer
//!     nullable: false
//!     lower: 1
//!   - name: tags
//!     type: list
//!     max_items: 3
//! "#;
//!
//! let schema = parse_schema_yaml(yaml).expect("Failed to parse schema");
//! assert_eq!(schema.len(), 2);
//!
//! let table = parse_table_csv("user_id,tags\n1,\"['a', 'b']\"\n2,\n").unwrap();
//! let result = vframe_validator::validate(&schema, &table).unwrap();
//! assert!(result.is_valid());
//! ```

mod document;
mod table;

pub use document::*;
pub use table::*;

use std::path::Path;
use thiserror::Error;
use vframe_core::{Schema, SchemaError};
use vframe_validator::{Table, ValidationError};

/// Errors that can occur while loading schemas or tables.
#[derive(Debug, Error)]
pub enum ParserError {
    /// YAML parsing or deserialization failed
    #[error("Failed to parse YAML: {0}")]
    YamlError(#[from] serde_yaml_ng::Error),

    /// TOML parsing or deserialization failed
    #[error("Failed to parse TOML: {0}")]
    TomlError(String),

    /// JSON parsing failed
    #[error("Failed to parse JSON: {0}")]
    JsonError(#[from] serde_json::Error),

    /// CSV parsing failed
    #[error("Failed to parse CSV: {0}")]
    CsvError(#[from] csv::Error),

    /// File I/O error
    #[error("File I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// Unsupported file format
    #[error("Unsupported file format: {0}")]
    UnsupportedFormat(String),

    /// Invalid file extension
    #[error("Invalid or missing file extension")]
    InvalidExtension,

    /// The document describes a malformed schema
    #[error("Invalid schema: {0}")]
    SchemaError(#[from] SchemaError),

    /// The file does not describe a rectangular table
    #[error("Invalid table: {0}")]
    TableError(#[from] ValidationError),

    /// The file is well-formed but not shaped like a table
    #[error("Invalid table: {0}")]
    InvalidTable(String),

    /// A bound is neither a number nor an ISO-8601 date/time
    #[error("Invalid {bound} bound for column '{column}': {value}")]
    InvalidBound {
        /// Column name
        column: String,
        /// Which bound ("lower" or "upper")
        bound: &'static str,
        /// Offending text
        value: String,
    },
}

/// Result type alias for parser operations.
pub type Result<T> = std::result::Result<T, ParserError>;

/// Supported schema document formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchemaFormat {
    /// YAML format (.yml, .yaml)
    Yaml,
    /// TOML format (.toml)
    Toml,
}

/// Supported table file formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableFormat {
    /// JSON object of column arrays, or array of row objects (.json)
    Json,
    /// CSV with a header row (.csv)
    Csv,
}

fn extension(path: &Path) -> Result<String> {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_lowercase)
        .ok_or(ParserError::InvalidExtension)
}

/// Detect the schema format from a file path based on its extension.
///
/// # Supported Extensions
///
/// * `.yaml`, `.yml` → `SchemaFormat::Yaml`
/// * `.toml` → `SchemaFormat::Toml`
///
/// # Errors
///
/// Returns `ParserError::InvalidExtension` if the file has no extension.
/// Returns `ParserError::UnsupportedFormat` if the extension is not recognized.
pub fn detect_schema_format(path: &Path) -> Result<SchemaFormat> {
    match extension(path)?.as_str() {
        "yaml" | "yml" => Ok(SchemaFormat::Yaml),
        "toml" => Ok(SchemaFormat::Toml),
        other => Err(ParserError::UnsupportedFormat(other.to_string())),
    }
}

/// Detect the table format from a file path based on its extension.
///
/// # Errors
///
/// Same as [`detect_schema_format`], for `.json` and `.csv`.
pub fn detect_table_format(path: &Path) -> Result<TableFormat> {
    match extension(path)?.as_str() {
        "json" => Ok(TableFormat::Json),
        "csv" => Ok(TableFormat::Csv),
        other => Err(ParserError::UnsupportedFormat(other.to_string())),
    }
}

/// Parse a schema from a file with automatic format detection.
///
/// # Example
///
/// ```no_run
/// use vframe_parser::parse_schema_file;
/// use std::path::Path;
///
/// let schema = parse_schema_file(Path::new("schemas/user_events.yml")).unwrap();
/// println!("Loaded schema with {} columns", schema.len());
/// ```
pub fn parse_schema_file(path: &Path) -> Result<Schema> {
    let format = detect_schema_format(path)?;
    let content = std::fs::read_to_string(path)?;
    tracing::debug!("Parsing {:?} schema from {}", format, path.display());

    match format {
        SchemaFormat::Yaml => parse_schema_yaml(&content),
        SchemaFormat::Toml => parse_schema_toml(&content),
    }
}

/// Parse a table from a file with automatic format detection.
pub fn parse_table_file(path: &Path) -> Result<Table> {
    parse_table_file_with(path, CsvOptions::default())
}

/// Parse a table from a file, applying `csv` when the file is CSV.
pub fn parse_table_file_with(path: &Path, csv: CsvOptions) -> Result<Table> {
    let format = detect_table_format(path)?;
    let content = std::fs::read_to_string(path)?;
    tracing::debug!("Parsing {:?} table from {}", format, path.display());

    match format {
        TableFormat::Json => parse_table_json(&content),
        TableFormat::Csv => parse_table_csv_with(&content, csv),
    }
}
