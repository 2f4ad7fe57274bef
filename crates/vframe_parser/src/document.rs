//! Schema documents.
//!
//! A schema document is the serialized form of a [`Schema`]:
//!
//! ```yaml
//! extra_columns: pass_through   # or: drop (required)
//! columns:
//!   - name: event_id
//!     type: string
//!     nullable: false
//!     checks:
//!       - type: pattern
//!         regex: ^evt_\d+$
//!       - type: unique
//!   - name: amount
//!     type: float
//!     lower: 0
//!   - name: is_mobile
//!     type: boolean
//!     true_values: [yes, "true"]
//!     false_values: [no, "false"]
//!     case_sensitive: false
//! ```
//!
//! Documents are deserialized into plain structs and then handed to the
//! core builders, so every rule the builders enforce applies to documents
//! as well.

use crate::{ParserError, Result};
use serde::Deserialize;
use std::sync::Arc;
use vframe_core::{
    AllOf, AllowedValuesCheck, BoolStrings, Bound, ColumnBuilder, ColumnCheck, ColumnSpec,
    ColumnType, ExtraColumnPolicy, HookScope, PatternCheck, Schema, SchemaBuilder, UniqueCheck,
    Value, parse_iso_datetime,
};

/// Top-level schema document.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SchemaDocument {
    /// Policy for table columns without a declaration
    pub extra_columns: ExtraColumnPolicy,
    /// Column declarations, in order
    #[serde(default)]
    pub columns: Vec<ColumnDocument>,
}

/// One column declaration in a schema document.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ColumnDocument {
    pub name: String,
    #[serde(rename = "type")]
    pub column_type: ColumnType,
    #[serde(default = "default_nullable")]
    pub nullable: bool,
    pub lower: Option<BoundDocument>,
    pub upper: Option<BoundDocument>,
    pub min_items: Option<usize>,
    pub max_items: Option<usize>,
    pub min_length: Option<usize>,
    pub max_length: Option<usize>,
    pub true_values: Option<Vec<String>>,
    pub false_values: Option<Vec<String>>,
    pub case_sensitive: Option<bool>,
    pub description: Option<String>,
    pub check_scope: Option<HookScope>,
    #[serde(default)]
    pub checks: Vec<CheckDocument>,
}

fn default_nullable() -> bool {
    true
}

/// A bound as written in a document: a number, or ISO-8601 date/time text.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum BoundDocument {
    Int(i64),
    Float(f64),
    Text(String),
}

/// A stock check as written in a document.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum CheckDocument {
    /// Text form must match `regex`
    Pattern { regex: String },
    /// Value must be one of `values`
    AllowedValues { values: Vec<serde_json::Value> },
    /// No value may repeat
    Unique,
}

impl BoundDocument {
    fn to_bound(&self, column: &str, which: &'static str) -> Result<Bound> {
        match self {
            BoundDocument::Int(i) => Ok(Bound::Int(*i)),
            BoundDocument::Float(f) => Ok(Bound::Float(*f)),
            BoundDocument::Text(text) => parse_iso_datetime(text)
                .map(Bound::DateTime)
                .ok_or_else(|| ParserError::InvalidBound {
                    column: column.to_string(),
                    bound: which,
                    value: text.clone(),
                }),
        }
    }
}

impl CheckDocument {
    fn to_check(&self) -> Result<Arc<dyn ColumnCheck>> {
        Ok(match self {
            CheckDocument::Pattern { regex } => Arc::new(PatternCheck::new(regex)?),
            CheckDocument::AllowedValues { values } => Arc::new(AllowedValuesCheck::new(
                values.iter().cloned().map(Value::from_json),
            )),
            CheckDocument::Unique => Arc::new(UniqueCheck),
        })
    }
}

impl ColumnDocument {
    /// Builds the column specification this declaration describes.
    ///
    /// # Errors
    ///
    /// Returns `ParserError::InvalidBound` for unparseable date/time bounds,
    /// and `ParserError::SchemaError` for anything the builder rejects.
    pub fn to_spec(&self) -> Result<ColumnSpec> {
        let mut builder =
            ColumnBuilder::new(self.name.as_str(), self.column_type).nullable(self.nullable);

        if let Some(lower) = &self.lower {
            builder = builder.lower(lower.to_bound(&self.name, "lower")?);
        }
        if let Some(upper) = &self.upper {
            builder = builder.upper(upper.to_bound(&self.name, "upper")?);
        }
        if let Some(n) = self.min_items {
            builder = builder.min_items(n);
        }
        if let Some(n) = self.max_items {
            builder = builder.max_items(n);
        }
        if let Some(n) = self.min_length {
            builder = builder.min_length(n);
        }
        if let Some(n) = self.max_length {
            builder = builder.max_length(n);
        }
        if let Some(bool_strings) = self.bool_strings() {
            builder = builder.bool_strings(bool_strings);
        }
        if let Some(description) = &self.description {
            builder = builder.description(description.as_str());
        }
        if let Some(scope) = self.check_scope {
            builder = builder.check_scope(scope);
        }

        let mut checks = self
            .checks
            .iter()
            .map(CheckDocument::to_check)
            .collect::<Result<Vec<_>>>()?;
        builder = match checks.len() {
            0 => builder,
            1 => builder.shared_check(checks.remove(0)),
            _ => builder.check(AllOf::new(checks)),
        };

        Ok(builder.build()?)
    }

    /// Boolean mapping, if any of its settings appear in the document.
    fn bool_strings(&self) -> Option<BoolStrings> {
        if self.true_values.is_none() && self.false_values.is_none() && self.case_sensitive.is_none()
        {
            return None;
        }
        let mut mapping = BoolStrings::default();
        if let Some(values) = &self.true_values {
            mapping.true_values = values.clone();
        }
        if let Some(values) = &self.false_values {
            mapping.false_values = values.clone();
        }
        if let Some(case_sensitive) = self.case_sensitive {
            mapping = mapping.case_sensitive(case_sensitive);
        }
        Some(mapping)
    }
}

impl SchemaDocument {
    /// Builds the schema this document describes.
    pub fn into_schema(self) -> Result<Schema> {
        let columns = self
            .columns
            .iter()
            .map(ColumnDocument::to_spec)
            .collect::<Result<Vec<_>>>()?;
        Ok(SchemaBuilder::new(self.extra_columns)
            .columns(columns)
            .build()?)
    }
}

/// Parse a schema from a YAML string.
///
/// # Example
///
/// ```rust
/// use vframe_parser::parse_schema_yaml;
///
/// let yaml = r#"
/// extra_columns: pass_through
/// columns:
///   - name: created_at
///     type: datetime
///     lower: "2024-01-01"
/// "#;
///
/// let schema = parse_schema_yaml(yaml).unwrap();
/// assert!(schema.contains("created_at"));
/// ```
pub fn parse_schema_yaml(content: &str) -> Result<Schema> {
    let document: SchemaDocument = serde_yaml_ng::from_str(content)?;
    document.into_schema()
}

/// Parse a schema from a TOML string.
///
/// # Example
///
/// ```rust
/// use vframe_parser::parse_schema_toml;
///
/// let toml = r#"
/// extra_columns = "drop"
///
/// [[columns]]
/// name = "score"
/// type = "float"
/// lower = 0
/// upper = 1.0
/// "#;
///
/// let schema = parse_schema_toml(toml).unwrap();
/// assert_eq!(schema.len(), 1);
/// ```
pub fn parse_schema_toml(content: &str) -> Result<Schema> {
    let document: SchemaDocument =
        toml::from_str(content).map_err(|e| ParserError::TomlError(e.to_string()))?;
    document.into_schema()
}
