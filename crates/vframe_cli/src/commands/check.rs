use anyhow::{Context, Result};
use serde_json::json;
use std::path::Path;
use tracing::info;
use vframe_parser::parse_schema_file;

use crate::OutputFormat;
use crate::output;

pub fn execute(schema_path: &str, format: OutputFormat) -> Result<()> {
    info!("Checking schema: {}", schema_path);

    // A schema that parses has passed every construction check
    let schema = parse_schema_file(Path::new(schema_path))
        .with_context(|| format!("Failed to parse schema file: {}", schema_path))?;

    if format == OutputFormat::Json {
        let columns: Vec<_> = schema
            .columns()
            .map(|column| {
                json!({
                    "name": column.name(),
                    "type": column.column_type().as_str(),
                    "nullable": column.nullable(),
                    "spec": column.to_string(),
                    "description": column.description(),
                })
            })
            .collect();
        let summary = json!({
            "valid": true,
            "extra_columns": schema.extra_columns().to_string(),
            "columns": columns,
        });
        println!("{}", serde_json::to_string_pretty(&summary)?);
        return Ok(());
    }

    output::print_success("Schema is valid");

    println!("\nSchema Summary:");
    println!("  Columns:       {}", schema.len());
    println!("  Extra columns: {}", schema.extra_columns());

    if !schema.is_empty() {
        let width = schema.column_names().map(str::len).max().unwrap_or(0);
        println!("\nColumns:");
        for column in schema.columns() {
            println!("  {:width$}  {}", column.name(), column, width = width);
            if let Some(description) = column.description() {
                println!("  {:width$}  {}", "", description, width = width);
            }
        }
    }

    Ok(())
}
