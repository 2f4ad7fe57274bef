use anyhow::{Context, Result};
use std::path::Path;
use tracing::info;
use vframe_core::ExtraColumnPolicy;
use vframe_parser::{CsvOptions, parse_schema_file, parse_table_file_with};

use crate::OutputFormat;
use crate::output;

pub fn execute(
    schema_path: &str,
    table_path: &str,
    extra_columns: Option<ExtraColumnPolicy>,
    format: OutputFormat,
    output_path: Option<&str>,
    csv: CsvOptions,
) -> Result<()> {
    info!("Validating table {} against schema {}", table_path, schema_path);

    let schema = parse_schema_file(Path::new(schema_path))
        .with_context(|| format!("Failed to parse schema file: {}", schema_path))?;
    let schema = match extra_columns {
        Some(policy) => schema.with_extra_columns(policy),
        None => schema,
    };

    let table = parse_table_file_with(Path::new(table_path), csv)
        .with_context(|| format!("Failed to read table file: {}", table_path))?;

    if format == OutputFormat::Text {
        output::print_info(&format!(
            "Schema loaded: {} columns (extra columns: {})",
            schema.len(),
            schema.extra_columns()
        ));
        output::print_info(&format!(
            "Table loaded: {} rows x {} columns",
            table.row_count(),
            table.column_count()
        ));
    }

    let result = vframe_validator::validate(&schema, &table)
        .with_context(|| format!("Cannot validate {}", table_path))?;

    output::print_validation_result(&result, format)?;

    if let Some(path) = output_path {
        let json = serde_json::to_string_pretty(result.coerced())
            .context("Failed to serialize coerced table")?;
        std::fs::write(path, json)
            .with_context(|| format!("Failed to write coerced table: {}", path))?;
        info!("Coerced table written to {}", path);
    }

    if !result.is_valid() {
        std::process::exit(1);
    }

    Ok(())
}
