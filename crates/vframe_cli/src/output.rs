use crate::OutputFormat;
use anyhow::Result;
use colored::*;
use serde_json::json;
use vframe_validator::ValidationResult;

/// Failures listed individually in the text report; the rest are counted.
const MAX_LISTED_FAILURES: usize = 50;

pub fn print_validation_result(result: &ValidationResult, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Json => print_json_result(result),
        OutputFormat::Text => {
            print_text_result(result);
            Ok(())
        }
    }
}

fn print_text_result(result: &ValidationResult) {
    println!("\n{}", "═".repeat(60));
    println!("{}", "  VALIDATION REPORT".bold());
    println!("{}", "═".repeat(60));

    if result.is_valid() {
        println!(
            "\n{} {}",
            "✓".green().bold(),
            "Validation PASSED".green().bold()
        );
    } else {
        println!(
            "\n{} {}",
            "✗".red().bold(),
            "Validation FAILED".red().bold()
        );
    }

    let failures = result.failures();
    if !failures.is_empty() {
        println!("\n{}", "Failures:".red().bold());
        for (i, failure) in failures.iter().take(MAX_LISTED_FAILURES).enumerate() {
            println!("  {}. {}", i + 1, failure.to_string().red());
        }
        if failures.len() > MAX_LISTED_FAILURES {
            println!(
                "  ... and {} more",
                failures.len() - MAX_LISTED_FAILURES
            );
        }

        println!("\n{}", "Failures by reason:".bold());
        for (reason, count) in result.reason_counts() {
            println!("  {:<20} {}", reason, count);
        }
    }

    if !result.warnings().is_empty() {
        println!("\n{}", "Warnings:".yellow().bold());
        for (i, warning) in result.warnings().iter().enumerate() {
            println!("  {}. {}", i + 1, warning.to_string().yellow());
        }
    }

    let stats = result.stats();
    println!("\n{}", "Summary:".bold());
    println!("  Rows:              {}", stats.rows);
    println!("  Columns validated: {}", stats.columns_validated);
    println!("  Cells checked:     {}", stats.cells_checked);
    println!("  Cells failed:      {}", stats.cells_failed);
    println!("  Total warnings:    {}", result.warnings().len());
    println!("  Duration:          {} ms", stats.duration_ms);
    println!("{}", "═".repeat(60));
}

fn print_json_result(result: &ValidationResult) -> Result<()> {
    let output = json!({
        "valid": result.is_valid(),
        "failures": result.failures(),
        "warnings": result.warnings(),
        "reason_counts": result.reason_counts(),
        "stats": result.stats(),
    });

    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

pub fn print_success(message: &str) {
    println!("{} {}", "✓".green().bold(), message.green());
}

pub fn print_info(message: &str) {
    println!("{} {}", "ℹ".blue().bold(), message);
}
