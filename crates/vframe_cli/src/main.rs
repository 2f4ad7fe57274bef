mod commands;
mod output;

use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};
use vframe_core::ExtraColumnPolicy;
use vframe_parser::CsvOptions;

#[derive(Parser)]
#[command(name = "vframe")]
#[command(version, about = "Typed column coercion and validation", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate a table file against a schema
    Validate {
        /// Path to the schema file (YAML or TOML)
        schema: String,

        /// Path to the table file (JSON or CSV)
        table: String,

        /// Override the schema's policy for undeclared columns
        #[arg(short = 'x', long, value_enum)]
        extra_columns: Option<ExtraColumnsArg>,

        /// Output format
        #[arg(short, long, value_enum, default_value = "text")]
        format: OutputFormat,

        /// Write the coerced table as JSON to this path
        #[arg(short, long)]
        output: Option<String>,

        /// Read empty CSV cells as empty strings (by default they are null)
        #[arg(long)]
        keep_empty_strings: bool,
    },

    /// Check a schema file without validating data
    Check {
        /// Path to the schema file (YAML or TOML)
        schema: String,

        /// Output format
        #[arg(short, long, value_enum, default_value = "text")]
        format: OutputFormat,
    },
}

/// Report format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum ExtraColumnsArg {
    PassThrough,
    Drop,
}

impl From<ExtraColumnsArg> for ExtraColumnPolicy {
    fn from(arg: ExtraColumnsArg) -> Self {
        match arg {
            ExtraColumnsArg::PassThrough => ExtraColumnPolicy::PassThrough,
            ExtraColumnsArg::Drop => ExtraColumnPolicy::Drop,
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // RUST_LOG wins over --verbose
    let default_level = if cli.verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false)
                .with_level(true)
                .compact(),
        )
        .with(filter)
        .init();

    match cli.command {
        Commands::Validate {
            schema,
            table,
            extra_columns,
            format,
            output,
            keep_empty_strings,
        } => commands::validate::execute(
            &schema,
            &table,
            extra_columns.map(Into::into),
            format,
            output.as_deref(),
            CsvOptions {
                empty_as_null: !keep_empty_strings,
            },
        ),

        Commands::Check { schema, format } => commands::check::execute(&schema, format),
    }
}
