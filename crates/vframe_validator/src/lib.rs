//! # vframe Validator
//!
//! Validation engine for vframe. This crate checks and coerces a [`Table`]
//! against a [`Schema`](vframe_core::Schema), column by column:
//!
//! - Coercion of raw values into each column type's canonical form
//!   (including container literals held in text, parsed by a restricted
//!   literal parser)
//! - Builtin constraints (nullability, type, bounds, size/length)
//! - Custom per-column checks
//! - Aggregation into a [`ValidationResult`]: coerced table, per-column
//!   masks, itemized failures and warnings
//!
//! ## Example
//!
//! ```rust
//! use vframe_core::{ColumnBuilder, ColumnType, ExtraColumnPolicy, SchemaBuilder, Value};
//! use vframe_validator::{validate, Table};
//!
//! let schema = SchemaBuilder::new(ExtraColumnPolicy::Drop)
//!     .column(ColumnBuilder::new("tags", ColumnType::List).min_items(1).max_items(3).build()?)
//!     .build()?;
//! let table = Table::new().with_column(
//!     "tags",
//!     vec![Value::from("[1, 2]"), Value::List(vec![])],
//! )?;
//!
//! let result = validate(&schema, &table)?;
//!
//! if result.is_valid() {
//!     println!("Validation passed!");
//! } else {
//!     for failure in result.failures() {
//!         println!("{failure}");
//!     }
//! }
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

mod coercion;
mod constraints;
mod custom;
mod engine;
mod error;
mod literal;
mod report;
mod table;

pub use coercion::*;
pub use constraints::*;
pub use custom::*;
pub use engine::*;
pub use error::*;
pub use literal::*;
pub use report::*;
pub use table::*;
