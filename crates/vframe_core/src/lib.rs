//! # vframe Core
//!
//! Core data structures and types for vframe, a typed column coercion and
//! validation engine.
//!
//! This crate provides the building blocks for declaring what a table should
//! look like. The validation itself lives in `vframe_validator`.
//!
//! ## Key Concepts
//!
//! - **Value**: a single cell, raw or canonical
//! - **ColumnSpec**: the declared type and constraints of one column
//! - **Schema**: an ordered set of column declarations plus the policy for
//!   undeclared columns
//! - **ColumnCheck**: a custom check run after the builtin ones
//!
//! ## Example
//!
//! ```rust
//! use vframe_core::{ColumnBuilder, ColumnType, ExtraColumnPolicy, SchemaBuilder, UniqueCheck};
//!
//! let schema = SchemaBuilder::new(ExtraColumnPolicy::PassThrough)
//!     .column(
//!         ColumnBuilder::new("id", ColumnType::Integer)
//!             .lower(1)
//!             .nullable(false)
//!             .check(UniqueCheck)
//!             .build()?,
//!     )
//!     .column(ColumnBuilder::new("score", ColumnType::Float).upper(100.0).build()?)
//!     .build()?;
//!
//! assert_eq!(schema.column_names().collect::<Vec<_>>(), vec!["id", "score"]);
//! # Ok::<(), vframe_core::SchemaError>(())
//! ```

pub mod builder;
pub mod check;
pub mod column;
pub mod error;
pub mod schema;
pub mod value;

pub use builder::*;
pub use check::*;
pub use column::*;
pub use error::*;
pub use schema::*;
pub use value::*;
