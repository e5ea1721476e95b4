//! gridq-grammar: Parser and serializer for the gridq filter grammar
//!
//! This crate implements the compact filter grammar used in URL query
//! parameters and persisted grid layouts, converting between strings and
//! a filter-row AST using the nom parser combinator library.
//!
//! # Grammar
//!
//! ```text
//! rows  := row (',' row)*
//! row   := group | item
//! group := condition '(' rows? ')'        condition in {and, or, not_and, not_or}
//! item  := '[' field ']' '.' '[' comparator ']' ( '.' '[' value ']' )?
//! ```
//!
//! Items always begin with `[` and groups with a condition keyword
//! followed immediately by `(`, so the group/item boundary is decided by
//! one token of lookahead. Value lists encode as `(v1,v2,v3)`.
//!
//! # Quick Start
//!
//! ```rust
//! use gridq_grammar::{serialize_rows, FilterParser};
//! use gridq_shared::{ColumnCatalog, ColumnMeta, DataType};
//!
//! let catalog = ColumnCatalog::from_metas(
//!     [ColumnMeta::new("age").with_data_type(DataType::Number)],
//!     false,
//! );
//! let parser = FilterParser::new(&catalog);
//! let rows = parser.parse("and([age].[gt].[18])")?;
//! assert_eq!(serialize_rows(&rows), "and([age].[gt].[18])");
//! # Ok::<(), gridq_grammar::ParseError>(())
//! ```
//!
//! # Error Handling
//!
//! An unrecognized comparator token is fatal: it indicates corruption or
//! a serializer/parser version mismatch and must not silently produce a
//! wrong filter. Syntax errors carry a byte position into the input.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![allow(
    clippy::missing_errors_doc,
    clippy::missing_panics_doc,
    clippy::module_name_repetitions,
    clippy::must_use_candidate,
    clippy::doc_markdown,
    clippy::uninlined_format_args
)]

pub mod ast;
pub mod error;
mod parser;
mod serialize;

// Re-export main types
pub use ast::*;
pub use error::*;
pub use parser::*;
pub use serialize::*;

// Re-export shared types
pub use gridq_shared::VERSION;
