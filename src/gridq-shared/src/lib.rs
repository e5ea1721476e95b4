//! gridq-shared: Shared types and utilities for gridq crates
//!
//! This crate contains the common vocabulary used across the gridq
//! workspace: comparators, column data types, filter values, sort
//! directions, and the column catalog that the grammar parser consults
//! when resolving field tokens.
//!
//! # Features
//!
//! - **Common Result Type**: Standardized Result type alias
//! - **Comparator Set**: The closed set of filter comparators and their
//!   wire tokens
//! - **Typed Values**: Scalar and list filter values with date support
//! - **Column Catalog**: Ordered, case-aware column metadata lookup

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

/// Result type alias for gridq operations
pub type Result<T> = anyhow::Result<T>;

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Comparator tags and their classes
pub mod comparator;

/// Column metadata and the catalog used for field resolution
pub mod column;

/// Typed filter values and coercion
pub mod value;

pub use column::{ColumnCatalog, ColumnMeta, SortDirection};
pub use comparator::Comparator;
pub use value::{DataType, FilterValue, ScalarValue};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_info() {
        assert!(!VERSION.is_empty());
        assert!(VERSION.contains('.'));
    }
}
