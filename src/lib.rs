//! gridq: filter grammar, URL state, and column reconciliation for grids
//!
//! This facade crate re-exports the workspace members:
//!
//! - [`shared`] — comparators, data types, values, column metadata
//! - [`grammar`] — the filter-expression parser and serializer
//! - [`url`] — query-string extraction and writing
//! - [`state`] — column transformation, reconciliation, layouts
//!
//! ```
//! use gridq::shared::{ColumnCatalog, ColumnMeta, DataType};
//! use gridq::grammar::FilterParser;
//!
//! let catalog = ColumnCatalog::from_metas(
//!     [ColumnMeta::new("age").with_data_type(DataType::Number)],
//!     false,
//! );
//! let rows = FilterParser::new(&catalog)
//!     .parse("and([age].[gt].[18])")
//!     .unwrap();
//! assert_eq!(rows.len(), 1);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub use gridq_grammar as grammar;
pub use gridq_shared as shared;
pub use gridq_state as state;
pub use gridq_url as url;

pub use gridq_shared::VERSION;
