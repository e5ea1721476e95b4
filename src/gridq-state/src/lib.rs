//! gridq-state: column transformation and state reconciliation
//!
//! This crate turns extracted query-string state into concrete grid state.
//! It owns the [`Column`] model (visibility, ordering, sorting, per-column
//! filters), the [`reconcile`] operation that decides whether a live URL or
//! a persisted layout schema drives that state, the query-builder merge of
//! column filters, and the persisted [`Layout`] record.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![allow(
    clippy::missing_errors_doc,
    clippy::module_name_repetitions,
    clippy::must_use_candidate,
    clippy::doc_markdown,
    clippy::uninlined_format_args
)]

pub mod columns;
pub mod layout;
pub mod reconcile;

pub use columns::{Column, Modifiers, FALLBACK_ORDER, HELPER_ORDER};
pub use layout::Layout;
pub use reconcile::{
    default_query_builder, merge_column_filters, reconcile, ReconcileInput, Reconciled,
    SourceChoice, COLUMN_FILTERS_GROUP_ID,
};

pub use gridq_shared::VERSION;
