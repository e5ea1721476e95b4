//! The grid column model
//!
//! A [`Column`] wraps the shared [`ColumnMeta`] with the mutable state the
//! grid owns: visibility, display order, sorting, and the predefined and
//! applied per-column filters. Reconciliation (see [`crate::reconcile`])
//! rewrites that state from a URL or schema source.

use gridq_grammar::FilterItem;
use gridq_shared::{ColumnMeta, SortDirection};

/// Display order pinning helper columns ahead of everything else
pub const HELPER_ORDER: i64 = -1000;

/// Fallback display order for columns not placed by a selection.
///
/// Unmatched columns sort between helpers and the selected set instead of
/// jumping around when the selection changes.
pub const FALLBACK_ORDER: i64 = -1;

/// One grid column and its reconcilable state
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Column {
    /// Shared identity and typing
    #[serde(flatten)]
    pub meta: ColumnMeta,
    /// Helper columns (selection checkboxes, action buttons) are always
    /// visible, pinned first, and never sortable or filterable
    pub helper: bool,
    /// Whether the column participates in selection, sorting, filtering
    pub interactive: bool,
    /// Whether the column is currently hidden
    pub hidden: bool,
    /// Current sort direction, if the column is sorted
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sort: Option<SortDirection>,
    /// Position of this column within the active multi-sort
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sort_order: Option<usize>,
    /// Display position; see [`HELPER_ORDER`] and [`FALLBACK_ORDER`]
    pub display_order: i64,
    /// Filters baked into the column definition; their values can be
    /// overridden by incoming filters but the rows themselves persist
    pub predefined_filters: Vec<FilterItem>,
    /// Filters applied from the reconciled source, editable by the user
    pub applied_filters: Vec<FilterItem>,
}

impl Column {
    /// Create an interactive, visible column
    pub fn new(meta: ColumnMeta) -> Self {
        Column {
            meta,
            helper: false,
            interactive: true,
            hidden: false,
            sort: None,
            sort_order: None,
            display_order: FALLBACK_ORDER,
            predefined_filters: Vec::new(),
            applied_filters: Vec::new(),
        }
    }

    /// Create a helper column: always visible, never interactive
    pub fn helper(meta: ColumnMeta) -> Self {
        Column {
            helper: true,
            interactive: false,
            display_order: HELPER_ORDER,
            ..Column::new(meta)
        }
    }

    /// Mark the column non-interactive
    pub fn non_interactive(mut self) -> Self {
        self.interactive = false;
        self
    }

    /// Attach a predefined filter
    pub fn with_predefined_filter(mut self, item: FilterItem) -> Self {
        self.predefined_filters.push(item);
        self
    }

    /// Canonical field name
    pub fn field(&self) -> &str {
        &self.meta.field
    }
}

/// Behavior switches threaded through reconciliation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Modifiers {
    /// Whether URL state may drive the grid at all
    pub use_url: bool,
    /// Case-insensitive field matching throughout
    pub case_insensitive: bool,
}

impl Modifiers {
    /// Compare two field tokens under the active case rule
    pub fn fields_match(&self, a: &str, b: &str) -> bool {
        if self.case_insensitive {
            a.to_lowercase() == b.to_lowercase()
        } else {
            a == b
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gridq_shared::DataType;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_new_column_defaults() {
        let column = Column::new(ColumnMeta::new("age").with_data_type(DataType::Number));
        assert!(column.interactive);
        assert!(!column.helper);
        assert!(!column.hidden);
        assert_eq!(column.display_order, FALLBACK_ORDER);
        assert_eq!(column.sort, None);
    }

    #[test]
    fn test_helper_column_is_pinned_and_passive() {
        let column = Column::helper(ColumnMeta::new("select_all"));
        assert!(column.helper);
        assert!(!column.interactive);
        assert_eq!(column.display_order, HELPER_ORDER);
    }

    #[test]
    fn test_field_matching_respects_case_modifier() {
        let sensitive = Modifiers::default();
        assert!(!sensitive.fields_match("Age", "age"));

        let insensitive = Modifiers {
            case_insensitive: true,
            ..Modifiers::default()
        };
        assert!(insensitive.fields_match("Age", "age"));
    }
}
