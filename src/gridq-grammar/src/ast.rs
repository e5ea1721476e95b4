//! Filter-row AST for the gridq filter grammar
//!
//! A filter tree is a list of rows; each row is either a group (a logical
//! condition over child rows) or an item (one leaf predicate). The union
//! is an explicit tagged enum — nothing discriminates on field presence.

use gridq_shared::{Comparator, DataType, FilterValue};
use std::fmt;

/// Logical condition combining a group's children
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Condition {
    /// All children must match (`and`)
    And,
    /// Any child must match (`or`)
    Or,
    /// Negated conjunction (`not_and`)
    NotAnd,
    /// Negated disjunction (`not_or`)
    NotOr,
}

impl Condition {
    /// All known conditions
    pub const ALL: &'static [Condition] =
        &[Condition::And, Condition::Or, Condition::NotAnd, Condition::NotOr];

    /// The lowercase wire token
    pub fn token(&self) -> &'static str {
        match self {
            Condition::And => "and",
            Condition::Or => "or",
            Condition::NotAnd => "not_and",
            Condition::NotOr => "not_or",
        }
    }

    /// Look up a condition from its wire token
    pub fn from_token(token: &str) -> Option<Self> {
        Condition::ALL.iter().copied().find(|c| c.token() == token)
    }
}

impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.token())
    }
}

/// A logical grouping of child rows
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct FilterGroup {
    /// Generated row id, unique within a tree but not stable across parses
    pub id: String,
    /// Position of this row in the tree, e.g. `"0.children.2"`.
    /// Always derivable by walking from the root; recomputed via
    /// [`assign_paths`] after any structural change, never self-healed.
    pub path: String,
    /// Condition combining the children
    pub condition: Condition,
    /// Owned child rows
    pub children: Vec<FilterRow>,
}

impl FilterGroup {
    /// Create an empty group with a fresh id and unassigned path
    pub fn new(condition: Condition) -> Self {
        FilterGroup {
            id: generate_id(),
            path: String::new(),
            condition,
            children: Vec::new(),
        }
    }
}

/// One leaf predicate
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct FilterItem {
    /// Generated row id, unique within a tree but not stable across parses
    pub id: String,
    /// Position of this row in the tree, see [`FilterGroup::path`]
    pub path: String,
    /// Canonical field name of the targeted column
    pub field: String,
    /// Dedicated filter field, when the column filters under a different
    /// key than it displays; this is what appears on the wire
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filter_field: Option<String>,
    /// How the value is matched
    pub comparator: Comparator,
    /// Operand; absent for non-value comparators
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<FilterValue>,
    /// Data type of the resolved column, when known
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_type: Option<DataType>,
}

impl FilterItem {
    /// Create an item with a fresh id and unassigned path
    pub fn new(field: impl Into<String>, comparator: Comparator) -> Self {
        FilterItem {
            id: generate_id(),
            path: String::new(),
            field: field.into(),
            filter_field: None,
            comparator,
            value: None,
            data_type: None,
        }
    }

    /// Set the operand
    pub fn with_value(mut self, value: FilterValue) -> Self {
        self.value = Some(value);
        self
    }

    /// Set the data type
    pub fn with_data_type(mut self, data_type: DataType) -> Self {
        self.data_type = Some(data_type);
        self
    }

    /// The field token that appears on the wire
    pub fn wire_field(&self) -> &str {
        self.filter_field.as_deref().unwrap_or(&self.field)
    }

    /// Whether an item targets the given column key through either its
    /// field or its filter field (exact comparison; callers needing
    /// case-insensitive matching normalize through the column catalog)
    pub fn targets(&self, key: &str) -> bool {
        self.field == key || self.filter_field.as_deref() == Some(key)
    }
}

/// A row of a filter tree: group or item
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FilterRow {
    /// Logical grouping of child rows
    Group(FilterGroup),
    /// Leaf predicate
    Item(FilterItem),
}

impl FilterRow {
    /// The row's generated id
    pub fn id(&self) -> &str {
        match self {
            FilterRow::Group(group) => &group.id,
            FilterRow::Item(item) => &item.id,
        }
    }

    /// The row's tree path
    pub fn path(&self) -> &str {
        match self {
            FilterRow::Group(group) => &group.path,
            FilterRow::Item(item) => &item.path,
        }
    }

    /// Borrow the group, if this row is one
    pub fn as_group(&self) -> Option<&FilterGroup> {
        match self {
            FilterRow::Group(group) => Some(group),
            FilterRow::Item(_) => None,
        }
    }

    /// Borrow the item, if this row is one
    pub fn as_item(&self) -> Option<&FilterItem> {
        match self {
            FilterRow::Item(item) => Some(item),
            FilterRow::Group(_) => None,
        }
    }

    /// Structural equality, ignoring generated `id` and `path` fields.
    ///
    /// Ids are regenerated on every parse, so the round-trip guarantee is
    /// `parse(serialize(tree))` equals `tree` under this comparison, not
    /// under `==`.
    pub fn eq_ignoring_ids(&self, other: &FilterRow) -> bool {
        match (self, other) {
            (FilterRow::Group(a), FilterRow::Group(b)) => {
                a.condition == b.condition
                    && a.children.len() == b.children.len()
                    && a.children
                        .iter()
                        .zip(&b.children)
                        .all(|(x, y)| x.eq_ignoring_ids(y))
            }
            (FilterRow::Item(a), FilterRow::Item(b)) => {
                a.field == b.field
                    && a.filter_field == b.filter_field
                    && a.comparator == b.comparator
                    && a.value == b.value
                    && a.data_type == b.data_type
            }
            _ => false,
        }
    }
}

/// Structural equality over row lists, ignoring ids and paths
pub fn rows_eq_ignoring_ids(a: &[FilterRow], b: &[FilterRow]) -> bool {
    a.len() == b.len() && a.iter().zip(b).all(|(x, y)| x.eq_ignoring_ids(y))
}

/// Generate a fresh row id
pub fn generate_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

/// Recompute every row's `path` from its position in the tree.
///
/// Top-level rows get their index (`"0"`, `"1"`, ...); a child of a group
/// at `p` gets `"{p}.children.{index}"`.
pub fn assign_paths(rows: &mut [FilterRow]) {
    for (index, row) in rows.iter_mut().enumerate() {
        assign_row_path(row, index.to_string());
    }
}

fn assign_row_path(row: &mut FilterRow, path: String) {
    match row {
        FilterRow::Item(item) => item.path = path,
        FilterRow::Group(group) => {
            for (index, child) in group.children.iter_mut().enumerate() {
                assign_row_path(child, format!("{}.children.{}", path, index));
            }
            group.path = path;
        }
    }
}
