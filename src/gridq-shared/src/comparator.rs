//! Comparator tags for filter items
//!
//! A comparator determines how a filter value is matched against a column.
//! The wire token (lowercase snake_case) is part of the grammar's
//! compatibility surface, so the set is closed: an unrecognized token is a
//! fatal parse error, never a silently-invented comparator.

use std::fmt;

/// Comparison operator attached to a single filter item
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Comparator {
    /// Equal (`eq`)
    Eq,
    /// Not equal (`neq`)
    Neq,
    /// Greater than (`gt`)
    Gt,
    /// Greater than or equal (`gte`)
    Gte,
    /// Less than (`lt`)
    Lt,
    /// Less than or equal (`lte`)
    Lte,
    /// Substring match (`contains`)
    Contains,
    /// Negated substring match (`not_contains`)
    NotContains,
    /// Prefix match (`starts_with`)
    StartsWith,
    /// Suffix match (`ends_with`)
    EndsWith,
    /// Membership in a value list (`in`)
    In,
    /// Negated membership (`not_in`)
    NotIn,
    /// Value is empty; takes no operand (`is_empty`)
    IsEmpty,
    /// Value is not empty; takes no operand (`is_not_empty`)
    IsNotEmpty,
}

impl Comparator {
    /// All known comparators, in wire-token order
    pub const ALL: &'static [Comparator] = &[
        Comparator::Eq,
        Comparator::Neq,
        Comparator::Gt,
        Comparator::Gte,
        Comparator::Lt,
        Comparator::Lte,
        Comparator::Contains,
        Comparator::NotContains,
        Comparator::StartsWith,
        Comparator::EndsWith,
        Comparator::In,
        Comparator::NotIn,
        Comparator::IsEmpty,
        Comparator::IsNotEmpty,
    ];

    /// The lowercase wire token used in serialized filter strings
    pub fn token(&self) -> &'static str {
        match self {
            Comparator::Eq => "eq",
            Comparator::Neq => "neq",
            Comparator::Gt => "gt",
            Comparator::Gte => "gte",
            Comparator::Lt => "lt",
            Comparator::Lte => "lte",
            Comparator::Contains => "contains",
            Comparator::NotContains => "not_contains",
            Comparator::StartsWith => "starts_with",
            Comparator::EndsWith => "ends_with",
            Comparator::In => "in",
            Comparator::NotIn => "not_in",
            Comparator::IsEmpty => "is_empty",
            Comparator::IsNotEmpty => "is_not_empty",
        }
    }

    /// Look up a comparator from its wire token
    pub fn from_token(token: &str) -> Option<Self> {
        Comparator::ALL.iter().copied().find(|c| c.token() == token)
    }

    /// Whether this comparator carries an operand on the wire.
    ///
    /// `is_empty`/`is_not_empty` serialize as `[field].[comparator]` with
    /// no value segment at all.
    pub fn requires_value(&self) -> bool {
        !matches!(self, Comparator::IsEmpty | Comparator::IsNotEmpty)
    }

    /// Whether this comparator selects from a value list.
    ///
    /// Selector comparators encode their operand as `(v1,v2,v3)` and a
    /// plain string operand containing a comma is paren-wrapped too.
    pub fn is_selector(&self) -> bool {
        matches!(self, Comparator::In | Comparator::NotIn)
    }
}

impl fmt::Display for Comparator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.token())
    }
}
