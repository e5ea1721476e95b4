//! Serializer for the gridq filter grammar
//!
//! The exact inverse of the parser over well-formed trees: groups emit
//! `<condition>(<children>)`, items emit `[field].[comparator].[value]`
//! (no value segment for non-value comparators), siblings join with `,`.
//!
//! A value-list element containing a literal comma is unrepresentable on
//! the wire (`(a,b,c)` splits on every comma when parsed back), so such
//! trees do not round-trip exactly.

use crate::ast::{FilterItem, FilterRow};
use gridq_shared::{Comparator, FilterValue, ScalarValue};

/// Serialize filter rows into the compact grammar string.
///
/// Groups with no serializable children are elided entirely at any depth;
/// items that require an operand but have none are dropped.
pub fn serialize_rows(rows: &[FilterRow]) -> String {
    rows.iter()
        .filter_map(serialize_row)
        .collect::<Vec<_>>()
        .join(",")
}

fn serialize_row(row: &FilterRow) -> Option<String> {
    match row {
        FilterRow::Group(group) => {
            if group.children.is_empty() {
                return None;
            }
            let inner = serialize_rows(&group.children);
            // a group whose children all serialized to nothing is itself
            // elided, so `and()` never appears at any depth
            if inner.is_empty() {
                return None;
            }
            Some(format!("{}({})", group.condition.token(), inner))
        }
        FilterRow::Item(item) => serialize_item(item),
    }
}

fn serialize_item(item: &FilterItem) -> Option<String> {
    let field = item.wire_field();
    if !item.comparator.requires_value() {
        return Some(format!("[{}].[{}]", field, item.comparator.token()));
    }
    let value = item.value.as_ref()?;
    Some(format!(
        "[{}].[{}].[{}]",
        field,
        item.comparator.token(),
        encode_value(value, item.comparator)
    ))
}

/// Encode an operand into its wire token.
///
/// Lists always paren-wrap; a plain string containing a comma under a
/// selector comparator paren-wraps too, so it is not mistaken for sibling
/// rows when parsed back.
fn encode_value(value: &FilterValue, comparator: Comparator) -> String {
    match value {
        FilterValue::List(values) => {
            let joined = values
                .iter()
                .map(ScalarValue::encode)
                .collect::<Vec<_>>()
                .join(",");
            format!("({})", joined)
        }
        FilterValue::Scalar(scalar) => {
            let encoded = scalar.encode();
            if comparator.is_selector() && encoded.contains(',') {
                format!("({})", encoded)
            } else {
                encoded
            }
        }
    }
}
