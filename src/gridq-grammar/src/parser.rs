//! Parser implementation for the gridq filter grammar
//!
//! The nom grammar produces a borrowed raw tree; a second resolution pass
//! validates comparator tokens, resolves field tokens through the column
//! catalog, coerces operands, and assigns fresh ids and paths. The catalog
//! is threaded in explicitly so parses can never interfere with each
//! other.

use nom::{
    branch::alt,
    bytes::complete::{tag, take_while},
    character::complete::char,
    combinator::{all_consuming, map, opt},
    error::{VerboseError, VerboseErrorKind},
    multi::separated_list0,
    sequence::{delimited, preceded, tuple},
    IResult,
};

use crate::ast::{assign_paths, generate_id, Condition, FilterGroup, FilterItem, FilterRow};
use crate::error::{ParseError, Result};
use gridq_shared::{ColumnCatalog, Comparator, DataType, FilterValue};

type PResult<'a, T> = IResult<&'a str, T, VerboseError<&'a str>>;

/// Raw row as matched by the grammar, before catalog resolution
#[derive(Debug)]
enum RawRow<'a> {
    Group {
        condition: Condition,
        children: Vec<RawRow<'a>>,
    },
    Item {
        field: &'a str,
        comparator: &'a str,
        value: Option<&'a str>,
    },
}

/// Parser for filter strings, bound to a column catalog
pub struct FilterParser<'a> {
    catalog: &'a ColumnCatalog,
}

impl<'a> FilterParser<'a> {
    /// Create a parser resolving fields through the given catalog
    pub fn new(catalog: &'a ColumnCatalog) -> Self {
        Self { catalog }
    }

    /// Parse a filter string into filter rows.
    ///
    /// Empty groups (`and()`) parse but are dropped as no-ops. Row order
    /// is preserved as encountered. Ids are freshly generated and paths
    /// assigned from the root.
    pub fn parse(&self, input: &str) -> Result<Vec<FilterRow>> {
        let input = input.trim();
        if input.is_empty() {
            return Err(ParseError::EmptyInput);
        }

        let raw = match all_consuming(parse_rows)(input) {
            Ok((_, raw)) => raw,
            Err(e) => return Err(syntax_error(input, &e)),
        };

        let mut rows = Vec::with_capacity(raw.len());
        for raw_row in raw {
            if let Some(row) = self.resolve(raw_row)? {
                rows.push(row);
            }
        }
        assign_paths(&mut rows);
        Ok(rows)
    }

    fn resolve(&self, raw: RawRow<'_>) -> Result<Option<FilterRow>> {
        match raw {
            RawRow::Group {
                condition,
                children,
            } => {
                let mut resolved = Vec::with_capacity(children.len());
                for child in children {
                    if let Some(row) = self.resolve(child)? {
                        resolved.push(row);
                    }
                }
                if resolved.is_empty() {
                    log::debug!("dropping empty '{}' group", condition.token());
                    return Ok(None);
                }
                Ok(Some(FilterRow::Group(FilterGroup {
                    id: generate_id(),
                    path: String::new(),
                    condition,
                    children: resolved,
                })))
            }
            RawRow::Item {
                field,
                comparator,
                value,
            } => {
                let comparator = Comparator::from_token(comparator).ok_or_else(|| {
                    ParseError::UnknownComparator {
                        token: comparator.to_string(),
                    }
                })?;

                // Serialized items carry `filter_field ?? field`, so the
                // filter-field table shadows the field table on the way back.
                let meta = self.catalog.resolve(field);
                let data_type = meta.map(|m| m.data_type);
                let (field, filter_field) = match meta {
                    Some(m) => (m.field.clone(), m.filter_field.clone()),
                    None => (field.to_string(), None),
                };

                let value = if comparator.requires_value() {
                    value.map(|raw_value| {
                        decode_value(raw_value, comparator, data_type.unwrap_or_default())
                    })
                } else {
                    // non-value comparators ignore any stray operand
                    None
                };

                Ok(Some(FilterRow::Item(FilterItem {
                    id: generate_id(),
                    path: String::new(),
                    field,
                    filter_field,
                    comparator,
                    value,
                    data_type,
                })))
            }
        }
    }
}

/// Decode a raw value token under the given comparator and data type.
///
/// A paren-wrapped token under a selector comparator splits on `,` into a
/// value list; everything else coerces to a single scalar.
fn decode_value(raw: &str, comparator: Comparator, data_type: DataType) -> FilterValue {
    if comparator.is_selector() && raw.len() >= 2 && raw.starts_with('(') && raw.ends_with(')') {
        let inner = &raw[1..raw.len() - 1];
        FilterValue::List(inner.split(',').map(|v| data_type.coerce(v)).collect())
    } else {
        FilterValue::Scalar(data_type.coerce(raw))
    }
}

// Grammar functions using nom

/// Parse comma-separated rows
fn parse_rows(input: &str) -> PResult<'_, Vec<RawRow<'_>>> {
    separated_list0(char(','), parse_row)(input)
}

/// Parse a single row: group or item, decided by one token of lookahead
/// (items always start with `[`, groups with a condition keyword
/// immediately followed by `(`)
fn parse_row(input: &str) -> PResult<'_, RawRow<'_>> {
    alt((parse_group, parse_item))(input)
}

/// Parse a condition keyword (longest tokens first)
fn parse_condition(input: &str) -> PResult<'_, Condition> {
    alt((
        map(tag("not_and"), |_| Condition::NotAnd),
        map(tag("not_or"), |_| Condition::NotOr),
        map(tag("and"), |_| Condition::And),
        map(tag("or"), |_| Condition::Or),
    ))(input)
}

/// Parse a group: `<condition>(<rows>)`
fn parse_group(input: &str) -> PResult<'_, RawRow<'_>> {
    map(
        tuple((
            parse_condition,
            delimited(char('('), parse_rows, char(')')),
        )),
        |(condition, children)| RawRow::Group {
            condition,
            children,
        },
    )(input)
}

/// Parse a bracket-delimited token: `[...]`.
///
/// Bracket contents may contain commas, dots and parens; a literal `]` is
/// unrepresentable on the wire.
fn bracket_token(input: &str) -> PResult<'_, &str> {
    delimited(char('['), take_while(|c| c != ']'), char(']'))(input)
}

/// Parse an item: `[field].[comparator]` with an optional `.[value]`
fn parse_item(input: &str) -> PResult<'_, RawRow<'_>> {
    map(
        tuple((
            bracket_token,
            preceded(char('.'), bracket_token),
            opt(preceded(char('.'), bracket_token)),
        )),
        |(field, comparator, value)| RawRow::Item {
            field,
            comparator,
            value,
        },
    )(input)
}

/// Convert a nom error into a [`ParseError`] with a byte position
fn syntax_error(input: &str, err: &nom::Err<VerboseError<&str>>) -> ParseError {
    match err {
        nom::Err::Error(e) | nom::Err::Failure(e) => match e.errors.first() {
            Some((remaining, kind)) => {
                let position = input.len() - remaining.len();
                let message = match kind {
                    VerboseErrorKind::Char(c) => format!("expected '{}'", c),
                    VerboseErrorKind::Context(c) => format!("expected {}", c),
                    VerboseErrorKind::Nom(k) => k.description().to_string(),
                };
                ParseError::InvalidSyntax { message, position }
            }
            None => ParseError::General {
                message: "parse error".to_string(),
            },
        },
        nom::Err::Incomplete(_) => ParseError::General {
            message: "Incomplete input".to_string(),
        },
    }
}
