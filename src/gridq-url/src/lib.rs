//! gridq-url: query-string extraction for grid state
//!
//! This crate reads grid state out of a query-string-like source — a live
//! URL or a persisted layout schema — and writes it back. The recognized
//! parameters are:
//!
//! - `order`: sorting, `(field1.asc,field2.desc)`
//! - `filters`: per-column filters in the filter grammar
//! - `qb`: the query-builder tree in the filter grammar
//! - `select`: visible columns, a comma-separated field list or `*`
//! - `skip` / `take`: pagination integers, defaulting to 0
//!
//! The five extractions are independent of each other and of parameter
//! order within the query string.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![allow(
    clippy::missing_errors_doc,
    clippy::module_name_repetitions,
    clippy::must_use_candidate,
    clippy::doc_markdown,
    clippy::uninlined_format_args
)]

use gridq_grammar::{serialize_rows, FilterParser, FilterRow, ParseError};
use gridq_shared::{ColumnCatalog, SortDirection};

/// Result type for URL operations
pub type Result<T> = std::result::Result<T, Error>;

/// URL extraction error type
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A filter-grammar parameter failed to parse
    #[error("Invalid '{key}' parameter: {source}")]
    Filter {
        /// The offending query-string key
        key: &'static str,
        /// The underlying grammar error
        #[source]
        source: ParseError,
    },
}

/// Query-string key for sorting
pub const KEY_ORDER: &str = "order";
/// Query-string key for per-column filters
pub const KEY_FILTERS: &str = "filters";
/// Query-string key for the query-builder tree
pub const KEY_QUERY_BUILDER: &str = "qb";
/// Query-string key for visible-column selection
pub const KEY_SELECT: &str = "select";
/// Query-string key for the pagination offset
pub const KEY_SKIP: &str = "skip";
/// Query-string key for the pagination page size
pub const KEY_TAKE: &str = "take";

/// One entry of the `order` parameter
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct SortEntry {
    /// Field being sorted
    pub field: String,
    /// Direction of the sort
    pub direction: SortDirection,
}

/// Visible-column selection from the `select` parameter
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ColumnSelection {
    /// `select=*`: every interactive, non-helper column in definition order
    All,
    /// Explicit field list defining both the visible set and its order
    Fields(Vec<String>),
}

/// Pagination window, zero-defaulted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, serde::Serialize)]
pub struct Pagination {
    /// Rows to skip
    pub skip: usize,
    /// Rows to take (0 means unset)
    pub take: usize,
}

/// Everything extractable from one query-string source
#[derive(Debug, Clone, Default, serde::Serialize)]
pub struct UrlData {
    /// Sort entries, in parameter order
    pub sort: Vec<SortEntry>,
    /// Per-column filters (`filters` key)
    pub filters: Vec<FilterRow>,
    /// Query-builder tree (`qb` key)
    pub query_builder: Vec<FilterRow>,
    /// Visible-column selection, `None` when the source has no `select`
    pub visible_columns: Option<ColumnSelection>,
    /// Pagination window
    pub pagination: Pagination,
}

impl UrlData {
    /// Whether this source carries any grid state worth applying.
    ///
    /// Pagination alone does not count: a bare `skip`/`take` never makes a
    /// source win reconciliation.
    pub fn has_content(&self) -> bool {
        !self.sort.is_empty()
            || !self.filters.is_empty()
            || !self.query_builder.is_empty()
            || self.visible_columns.is_some()
    }
}

/// Extract grid state from a query string (a leading `?` is tolerated).
///
/// Unrecognized parameters are ignored. Filter parameters go through the
/// grammar parser with the given catalog and fail fast on grammar errors;
/// everything else degrades silently to its default.
pub fn extract(query: &str, catalog: &ColumnCatalog) -> Result<UrlData> {
    let query = query.strip_prefix('?').unwrap_or(query);
    let mut data = UrlData::default();

    for (key, value) in url::form_urlencoded::parse(query.as_bytes()) {
        match key.as_ref() {
            KEY_ORDER => data.sort = parse_sort(&value),
            KEY_SELECT => data.visible_columns = Some(parse_selection(&value)),
            KEY_SKIP => data.pagination.skip = parse_count(&value),
            KEY_TAKE => data.pagination.take = parse_count(&value),
            KEY_FILTERS => data.filters = parse_filter_param(KEY_FILTERS, &value, catalog)?,
            KEY_QUERY_BUILDER => {
                data.query_builder = parse_filter_param(KEY_QUERY_BUILDER, &value, catalog)?;
            }
            _ => {}
        }
    }

    Ok(data)
}

/// Write grid state back into a form-encoded query string.
///
/// Empty extractions are omitted, so `extract(write_query(d))` sees the
/// same content as `d`.
pub fn write_query(data: &UrlData) -> String {
    let mut serializer = url::form_urlencoded::Serializer::new(String::new());

    if !data.sort.is_empty() {
        serializer.append_pair(KEY_ORDER, &write_sort(&data.sort));
    }
    let filters = serialize_rows(&data.filters);
    if !filters.is_empty() {
        serializer.append_pair(KEY_FILTERS, &filters);
    }
    let query_builder = serialize_rows(&data.query_builder);
    if !query_builder.is_empty() {
        serializer.append_pair(KEY_QUERY_BUILDER, &query_builder);
    }
    if let Some(selection) = &data.visible_columns {
        serializer.append_pair(KEY_SELECT, &write_selection(selection));
    }
    if data.pagination.skip > 0 {
        serializer.append_pair(KEY_SKIP, &data.pagination.skip.to_string());
    }
    if data.pagination.take > 0 {
        serializer.append_pair(KEY_TAKE, &data.pagination.take.to_string());
    }

    serializer.finish()
}

/// Parse the `order` parameter: `(field1.asc,field2.desc)`.
///
/// Entries with an unrecognized direction, or no direction at all, are
/// silently dropped rather than failing the extraction.
pub fn parse_sort(raw: &str) -> Vec<SortEntry> {
    let raw = raw.trim();
    let raw = raw
        .strip_prefix('(')
        .and_then(|r| r.strip_suffix(')'))
        .unwrap_or(raw);

    raw.split(',')
        .filter_map(|token| {
            let token = token.trim();
            if token.is_empty() {
                return None;
            }
            let Some((field, direction)) = token.rsplit_once('.') else {
                log::debug!("dropping sort entry without direction: '{}'", token);
                return None;
            };
            match SortDirection::from_token(direction) {
                Some(direction) => Some(SortEntry {
                    field: field.to_string(),
                    direction,
                }),
                None => {
                    log::debug!("dropping sort entry with unknown direction: '{}'", token);
                    None
                }
            }
        })
        .collect()
}

/// Write sort entries as the `order` parameter value
pub fn write_sort(entries: &[SortEntry]) -> String {
    let joined = entries
        .iter()
        .map(|e| format!("{}.{}", e.field, e.direction.token()))
        .collect::<Vec<_>>()
        .join(",");
    format!("({})", joined)
}

fn parse_selection(raw: &str) -> ColumnSelection {
    let raw = raw.trim();
    if raw == "*" {
        return ColumnSelection::All;
    }
    ColumnSelection::Fields(
        raw.split(',')
            .map(str::trim)
            .filter(|f| !f.is_empty())
            .map(str::to_string)
            .collect(),
    )
}

fn write_selection(selection: &ColumnSelection) -> String {
    match selection {
        ColumnSelection::All => "*".to_string(),
        ColumnSelection::Fields(fields) => fields.join(","),
    }
}

fn parse_count(raw: &str) -> usize {
    raw.trim().parse::<usize>().unwrap_or(0)
}

fn parse_filter_param(
    key: &'static str,
    value: &str,
    catalog: &ColumnCatalog,
) -> Result<Vec<FilterRow>> {
    if value.trim().is_empty() {
        return Ok(Vec::new());
    }
    FilterParser::new(catalog)
        .parse(value)
        .map_err(|source| Error::Filter { key, source })
}

#[cfg(test)]
mod tests {
    use super::*;
    use gridq_shared::{ColumnMeta, DataType, FilterValue};
    use pretty_assertions::assert_eq;

    fn test_catalog() -> ColumnCatalog {
        ColumnCatalog::from_metas(
            [
                ColumnMeta::new("age").with_data_type(DataType::Number),
                ColumnMeta::new("name"),
                ColumnMeta::new("created").with_data_type(DataType::Date),
            ],
            false,
        )
    }

    #[test]
    fn test_pagination_defaults_to_zero() {
        let data = extract("", &test_catalog()).unwrap();
        assert_eq!(data.pagination, Pagination { skip: 0, take: 0 });
        assert!(!data.has_content());

        // unparsable integers degrade to zero too
        let data = extract("skip=abc&take=-5", &test_catalog()).unwrap();
        assert_eq!(data.pagination, Pagination { skip: 0, take: 0 });
    }

    #[test]
    fn test_pagination_values() {
        let data = extract("skip=40&take=20", &test_catalog()).unwrap();
        assert_eq!(data.pagination, Pagination { skip: 40, take: 20 });
        // pagination alone is not content
        assert!(!data.has_content());
    }

    #[test]
    fn test_sort_extraction() {
        let data = extract("order=(age.asc,name.desc)", &test_catalog()).unwrap();
        assert_eq!(
            data.sort,
            vec![
                SortEntry {
                    field: "age".to_string(),
                    direction: SortDirection::Asc
                },
                SortEntry {
                    field: "name".to_string(),
                    direction: SortDirection::Desc
                },
            ]
        );
        assert!(data.has_content());
    }

    #[test]
    fn test_sort_unknown_direction_dropped() {
        let entries = parse_sort("(age.upwards,name.desc,created)");
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].field, "name");
    }

    #[test]
    fn test_sort_without_parens() {
        let entries = parse_sort("age.asc");
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].field, "age");
    }

    #[test]
    fn test_select_star_and_list() {
        let data = extract("select=*", &test_catalog()).unwrap();
        assert_eq!(data.visible_columns, Some(ColumnSelection::All));

        let data = extract("select=name,age", &test_catalog()).unwrap();
        assert_eq!(
            data.visible_columns,
            Some(ColumnSelection::Fields(vec![
                "name".to_string(),
                "age".to_string()
            ]))
        );
    }

    #[test]
    fn test_filters_and_query_builder_are_separate() {
        let data = extract(
            "filters=[age].[gt].[18]&qb=and([name].[contains].[bob])",
            &test_catalog(),
        )
        .unwrap();
        assert_eq!(data.filters.len(), 1);
        assert_eq!(data.query_builder.len(), 1);
        assert_eq!(
            data.filters[0].as_item().unwrap().value,
            Some(FilterValue::int(18))
        );
        assert!(data.query_builder[0].as_group().is_some());
    }

    #[test]
    fn test_parameter_order_does_not_matter() {
        let a = extract("order=(age.asc)&filters=[age].[gt].[1]", &test_catalog()).unwrap();
        let b = extract("filters=[age].[gt].[1]&order=(age.asc)", &test_catalog()).unwrap();
        assert_eq!(a.sort, b.sort);
        // ids differ between parses; compare structurally
        assert!(gridq_grammar::rows_eq_ignoring_ids(&a.filters, &b.filters));
    }

    #[test]
    fn test_bad_filter_parameter_fails() {
        let err = extract("filters=[age].[bogus].[1]", &test_catalog()).unwrap_err();
        assert!(matches!(err, Error::Filter { key: KEY_FILTERS, .. }));

        let err = extract("qb=garbage", &test_catalog()).unwrap_err();
        assert!(matches!(err, Error::Filter { key: KEY_QUERY_BUILDER, .. }));
    }

    #[test]
    fn test_leading_question_mark_tolerated() {
        let data = extract("?select=*&skip=10", &test_catalog()).unwrap();
        assert_eq!(data.visible_columns, Some(ColumnSelection::All));
        assert_eq!(data.pagination.skip, 10);
    }

    #[test]
    fn test_write_query_round_trip() {
        let catalog = test_catalog();
        let data = extract(
            "order=(age.desc)&filters=[age].[gte].[21]&select=name,age&skip=40&take=20",
            &catalog,
        )
        .unwrap();

        let written = write_query(&data);
        let reread = extract(&written, &catalog).unwrap();

        assert_eq!(reread.sort, data.sort);
        assert_eq!(reread.visible_columns, data.visible_columns);
        assert_eq!(reread.pagination, data.pagination);
        assert!(gridq_grammar::rows_eq_ignoring_ids(
            &reread.filters,
            &data.filters
        ));
    }

    #[test]
    fn test_write_query_omits_empty_extractions() {
        let data = UrlData::default();
        assert_eq!(write_query(&data), "");
    }
}
