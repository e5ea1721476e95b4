//! URL-versus-schema reconciliation
//!
//! A grid can be driven by two query-string sources at once: the live URL
//! and a persisted layout schema. [`reconcile`] picks exactly one winner
//! and rewrites column state from it. Precedence is fixed: the URL wins
//! when it is allowed, enabled by [`Modifiers::use_url`], and actually
//! carries content; otherwise an allowed schema with content wins;
//! otherwise nothing is applied.
//!
//! Applying the same source twice yields the same state: every pass
//! rewrites visibility, ordering, sorting, and applied filters from
//! scratch rather than accumulating onto the previous pass.

use crate::columns::{Column, Modifiers, FALLBACK_ORDER, HELPER_ORDER};
use gridq_grammar::{assign_paths, Condition, FilterGroup, FilterItem, FilterRow};
use gridq_url::{ColumnSelection, SortEntry, UrlData};

/// Id of the query-builder group holding merged per-column filters
pub const COLUMN_FILTERS_GROUP_ID: &str = "column_filters";

/// Which source won reconciliation
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceChoice {
    /// The live URL drove the grid state
    UrlWins,
    /// The persisted schema drove the grid state
    SchemaWins,
    /// Neither source carried content; columns passed through untouched
    NoData,
}

/// The two candidate sources and the policy switches for one reconcile pass
#[derive(Debug, Clone, Copy)]
pub struct ReconcileInput<'a> {
    /// State extracted from the live URL, if any
    pub url: Option<&'a UrlData>,
    /// State extracted from the persisted layout schema, if any
    pub schema: Option<&'a UrlData>,
    /// Whether URL state is allowed to drive this grid
    pub allow_url: bool,
    /// Whether schema state is allowed to drive this grid
    pub allow_schema: bool,
    /// Behavior switches
    pub modifiers: Modifiers,
}

/// The outcome of one reconcile pass
#[derive(Debug, Clone)]
pub struct Reconciled {
    /// Columns with visibility, ordering, sorting, and filters rewritten
    pub columns: Vec<Column>,
    /// The active query-builder tree; never empty
    pub query_builder: Vec<FilterRow>,
    /// Which source won
    pub source: SourceChoice,
}

/// Decide which source drives the grid, without applying it
pub fn select_source(input: &ReconcileInput<'_>) -> SourceChoice {
    if input.allow_url
        && input.modifiers.use_url
        && input.url.is_some_and(UrlData::has_content)
    {
        SourceChoice::UrlWins
    } else if input.allow_schema && input.schema.is_some_and(UrlData::has_content) {
        SourceChoice::SchemaWins
    } else {
        SourceChoice::NoData
    }
}

/// Reconcile column state against the winning source.
///
/// With no winning source the columns pass through unchanged and the
/// query builder falls back to [`default_query_builder`].
pub fn reconcile(mut columns: Vec<Column>, input: &ReconcileInput<'_>) -> Reconciled {
    let source = select_source(input);
    log::debug!("reconciling grid state, source {:?}", source);

    let data = match source {
        SourceChoice::UrlWins => input.url,
        SourceChoice::SchemaWins => input.schema,
        SourceChoice::NoData => None,
    };

    let query_builder = match data {
        Some(data) => {
            apply_selection(&mut columns, data.visible_columns.as_ref(), input.modifiers);
            apply_sort(&mut columns, &data.sort, input.modifiers);
            apply_filters(&mut columns, &data.filters, input.modifiers);
            if data.query_builder.is_empty() {
                default_query_builder()
            } else {
                data.query_builder.clone()
            }
        }
        None => default_query_builder(),
    };

    Reconciled {
        columns,
        query_builder,
        source,
    }
}

/// The query builder shown before anything is applied: one empty `and`
/// group at path `"0"`
pub fn default_query_builder() -> Vec<FilterRow> {
    let mut rows = vec![FilterRow::Group(FilterGroup::new(Condition::And))];
    assign_paths(&mut rows);
    rows
}

/// Replace the per-column-filter group inside a query-builder tree.
///
/// Merged column filters live in a single top-level `and` group with the
/// fixed id [`COLUMN_FILTERS_GROUP_ID`]. The group is replaced wholesale
/// on every merge (removed entirely when `items` is empty) and paths are
/// reassigned afterwards, so repeated merges never accumulate.
pub fn merge_column_filters(query_builder: &mut Vec<FilterRow>, items: Vec<FilterItem>) {
    query_builder.retain(|row| row.id() != COLUMN_FILTERS_GROUP_ID);
    if !items.is_empty() {
        query_builder.push(FilterRow::Group(FilterGroup {
            id: COLUMN_FILTERS_GROUP_ID.to_string(),
            path: String::new(),
            condition: Condition::And,
            children: items.into_iter().map(FilterRow::Item).collect(),
        }));
    }
    assign_paths(query_builder);
}

/// Rewrite visibility and display order from a `select` extraction.
///
/// Helper columns stay visible and pinned first regardless of the
/// selection. With `select=*`, interactive columns show in definition
/// order; an explicit field list defines both membership and order.
/// Unplaced columns get [`FALLBACK_ORDER`]. The final sort is stable, so
/// unplaced columns keep their relative definition order.
fn apply_selection(
    columns: &mut [Column],
    selection: Option<&ColumnSelection>,
    modifiers: Modifiers,
) {
    let Some(selection) = selection else {
        return;
    };

    for (definition_index, column) in columns.iter_mut().enumerate() {
        if column.helper {
            column.hidden = false;
            column.display_order = HELPER_ORDER;
            continue;
        }
        match selection {
            ColumnSelection::All => {
                column.hidden = !column.interactive;
                column.display_order = if column.interactive {
                    definition_index as i64
                } else {
                    FALLBACK_ORDER
                };
            }
            ColumnSelection::Fields(fields) => {
                let position = fields
                    .iter()
                    .position(|field| modifiers.fields_match(field, column.field()));
                match position {
                    Some(index) => {
                        column.hidden = false;
                        column.display_order = index as i64;
                    }
                    None => {
                        column.hidden = true;
                        column.display_order = FALLBACK_ORDER;
                    }
                }
            }
        }
    }

    columns.sort_by_key(|column| column.display_order);
}

/// Rewrite per-column sort state from an `order` extraction.
///
/// Columns without a matching entry have their sort cleared, so a
/// previously applied sort never survives a source that dropped it.
fn apply_sort(columns: &mut [Column], entries: &[SortEntry], modifiers: Modifiers) {
    for column in columns.iter_mut() {
        let found = entries
            .iter()
            .enumerate()
            .find(|(_, entry)| modifiers.fields_match(&entry.field, column.field()));
        match found {
            Some((index, entry)) => {
                column.sort = Some(entry.direction);
                column.sort_order = Some(index);
            }
            None => {
                column.sort = None;
                column.sort_order = None;
            }
        }
    }
}

/// Rewrite per-column filters from a `filters` extraction.
///
/// Incoming items are routed to the column whose field or filter field
/// they target. When an incoming item's comparator matches a predefined
/// filter, the predefined row takes the incoming value and the item
/// leaves the editable set, so fixed filters keep their position while
/// still reflecting the source.
fn apply_filters(columns: &mut [Column], rows: &[FilterRow], modifiers: Modifiers) {
    let items = collect_items(rows);
    for column in columns.iter_mut() {
        let mut incoming: Vec<FilterItem> = items
            .iter()
            .filter(|item| targets_column(item, column, modifiers))
            .map(|item| (*item).clone())
            .collect();

        for predefined in &mut column.predefined_filters {
            let matched = incoming
                .iter()
                .position(|item| item.comparator == predefined.comparator);
            if let Some(position) = matched {
                let item = incoming.remove(position);
                if let Some(value) = item.value {
                    predefined.value = Some(value);
                }
            }
        }

        column.applied_filters = incoming;
    }
}

/// Flatten a filter tree into its leaf items, in document order
fn collect_items(rows: &[FilterRow]) -> Vec<&FilterItem> {
    let mut items = Vec::new();
    for row in rows {
        match row {
            FilterRow::Item(item) => items.push(item),
            FilterRow::Group(group) => items.extend(collect_items(&group.children)),
        }
    }
    items
}

fn targets_column(item: &FilterItem, column: &Column, modifiers: Modifiers) -> bool {
    let item_keys = [Some(item.field.as_str()), item.filter_field.as_deref()];
    let column_keys = [
        Some(column.meta.field.as_str()),
        column.meta.filter_field.as_deref(),
    ];
    item_keys.iter().flatten().any(|item_key| {
        column_keys
            .iter()
            .flatten()
            .any(|column_key| modifiers.fields_match(item_key, column_key))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use gridq_grammar::rows_eq_ignoring_ids;
    use gridq_shared::{ColumnCatalog, ColumnMeta, Comparator, DataType, FilterValue};
    use gridq_url::extract;
    use pretty_assertions::assert_eq;

    fn test_catalog() -> ColumnCatalog {
        ColumnCatalog::from_metas(
            [
                ColumnMeta::new("age").with_data_type(DataType::Number),
                ColumnMeta::new("name"),
                ColumnMeta::new("status").with_data_type(DataType::Select),
            ],
            false,
        )
    }

    fn test_columns() -> Vec<Column> {
        vec![
            Column::helper(ColumnMeta::new("select_all")),
            Column::new(ColumnMeta::new("age").with_data_type(DataType::Number)),
            Column::new(ColumnMeta::new("name")),
            Column::new(ColumnMeta::new("status").with_data_type(DataType::Select)),
        ]
    }

    fn url_modifiers() -> Modifiers {
        Modifiers {
            use_url: true,
            ..Modifiers::default()
        }
    }

    fn input<'a>(
        url: Option<&'a UrlData>,
        schema: Option<&'a UrlData>,
        modifiers: Modifiers,
    ) -> ReconcileInput<'a> {
        ReconcileInput {
            url,
            schema,
            allow_url: true,
            allow_schema: true,
            modifiers,
        }
    }

    fn fields(columns: &[Column]) -> Vec<&str> {
        columns.iter().map(Column::field).collect()
    }

    #[test]
    fn test_url_wins_over_schema() {
        let catalog = test_catalog();
        let url = extract("filters=[age].[gt].[18]", &catalog).unwrap();
        let schema = extract("filters=[age].[gt].[21]", &catalog).unwrap();

        let result = reconcile(
            test_columns(),
            &input(Some(&url), Some(&schema), url_modifiers()),
        );

        assert_eq!(result.source, SourceChoice::UrlWins);
        let age = &result.columns[1];
        assert_eq!(age.field(), "age");
        assert_eq!(age.applied_filters.len(), 1);
        assert_eq!(age.applied_filters[0].value, Some(FilterValue::int(18)));
    }

    #[test]
    fn test_schema_wins_when_url_is_empty() {
        let catalog = test_catalog();
        let url = extract("", &catalog).unwrap();
        let schema = extract("filters=[age].[gt].[21]", &catalog).unwrap();

        let result = reconcile(
            test_columns(),
            &input(Some(&url), Some(&schema), url_modifiers()),
        );

        assert_eq!(result.source, SourceChoice::SchemaWins);
        let age = &result.columns[1];
        assert_eq!(age.applied_filters[0].value, Some(FilterValue::int(21)));
    }

    #[test]
    fn test_pagination_only_url_does_not_win() {
        let catalog = test_catalog();
        let url = extract("skip=40&take=20", &catalog).unwrap();
        let schema = extract("order=(name.asc)", &catalog).unwrap();

        let result = reconcile(
            test_columns(),
            &input(Some(&url), Some(&schema), url_modifiers()),
        );
        assert_eq!(result.source, SourceChoice::SchemaWins);
    }

    #[test]
    fn test_use_url_modifier_disables_url() {
        let catalog = test_catalog();
        let url = extract("filters=[age].[gt].[18]", &catalog).unwrap();
        let schema = extract("filters=[age].[gt].[21]", &catalog).unwrap();

        let result = reconcile(
            test_columns(),
            &input(Some(&url), Some(&schema), Modifiers::default()),
        );
        assert_eq!(result.source, SourceChoice::SchemaWins);
    }

    #[test]
    fn test_no_data_passes_columns_through() {
        let catalog = test_catalog();
        let url = extract("", &catalog).unwrap();

        let columns = test_columns();
        let result = reconcile(columns.clone(), &input(Some(&url), None, url_modifiers()));

        assert_eq!(result.source, SourceChoice::NoData);
        assert_eq!(result.columns, columns);
        // the fallback query builder is one empty `and` group
        assert_eq!(result.query_builder.len(), 1);
        let group = result.query_builder[0].as_group().unwrap();
        assert_eq!(group.condition, Condition::And);
        assert!(group.children.is_empty());
        assert_eq!(group.path, "0");
    }

    #[test]
    fn test_reconcile_is_idempotent() {
        let catalog = test_catalog();
        let url = extract(
            "order=(age.desc)&filters=[name].[contains].[bob]&select=name,age",
            &catalog,
        )
        .unwrap();
        let input = input(Some(&url), None, url_modifiers());

        let first = reconcile(test_columns(), &input);
        let second = reconcile(first.columns.clone(), &input);

        assert_eq!(first.columns, second.columns);
        assert!(rows_eq_ignoring_ids(
            &first.query_builder,
            &second.query_builder
        ));
    }

    #[test]
    fn test_selection_list_orders_and_hides() {
        let catalog = test_catalog();
        let url = extract("select=name,age", &catalog).unwrap();

        let result = reconcile(test_columns(), &input(Some(&url), None, url_modifiers()));

        // helper pinned first, then the selected fields in list order,
        // hidden columns trailing on fallback order... fallback sorts
        // before index 0, so status lands between the helper and name
        assert_eq!(fields(&result.columns), vec!["select_all", "status", "name", "age"]);
        let by_field = |field: &str| {
            result
                .columns
                .iter()
                .find(|c| c.field() == field)
                .unwrap()
        };
        assert!(!by_field("select_all").hidden);
        assert!(!by_field("name").hidden);
        assert!(!by_field("age").hidden);
        assert!(by_field("status").hidden);
        assert_eq!(by_field("name").display_order, 0);
        assert_eq!(by_field("age").display_order, 1);
        assert_eq!(by_field("status").display_order, FALLBACK_ORDER);
    }

    #[test]
    fn test_selection_star_shows_interactive_in_definition_order() {
        let catalog = test_catalog();
        let url = extract("select=*", &catalog).unwrap();

        let mut columns = test_columns();
        columns.push(Column::new(ColumnMeta::new("internal")).non_interactive());

        let result = reconcile(columns, &input(Some(&url), None, url_modifiers()));

        let by_field = |field: &str| {
            result
                .columns
                .iter()
                .find(|c| c.field() == field)
                .unwrap()
        };
        assert!(!by_field("age").hidden);
        assert!(!by_field("name").hidden);
        assert!(!by_field("status").hidden);
        assert!(by_field("internal").hidden);
        assert_eq!(fields(&result.columns)[0], "select_all");
    }

    #[test]
    fn test_sort_assignment_and_clearing() {
        let catalog = test_catalog();
        let url = extract("order=(name.asc,age.desc)", &catalog).unwrap();

        let mut columns = test_columns();
        // stale sort on status must not survive
        columns[3].sort = Some(gridq_shared::SortDirection::Asc);
        columns[3].sort_order = Some(0);

        let result = reconcile(columns, &input(Some(&url), None, url_modifiers()));

        let by_field = |field: &str| {
            result
                .columns
                .iter()
                .find(|c| c.field() == field)
                .unwrap()
        };
        assert_eq!(by_field("name").sort, Some(gridq_shared::SortDirection::Asc));
        assert_eq!(by_field("name").sort_order, Some(0));
        assert_eq!(by_field("age").sort, Some(gridq_shared::SortDirection::Desc));
        assert_eq!(by_field("age").sort_order, Some(1));
        assert_eq!(by_field("status").sort, None);
        assert_eq!(by_field("status").sort_order, None);
    }

    #[test]
    fn test_predefined_filter_takes_incoming_value() {
        let catalog = test_catalog();
        let url = extract("filters=[status].[eq].[closed]", &catalog).unwrap();

        let predefined = FilterItem::new("status", Comparator::Eq)
            .with_data_type(DataType::Select)
            .with_value(FilterValue::text("open"));
        let mut columns = test_columns();
        columns[3] = Column::new(ColumnMeta::new("status").with_data_type(DataType::Select))
            .with_predefined_filter(predefined);

        let result = reconcile(columns, &input(Some(&url), None, url_modifiers()));

        let status = &result.columns[3];
        assert_eq!(
            status.predefined_filters[0].value,
            Some(FilterValue::text("closed"))
        );
        // the matched item is consumed, not applied a second time
        assert!(status.applied_filters.is_empty());
    }

    #[test]
    fn test_unmatched_incoming_filter_stays_editable() {
        let catalog = test_catalog();
        let url = extract("filters=[status].[neq].[closed]", &catalog).unwrap();

        let predefined = FilterItem::new("status", Comparator::Eq)
            .with_data_type(DataType::Select)
            .with_value(FilterValue::text("open"));
        let mut columns = test_columns();
        columns[3] = Column::new(ColumnMeta::new("status").with_data_type(DataType::Select))
            .with_predefined_filter(predefined);

        let result = reconcile(columns, &input(Some(&url), None, url_modifiers()));

        let status = &result.columns[3];
        assert_eq!(
            status.predefined_filters[0].value,
            Some(FilterValue::text("open"))
        );
        assert_eq!(status.applied_filters.len(), 1);
        assert_eq!(status.applied_filters[0].comparator, Comparator::Neq);
    }

    #[test]
    fn test_filters_route_through_filter_field() {
        let catalog_metas = vec![
            ColumnMeta::new("owner").with_filter_field("ownerId"),
            ColumnMeta::new("name"),
        ];
        let catalog = ColumnCatalog::from_metas(catalog_metas.clone(), false);

        let url = extract("filters=[ownerId].[eq].[42]", &catalog).unwrap();

        let columns = vec![
            Column::new(catalog_metas[0].clone()),
            Column::new(catalog_metas[1].clone()),
        ];
        let result = reconcile(columns, &input(Some(&url), None, url_modifiers()));

        assert_eq!(result.columns[0].applied_filters.len(), 1);
        assert!(result.columns[1].applied_filters.is_empty());
    }

    #[test]
    fn test_merge_column_filters_replaces_wholesale() {
        let mut query_builder = default_query_builder();

        merge_column_filters(
            &mut query_builder,
            vec![FilterItem::new("age", Comparator::Gt).with_value(FilterValue::int(18))],
        );
        assert_eq!(query_builder.len(), 2);
        assert_eq!(query_builder[1].id(), COLUMN_FILTERS_GROUP_ID);
        assert_eq!(query_builder[1].path(), "1");

        // a second merge replaces, never appends
        merge_column_filters(
            &mut query_builder,
            vec![
                FilterItem::new("age", Comparator::Gt).with_value(FilterValue::int(21)),
                FilterItem::new("name", Comparator::Contains)
                    .with_value(FilterValue::text("bob")),
            ],
        );
        assert_eq!(query_builder.len(), 2);
        let group = query_builder[1].as_group().unwrap();
        assert_eq!(group.children.len(), 2);
        assert_eq!(group.children[0].path(), "1.children.0");

        // empty items remove the group entirely
        merge_column_filters(&mut query_builder, Vec::new());
        assert_eq!(query_builder.len(), 1);
        assert_ne!(query_builder[0].id(), COLUMN_FILTERS_GROUP_ID);
    }

    #[test]
    fn test_query_builder_from_source_is_kept() {
        let catalog = test_catalog();
        let url = extract("qb=and([age].[gte].[21])", &catalog).unwrap();

        let result = reconcile(test_columns(), &input(Some(&url), None, url_modifiers()));

        assert!(rows_eq_ignoring_ids(
            &result.query_builder,
            &url.query_builder
        ));
    }

    #[test]
    fn test_case_insensitive_field_matching() {
        let catalog = ColumnCatalog::from_metas([ColumnMeta::new("Age")], true);
        let url = extract("order=(age.asc)&select=AGE", &catalog).unwrap();

        let modifiers = Modifiers {
            use_url: true,
            case_insensitive: true,
        };
        let columns = vec![Column::new(ColumnMeta::new("Age"))];
        let result = reconcile(columns, &input(Some(&url), None, modifiers));

        let age = &result.columns[0];
        assert!(!age.hidden);
        assert_eq!(age.sort, Some(gridq_shared::SortDirection::Asc));
    }
}
