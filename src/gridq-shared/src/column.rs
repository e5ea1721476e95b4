//! Column metadata and the field-resolution catalog
//!
//! The grammar parser does not own column definitions; it consults a
//! [`ColumnCatalog`] to recover the canonical field name, the optional
//! dedicated filter field, and the data type used for value coercion.
//! The catalog is an explicit parameter everywhere — there is no ambient
//! or global lookup state.

use crate::value::DataType;
use indexmap::IndexMap;

/// Sort direction for a column
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    /// Ascending order (`asc`)
    Asc,
    /// Descending order (`desc`)
    Desc,
}

impl SortDirection {
    /// The lowercase wire token used in the `order` parameter
    pub fn token(&self) -> &'static str {
        match self {
            SortDirection::Asc => "asc",
            SortDirection::Desc => "desc",
        }
    }

    /// Look up a direction from its wire token
    pub fn from_token(token: &str) -> Option<Self> {
        match token {
            "asc" => Some(SortDirection::Asc),
            "desc" => Some(SortDirection::Desc),
            _ => None,
        }
    }
}

/// Metadata for a single column, as supplied by the column provider
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ColumnMeta {
    /// Canonical field name
    pub field: String,
    /// Dedicated filter field, when filtering targets a different key
    /// than display (serialized in place of `field` when present)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filter_field: Option<String>,
    /// Data type driving operand coercion
    #[serde(default)]
    pub data_type: DataType,
}

impl ColumnMeta {
    /// Create metadata with the default text data type
    pub fn new(field: impl Into<String>) -> Self {
        ColumnMeta {
            field: field.into(),
            filter_field: None,
            data_type: DataType::Text,
        }
    }

    /// Set the data type
    pub fn with_data_type(mut self, data_type: DataType) -> Self {
        self.data_type = data_type;
        self
    }

    /// Set the dedicated filter field
    pub fn with_filter_field(mut self, filter_field: impl Into<String>) -> Self {
        self.filter_field = Some(filter_field.into());
        self
    }

    /// The field token that appears on the wire: `filter_field` when
    /// present, otherwise `field`
    pub fn wire_field(&self) -> &str {
        self.filter_field.as_deref().unwrap_or(&self.field)
    }
}

/// Ordered lookup table of column metadata.
///
/// Case sensitivity is fixed at construction: a case-insensitive catalog
/// normalizes keys to lowercase on insert and lookup. Definition order is
/// preserved, which the column transformer relies on for `select=*`.
#[derive(Debug, Clone, Default)]
pub struct ColumnCatalog {
    by_field: IndexMap<String, ColumnMeta>,
    // filter-field key -> field key
    by_filter_field: IndexMap<String, String>,
    case_insensitive: bool,
}

impl ColumnCatalog {
    /// Create an empty catalog
    pub fn new(case_insensitive: bool) -> Self {
        ColumnCatalog {
            by_field: IndexMap::new(),
            by_filter_field: IndexMap::new(),
            case_insensitive,
        }
    }

    /// Build a catalog from column metadata, preserving order
    pub fn from_metas<I>(metas: I, case_insensitive: bool) -> Self
    where
        I: IntoIterator<Item = ColumnMeta>,
    {
        let mut catalog = ColumnCatalog::new(case_insensitive);
        for meta in metas {
            catalog.push(meta);
        }
        catalog
    }

    /// Insert a column definition. A duplicate field replaces the earlier
    /// entry but keeps its position.
    pub fn push(&mut self, meta: ColumnMeta) {
        let field_key = self.key(&meta.field);
        if let Some(filter_field) = &meta.filter_field {
            let filter_key = self.key(filter_field);
            self.by_filter_field.insert(filter_key, field_key.clone());
        }
        self.by_field.insert(field_key, meta);
    }

    /// Whether lookups ignore case
    pub fn case_insensitive(&self) -> bool {
        self.case_insensitive
    }

    /// Number of columns
    pub fn len(&self) -> usize {
        self.by_field.len()
    }

    /// Whether the catalog is empty
    pub fn is_empty(&self) -> bool {
        self.by_field.is_empty()
    }

    /// Iterate columns in definition order
    pub fn iter(&self) -> impl Iterator<Item = &ColumnMeta> {
        self.by_field.values()
    }

    /// Look up a column by its canonical field name
    pub fn by_field(&self, field: &str) -> Option<&ColumnMeta> {
        self.by_field.get(&self.key(field))
    }

    /// Look up a column by its dedicated filter field
    pub fn by_filter_field(&self, filter_field: &str) -> Option<&ColumnMeta> {
        let field_key = self.by_filter_field.get(&self.key(filter_field))?;
        self.by_field.get(field_key)
    }

    /// Resolve a wire field token: filter fields shadow plain fields,
    /// matching how items are serialized (`filter_field ?? field`)
    pub fn resolve(&self, token: &str) -> Option<&ColumnMeta> {
        self.by_filter_field(token).or_else(|| self.by_field(token))
    }

    /// Compare two field tokens under the catalog's case policy
    pub fn matches(&self, a: &str, b: &str) -> bool {
        self.key(a) == self.key(b)
    }

    fn key(&self, s: &str) -> String {
        if self.case_insensitive {
            s.to_lowercase()
        } else {
            s.to_string()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn catalog(case_insensitive: bool) -> ColumnCatalog {
        ColumnCatalog::from_metas(
            [
                ColumnMeta::new("age").with_data_type(DataType::Number),
                ColumnMeta::new("name"),
                ColumnMeta::new("owner").with_filter_field("ownerId"),
            ],
            case_insensitive,
        )
    }

    #[test]
    fn test_lookup_by_field() {
        let catalog = catalog(false);
        assert_eq!(catalog.by_field("age").unwrap().data_type, DataType::Number);
        assert!(catalog.by_field("Age").is_none());
        assert!(catalog.by_field("missing").is_none());
    }

    #[test]
    fn test_case_insensitive_lookup() {
        let catalog = catalog(true);
        assert!(catalog.by_field("AGE").is_some());
        assert!(catalog.by_filter_field("OWNERID").is_some());
        assert!(catalog.matches("Name", "name"));
    }

    #[test]
    fn test_resolve_prefers_filter_field() {
        let catalog = catalog(false);
        let meta = catalog.resolve("ownerId").unwrap();
        assert_eq!(meta.field, "owner");
        assert_eq!(meta.wire_field(), "ownerId");

        // plain fields still resolve
        assert_eq!(catalog.resolve("name").unwrap().field, "name");
        assert!(catalog.resolve("nope").is_none());
    }

    #[test]
    fn test_definition_order_preserved() {
        let catalog = catalog(false);
        let fields: Vec<&str> = catalog.iter().map(|m| m.field.as_str()).collect();
        assert_eq!(fields, vec!["age", "name", "owner"]);
    }

    #[test]
    fn test_sort_direction_tokens() {
        assert_eq!(SortDirection::from_token("asc"), Some(SortDirection::Asc));
        assert_eq!(SortDirection::from_token("desc"), Some(SortDirection::Desc));
        assert_eq!(SortDirection::from_token("descending"), None);
        assert_eq!(SortDirection::Desc.token(), "desc");
    }
}
