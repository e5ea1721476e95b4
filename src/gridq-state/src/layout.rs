//! Persisted grid layouts
//!
//! A layout is a named, saved snapshot of grid state. Its `schema` holds
//! the same query-string encoding that appears in a live URL, so saving
//! and restoring go through the same extraction path as the URL itself.

use gridq_shared::ColumnCatalog;
use gridq_url::UrlData;

/// One saved layout record
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Layout {
    /// Stable layout id
    pub id: String,
    /// Display name
    pub name: String,
    /// Grid state as a query string, e.g. `order=(age.desc)&select=*`
    pub schema: String,
    /// Visible to other users
    #[serde(default)]
    pub is_public: bool,
    /// Applied when no URL state is present
    #[serde(default)]
    pub is_default: bool,
}

impl Layout {
    /// Create a private, non-default layout
    pub fn new(id: impl Into<String>, name: impl Into<String>, schema: impl Into<String>) -> Self {
        Layout {
            id: id.into(),
            name: name.into(),
            schema: schema.into(),
            is_public: false,
            is_default: false,
        }
    }

    /// Snapshot extracted grid state into a layout
    pub fn from_url_data(
        id: impl Into<String>,
        name: impl Into<String>,
        data: &UrlData,
    ) -> Self {
        Layout::new(id, name, gridq_url::write_query(data))
    }

    /// Extract the grid state this layout persists
    pub fn url_data(&self, catalog: &ColumnCatalog) -> gridq_url::Result<UrlData> {
        gridq_url::extract(&self.schema, catalog)
    }
}
