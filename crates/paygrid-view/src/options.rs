//! Per-table configuration.

use serde::{Deserialize, Serialize};

/// Default estimated row height in pixels.
pub const DEFAULT_ROW_HEIGHT: u32 = 48;
/// Default number of rows rendered beyond each viewport edge.
pub const DEFAULT_OVERSCAN: usize = 8;
/// Default scroll viewport height in pixels.
pub const DEFAULT_HEIGHT: u32 = 520;

/// Options for one table instance.
///
/// Every field has a default, so partial YAML/JSON documents deserialize:
///
/// ```
/// use paygrid_view::GridOptions;
///
/// let opts: GridOptions = serde_json::from_str(r#"{"export_file_name": "settlements"}"#).unwrap();
/// assert_eq!(opts.export_file_name, "settlements");
/// assert_eq!(opts.row_height, 48);
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GridOptions {
    /// Screen-reader caption. Falls back to "Data table".
    pub caption: Option<String>,
    /// Overrides the live-region row count announcement.
    pub live_text: Option<String>,
    /// Scroll viewport height in pixels.
    pub height: u32,
    /// Estimated row height in pixels.
    pub row_height: u32,
    /// Rows materialized beyond each edge of the viewport.
    pub overscan: usize,
    /// Base name for export files, without extension.
    pub export_file_name: String,
    pub enable_export: bool,
    /// Worksheet name used for XLSX exports.
    pub sheet_name: String,
    /// When true the third header click clears the sort.
    pub sort_removal: bool,
    /// Placeholder shown when there are no rows.
    pub empty_text: String,
}

impl Default for GridOptions {
    fn default() -> Self {
        GridOptions {
            caption: None,
            live_text: None,
            height: DEFAULT_HEIGHT,
            row_height: DEFAULT_ROW_HEIGHT,
            overscan: DEFAULT_OVERSCAN,
            export_file_name: "data-table".to_string(),
            enable_export: true,
            sheet_name: "Sheet1".to_string(),
            sort_removal: true,
            empty_text: "No data".to_string(),
        }
    }
}

impl GridOptions {
    pub fn caption(mut self, caption: impl Into<String>) -> Self {
        self.caption = Some(caption.into());
        self
    }

    pub fn export_file_name(mut self, name: impl Into<String>) -> Self {
        self.export_file_name = name.into();
        self
    }

    pub fn height(mut self, px: u32) -> Self {
        self.height = px;
        self
    }

    pub fn without_export(mut self) -> Self {
        self.enable_export = false;
        self
    }

    pub fn keep_sort(mut self) -> Self {
        self.sort_removal = false;
        self
    }

    pub(crate) fn caption_text(&self) -> &str {
        self.caption.as_deref().unwrap_or("Data table")
    }
}
