//! Renderable snapshot of a table.
//!
//! A [`TableFrame`] is everything a front-end needs to paint the table for
//! the current state: headers, the windowed rows with spacers, the
//! pagination bar and the accessibility strings. It holds no references to
//! the table and serializes to JSON for web front-ends.

use paygrid_seeker::Dir;
use serde::Serialize;

use crate::layout::PinStyle;
use crate::pagination::PageInfo;

/// Accessible role of a frame element.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Table,
    Rowgroup,
    Row,
    Columnheader,
    Cell,
    Status,
}

/// `aria-sort` value for a sortable header.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AriaSort {
    Ascending,
    Descending,
    None,
}

impl From<Option<Dir>> for AriaSort {
    fn from(dir: Option<Dir>) -> Self {
        match dir {
            Some(Dir::Asc) => AriaSort::Ascending,
            Some(Dir::Desc) => AriaSort::Descending,
            None => AriaSort::None,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct TableFrame {
    pub role: Role,
    pub caption: String,
    /// Role of the live region carrying `live_message`.
    pub live_role: Role,
    /// Polite live-region text.
    pub live_message: String,
    /// `aria-colcount`: visible columns.
    pub col_count: usize,
    /// `aria-rowcount`: total rows including the header row.
    pub row_count: usize,
    pub total_width: u64,
    /// Role of the header row group.
    pub header_group: Role,
    pub headers: Vec<HeaderCell>,
    /// Role of the body row group.
    pub body_group: Role,
    pub body: FrameBody,
    pub pagination: Option<PageInfo>,
    pub export_enabled: bool,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct HeaderCell {
    pub role: Role,
    pub id: String,
    pub label: String,
    pub width: u32,
    pub sortable: bool,
    pub sort: Option<Dir>,
    /// Present on sortable headers only.
    pub aria_sort: Option<AriaSort>,
    pub resizable: bool,
    pub pin: Option<PinStyle>,
}

/// Mutually exclusive body states, in precedence order.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "state", rename_all = "lowercase")]
pub enum FrameBody {
    Loading,
    Error { message: String, can_retry: bool },
    Empty { message: String },
    Rows {
        /// Spacer height above the rendered rows.
        leading: u64,
        rows: Vec<FrameRow>,
        /// Spacer height below the rendered rows.
        trailing: u64,
    },
}

impl FrameBody {
    pub fn rows(&self) -> &[FrameRow] {
        match self {
            FrameBody::Rows { rows, .. } => rows,
            _ => &[],
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct FrameRow {
    pub role: Role,
    /// Stable row key: the row id function's output, else the row index.
    pub key: String,
    /// Position in the row model.
    pub index: usize,
    /// One-based `aria-rowindex`, counting the header row.
    pub aria_row_index: usize,
    pub cells: Vec<FrameCell>,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct FrameCell {
    pub role: Role,
    pub column: String,
    pub text: String,
    pub width: u32,
    pub pin: Option<PinStyle>,
}

impl FrameRow {
    /// Cell texts in display order.
    pub fn texts(&self) -> Vec<&str> {
        self.cells.iter().map(|c| c.text.as_str()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn aria_sort_from_direction() {
        assert_eq!(AriaSort::from(Some(Dir::Desc)), AriaSort::Descending);
        assert_eq!(AriaSort::from(None), AriaSort::None);
    }

    #[test]
    fn body_serializes_with_state_tag() {
        let body = FrameBody::Error {
            message: "upstream timeout".into(),
            can_retry: true,
        };
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["state"], "error");
        assert_eq!(json["can_retry"], true);
        assert!(body.rows().is_empty());
    }
}
