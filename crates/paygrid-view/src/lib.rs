//! Headless data table for payment console pages.
//!
//! A [`DataTable`] holds column definitions, the rows to show, and the
//! table state (sorting, filters, visibility, pinning, sizing). It derives
//! a [`TableFrame`]: a plain description of what to draw, including the
//! virtualized slice of rows and the accessibility strings, which any
//! front-end can paint.
//!
//! # Ownership
//!
//! Sort and filter state are owned by the table ([`Ownership::Internal`])
//! or by the caller ([`Ownership::Controlled`]). The choice is made once, at
//! construction. In controlled mode the table never reorders or drops rows;
//! interactions only report the proposed next state.
//!
//! # Export
//!
//! CSV and XLSX exports are built from the same columns as the display.
//! Which columns are exported depends only on each column's `exportable`
//! flag, never on visibility:
//!
//! ```
//! use paygrid_seeker::{Seekable, Value};
//! use paygrid_view::{ColumnDef, DataTable, GridOptions, MemorySink, Ownership};
//!
//! struct Key { name: &'static str, prefix: &'static str }
//!
//! impl Seekable for Key {
//!     fn field_value(&self, field: &str) -> Value<'_> {
//!         match field {
//!             "name" => Value::text(self.name),
//!             "prefix" => Value::text(self.prefix),
//!             _ => Value::None,
//!         }
//!     }
//! }
//!
//! let columns = vec![
//!     ColumnDef::key("name").header("Name"),
//!     ColumnDef::key("prefix").header("Prefix"),
//! ];
//! let keys = vec![Key { name: "Production", prefix: "pk_live" }];
//! let options = GridOptions::default().export_file_name("api-keys");
//! let mut table = DataTable::new(columns, keys, options, Ownership::Internal)?;
//! table.set_column_visibility("prefix", false)?;
//!
//! let sink = MemorySink::new();
//! table.download_csv(&sink)?;
//! let file = sink.last().unwrap();
//! assert_eq!(file.file_name, "api-keys.csv");
//! assert!(file.bytes.ends_with(b"\"Production\",\"pk_live\""));
//! # Ok::<(), paygrid_view::GridError>(())
//! ```

mod column;
mod error;
mod export;
mod frame;
mod layout;
mod options;
mod pagination;
mod state;
mod table;
mod virtualize;

pub use column::{ColumnDef, DEFAULT_COLUMN_WIDTH, MAX_COLUMN_WIDTH, MIN_COLUMN_WIDTH};
pub use error::{GridError, Result};
#[cfg(feature = "xlsx")]
pub use export::XlsxWriter;
pub use export::{
    to_csv, DirectorySink, DownloadSink, ExportFile, ExportMatrix, MemorySink, WorkbookLoader,
    WorkbookWriter, XlsxLoader, CSV_MIME, XLSX_MIME,
};
pub use frame::{AriaSort, FrameBody, FrameCell, FrameRow, HeaderCell, Role, TableFrame};
pub use layout::{PinStyle, PINNED_CELL_Z, PINNED_HEADER_Z};
pub use options::{GridOptions, DEFAULT_HEIGHT, DEFAULT_OVERSCAN, DEFAULT_ROW_HEIGHT};
pub use pagination::{page_count, slice_page, PageInfo, Pagination};
pub use state::{ColumnPinning, ColumnSettings, FilterState, Ownership, PinSide, SortState};
pub use table::DataTable;
pub use virtualize::{Virtualizer, Window};
