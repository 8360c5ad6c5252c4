//! CSV and XLSX export.
//!
//! Both formats are built from the same [`ExportMatrix`]: one header row of
//! column labels and one row of raw values per record.

mod csv;
mod sink;
mod xlsx;

pub use self::csv::to_csv;
pub use sink::{DirectorySink, DownloadSink, MemorySink};
#[cfg(feature = "xlsx")]
pub use xlsx::XlsxWriter;
pub use xlsx::{WorkbookLoader, WorkbookWriter, XlsxLoader};

use paygrid_seeker::Value;

pub const CSV_MIME: &str = "text/csv;charset=utf-8;";
pub const XLSX_MIME: &str = "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";

/// Header labels plus owned row values, ready for serialization.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ExportMatrix {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<Value<'static>>>,
}

impl ExportMatrix {
    pub fn new(headers: Vec<String>) -> Self {
        ExportMatrix {
            headers,
            rows: Vec::new(),
        }
    }

    pub fn push_row(&mut self, row: Vec<Value<'static>>) {
        self.rows.push(row);
    }
}

/// A finished export, ready to hand to a [`DownloadSink`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ExportFile {
    pub file_name: String,
    pub mime: &'static str,
    pub bytes: Vec<u8>,
}
