//! Error types for the table view.

use std::io;

/// Errors raised by table interactions and exports.
#[derive(Debug, thiserror::Error)]
pub enum GridError {
    /// Two column definitions share an id.
    #[error("duplicate column id '{0}'")]
    DuplicateColumn(String),

    /// No column with this id.
    #[error("unknown column '{0}'")]
    UnknownColumn(String),

    /// The column does not allow sorting.
    #[error("column '{0}' is not sortable")]
    NotSortable(String),

    /// The column cannot be hidden.
    #[error("column '{0}' cannot be hidden")]
    NotHideable(String),

    /// The column cannot be resized.
    #[error("column '{0}' is not resizable")]
    NotResizable(String),

    /// Page change requested on a table without a pagination descriptor.
    #[error("table has no pagination")]
    NoPagination,

    /// Page size of zero.
    #[error("page size must be at least 1")]
    InvalidPageSize,

    /// Export is switched off for this table.
    #[error("export is disabled for this table")]
    ExportDisabled,

    /// No column is marked exportable.
    #[error("no exportable columns")]
    NothingToExport,

    /// The spreadsheet writer could not be loaded.
    #[error("spreadsheet export unavailable: {0}")]
    ExportUnavailable(String),

    /// The spreadsheet writer failed while building the workbook.
    #[error("workbook error: {0}")]
    Workbook(String),

    /// CSV serialization failed.
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    /// Writing an export file failed.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

impl GridError {
    pub(crate) fn unknown(id: &str) -> Self {
        GridError::UnknownColumn(id.to_string())
    }
}

#[cfg(feature = "xlsx")]
impl From<rust_xlsxwriter::XlsxError> for GridError {
    fn from(err: rust_xlsxwriter::XlsxError) -> Self {
        GridError::Workbook(err.to_string())
    }
}

/// Result type for table operations.
pub type Result<T> = std::result::Result<T, GridError>;
