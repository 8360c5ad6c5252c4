//! Spreadsheet export through a loadable workbook writer.
//!
//! The writer is acquired on demand through a [`WorkbookLoader`], so a table
//! can be built without the spreadsheet stack and report
//! [`GridError::ExportUnavailable`](crate::GridError::ExportUnavailable) when export is attempted.

use super::ExportMatrix;
use crate::error::Result;

/// Writes a single-sheet workbook.
pub trait WorkbookWriter {
    /// Serializes the matrix into workbook bytes under the given sheet name.
    fn write(&mut self, sheet_name: &str, matrix: &ExportMatrix) -> Result<Vec<u8>>;
}

/// Acquires a [`WorkbookWriter`].
///
/// Load failures should be reported as
/// [`GridError::ExportUnavailable`](crate::GridError::ExportUnavailable).
pub trait WorkbookLoader {
    fn load(&self) -> Result<Box<dyn WorkbookWriter>>;
}

impl<F> WorkbookLoader for F
where
    F: Fn() -> Result<Box<dyn WorkbookWriter>>,
{
    fn load(&self) -> Result<Box<dyn WorkbookWriter>> {
        self()
    }
}

/// Loader for the bundled `rust_xlsxwriter` backend.
///
/// Without the `xlsx` feature every load fails with `ExportUnavailable`.
#[derive(Clone, Copy, Debug, Default)]
pub struct XlsxLoader;

impl WorkbookLoader for XlsxLoader {
    #[cfg(feature = "xlsx")]
    fn load(&self) -> Result<Box<dyn WorkbookWriter>> {
        Ok(Box::new(XlsxWriter))
    }

    #[cfg(not(feature = "xlsx"))]
    fn load(&self) -> Result<Box<dyn WorkbookWriter>> {
        Err(crate::GridError::ExportUnavailable(
            "built without the `xlsx` feature".to_string(),
        ))
    }
}

/// Workbook writer backed by `rust_xlsxwriter`.
///
/// Numbers are written as numeric cells and booleans as boolean cells;
/// absent values leave the cell blank.
#[cfg(feature = "xlsx")]
#[derive(Clone, Copy, Debug, Default)]
pub struct XlsxWriter;

#[cfg(feature = "xlsx")]
impl WorkbookWriter for XlsxWriter {
    fn write(&mut self, sheet_name: &str, matrix: &ExportMatrix) -> Result<Vec<u8>> {
        use paygrid_seeker::Value;
        use rust_xlsxwriter::Workbook;

        let mut workbook = Workbook::new();
        let sheet = workbook.add_worksheet();
        sheet.set_name(sheet_name)?;

        for (c, header) in matrix.headers.iter().enumerate() {
            sheet.write_string(0, column_index(c)?, header.as_str())?;
        }
        for (r, row) in matrix.rows.iter().enumerate() {
            let r = row_index(r)?;
            for (c, value) in row.iter().enumerate() {
                let c = column_index(c)?;
                match value {
                    Value::None => {}
                    Value::Number(n) => {
                        sheet.write_number(r, c, n.to_f64())?;
                    }
                    Value::Bool(b) => {
                        sheet.write_boolean(r, c, *b)?;
                    }
                    other => {
                        sheet.write_string(r, c, other.to_string())?;
                    }
                }
            }
        }

        Ok(workbook.save_to_buffer()?)
    }
}

/// Worksheet column for a matrix column.
#[cfg(feature = "xlsx")]
fn column_index(col: usize) -> Result<u16> {
    u16::try_from(col)
        .map_err(|_| crate::GridError::Workbook(format!("column {col} is past the sheet limit")))
}

/// Worksheet row for a matrix row. Row 0 holds the headers.
#[cfg(feature = "xlsx")]
fn row_index(row: usize) -> Result<u32> {
    row.checked_add(1)
        .and_then(|r| u32::try_from(r).ok())
        .ok_or_else(|| crate::GridError::Workbook(format!("row {row} is past the sheet limit")))
}
