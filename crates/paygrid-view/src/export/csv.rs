use csv::{QuoteStyle, Terminator, WriterBuilder};

use super::ExportMatrix;
use crate::error::Result;

/// UTF-8 byte order mark, so spreadsheet apps detect the encoding.
const BOM: &[u8] = b"\xEF\xBB\xBF";

/// Serializes the matrix as CSV.
///
/// Every field is quoted with inner quotes doubled, absent values become
/// empty fields, and records are joined by `\n` without a trailing newline.
pub fn to_csv(matrix: &ExportMatrix) -> Result<Vec<u8>> {
    let mut writer = WriterBuilder::new()
        .quote_style(QuoteStyle::Always)
        .terminator(Terminator::Any(b'\n'))
        .flexible(true)
        .from_writer(BOM.to_vec());

    writer.write_record(&matrix.headers)?;
    for row in &matrix.rows {
        writer.write_record(row.iter().map(|v| v.to_string()))?;
    }

    let mut bytes = writer
        .into_inner()
        .map_err(|err| std::io::Error::other(err.to_string()))?;
    if bytes.last() == Some(&b'\n') {
        bytes.pop();
    }
    Ok(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use paygrid_seeker::{Number, Value};

    fn body(bytes: &[u8]) -> &str {
        std::str::from_utf8(&bytes[BOM.len()..]).unwrap()
    }

    #[test]
    fn quotes_everything() {
        let mut m = ExportMatrix::new(vec!["ID".into(), "Memo".into(), "Amount".into()]);
        m.push_row(vec![
            Value::owned("TXN-1"),
            Value::owned("say \"hi\", ok"),
            Value::Number(Number::I64(1500)),
        ]);
        m.push_row(vec![Value::owned("TXN-2"), Value::None, Value::Number(Number::F64(2.5))]);
        let bytes = to_csv(&m).unwrap();
        assert!(bytes.starts_with(BOM));
        assert_eq!(
            body(&bytes),
            "\"ID\",\"Memo\",\"Amount\"\n\"TXN-1\",\"say \"\"hi\"\", ok\",\"1500\"\n\"TXN-2\",\"\",\"2.5\""
        );
    }

    #[test]
    fn header_only() {
        let m = ExportMatrix::new(vec!["ID".into()]);
        assert_eq!(body(&to_csv(&m).unwrap()), "\"ID\"");
    }
}
