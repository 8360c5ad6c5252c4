//! Column definitions.
//!
//! A [`ColumnDef`] says how one field of a row is read, labelled, rendered,
//! sized, and whether it takes part in sorting, hiding and export.

use std::fmt;

use paygrid_seeker::{Clause, Op, Seekable, Value};

/// Column width used when neither the definition nor the user set one.
pub const DEFAULT_COLUMN_WIDTH: u32 = 150;
/// Smallest width a resize can produce.
pub const MIN_COLUMN_WIDTH: u32 = 20;
/// Largest width a resize can produce.
pub const MAX_COLUMN_WIDTH: u32 = u32::MAX;

type AccessorFn<T> = Box<dyn for<'a> Fn(&'a T) -> Value<'a>>;
type CellFn<T> = Box<dyn Fn(&T, &Value<'_>) -> String>;
type FilterFn<T> = Box<dyn Fn(&T, &serde_json::Value) -> bool>;

fn boxed_accessor<T, F>(f: F) -> AccessorFn<T>
where
    F: for<'a> Fn(&'a T) -> Value<'a> + 'static,
{
    Box::new(f)
}

/// Configuration for one table column.
///
/// ```
/// use paygrid_seeker::{Number, Seekable, Value};
/// use paygrid_view::ColumnDef;
///
/// struct Txn { id: String, amount: i64 }
///
/// impl Seekable for Txn {
///     fn field_value(&self, field: &str) -> Value<'_> {
///         match field {
///             "id" => Value::text(&self.id),
///             "amount" => Value::Number(Number::I64(self.amount)),
///             _ => Value::None,
///         }
///     }
/// }
///
/// let columns = vec![
///     ColumnDef::<Txn>::key("id").header("Transaction").width(180),
///     ColumnDef::key("amount")
///         .header("Amount")
///         .cell(|_, v| format!("KRW {v}")),
///     ColumnDef::display("actions").width(60).hideable(false).exportable(false),
/// ];
/// assert!(!columns[2].is_sortable());
/// ```
pub struct ColumnDef<T> {
    id: String,
    header: Option<String>,
    accessor: Option<AccessorFn<T>>,
    cell: Option<CellFn<T>>,
    filter: Option<FilterFn<T>>,
    width: Option<u32>,
    sortable: Option<bool>,
    hideable: bool,
    resizable: bool,
    exportable: bool,
}

impl<T: Seekable> ColumnDef<T> {
    /// Column reading the row field with the same name as its id.
    pub fn key(id: impl Into<String>) -> Self {
        let id = id.into();
        let field = id.clone();
        Self::with_accessor(id, boxed_accessor(move |row: &T| row.field_value(&field)))
    }

    /// Column with its own id reading a differently named field.
    pub fn field(id: impl Into<String>, field: impl Into<String>) -> Self {
        let field = field.into();
        Self::with_accessor(
            id.into(),
            boxed_accessor(move |row: &T| row.field_value(&field)),
        )
    }
}

impl<T> ColumnDef<T> {
    /// Column whose value is derived from the row.
    pub fn derived<F>(id: impl Into<String>, f: F) -> Self
    where
        F: for<'a> Fn(&'a T) -> Value<'a> + 'static,
    {
        Self::with_accessor(id.into(), Box::new(f))
    }

    /// Column without a value, for action buttons and the like.
    ///
    /// Display columns are not sortable and export as empty cells.
    pub fn display(id: impl Into<String>) -> Self {
        ColumnDef {
            id: id.into(),
            header: None,
            accessor: None,
            cell: None,
            filter: None,
            width: None,
            sortable: None,
            hideable: true,
            resizable: true,
            exportable: true,
        }
    }

    fn with_accessor(id: String, accessor: AccessorFn<T>) -> Self {
        ColumnDef {
            accessor: Some(accessor),
            ..Self::display(id)
        }
    }

    pub fn header(mut self, header: impl Into<String>) -> Self {
        self.header = Some(header.into());
        self
    }

    /// Renders the cell text. Defaults to the stringified value.
    pub fn cell<F>(mut self, f: F) -> Self
    where
        F: Fn(&T, &Value<'_>) -> String + 'static,
    {
        self.cell = Some(Box::new(f));
        self
    }

    /// Interprets this column's filter value when the table filters rows
    /// itself. Defaults to a case-insensitive substring match.
    pub fn filter<F>(mut self, f: F) -> Self
    where
        F: Fn(&T, &serde_json::Value) -> bool + 'static,
    {
        self.filter = Some(Box::new(f));
        self
    }

    /// Initial width in pixels.
    pub fn width(mut self, px: u32) -> Self {
        self.width = Some(px);
        self
    }

    pub fn sortable(mut self, sortable: bool) -> Self {
        self.sortable = Some(sortable);
        self
    }

    pub fn hideable(mut self, hideable: bool) -> Self {
        self.hideable = hideable;
        self
    }

    pub fn resizable(mut self, resizable: bool) -> Self {
        self.resizable = resizable;
        self
    }

    /// Whether the column is written to CSV/XLSX exports. Independent of
    /// on-screen visibility.
    pub fn exportable(mut self, exportable: bool) -> Self {
        self.exportable = exportable;
        self
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    /// Header text, falling back to the column id.
    pub fn label(&self) -> &str {
        self.header.as_deref().unwrap_or(&self.id)
    }

    /// Sortable unless switched off; display columns never sort.
    pub fn is_sortable(&self) -> bool {
        self.accessor.is_some() && self.sortable.unwrap_or(true)
    }

    pub fn is_hideable(&self) -> bool {
        self.hideable
    }

    pub fn is_resizable(&self) -> bool {
        self.resizable
    }

    pub fn is_exportable(&self) -> bool {
        self.exportable
    }

    pub fn default_width(&self) -> u32 {
        self.width
            .unwrap_or(DEFAULT_COLUMN_WIDTH)
            .clamp(MIN_COLUMN_WIDTH, MAX_COLUMN_WIDTH)
    }

    /// The column's value for a row.
    pub fn value<'a>(&self, row: &'a T) -> Value<'a> {
        match &self.accessor {
            Some(accessor) => accessor(row),
            None => Value::None,
        }
    }

    /// Cell text for a row.
    pub fn render(&self, row: &T) -> String {
        let value = self.value(row);
        match &self.cell {
            Some(cell) => cell(row, &value),
            None => value.to_string(),
        }
    }

    /// Whether the row passes this column's filter value.
    pub fn matches_filter(&self, row: &T, filter: &serde_json::Value) -> bool {
        if let Some(f) = &self.filter {
            return f(row, filter);
        }
        let needle = match filter {
            serde_json::Value::Null => return true,
            serde_json::Value::String(s) => s.clone(),
            other => other.to_string(),
        };
        if needle.is_empty() {
            return true;
        }
        let haystack = Value::owned(self.value(row).to_string());
        Clause::new(self.id.as_str(), Op::ContainsFold, needle).matches(&haystack)
    }
}

impl<T> fmt::Debug for ColumnDef<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ColumnDef")
            .field("id", &self.id)
            .field("header", &self.header)
            .field("width", &self.width)
            .field("sortable", &self.is_sortable())
            .field("hideable", &self.hideable)
            .field("exportable", &self.exportable)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use paygrid_seeker::Number;
    use serde_json::json;

    struct Key {
        name: String,
        prefix: String,
        calls: u64,
    }

    impl Seekable for Key {
        fn field_value(&self, field: &str) -> Value<'_> {
            match field {
                "name" => Value::text(&self.name),
                "prefix" => Value::text(&self.prefix),
                "calls" => Value::Number(Number::U64(self.calls)),
                _ => Value::None,
            }
        }
    }

    fn key() -> Key {
        Key {
            name: "Production".into(),
            prefix: "pk_live_9f2c".into(),
            calls: 1204,
        }
    }

    #[test]
    fn key_column_reads_field() {
        let col = ColumnDef::<Key>::key("calls");
        assert_eq!(col.value(&key()), Value::Number(Number::U64(1204)));
        assert_eq!(col.render(&key()), "1204");
        assert_eq!(col.label(), "calls");
    }

    #[test]
    fn field_column_renames() {
        let col = ColumnDef::<Key>::field("keyPrefix", "prefix").header("Prefix");
        assert_eq!(col.id(), "keyPrefix");
        assert_eq!(col.label(), "Prefix");
        assert_eq!(col.render(&key()), "pk_live_9f2c");
    }

    #[test]
    fn derived_and_custom_cell() {
        let col = ColumnDef::<Key>::derived("masked", |k| {
            Value::owned(format!("{}****", &k.prefix[..7]))
        })
        .cell(|k, v| format!("{} ({})", v, k.name));
        assert_eq!(col.render(&key()), "pk_live**** (Production)");
    }

    #[test]
    fn display_column_defaults() {
        let col = ColumnDef::<Key>::display("actions");
        assert!(!col.is_sortable());
        assert!(col.value(&key()).is_none());
        assert_eq!(col.render(&key()), "");
    }

    #[test]
    fn sortable_can_be_switched_off() {
        let col = ColumnDef::<Key>::key("name").sortable(false);
        assert!(!col.is_sortable());
    }

    #[test]
    fn width_is_clamped() {
        assert_eq!(ColumnDef::<Key>::key("name").width(5).default_width(), MIN_COLUMN_WIDTH);
        assert_eq!(ColumnDef::<Key>::key("name").default_width(), DEFAULT_COLUMN_WIDTH);
    }

    #[test]
    fn default_filter_is_case_insensitive_substring() {
        let col = ColumnDef::<Key>::key("name");
        assert!(col.matches_filter(&key(), &json!("prod")));
        assert!(!col.matches_filter(&key(), &json!("staging")));
        assert!(col.matches_filter(&key(), &json!("")));
        assert!(col.matches_filter(&key(), &serde_json::Value::Null));

        let calls = ColumnDef::<Key>::key("calls");
        assert!(calls.matches_filter(&key(), &json!(120)));
    }

    #[test]
    fn custom_filter_wins() {
        let col = ColumnDef::<Key>::key("calls").filter(|k, v| {
            v.as_u64().is_some_and(|min| k.calls >= min)
        });
        assert!(col.matches_filter(&key(), &json!(1000)));
        assert!(!col.matches_filter(&key(), &json!(5000)));
    }
}
