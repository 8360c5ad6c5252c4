//! The data table.

use std::collections::HashSet;
use std::fmt;

use paygrid_seeker::{compare_by_orderings, OrderBy, Value};

use crate::column::ColumnDef;
use crate::error::{GridError, Result};
use crate::export::{
    to_csv, DownloadSink, ExportFile, ExportMatrix, WorkbookLoader, CSV_MIME, XLSX_MIME,
};
use crate::frame::{AriaSort, FrameBody, FrameCell, FrameRow, HeaderCell, Role, TableFrame};
use crate::layout::{self, Placed};
use crate::options::GridOptions;
use crate::pagination::Pagination;
use crate::state::{ColumnSettings, FilterState, Ownership, PinSide, SortState};
use crate::virtualize::Virtualizer;

type RowIdFn<T> = Box<dyn Fn(&T, usize) -> String>;
type SortCallback = Box<dyn FnMut(&SortState)>;
type FilterCallback = Box<dyn FnMut(&FilterState)>;

enum Mode {
    Internal,
    Controlled {
        on_sorting_change: SortCallback,
        on_filters_change: FilterCallback,
    },
}

/// A sortable, filterable, pinnable, virtualized table over rows of `T`.
///
/// Sort and filter state are owned according to the [`Ownership`] passed at
/// construction. Internally owned state re-derives the row model on every
/// change; controlled state only reports the proposed next state and shows
/// rows in the order given.
///
/// ```
/// use paygrid_seeker::{Number, Seekable, Value};
/// use paygrid_view::{ColumnDef, DataTable, GridOptions, Ownership};
///
/// struct Settlement { id: &'static str, net: i64 }
///
/// impl Seekable for Settlement {
///     fn field_value(&self, field: &str) -> Value<'_> {
///         match field {
///             "id" => Value::text(self.id),
///             "net" => Value::Number(Number::I64(self.net)),
///             _ => Value::None,
///         }
///     }
/// }
///
/// let rows = vec![
///     Settlement { id: "STL-1", net: 900 },
///     Settlement { id: "STL-2", net: 300 },
/// ];
/// let columns = vec![ColumnDef::key("id"), ColumnDef::key("net")];
/// let mut table = DataTable::new(columns, rows, GridOptions::default(), Ownership::Internal)?;
///
/// table.toggle_sort("net")?;
/// let ids: Vec<_> = table.rows().iter().map(|s| s.id).collect();
/// assert_eq!(ids, ["STL-2", "STL-1"]);
/// # Ok::<(), paygrid_view::GridError>(())
/// ```
pub struct DataTable<T> {
    columns: Vec<ColumnDef<T>>,
    data: Vec<T>,
    export_data: Option<Vec<T>>,
    options: GridOptions,
    mode: Mode,
    sorting: SortState,
    filters: FilterState,
    settings: ColumnSettings,
    row_model: Vec<usize>,
    row_id: Option<RowIdFn<T>>,
    loading: bool,
    error: Option<String>,
    on_retry: Option<Box<dyn FnMut()>>,
    scroll: u64,
    pagination: Option<Pagination>,
}

impl<T> DataTable<T> {
    pub fn new(
        columns: Vec<ColumnDef<T>>,
        data: Vec<T>,
        options: GridOptions,
        ownership: Ownership,
    ) -> Result<Self> {
        let mut seen = HashSet::new();
        for col in &columns {
            if !seen.insert(col.id()) {
                return Err(GridError::DuplicateColumn(col.id().to_string()));
            }
        }

        let (mode, sorting, filters) = match ownership {
            Ownership::Internal => (Mode::Internal, SortState::default(), FilterState::default()),
            Ownership::Controlled {
                sorting,
                filters,
                on_sorting_change,
                on_filters_change,
            } => (
                Mode::Controlled {
                    on_sorting_change,
                    on_filters_change,
                },
                sorting,
                filters,
            ),
        };

        let mut table = DataTable {
            columns,
            data,
            export_data: None,
            options,
            mode,
            sorting,
            filters,
            settings: ColumnSettings::default(),
            row_model: Vec::new(),
            row_id: None,
            loading: false,
            error: None,
            on_retry: None,
            scroll: 0,
            pagination: None,
        };
        table.refresh();
        tracing::debug!(
            columns = table.columns.len(),
            rows = table.data.len(),
            controlled = table.is_controlled(),
            "table created"
        );
        Ok(table)
    }

    /// Derives a stable key per row for front-ends that diff rows.
    pub fn with_row_id<F>(mut self, f: F) -> Self
    where
        F: Fn(&T, usize) -> String + 'static,
    {
        self.row_id = Some(Box::new(f));
        self
    }

    pub fn with_pagination(mut self, pagination: Pagination) -> Self {
        self.pagination = Some(pagination);
        self
    }

    /// Registers the retry action shown with the error body.
    pub fn with_retry<F>(mut self, f: F) -> Self
    where
        F: FnMut() + 'static,
    {
        self.on_retry = Some(Box::new(f));
        self
    }

    pub fn is_controlled(&self) -> bool {
        matches!(self.mode, Mode::Controlled { .. })
    }

    pub fn columns(&self) -> &[ColumnDef<T>] {
        &self.columns
    }

    pub fn options(&self) -> &GridOptions {
        &self.options
    }

    pub fn sorting(&self) -> &SortState {
        &self.sorting
    }

    pub fn filters(&self) -> &FilterState {
        &self.filters
    }

    pub fn column_settings(&self) -> &ColumnSettings {
        &self.settings
    }

    pub fn pagination(&self) -> Option<&Pagination> {
        self.pagination.as_ref()
    }

    fn column(&self, id: &str) -> Result<&ColumnDef<T>> {
        self.columns
            .iter()
            .find(|c| c.id() == id)
            .ok_or_else(|| GridError::unknown(id))
    }

    /// Header click on `id`. Returns the next sort state.
    ///
    /// Internal mode applies it; controlled mode hands it to the caller, who
    /// syncs it back with [`set_sorting`](Self::set_sorting).
    pub fn toggle_sort(&mut self, id: &str) -> Result<SortState> {
        if !self.column(id)?.is_sortable() {
            return Err(GridError::NotSortable(id.to_string()));
        }
        let next = self.sorting.toggled(id, self.options.sort_removal);
        tracing::debug!(column = id, sort = ?next, "sort toggled");
        match &mut self.mode {
            Mode::Internal => self.apply_sorting(next.clone()),
            Mode::Controlled {
                on_sorting_change, ..
            } => on_sorting_change(&next),
        }
        Ok(next)
    }

    /// Replaces the sort state without notifying.
    pub fn set_sorting(&mut self, sorting: SortState) {
        self.apply_sorting(sorting);
    }

    fn apply_sorting(&mut self, sorting: SortState) {
        self.sorting = sorting;
        self.refresh();
    }

    /// Sets one column filter. `Null` clears it. Returns the next filter
    /// state, applied or reported like [`toggle_sort`](Self::toggle_sort).
    pub fn set_column_filter(&mut self, id: &str, value: serde_json::Value) -> Result<FilterState> {
        self.column(id)?;
        let next = self.filters.clone().with(id, value);
        tracing::debug!(column = id, "filter changed");
        match &mut self.mode {
            Mode::Internal => self.apply_filters(next.clone()),
            Mode::Controlled {
                on_filters_change, ..
            } => on_filters_change(&next),
        }
        Ok(next)
    }

    /// Replaces the filter state without notifying.
    pub fn set_filters(&mut self, filters: FilterState) {
        self.apply_filters(filters);
    }

    fn apply_filters(&mut self, filters: FilterState) {
        self.filters = filters;
        self.refresh();
    }

    /// Sets one column's width, clamped to the allowed range.
    pub fn resize_column(&mut self, id: &str, px: u32) -> Result<u32> {
        if !self.column(id)?.is_resizable() {
            return Err(GridError::NotResizable(id.to_string()));
        }
        Ok(self.settings.resize(id, px))
    }

    pub fn reset_column_size(&mut self, id: &str) -> Result<()> {
        self.column(id)?;
        self.settings.sizing.remove(id);
        Ok(())
    }

    pub fn pin_column(&mut self, id: &str, side: PinSide) -> Result<()> {
        self.column(id)?;
        self.settings.pinning.pin(id, side);
        tracing::debug!(column = id, ?side, "column pinned");
        Ok(())
    }

    pub fn set_column_visibility(&mut self, id: &str, visible: bool) -> Result<()> {
        let hideable = self.column(id)?.is_hideable();
        if !visible && !hideable {
            return Err(GridError::NotHideable(id.to_string()));
        }
        self.settings.visibility.insert(id.to_string(), visible);
        Ok(())
    }

    pub fn column_width(&self, id: &str) -> Result<u32> {
        let col = self.column(id)?;
        Ok(self.width_of(col))
    }

    fn width_of(&self, col: &ColumnDef<T>) -> u32 {
        self.settings
            .sizing
            .get(col.id())
            .copied()
            .unwrap_or_else(|| col.default_width())
    }

    /// Replaces the displayed rows and re-derives the row model.
    pub fn set_data(&mut self, data: Vec<T>) {
        self.data = data;
        self.refresh();
    }

    /// Full dataset for exports. Empty or `None` falls back to the row model.
    pub fn set_export_data(&mut self, data: Option<Vec<T>>) {
        self.export_data = data;
    }

    pub fn set_loading(&mut self, loading: bool) {
        self.loading = loading;
    }

    pub fn set_error(&mut self, message: Option<String>) {
        self.error = message;
    }

    /// Runs the retry action. Returns false when none is registered.
    pub fn retry(&mut self) -> bool {
        match self.on_retry.as_mut() {
            Some(f) => {
                f();
                true
            }
            None => false,
        }
    }

    pub fn set_scroll_offset(&mut self, px: u64) {
        self.scroll = px;
    }

    pub fn set_pagination(&mut self, pagination: Option<Pagination>) {
        self.pagination = pagination;
    }

    /// Reports a page change through the pagination callback.
    pub fn change_page(&mut self, page_index: usize, page_size: usize) -> Result<()> {
        self.pagination
            .as_mut()
            .ok_or(GridError::NoPagination)?
            .change(page_index, page_size)
    }

    /// Rows in display order.
    pub fn rows(&self) -> Vec<&T> {
        self.row_model.iter().map(|&i| &self.data[i]).collect()
    }

    pub fn row_count(&self) -> usize {
        self.row_model.len()
    }

    fn refresh(&mut self) {
        let mut model: Vec<usize> = (0..self.data.len()).collect();
        if let Mode::Internal = self.mode {
            self.filter_rows(&mut model);
            self.sort_rows(&mut model);
        }
        self.row_model = model;
    }

    fn filter_rows(&self, model: &mut Vec<usize>) {
        let active: Vec<(&ColumnDef<T>, &serde_json::Value)> = self
            .filters
            .iter()
            .filter_map(|(id, v)| self.columns.iter().find(|c| c.id() == id).map(|c| (c, v)))
            .collect();
        if active.is_empty() {
            return;
        }
        model.retain(|&i| {
            active
                .iter()
                .all(|(col, value)| col.matches_filter(&self.data[i], value))
        });
    }

    fn sort_rows(&self, model: &mut [usize]) {
        let orderings: Vec<OrderBy> = self
            .sorting
            .keys()
            .iter()
            .filter(|k| {
                self.columns
                    .iter()
                    .any(|c| c.id() == k.field && c.is_sortable())
            })
            .cloned()
            .collect();
        if orderings.is_empty() {
            return;
        }
        let accessor = column_accessor(&self.columns);
        model.sort_by(|&a, &b| {
            compare_by_orderings(&self.data[a], &self.data[b], &orderings, &accessor)
        });
    }

    fn placed(&self) -> Vec<Placed> {
        let cols: Vec<(&str, u32, bool)> = self
            .columns
            .iter()
            .map(|c| (c.id(), self.width_of(c), self.settings.is_visible(c.id())))
            .collect();
        layout::place(&cols, &self.settings.pinning)
    }

    /// Snapshot of what to draw for the current state.
    pub fn frame(&self) -> TableFrame {
        let placed = self.placed();
        let headers: Vec<HeaderCell> = placed
            .iter()
            .map(|p| {
                let col = &self.columns[p.index];
                let sortable = col.is_sortable();
                let sort = self.sorting.direction_of(col.id());
                HeaderCell {
                    role: Role::Columnheader,
                    id: col.id().to_string(),
                    label: col.label().to_string(),
                    width: p.width,
                    sortable,
                    sort,
                    aria_sort: sortable.then(|| AriaSort::from(sort)),
                    resizable: col.is_resizable(),
                    pin: p.pin.clone(),
                }
            })
            .collect();

        let body = self.body(&placed);
        let total = self
            .pagination
            .as_ref()
            .map_or(self.data.len(), |p| p.total);
        let live_message = self
            .options
            .live_text
            .clone()
            .unwrap_or_else(|| format!("Showing {} of {} rows", self.row_model.len(), total));

        TableFrame {
            role: Role::Table,
            caption: self.options.caption_text().to_string(),
            live_role: Role::Status,
            live_message,
            col_count: headers.len(),
            row_count: total + 1,
            total_width: placed.iter().map(|p| u64::from(p.width)).sum(),
            header_group: Role::Rowgroup,
            headers,
            body_group: Role::Rowgroup,
            body,
            pagination: self.pagination.as_ref().map(Pagination::info),
            export_enabled: self.options.enable_export,
        }
    }

    fn body(&self, placed: &[Placed]) -> FrameBody {
        if self.loading {
            return FrameBody::Loading;
        }
        if let Some(message) = &self.error {
            return FrameBody::Error {
                message: message.clone(),
                can_retry: self.on_retry.is_some(),
            };
        }
        if self.row_model.is_empty() {
            return FrameBody::Empty {
                message: self.options.empty_text.clone(),
            };
        }

        let window = self.virtualizer().window(self.row_model.len(), self.scroll);
        let rows = window
            .range()
            .map(|pos| {
                let index = self.row_model[pos];
                let row = &self.data[index];
                let key = match &self.row_id {
                    Some(f) => f(row, index),
                    None => index.to_string(),
                };
                let cells = placed
                    .iter()
                    .map(|p| {
                        let col = &self.columns[p.index];
                        FrameCell {
                            role: Role::Cell,
                            column: col.id().to_string(),
                            text: col.render(row),
                            width: p.width,
                            pin: p.pin.clone(),
                        }
                    })
                    .collect();
                FrameRow {
                    role: Role::Row,
                    key,
                    index: pos,
                    aria_row_index: pos + 2,
                    cells,
                }
            })
            .collect();

        FrameBody::Rows {
            leading: window.leading,
            rows,
            trailing: window.trailing,
        }
    }

    pub fn virtualizer(&self) -> Virtualizer {
        Virtualizer::new(
            self.options.row_height,
            self.options.height,
            self.options.overscan,
        )
    }

    /// Header labels and raw values of every exportable column, in display
    /// order, hidden columns included.
    pub fn export_matrix(&self) -> Result<ExportMatrix> {
        let ids: Vec<&str> = self.columns.iter().map(|c| c.id()).collect();
        let cols: Vec<&ColumnDef<T>> = layout::display_order(&ids, &self.settings.pinning)
            .into_iter()
            .map(|i| &self.columns[i])
            .filter(|c| c.is_exportable())
            .collect();
        if cols.is_empty() {
            return Err(GridError::NothingToExport);
        }

        let mut matrix = ExportMatrix::new(cols.iter().map(|c| c.label().to_string()).collect());
        let row_values = |row: &T| -> Vec<Value<'static>> {
            cols.iter().map(|c| c.value(row).into_owned()).collect()
        };
        match self.export_data.as_deref() {
            Some(all) if !all.is_empty() => all.iter().for_each(|r| matrix.push_row(row_values(r))),
            _ => self
                .row_model
                .iter()
                .for_each(|&i| matrix.push_row(row_values(&self.data[i]))),
        }
        Ok(matrix)
    }

    fn ensure_export(&self) -> Result<()> {
        if self.options.enable_export {
            Ok(())
        } else {
            Err(GridError::ExportDisabled)
        }
    }

    pub fn export_csv(&self) -> Result<ExportFile> {
        self.ensure_export()?;
        let matrix = self.export_matrix()?;
        let bytes = to_csv(&matrix)?;
        tracing::debug!(rows = matrix.rows.len(), bytes = bytes.len(), "csv export");
        Ok(ExportFile {
            file_name: format!("{}.csv", self.options.export_file_name),
            mime: CSV_MIME,
            bytes,
        })
    }

    pub fn export_xlsx(&self, loader: &dyn WorkbookLoader) -> Result<ExportFile> {
        self.ensure_export()?;
        let matrix = self.export_matrix()?;
        let mut writer = loader.load().inspect_err(|err| {
            tracing::warn!(error = %err, "workbook writer failed to load");
        })?;
        let bytes = writer
            .write(&self.options.sheet_name, &matrix)
            .inspect_err(|err| tracing::warn!(error = %err, "xlsx export failed"))?;
        tracing::debug!(rows = matrix.rows.len(), bytes = bytes.len(), "xlsx export");
        Ok(ExportFile {
            file_name: format!("{}.xlsx", self.options.export_file_name),
            mime: XLSX_MIME,
            bytes,
        })
    }

    pub fn download_csv(&self, sink: &dyn DownloadSink) -> Result<()> {
        let file = self.export_csv()?;
        deliver(sink, &file)
    }

    pub fn download_xlsx(
        &self,
        loader: &dyn WorkbookLoader,
        sink: &dyn DownloadSink,
    ) -> Result<()> {
        let file = self.export_xlsx(loader)?;
        deliver(sink, &file)
    }
}

fn deliver(sink: &dyn DownloadSink, file: &ExportFile) -> Result<()> {
    sink.deliver(file).inspect_err(|err| {
        tracing::warn!(file = %file.file_name, error = %err, "download failed");
    })
}

impl<T> fmt::Debug for DataTable<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DataTable")
            .field("columns", &self.columns)
            .field("rows", &self.data.len())
            .field("controlled", &self.is_controlled())
            .field("sorting", &self.sorting)
            .field("filters", &self.filters)
            .field("settings", &self.settings)
            .finish_non_exhaustive()
    }
}

/// Field access by column id, for the seeker's ordering helpers.
fn column_accessor<T>(columns: &[ColumnDef<T>]) -> impl for<'a> Fn(&'a T, &str) -> Value<'a> + '_ {
    move |row, field| {
        columns
            .iter()
            .find(|c| c.id() == field)
            .map_or(Value::None, |c| c.value(row))
    }
}
