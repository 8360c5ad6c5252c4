//! # Paygrid
//!
//! Building blocks for merchant payment dashboards: a headless data table
//! with sorting, filtering, pinning, virtualization and CSV/XLSX export,
//! plus the session, secret and upload behaviors that surround it.
//!
//! This crate re-exports the member crates and adds a single configuration
//! document ([`PaygridConfig`]) covering all of them.
//!
//! | Crate | Provides |
//! |-------|----------|
//! | [`seeker`] | Typed values, comparison, stable multi-key sort, filter clauses |
//! | [`view`] | [`DataTable`], frames, pagination, export |
//! | [`console`] | Idle timeout, masked values, uploads, jobs, presets |
//!
//! ```
//! use paygrid::{ColumnDef, DataTable, PaygridConfig, Ownership};
//! use paygrid::seeker::{Seekable, Value};
//!
//! struct Settlement { id: &'static str, net: i64 }
//!
//! impl Seekable for Settlement {
//!     fn field_value(&self, field: &str) -> Value<'_> {
//!         match field {
//!             "id" => Value::text(self.id),
//!             "net" => Value::from(self.net),
//!             _ => Value::None,
//!         }
//!     }
//! }
//!
//! let config = PaygridConfig::from_yaml_str("grid:\n  export_file_name: settlements\n")?;
//! let rows = vec![
//!     Settlement { id: "STL-002", net: 900 },
//!     Settlement { id: "STL-001", net: 1200 },
//! ];
//! let columns = vec![
//!     ColumnDef::key("id").header("Settlement"),
//!     ColumnDef::key("net").header("Net"),
//! ];
//! let mut table = DataTable::new(columns, rows, config.grid, Ownership::Internal)?;
//! table.toggle_sort("id")?;
//! let ids: Vec<_> = table.rows().iter().map(|s| s.id).collect();
//! assert_eq!(ids, ["STL-001", "STL-002"]);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

mod config;

pub use config::{ConfigError, PaygridConfig};

pub use paygrid_console as console;
pub use paygrid_seeker as seeker;
pub use paygrid_view as view;

pub use paygrid_console::{
    ConsoleError, IdleConfig, IdleTimer, MaskedValue, PresetStore, RevealConfig, SessionGuard,
    Storage, UploadConfig, UploadQueue,
};
pub use paygrid_view::{
    ColumnDef, DataTable, FilterState, GridError, GridOptions, Ownership, SortState, TableFrame,
};
