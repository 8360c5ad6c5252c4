//! Behaviors shared by payment console pages.
//!
//! Everything here is a small state machine driven by explicit inputs.
//! Time comes from a [`Clock`], persistence from a [`Storage`], and remote
//! work from a [`JobRunner`], so a page and its tests use the same code
//! with different ports plugged in.
//!
//! - [`IdleTimer`] and [`SessionGuard`]: idle-session warning and timeout.
//! - [`MaskedValue`]: secrets shown masked, revealed on demand and hidden
//!   again after a delay.
//! - [`UploadQueue`] and [`JobTracker`]: validated uploads and keyed jobs
//!   with manual retry.
//! - [`PresetStore`]: named filter presets.
//!
//! ```
//! use std::sync::Arc;
//! use paygrid_console::{IdleConfig, IdleEvent, ManualClock, MemoryStorage, SessionGuard, Storage};
//!
//! let clock = Arc::new(ManualClock::at(0));
//! let storage = Arc::new(MemoryStorage::new());
//! let mut guard = SessionGuard::new(IdleConfig::default(), clock.clone(), storage.clone());
//!
//! clock.advance(14 * 60_000);
//! assert_eq!(guard.tick()?, Some(IdleEvent::Warn));
//! assert_eq!(guard.seconds_left(), Some(60));
//!
//! clock.advance(60_000);
//! assert_eq!(guard.tick()?, Some(IdleEvent::Timeout));
//! assert_eq!(
//!     storage.get("sessionExpiredAt")?.as_deref(),
//!     Some("1970-01-01T00:15:00.000Z")
//! );
//! # Ok::<(), paygrid_console::ConsoleError>(())
//! ```

mod env;
mod error;
mod idle;
mod jobs;
mod masked;
mod presets;
mod storage;
mod upload;

pub use env::{ClipboardWriter, Clock, ManualClock, MockClipboard, SystemClipboard, SystemClock};
pub use error::{ConsoleError, Result};
pub use idle::{
    format_timestamp, IdleConfig, IdleEvent, IdleTimer, SessionGuard, SESSION_EXPIRED_KEY,
};
pub use jobs::{JobRequest, JobRunner, JobState, JobTracker, SimulatedRunner};
pub use masked::{mask, MaskedValue, RevealConfig, RevealEvent};
pub use presets::{PresetStore, SavedPreset, PRESETS_KEY};
pub use storage::{FileStorage, MemoryStorage, Storage};
pub use upload::{UploadConfig, UploadEntry, UploadQueue, UploadStatus};
