//! Environment abstractions for testability.
//!
//! Time and the system clipboard are reached through these traits so
//! timers and copy actions can be driven deterministically in tests.

use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Mutex;

use crate::error::{ConsoleError, Result};

/// Abstraction over wall-clock time.
pub trait Clock: Send + Sync {
    /// Milliseconds since the Unix epoch.
    fn now_millis(&self) -> i64;
}

/// Abstraction over clipboard writes.
pub trait ClipboardWriter: Send + Sync {
    /// Replace the clipboard text.
    fn write(&self, text: &str) -> Result<()>;
}

// === Real implementations ===

/// Real clock using the system time.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_millis(&self) -> i64 {
        chrono::Utc::now().timestamp_millis()
    }
}

/// Real clipboard writer using platform commands.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClipboard;

impl ClipboardWriter for SystemClipboard {
    fn write(&self, text: &str) -> Result<()> {
        write_clipboard_impl(text)
    }
}

#[cfg(target_os = "macos")]
fn write_clipboard_impl(text: &str) -> Result<()> {
    pipe_to(std::process::Command::new("pbcopy"), text)
}

#[cfg(target_os = "linux")]
fn write_clipboard_impl(text: &str) -> Result<()> {
    let mut command = std::process::Command::new("xclip");
    command.args(["-selection", "clipboard"]);
    pipe_to(command, text)
}

#[cfg(not(any(target_os = "macos", target_os = "linux")))]
fn write_clipboard_impl(_text: &str) -> Result<()> {
    Err(ConsoleError::ClipboardFailed(
        "Clipboard not supported on this platform".to_string(),
    ))
}

/// Writes `text` to the command's stdin. The child is always waited on.
#[cfg(any(target_os = "macos", target_os = "linux"))]
fn pipe_to(mut command: std::process::Command, text: &str) -> Result<()> {
    use std::io::Write;
    use std::process::Stdio;

    let failed = |e: std::io::Error| ConsoleError::ClipboardFailed(e.to_string());
    let mut child = command.stdin(Stdio::piped()).spawn().map_err(failed)?;
    // stdin is dropped before the wait so the child sees EOF.
    let written = match child.stdin.take() {
        Some(mut stdin) => stdin.write_all(text.as_bytes()),
        None => Ok(()),
    };
    let status = child.wait().map_err(failed)?;
    written.map_err(failed)?;
    if status.success() {
        Ok(())
    } else {
        Err(ConsoleError::ClipboardFailed(format!(
            "{:?} exited with {status}",
            command.get_program()
        )))
    }
}

// === Mock implementations for testing ===

/// Manually advanced clock.
#[derive(Debug, Default)]
pub struct ManualClock {
    now: AtomicI64,
}

impl ManualClock {
    pub fn at(millis: i64) -> Self {
        Self {
            now: AtomicI64::new(millis),
        }
    }

    pub fn set(&self, millis: i64) {
        self.now.store(millis, Ordering::SeqCst);
    }

    pub fn advance(&self, millis: i64) {
        self.now.fetch_add(millis, Ordering::SeqCst);
    }
}

impl Clock for ManualClock {
    fn now_millis(&self) -> i64 {
        self.now.load(Ordering::SeqCst)
    }
}

/// Clipboard mock that records writes, or fails every write.
#[derive(Debug, Default)]
pub struct MockClipboard {
    writes: Mutex<Vec<String>>,
    fail: bool,
}

impl MockClipboard {
    /// Create a mock that accepts writes.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a mock that rejects every write, like a denied permission.
    pub fn failing() -> Self {
        Self {
            writes: Mutex::new(Vec::new()),
            fail: true,
        }
    }

    /// Last text written.
    pub fn contents(&self) -> Option<String> {
        self.writes.lock().ok()?.last().cloned()
    }

    pub fn write_count(&self) -> usize {
        self.writes.lock().map(|w| w.len()).unwrap_or(0)
    }
}

impl ClipboardWriter for MockClipboard {
    fn write(&self, text: &str) -> Result<()> {
        if self.fail {
            return Err(ConsoleError::ClipboardFailed("permission denied".into()));
        }
        self.writes
            .lock()
            .map_err(|_| ConsoleError::ClipboardFailed("clipboard lock poisoned".into()))?
            .push(text.to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn manual_clock_advances() {
        let clock = ManualClock::at(1_000);
        clock.advance(500);
        assert_eq!(clock.now_millis(), 1_500);
        clock.set(42);
        assert_eq!(clock.now_millis(), 42);
    }

    #[test]
    fn system_clock_is_after_2020() {
        assert!(SystemClock.now_millis() > 1_577_836_800_000);
    }

    #[test]
    fn mock_clipboard_records() {
        let clip = MockClipboard::new();
        clip.write("sk_live_1").unwrap();
        clip.write("sk_live_2").unwrap();
        assert_eq!(clip.contents().as_deref(), Some("sk_live_2"));
        assert_eq!(clip.write_count(), 2);
    }

    #[test]
    fn failing_clipboard_errors() {
        let clip = MockClipboard::failing();
        assert!(matches!(
            clip.write("x"),
            Err(ConsoleError::ClipboardFailed(_))
        ));
        assert_eq!(clip.contents(), None);
    }

    #[cfg(any(target_os = "macos", target_os = "linux"))]
    #[test]
    fn pipe_reports_exit_status() {
        use std::process::Command;

        pipe_to(Command::new("cat"), "sk_live_1").unwrap();
        let err = pipe_to(Command::new("false"), "sk_live_1").unwrap_err();
        assert!(err.to_string().contains("\"false\" exited with"));
    }

    #[cfg(any(target_os = "macos", target_os = "linux"))]
    #[test]
    fn pipe_write_failure_still_reaps_child() {
        use std::process::Command;

        // The child closes stdin and exits, so a payload larger than the pipe
        // buffer fails to write.
        let mut command = Command::new("sh");
        command.args(["-c", "exec 0<&-"]);
        let payload = "x".repeat(1 << 20);
        assert!(matches!(
            pipe_to(command, &payload),
            Err(ConsoleError::ClipboardFailed(_))
        ));
    }
}
