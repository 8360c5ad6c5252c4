//! Idle-session timeout.
//!
//! [`IdleTimer`] is a poll-driven state machine: the host feeds it activity
//! and the current time, and it answers with warning and timeout events.
//! [`SessionGuard`] wires a timer to a clock and a storage port and records
//! the expiry timestamp the login page reads back.

use std::sync::Arc;

use chrono::{DateTime, SecondsFormat};
use serde::{Deserialize, Serialize};

use crate::env::Clock;
use crate::error::Result;
use crate::storage::Storage;

/// Storage key holding the time the last session expired.
pub const SESSION_EXPIRED_KEY: &str = "sessionExpiredAt";

/// Idle timeout settings, in milliseconds.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct IdleConfig {
    pub timeout_ms: u64,
    /// How long before the timeout the warning opens. Zero disables it.
    pub warning_ms: u64,
    pub disabled: bool,
}

impl Default for IdleConfig {
    fn default() -> Self {
        IdleConfig {
            timeout_ms: 15 * 60 * 1000,
            warning_ms: 60 * 1000,
            disabled: false,
        }
    }
}

impl IdleConfig {
    /// Idle time after which the warning opens, if it opens at all.
    fn warn_after(&self) -> Option<u64> {
        let at = self.timeout_ms.saturating_sub(self.warning_ms);
        (self.warning_ms > 0 && at > 0).then_some(at)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum IdleEvent {
    /// The warning opened. Activity is ignored until [`IdleTimer::extend`].
    Warn,
    /// The session expired.
    Timeout,
}

#[derive(Clone, Debug)]
pub struct IdleTimer {
    config: IdleConfig,
    last_activity: i64,
    warning_open: bool,
    expired: bool,
}

impl IdleTimer {
    pub fn new(config: IdleConfig, now: i64) -> Self {
        IdleTimer {
            config,
            last_activity: now,
            warning_open: false,
            expired: false,
        }
    }

    pub fn config(&self) -> &IdleConfig {
        &self.config
    }

    pub fn is_warning(&self) -> bool {
        self.warning_open
    }

    pub fn is_expired(&self) -> bool {
        self.expired
    }

    /// Time at which the session expires without further activity.
    pub fn deadline(&self) -> i64 {
        self.last_activity
            .saturating_add(i64::try_from(self.config.timeout_ms).unwrap_or(i64::MAX))
    }

    /// Advances the timer. Each event fires once per idle period.
    pub fn poll(&mut self, now: i64) -> Option<IdleEvent> {
        if self.config.disabled || self.expired {
            return None;
        }
        let idle = u64::try_from(now.saturating_sub(self.last_activity)).unwrap_or(0);
        if idle >= self.config.timeout_ms {
            self.expired = true;
            self.warning_open = false;
            return Some(IdleEvent::Timeout);
        }
        match self.config.warn_after() {
            Some(at) if idle >= at && !self.warning_open => {
                self.warning_open = true;
                Some(IdleEvent::Warn)
            }
            _ => None,
        }
    }

    /// Registers user activity. Ignored while the warning is open, after
    /// expiry, and when disabled. Returns whether the timer was reset.
    pub fn record_activity(&mut self, now: i64) -> bool {
        if self.warning_open {
            return false;
        }
        self.reset(now)
    }

    /// Keeps the session alive from the warning.
    pub fn extend(&mut self, now: i64) -> bool {
        self.reset(now)
    }

    fn reset(&mut self, now: i64) -> bool {
        if self.config.disabled || self.expired {
            return false;
        }
        self.warning_open = false;
        self.last_activity = now;
        true
    }

    /// Whole seconds left on the warning countdown, rounded up.
    pub fn seconds_left(&self, now: i64) -> Option<u64> {
        if !self.warning_open {
            return None;
        }
        let left = self.deadline().saturating_sub(now).max(0) as u64;
        Some(left.div_ceil(1000))
    }
}

/// Formats epoch milliseconds as an RFC 3339 UTC timestamp with
/// millisecond precision, e.g. `2024-01-01T09:30:00.000Z`.
pub fn format_timestamp(millis: i64) -> String {
    DateTime::from_timestamp_millis(millis)
        .map(|t| t.to_rfc3339_opts(SecondsFormat::Millis, true))
        .unwrap_or_else(|| millis.to_string())
}

/// An idle timer bound to a clock and the session-expiry storage key.
pub struct SessionGuard<C: Clock, S: Storage> {
    timer: IdleTimer,
    clock: Arc<C>,
    storage: Arc<S>,
}

impl<C: Clock, S: Storage> SessionGuard<C, S> {
    pub fn new(config: IdleConfig, clock: Arc<C>, storage: Arc<S>) -> Self {
        let timer = IdleTimer::new(config, clock.now_millis());
        SessionGuard {
            timer,
            clock,
            storage,
        }
    }

    pub fn timer(&self) -> &IdleTimer {
        &self.timer
    }

    /// Polls the timer at the current time. On timeout the expiry
    /// timestamp is written to storage.
    pub fn tick(&mut self) -> Result<Option<IdleEvent>> {
        let now = self.clock.now_millis();
        let event = self.timer.poll(now);
        match event {
            Some(IdleEvent::Warn) => {
                tracing::debug!(seconds_left = ?self.timer.seconds_left(now), "idle warning");
            }
            Some(IdleEvent::Timeout) => {
                let stamp = format_timestamp(now);
                tracing::info!(expired_at = %stamp, "session expired");
                self.storage
                    .set(SESSION_EXPIRED_KEY, &stamp)
                    .inspect_err(|err| tracing::warn!(error = %err, "failed to record expiry"))?;
            }
            None => {}
        }
        Ok(event)
    }

    pub fn record_activity(&mut self) -> bool {
        self.timer.record_activity(self.clock.now_millis())
    }

    pub fn extend(&mut self) -> bool {
        self.timer.extend(self.clock.now_millis())
    }

    pub fn seconds_left(&self) -> Option<u64> {
        self.timer.seconds_left(self.clock.now_millis())
    }

    /// Expiry timestamp left by a previous session, for the login banner.
    pub fn expired_banner(&self) -> Result<Option<String>> {
        self.storage.get(SESSION_EXPIRED_KEY)
    }

    pub fn dismiss_banner(&self) -> Result<()> {
        self.storage.remove(SESSION_EXPIRED_KEY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MIN: i64 = 60_000;

    #[test]
    fn warns_then_times_out() {
        let mut t = IdleTimer::new(IdleConfig::default(), 0);
        assert_eq!(t.poll(13 * MIN), None);
        assert_eq!(t.poll(14 * MIN), Some(IdleEvent::Warn));
        assert_eq!(t.poll(14 * MIN + 500), None);
        assert_eq!(t.seconds_left(14 * MIN + 500), Some(60));
        assert_eq!(t.seconds_left(15 * MIN - 1), Some(1));
        assert_eq!(t.poll(15 * MIN), Some(IdleEvent::Timeout));
        assert_eq!(t.poll(20 * MIN), None);
        assert!(t.is_expired());
    }

    #[test]
    fn activity_resets_before_warning() {
        let mut t = IdleTimer::new(IdleConfig::default(), 0);
        assert!(t.record_activity(10 * MIN));
        assert_eq!(t.poll(24 * MIN - 1), None);
        assert_eq!(t.poll(24 * MIN), Some(IdleEvent::Warn));
    }

    #[test]
    fn activity_is_ignored_while_warning_is_open() {
        let mut t = IdleTimer::new(IdleConfig::default(), 0);
        t.poll(14 * MIN);
        assert!(!t.record_activity(14 * MIN + 10));
        assert!(t.extend(14 * MIN + 20));
        assert!(!t.is_warning());
        assert_eq!(t.poll(15 * MIN), None);
    }

    #[test]
    fn zero_warning_goes_straight_to_timeout() {
        let cfg = IdleConfig {
            warning_ms: 0,
            ..IdleConfig::default()
        };
        let mut t = IdleTimer::new(cfg, 0);
        assert_eq!(t.poll(14 * MIN + 30_000), None);
        assert_eq!(t.poll(15 * MIN), Some(IdleEvent::Timeout));
    }

    #[test]
    fn disabled_timer_is_inert() {
        let cfg = IdleConfig {
            disabled: true,
            ..IdleConfig::default()
        };
        let mut t = IdleTimer::new(cfg, 0);
        assert_eq!(t.poll(60 * MIN), None);
        assert!(!t.record_activity(1));
    }

    #[test]
    fn late_poll_skips_warning() {
        let mut t = IdleTimer::new(IdleConfig::default(), 0);
        assert_eq!(t.poll(16 * MIN), Some(IdleEvent::Timeout));
    }

    #[test]
    fn formats_like_iso_strings() {
        assert_eq!(format_timestamp(1_704_067_200_123), "2024-01-01T00:00:00.123Z");
    }
}
