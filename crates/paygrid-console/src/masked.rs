//! Masked secrets with timed reveal.
//!
//! API keys and webhook signing secrets are shown masked. A reveal shows
//! the plain value until it is toggled off or the reveal duration passes.

use serde::{Deserialize, Serialize};

use crate::env::ClipboardWriter;
use crate::error::{ConsoleError, Result};

/// Reveal behavior for one masked value.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RevealConfig {
    /// Auto-hide delay. Zero or negative keeps the value shown.
    pub reveal_duration_ms: i64,
    /// Allow a single reveal; once hidden it cannot be shown again.
    pub one_time: bool,
    /// Start revealed.
    pub auto_reveal: bool,
    pub can_reveal: bool,
    pub allow_copy: bool,
}

impl Default for RevealConfig {
    fn default() -> Self {
        RevealConfig {
            reveal_duration_ms: 5000,
            one_time: false,
            auto_reveal: false,
            can_reveal: true,
            allow_copy: true,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RevealEvent {
    Revealed,
    Hidden,
}

/// Mask for a secret: the last four characters behind at least four `*`.
///
/// Values of four characters or fewer, and absent values, mask as `****`.
pub fn mask(value: Option<&str>) -> String {
    let chars: Vec<char> = value.unwrap_or_default().chars().collect();
    if chars.len() <= 4 {
        return "****".to_string();
    }
    let tail: String = chars[chars.len() - 4..].iter().collect();
    format!("{}{}", "*".repeat((chars.len() - 4).max(4)), tail)
}

#[derive(Clone, Debug)]
pub struct MaskedValue {
    value: Option<String>,
    mask_override: Option<String>,
    config: RevealConfig,
    revealed: bool,
    revealed_once: bool,
    hide_at: Option<i64>,
}

impl MaskedValue {
    pub fn new(value: Option<String>, config: RevealConfig, now: i64) -> Self {
        let value = value.filter(|v| !v.is_empty());
        let revealed = config.auto_reveal && value.is_some();
        let mut masked = MaskedValue {
            value,
            mask_override: None,
            config,
            revealed: false,
            revealed_once: false,
            hide_at: None,
        };
        if revealed {
            masked.show(now);
        }
        masked
    }

    /// Uses a fixed mask instead of one derived from the value.
    pub fn with_mask(mut self, mask: impl Into<String>) -> Self {
        self.mask_override = Some(mask.into()).filter(|m: &String| !m.is_empty());
        self
    }

    pub fn is_revealed(&self) -> bool {
        self.revealed
    }

    pub fn mask(&self) -> String {
        match &self.mask_override {
            Some(m) => m.clone(),
            None => mask(self.value.as_deref()),
        }
    }

    /// Text to show: the value while revealed, else the mask.
    pub fn display(&self) -> String {
        match (&self.value, self.revealed) {
            (Some(v), true) => v.clone(),
            _ => self.mask(),
        }
    }

    pub fn can_toggle(&self) -> bool {
        self.value.is_some()
            && self.config.can_reveal
            && !(self.config.one_time && self.revealed_once && !self.revealed)
    }

    pub fn can_copy(&self) -> bool {
        self.value.is_some() && self.config.allow_copy
    }

    /// Flips between masked and revealed.
    pub fn toggle(&mut self, now: i64) -> Result<RevealEvent> {
        if !self.can_toggle() {
            return Err(ConsoleError::RevealDisabled);
        }
        if self.revealed {
            self.hide();
            Ok(RevealEvent::Hidden)
        } else {
            self.show(now);
            Ok(RevealEvent::Revealed)
        }
    }

    /// Applies the auto-hide deadline.
    pub fn poll(&mut self, now: i64) -> Option<RevealEvent> {
        match self.hide_at {
            Some(at) if self.revealed && now >= at => {
                self.hide();
                Some(RevealEvent::Hidden)
            }
            _ => None,
        }
    }

    /// Copies the plain value, revealed or not.
    pub fn copy_to(&self, clipboard: &dyn ClipboardWriter) -> Result<()> {
        let value = match &self.value {
            Some(v) if self.config.allow_copy => v,
            _ => return Err(ConsoleError::CopyDisabled),
        };
        clipboard
            .write(value)
            .inspect_err(|err| tracing::warn!(error = %err, "copy failed"))?;
        tracing::info!("sensitive value copied to clipboard");
        Ok(())
    }

    fn show(&mut self, now: i64) {
        self.revealed = true;
        self.revealed_once = true;
        self.hide_at = (self.config.reveal_duration_ms > 0)
            .then(|| now.saturating_add(self.config.reveal_duration_ms));
    }

    fn hide(&mut self) {
        self.revealed = false;
        self.hide_at = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::env::MockClipboard;

    fn secret(config: RevealConfig) -> MaskedValue {
        MaskedValue::new(Some("whsec_8f3a91c2".into()), config, 0)
    }

    #[test]
    fn mask_rule() {
        assert_eq!(mask(None), "****");
        assert_eq!(mask(Some("abcd")), "****");
        assert_eq!(mask(Some("abcdef")), "****cdef");
        assert_eq!(mask(Some("sk_live_123456789")), "*************6789");
    }

    #[test]
    fn reveal_auto_hides() {
        let mut m = secret(RevealConfig::default());
        assert_eq!(m.display(), "**********91c2");
        assert_eq!(m.toggle(1_000).unwrap(), RevealEvent::Revealed);
        assert_eq!(m.display(), "whsec_8f3a91c2");
        assert_eq!(m.poll(5_999), None);
        assert_eq!(m.poll(6_000), Some(RevealEvent::Hidden));
        assert!(!m.is_revealed());
    }

    #[test]
    fn non_positive_duration_never_hides() {
        let mut m = secret(RevealConfig {
            reveal_duration_ms: 0,
            ..RevealConfig::default()
        });
        m.toggle(0).unwrap();
        assert_eq!(m.poll(i64::MAX), None);
        assert!(m.is_revealed());
    }

    #[test]
    fn one_time_reveal_locks_after_hide() {
        let mut m = secret(RevealConfig {
            one_time: true,
            ..RevealConfig::default()
        });
        m.toggle(0).unwrap();
        assert!(m.can_toggle());
        m.toggle(10).unwrap();
        assert!(!m.can_toggle());
        assert!(matches!(m.toggle(20), Err(ConsoleError::RevealDisabled)));
    }

    #[test]
    fn auto_reveal_starts_shown() {
        let m = secret(RevealConfig {
            auto_reveal: true,
            ..RevealConfig::default()
        });
        assert!(m.is_revealed());
        let empty = MaskedValue::new(
            None,
            RevealConfig {
                auto_reveal: true,
                ..RevealConfig::default()
            },
            0,
        );
        assert!(!empty.is_revealed());
        assert!(!empty.can_toggle());
    }

    #[test]
    fn override_mask() {
        let m = secret(RevealConfig::default()).with_mask("whsec_••••");
        assert_eq!(m.display(), "whsec_••••");
    }

    #[test]
    fn copy_respects_gate() {
        let clip = MockClipboard::new();
        secret(RevealConfig::default()).copy_to(&clip).unwrap();
        assert_eq!(clip.contents().as_deref(), Some("whsec_8f3a91c2"));

        let locked = secret(RevealConfig {
            allow_copy: false,
            ..RevealConfig::default()
        });
        assert!(matches!(locked.copy_to(&clip), Err(ConsoleError::CopyDisabled)));
        assert!(matches!(
            secret(RevealConfig::default()).copy_to(&MockClipboard::failing()),
            Err(ConsoleError::ClipboardFailed(_))
        ));
    }
}
