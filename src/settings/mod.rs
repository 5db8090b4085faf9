//! Settings store with change notification.
//!
//! `SettingsManager` is the single writer of the current [`Settings`].
//! Every change is published on a `tokio::sync::watch` channel so a running
//! session can pick it up without polling.

use tokio::sync::watch;
use tracing::debug;

use crate::types::{Settings, SettingsError, MAX_BREAK_MINUTES, MAX_FOCUS_MINUTES, MIN_MINUTES};

/// Owns the current settings and notifies subscribers on change.
#[derive(Debug)]
pub struct SettingsManager {
    tx: watch::Sender<Settings>,
}

impl Default for SettingsManager {
    fn default() -> Self {
        Self::new(Settings::default())
    }
}

impl SettingsManager {
    pub fn new(settings: Settings) -> Self {
        let (tx, _rx) = watch::channel(settings);
        Self { tx }
    }

    /// Returns a copy of the current settings.
    #[must_use]
    pub fn current(&self) -> Settings {
        *self.tx.borrow()
    }

    /// Hands out a receiver that sees every later change.
    pub fn subscribe(&self) -> watch::Receiver<Settings> {
        self.tx.subscribe()
    }

    /// Sets the focus length, clamped to 1-120 minutes.
    pub fn set_focus_minutes(&self, minutes: u32) {
        let minutes = minutes.clamp(MIN_MINUTES, MAX_FOCUS_MINUTES);
        self.update(|s| s.focus_minutes = minutes);
    }

    /// Sets the short break length, clamped to 1-60 minutes.
    pub fn set_short_break_minutes(&self, minutes: u32) {
        let minutes = minutes.clamp(MIN_MINUTES, MAX_BREAK_MINUTES);
        self.update(|s| s.short_break_minutes = minutes);
    }

    /// Sets the long break length, clamped to 1-60 minutes.
    pub fn set_long_break_minutes(&self, minutes: u32) {
        let minutes = minutes.clamp(MIN_MINUTES, MAX_BREAK_MINUTES);
        self.update(|s| s.long_break_minutes = minutes);
    }

    pub fn set_auto_start_breaks(&self, enabled: bool) {
        self.update(|s| s.auto_start_breaks = enabled);
    }

    /// Replaces all settings at once.
    ///
    /// # Errors
    ///
    /// Rejects out-of-range values and leaves the current settings in place.
    pub fn replace(&self, settings: Settings) -> Result<(), SettingsError> {
        settings.validate()?;
        self.update(|s| *s = settings);
        Ok(())
    }

    fn update(&self, apply: impl FnOnce(&mut Settings)) {
        self.tx.send_modify(apply);
        debug!(settings = ?*self.tx.borrow(), "settings changed");
    }
}
