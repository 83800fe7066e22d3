use std::collections::VecDeque;

use chrono::{DateTime, Local};
use parking_lot::Mutex;
use serde_json::Value;
use thiserror::Error;

use super::settings::SettingsGetter;

/// Sink for UI event notifications.
///
/// Callers treat logging as best-effort: an `Err` is reported and ignored,
/// it never interrupts the action that produced the event.
pub trait EventLogger: Send + Sync {
    fn log_event(
        &self,
        message: &str,
        event_key: &str,
        payload: Option<Value>,
    ) -> Result<(), LogError>;
}

#[derive(Debug, Error)]
pub enum LogError {
    #[error("Event sink unavailable: {0}")]
    Unavailable(String),
    #[error("Event rejected: {0}")]
    Rejected(String),
}

/// A recorded event
#[derive(Debug, Clone)]
pub struct DebugEntry {
    pub at: DateTime<Local>,
    pub message: String,
    pub event_key: String,
    pub payload: Option<Value>,
}

/// Bounded in-memory event log backing the debug console
pub struct DebugLogger {
    settings: SettingsGetter,
    entries: Mutex<VecDeque<DebugEntry>>,
}

impl DebugLogger {
    pub fn new(settings: SettingsGetter) -> Self {
        Self {
            settings,
            entries: Mutex::new(VecDeque::new()),
        }
    }

    /// Entries in recording order (oldest first)
    pub fn entries(&self) -> Vec<DebugEntry> {
        self.entries.lock().iter().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }

    pub fn clear(&self) {
        self.entries.lock().clear();
    }
}

impl EventLogger for DebugLogger {
    fn log_event(
        &self,
        message: &str,
        event_key: &str,
        payload: Option<Value>,
    ) -> Result<(), LogError> {
        // Read on every event: settings may have been toggled since setup
        let settings = (self.settings)();
        if !settings.enabled || settings.is_muted(event_key) {
            return Ok(());
        }

        if settings.mirror_to_tracing {
            tracing::debug!(event_key, payload = ?payload, "{}", message);
        }

        let mut entries = self.entries.lock();
        entries.push_back(DebugEntry {
            at: Local::now(),
            message: message.to_string(),
            event_key: event_key.to_string(),
            payload,
        });
        while entries.len() > settings.max_entries {
            entries.pop_front();
        }

        Ok(())
    }
}
