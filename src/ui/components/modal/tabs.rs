//! Active-tab tracking for tabbed modals

use std::sync::Arc;

use serde_json::json;

use super::config::{TabDescriptor, TabSet};
use crate::debug::EventLogger;

/// Owns the active tab id of one modal instance.
///
/// The id is reset to the first tab each time the modal opens and otherwise
/// survives frames while the modal stays open.
#[derive(Default)]
pub struct TabController {
    active: Option<String>,
    logger: Option<Arc<dyn EventLogger>>,
}

impl TabController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_logger(mut self, logger: Arc<dyn EventLogger>) -> Self {
        self.logger = Some(logger);
        self
    }

    pub fn active(&self) -> Option<&str> {
        self.active.as_deref()
    }

    /// Closed → open: start on the first tab
    pub fn reset(&mut self, tabs: &TabSet) {
        self.active = tabs.first().map(|t| t.id.clone());
    }

    /// Modal closed
    pub fn clear(&mut self) {
        self.active = None;
    }

    /// Re-check the active id against the current tabs while open.
    ///
    /// Keeps the active tab when it still exists; otherwise falls back to
    /// the first tab. Returns true if the active id changed.
    pub fn reconcile(&mut self, tabs: &TabSet) -> bool {
        if let Some(active) = &self.active {
            if tabs.contains(active) {
                return false;
            }
        }

        let fallback = tabs.first().map(|t| t.id.clone());
        if fallback == self.active {
            return false;
        }

        tracing::debug!(
            previous = ?self.active,
            fallback = ?fallback,
            "Active tab no longer present, falling back"
        );
        self.active = fallback;
        true
    }

    /// Activate the tab with `id`. Unknown ids and the active tab are ignored.
    pub fn select(&mut self, tabs: &TabSet, id: &str) -> bool {
        match tabs.get(id) {
            Some(tab) => self.activate(tab),
            None => {
                tracing::debug!(tab_id = id, "Ignoring selection of unknown tab");
                false
            }
        }
    }

    /// Activate the tab at `index` (0-based)
    pub fn select_index(&mut self, tabs: &TabSet, index: usize) -> bool {
        match tabs.get_index(index) {
            Some(tab) => self.activate(tab),
            None => false,
        }
    }

    /// Next tab in order, wrapping around
    pub fn select_next(&mut self, tabs: &TabSet) -> bool {
        if tabs.is_empty() {
            return false;
        }
        let next = self
            .active_position(tabs)
            .map_or(0, |i| (i + 1) % tabs.len());
        self.select_index(tabs, next)
    }

    /// Previous tab in order, wrapping around
    pub fn select_prev(&mut self, tabs: &TabSet) -> bool {
        if tabs.is_empty() {
            return false;
        }
        let prev = self
            .active_position(tabs)
            .map_or(0, |i| (i + tabs.len() - 1) % tabs.len());
        self.select_index(tabs, prev)
    }

    pub fn active_position(&self, tabs: &TabSet) -> Option<usize> {
        self.active.as_deref().and_then(|id| tabs.position(id))
    }

    fn activate(&mut self, tab: &TabDescriptor) -> bool {
        if self.active.as_deref() == Some(tab.id.as_str()) {
            return false;
        }

        self.active = Some(tab.id.clone());
        self.notify(tab);
        true
    }

    /// Report a user-driven tab change. Best-effort: failures are only traced.
    fn notify(&self, tab: &TabDescriptor) {
        let Some(logger) = &self.logger else {
            return;
        };

        let message = format!("Switched to {} tab", tab.label);
        let event_key = format!("modal.tab.{}", tab.id);
        let payload = json!({ "tabId": tab.id, "tabLabel": tab.label });

        if let Err(e) = logger.log_event(&message, &event_key, Some(payload)) {
            tracing::debug!(error = %e, tab_id = %tab.id, "Tab change logging failed");
        }
    }
}
