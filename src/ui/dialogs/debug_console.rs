//! Debug console: recent UI events from the debug logger

use std::cell::Cell;
use std::sync::Arc;

use crossterm::event::{KeyEvent, MouseEvent};
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::StatefulWidget,
};

use crate::config::KeybindingConfig;
use crate::debug::{DebugLogger, DebugSettingsStore};
use crate::ui::components::modal::{
    Modal, ModalConfig, ModalContent, ModalOutcome, ModalProps, ModalSize, ModalState,
};
use crate::ui::components::theme::{ACCENT_PRIMARY, ACCENT_WARNING, TEXT_FAINT, TEXT_MUTED};
use crate::util::truncate_to_width;

/// Debug console dialog
pub struct DebugConsole {
    modal: ModalState,
    model: ConsoleModel,
}

struct ConsoleModel {
    open: Cell<bool>,
    logger: Arc<DebugLogger>,
    store: Arc<DebugSettingsStore>,
}

impl DebugConsole {
    pub fn new(logger: Arc<DebugLogger>, store: Arc<DebugSettingsStore>) -> Self {
        Self {
            modal: ModalState::new(),
            model: ConsoleModel {
                open: Cell::new(false),
                logger,
                store,
            },
        }
    }

    pub fn open(&mut self) {
        self.model.open.set(true);
        self.modal.sync(&self.model.props());
    }

    pub fn is_open(&self) -> bool {
        self.model.open.get()
    }

    pub fn handle_key(
        &mut self,
        key: KeyEvent,
        keys: &KeybindingConfig,
    ) -> anyhow::Result<ModalOutcome> {
        let outcome = {
            let mut props = self.model.props();
            self.modal.handle_key(key, &mut props, keys)
        };
        self.modal.sync(&self.model.props());
        outcome
    }

    pub fn handle_mouse(&mut self, mouse: MouseEvent) -> anyhow::Result<ModalOutcome> {
        let outcome = {
            let mut props = self.model.props();
            self.modal.handle_mouse(mouse, &mut props)
        };
        self.modal.sync(&self.model.props());
        outcome
    }

    pub fn render(&mut self, area: Rect, buf: &mut Buffer) {
        let props = self.model.props();
        Modal::new(&props).render(area, buf, &mut self.modal);
    }
}

impl ConsoleModel {
    fn props(&self) -> ModalProps<'_> {
        let enabled = self.store.get().enabled;
        let status = if enabled {
            "Recording UI events"
        } else {
            "Recording is off. Ctrl+S turns it on"
        };

        let logger = self.logger.clone();
        let store = self.store.clone();
        let config = ModalConfig::new("Debug console")
            .description(status)
            .size(ModalSize::ExtraLarge)
            .children(move || {
                Box::new(EntryList {
                    logger: logger.clone(),
                    store: store.clone(),
                }) as Box<dyn ModalContent>
            })
            .show_delete(true)
            .delete_label("Clear")
            .delete_disabled(self.logger.is_empty())
            .on_delete(move || {
                self.logger.clear();
                Ok(())
            })
            .show_save(true)
            .save_label(if enabled { "Disable" } else { "Enable" })
            .on_save(move || {
                let settings = self.store.update(|s| s.enabled = !s.enabled)?;
                tracing::info!(enabled = settings.enabled, "Toggled debug event recording");
                Ok(())
            });

        ModalProps::new(self.open.get(), |open| self.open.set(open), config)
    }
}

/// Live view over the logger's buffer
struct EntryList {
    logger: Arc<DebugLogger>,
    store: Arc<DebugSettingsStore>,
}

impl ModalContent for EntryList {
    fn lines(&self, width: u16) -> Vec<Line<'_>> {
        let entries = self.logger.entries();
        if entries.is_empty() {
            let hint = if self.store.get().enabled {
                "No events yet. Switch tabs in a dialog to see one."
            } else {
                "No events recorded."
            };
            return vec![Line::from(Span::styled(hint, Style::default().fg(TEXT_MUTED)))];
        }

        let width = usize::from(width);
        let mut lines = Vec::with_capacity(entries.len() * 2);
        for entry in entries {
            lines.push(Line::from(vec![
                Span::styled(
                    entry.at.format("%H:%M:%S ").to_string(),
                    Style::default().fg(TEXT_FAINT),
                ),
                Span::styled(
                    format!("{} ", entry.event_key),
                    Style::default().fg(ACCENT_PRIMARY),
                ),
                Span::raw(entry.message),
            ]));
            if let Some(payload) = entry.payload {
                lines.push(Line::from(Span::styled(
                    truncate_to_width(&format!("  {}", payload), width),
                    Style::default().fg(ACCENT_WARNING),
                )));
            }
        }
        lines
    }
}
