use ratatui::{buffer::Buffer, layout::Rect, widgets::Widget};

use super::key_hints::{HintLook, KeyHints};
use crate::config::{KeyContext, KeybindingConfig};
use crate::ui::action::Action;

/// Actions advertised in the footer, in display order
const FOOTER_ACTIONS: &[(Action, KeyContext, &str)] = &[
    (Action::Submit, KeyContext::Chat, "send"),
    (Action::AcceptSuggestion, KeyContext::Chat, "use suggestion"),
    (Action::NewProject, KeyContext::Global, "new project"),
    (Action::EditProject, KeyContext::Global, "edit project"),
    (Action::OpenSettings, KeyContext::Global, "settings"),
    (Action::ToggleDebugConsole, KeyContext::Global, "debug"),
    (Action::Quit, KeyContext::Global, "quit"),
];

/// Global footer showing the configured shortcuts
pub struct GlobalFooter {
    hints: Vec<(String, &'static str)>,
}

impl GlobalFooter {
    /// Hints for the current bindings; unbound actions are skipped
    pub fn from_keybindings(keys: &KeybindingConfig) -> Self {
        let hints = FOOTER_ACTIONS
            .iter()
            .filter_map(|(action, context, label)| {
                keys.keys_for(action, *context)
                    .first()
                    .map(|combo| (combo.to_string(), *label))
            })
            .collect();
        Self { hints }
    }

    pub fn hints(&self) -> &[(String, &'static str)] {
        &self.hints
    }

    pub fn render(&self, area: Rect, buf: &mut Buffer) {
        let hints: Vec<(&str, &str)> = self
            .hints
            .iter()
            .map(|(key, label)| (key.as_str(), *label))
            .collect();
        KeyHints::new(&hints, HintLook::footer()).render(area, buf);
    }
}
