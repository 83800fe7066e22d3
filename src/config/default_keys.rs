//! Bindings in effect before `[keys]` overrides from config.toml are applied

use std::collections::HashMap;

use crossterm::event::{KeyCode, KeyModifiers};

use super::keys::{KeyCombo, KeyContext, KeybindingConfig};
use crate::ui::action::Action;

fn bind(map: &mut HashMap<KeyCombo, Action>, key: &str, action: Action) {
    if let Ok(combo) = key.parse() {
        map.insert(combo, action);
    }
}

pub fn default_keybindings() -> KeybindingConfig {
    let mut config = KeybindingConfig::new();

    // ========== Global Keybindings ==========

    bind(&mut config.global, "C-q", Action::Quit);
    bind(&mut config.global, "<F2>", Action::OpenSettings);
    bind(&mut config.global, "C-n", Action::NewProject);
    bind(&mut config.global, "C-o", Action::ViewProject);
    bind(&mut config.global, "C-e", Action::EditProject);
    bind(&mut config.global, "M-j", Action::SelectNextProject);
    bind(&mut config.global, "M-k", Action::SelectPrevProject);
    bind(&mut config.global, "<F12>", Action::ToggleDebugConsole);

    // ========== Chat Input ==========
    let chat = config.context.entry(KeyContext::Chat).or_default();

    bind(chat, "<CR>", Action::Submit);
    bind(chat, "<Tab>", Action::AcceptSuggestion);
    bind(chat, "<Down>", Action::NextSuggestion);
    bind(chat, "<Up>", Action::PrevSuggestion);
    bind(chat, "<BS>", Action::Backspace);
    bind(chat, "<Del>", Action::Delete);
    bind(chat, "<Left>", Action::MoveCursorLeft);
    bind(chat, "<Right>", Action::MoveCursorRight);
    bind(chat, "<Home>", Action::MoveCursorStart);
    bind(chat, "<End>", Action::MoveCursorEnd);
    // Readline shortcuts
    bind(chat, "C-a", Action::MoveCursorStart);
    bind(chat, "C-f", Action::MoveCursorRight);
    bind(chat, "C-b", Action::MoveCursorLeft);
    bind(chat, "C-u", Action::DeleteToStart);
    bind(chat, "C-k", Action::DeleteToEnd);
    bind(chat, "C-w", Action::DeleteWordBack);
    bind(chat, "C-h", Action::Backspace);
    bind(chat, "M-b", Action::MoveWordLeft);
    bind(chat, "M-f", Action::MoveWordRight);
    bind(chat, "M-<BS>", Action::DeleteWordBack);

    // ========== Modal ==========
    let modal = config.context.entry(KeyContext::Modal).or_default();

    bind(modal, "<Esc>", Action::ModalClose);
    bind(modal, "C-s", Action::ModalSave);
    bind(modal, "C-d", Action::ModalDelete);
    bind(modal, "<Tab>", Action::NextTab);
    bind(modal, "<BackTab>", Action::PrevTab);
    bind(modal, "<Up>", Action::ScrollUp(1));
    bind(modal, "<Down>", Action::ScrollDown(1));
    bind(modal, "<PageUp>", Action::ScrollPageUp);
    bind(modal, "<PageDown>", Action::ScrollPageDown);
    bind(modal, "<Home>", Action::ScrollToTop);
    bind(modal, "<End>", Action::ScrollToBottom);

    // Alt+1-9 for tab switching
    for i in 1..=9u8 {
        let key = format!("M-{}", i);
        bind(modal, &key, Action::SwitchToTab(i));
    }

    // Ctrl+Arrow scrolls even when the content uses plain arrows
    modal.insert(
        KeyCombo::new(KeyCode::Up, KeyModifiers::CONTROL),
        Action::ScrollUp(1),
    );
    modal.insert(
        KeyCombo::new(KeyCode::Down, KeyModifiers::CONTROL),
        Action::ScrollDown(1),
    );

    config
}
