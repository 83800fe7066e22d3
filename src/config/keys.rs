//! Key combos and the notation used for them in `config.toml`.
//!
//! Bindings are written `C-s` (Ctrl), `M-1` (Alt), `S-x` (Shift) or as a
//! named key in angle brackets: `<Esc>`, `<F2>`, `<C-CR>`. Modifiers stack
//! (`C-S-w`) and an uppercase letter implies Shift.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::ui::action::Action;

/// Canonical names, used for display and parsing
const NAMED_KEYS: &[(&str, KeyCode)] = &[
    ("CR", KeyCode::Enter),
    ("Esc", KeyCode::Esc),
    ("Tab", KeyCode::Tab),
    ("BackTab", KeyCode::BackTab),
    ("BS", KeyCode::Backspace),
    ("Del", KeyCode::Delete),
    ("Up", KeyCode::Up),
    ("Down", KeyCode::Down),
    ("Left", KeyCode::Left),
    ("Right", KeyCode::Right),
    ("PageUp", KeyCode::PageUp),
    ("PageDown", KeyCode::PageDown),
    ("Home", KeyCode::Home),
    ("End", KeyCode::End),
    ("Space", KeyCode::Char(' ')),
];

/// Accepted when parsing only
const KEY_ALIASES: &[(&str, KeyCode)] = &[
    ("Enter", KeyCode::Enter),
    ("Return", KeyCode::Enter),
    ("Escape", KeyCode::Esc),
    ("Backspace", KeyCode::Backspace),
    ("Delete", KeyCode::Delete),
    ("PgUp", KeyCode::PageUp),
    ("PgDn", KeyCode::PageDown),
];

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum KeyParseError {
    #[error("empty key notation")]
    Empty,
    #[error("invalid key: {0}")]
    InvalidKey(String),
    #[error("invalid modifier: {0}")]
    InvalidModifier(String),
    #[error("unknown key name: <{0}>")]
    UnknownKeyName(String),
}

/// A key code plus modifiers, normalized so that config entries and
/// terminal events compare equal
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct KeyCombo {
    pub code: KeyCode,
    pub modifiers: KeyModifiers,
}

impl KeyCombo {
    pub fn new(code: KeyCode, modifiers: KeyModifiers) -> Self {
        Self { code, modifiers }
    }

    /// Normalize a terminal event: `G` becomes `S-g`, and BackTab drops the
    /// Shift flag some terminals add to it
    pub fn from_key_event(event: &KeyEvent) -> Self {
        let mut modifiers = event.modifiers;
        let code = match event.code {
            KeyCode::Char(c) if c.is_ascii_uppercase() => {
                modifiers |= KeyModifiers::SHIFT;
                KeyCode::Char(c.to_ascii_lowercase())
            }
            KeyCode::BackTab => {
                modifiers.remove(KeyModifiers::SHIFT);
                KeyCode::BackTab
            }
            code => code,
        };
        Self::new(code, modifiers)
    }
}

impl fmt::Display for KeyCombo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (flag, prefix) in [
            (KeyModifiers::CONTROL, "C-"),
            (KeyModifiers::ALT, "M-"),
            (KeyModifiers::SHIFT, "S-"),
        ] {
            if self.modifiers.contains(flag) {
                f.write_str(prefix)?;
            }
        }

        if let Some((name, _)) = NAMED_KEYS.iter().find(|(_, code)| *code == self.code) {
            return write!(f, "<{}>", name);
        }
        match self.code {
            KeyCode::Char(c) => write!(f, "{}", c),
            KeyCode::F(n) => write!(f, "<F{}>", n),
            other => write!(f, "{:?}", other),
        }
    }
}

impl FromStr for KeyCombo {
    type Err = KeyParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_key_notation(s)
    }
}

/// Parse `C-s`, `M-S-j`, `<Esc>`, `<C-CR>`, `C-<Up>`, `G` and friends
pub fn parse_key_notation(s: &str) -> Result<KeyCombo, KeyParseError> {
    let s = s.trim();
    if s.is_empty() {
        return Err(KeyParseError::Empty);
    }

    let (mut rest, bracketed) = match s.strip_prefix('<').and_then(|r| r.strip_suffix('>')) {
        Some(inner) if !inner.is_empty() => (inner, true),
        _ => (s, false),
    };

    let mut modifiers = KeyModifiers::NONE;
    while let Some((prefix, tail)) = rest.split_once('-') {
        // "C--" binds Ctrl + '-'
        if tail.is_empty() {
            break;
        }
        modifiers |= match prefix {
            "C" => KeyModifiers::CONTROL,
            "M" | "A" => KeyModifiers::ALT,
            "S" => KeyModifiers::SHIFT,
            other => return Err(KeyParseError::InvalidModifier(other.to_string())),
        };
        rest = tail;
    }

    if bracketed {
        let code =
            named_key(rest).ok_or_else(|| KeyParseError::UnknownKeyName(rest.to_string()))?;
        return Ok(KeyCombo::new(code, modifiers));
    }

    let mut chars = rest.chars();
    let code = match (chars.next(), chars.next()) {
        (Some(c), None) => {
            if c.is_ascii_uppercase() {
                modifiers |= KeyModifiers::SHIFT;
            }
            KeyCode::Char(c.to_ascii_lowercase())
        }
        _ => rest
            .strip_prefix('<')
            .and_then(|r| r.strip_suffix('>'))
            .map_or_else(|| named_key(rest), named_key)
            .ok_or_else(|| KeyParseError::InvalidKey(rest.to_string()))?,
    };

    Ok(KeyCombo::new(code, modifiers))
}

/// Case-insensitive lookup of a key name (without brackets)
fn named_key(name: &str) -> Option<KeyCode> {
    let found = NAMED_KEYS
        .iter()
        .chain(KEY_ALIASES)
        .find(|(known, _)| known.eq_ignore_ascii_case(name))
        .map(|(_, code)| *code);
    if found.is_some() {
        return found;
    }

    let number = name.strip_prefix(['F', 'f'])?.parse::<u8>().ok()?;
    (1..=12).contains(&number).then_some(KeyCode::F(number))
}

/// Where a binding applies
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KeyContext {
    /// Whenever no modal is open
    Global,
    /// The chat input line
    Chat,
    /// An open modal dialog
    Modal,
}

impl KeyContext {
    /// Name of the `[keys.<name>]` table
    pub fn table_name(&self) -> &'static str {
        match self {
            KeyContext::Global => "global",
            KeyContext::Chat => "chat",
            KeyContext::Modal => "modal",
        }
    }
}

/// All bindings: global ones plus per-context tables
#[derive(Debug, Clone, Default)]
pub struct KeybindingConfig {
    pub global: HashMap<KeyCombo, Action>,
    pub context: HashMap<KeyContext, HashMap<KeyCombo, Action>>,
}

impl KeybindingConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Binding in `context`, falling back to the global table
    pub fn get_action(&self, key: &KeyCombo, context: KeyContext) -> Option<&Action> {
        self.get_context_action(key, context)
            .or_else(|| self.global.get(key))
    }

    /// Binding in `context` only
    pub fn get_context_action(&self, key: &KeyCombo, context: KeyContext) -> Option<&Action> {
        self.context.get(&context)?.get(key)
    }

    /// Every combo that triggers `action` in `context`, sorted by notation
    pub fn keys_for(&self, action: &Action, context: KeyContext) -> Vec<&KeyCombo> {
        let mut keys: Vec<&KeyCombo> = self
            .context
            .get(&context)
            .into_iter()
            .flatten()
            .chain(&self.global)
            .filter(|(_, bound)| *bound == action)
            .map(|(combo, _)| combo)
            .collect();
        keys.sort_by_cached_key(|k| k.to_string());
        keys
    }

    /// Overlay `other` on top of these bindings
    pub fn merge(&mut self, other: KeybindingConfig) {
        self.global.extend(other.global);
        for (context, bindings) in other.context {
            self.context.entry(context).or_default().extend(bindings);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn combo(code: KeyCode, modifiers: KeyModifiers) -> KeyCombo {
        KeyCombo::new(code, modifiers)
    }

    #[test]
    fn test_modifier_prefixes() {
        assert_eq!(
            parse_key_notation("C-s").unwrap(),
            combo(KeyCode::Char('s'), KeyModifiers::CONTROL)
        );
        assert_eq!(
            parse_key_notation("M-3").unwrap(),
            combo(KeyCode::Char('3'), KeyModifiers::ALT)
        );
        assert_eq!(
            parse_key_notation("C-S-w").unwrap(),
            combo(
                KeyCode::Char('w'),
                KeyModifiers::CONTROL | KeyModifiers::SHIFT
            )
        );
        assert_eq!(
            parse_key_notation("C--").unwrap(),
            combo(KeyCode::Char('-'), KeyModifiers::CONTROL)
        );
    }

    #[test]
    fn test_uppercase_implies_shift() {
        assert_eq!(
            parse_key_notation("G").unwrap(),
            combo(KeyCode::Char('g'), KeyModifiers::SHIFT)
        );
        assert_eq!(
            parse_key_notation("M-J").unwrap(),
            combo(KeyCode::Char('j'), KeyModifiers::ALT | KeyModifiers::SHIFT)
        );
    }

    #[test]
    fn test_named_keys() {
        assert_eq!(parse_key_notation("<CR>").unwrap().code, KeyCode::Enter);
        assert_eq!(parse_key_notation("<enter>").unwrap().code, KeyCode::Enter);
        assert_eq!(parse_key_notation("<Esc>").unwrap().code, KeyCode::Esc);
        assert_eq!(parse_key_notation("<PgDn>").unwrap().code, KeyCode::PageDown);
        assert_eq!(parse_key_notation("<Space>").unwrap().code, KeyCode::Char(' '));
        assert_eq!(parse_key_notation("<F12>").unwrap().code, KeyCode::F(12));
        assert_eq!(parse_key_notation("Tab").unwrap().code, KeyCode::Tab);

        assert_eq!(
            parse_key_notation("<C-CR>").unwrap(),
            combo(KeyCode::Enter, KeyModifiers::CONTROL)
        );
        assert_eq!(
            parse_key_notation("C-<Up>").unwrap(),
            combo(KeyCode::Up, KeyModifiers::CONTROL)
        );
    }

    #[test]
    fn test_rejects_bad_notation() {
        assert_eq!(parse_key_notation("  "), Err(KeyParseError::Empty));
        assert_eq!(
            parse_key_notation("<F13>"),
            Err(KeyParseError::UnknownKeyName("F13".to_string()))
        );
        assert_eq!(
            parse_key_notation("X-a"),
            Err(KeyParseError::InvalidModifier("X".to_string()))
        );
        assert!(matches!(
            parse_key_notation("C-foo"),
            Err(KeyParseError::InvalidKey(_))
        ));
    }

    #[test]
    fn test_display_uses_config_notation() {
        for notation in ["C-s", "M-1", "<Esc>", "<F2>", "C-<Up>", "S-g", "<Space>"] {
            let parsed = parse_key_notation(notation).unwrap();
            assert_eq!(parsed.to_string(), notation);
        }
    }

    #[test]
    fn test_events_match_parsed_bindings() {
        let shifted = KeyEvent::new(KeyCode::Char('G'), KeyModifiers::SHIFT);
        assert_eq!(
            KeyCombo::from_key_event(&shifted),
            parse_key_notation("G").unwrap()
        );

        // Some terminals report BackTab without Shift, others with it
        let plain = KeyEvent::new(KeyCode::BackTab, KeyModifiers::NONE);
        let with_shift = KeyEvent::new(KeyCode::BackTab, KeyModifiers::SHIFT);
        let expected = parse_key_notation("<BackTab>").unwrap();
        assert_eq!(KeyCombo::from_key_event(&plain), expected);
        assert_eq!(KeyCombo::from_key_event(&with_shift), expected);

        let ctrl_s = KeyEvent::new(KeyCode::Char('s'), KeyModifiers::CONTROL);
        assert_eq!(
            KeyCombo::from_key_event(&ctrl_s),
            parse_key_notation("C-s").unwrap()
        );
    }

    #[test]
    fn test_context_bindings_shadow_global() {
        let mut config = KeybindingConfig::new();
        let esc = parse_key_notation("<Esc>").unwrap();
        let quit = parse_key_notation("C-q").unwrap();
        config.global.insert(esc.clone(), Action::Quit);
        config.global.insert(quit.clone(), Action::Quit);
        config
            .context
            .entry(KeyContext::Modal)
            .or_default()
            .insert(esc.clone(), Action::ModalClose);

        assert_eq!(
            config.get_action(&esc, KeyContext::Modal),
            Some(&Action::ModalClose)
        );
        assert_eq!(config.get_action(&quit, KeyContext::Modal), Some(&Action::Quit));
        assert_eq!(config.get_context_action(&quit, KeyContext::Modal), None);
        assert_eq!(config.get_action(&esc, KeyContext::Chat), Some(&Action::Quit));
    }

    #[test]
    fn test_merge_and_keys_for() {
        let mut base = KeybindingConfig::new();
        base.global
            .insert(parse_key_notation("C-q").unwrap(), Action::Quit);

        let mut user = KeybindingConfig::new();
        user.global
            .insert(parse_key_notation("C-x").unwrap(), Action::Quit);
        user.context
            .entry(KeyContext::Modal)
            .or_default()
            .insert(parse_key_notation("C-w").unwrap(), Action::ModalClose);
        base.merge(user);

        let quit_keys: Vec<String> = base
            .keys_for(&Action::Quit, KeyContext::Global)
            .into_iter()
            .map(ToString::to_string)
            .collect();
        assert_eq!(quit_keys, vec!["C-q", "C-x"]);
        assert_eq!(
            base.keys_for(&Action::ModalClose, KeyContext::Modal).len(),
            1
        );
    }
}
