use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use toml_edit::{DocumentMut, Item, Table};

use crate::ui::action::Action;
use crate::util::paths::{config_path, debug_settings_path};

use super::default_keys::default_keybindings;
use super::keys::{parse_key_notation, KeyContext, KeybindingConfig};

/// Example configuration file contents (bundled with the binary)
pub const EXAMPLE_CONFIG: &str = include_str!("config.toml.example");

/// Models offered by the settings dialog
pub const AVAILABLE_MODELS: &[&str] = &[
    "gpt-4o",
    "gpt-4o-mini",
    "claude-sonnet",
    "claude-haiku",
    "llama-3.1-70b",
];

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("Failed to edit config: {0}")]
    Edit(#[from] toml_edit::TomlError),
    #[error("`{0}` in config file is not a table")]
    NotATable(&'static str),
}

/// Application configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Keybinding configuration
    pub keybindings: KeybindingConfig,
    /// Knowledge suggestion search
    pub search: SearchConfig,
    /// Chat defaults edited by the settings dialog
    pub chat: ChatSettings,
    /// File the settings dialog writes to
    pub config_path: PathBuf,
    /// File backing the debug settings store
    pub debug_settings_path: PathBuf,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchConfig {
    /// Quiet period after the last keystroke before searching
    pub debounce: Duration,
    /// Maximum suggestions shown under the input
    pub max_results: usize,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            debounce: Duration::from_millis(500),
            max_results: 5,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct TomlSearchConfig {
    pub debounce_ms: Option<u64>,
    pub max_results: Option<usize>,
}

/// Tools the assistant may use during a chat
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ToolToggles {
    pub web_search: bool,
    pub code_interpreter: bool,
    pub knowledge: bool,
    pub image_generation: bool,
}

impl Default for ToolToggles {
    fn default() -> Self {
        Self {
            web_search: false,
            code_interpreter: false,
            knowledge: true,
            image_generation: false,
        }
    }
}

/// Chat defaults
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChatSettings {
    pub model: String,
    pub system_prompt: String,
    pub temperature: f32,
    pub max_tokens: u32,
    pub tools: ToolToggles,
}

impl Default for ChatSettings {
    fn default() -> Self {
        Self {
            model: AVAILABLE_MODELS[0].to_string(),
            system_prompt: String::new(),
            temperature: 0.7,
            max_tokens: 2048,
            tools: ToolToggles::default(),
        }
    }
}

impl ChatSettings {
    pub const MIN_TEMPERATURE: f32 = 0.0;
    pub const MAX_TEMPERATURE: f32 = 2.0;
    pub const MIN_MAX_TOKENS: u32 = 256;
    pub const MAX_MAX_TOKENS: u32 = 32_768;

    /// Clamp numeric fields into their supported ranges
    pub fn normalized(mut self) -> Self {
        self.temperature = self
            .temperature
            .clamp(Self::MIN_TEMPERATURE, Self::MAX_TEMPERATURE);
        self.max_tokens = self
            .max_tokens
            .clamp(Self::MIN_MAX_TOKENS, Self::MAX_MAX_TOKENS);
        self
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            keybindings: default_keybindings(),
            search: SearchConfig::default(),
            chat: ChatSettings::default(),
            config_path: config_path(),
            debug_settings_path: debug_settings_path(),
        }
    }
}

/// TOML representation of keybinding configuration
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TomlKeybindings {
    /// Global keybindings (apply to all contexts)
    #[serde(flatten)]
    pub global: HashMap<String, String>,

    /// Chat input keybindings
    pub chat: Option<HashMap<String, String>>,

    /// Modal keybindings
    pub modal: Option<HashMap<String, String>>,
}

/// TOML representation of the config file
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TomlConfig {
    /// Keybinding configuration
    pub keys: Option<TomlKeybindings>,
    /// Search configuration
    pub search: Option<TomlSearchConfig>,
    /// Chat defaults
    pub chat: Option<ChatSettings>,
}

impl TomlKeybindings {
    /// Convert TOML keybindings to KeybindingConfig
    fn to_keybinding_config(&self) -> KeybindingConfig {
        let mut config = KeybindingConfig::new();

        for (action_name, key_str) in &self.global {
            // Skip context sections (they're handled separately)
            if matches!(action_name.as_str(), "chat" | "modal") {
                continue;
            }

            match (parse_key_notation(key_str), parse_action(action_name)) {
                (Ok(combo), Some(action)) => {
                    config.global.insert(combo, action);
                }
                _ => tracing::warn!(action = %action_name, key = %key_str, "Ignoring invalid keybinding"),
            }
        }

        if let Some(chat) = &self.chat {
            parse_context_bindings(&mut config, KeyContext::Chat, chat);
        }
        if let Some(modal) = &self.modal {
            parse_context_bindings(&mut config, KeyContext::Modal, modal);
        }

        config
    }
}

/// Parse context-specific keybindings
fn parse_context_bindings(
    config: &mut KeybindingConfig,
    context: KeyContext,
    bindings: &HashMap<String, String>,
) {
    let context_map = config.context.entry(context).or_default();
    for (action_name, key_str) in bindings {
        match (parse_key_notation(key_str), parse_action(action_name)) {
            (Ok(combo), Some(action)) => {
                context_map.insert(combo, action);
            }
            _ => tracing::warn!(
                context = context.table_name(),
                action = %action_name,
                key = %key_str,
                "Ignoring invalid keybinding"
            ),
        }
    }
}

/// Parse an action name string into an Action
pub fn parse_action(name: &str) -> Option<Action> {
    match name {
        // Global
        "quit" => Some(Action::Quit),
        "open_settings" => Some(Action::OpenSettings),
        "new_project" => Some(Action::NewProject),
        "view_project" => Some(Action::ViewProject),
        "edit_project" => Some(Action::EditProject),
        "select_next_project" => Some(Action::SelectNextProject),
        "select_prev_project" => Some(Action::SelectPrevProject),
        "toggle_debug_console" => Some(Action::ToggleDebugConsole),

        // Chat input
        "submit" => Some(Action::Submit),
        "accept_suggestion" => Some(Action::AcceptSuggestion),
        "next_suggestion" => Some(Action::NextSuggestion),
        "prev_suggestion" => Some(Action::PrevSuggestion),
        "backspace" => Some(Action::Backspace),
        "delete" => Some(Action::Delete),
        "delete_word_back" => Some(Action::DeleteWordBack),
        "delete_to_start" => Some(Action::DeleteToStart),
        "delete_to_end" => Some(Action::DeleteToEnd),
        "move_cursor_left" => Some(Action::MoveCursorLeft),
        "move_cursor_right" => Some(Action::MoveCursorRight),
        "move_cursor_start" => Some(Action::MoveCursorStart),
        "move_cursor_end" => Some(Action::MoveCursorEnd),
        "move_word_left" => Some(Action::MoveWordLeft),
        "move_word_right" => Some(Action::MoveWordRight),

        // Modal
        "close" | "cancel" => Some(Action::ModalClose),
        "save" => Some(Action::ModalSave),
        "delete_item" => Some(Action::ModalDelete),
        "next_tab" => Some(Action::NextTab),
        "prev_tab" => Some(Action::PrevTab),
        "scroll_up" => Some(Action::ScrollUp(1)),
        "scroll_down" => Some(Action::ScrollDown(1)),
        "scroll_page_up" => Some(Action::ScrollPageUp),
        "scroll_page_down" => Some(Action::ScrollPageDown),
        "scroll_to_top" => Some(Action::ScrollToTop),
        "scroll_to_bottom" => Some(Action::ScrollToBottom),

        _ => name
            .strip_prefix("tab_")
            .and_then(|n| n.parse::<u8>().ok())
            .filter(|n| (1..=9).contains(n))
            .map(Action::SwitchToTab),
    }
}

impl Config {
    /// Load configuration from the default location, merging with defaults.
    ///
    /// Problems with the file are logged and the defaults are used.
    pub fn load() -> Self {
        let path = config_path();

        // Create example config on first run
        if !path.exists() {
            Self::create_default_config(&path);
        }

        Self::load_from(&path).unwrap_or_else(|e| {
            tracing::warn!(path = %path.display(), error = %e, "Failed to load config, using defaults");
            Config {
                config_path: path,
                ..Config::default()
            }
        })
    }

    /// Load configuration from `path`, merging with defaults
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let mut config = Config {
            config_path: path.to_path_buf(),
            ..Config::default()
        };

        if !path.exists() {
            return Ok(config);
        }

        let contents = fs::read_to_string(path)?;
        let toml_config: TomlConfig = toml::from_str(&contents)?;

        // Merge user keybindings on top of defaults
        if let Some(keys) = toml_config.keys {
            config.keybindings.merge(keys.to_keybinding_config());
        }

        if let Some(search) = toml_config.search {
            if let Some(ms) = search.debounce_ms {
                config.search.debounce = Duration::from_millis(ms);
            }
            if let Some(max) = search.max_results {
                config.search.max_results = max.max(1);
            }
        }

        if let Some(chat) = toml_config.chat {
            config.chat = chat.normalized();
        }

        Ok(config)
    }

    /// Create the default config file from the bundled example
    fn create_default_config(path: &Path) {
        if let Some(parent) = path.parent() {
            if !parent.exists() {
                if let Err(e) = fs::create_dir_all(parent) {
                    tracing::warn!(error = %e, "Failed to create config directory");
                    return;
                }
            }
        }

        if let Err(e) = fs::write(path, EXAMPLE_CONFIG) {
            tracing::warn!(error = %e, "Failed to write default config");
        }
    }

    pub fn with_config_path(mut self, path: PathBuf) -> Self {
        self.config_path = path;
        self
    }

    pub fn with_debug_settings_path(mut self, path: PathBuf) -> Self {
        self.debug_settings_path = path;
        self
    }
}

/// Save chat defaults to the `[chat]` table of the config file.
///
/// Reads the existing document, replaces the `[chat]` values and writes it
/// back while preserving all other content and comments.
pub fn save_chat_settings(path: &Path, chat: &ChatSettings) -> Result<(), ConfigError> {
    let contents = if path.exists() {
        fs::read_to_string(path)?
    } else {
        String::new()
    };

    let mut doc: DocumentMut = contents.parse()?;

    // Round through f64 without exposing f32 noise (0.7 -> 0.699999988)
    let temperature = (f64::from(chat.temperature) * 100.0).round() / 100.0;

    let table = doc
        .entry("chat")
        .or_insert(Item::Table(Table::new()))
        .as_table_like_mut()
        .ok_or(ConfigError::NotATable("chat"))?;
    table.insert("model", toml_edit::value(chat.model.as_str()));
    table.insert("system_prompt", toml_edit::value(chat.system_prompt.as_str()));
    table.insert("temperature", toml_edit::value(temperature));
    table.insert("max_tokens", toml_edit::value(i64::from(chat.max_tokens)));

    if table.get("tools").is_none() {
        table.insert("tools", Item::Table(Table::new()));
    }
    let tools = table
        .get_mut("tools")
        .and_then(Item::as_table_like_mut)
        .ok_or(ConfigError::NotATable("chat.tools"))?;
    tools.insert("web_search", toml_edit::value(chat.tools.web_search));
    tools.insert("code_interpreter", toml_edit::value(chat.tools.code_interpreter));
    tools.insert("knowledge", toml_edit::value(chat.tools.knowledge));
    tools.insert("image_generation", toml_edit::value(chat.tools.image_generation));

    if let Some(parent) = path.parent() {
        if !parent.exists() {
            fs::create_dir_all(parent)?;
        }
    }

    fs::write(path, doc.to_string())?;
    tracing::info!(path = %path.display(), model = %chat.model, "Saved chat settings");

    Ok(())
}
