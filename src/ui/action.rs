//! Actions that can be triggered by keybindings
//!
//! Each action represents a single, atomic operation in the UI.

use serde::{Deserialize, Serialize};

/// All mappable UI actions
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    // ========== Global Actions ==========
    /// Quit the application
    Quit,
    /// Open the chat settings dialog
    OpenSettings,
    /// Open the project dialog in create mode
    NewProject,
    /// Open the selected project read-only
    ViewProject,
    /// Open the selected project for editing
    EditProject,
    /// Move the project selection down
    SelectNextProject,
    /// Move the project selection up
    SelectPrevProject,
    /// Show or hide the debug console
    ToggleDebugConsole,

    // ========== Chat Input ==========
    /// Send the current message
    Submit,
    /// Accept the highlighted knowledge suggestion
    AcceptSuggestion,
    /// Highlight the next knowledge suggestion
    NextSuggestion,
    /// Highlight the previous knowledge suggestion
    PrevSuggestion,
    /// Delete character before cursor
    Backspace,
    /// Delete character at cursor
    Delete,
    /// Delete word before cursor
    DeleteWordBack,
    /// Delete from cursor to start of line
    DeleteToStart,
    /// Delete from cursor to end of line
    DeleteToEnd,
    /// Move cursor left one character
    MoveCursorLeft,
    /// Move cursor right one character
    MoveCursorRight,
    /// Move cursor to start of line
    MoveCursorStart,
    /// Move cursor to end of line
    MoveCursorEnd,
    /// Move cursor left one word
    MoveWordLeft,
    /// Move cursor right one word
    MoveWordRight,

    // ========== Modal ==========
    /// Request the open modal to close
    ModalClose,
    /// Press the modal's Save button
    ModalSave,
    /// Press the modal's Delete button
    ModalDelete,
    /// Switch to the next modal tab
    NextTab,
    /// Switch to the previous modal tab
    PrevTab,
    /// Switch to modal tab by number (1-9)
    SwitchToTab(u8),

    // ========== Scrolling ==========
    /// Scroll up by N lines
    ScrollUp(u16),
    /// Scroll down by N lines
    ScrollDown(u16),
    /// Scroll up by a page
    ScrollPageUp,
    /// Scroll down by a page
    ScrollPageDown,
    /// Scroll to top
    ScrollToTop,
    /// Scroll to bottom
    ScrollToBottom,
}

impl Action {
    /// Whether this action is handled by an open modal
    pub fn is_modal_action(&self) -> bool {
        matches!(
            self,
            Action::ModalClose
                | Action::ModalSave
                | Action::ModalDelete
                | Action::NextTab
                | Action::PrevTab
                | Action::SwitchToTab(_)
                | Action::ScrollUp(_)
                | Action::ScrollDown(_)
                | Action::ScrollPageUp
                | Action::ScrollPageDown
                | Action::ScrollToTop
                | Action::ScrollToBottom
        )
    }

    /// Human-readable description for the help line
    pub fn description(&self) -> &'static str {
        match self {
            Action::Quit => "Quit",
            Action::OpenSettings => "Settings",
            Action::NewProject => "New project",
            Action::ViewProject => "View project",
            Action::EditProject => "Edit project",
            Action::SelectNextProject => "Next project",
            Action::SelectPrevProject => "Previous project",
            Action::ToggleDebugConsole => "Debug console",
            Action::Submit => "Send",
            Action::AcceptSuggestion => "Use suggestion",
            Action::NextSuggestion => "Next suggestion",
            Action::PrevSuggestion => "Previous suggestion",
            Action::Backspace => "Backspace",
            Action::Delete => "Delete",
            Action::DeleteWordBack => "Delete word",
            Action::DeleteToStart => "Delete to start",
            Action::DeleteToEnd => "Delete to end",
            Action::MoveCursorLeft => "Cursor left",
            Action::MoveCursorRight => "Cursor right",
            Action::MoveCursorStart => "Line start",
            Action::MoveCursorEnd => "Line end",
            Action::MoveWordLeft => "Word left",
            Action::MoveWordRight => "Word right",
            Action::ModalClose => "Close",
            Action::ModalSave => "Save",
            Action::ModalDelete => "Delete",
            Action::NextTab => "Next tab",
            Action::PrevTab => "Previous tab",
            Action::SwitchToTab(_) => "Go to tab",
            Action::ScrollUp(_) => "Scroll up",
            Action::ScrollDown(_) => "Scroll down",
            Action::ScrollPageUp => "Page up",
            Action::ScrollPageDown => "Page down",
            Action::ScrollToTop => "Top",
            Action::ScrollToBottom => "Bottom",
        }
    }
}
