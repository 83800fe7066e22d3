mod chat_message;
mod chat_view;
mod dialog;
mod global_footer;
mod key_hints;
pub mod modal;
mod scrollbar;
mod sidebar;
mod suggestions;
mod tab_bar;
mod text_input;
pub mod theme;
mod toast;

pub use chat_message::{ChatMessage, MessageRole};
pub use chat_view::ChatView;
pub use dialog::{dim_backdrop, error_line, DialogFrame};
pub use global_footer::GlobalFooter;
pub use key_hints::{HintLook, KeyHints};
pub use scrollbar::{BarGlyphs, ScrollWindow};
pub use sidebar::{Sidebar, SidebarState, SIDEBAR_HEADER_ROWS};
pub use suggestions::SuggestionsPanel;
pub use tab_bar::{TabBar, TabBarItem};
pub use text_input::TextInputState;
pub use toast::{Toast, ToastKind, ToastQueue, TOAST_LIFETIME};
