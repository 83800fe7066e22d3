//! Feature dialogs built on the modal shell

mod debug_console;
mod mode;
mod project;
mod settings;

pub use debug_console::DebugConsole;
pub use mode::DialogMode;
pub use project::ProjectDialog;
pub use settings::SettingsDialog;
