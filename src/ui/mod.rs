pub mod action;
pub mod app;
pub mod components;
pub mod dialogs;
pub mod events;
mod terminal_guard;

pub use action::Action;
pub use app::{App, AppServices};
pub use events::AppEvent;
pub use terminal_guard::install_panic_hook;
