pub mod config;
pub mod debug;
pub mod search;
pub mod services;
pub mod ui;
pub mod util;

pub use config::Config;
pub use ui::{App, AppServices};
