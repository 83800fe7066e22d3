//! Where aiMate keeps its files
//!
//! Everything lives under one data directory, `~/.aimate` unless `--data-dir`
//! says otherwise.

use std::path::PathBuf;
use std::sync::OnceLock;

static ROOT: OnceLock<PathBuf> = OnceLock::new();

const DIR_NAME: &str = ".aimate";

/// Pin the data directory for the rest of the process. Only the first call counts.
pub fn init_data_dir(custom: Option<PathBuf>) {
    let wanted = custom.unwrap_or_else(home_data_dir);
    let kept = ROOT.get_or_init(|| wanted.clone());
    if *kept != wanted {
        tracing::debug!(
            ignored = %wanted.display(),
            current = %kept.display(),
            "Data directory was already set"
        );
    }
}

fn home_data_dir() -> PathBuf {
    match dirs::home_dir() {
        Some(home) => home.join(DIR_NAME),
        None => PathBuf::from(DIR_NAME),
    }
}

pub fn data_dir() -> PathBuf {
    ROOT.get().cloned().unwrap_or_else(home_data_dir)
}

/// `config.toml`: chat and keybinding settings
pub fn config_path() -> PathBuf {
    data_dir().join("config.toml")
}

/// `debug.toml`: debug console switch
pub fn debug_settings_path() -> PathBuf {
    data_dir().join("debug.toml")
}

pub fn logs_dir() -> PathBuf {
    data_dir().join("logs")
}

pub fn log_file_path() -> PathBuf {
    logs_dir().join("aimate.log")
}
