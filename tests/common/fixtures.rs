//! App and config fixtures backed by a temporary data directory

use std::sync::Arc;
use std::time::Duration;

use aimate::debug::{DebugSettings, DebugSettingsStore};
use aimate::search::LocalKnowledgeIndex;
use aimate::services::InMemoryProjectService;
use aimate::{App, AppServices, Config};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use tempfile::TempDir;

/// Debounce used by fixture apps
pub const TEST_DEBOUNCE: Duration = Duration::from_millis(200);

/// Config whose files live in a fresh temp dir
pub fn temp_config() -> (Config, TempDir) {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let mut config = Config::default()
        .with_config_path(dir.path().join("config.toml"))
        .with_debug_settings_path(dir.path().join("debug.toml"));
    config.search.debounce = TEST_DEBOUNCE;
    (config, dir)
}

/// App with in-memory services and debug recording switched on.
/// Must be called inside a tokio runtime.
pub fn test_app() -> (App, TempDir) {
    test_app_with_projects(InMemoryProjectService::new())
}

/// Like [`test_app`] but backed by the given project store
pub fn test_app_with_projects(projects: InMemoryProjectService) -> (App, TempDir) {
    let (config, dir) = temp_config();
    let services = AppServices {
        projects: Arc::new(projects),
        knowledge: Arc::new(LocalKnowledgeIndex::builtin()),
        debug_settings: Arc::new(DebugSettingsStore::in_memory(DebugSettings {
            enabled: true,
            mirror_to_tracing: false,
            ..DebugSettings::default()
        })),
    };
    (App::new(config, services), dir)
}

pub fn key(code: KeyCode) -> KeyEvent {
    KeyEvent::new(code, KeyModifiers::NONE)
}

pub fn ctrl(c: char) -> KeyEvent {
    KeyEvent::new(KeyCode::Char(c), KeyModifiers::CONTROL)
}

pub fn type_text(app: &mut App, text: &str) {
    for c in text.chars() {
        app.handle_key(key(KeyCode::Char(c)));
    }
}

/// Let spawned tasks run and handle whatever they reported.
///
/// With a paused clock the sleep auto-advances once every task is idle.
pub async fn settle(app: &mut App, wait: Duration) {
    tokio::time::sleep(wait).await;
    app.drain_events();
    // Events handled above may have spawned more work
    tokio::time::sleep(Duration::from_millis(1)).await;
    app.drain_events();
}
