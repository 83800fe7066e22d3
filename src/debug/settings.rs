use std::fs;
use std::path::PathBuf;
use std::sync::Arc;

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Getter handed to consumers that must observe the latest settings
pub type SettingsGetter = Arc<dyn Fn() -> DebugSettings + Send + Sync>;

/// Runtime-mutable debug settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DebugSettings {
    /// Record events at all
    pub enabled: bool,
    /// Also emit recorded events through `tracing`
    pub mirror_to_tracing: bool,
    /// Maximum number of entries kept for the debug console
    pub max_entries: usize,
    /// Event keys starting with any of these prefixes are dropped
    pub muted_prefixes: Vec<String>,
}

impl Default for DebugSettings {
    fn default() -> Self {
        Self {
            enabled: false,
            mirror_to_tracing: true,
            max_entries: 200,
            muted_prefixes: Vec::new(),
        }
    }
}

impl DebugSettings {
    pub fn is_muted(&self, event_key: &str) -> bool {
        self.muted_prefixes
            .iter()
            .any(|prefix| !prefix.is_empty() && event_key.starts_with(prefix.as_str()))
    }
}

#[derive(Debug, Error)]
pub enum DebugStoreError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to parse debug settings: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("Failed to serialize debug settings: {0}")]
    Serialize(#[from] toml::ser::Error),
}

/// Process-wide store for [`DebugSettings`], optionally backed by a TOML file
pub struct DebugSettingsStore {
    settings: RwLock<DebugSettings>,
    path: Option<PathBuf>,
}

impl DebugSettingsStore {
    /// Store that never touches the filesystem
    pub fn in_memory(settings: DebugSettings) -> Self {
        Self {
            settings: RwLock::new(settings),
            path: None,
        }
    }

    /// Load settings from `path`, falling back to defaults when the file is missing
    pub fn load(path: impl Into<PathBuf>) -> Result<Self, DebugStoreError> {
        let path = path.into();
        let settings = if path.exists() {
            let contents = fs::read_to_string(&path)?;
            toml::from_str(&contents)?
        } else {
            DebugSettings::default()
        };

        Ok(Self {
            settings: RwLock::new(settings),
            path: Some(path),
        })
    }

    /// Snapshot of the current settings
    pub fn get(&self) -> DebugSettings {
        self.settings.read().clone()
    }

    /// Mutate the settings and persist them when file-backed.
    ///
    /// The in-memory value is updated even if persisting fails.
    pub fn update(
        &self,
        f: impl FnOnce(&mut DebugSettings),
    ) -> Result<DebugSettings, DebugStoreError> {
        let snapshot = {
            let mut settings = self.settings.write();
            f(&mut settings);
            settings.clone()
        };
        self.persist(&snapshot)?;
        Ok(snapshot)
    }

    /// A getter that reads this store on every call
    pub fn getter(self: &Arc<Self>) -> SettingsGetter {
        let store = Arc::clone(self);
        Arc::new(move || store.get())
    }

    fn persist(&self, settings: &DebugSettings) -> Result<(), DebugStoreError> {
        let Some(path) = &self.path else {
            return Ok(());
        };

        if let Some(parent) = path.parent() {
            if !parent.exists() {
                fs::create_dir_all(parent)?;
            }
        }
        fs::write(path, toml::to_string_pretty(settings)?)?;
        tracing::debug!(path = %path.display(), "Persisted debug settings");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_load_missing_file_uses_defaults() {
        let dir = TempDir::new().unwrap();
        let store = DebugSettingsStore::load(dir.path().join("debug.toml")).unwrap();
        assert_eq!(store.get(), DebugSettings::default());
    }

    #[test]
    fn test_update_persists_and_reloads() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("debug.toml");

        let store = DebugSettingsStore::load(&path).unwrap();
        store
            .update(|s| {
                s.enabled = true;
                s.muted_prefixes = vec!["modal.tab.params".to_string()];
            })
            .unwrap();

        let reloaded = DebugSettingsStore::load(&path).unwrap();
        assert!(reloaded.get().enabled);
        assert_eq!(reloaded.get().muted_prefixes, vec!["modal.tab.params"]);
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("debug.toml");
        fs::write(&path, "enabled = true\n").unwrap();

        let settings = DebugSettingsStore::load(&path).unwrap().get();
        assert!(settings.enabled);
        assert_eq!(settings.max_entries, 200);
    }

    #[test]
    fn test_getter_observes_later_updates() {
        let store = Arc::new(DebugSettingsStore::in_memory(DebugSettings::default()));
        let getter = store.getter();
        assert!(!getter().enabled);

        store.update(|s| s.enabled = true).unwrap();
        assert!(getter().enabled);
    }

    #[test]
    fn test_muted_prefix_matching() {
        let settings = DebugSettings {
            muted_prefixes: vec!["modal.".to_string(), String::new()],
            ..DebugSettings::default()
        };
        assert!(settings.is_muted("modal.tab.general"));
        assert!(!settings.is_muted("project.saved"));
    }
}
