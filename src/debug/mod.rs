//! Debug logging collaborator
//!
//! UI components report notable events (tab switches, dialog actions) to an
//! [`EventLogger`]. The bundled [`DebugLogger`] keeps a bounded in-memory
//! buffer for the debug console and mirrors entries to `tracing`. Its
//! behaviour is driven by [`DebugSettings`] that can change at runtime, so
//! the logger reads them through a getter on every event.

mod logger;
mod settings;

pub use logger::{DebugEntry, DebugLogger, EventLogger, LogError};
pub use settings::{DebugSettings, DebugSettingsStore, DebugStoreError, SettingsGetter};
