use uuid::Uuid;

use crate::config::ChatSettings;
use crate::services::{Project, ProjectDraft};
use crate::ui::components::ToastKind;

/// Application-level events
#[derive(Debug, Clone)]
pub enum AppEvent {
    /// Terminal input event
    Input(crossterm::event::Event),

    /// Tick event for toast expiry and redraws
    Tick,

    /// Request to quit the application
    Quit,

    /// Show a toast
    Toast { kind: ToastKind, message: String },

    /// Settings dialog wrote new chat defaults
    SettingsSaved(ChatSettings),

    /// Project list fetched
    ProjectsLoaded { result: Result<Vec<Project>, String> },

    /// Project dialog asked to create (`id == None`) or update a project.
    /// `session` identifies the dialog opening the request came from.
    SaveProject {
        session: u64,
        id: Option<Uuid>,
        draft: ProjectDraft,
    },

    /// Create/update finished
    ProjectSaved {
        session: u64,
        created: bool,
        result: Result<Project, String>,
    },

    /// Project dialog asked to delete a project
    DeleteProject { session: u64, id: Uuid, name: String },

    /// Delete finished
    ProjectDeleted {
        session: u64,
        id: Uuid,
        name: String,
        result: Result<(), String>,
    },
}
