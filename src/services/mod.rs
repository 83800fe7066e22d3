//! Backend-facing services used by feature dialogs

mod projects;

use thiserror::Error;

pub use projects::{InMemoryProjectService, Project, ProjectDraft, ProjectService};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ServiceError {
    #[error("{0}")]
    Validation(String),
    #[error("{0}")]
    NotFound(String),
    #[error("Internal error: {0}")]
    Internal(String),
}
