use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::ServiceError;

const MAX_NAME_LEN: usize = 80;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Project {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Editable fields of a project
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProjectDraft {
    pub name: String,
    pub description: String,
}

impl ProjectDraft {
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
        }
    }

    pub fn from_project(project: &Project) -> Self {
        Self::new(project.name.clone(), project.description.clone())
    }

    /// Trimmed copy, or the reason it cannot be saved
    pub fn validated(&self) -> Result<Self, ServiceError> {
        let name = self.name.trim();
        if name.is_empty() {
            return Err(ServiceError::Validation(
                "Project name is required".to_string(),
            ));
        }
        if name.chars().count() > MAX_NAME_LEN {
            return Err(ServiceError::Validation(format!(
                "Project name must be at most {} characters",
                MAX_NAME_LEN
            )));
        }
        Ok(Self::new(name, self.description.trim()))
    }
}

#[async_trait]
pub trait ProjectService: Send + Sync {
    async fn list(&self) -> Result<Vec<Project>, ServiceError>;
    async fn create(&self, draft: ProjectDraft) -> Result<Project, ServiceError>;
    async fn update(&self, id: Uuid, draft: ProjectDraft) -> Result<Project, ServiceError>;
    async fn delete(&self, id: Uuid) -> Result<(), ServiceError>;
}

/// Process-local project store
#[derive(Debug, Default)]
pub struct InMemoryProjectService {
    projects: RwLock<Vec<Project>>,
    /// Simulated round-trip for each call
    latency: Duration,
}

impl InMemoryProjectService {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    /// Store pre-populated with a couple of projects
    pub fn seeded() -> Self {
        let service = Self::new();
        let now = Utc::now();
        {
            let mut projects = service.projects.write();
            for (name, description) in [
                ("Personal", "Everyday questions and notes"),
                ("Rust TUI", "Terminal front-end experiments"),
            ] {
                projects.push(Project {
                    id: Uuid::new_v4(),
                    name: name.to_string(),
                    description: description.to_string(),
                    created_at: now,
                    updated_at: now,
                });
            }
        }
        service
    }

    async fn round_trip(&self) {
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }
    }

    fn ensure_unique(
        projects: &[Project],
        name: &str,
        except: Option<Uuid>,
    ) -> Result<(), ServiceError> {
        let taken = projects
            .iter()
            .any(|p| Some(p.id) != except && p.name.eq_ignore_ascii_case(name));
        if taken {
            return Err(ServiceError::Validation(format!(
                "A project named '{}' already exists",
                name
            )));
        }
        Ok(())
    }
}

#[async_trait]
impl ProjectService for InMemoryProjectService {
    async fn list(&self) -> Result<Vec<Project>, ServiceError> {
        self.round_trip().await;
        let mut projects = self.projects.read().clone();
        projects.sort_by(|a, b| a.name.to_lowercase().cmp(&b.name.to_lowercase()));
        Ok(projects)
    }

    async fn create(&self, draft: ProjectDraft) -> Result<Project, ServiceError> {
        self.round_trip().await;
        let draft = draft.validated()?;

        let mut projects = self.projects.write();
        Self::ensure_unique(&projects, &draft.name, None)?;

        let now = Utc::now();
        let project = Project {
            id: Uuid::new_v4(),
            name: draft.name,
            description: draft.description,
            created_at: now,
            updated_at: now,
        };
        projects.push(project.clone());
        tracing::info!(project_id = %project.id, name = %project.name, "Created project");
        Ok(project)
    }

    async fn update(&self, id: Uuid, draft: ProjectDraft) -> Result<Project, ServiceError> {
        self.round_trip().await;
        let draft = draft.validated()?;

        let mut projects = self.projects.write();
        Self::ensure_unique(&projects, &draft.name, Some(id))?;

        let project = projects
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or_else(|| ServiceError::NotFound(format!("Project {} not found", id)))?;
        project.name = draft.name;
        project.description = draft.description;
        project.updated_at = Utc::now();
        tracing::info!(project_id = %id, "Updated project");
        Ok(project.clone())
    }

    async fn delete(&self, id: Uuid) -> Result<(), ServiceError> {
        self.round_trip().await;
        let mut projects = self.projects.write();
        let before = projects.len();
        projects.retain(|p| p.id != id);
        if projects.len() == before {
            return Err(ServiceError::NotFound(format!("Project {} not found", id)));
        }
        tracing::info!(project_id = %id, "Deleted project");
        Ok(())
    }
}
