//! Create / view / edit dialog for a single project

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseEvent};
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::StatefulWidget,
};
use tokio::sync::mpsc;

use super::DialogMode;
use crate::config::KeybindingConfig;
use crate::services::{Project, ProjectDraft};
use crate::ui::components::modal::{
    ContentKeyResult, Modal, ModalConfig, ModalContent, ModalOutcome, ModalProps, ModalState,
};
use crate::ui::components::theme::{ACCENT_PRIMARY, SELECTED_BG, TEXT_MUTED, TEXT_PRIMARY};
use crate::ui::components::{error_line, TextInputState, ToastKind};
use crate::ui::events::AppEvent;

/// Form fields, lifted out of the content so they survive remounts
#[derive(Debug, Default)]
struct ProjectForm {
    name: TextInputState,
    description: TextInputState,
    error: Option<String>,
}

impl ProjectForm {
    fn fill(&mut self, draft: &ProjectDraft) {
        self.name.set(&draft.name);
        self.description.set(&draft.description);
        self.error = None;
    }

    fn draft(&self) -> ProjectDraft {
        ProjectDraft::new(self.name.value(), self.description.value())
    }
}

pub struct ProjectDialog {
    modal: ModalState,
    model: ProjectModel,
}

struct ProjectModel {
    open: Cell<bool>,
    mode: Rc<Cell<DialogMode>>,
    project: Option<Project>,
    form: Rc<RefCell<ProjectForm>>,
    saving: Cell<bool>,
    deleting: Cell<bool>,
    /// Bumped on every open; requests carry it back so late answers can be told apart
    session: u64,
    tx: mpsc::UnboundedSender<AppEvent>,
}

impl ProjectDialog {
    pub fn new(tx: mpsc::UnboundedSender<AppEvent>) -> Self {
        Self {
            modal: ModalState::new(),
            model: ProjectModel {
                open: Cell::new(false),
                mode: Rc::new(Cell::new(DialogMode::Create)),
                project: None,
                form: Rc::new(RefCell::new(ProjectForm::default())),
                saving: Cell::new(false),
                deleting: Cell::new(false),
                session: 0,
                tx,
            },
        }
    }

    pub fn open_create(&mut self) {
        self.open(DialogMode::Create, None);
    }

    pub fn open_view(&mut self, project: Project) {
        self.open(DialogMode::View, Some(project));
    }

    pub fn open_edit(&mut self, project: Project) {
        self.open(DialogMode::Edit, Some(project));
    }

    fn open(&mut self, mode: DialogMode, project: Option<Project>) {
        let draft = project
            .as_ref()
            .map(ProjectDraft::from_project)
            .unwrap_or_default();
        self.model.form.borrow_mut().fill(&draft);
        self.model.mode.set(mode);
        self.model.project = project;
        self.model.saving.set(false);
        self.model.deleting.set(false);
        self.model.session += 1;
        self.model.open.set(true);
        self.modal.sync(&self.model.props());
    }

    pub fn is_open(&self) -> bool {
        self.model.open.get()
    }

    pub fn mode(&self) -> DialogMode {
        self.model.mode.get()
    }

    pub fn is_busy(&self) -> bool {
        self.model.saving.get() || self.model.deleting.get()
    }

    /// Id of the current opening, echoed back by save and delete results
    pub fn session(&self) -> u64 {
        self.model.session
    }

    /// True when a result tagged `session` belongs to the dialog as it is open now
    fn owns(&self, session: u64) -> bool {
        self.model.open.get() && self.model.session == session
    }

    pub fn project_id(&self) -> Option<uuid::Uuid> {
        self.model.project.as_ref().map(|p| p.id)
    }

    /// Inline validation message, if the last save attempt was rejected
    pub fn error(&self) -> Option<String> {
        self.model.form.borrow().error.clone()
    }

    pub fn handle_key(
        &mut self,
        key: KeyEvent,
        keys: &KeybindingConfig,
    ) -> anyhow::Result<ModalOutcome> {
        let outcome = {
            let mut props = self.model.props();
            self.modal.handle_key(key, &mut props, keys)
        };
        self.modal.sync(&self.model.props());
        outcome
    }

    pub fn handle_mouse(&mut self, mouse: MouseEvent) -> anyhow::Result<ModalOutcome> {
        let outcome = {
            let mut props = self.model.props();
            self.modal.handle_mouse(mouse, &mut props)
        };
        self.modal.sync(&self.model.props());
        outcome
    }

    pub fn render(&mut self, area: Rect, buf: &mut Buffer) {
        let props = self.model.props();
        Modal::new(&props).render(area, buf, &mut self.modal);
    }

    /// A save request finished. Closes on success if the request came from the
    /// dialog as it is open now; returns the toast to show either way.
    pub fn save_finished(
        &mut self,
        session: u64,
        created: bool,
        result: &Result<Project, String>,
    ) -> (ToastKind, String) {
        let current = self.owns(session);
        if current {
            self.model.saving.set(false);
        } else {
            tracing::debug!(session, current = self.model.session, "Save result for an earlier dialog");
        }
        match result {
            Ok(project) => {
                if current {
                    self.close();
                }
                let verb = if created { "Created" } else { "Saved" };
                (ToastKind::Success, format!("{} project '{}'", verb, project.name))
            }
            Err(e) => (ToastKind::Error, format!("Failed to save project: {}", e)),
        }
    }

    /// A delete request finished. Same ownership rule as [`Self::save_finished`].
    pub fn delete_finished(
        &mut self,
        session: u64,
        name: &str,
        result: &Result<(), String>,
    ) -> (ToastKind, String) {
        let current = self.owns(session);
        if current {
            self.model.deleting.set(false);
        } else {
            tracing::debug!(session, current = self.model.session, "Delete result for an earlier dialog");
        }
        match result {
            Ok(()) => {
                if current {
                    self.model.project = None;
                    self.close();
                }
                (ToastKind::Success, format!("Deleted project '{}'", name))
            }
            Err(e) => (ToastKind::Error, format!("Failed to delete project: {}", e)),
        }
    }

    fn close(&mut self) {
        self.model.open.set(false);
        self.modal.sync(&self.model.props());
    }
}

impl ProjectModel {
    fn props(&self) -> ModalProps<'_> {
        let mode = self.mode.get();
        let busy = self.saving.get() || self.deleting.get();
        let title = match &self.project {
            Some(project) if mode != DialogMode::Create => {
                format!("{}: {}", mode.title_for("Project"), project.name)
            }
            _ => mode.title_for("Project"),
        };

        let form = self.form.clone();
        let content_mode = self.mode.clone();
        let mut config = ModalConfig::new(title)
            .children(move || {
                Box::new(ProjectFormContent {
                    form: form.clone(),
                    mode: content_mode.clone(),
                    focus: 0,
                }) as Box<dyn ModalContent>
            })
            .show_save(mode.shows_save())
            .show_delete(mode.shows_delete())
            .save_label(mode.save_label())
            .save_disabled(busy)
            .delete_disabled(busy)
            .on_save(move || self.save());

        if let Some(project) = &self.project {
            config = config.on_delete(move || self.delete(project));
        }
        if mode == DialogMode::View {
            config = config.description("Press e to edit");
        }

        ModalProps::new(self.open.get(), |open| self.open.set(open), config)
    }

    fn save(&self) -> anyhow::Result<()> {
        let draft = self.form.borrow().draft();
        let draft = match draft.validated() {
            Ok(draft) => draft,
            Err(e) => {
                tracing::debug!(error = %e, "Project form rejected");
                self.form.borrow_mut().error = Some(e.to_string());
                return Ok(());
            }
        };

        self.form.borrow_mut().error = None;
        self.saving.set(true);
        let id = match self.mode.get() {
            DialogMode::Create => None,
            DialogMode::View | DialogMode::Edit => self.project.as_ref().map(|p| p.id),
        };
        self.tx.send(AppEvent::SaveProject {
            session: self.session,
            id,
            draft,
        })?;
        Ok(())
    }

    fn delete(&self, project: &Project) -> anyhow::Result<()> {
        self.deleting.set(true);
        self.tx.send(AppEvent::DeleteProject {
            session: self.session,
            id: project.id,
            name: project.name.clone(),
        })?;
        Ok(())
    }
}

struct ProjectFormContent {
    form: Rc<RefCell<ProjectForm>>,
    mode: Rc<Cell<DialogMode>>,
    focus: usize,
}

impl ProjectFormContent {
    fn field(&self, label: &str, input: &TextInputState, index: usize) -> Vec<Line<'static>> {
        let editable = self.mode.get().fields_editable();
        let focused = editable && self.focus == index;
        let label_style = if focused {
            Style::default()
                .fg(ACCENT_PRIMARY)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(TEXT_MUTED)
        };

        let value = if input.is_empty() && !focused {
            Line::from(Span::styled("  —", Style::default().fg(TEXT_MUTED)))
        } else {
            let mut line = input.line(Style::default().fg(TEXT_PRIMARY), focused);
            line.spans.insert(0, Span::raw("  "));
            if focused {
                line = line.style(Style::default().bg(SELECTED_BG));
            }
            line
        };

        vec![Line::from(Span::styled(label.to_string(), label_style)), value]
    }
}

impl ModalContent for ProjectFormContent {
    fn lines(&self, _width: u16) -> Vec<Line<'_>> {
        let form = self.form.borrow();
        let mut lines = self.field("Name", &form.name, 0);
        lines.push(Line::default());
        lines.extend(self.field("Description", &form.description, 1));
        lines.push(Line::default());
        match &form.error {
            Some(error) => lines.push(error_line(error)),
            None => lines.push(Line::default()),
        }
        lines
    }

    fn handle_key(&mut self, key: KeyEvent) -> ContentKeyResult {
        let mode = self.mode.get();
        if !mode.fields_editable() {
            if key.code == KeyCode::Char('e') && key.modifiers == KeyModifiers::NONE {
                self.mode.set(DialogMode::Edit);
                return ContentKeyResult::Consumed;
            }
            return ContentKeyResult::Ignored;
        }

        match key.code {
            KeyCode::Up if self.focus > 0 => self.focus -= 1,
            KeyCode::Down | KeyCode::Enter if self.focus < 1 => self.focus += 1,
            _ => {
                let mut form = self.form.borrow_mut();
                let input = if self.focus == 0 {
                    &mut form.name
                } else {
                    &mut form.description
                };
                if !input.handle_key(key) {
                    return ContentKeyResult::Ignored;
                }
                form.error = None;
            }
        }
        ContentKeyResult::Consumed
    }

    fn focus_line(&self) -> Option<usize> {
        Some(self.focus * 3 + 1)
    }
}
