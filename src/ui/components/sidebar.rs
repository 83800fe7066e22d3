//! Sidebar listing the user's projects

use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Paragraph, StatefulWidget, Widget},
};
use uuid::Uuid;

use super::theme::{
    ACCENT_ERROR, ACCENT_PRIMARY, BORDER_DEFAULT, SELECTED_BG, TEXT_MUTED, TEXT_PRIMARY,
};
use crate::services::Project;
use crate::util::truncate_to_width;

/// Rows taken by the title and separator
pub const SIDEBAR_HEADER_ROWS: u16 = 2;

/// Sidebar widget for project navigation
pub struct Sidebar<'a> {
    title: &'a str,
    focused: bool,
}

impl<'a> Sidebar<'a> {
    pub fn new() -> Self {
        Self {
            title: "▤ Projects",
            focused: false,
        }
    }

    pub fn focused(mut self, focused: bool) -> Self {
        self.focused = focused;
        self
    }
}

impl Default for Sidebar<'_> {
    fn default() -> Self {
        Self::new()
    }
}

/// Project list plus selection
#[derive(Debug, Default)]
pub struct SidebarState {
    projects: Vec<Project>,
    selected: Option<usize>,
    /// Set while the first list request is in flight
    pub loading: bool,
    /// Last load failure
    pub error: Option<String>,
    /// Area of the "New project" button when the list is empty
    pub new_project_button_area: Option<Rect>,
    /// Row rects of the last render, for mouse selection
    row_areas: Vec<(usize, Rect)>,
}

impl SidebarState {
    pub fn new() -> Self {
        Self {
            loading: true,
            ..Self::default()
        }
    }

    pub fn projects(&self) -> &[Project] {
        &self.projects
    }

    /// Replace the list, keeping the selection on the same project if it survived
    pub fn set_projects(&mut self, projects: Vec<Project>) {
        let keep = self.selected_project().map(|p| p.id);
        self.projects = projects;
        self.loading = false;
        self.error = None;
        self.selected = keep
            .and_then(|id| self.position(id))
            .or(if self.projects.is_empty() { None } else { Some(0) });
    }

    pub fn set_error(&mut self, error: impl Into<String>) {
        self.loading = false;
        self.error = Some(error.into());
    }

    /// Insert or replace by id and select it
    pub fn upsert(&mut self, project: Project) {
        let id = project.id;
        match self.position(id) {
            Some(i) => self.projects[i] = project,
            None => self.projects.push(project),
        }
        self.projects.sort_by_key(|p| p.name.to_lowercase());
        self.selected = self.position(id);
    }

    pub fn remove(&mut self, id: Uuid) {
        let Some(index) = self.position(id) else {
            return;
        };
        self.projects.remove(index);
        self.selected = match self.projects.len() {
            0 => None,
            len => Some(index.min(len - 1)),
        };
    }

    pub fn selected_index(&self) -> Option<usize> {
        self.selected
    }

    pub fn selected_project(&self) -> Option<&Project> {
        self.selected.and_then(|i| self.projects.get(i))
    }

    pub fn select_next(&mut self) {
        if self.projects.is_empty() {
            return;
        }
        self.selected = Some(match self.selected {
            Some(i) => (i + 1) % self.projects.len(),
            None => 0,
        });
    }

    pub fn select_prev(&mut self) {
        if self.projects.is_empty() {
            return;
        }
        let len = self.projects.len();
        self.selected = Some(match self.selected {
            Some(i) => (i + len - 1) % len,
            None => len - 1,
        });
    }

    /// Select the project drawn at `(x, y)`, if any
    pub fn select_at(&mut self, x: u16, y: u16) -> bool {
        let hit = self
            .row_areas
            .iter()
            .find(|(_, rect)| rect.contains((x, y).into()))
            .map(|(i, _)| *i);
        if hit.is_some() {
            self.selected = hit;
        }
        hit.is_some()
    }

    fn position(&self, id: Uuid) -> Option<usize> {
        self.projects.iter().position(|p| p.id == id)
    }
}

impl StatefulWidget for Sidebar<'_> {
    type State = SidebarState;

    fn render(self, area: Rect, buf: &mut Buffer, state: &mut Self::State) {
        state.row_areas.clear();
        state.new_project_button_area = None;
        if area.width < 10 || area.height <= SIDEBAR_HEADER_ROWS {
            return;
        }

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(1), // Title
                Constraint::Length(1), // Separator
                Constraint::Min(1),    // List
            ])
            .split(area);

        let title_style = if self.focused {
            Style::default().fg(ACCENT_PRIMARY).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(TEXT_PRIMARY)
        };
        Paragraph::new(format!(" {}", self.title.trim()))
            .style(title_style)
            .render(chunks[0], buf);

        let separator_y = chunks[1].y;
        for x in area.x..area.x + area.width {
            buf[(x, separator_y)]
                .set_char('─')
                .set_fg(BORDER_DEFAULT);
        }

        let content_area = chunks[2];

        if let Some(error) = &state.error {
            Paragraph::new(Line::from(Span::styled(
                truncate_to_width(&format!(" {}", error), content_area.width as usize),
                Style::default().fg(ACCENT_ERROR),
            )))
            .render(content_area, buf);
            return;
        }

        if state.loading {
            Paragraph::new(Span::styled(" Loading…", Style::default().fg(TEXT_MUTED)))
                .render(content_area, buf);
            return;
        }

        if state.projects.is_empty() {
            let button_text = "+ New project";
            let button_width = button_text.len() as u16 + 4;
            let button_x = content_area
                .x
                .saturating_add(content_area.width.saturating_sub(button_width) / 2);
            let button_y = content_area
                .y
                .saturating_add(content_area.height.saturating_sub(1) / 2);

            let button_area = Rect::new(
                button_x,
                button_y,
                button_width.min(content_area.width),
                1,
            );
            state.new_project_button_area = Some(button_area);

            let style = if self.focused {
                Style::default().fg(ACCENT_PRIMARY)
            } else {
                Style::default().fg(TEXT_MUTED)
            };
            Paragraph::new(format!("  {}  ", button_text))
                .style(style)
                .render(button_area, buf);
            return;
        }

        // Keep the selection in view
        let visible = content_area.height as usize;
        let first = state
            .selected
            .map_or(0, |s| s.saturating_sub(visible.saturating_sub(1)));

        let label_width = content_area.width.saturating_sub(3) as usize;
        for (row, (index, project)) in state
            .projects
            .iter()
            .enumerate()
            .skip(first)
            .take(visible)
            .enumerate()
        {
            let rect = Rect::new(content_area.x, content_area.y + row as u16, content_area.width, 1);
            let selected = state.selected == Some(index);
            let style = if selected {
                Style::default().bg(SELECTED_BG).fg(TEXT_PRIMARY)
            } else {
                Style::default().fg(TEXT_PRIMARY)
            };
            let marker = if selected { "▸ " } else { "  " };
            let line = Line::from(vec![
                Span::styled(marker, Style::default().fg(ACCENT_PRIMARY)),
                Span::raw(truncate_to_width(&project.name, label_width)),
            ]);
            Paragraph::new(line).style(style).render(rect, buf);
            state.row_areas.push((index, rect));
        }
    }
}
