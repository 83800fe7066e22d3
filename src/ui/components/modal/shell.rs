//! The scoped modal shell: lifecycle, input routing, and rendering

use std::sync::Arc;

use crossterm::event::{KeyEvent, MouseButton, MouseEvent, MouseEventKind};
use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Direction, Layout, Position, Rect},
    style::{Modifier, Style},
    text::Line,
    widgets::{Paragraph, StatefulWidget, Widget},
};

use super::config::{ModalConfig, ModalProps};
use super::content::{ContentKeyResult, MountKey, MountedPanel};
use super::footer::{ActionFooter, FooterButton, FooterPress};
use super::tabs::TabController;
use crate::config::{KeyCombo, KeyContext, KeybindingConfig};
use crate::debug::EventLogger;
use crate::ui::action::Action;
use crate::ui::components::dialog::{dim_backdrop, DialogFrame};
use crate::ui::components::key_hints::{HintLook, KeyHints};
use crate::ui::components::tab_bar::{TabBar, TabBarItem};
use crate::ui::components::theme::TEXT_SECONDARY;
use crate::util::wrap_to_width;

/// Lines scrolled per mouse wheel notch
const WHEEL_STEP: usize = 3;

/// What an input event did to the modal
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModalOutcome {
    /// The parent was asked to close the modal
    Closed,
    Saved,
    Deleted,
    TabChanged,
    Scrolled,
    /// Used by content or swallowed by the focus trap
    Consumed,
    /// Not for this modal (closed, unbound, or a no-op)
    Ignored,
}

impl From<FooterPress> for ModalOutcome {
    fn from(press: FooterPress) -> Self {
        match press {
            FooterPress::Closed => ModalOutcome::Closed,
            FooterPress::Deleted => ModalOutcome::Deleted,
            FooterPress::Saved => ModalOutcome::Saved,
            FooterPress::Ignored => ModalOutcome::Ignored,
        }
    }
}

/// Screen regions recorded by the last render, for mouse hit-testing
#[derive(Debug, Clone, Default)]
struct HitAreas {
    panel: Rect,
    body: Rect,
    tabs: Vec<(String, Rect)>,
    buttons: Vec<(FooterButton, Rect)>,
}

/// Per-instance state of one modal.
///
/// Call [`ModalState::sync`] (or any input/render entry point, which calls
/// it) with the current props; the shell reconciles its lifecycle from the
/// open flag it observes.
#[derive(Default)]
pub struct ModalState {
    was_open: bool,
    tabs: TabController,
    panel: Option<MountedPanel>,
    hits: Option<HitAreas>,
}

impl ModalState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach the logger that receives tab-change events
    pub fn with_logger(mut self, logger: Arc<dyn EventLogger>) -> Self {
        self.tabs = self.tabs.with_logger(logger);
        self
    }

    /// Reconcile with the parent's props.
    ///
    /// Closed: drop the mounted content and the active tab. Closed → open:
    /// reset to the first tab and mount fresh content. Open → open: keep
    /// the active tab if it still exists, remount only if the mount target
    /// changed.
    pub fn sync(&mut self, props: &ModalProps<'_>) {
        if !props.open {
            if self.was_open {
                tracing::debug!(title = %props.config.title, "Modal closed, unmounting content");
            }
            self.was_open = false;
            self.tabs.clear();
            self.panel = None;
            self.hits = None;
            return;
        }

        if !self.was_open {
            tracing::debug!(title = %props.config.title, "Modal opened");
            self.was_open = true;
            self.panel = None;
            self.tabs.reset(&props.config.tabs);
        } else {
            self.tabs.reconcile(&props.config.tabs);
        }

        self.ensure_mounted(&props.config);
    }

    pub fn is_open(&self) -> bool {
        self.was_open
    }

    /// Whether a content instance is currently mounted
    pub fn is_mounted(&self) -> bool {
        self.panel.as_ref().is_some_and(|p| p.content.is_some())
    }

    pub fn active_tab(&self) -> Option<&str> {
        self.tabs.active()
    }

    pub fn scroll_offset(&self) -> usize {
        self.panel.as_ref().map_or(0, |p| p.scroll)
    }

    /// Activate the tab `id` (tab bar click). Returns true if it changed.
    pub fn select_tab(&mut self, props: &ModalProps<'_>, id: &str) -> bool {
        self.sync(props);
        if !props.open {
            return false;
        }
        let changed = self.tabs.select(&props.config.tabs, id);
        if changed {
            self.ensure_mounted(&props.config);
        }
        changed
    }

    /// Route a key: mounted content first, then the Modal key context.
    ///
    /// Keys not bound in the Modal context are swallowed while open so
    /// nothing behind the modal sees them.
    pub fn handle_key(
        &mut self,
        key: KeyEvent,
        props: &mut ModalProps<'_>,
        keys: &KeybindingConfig,
    ) -> anyhow::Result<ModalOutcome> {
        self.sync(props);
        if !props.open {
            return Ok(ModalOutcome::Ignored);
        }

        if let Some(content) = self.panel.as_mut().and_then(|p| p.content.as_mut()) {
            if content.handle_key(key) == ContentKeyResult::Consumed {
                return Ok(ModalOutcome::Consumed);
            }
        }

        let combo = KeyCombo::from_key_event(&key);
        match keys.get_context_action(&combo, KeyContext::Modal) {
            Some(action) => {
                let action = action.clone();
                match self.perform(&action, props)? {
                    ModalOutcome::Ignored => Ok(ModalOutcome::Consumed),
                    outcome => Ok(outcome),
                }
            }
            None => Ok(ModalOutcome::Consumed),
        }
    }

    /// Execute a modal action against the current props
    pub fn perform(
        &mut self,
        action: &Action,
        props: &mut ModalProps<'_>,
    ) -> anyhow::Result<ModalOutcome> {
        self.sync(props);
        if !props.open {
            return Ok(ModalOutcome::Ignored);
        }

        let tabs = &props.config.tabs;
        let outcome = match action {
            Action::ModalClose => {
                props.request_close();
                ModalOutcome::Closed
            }
            Action::ModalSave => ActionFooter::press(props, FooterButton::Save)?.into(),
            Action::ModalDelete => ActionFooter::press(props, FooterButton::Delete)?.into(),
            Action::NextTab => {
                let changed = self.tabs.select_next(tabs);
                self.tab_outcome(changed, &props.config)
            }
            Action::PrevTab => {
                let changed = self.tabs.select_prev(tabs);
                self.tab_outcome(changed, &props.config)
            }
            Action::SwitchToTab(n) => {
                let changed = self.tabs.select_index(tabs, usize::from(n.saturating_sub(1)));
                self.tab_outcome(changed, &props.config)
            }
            Action::ScrollUp(n) => self.scroll(|p| p.scroll_up(usize::from(*n))),
            Action::ScrollDown(n) => self.scroll(|p| p.scroll_down(usize::from(*n))),
            Action::ScrollPageUp => self.scroll(MountedPanel::page_up),
            Action::ScrollPageDown => self.scroll(MountedPanel::page_down),
            Action::ScrollToTop => self.scroll(MountedPanel::scroll_to_top),
            Action::ScrollToBottom => self.scroll(MountedPanel::scroll_to_bottom),
            _ => ModalOutcome::Ignored,
        };

        Ok(outcome)
    }

    /// Route a mouse event using the areas from the last render
    pub fn handle_mouse(
        &mut self,
        mouse: MouseEvent,
        props: &mut ModalProps<'_>,
    ) -> anyhow::Result<ModalOutcome> {
        self.sync(props);
        if !props.open {
            return Ok(ModalOutcome::Ignored);
        }
        let Some(hits) = self.hits.clone() else {
            return Ok(ModalOutcome::Consumed);
        };
        let pos = Position::new(mouse.column, mouse.row);

        match mouse.kind {
            MouseEventKind::Down(MouseButton::Left) => {
                if !hits.panel.contains(pos) {
                    tracing::debug!(title = %props.config.title, "Backdrop click, closing modal");
                    props.request_close();
                    return Ok(ModalOutcome::Closed);
                }

                if let Some((id, _)) = hits.tabs.iter().find(|(_, r)| r.contains(pos)) {
                    let changed = self.tabs.select(&props.config.tabs, id);
                    return Ok(self.tab_outcome(changed, &props.config));
                }

                if let Some((kind, _)) = hits.buttons.iter().find(|(_, r)| r.contains(pos)) {
                    return Ok(ActionFooter::press(props, *kind)?.into());
                }

                Ok(ModalOutcome::Consumed)
            }
            MouseEventKind::ScrollUp if hits.body.contains(pos) => {
                Ok(self.scroll(|p| p.scroll_up(WHEEL_STEP)))
            }
            MouseEventKind::ScrollDown if hits.body.contains(pos) => {
                Ok(self.scroll(|p| p.scroll_down(WHEEL_STEP)))
            }
            _ => Ok(ModalOutcome::Consumed),
        }
    }

    fn tab_outcome(&mut self, changed: bool, config: &ModalConfig<'_>) -> ModalOutcome {
        if changed {
            self.ensure_mounted(config);
            ModalOutcome::TabChanged
        } else {
            ModalOutcome::Ignored
        }
    }

    fn scroll(&mut self, f: impl FnOnce(&mut MountedPanel)) -> ModalOutcome {
        match self.panel.as_mut() {
            Some(panel) => {
                let before = panel.scroll;
                f(panel);
                if panel.scroll == before {
                    ModalOutcome::Ignored
                } else {
                    ModalOutcome::Scrolled
                }
            }
            None => ModalOutcome::Ignored,
        }
    }

    fn mount_key(&self, config: &ModalConfig<'_>) -> MountKey {
        if !config.tabs.is_empty() {
            if let Some(active) = self.tabs.active() {
                return MountKey::Tab(active.to_string());
            }
        }
        if config.children.is_some() {
            MountKey::Children
        } else {
            MountKey::Empty
        }
    }

    /// Mount content for the current target unless it is already mounted
    fn ensure_mounted(&mut self, config: &ModalConfig<'_>) {
        let key = self.mount_key(config);
        if self.panel.as_ref().is_some_and(|p| p.key == key) {
            return;
        }

        let content = match &key {
            MountKey::Tab(id) => config.tabs.get(id).map(|tab| (tab.content)()),
            MountKey::Children => config.children.as_ref().map(|factory| factory()),
            MountKey::Empty => None,
        };
        tracing::trace!(key = ?key, "Mounting modal content");
        self.panel = Some(MountedPanel::new(key, content));
    }
}

/// Renders a modal from its props. Draws nothing while closed.
pub struct Modal<'p, 'a> {
    props: &'p ModalProps<'a>,
    hints: Vec<(&'p str, &'p str)>,
}

impl<'p, 'a> Modal<'p, 'a> {
    pub fn new(props: &'p ModalProps<'a>) -> Self {
        Self {
            props,
            hints: Vec::new(),
        }
    }

    /// Key hints drawn on the left of the footer
    pub fn hints(mut self, hints: Vec<(&'p str, &'p str)>) -> Self {
        self.hints = hints;
        self
    }

    fn default_hints(config: &ModalConfig<'_>) -> Vec<(&'static str, &'static str)> {
        let mut hints = Vec::new();
        if config.tabs.len() > 1 {
            hints.push(("Tab", "switch"));
        }
        hints.push(("Esc", "close"));
        hints
    }
}

impl StatefulWidget for Modal<'_, '_> {
    type State = ModalState;

    fn render(self, area: Rect, buf: &mut Buffer, state: &mut ModalState) {
        state.sync(self.props);
        if !self.props.open {
            return;
        }
        let config = &self.props.config;

        dim_backdrop(area, buf);
        let frame = DialogFrame::sized(&config.title, config.size);
        let panel = frame.area(area);
        let inner = frame.render(area, buf);

        let content_width = inner.width.saturating_sub(2);
        let description = config
            .description
            .as_deref()
            .map(|d| wrap_to_width(d, usize::from(content_width.max(1))))
            .unwrap_or_default();
        let description_height = u16::try_from(description.len()).unwrap_or(u16::MAX).min(3);
        let tab_bar_height = u16::from(!config.tabs.is_empty());

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(description_height),
                Constraint::Length(tab_bar_height),
                Constraint::Min(1),
                Constraint::Length(1),
            ])
            .split(inner);
        let pad = |r: Rect| Rect {
            x: r.x + 1,
            width: r.width.saturating_sub(2),
            ..r
        };

        if description_height > 0 {
            let lines: Vec<Line> = description.into_iter().map(Line::from).collect();
            Paragraph::new(lines)
                .style(Style::default().fg(TEXT_SECONDARY).add_modifier(Modifier::ITALIC))
                .render(pad(chunks[0]), buf);
        }

        let tab_hits = if config.tabs.is_empty() {
            Vec::new()
        } else {
            let items = config
                .tabs
                .iter()
                .map(|t| TabBarItem {
                    id: &t.id,
                    label: &t.label,
                    icon: t.icon.as_deref(),
                })
                .collect();
            TabBar::new(items, state.tabs.active()).render(chunks[1], buf)
        };

        let body = pad(chunks[2]);
        if let Some(mounted) = state.panel.as_mut() {
            mounted.render(body, buf);
        }

        let footer = pad(chunks[3]);
        let buttons = ActionFooter::buttons(config);
        let hints = if self.hints.is_empty() {
            Self::default_hints(config)
        } else {
            self.hints
        };
        KeyHints::new(&hints, HintLook::Inline)
            .alignment(Alignment::Left)
            .render(footer, buf);
        let button_hits = ActionFooter::render(&buttons, footer, buf);

        state.hits = Some(HitAreas {
            panel,
            body,
            tabs: tab_hits,
            buttons: button_hits,
        });
    }
}
