//! Chat settings dialog: tabs General, Tools and Params over one draft

use std::cell::{Cell, RefCell};
use std::path::PathBuf;
use std::rc::Rc;
use std::sync::Arc;

use anyhow::Context;
use crossterm::event::{KeyCode, KeyEvent, MouseEvent};
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::StatefulWidget,
};
use tokio::sync::mpsc;

use crate::config::{save_chat_settings, ChatSettings, KeybindingConfig, AVAILABLE_MODELS};
use crate::debug::EventLogger;
use crate::ui::components::modal::{
    ContentKeyResult, Modal, ModalConfig, ModalContent, ModalOutcome, ModalProps, ModalSize,
    ModalState, TabDescriptor, TabSet,
};
use crate::ui::components::theme::{ACCENT_PRIMARY, SELECTED_BG, TEXT_MUTED, TEXT_PRIMARY};
use crate::ui::components::{TextInputState, ToastKind};
use crate::ui::events::AppEvent;
use crate::util::wrap_to_width;

const TEMPERATURE_STEP: f32 = 0.1;
const MAX_TOKENS_STEP: u32 = 256;

type Draft = Rc<RefCell<ChatSettings>>;

/// Settings dialog: owns its modal state and the lifted draft
pub struct SettingsDialog {
    modal: ModalState,
    model: SettingsModel,
}

struct SettingsModel {
    open: Cell<bool>,
    draft: Draft,
    config_path: PathBuf,
    tx: mpsc::UnboundedSender<AppEvent>,
}

impl SettingsDialog {
    pub fn new(
        config_path: PathBuf,
        tx: mpsc::UnboundedSender<AppEvent>,
        logger: Arc<dyn EventLogger>,
    ) -> Self {
        Self {
            modal: ModalState::new().with_logger(logger),
            model: SettingsModel {
                open: Cell::new(false),
                draft: Rc::new(RefCell::new(ChatSettings::default())),
                config_path,
                tx,
            },
        }
    }

    /// Open with a fresh draft of `current`
    pub fn open(&mut self, current: &ChatSettings) {
        *self.model.draft.borrow_mut() = current.clone();
        self.model.open.set(true);
        self.modal.sync(&self.model.props());
    }

    pub fn is_open(&self) -> bool {
        self.model.open.get()
    }

    pub fn active_tab(&self) -> Option<&str> {
        self.modal.active_tab()
    }

    pub fn draft(&self) -> ChatSettings {
        self.model.draft.borrow().clone()
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
        // Handlers may have closed the dialog
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
}

impl SettingsModel {
    fn props(&self) -> ModalProps<'_> {
        let draft = &self.draft;
        let tabs = TabSet::new(vec![
            TabDescriptor::new("general", "General", {
                let draft = draft.clone();
                move || Box::new(GeneralTab::new(draft.clone())) as Box<dyn ModalContent>
            })
            .with_icon("⚙"),
            TabDescriptor::new("tools", "Tools", {
                let draft = draft.clone();
                move || Box::new(ToolsTab::new(draft.clone())) as Box<dyn ModalContent>
            })
            .with_icon("🔧"),
            TabDescriptor::new("params", "Params", {
                let draft = draft.clone();
                move || Box::new(ParamsTab::new(draft.clone())) as Box<dyn ModalContent>
            })
            .with_icon("⚡"),
        ])
        .unwrap_or_default();

        let config = ModalConfig::new("Settings")
            .description("Defaults for new chats")
            .size(ModalSize::Large)
            .tabs(tabs)
            .show_save(true)
            .on_save(move || self.save());

        ModalProps::new(self.open.get(), |open| self.open.set(open), config)
    }

    /// Persist the draft, report it, and close
    fn save(&self) -> anyhow::Result<()> {
        let settings = self.draft.borrow().clone().normalized();
        save_chat_settings(&self.config_path, &settings).with_context(|| {
            format!("Failed to save settings to {}", self.config_path.display())
        })?;

        let _ = self.tx.send(AppEvent::SettingsSaved(settings));
        let _ = self.tx.send(AppEvent::Toast {
            kind: ToastKind::Success,
            message: "Settings saved".to_string(),
        });
        self.open.set(false);
        Ok(())
    }
}

fn field_line(label: &str, value: Vec<Span<'static>>, focused: bool) -> Line<'static> {
    let marker = if focused { "▶ " } else { "  " };
    let label_style = if focused {
        Style::default()
            .fg(ACCENT_PRIMARY)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(TEXT_MUTED)
    };
    let mut spans = vec![
        Span::styled(marker, Style::default().fg(ACCENT_PRIMARY)),
        Span::styled(format!("{:<16}", label), label_style),
    ];
    spans.extend(value);
    let line = Line::from(spans);
    if focused {
        line.style(Style::default().bg(SELECTED_BG))
    } else {
        line
    }
}

fn hint_line(text: &str) -> Line<'static> {
    Line::from(Span::styled(
        format!("  {}", text),
        Style::default().fg(TEXT_MUTED),
    ))
}

/// Model and system prompt
struct GeneralTab {
    draft: Draft,
    focus: usize,
    prompt: TextInputState,
}

impl GeneralTab {
    fn new(draft: Draft) -> Self {
        let prompt = TextInputState::with_value(&draft.borrow().system_prompt);
        Self {
            draft,
            focus: 0,
            prompt,
        }
    }

    fn cycle_model(&mut self, forward: bool) {
        let mut draft = self.draft.borrow_mut();
        let current = AVAILABLE_MODELS
            .iter()
            .position(|m| *m == draft.model)
            .unwrap_or(0);
        let len = AVAILABLE_MODELS.len();
        let next = if forward {
            (current + 1) % len
        } else {
            (current + len - 1) % len
        };
        draft.model = AVAILABLE_MODELS[next].to_string();
    }
}

impl ModalContent for GeneralTab {
    fn lines(&self, width: u16) -> Vec<Line<'_>> {
        let draft = self.draft.borrow();
        let mut lines = vec![
            field_line(
                "Model",
                vec![Span::styled(
                    format!("◀ {} ▶", draft.model),
                    Style::default().fg(TEXT_PRIMARY),
                )],
                self.focus == 0,
            ),
            Line::default(),
            field_line("System prompt", Vec::new(), self.focus == 1),
        ];

        if self.focus == 1 {
            lines.push(
                self.prompt
                    .line(Style::default().fg(TEXT_PRIMARY), true)
                    .style(Style::default().bg(SELECTED_BG)),
            );
        } else if self.prompt.is_empty() {
            lines.push(hint_line("(none)"));
        } else {
            for row in wrap_to_width(self.prompt.value(), usize::from(width.saturating_sub(2))) {
                lines.push(Line::from(format!("  {}", row)));
            }
        }

        lines.push(Line::default());
        lines.push(hint_line("↑/↓ field  ←/→ change model"));
        lines
    }

    fn handle_key(&mut self, key: KeyEvent) -> ContentKeyResult {
        match (self.focus, key.code) {
            (_, KeyCode::Up) if self.focus > 0 => self.focus -= 1,
            (_, KeyCode::Down) if self.focus < 1 => self.focus += 1,
            (0, KeyCode::Left) => self.cycle_model(false),
            (0, KeyCode::Right) | (0, KeyCode::Enter) => self.cycle_model(true),
            (1, _) => {
                if !self.prompt.handle_key(key) {
                    return ContentKeyResult::Ignored;
                }
                self.draft.borrow_mut().system_prompt = self.prompt.value().to_string();
            }
            _ => return ContentKeyResult::Ignored,
        }
        ContentKeyResult::Consumed
    }

    fn focus_line(&self) -> Option<usize> {
        Some(if self.focus == 0 { 0 } else { 3 })
    }
}

/// Tool toggles
struct ToolsTab {
    draft: Draft,
    focus: usize,
}

const TOOL_NAMES: [&str; 4] = ["Web search", "Code interpreter", "Knowledge", "Image generation"];

impl ToolsTab {
    fn new(draft: Draft) -> Self {
        Self { draft, focus: 0 }
    }

    fn toggle(&mut self) {
        let mut draft = self.draft.borrow_mut();
        let tools = &mut draft.tools;
        let flag = match self.focus {
            0 => &mut tools.web_search,
            1 => &mut tools.code_interpreter,
            2 => &mut tools.knowledge,
            _ => &mut tools.image_generation,
        };
        *flag = !*flag;
    }
}

impl ModalContent for ToolsTab {
    fn lines(&self, _width: u16) -> Vec<Line<'_>> {
        let tools = self.draft.borrow().tools;
        let states = [
            tools.web_search,
            tools.code_interpreter,
            tools.knowledge,
            tools.image_generation,
        ];
        let mut lines: Vec<Line> = TOOL_NAMES
            .iter()
            .zip(states)
            .enumerate()
            .map(|(i, (name, on))| {
                let value = if on {
                    Span::styled("[x] on", Style::default().fg(ACCENT_PRIMARY))
                } else {
                    Span::styled("[ ] off", Style::default().fg(TEXT_MUTED))
                };
                field_line(name, vec![value], i == self.focus)
            })
            .collect();
        lines.push(Line::default());
        lines.push(hint_line("↑/↓ select  Space toggle"));
        lines
    }

    fn handle_key(&mut self, key: KeyEvent) -> ContentKeyResult {
        match key.code {
            KeyCode::Up if self.focus > 0 => self.focus -= 1,
            KeyCode::Down if self.focus + 1 < TOOL_NAMES.len() => self.focus += 1,
            KeyCode::Char(' ') | KeyCode::Enter => self.toggle(),
            _ => return ContentKeyResult::Ignored,
        }
        ContentKeyResult::Consumed
    }

    fn focus_line(&self) -> Option<usize> {
        Some(self.focus)
    }
}

/// Temperature and token limit
struct ParamsTab {
    draft: Draft,
    focus: usize,
}

impl ParamsTab {
    fn new(draft: Draft) -> Self {
        Self { draft, focus: 0 }
    }

    fn adjust(&mut self, up: bool) {
        let mut draft = self.draft.borrow_mut();
        match self.focus {
            0 => {
                let delta = if up { TEMPERATURE_STEP } else { -TEMPERATURE_STEP };
                let value = ((draft.temperature + delta) * 10.0).round() / 10.0;
                draft.temperature =
                    value.clamp(ChatSettings::MIN_TEMPERATURE, ChatSettings::MAX_TEMPERATURE);
            }
            _ => {
                let value = if up {
                    draft.max_tokens.saturating_add(MAX_TOKENS_STEP)
                } else {
                    draft.max_tokens.saturating_sub(MAX_TOKENS_STEP)
                };
                draft.max_tokens =
                    value.clamp(ChatSettings::MIN_MAX_TOKENS, ChatSettings::MAX_MAX_TOKENS);
            }
        }
    }
}

impl ModalContent for ParamsTab {
    fn lines(&self, _width: u16) -> Vec<Line<'_>> {
        let draft = self.draft.borrow();
        vec![
            field_line(
                "Temperature",
                vec![Span::raw(format!("◀ {:.1} ▶", draft.temperature))],
                self.focus == 0,
            ),
            field_line(
                "Max tokens",
                vec![Span::raw(format!("◀ {} ▶", draft.max_tokens))],
                self.focus == 1,
            ),
            Line::default(),
            hint_line("↑/↓ select  ←/→ adjust"),
        ]
    }

    fn handle_key(&mut self, key: KeyEvent) -> ContentKeyResult {
        match key.code {
            KeyCode::Up if self.focus > 0 => self.focus -= 1,
            KeyCode::Down if self.focus < 1 => self.focus += 1,
            KeyCode::Left => self.adjust(false),
            KeyCode::Right => self.adjust(true),
            _ => return ContentKeyResult::Ignored,
        }
        ContentKeyResult::Consumed
    }

    fn focus_line(&self) -> Option<usize> {
        Some(self.focus)
    }
}
