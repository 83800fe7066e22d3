use std::io;
use std::sync::Arc;
use std::time::Duration;

use crossterm::event::{
    Event, EventStream, KeyEvent, KeyEventKind, MouseButton, MouseEvent, MouseEventKind,
};
use futures::StreamExt;
use ratatui::{
    backend::CrosstermBackend,
    buffer::Buffer,
    layout::{Constraint, Direction, Layout, Rect},
    style::Style,
    widgets::{Block, BorderType, Borders, StatefulWidget, Widget},
    Frame, Terminal,
};
use tokio::sync::mpsc;
use tokio::time::Instant;

use crate::config::{Config, KeyCombo, KeyContext};
use crate::debug::{DebugLogger, DebugSettings, DebugSettingsStore, EventLogger};
use crate::search::{
    DebouncedSearch, KnowledgeSearch, LocalKnowledgeIndex, SearchUpdate, SuggestionList,
};
use crate::services::{InMemoryProjectService, ProjectService};
use crate::ui::action::Action;
use crate::ui::components::modal::ModalOutcome;
use crate::ui::components::theme::{BORDER_DEFAULT, BORDER_FOCUSED, TEXT_MUTED};
use crate::ui::components::{
    ChatMessage, ChatView, GlobalFooter, Sidebar, SidebarState, SuggestionsPanel,
    TextInputState, ToastKind, ToastQueue,
};
use crate::ui::dialogs::{DebugConsole, ProjectDialog, SettingsDialog};
use crate::ui::events::AppEvent;
use crate::ui::terminal_guard::TerminalGuard;

const SIDEBAR_WIDTH: u16 = 28;
const TICK_RATE: Duration = Duration::from_millis(250);
const WHEEL_LINES: usize = 3;

/// Backends the app talks to
pub struct AppServices {
    pub projects: Arc<dyn ProjectService>,
    pub knowledge: Arc<dyn KnowledgeSearch>,
    pub debug_settings: Arc<DebugSettingsStore>,
}

impl AppServices {
    /// In-process services; debug settings come from the configured file
    pub fn local(config: &Config) -> Self {
        let debug_settings = DebugSettingsStore::load(&config.debug_settings_path)
            .unwrap_or_else(|e| {
                tracing::warn!(
                    path = %config.debug_settings_path.display(),
                    error = %e,
                    "Failed to load debug settings, using defaults"
                );
                DebugSettingsStore::in_memory(DebugSettings::default())
            });

        Self {
            projects: Arc::new(InMemoryProjectService::seeded()),
            knowledge: Arc::new(LocalKnowledgeIndex::builtin()),
            debug_settings: Arc::new(debug_settings),
        }
    }
}

/// Main application state
pub struct App {
    config: Config,
    should_quit: bool,
    chat: ChatView,
    input: TextInputState,
    suggestions: SuggestionList,
    search: DebouncedSearch,
    sidebar: SidebarState,
    toasts: ToastQueue,
    settings_dialog: SettingsDialog,
    project_dialog: ProjectDialog,
    debug_console: DebugConsole,
    projects: Arc<dyn ProjectService>,
    /// Shown once per session on the first send
    offline_notice_shown: bool,
    /// Areas of the last render, for mouse hit-testing
    sidebar_area: Rect,
    chat_area: Rect,
    event_tx: mpsc::UnboundedSender<AppEvent>,
    event_rx: mpsc::UnboundedReceiver<AppEvent>,
    search_rx: mpsc::UnboundedReceiver<SearchUpdate>,
}

impl App {
    pub fn new(config: Config, services: AppServices) -> Self {
        let (event_tx, event_rx) = mpsc::unbounded_channel();
        let (search_tx, search_rx) = mpsc::unbounded_channel();

        let logger = Arc::new(DebugLogger::new(services.debug_settings.getter()));
        let event_logger: Arc<dyn EventLogger> = logger.clone();

        let search = DebouncedSearch::new(
            services.knowledge,
            search_tx,
            config.search.debounce,
            config.search.max_results,
        );

        Self {
            settings_dialog: SettingsDialog::new(
                config.config_path.clone(),
                event_tx.clone(),
                event_logger,
            ),
            project_dialog: ProjectDialog::new(event_tx.clone()),
            debug_console: DebugConsole::new(logger, services.debug_settings),
            config,
            should_quit: false,
            chat: ChatView::new(),
            input: TextInputState::new(),
            suggestions: SuggestionList::new(),
            search,
            sidebar: SidebarState::new(),
            toasts: ToastQueue::new(),
            projects: services.projects,
            offline_notice_shown: false,
            sidebar_area: Rect::default(),
            chat_area: Rect::default(),
            event_tx,
            event_rx,
            search_rx,
        }
    }

    /// Run the application main loop
    pub async fn run(&mut self) -> anyhow::Result<()> {
        let mut guard = TerminalGuard::enter()?;
        let mut terminal = Terminal::new(CrosstermBackend::new(io::stdout()))?;
        terminal.clear()?;

        self.load_projects();
        let result = self.event_loop(&mut terminal).await;

        guard.restore()?;
        terminal.show_cursor()?;
        result
    }

    async fn event_loop(
        &mut self,
        terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    ) -> anyhow::Result<()> {
        let mut input = EventStream::new();
        let mut ticks = tokio::time::interval(TICK_RATE);

        while !self.should_quit {
            terminal.draw(|f| self.draw(f))?;

            tokio::select! {
                maybe_event = input.next() => match maybe_event {
                    Some(Ok(event)) => self.handle_input(event),
                    Some(Err(e)) => return Err(e.into()),
                    None => break,
                },

                _ = ticks.tick() => self.handle_app_event(AppEvent::Tick),

                Some(event) = self.event_rx.recv() => self.handle_app_event(event),

                Some(update) = self.search_rx.recv() => self.handle_search_update(update),
            }
        }

        Ok(())
    }

    /// Handle every queued app event and search update without waiting.
    /// Returns how many were handled.
    pub fn drain_events(&mut self) -> usize {
        let mut handled = 0;
        loop {
            if let Ok(event) = self.event_rx.try_recv() {
                self.handle_app_event(event);
            } else if let Ok(update) = self.search_rx.try_recv() {
                self.handle_search_update(update);
            } else {
                return handled;
            }
            handled += 1;
        }
    }

    /// Fetch the project list in the background
    pub fn load_projects(&mut self) {
        let service = self.projects.clone();
        let tx = self.event_tx.clone();
        tokio::spawn(async move {
            let result = service.list().await.map_err(|e| e.to_string());
            let _ = tx.send(AppEvent::ProjectsLoaded { result });
        });
    }

    pub fn handle_input(&mut self, event: Event) {
        match event {
            Event::Key(key) => self.handle_key(key),
            Event::Mouse(mouse) => self.handle_mouse(mouse),
            Event::Paste(text) if !self.is_modal_open() => {
                for c in text.chars() {
                    self.input.insert_char(if c == '\n' { ' ' } else { c });
                }
                self.refresh_suggestions();
            }
            _ => {}
        }
    }

    pub fn handle_key(&mut self, key: KeyEvent) {
        if key.kind == KeyEventKind::Release {
            return;
        }

        let combo = KeyCombo::from_key_event(&key);
        if self.config.keybindings.global.get(&combo) == Some(&Action::Quit) {
            self.should_quit = true;
            return;
        }

        // An open modal traps all input
        if self.is_modal_open() {
            let keys = &self.config.keybindings;
            let result = if self.debug_console.is_open() {
                self.debug_console.handle_key(key, keys)
            } else if self.project_dialog.is_open() {
                self.project_dialog.handle_key(key, keys)
            } else {
                self.settings_dialog.handle_key(key, keys)
            };
            self.report_modal_result(result);
            return;
        }

        match self
            .config
            .keybindings
            .get_action(&combo, KeyContext::Chat)
            .cloned()
        {
            Some(action) => self.perform(action),
            None => {
                if self.input.handle_key(key) {
                    self.refresh_suggestions();
                }
            }
        }
    }

    fn perform(&mut self, action: Action) {
        match action {
            Action::Quit => self.should_quit = true,
            Action::OpenSettings => self.settings_dialog.open(&self.config.chat),
            Action::NewProject => self.project_dialog.open_create(),
            Action::ViewProject | Action::EditProject => {
                let Some(project) = self.sidebar.selected_project().cloned() else {
                    self.toasts.warning("No project selected");
                    return;
                };
                if action == Action::EditProject {
                    self.project_dialog.open_edit(project);
                } else {
                    self.project_dialog.open_view(project);
                }
            }
            Action::SelectNextProject => self.sidebar.select_next(),
            Action::SelectPrevProject => self.sidebar.select_prev(),
            Action::ToggleDebugConsole => self.debug_console.open(),

            Action::Submit => self.submit_message(),
            Action::AcceptSuggestion => self.accept_suggestion(),
            Action::NextSuggestion => self.suggestions.select_next(),
            Action::PrevSuggestion => self.suggestions.select_prev(),

            Action::Backspace => self.edit_input(TextInputState::delete_char),
            Action::Delete => self.edit_input(TextInputState::delete_forward),
            Action::DeleteWordBack => self.edit_input(TextInputState::delete_word),
            Action::DeleteToStart => self.edit_input(TextInputState::delete_to_start),
            Action::DeleteToEnd => self.edit_input(TextInputState::delete_to_end),
            Action::MoveCursorLeft => self.input.move_left(),
            Action::MoveCursorRight => self.input.move_right(),
            Action::MoveCursorStart => self.input.move_start(),
            Action::MoveCursorEnd => self.input.move_end(),
            Action::MoveWordLeft => self.input.move_word_left(),
            Action::MoveWordRight => self.input.move_word_right(),

            Action::ScrollUp(n) => self.chat.scroll_up(usize::from(n)),
            Action::ScrollDown(n) => self.chat.scroll_down(usize::from(n)),
            Action::ScrollPageUp => self.chat.scroll_up(usize::from(self.chat_area.height)),
            Action::ScrollPageDown => self.chat.scroll_down(usize::from(self.chat_area.height)),

            // Modal-only actions bound globally do nothing here
            Action::ModalClose
            | Action::ModalSave
            | Action::ModalDelete
            | Action::NextTab
            | Action::PrevTab
            | Action::SwitchToTab(_)
            | Action::ScrollToTop
            | Action::ScrollToBottom => {}
        }
    }

    fn edit_input(&mut self, edit: fn(&mut TextInputState)) {
        edit(&mut self.input);
        self.refresh_suggestions();
    }

    /// Feed the current input to the debounced search
    fn refresh_suggestions(&mut self) {
        let query = self.input.value().to_string();
        let seq = self.search.submit(&query);
        self.suggestions.track(seq, &query);
    }

    fn clear_suggestions(&mut self) {
        let seq = self.search.submit("");
        self.suggestions.track(seq, "");
    }

    fn submit_message(&mut self) {
        let text = self.input.take();
        let text = text.trim();
        if text.is_empty() {
            return;
        }

        tracing::debug!(len = text.len(), model = %self.config.chat.model, "Message submitted");
        self.chat.push(ChatMessage::user(text));
        if !self.offline_notice_shown {
            self.offline_notice_shown = true;
            self.chat.push(ChatMessage::system(format!(
                "Not connected to an aiMate server. Messages stay local ({}).",
                self.config.chat.model
            )));
        }
        self.clear_suggestions();
    }

    fn accept_suggestion(&mut self) {
        let Some(suggestion) = self.suggestions.selected().cloned() else {
            return;
        };
        self.chat.push(ChatMessage::assistant(format!(
            "{}\n{}",
            suggestion.title, suggestion.snippet
        )));
        self.clear_suggestions();
    }

    pub fn handle_mouse(&mut self, mouse: MouseEvent) {
        if self.is_modal_open() {
            let result = if self.debug_console.is_open() {
                self.debug_console.handle_mouse(mouse)
            } else if self.project_dialog.is_open() {
                self.project_dialog.handle_mouse(mouse)
            } else {
                self.settings_dialog.handle_mouse(mouse)
            };
            self.report_modal_result(result);
            return;
        }

        let pos = (mouse.column, mouse.row).into();
        match mouse.kind {
            MouseEventKind::Down(MouseButton::Left) if self.sidebar_area.contains(pos) => {
                if self
                    .sidebar
                    .new_project_button_area
                    .is_some_and(|button| button.contains(pos))
                {
                    self.project_dialog.open_create();
                } else {
                    self.sidebar.select_at(mouse.column, mouse.row);
                }
            }
            MouseEventKind::ScrollUp if self.chat_area.contains(pos) => {
                self.chat.scroll_up(WHEEL_LINES);
            }
            MouseEventKind::ScrollDown if self.chat_area.contains(pos) => {
                self.chat.scroll_down(WHEEL_LINES);
            }
            _ => {}
        }
    }

    /// Handler errors surface as toasts; the dialog stays open
    fn report_modal_result(&mut self, result: anyhow::Result<ModalOutcome>) {
        match result {
            Ok(outcome) => tracing::trace!(?outcome, "Modal input handled"),
            Err(e) => {
                tracing::error!(error = %format!("{:#}", e), "Dialog action failed");
                self.toasts.error(format!("{:#}", e));
            }
        }
    }

    pub fn handle_app_event(&mut self, event: AppEvent) {
        match event {
            AppEvent::Input(event) => self.handle_input(event),
            AppEvent::Tick => {
                self.toasts.prune(Instant::now());
            }
            AppEvent::Quit => self.should_quit = true,
            AppEvent::Toast { kind, message } => self.toasts.push(kind, message),
            AppEvent::SettingsSaved(settings) => {
                tracing::info!(model = %settings.model, "Chat settings updated");
                self.config.chat = settings;
            }
            AppEvent::ProjectsLoaded { result } => match result {
                Ok(projects) => {
                    tracing::debug!(count = projects.len(), "Projects loaded");
                    self.sidebar.set_projects(projects);
                }
                Err(e) => {
                    tracing::warn!(error = %e, "Failed to load projects");
                    self.toasts.error(format!("Failed to load projects: {}", e));
                    self.sidebar.set_error(e);
                }
            },
            AppEvent::SaveProject { session, id, draft } => {
                let service = self.projects.clone();
                let tx = self.event_tx.clone();
                tokio::spawn(async move {
                    let result = match id {
                        Some(id) => service.update(id, draft).await,
                        None => service.create(draft).await,
                    };
                    let _ = tx.send(AppEvent::ProjectSaved {
                        session,
                        created: id.is_none(),
                        result: result.map_err(|e| e.to_string()),
                    });
                });
            }
            AppEvent::ProjectSaved {
                session,
                created,
                result,
            } => {
                let (kind, message) = self
                    .project_dialog
                    .save_finished(session, created, &result);
                if let Ok(project) = result {
                    self.sidebar.upsert(project);
                }
                self.toasts.push(kind, message);
            }
            AppEvent::DeleteProject { session, id, name } => {
                let service = self.projects.clone();
                let tx = self.event_tx.clone();
                tokio::spawn(async move {
                    let result = service.delete(id).await.map_err(|e| e.to_string());
                    let _ = tx.send(AppEvent::ProjectDeleted {
                        session,
                        id,
                        name,
                        result,
                    });
                });
            }
            AppEvent::ProjectDeleted {
                session,
                id,
                name,
                result,
            } => {
                let (kind, message) = self
                    .project_dialog
                    .delete_finished(session, &name, &result);
                if result.is_ok() {
                    self.sidebar.remove(id);
                }
                self.toasts.push(kind, message);
            }
        }
    }

    pub fn handle_search_update(&mut self, update: SearchUpdate) {
        self.suggestions.apply(update);
    }

    pub fn draw(&mut self, frame: &mut Frame) {
        let area = frame.area();
        self.render(area, frame.buffer_mut());
    }

    pub fn render(&mut self, area: Rect, buf: &mut Buffer) {
        let columns = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Length(SIDEBAR_WIDTH), Constraint::Min(20)])
            .split(area);
        self.sidebar_area = columns[0];
        Sidebar::new()
            .focused(!self.is_modal_open())
            .render(columns[0], buf, &mut self.sidebar);

        let suggestions_height = SuggestionsPanel::height(&self.suggestions);
        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Min(1),                     // Chat
                Constraint::Length(suggestions_height), // Suggestions
                Constraint::Length(3),                  // Input
                Constraint::Length(1),                  // Footer
            ])
            .split(columns[1]);

        self.chat_area = rows[0];
        self.chat.render(rows[0], buf);
        SuggestionsPanel::new(&self.suggestions).render(rows[1], buf);

        let focused = !self.is_modal_open();
        let block = Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(if focused {
                BORDER_FOCUSED
            } else {
                BORDER_DEFAULT
            }))
            .title(" Message ");
        let inner = block.inner(rows[2]);
        block.render(rows[2], buf);
        self.input.render_with_placeholder(
            inner,
            buf,
            Style::default(),
            "Type a message…",
            Style::default().fg(TEXT_MUTED),
        );

        GlobalFooter::from_keybindings(&self.config.keybindings).render(rows[3], buf);

        // Dialogs draw over everything; at most one is open
        if self.settings_dialog.is_open() {
            self.settings_dialog.render(area, buf);
        }
        if self.project_dialog.is_open() {
            self.project_dialog.render(area, buf);
        }
        if self.debug_console.is_open() {
            self.debug_console.render(area, buf);
        }

        self.toasts.render(area, buf);
    }

    pub fn is_modal_open(&self) -> bool {
        self.settings_dialog.is_open()
            || self.project_dialog.is_open()
            || self.debug_console.is_open()
    }

    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn input(&self) -> &str {
        self.input.value()
    }

    pub fn chat(&self) -> &ChatView {
        &self.chat
    }

    pub fn sidebar(&self) -> &SidebarState {
        &self.sidebar
    }

    pub fn suggestions(&self) -> &SuggestionList {
        &self.suggestions
    }

    pub fn toasts(&self) -> &ToastQueue {
        &self.toasts
    }

    pub fn settings_dialog(&self) -> &SettingsDialog {
        &self.settings_dialog
    }

    pub fn project_dialog(&self) -> &ProjectDialog {
        &self.project_dialog
    }

    pub fn debug_console(&self) -> &DebugConsole {
        &self.debug_console
    }

    /// Queue a toast from outside the event loop
    pub fn notify(&self, kind: ToastKind, message: impl Into<String>) {
        let _ = self.event_tx.send(AppEvent::Toast {
            kind,
            message: message.into(),
        });
    }
}
