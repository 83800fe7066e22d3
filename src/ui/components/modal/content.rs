//! Content projection: the scrollable body between header and footer

use crossterm::event::KeyEvent;
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    text::Line,
    widgets::{Paragraph, Widget},
};

use crate::ui::components::scrollbar::{BarGlyphs, ScrollWindow};

/// Whether content consumed a key
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentKeyResult {
    Consumed,
    Ignored,
}

/// Body of a modal tab (or of an untabbed modal).
///
/// An instance lives exactly as long as it is mounted: the shell creates it
/// when its tab becomes active or the modal opens, and drops it on tab
/// switch or close. Anything that must outlive that belongs to the owner.
pub trait ModalContent {
    /// Lines to draw, already wrapped to `width`
    fn lines(&self, width: u16) -> Vec<Line<'_>>;

    /// Handle a key before the modal's own bindings see it
    fn handle_key(&mut self, _key: KeyEvent) -> ContentKeyResult {
        ContentKeyResult::Ignored
    }

    /// Line that must stay visible (e.g. the focused field)
    fn focus_line(&self) -> Option<usize> {
        None
    }
}

/// Fixed text content
pub struct StaticContent {
    lines: Vec<Line<'static>>,
}

impl StaticContent {
    pub fn new<I, L>(lines: I) -> Self
    where
        I: IntoIterator<Item = L>,
        L: Into<Line<'static>>,
    {
        Self {
            lines: lines.into_iter().map(Into::into).collect(),
        }
    }

    pub fn boxed<I, L>(lines: I) -> Box<dyn ModalContent>
    where
        I: IntoIterator<Item = L>,
        L: Into<Line<'static>>,
    {
        Box::new(Self::new(lines))
    }
}

impl ModalContent for StaticContent {
    fn lines(&self, _width: u16) -> Vec<Line<'_>> {
        self.lines.clone()
    }
}

/// What a mounted panel was mounted for
#[derive(Debug, Clone, PartialEq, Eq)]
pub(super) enum MountKey {
    Tab(String),
    Children,
    /// Neither tabs nor children configured
    Empty,
}

/// A mounted content instance plus its scroll position
pub(super) struct MountedPanel {
    pub key: MountKey,
    pub content: Option<Box<dyn ModalContent>>,
    pub scroll: usize,
    /// Line count and viewport height seen by the last render
    pub total_lines: usize,
    pub viewport: usize,
}

impl MountedPanel {
    pub fn new(key: MountKey, content: Option<Box<dyn ModalContent>>) -> Self {
        Self {
            key,
            content,
            scroll: 0,
            total_lines: 0,
            viewport: 0,
        }
    }

    fn max_scroll(&self) -> usize {
        self.total_lines.saturating_sub(self.viewport)
    }

    pub fn scroll_up(&mut self, lines: usize) {
        self.scroll = self.scroll.saturating_sub(lines);
    }

    pub fn scroll_down(&mut self, lines: usize) {
        self.scroll = (self.scroll + lines).min(self.max_scroll());
    }

    pub fn page_up(&mut self) {
        self.scroll_up(self.viewport.max(1));
    }

    pub fn page_down(&mut self) {
        self.scroll_down(self.viewport.max(1));
    }

    pub fn scroll_to_top(&mut self) {
        self.scroll = 0;
    }

    pub fn scroll_to_bottom(&mut self) {
        self.scroll = self.max_scroll();
    }

    /// Render into `area`, keeping the focused line visible
    pub fn render(&mut self, area: Rect, buf: &mut Buffer) {
        let Some(content) = &self.content else {
            self.total_lines = 0;
            self.viewport = area.height as usize;
            self.scroll = 0;
            return;
        };

        // Leave the last column for the scrollbar
        let text_width = area.width.saturating_sub(1);
        let lines = content.lines(text_width);
        self.total_lines = lines.len();
        self.viewport = area.height as usize;

        if let Some(focus) = content.focus_line() {
            if focus < self.scroll {
                self.scroll = focus;
            } else if self.viewport > 0 && focus >= self.scroll + self.viewport {
                self.scroll = focus + 1 - self.viewport;
            }
        }
        self.scroll = self.scroll.min(self.max_scroll());

        let text_area = Rect {
            width: text_width,
            ..area
        };
        let scroll = u16::try_from(self.scroll).unwrap_or(u16::MAX);
        Paragraph::new(lines)
            .scroll((scroll, 0))
            .render(text_area, buf);

        ScrollWindow::new(self.total_lines, self.viewport, self.scroll).render(
            area,
            buf,
            BarGlyphs::Thin,
        );
    }
}
