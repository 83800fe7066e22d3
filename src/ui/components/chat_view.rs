use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Paragraph, Widget},
};

use super::scrollbar::{BarGlyphs, ScrollWindow};
use super::theme::{ACCENT_ERROR, ACCENT_PRIMARY, ACCENT_SUCCESS, TEXT_FAINT, TEXT_MUTED};
use super::{ChatMessage, MessageRole};
use crate::util::wrap_to_width;

/// Chat view component displaying message history
#[derive(Debug, Default)]
pub struct ChatView {
    /// All messages in the chat
    messages: Vec<ChatMessage>,
    /// Scroll offset (0 = bottom, increases upward)
    scroll_offset: usize,
    /// Wrapped line count and viewport height of the last render
    total_lines: usize,
    viewport: usize,
}

impl ChatView {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, message: ChatMessage) {
        self.messages.push(message);
        // New content snaps back to the bottom
        self.scroll_offset = 0;
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn scroll_offset(&self) -> usize {
        self.scroll_offset
    }

    pub fn scroll_up(&mut self, lines: usize) {
        let max = self.total_lines.saturating_sub(self.viewport);
        self.scroll_offset = (self.scroll_offset + lines).min(max);
    }

    pub fn scroll_down(&mut self, lines: usize) {
        self.scroll_offset = self.scroll_offset.saturating_sub(lines);
    }

    fn role_style(role: MessageRole) -> Style {
        match role {
            MessageRole::User => Style::default()
                .fg(ACCENT_PRIMARY)
                .add_modifier(Modifier::BOLD),
            MessageRole::Assistant => Style::default()
                .fg(ACCENT_SUCCESS)
                .add_modifier(Modifier::BOLD),
            MessageRole::System => Style::default().fg(TEXT_MUTED),
            MessageRole::Error => Style::default().fg(ACCENT_ERROR),
        }
    }

    /// Wrapped lines for every message, oldest first
    fn build_lines(&self, width: u16) -> Vec<Line<'static>> {
        let mut lines = Vec::new();
        for message in &self.messages {
            lines.push(Line::from(vec![
                Span::styled(message.role.label(), Self::role_style(message.role)),
                Span::styled(
                    message.at.format("  %H:%M").to_string(),
                    Style::default().fg(TEXT_FAINT),
                ),
            ]));

            let body_style = match message.role {
                MessageRole::User | MessageRole::Assistant => Style::default().fg(Color::Reset),
                role => Self::role_style(role),
            };
            for paragraph in message.content.lines() {
                for wrapped in wrap_to_width(paragraph, usize::from(width)) {
                    lines.push(Line::from(Span::styled(wrapped, body_style)));
                }
            }
            lines.push(Line::default());
        }
        lines
    }

    pub fn render(&mut self, area: Rect, buf: &mut Buffer) {
        // 2 left margin + 1 scrollbar + 1 gap
        let content = Rect {
            x: area.x.saturating_add(2),
            width: area.width.saturating_sub(4),
            ..area
        };
        if content.width < 3 || content.height < 1 {
            return;
        }

        if self.messages.is_empty() {
            Paragraph::new(Line::from(Span::styled(
                "Ask aiMate anything. Suggestions from the knowledge base appear as you type.",
                Style::default().fg(TEXT_MUTED),
            )))
            .render(content, buf);
            return;
        }

        let lines = self.build_lines(content.width);
        self.total_lines = lines.len();
        self.viewport = usize::from(content.height);

        let max_scroll = self.total_lines.saturating_sub(self.viewport);
        self.scroll_offset = self.scroll_offset.min(max_scroll);
        let top = max_scroll - self.scroll_offset;

        Paragraph::new(lines)
            .scroll((u16::try_from(top).unwrap_or(u16::MAX), 0))
            .render(content, buf);

        ScrollWindow::new(self.total_lines, self.viewport, top).render(
            area,
            buf,
            BarGlyphs::Solid,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn buffer_text(buf: &Buffer) -> String {
        buf.content().iter().map(|c| c.symbol()).collect()
    }

    #[test]
    fn test_renders_latest_messages_at_bottom() {
        let mut view = ChatView::new();
        for i in 0..20 {
            view.push(ChatMessage::user(format!("message {i}")));
        }

        let area = Rect::new(0, 0, 40, 6);
        let mut buf = Buffer::empty(area);
        view.render(area, &mut buf);

        let text = buffer_text(&buf);
        assert!(text.contains("message 19"));
        assert!(!text.contains("message 0 "));
    }

    #[test]
    fn test_scroll_is_clamped_and_reset_by_push() {
        let mut view = ChatView::new();
        for i in 0..10 {
            view.push(ChatMessage::assistant(format!("reply {i}")));
        }
        let area = Rect::new(0, 0, 40, 6);
        let mut buf = Buffer::empty(area);
        view.render(area, &mut buf);

        view.scroll_up(1_000);
        // 10 messages x 3 lines, 6 visible
        assert_eq!(view.scroll_offset(), 24);

        view.push(ChatMessage::system("new"));
        assert_eq!(view.scroll_offset(), 0);
    }
}
