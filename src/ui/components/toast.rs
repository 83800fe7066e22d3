//! Transient notifications drawn in the bottom-right corner

use std::collections::VecDeque;
use std::time::Duration;

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Clear, Paragraph, Widget, Wrap},
};
use tokio::time::Instant;
use unicode_width::UnicodeWidthStr;

use super::theme::{ACCENT_ERROR, ACCENT_PRIMARY, ACCENT_SUCCESS, ACCENT_WARNING, DIALOG_BG, TEXT_BRIGHT};

/// How long a toast stays on screen
pub const TOAST_LIFETIME: Duration = Duration::from_secs(4);

const MAX_VISIBLE: usize = 3;
const TOAST_WIDTH: u16 = 44;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastKind {
    Info,
    Success,
    Warning,
    Error,
}

impl ToastKind {
    fn icon(&self) -> &'static str {
        match self {
            ToastKind::Info => "ℹ",
            ToastKind::Success => "✓",
            ToastKind::Warning => "!",
            ToastKind::Error => "✗",
        }
    }

    fn color(&self) -> Color {
        match self {
            ToastKind::Info => ACCENT_PRIMARY,
            ToastKind::Success => ACCENT_SUCCESS,
            ToastKind::Warning => ACCENT_WARNING,
            ToastKind::Error => ACCENT_ERROR,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Toast {
    pub kind: ToastKind,
    pub message: String,
    pub created_at: Instant,
}

impl Toast {
    pub fn new(kind: ToastKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            created_at: Instant::now(),
        }
    }

    pub fn is_expired(&self, now: Instant) -> bool {
        now.saturating_duration_since(self.created_at) >= TOAST_LIFETIME
    }
}

/// Queue of live toasts, newest last
#[derive(Debug, Default)]
pub struct ToastQueue {
    toasts: VecDeque<Toast>,
}

impl ToastQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, kind: ToastKind, message: impl Into<String>) {
        let toast = Toast::new(kind, message);
        tracing::debug!(kind = ?toast.kind, message = %toast.message, "Toast");
        self.toasts.push_back(toast);
    }

    pub fn info(&mut self, message: impl Into<String>) {
        self.push(ToastKind::Info, message);
    }

    pub fn success(&mut self, message: impl Into<String>) {
        self.push(ToastKind::Success, message);
    }

    pub fn warning(&mut self, message: impl Into<String>) {
        self.push(ToastKind::Warning, message);
    }

    pub fn error(&mut self, message: impl Into<String>) {
        self.push(ToastKind::Error, message);
    }

    /// Drop expired toasts. Returns true if any were removed.
    pub fn prune(&mut self, now: Instant) -> bool {
        let before = self.toasts.len();
        self.toasts.retain(|t| !t.is_expired(now));
        self.toasts.len() != before
    }

    pub fn iter(&self) -> impl Iterator<Item = &Toast> {
        self.toasts.iter()
    }

    pub fn len(&self) -> usize {
        self.toasts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.toasts.is_empty()
    }

    /// Draw the newest toasts stacked upward from the bottom-right corner
    pub fn render(&self, area: Rect, buf: &mut Buffer) {
        let width = TOAST_WIDTH.min(area.width);
        if width < 8 {
            return;
        }
        let text_width = usize::from(width.saturating_sub(4));
        let mut bottom = area.y + area.height;

        for toast in self.toasts.iter().rev().take(MAX_VISIBLE) {
            let text_lines = (toast.message.width() + 2).div_ceil(text_width.max(1)).max(1);
            let height = u16::try_from(text_lines).unwrap_or(u16::MAX).saturating_add(2).min(5);
            if bottom < area.y + height {
                break;
            }
            bottom -= height;

            let rect = Rect::new(area.x + area.width - width, bottom, width, height);
            Clear.render(rect, buf);

            let color = toast.kind.color();
            let block = Block::default()
                .borders(Borders::ALL)
                .border_type(BorderType::Rounded)
                .border_style(Style::default().fg(color))
                .style(Style::default().bg(DIALOG_BG));
            let line = Line::from(vec![
                Span::styled(format!("{} ", toast.kind.icon()), Style::default().fg(color)),
                Span::styled(toast.message.as_str(), Style::default().fg(TEXT_BRIGHT)),
            ]);
            Paragraph::new(line)
                .wrap(Wrap { trim: true })
                .block(block)
                .render(rect, buf);
        }
    }
}
