//! One-line `key action` hint rows for dialogs and the app footer

use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Rect},
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Paragraph, Widget},
};

use super::theme::{ACCENT_PRIMARY, FOOTER_BG, KEY_HINT_BG, TEXT_FAINT, TEXT_MUTED, TEXT_SECONDARY};

/// How a hint row is drawn
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HintLook {
    /// Centered `Tab switch │ Esc close`
    Inline,
    /// Keys on their own background, spaced apart on a filled bar
    Boxed { key_bg: Color, bar_bg: Color },
}

impl HintLook {
    pub fn footer() -> Self {
        HintLook::Boxed {
            key_bg: KEY_HINT_BG,
            bar_bg: FOOTER_BG,
        }
    }
}

/// Row of key hints
pub struct KeyHints<'a> {
    hints: &'a [(&'a str, &'a str)],
    look: HintLook,
    alignment: Option<Alignment>,
}

impl<'a> KeyHints<'a> {
    pub fn new(hints: &'a [(&'a str, &'a str)], look: HintLook) -> Self {
        Self {
            hints,
            look,
            alignment: None,
        }
    }

    pub fn alignment(mut self, alignment: Alignment) -> Self {
        self.alignment = Some(alignment);
        self
    }

    pub fn line(&self) -> Line<'a> {
        let mut spans = Vec::with_capacity(self.hints.len() * 3 + 1);
        match self.look {
            HintLook::Inline => {
                let key = Style::default().fg(ACCENT_PRIMARY);
                let action = Style::default().fg(TEXT_SECONDARY);
                for (i, (k, a)) in self.hints.iter().enumerate() {
                    if i > 0 {
                        spans.push(Span::styled(" │ ", Style::default().fg(TEXT_FAINT)));
                    }
                    spans.push(Span::styled(*k, key));
                    spans.push(Span::styled(format!(" {a}"), action));
                }
            }
            HintLook::Boxed { key_bg, .. } => {
                let key = Style::default().fg(TEXT_SECONDARY).bg(key_bg);
                let action = Style::default().fg(TEXT_MUTED);
                spans.push(Span::raw(" "));
                for (i, (k, a)) in self.hints.iter().enumerate() {
                    if i > 0 {
                        spans.push(Span::raw("   "));
                    }
                    spans.push(Span::styled(format!(" {k} "), key));
                    spans.push(Span::styled(format!(" {a}"), action));
                }
            }
        }
        Line::from(spans)
    }
}

impl Widget for KeyHints<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let (default_alignment, bg) = match self.look {
            HintLook::Inline => (Alignment::Center, None),
            HintLook::Boxed { bar_bg, .. } => (Alignment::Left, Some(bar_bg)),
        };
        let mut paragraph =
            Paragraph::new(self.line()).alignment(self.alignment.unwrap_or(default_alignment));
        if let Some(bg) = bg {
            paragraph = paragraph.style(Style::default().bg(bg));
        }
        paragraph.render(area, buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_separator_between_items_only() {
        let hints = [("Tab", "switch"), ("Esc", "close")];
        let line = KeyHints::new(&hints, HintLook::Inline).line();
        assert_eq!(line.to_string(), "Tab switch │ Esc close");
    }

    #[test]
    fn test_boxed_keys_are_padded() {
        let hints = [("C-q", "quit")];
        let line = KeyHints::new(&hints, HintLook::footer()).line();
        assert_eq!(line.to_string(), "  C-q  quit");
    }
}
