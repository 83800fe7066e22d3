//! Centered dialog panel drawn over a dimmed screen

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Modifier, Style, Stylize},
    text::Line,
    widgets::{Block, BorderType, Clear, Widget},
};

use super::modal::ModalSize;
use super::theme::{ACCENT_ERROR, ACCENT_PRIMARY, DIALOG_BG, TEXT_FAINT};

/// Bordered, titled panel of a fixed size
#[derive(Debug, Clone, Copy)]
pub struct DialogFrame<'a> {
    title: &'a str,
    size: (u16, u16),
}

impl<'a> DialogFrame<'a> {
    pub fn sized(title: &'a str, size: ModalSize) -> Self {
        Self {
            title,
            size: size.dimensions(),
        }
    }

    /// Centered in `screen`, leaving at least a two column and one row margin
    pub fn area(&self, screen: Rect) -> Rect {
        let (width, height) = self.size;
        let width = width.min(screen.width.saturating_sub(4));
        let height = height.min(screen.height.saturating_sub(2));
        Rect::new(
            screen.x + (screen.width - width) / 2,
            screen.y + (screen.height - height) / 2,
            width,
            height,
        )
    }

    /// Clear the panel, draw its border, and return the space inside
    pub fn render(&self, screen: Rect, buf: &mut Buffer) -> Rect {
        let outer = self.area(screen);
        Clear.render(outer, buf);
        let block = Block::bordered()
            .border_type(BorderType::Rounded)
            .border_style(Style::new().fg(ACCENT_PRIMARY))
            .title(Line::from(format!(" {} ", self.title)).bold())
            .style(Style::new().bg(DIALOG_BG));
        let inner = block.inner(outer);
        block.render(outer, buf);
        inner
    }
}

/// Fade whatever is already drawn under an open dialog
pub fn dim_backdrop(area: Rect, buf: &mut Buffer) {
    buf.set_style(area, Style::new().fg(TEXT_FAINT).add_modifier(Modifier::DIM));
}

/// Indented validation message shown under a form
pub fn error_line(message: &str) -> Line<'static> {
    Line::styled(format!("  {message}"), Style::new().fg(ACCENT_ERROR))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_frame_is_centered_and_capped() {
        let screen = Rect::new(0, 0, 120, 40);
        let frame = DialogFrame::sized("Settings", ModalSize::Medium);
        assert_eq!(frame.area(screen), Rect::new(30, 10, 60, 20));

        let small_screen = Rect::new(0, 0, 50, 15);
        let capped = DialogFrame::sized("Settings", ModalSize::ExtraLarge).area(small_screen);
        assert_eq!(capped.width, 46);
        assert_eq!(capped.height, 13);
    }

    #[test]
    fn test_frame_returns_inner_area() {
        let screen = Rect::new(0, 0, 80, 24);
        let mut buf = Buffer::empty(screen);
        let frame = DialogFrame::sized("Title", ModalSize::Small);
        let inner = frame.render(screen, &mut buf);
        let outer = frame.area(screen);

        assert_eq!(inner.x, outer.x + 1);
        assert_eq!(inner.width, outer.width - 2);
        assert_eq!(inner.height, outer.height - 2);
    }

    #[test]
    fn test_error_line_is_indented() {
        assert_eq!(error_line("Name is required").to_string(), "  Name is required");
    }
}
