//! Scroll position over a block of lines and the bar that shows it

use ratatui::prelude::StatefulWidget;
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Style},
    widgets::{Scrollbar, ScrollbarOrientation, ScrollbarState},
};

/// Glyph set for the bar
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BarGlyphs {
    /// Triangles and a solid thumb
    #[default]
    Solid,
    /// Arrows and a thin thumb
    Thin,
}

/// `total` lines seen through a `visible`-line window starting at `offset`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScrollWindow {
    pub total: usize,
    pub visible: usize,
    pub offset: usize,
}

impl ScrollWindow {
    /// Offset is clamped so the window never runs past the last line
    pub fn new(total: usize, visible: usize, offset: usize) -> Self {
        let max = total.saturating_sub(visible);
        Self {
            total,
            visible,
            offset: offset.min(max),
        }
    }

    pub fn max_offset(&self) -> usize {
        self.total.saturating_sub(self.visible)
    }

    pub fn overflows(&self) -> bool {
        self.total > self.visible
    }

    /// Draw on the right edge of `area`; nothing when everything fits
    pub fn render(&self, area: Rect, buf: &mut Buffer, glyphs: BarGlyphs) {
        if !self.overflows() || area.height == 0 {
            return;
        }
        let (up, down, thumb) = match glyphs {
            BarGlyphs::Solid => ("▲", "▼", "█"),
            BarGlyphs::Thin => ("↑", "↓", "┃"),
        };
        let bar = Scrollbar::new(ScrollbarOrientation::VerticalRight)
            .begin_symbol(Some(up))
            .end_symbol(Some(down))
            .track_symbol(Some("│"))
            .thumb_symbol(thumb)
            .track_style(Style::default().fg(Color::DarkGray))
            .thumb_style(Style::default().fg(Color::Gray));
        let mut state = ScrollbarState::new(self.max_offset())
            .viewport_content_length(self.visible)
            .position(self.offset);
        bar.render(area, buf, &mut state);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn last_column(buf: &Buffer, area: Rect) -> String {
        let x = area.right() - 1;
        (area.top()..area.bottom())
            .filter_map(|y| buf.cell((x, y)))
            .map(|c| c.symbol().to_string())
            .collect()
    }

    #[test]
    fn test_offset_is_clamped() {
        let window = ScrollWindow::new(12, 5, 40);
        assert_eq!(window.offset, 7);
        assert_eq!(ScrollWindow::new(3, 5, 2).offset, 0);
    }

    #[test]
    fn test_no_bar_when_content_fits() {
        let area = Rect::new(0, 0, 10, 5);
        let mut buf = Buffer::empty(area);
        ScrollWindow::new(5, 5, 0).render(area, &mut buf, BarGlyphs::Thin);
        assert_eq!(last_column(&buf, area).trim(), "");
    }

    #[test]
    fn test_bar_drawn_on_overflow() {
        let area = Rect::new(0, 0, 10, 5);
        let mut buf = Buffer::empty(area);
        ScrollWindow::new(20, 5, 0).render(area, &mut buf, BarGlyphs::Thin);
        let column = last_column(&buf, area);
        assert!(column.starts_with('↑'));
        assert!(column.ends_with('↓'));
    }
}
