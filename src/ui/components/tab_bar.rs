use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Modifier, Style},
    text::Span,
    widgets::{Paragraph, Widget},
};
use unicode_width::UnicodeWidthStr;

use super::theme::{ACCENT_PRIMARY, TAB_BAR_BG, TEXT_BRIGHT, TEXT_FAINT, TEXT_MUTED};
use crate::util::truncate_to_width;

/// One tab as the bar sees it
#[derive(Debug, Clone)]
pub struct TabBarItem<'a> {
    pub id: &'a str,
    pub label: &'a str,
    pub icon: Option<&'a str>,
}

/// Horizontal tab strip for tabbed modals
pub struct TabBar<'a> {
    tabs: Vec<TabBarItem<'a>>,
    active: Option<&'a str>,
    max_label_width: usize,
}

impl<'a> TabBar<'a> {
    pub fn new(tabs: Vec<TabBarItem<'a>>, active: Option<&'a str>) -> Self {
        Self {
            tabs,
            active,
            max_label_width: 18,
        }
    }

    pub fn max_label_width(mut self, width: usize) -> Self {
        self.max_label_width = width.max(1);
        self
    }

    /// Render the strip and return each tab's id with its clickable rect
    pub fn render(&self, area: Rect, buf: &mut Buffer) -> Vec<(String, Rect)> {
        Paragraph::new("")
            .style(Style::default().bg(TAB_BAR_BG))
            .render(area, buf);

        if area.height == 0 {
            return Vec::new();
        }

        let right = area.x + area.width;
        let mut x = area.x + 1;
        let mut hits = Vec::with_capacity(self.tabs.len());

        for (i, tab) in self.tabs.iter().enumerate() {
            let is_active = self.active == Some(tab.id);

            let label = truncate_to_width(tab.label, self.max_label_width);
            let text = match tab.icon {
                Some(icon) => format!(" {} {} ", icon, label),
                None => format!(" {} ", label),
            };

            let width = (text.width() as u16).min(right.saturating_sub(x));
            if width == 0 {
                break;
            }

            let style = if is_active {
                Style::default()
                    .fg(TEXT_BRIGHT)
                    .add_modifier(Modifier::BOLD | Modifier::UNDERLINED)
            } else {
                Style::default().fg(TEXT_MUTED)
            };

            let rect = Rect::new(x, area.y, width, 1);
            Span::styled(text, style).render(rect, buf);
            hits.push((tab.id.to_string(), rect));
            x = x.saturating_add(width);

            if i + 1 < self.tabs.len() && x < right {
                let separator_style = if is_active {
                    Style::default().fg(ACCENT_PRIMARY)
                } else {
                    Style::default().fg(TEXT_FAINT)
                };
                Span::styled("│", separator_style).render(Rect::new(x, area.y, 1, 1), buf);
                x = x.saturating_add(1);
            }
        }

        hits
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(buf: &Buffer, area: Rect) -> String {
        (area.x..area.x + area.width)
            .filter_map(|x| buf.cell((x, area.y)))
            .map(|c| c.symbol().to_string())
            .collect()
    }

    #[test]
    fn test_tabs_render_in_order_with_hit_rects() {
        let tabs = vec![
            TabBarItem { id: "general", label: "General", icon: Some("⚙") },
            TabBarItem { id: "tools", label: "Tools", icon: None },
        ];
        let area = Rect::new(0, 0, 40, 1);
        let mut buf = Buffer::empty(area);
        let hits = TabBar::new(tabs, Some("tools")).render(area, &mut buf);

        assert_eq!(hits.len(), 2);
        assert_eq!(hits[0].0, "general");
        assert_eq!(hits[1].0, "tools");
        assert!(hits[0].1.x < hits[1].1.x);

        let text = row(&buf, area);
        let general = text.find("General").unwrap();
        let tools = text.find("Tools").unwrap();
        assert!(general < tools);
    }

    #[test]
    fn test_long_labels_are_truncated() {
        let tabs = vec![TabBarItem {
            id: "long",
            label: "A very long tab label indeed",
            icon: None,
        }];
        let area = Rect::new(0, 0, 40, 1);
        let mut buf = Buffer::empty(area);
        let hits = TabBar::new(tabs, None)
            .max_label_width(8)
            .render(area, &mut buf);

        assert_eq!(hits[0].1.width, 10);
        assert!(row(&buf, area).contains('…'));
    }
}
