//! Knowledge suggestions drawn under the chat input

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Paragraph, Widget},
};
use unicode_width::UnicodeWidthStr;

use super::theme::{ACCENT_PRIMARY, ACCENT_WARNING, SELECTED_BG, TEXT_MUTED, TEXT_PRIMARY};
use crate::search::{SuggestionList, SuggestionSource};
use crate::util::truncate_to_width;

pub struct SuggestionsPanel<'a> {
    list: &'a SuggestionList,
}

impl<'a> SuggestionsPanel<'a> {
    pub fn new(list: &'a SuggestionList) -> Self {
        Self { list }
    }

    /// Rows needed: one per suggestion plus a header, or none when empty
    pub fn height(list: &SuggestionList) -> u16 {
        if list.is_empty() {
            0
        } else {
            list.items().len() as u16 + 1
        }
    }
}

impl Widget for SuggestionsPanel<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if self.list.is_empty() || area.height == 0 || area.width < 8 {
            return;
        }

        let mut header = vec![Span::styled(
            format!(" Knowledge for \"{}\"", self.list.query()),
            Style::default().fg(TEXT_MUTED),
        )];
        if self.list.source() == Some(SuggestionSource::Fallback) {
            header.push(Span::styled(" (offline)", Style::default().fg(ACCENT_WARNING)));
        }
        Paragraph::new(Line::from(header)).render(Rect { height: 1, ..area }, buf);

        let width = usize::from(area.width);
        let rows = area.height.saturating_sub(1);
        for (i, suggestion) in self.list.items().iter().take(rows as usize).enumerate() {
            let row = Rect::new(area.x, area.y + 1 + i as u16, area.width, 1);
            let selected = i == self.list.selected_index();

            let marker = if selected { " ▸ " } else { "   " };
            let title = truncate_to_width(&suggestion.title, width.saturating_sub(3) / 2);
            let rest = width.saturating_sub(3 + title.width() + 2);
            let mut spans = vec![
                Span::styled(marker, Style::default().fg(ACCENT_PRIMARY)),
                Span::styled(
                    title,
                    Style::default().fg(TEXT_PRIMARY).add_modifier(Modifier::BOLD),
                ),
            ];
            if rest > 3 {
                spans.push(Span::styled(
                    format!("  {}", truncate_to_width(&suggestion.snippet, rest)),
                    Style::default().fg(TEXT_MUTED),
                ));
            }

            let style = if selected {
                Style::default().bg(SELECTED_BG)
            } else {
                Style::default()
            };
            Paragraph::new(Line::from(spans)).style(style).render(row, buf);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::search::{SearchUpdate, Suggestion};

    fn list_with(titles: &[&str], source: SuggestionSource) -> SuggestionList {
        let mut list = SuggestionList::new();
        list.track(1, "rust");
        list.apply(SearchUpdate {
            seq: 1,
            query: "rust".to_string(),
            suggestions: titles
                .iter()
                .map(|t| Suggestion {
                    id: t.to_string(),
                    title: t.to_string(),
                    snippet: "snippet".to_string(),
                    score: 1.0,
                })
                .collect(),
            source,
        });
        list
    }

    #[test]
    fn test_height_tracks_items() {
        assert_eq!(SuggestionsPanel::height(&SuggestionList::new()), 0);
        let list = list_with(&["Ownership", "Lifetimes"], SuggestionSource::Index);
        assert_eq!(SuggestionsPanel::height(&list), 3);
    }

    #[test]
    fn test_marks_fallback_source() {
        let list = list_with(&["Ownership"], SuggestionSource::Fallback);
        let area = Rect::new(0, 0, 60, 2);
        let mut buf = Buffer::empty(area);
        SuggestionsPanel::new(&list).render(area, &mut buf);

        let text: String = buf.content().iter().map(|c| c.symbol()).collect();
        assert!(text.contains("(offline)"));
        assert!(text.contains("Ownership"));
    }
}
