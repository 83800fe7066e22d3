//! Single-line editable text with a cursor

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Paragraph, Widget},
};
use unicode_width::UnicodeWidthStr;

/// Where a cursor movement or deletion reaches to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Motion {
    CharBack,
    CharForward,
    WordBack,
    WordForward,
    Start,
    End,
}

/// Editable line. The cursor is a byte offset that always sits on a char boundary.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TextInputState {
    text: String,
    cursor: usize,
}

impl TextInputState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_value(value: &str) -> Self {
        let mut state = Self::new();
        state.set(value);
        state
    }

    /// Replace the text; the cursor goes to the end
    pub fn set(&mut self, value: &str) {
        value.clone_into(&mut self.text);
        self.cursor = self.text.len();
    }

    pub fn clear(&mut self) {
        self.set("");
    }

    pub fn value(&self) -> &str {
        &self.text
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// Hand back the text and start over empty
    pub fn take(&mut self) -> String {
        self.cursor = 0;
        std::mem::take(&mut self.text)
    }

    fn target(&self, motion: Motion) -> usize {
        let (head, tail) = self.text.split_at(self.cursor);
        match motion {
            Motion::Start => 0,
            Motion::End => self.text.len(),
            Motion::CharBack => head.char_indices().next_back().map_or(0, |(i, _)| i),
            Motion::CharForward => self.cursor + tail.chars().next().map_or(0, char::len_utf8),
            Motion::WordBack => {
                let trimmed = head.trim_end_matches(' ');
                trimmed.rfind(' ').map_or(0, |i| i + 1)
            }
            Motion::WordForward => {
                let word = tail.find(' ').unwrap_or(tail.len());
                let gap = tail[word..].len() - tail[word..].trim_start_matches(' ').len();
                self.cursor + word + gap
            }
        }
    }

    fn go(&mut self, motion: Motion) {
        self.cursor = self.target(motion);
    }

    /// Remove the text between the cursor and where `motion` lands
    fn cut(&mut self, motion: Motion) {
        let to = self.target(motion);
        let (from, to) = (self.cursor.min(to), self.cursor.max(to));
        self.text.replace_range(from..to, "");
        self.cursor = from;
    }

    pub fn insert_char(&mut self, c: char) {
        self.text.insert(self.cursor, c);
        self.cursor += c.len_utf8();
    }

    /// Backspace
    pub fn delete_char(&mut self) {
        self.cut(Motion::CharBack);
    }

    pub fn delete_forward(&mut self) {
        self.cut(Motion::CharForward);
    }

    pub fn delete_word(&mut self) {
        self.cut(Motion::WordBack);
    }

    pub fn delete_to_start(&mut self) {
        self.cut(Motion::Start);
    }

    pub fn delete_to_end(&mut self) {
        self.cut(Motion::End);
    }

    pub fn move_left(&mut self) {
        self.go(Motion::CharBack);
    }

    pub fn move_right(&mut self) {
        self.go(Motion::CharForward);
    }

    pub fn move_word_left(&mut self) {
        self.go(Motion::WordBack);
    }

    pub fn move_word_right(&mut self) {
        self.go(Motion::WordForward);
    }

    pub fn move_start(&mut self) {
        self.go(Motion::Start);
    }

    pub fn move_end(&mut self) {
        self.go(Motion::End);
    }

    /// Editing keys for inputs inside dialogs. False when the key is not an edit.
    pub fn handle_key(&mut self, key: KeyEvent) -> bool {
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        let alt = key.modifiers.contains(KeyModifiers::ALT);
        match (key.code, ctrl, alt) {
            (KeyCode::Char(c), false, false) => self.insert_char(c),
            (KeyCode::Char('u'), true, _) => self.delete_to_start(),
            (KeyCode::Char('k'), true, _) => self.delete_to_end(),
            (KeyCode::Char('w'), true, _) => self.delete_word(),
            (KeyCode::Backspace, ..) => self.delete_char(),
            (KeyCode::Delete, ..) => self.delete_forward(),
            (KeyCode::Left, ..) => self.move_left(),
            (KeyCode::Right, ..) => self.move_right(),
            (KeyCode::Home, ..) => self.move_start(),
            (KeyCode::End, ..) => self.move_end(),
            _ => return false,
        }
        true
    }

    /// Display column of the cursor
    pub fn cursor_column(&self) -> usize {
        self.text[..self.cursor].width()
    }

    /// The text as a line, with the cell under the cursor reversed when shown
    pub fn line(&self, style: Style, show_cursor: bool) -> Line<'static> {
        if !show_cursor {
            return Line::styled(self.text.clone(), style);
        }
        let next = self.target(Motion::CharForward);
        let under = match &self.text[self.cursor..next] {
            "" => " ",
            s => s,
        };
        Line::from(vec![
            Span::styled(self.text[..self.cursor].to_string(), style),
            Span::styled(under.to_string(), style.add_modifier(Modifier::REVERSED)),
            Span::styled(self.text[next..].to_string(), style),
        ])
    }

    /// Draw the text, or `placeholder` when empty, scrolled so the cursor stays visible
    pub fn render_with_placeholder(
        &self,
        area: Rect,
        buf: &mut Buffer,
        style: Style,
        placeholder: &str,
        placeholder_style: Style,
    ) {
        if area.width == 0 {
            return;
        }
        let last_col = usize::from(area.width - 1);
        let body = if self.text.is_empty() {
            Paragraph::new(placeholder).style(placeholder_style)
        } else {
            let shift = self.cursor_column().saturating_sub(last_col);
            Paragraph::new(self.text.as_str())
                .style(style)
                .scroll((0, u16::try_from(shift).unwrap_or(u16::MAX)))
        };
        body.render(area, buf);

        let col = u16::try_from(self.cursor_column().min(last_col)).unwrap_or(0);
        if let Some(cell) = buf.cell_mut((area.x + col, area.y)) {
            cell.set_style(Style::default().add_modifier(Modifier::REVERSED));
        }
    }
}

impl std::fmt::Display for TextInputState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.text)
    }
}
