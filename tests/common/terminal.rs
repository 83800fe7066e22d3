//! Off-screen rendering for assertions on what the user would see

use aimate::App;
use ratatui::{backend::TestBackend, buffer::Buffer, Terminal};

/// One frame of `app` at the given size
pub fn render_app(app: &mut App, width: u16, height: u16) -> Buffer {
    let mut terminal = Terminal::new(TestBackend::new(width, height)).unwrap();
    terminal.draw(|frame| app.draw(frame)).unwrap();
    terminal.backend().buffer().clone()
}

/// Screen text, rows joined by newlines
pub fn buffer_to_string(buffer: &Buffer) -> String {
    let area = buffer.area;
    (area.top()..area.bottom())
        .map(|y| {
            (area.left()..area.right())
                .filter_map(|x| buffer.cell((x, y)))
                .map(|cell| cell.symbol())
                .collect::<String>()
        })
        .fold(String::new(), |mut screen, row| {
            screen.push_str(&row);
            screen.push('\n');
            screen
        })
}

pub fn buffer_contains(buffer: &Buffer, text: &str) -> bool {
    buffer_to_string(buffer).contains(text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::{layout::Rect, widgets::Paragraph, widgets::Widget};

    #[test]
    fn test_rows_are_newline_separated() {
        let area = Rect::new(0, 0, 6, 2);
        let mut buf = Buffer::empty(area);
        Paragraph::new("ab\ncd").render(area, &mut buf);

        let text = buffer_to_string(&buf);
        assert_eq!(text, "ab    \ncd    \n");
        assert!(buffer_contains(&buf, "cd"));
        assert!(!buffer_contains(&buf, "abcd"));
    }
}
