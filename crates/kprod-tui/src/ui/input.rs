//! Text field widget
//!
//! Draws one [`TextField`] in a bordered box with its label as the title,
//! a dimmed placeholder while empty, and the terminal cursor when focused.

use kprod_app::{FieldId, TextField};
use ratatui::{
    Frame,
    layout::Rect,
    style::{Color, Style},
    text::{Line, Text},
    widgets::{Block, Borders, Paragraph},
};

const BORDER: u16 = 1;

/// Render a field inside `area`.
pub fn render(frame: &mut Frame, id: FieldId, field: &TextField, focused: bool, area: Rect) {
    let border_color = if focused { Color::Cyan } else { Color::DarkGray };
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border_color))
        .title(format!(" {} ", id.label()));

    let text = if field.is_empty() {
        Text::from(Line::styled(id.placeholder(), Style::default().fg(Color::DarkGray)))
    } else {
        Text::from(field.value().split('\n').map(Line::raw).collect::<Vec<_>>())
    };

    let (row, col) = cursor_position(field);
    let visible_rows = area.height.saturating_sub(2 * BORDER);
    let scroll = row.saturating_sub(visible_rows.saturating_sub(1));

    let paragraph = Paragraph::new(text).block(block).scroll((scroll, 0));
    frame.render_widget(paragraph, area);

    if !focused || visible_rows == 0 {
        return;
    }

    let max_x = area.right().saturating_sub(BORDER + 1);
    let cursor_x = area.x.saturating_add(BORDER).saturating_add(col).min(max_x);
    let cursor_y = area.y.saturating_add(BORDER).saturating_add(row - scroll);
    frame.set_cursor_position((cursor_x, cursor_y));
}

/// Row and column of the cursor within the field's text, in characters.
fn cursor_position(field: &TextField) -> (u16, u16) {
    let before: String = field.value().chars().take(field.cursor()).collect();
    let row = before.matches('\n').count();
    let col = before.rsplit('\n').next().map_or(0, |line| line.chars().count());
    (saturate(row), saturate(col))
}

fn saturate(n: usize) -> u16 {
    u16::try_from(n).unwrap_or(u16::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn field_with(text: &str, multiline: bool) -> TextField {
        let mut field = TextField::new(multiline);
        field.set_value(text);
        field
    }

    #[test]
    fn cursor_at_end_of_single_line() {
        let field = field_with("localhost:9092", false);
        assert_eq!(cursor_position(&field), (0, 14));
    }

    #[test]
    fn cursor_on_later_line() {
        let field = field_with("{\n  \"a\": 1\n}", true);
        assert_eq!(cursor_position(&field), (2, 1));
    }

    #[test]
    fn cursor_counts_characters() {
        let field = field_with("héllo", false);
        assert_eq!(cursor_position(&field), (0, 5));
    }
}
