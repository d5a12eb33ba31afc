//! Status and help bars
//!
//! The status bar shows the last status message, or the connection state
//! when nothing has been reported. The help bar lists the bindings.

use kprod_app::App;
use ratatui::{
    Frame,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
};

/// Key binding summary.
pub const HELP: &str =
    "F2: Switch │ F5: Connect │ F9: Save │ F10: Format │ Enter: Send │ Esc: Quit";

/// Render the status bar.
pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let color = if app.is_connected() { Color::Green } else { Color::Yellow };
    let line = Line::from(vec![
        Span::raw(" "),
        Span::styled(app.status_line().to_owned(), Style::default().add_modifier(Modifier::BOLD)),
    ]);

    let paragraph = Paragraph::new(line).style(Style::default().bg(Color::DarkGray).fg(color));
    frame.render_widget(paragraph, area);
}

/// Render the help bar.
pub fn render_help(frame: &mut Frame, area: Rect) {
    let paragraph = Paragraph::new(format!(" {HELP}")).style(Style::default().fg(Color::DarkGray));
    frame.render_widget(paragraph, area);
}
