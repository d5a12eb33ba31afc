//! Message view
//!
//! Key and value inputs above the send history.

use kprod_app::{App, FieldId, ledger::HISTORY_WINDOW};
use ratatui::{
    Frame,
    layout::{Constraint, Layout, Rect},
};

use super::{FIELD_HEIGHT, history, input};

const VALUE_MIN_HEIGHT: u16 = 5;

/// Render the message composer.
pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let history_height = HISTORY_WINDOW as u16 + 2;

    let chunks = Layout::vertical([
        Constraint::Length(FIELD_HEIGHT),
        Constraint::Min(VALUE_MIN_HEIGHT),
        Constraint::Length(history_height),
    ])
    .split(area);

    let [key_area, value_area, history_area] = chunks.as_ref() else {
        return;
    };

    let focused = app.focused_field();
    for (id, row) in [(FieldId::MessageKey, key_area), (FieldId::MessageValue, value_area)] {
        input::render(frame, id, app.field(id), id == focused, *row);
    }
    history::render(frame, app.ledger(), *history_area);
}
