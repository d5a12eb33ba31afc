//! Config view
//!
//! One bordered input per connection setting, in focus order.

use kprod_app::{App, FieldId};
use ratatui::{
    Frame,
    layout::{Constraint, Layout, Rect},
};

use super::{FIELD_HEIGHT, input};

/// Render the settings form.
pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let constraints = FieldId::CONFIG
        .iter()
        .map(|_| Constraint::Length(FIELD_HEIGHT))
        .chain(std::iter::once(Constraint::Min(0)));
    let rows = Layout::vertical(constraints).split(area);

    let focused = app.focused_field();
    for (id, row) in FieldId::CONFIG.iter().zip(rows.iter()) {
        input::render(frame, *id, app.field(*id), *id == focused, *row);
    }
}
