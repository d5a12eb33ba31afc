//! Send history panel
//!
//! Shows the most recent publish attempts, oldest at the top.

use kprod_app::{Ledger, SendOutcome, SendRecord, ledger::display_key};
use ratatui::{
    Frame,
    layout::Rect,
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
};

/// Render the history panel.
pub fn render(frame: &mut Frame, ledger: &Ledger, area: Rect) {
    let block = Block::default().borders(Borders::ALL).title(" Message History ");

    let lines: Vec<Line> = if ledger.is_empty() {
        vec![Line::styled("No messages sent yet", Style::default().fg(Color::DarkGray))]
    } else {
        ledger.recent().map(row).collect()
    };

    frame.render_widget(Paragraph::new(lines).block(block), area);
}

fn row(record: &SendRecord) -> Line<'static> {
    let color = if record.is_success() { Color::Green } else { Color::Red };
    Line::from(vec![Span::styled(row_text(record), Style::default().fg(color))])
}

/// One history row as plain text.
pub fn row_text(record: &SendRecord) -> String {
    let time = record.timestamp.format("%H:%M:%S");
    let key = display_key(&record.key);
    match &record.outcome {
        SendOutcome::Success { partition, offset } => {
            format!("{time} ✓ SUCCESS │ Key: {key} │ P:{partition} O:{offset}")
        },
        SendOutcome::Failed { reason } => format!("{time} ✗ FAILED │ Key: {key} │ {reason}"),
    }
}

#[cfg(test)]
mod tests {
    use chrono::{Local, TimeZone};

    use super::*;

    fn at_noon(key: &str, outcome: SendOutcome) -> SendRecord {
        SendRecord {
            timestamp: Local.with_ymd_and_hms(2024, 3, 1, 12, 34, 56).unwrap(),
            key: key.into(),
            value: "{}".into(),
            outcome,
        }
    }

    #[test]
    fn success_row() {
        let record = at_noon("user-1", SendOutcome::Success { partition: 2, offset: 9 });
        insta::assert_snapshot!(row_text(&record), @"12:34:56 ✓ SUCCESS │ Key: user-1 │ P:2 O:9");
    }

    #[test]
    fn failed_row_with_long_key() {
        let record = at_noon(
            "a-very-long-message-key-indeed",
            SendOutcome::Failed { reason: "unknown topic 'orders'".into() },
        );
        insta::assert_snapshot!(
            row_text(&record),
            @"12:34:56 ✗ FAILED │ Key: a-very-long-message-... │ unknown topic 'orders'"
        );
    }

    #[test]
    fn empty_key_row() {
        let record = at_noon("", SendOutcome::Success { partition: 0, offset: 0 });
        assert!(row_text(&record).contains("Key: (empty)"));
    }
}
