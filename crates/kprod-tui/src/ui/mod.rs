//! UI rendering
//!
//! Rendering functions that convert App state into terminal output using
//! ratatui widgets. All functions are pure (no I/O), taking state and
//! drawing into the frame.

mod config;
mod history;
mod input;
mod message;
mod status;

use kprod_app::{App, View};
use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
};

pub use history::row_text;
pub use status::HELP;

/// Height of a single-line bordered input.
const FIELD_HEIGHT: u16 = 3;

/// Render the entire UI.
pub fn render(frame: &mut Frame, app: &App) {
    const HEADER_HEIGHT: u16 = 2;
    const MAIN_AREA_MIN_HEIGHT: u16 = 3;
    const STATUS_HEIGHT: u16 = 1;
    const HELP_HEIGHT: u16 = 1;

    if app.viewport() == (0, 0) {
        frame.render_widget(Paragraph::new("Loading..."), frame.area());
        return;
    }

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(HEADER_HEIGHT),
            Constraint::Min(MAIN_AREA_MIN_HEIGHT),
            Constraint::Length(STATUS_HEIGHT),
            Constraint::Length(HELP_HEIGHT),
        ])
        .split(frame.area());

    let [header_area, main_area, status_area, help_area] = chunks.as_ref() else {
        return;
    };

    render_header(frame, app, *header_area);
    match app.view() {
        View::Config => config::render(frame, app, *main_area),
        View::Message => message::render(frame, app, *main_area),
    }
    status::render(frame, app, *status_area);
    status::render_help(frame, *help_area);
}

/// Title with the view's badge: security state on the config view, the
/// destination topic on the message view.
fn render_header(frame: &mut Frame, app: &App, area: Rect) {
    let title_style = Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD);

    let (title, badge) = match app.view() {
        View::Config => {
            let badge = if app.security_enabled() {
                Span::styled("🔒 mTLS Enabled", Style::default().fg(Color::Green))
            } else {
                Span::styled("🔓 mTLS Disabled", Style::default().fg(Color::Yellow))
            };
            ("Kafka Producer Configuration", badge)
        },
        View::Message => {
            let topic = format!("Topic: {}", app.settings().topic);
            ("Send Message", Span::styled(topic, Style::default().fg(Color::Magenta)))
        },
    };

    let line = Line::from(vec![
        Span::raw(" "),
        Span::styled(title, title_style),
        Span::raw("  "),
        badge,
    ]);
    frame.render_widget(Paragraph::new(line), area);
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use async_trait::async_trait;
    use chrono::Local;
    use kprod_app::{AppAction, AppEvent, KeyInput, input};
    use kprod_client::{Delivery, PublishError, PublishRequest, Session, SessionHandle};
    use kprod_core::ConnectionSettings;
    use ratatui::{Terminal, backend::TestBackend};

    use super::*;

    #[derive(Debug)]
    struct NullSession;

    #[async_trait]
    impl Session for NullSession {
        async fn publish(&self, _request: PublishRequest) -> Result<Delivery, PublishError> {
            Ok(Delivery { partition: 0, offset: 0 })
        }

        async fn close(&self) {}
    }

    const WIDTH: u16 = 100;
    const HEIGHT: u16 = 40;

    fn draw(app: &App) -> Vec<String> {
        let mut terminal = Terminal::new(TestBackend::new(WIDTH, HEIGHT)).unwrap();
        terminal.draw(|frame| render(frame, app)).unwrap();

        let buffer = terminal.backend().buffer();
        (0..HEIGHT)
            .map(|y| (0..WIDTH).map(|x| buffer[(x, y)].symbol()).collect::<String>())
            .collect()
    }

    fn contains(screen: &[String], needle: &str) -> bool {
        screen.iter().any(|line| line.contains(needle))
    }

    fn sized_app() -> App {
        let mut app = App::new(ConnectionSettings::default());
        app.handle(AppEvent::Resize(WIDTH, HEIGHT));
        app
    }

    fn connected_app() -> App {
        let mut app = sized_app();
        let actions = app.handle(AppEvent::Key(input::CONNECT));
        let seq = actions
            .iter()
            .find_map(|action| match action {
                AppAction::Connect { seq, .. } => Some(*seq),
                _ => None,
            })
            .unwrap();
        let session: SessionHandle = Arc::new(NullSession);
        app.handle(AppEvent::ConnectFinished { seq, result: Ok(session) });
        app.handle(AppEvent::Key(input::TOGGLE_VIEW));
        app
    }

    fn published(app: &mut App, key: &str, result: Result<Delivery, PublishError>) {
        app.handle(AppEvent::Published {
            key: key.into(),
            value: "{}".into(),
            completed_at: Local::now(),
            result,
        });
    }

    #[test]
    fn loading_before_first_resize() {
        let app = App::new(ConnectionSettings::default());
        let screen = draw(&app);

        assert!(screen[0].starts_with("Loading..."));
        assert!(!contains(&screen, "Kafka Producer Configuration"));
    }

    #[test]
    fn config_view_lists_settings() {
        let screen = draw(&sized_app());

        assert!(contains(&screen, "Kafka Producer Configuration"));
        assert!(contains(&screen, "mTLS Disabled"));
        assert!(contains(&screen, "Brokers (comma-separated)"));
        assert!(contains(&screen, "localhost:9092"));
        assert!(contains(&screen, "Value Serde"));
        assert!(contains(&screen, "○ Not connected"));
        assert!(contains(&screen, "F5: Connect"));
    }

    #[test]
    fn empty_field_shows_placeholder() {
        let screen = draw(&sized_app());
        assert!(contains(&screen, "/path/to/cert.pem"));
    }

    #[test]
    fn security_badge_follows_saved_settings() {
        let settings = ConnectionSettings {
            cert_path: "/c.pem".into(),
            key_path: "/k.pem".into(),
            ca_path: "/ca.pem".into(),
            use_auth: true,
            ..Default::default()
        };
        let mut app = App::new(settings);
        app.handle(AppEvent::Resize(WIDTH, HEIGHT));

        assert!(contains(&draw(&app), "mTLS Enabled"));
    }

    #[test]
    fn message_view_shows_topic_and_empty_history() {
        let screen = draw(&connected_app());

        assert!(contains(&screen, "Send Message"));
        assert!(contains(&screen, "Topic: test-topic"));
        assert!(contains(&screen, "Message Value (JSON)"));
        assert!(contains(&screen, "No messages sent yet"));
        assert!(contains(&screen, "Successfully connected to Kafka"));
    }

    #[test]
    fn history_shows_latest_window() {
        let mut app = connected_app();
        for n in 1..=7 {
            published(&mut app, &format!("key-{n}"), Ok(Delivery { partition: 1, offset: n }));
        }
        published(&mut app, "", Err(PublishError::UnknownTopic { topic: "test-topic".into() }));

        let screen = draw(&app);
        let rows = screen.iter().filter(|line| line.contains("Key: ")).count();

        assert_eq!(rows, 5);
        assert!(!contains(&screen, "Key: key-3 "));
        assert!(contains(&screen, "Key: key-4 "));
        assert!(contains(&screen, "P:1 O:7"));
        assert!(contains(&screen, "✗ FAILED │ Key: (empty)"));
    }

    #[test]
    fn typed_value_is_drawn() {
        let mut app = connected_app();
        app.handle(AppEvent::Key(KeyInput::Tab));
        app.handle(AppEvent::Paste("{\"id\": 42}".into()));

        assert!(contains(&draw(&app), "{\"id\": 42}"));
    }
}
