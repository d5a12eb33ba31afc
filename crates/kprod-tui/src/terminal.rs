//! Terminal driver for the TUI.
//!
//! Implements the [`Driver`] trait for terminal I/O using crossterm for
//! keyboard events and ratatui for rendering. Broker traffic never passes
//! through here; it runs in the executor's tasks.

use std::io::{self, Stdout, stdout};

use crossterm::{
    ExecutableCommand,
    event::{
        DisableBracketedPaste, EnableBracketedPaste, Event, EventStream, KeyCode, KeyEvent,
        KeyEventKind, KeyModifiers,
    },
    terminal::{self, EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use futures::StreamExt;
use kprod_app::{App, AppEvent, Driver, KeyInput};
use ratatui::{Terminal, backend::CrosstermBackend};
use thiserror::Error;

use crate::ui;

/// Terminal driver errors.
#[derive(Debug, Error)]
pub enum TerminalError {
    /// I/O error from terminal operations.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The terminal event stream ended.
    #[error("terminal input closed")]
    InputClosed,
}

/// Terminal driver implementing the [`Driver`] trait.
///
/// Puts the terminal into raw mode on the alternate screen with bracketed
/// paste enabled, and restores it on [`Driver::stop`] or drop.
pub struct TerminalDriver {
    terminal: Terminal<CrosstermBackend<Stdout>>,
    event_stream: EventStream,
    restored: bool,
}

impl TerminalDriver {
    /// Take over the terminal.
    pub fn new() -> Result<Self, TerminalError> {
        enable_raw_mode()?;
        stdout().execute(EnterAlternateScreen)?.execute(EnableBracketedPaste)?;

        let backend = CrosstermBackend::new(stdout());
        let terminal = Terminal::new(backend)?;
        let event_stream = EventStream::new();

        Ok(Self { terminal, event_stream, restored: false })
    }

    /// Convert a crossterm key press to `KeyInput`.
    pub fn convert_key(event: KeyEvent) -> Option<KeyInput> {
        let ctrl = event.modifiers.contains(KeyModifiers::CONTROL);
        match event.code {
            KeyCode::Char('c') if ctrl => Some(KeyInput::Interrupt),
            KeyCode::Char(_) if ctrl => None,
            KeyCode::Char(c) => Some(KeyInput::Char(c)),
            KeyCode::Enter => Some(KeyInput::Enter),
            KeyCode::Backspace => Some(KeyInput::Backspace),
            KeyCode::Delete => Some(KeyInput::Delete),
            KeyCode::Tab if event.modifiers.contains(KeyModifiers::SHIFT) => Some(KeyInput::BackTab),
            KeyCode::Tab => Some(KeyInput::Tab),
            KeyCode::BackTab => Some(KeyInput::BackTab),
            KeyCode::Esc => Some(KeyInput::Esc),
            KeyCode::Left => Some(KeyInput::Left),
            KeyCode::Right => Some(KeyInput::Right),
            KeyCode::Up => Some(KeyInput::Up),
            KeyCode::Down => Some(KeyInput::Down),
            KeyCode::Home => Some(KeyInput::Home),
            KeyCode::End => Some(KeyInput::End),
            KeyCode::F(n) => Some(KeyInput::F(n)),
            _ => None,
        }
    }

    fn restore(&mut self) {
        if self.restored {
            return;
        }
        self.restored = true;
        let _ = disable_raw_mode();
        let _ = stdout().execute(DisableBracketedPaste);
        let _ = stdout().execute(LeaveAlternateScreen);
        let _ = self.terminal.show_cursor();
    }
}

impl Driver for TerminalDriver {
    type Error = TerminalError;

    async fn poll_event(&mut self, _app: &App) -> Result<Option<AppEvent>, Self::Error> {
        match self.event_stream.next().await {
            Some(Ok(Event::Key(key_event))) if key_event.kind == KeyEventKind::Press => {
                Ok(Self::convert_key(key_event).map(AppEvent::Key))
            },
            Some(Ok(Event::Paste(text))) => Ok(Some(AppEvent::Paste(text))),
            Some(Ok(Event::Resize(cols, rows))) => Ok(Some(AppEvent::Resize(cols, rows))),
            Some(Ok(_)) => Ok(None),
            Some(Err(e)) => Err(TerminalError::Io(e)),
            None => Err(TerminalError::InputClosed),
        }
    }

    fn viewport(&self) -> Result<(u16, u16), Self::Error> {
        Ok(terminal::size()?)
    }

    fn render(&mut self, app: &App) -> Result<(), Self::Error> {
        self.terminal.draw(|frame| ui::render(frame, app))?;
        Ok(())
    }

    fn stop(&mut self) {
        self.restore();
    }
}

impl Drop for TerminalDriver {
    fn drop(&mut self) {
        self.restore();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn press(code: KeyCode, modifiers: KeyModifiers) -> Option<KeyInput> {
        TerminalDriver::convert_key(KeyEvent::new(code, modifiers))
    }

    #[test]
    fn control_keys() {
        assert_eq!(press(KeyCode::Char('c'), KeyModifiers::CONTROL), Some(KeyInput::Interrupt));
        assert_eq!(press(KeyCode::Char('x'), KeyModifiers::CONTROL), None);
        assert_eq!(press(KeyCode::Char('C'), KeyModifiers::SHIFT), Some(KeyInput::Char('C')));
    }

    #[test]
    fn focus_and_function_keys() {
        assert_eq!(press(KeyCode::BackTab, KeyModifiers::SHIFT), Some(KeyInput::BackTab));
        assert_eq!(press(KeyCode::Tab, KeyModifiers::SHIFT), Some(KeyInput::BackTab));
        assert_eq!(press(KeyCode::Tab, KeyModifiers::NONE), Some(KeyInput::Tab));
        assert_eq!(press(KeyCode::F(10), KeyModifiers::NONE), Some(kprod_app::input::FORMAT));
        assert_eq!(press(KeyCode::Insert, KeyModifiers::NONE), None);
    }
}
