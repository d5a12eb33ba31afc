//! Terminal-agnostic keyboard input.

/// Keyboard input abstraction.
///
/// Decouples application logic from terminal libraries (crossterm, termion,
/// etc.) enabling deterministic simulation testing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyInput {
    /// Printable character.
    Char(char),
    /// Enter/Return key (send message).
    Enter,
    /// Backspace key (delete character before cursor).
    Backspace,
    /// Delete key (delete character at cursor).
    Delete,
    /// Tab key (next field).
    Tab,
    /// Shift+Tab (previous field).
    BackTab,
    /// Escape key (quit).
    Esc,
    /// Ctrl+C (quit).
    Interrupt,
    /// Left arrow key.
    Left,
    /// Right arrow key.
    Right,
    /// Up arrow key.
    Up,
    /// Down arrow key.
    Down,
    /// Home key (cursor to start).
    Home,
    /// End key (cursor to end).
    End,
    /// Function key by number (`F(5)` is F5).
    F(u8),
}

/// Function key that toggles between the config and message views.
pub const TOGGLE_VIEW: KeyInput = KeyInput::F(2);
/// Function key that connects (or reconnects) to the brokers.
pub const CONNECT: KeyInput = KeyInput::F(5);
/// Function key that saves the configuration.
pub const SAVE: KeyInput = KeyInput::F(9);
/// Function key that pretty-prints the message value.
pub const FORMAT: KeyInput = KeyInput::F(10);
