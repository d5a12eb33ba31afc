//! Driver trait for abstracting I/O operations.
//!
//! The [`Driver`] trait decouples the application runtime from specific I/O
//! implementations. Each frontend implements the trait to provide
//! platform-specific input and rendering, while the generic
//! [`crate::Runtime`] handles all orchestration.

use std::future::Future;

use crate::{App, AppEvent};

/// Abstracts terminal I/O for the application runtime.
///
/// Implementations provide platform-specific I/O while the generic
/// [`Runtime`](crate::Runtime) handles orchestration logic. This ensures
/// the same orchestration code runs in the production TUI and in simulation.
///
/// # Implementations
///
/// - **TUI**: crossterm events, ratatui rendering
/// - **Simulation**: scripted events, recorded frames
pub trait Driver: Send {
    /// Platform-specific error type.
    type Error: std::error::Error + Send + 'static;

    /// Wait for the next input event.
    ///
    /// Returns `None` for input the application does not handle. Must be
    /// cancel-safe: the runtime drops the future when a command result
    /// arrives first.
    fn poll_event(
        &mut self,
        app: &App,
    ) -> impl Future<Output = Result<Option<AppEvent>, Self::Error>> + Send;

    /// Current size of the rendering surface (columns, rows).
    ///
    /// # Errors
    ///
    /// Returns an error if the size cannot be queried.
    fn viewport(&self) -> Result<(u16, u16), Self::Error>;

    /// Render the application state.
    ///
    /// # Errors
    ///
    /// Returns an error if rendering fails.
    fn render(&mut self, app: &App) -> Result<(), Self::Error>;

    /// Restore the platform and clean up resources.
    fn stop(&mut self);
}
