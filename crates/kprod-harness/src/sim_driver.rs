//! Simulation driver implementing the Driver trait.
//!
//! `SimDriver` provides the same interface as `TerminalDriver` but for
//! deterministic testing. It implements [`Driver`] so the same
//! [`kprod_app::Runtime`] orchestration code runs in both production and
//! simulation.
//!
//! Input is a script of [`Step`]s. Events are delivered in order; a
//! [`Step::WaitFor`] holds the script until the App satisfies a predicate,
//! which lets tests wait for command results without sleeping. When the
//! script runs out the driver sends Ctrl+C.

#![allow(clippy::disallowed_types, reason = "Synchronous locking operations only")]

use std::{
    collections::VecDeque,
    sync::{Arc, Mutex, MutexGuard, PoisonError},
    time::Duration,
};

use kprod_app::{App, AppEvent, Driver, KeyInput, View};
use thiserror::Error;
use tokio::time::Instant;

/// Poll interval while waiting on a predicate.
const WAIT_TICK: Duration = Duration::from_millis(1);

/// Default upper bound for a single [`Step::WaitFor`].
pub const DEFAULT_WAIT_LIMIT: Duration = Duration::from_secs(30);

/// Error type for simulation driver.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SimDriverError {
    /// A wait step did not complete in time.
    #[error("timed out waiting for: {0}")]
    WaitTimedOut(&'static str),
}

/// One scripted driver step.
#[derive(Debug)]
pub enum Step {
    /// Deliver an event.
    Input(AppEvent),
    /// Hold until the predicate holds for the App.
    WaitFor {
        /// Shown in the timeout error.
        what: &'static str,
        /// Condition to wait for.
        until: fn(&App) -> bool,
    },
    /// Hold for a fixed duration.
    Sleep(Duration),
}

/// What the driver saw at one render.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedFrame {
    /// View shown.
    pub view: View,
    /// Status bar text.
    pub status: String,
    /// Ledger size.
    pub ledger_len: usize,
}

/// Shared state for inspection after the driver is moved into a runtime.
#[derive(Default)]
struct SharedState {
    frames: Vec<RenderedFrame>,
    stopped: bool,
}

/// Simulation driver for deterministic testing.
///
/// Implements [`Driver`] trait so the same [`kprod_app::Runtime`]
/// orchestration code runs in both production TUI and simulation tests.
pub struct SimDriver {
    script: VecDeque<Step>,
    viewport: (u16, u16),
    wait_limit: Duration,
    deadline: Option<Instant>,
    state: Arc<Mutex<SharedState>>,
}

impl Default for SimDriver {
    fn default() -> Self {
        Self::new()
    }
}

impl SimDriver {
    /// Create a new simulation driver with an 80x24 viewport.
    pub fn new() -> Self {
        Self {
            script: VecDeque::new(),
            viewport: (80, 24),
            wait_limit: DEFAULT_WAIT_LIMIT,
            deadline: None,
            state: Arc::new(Mutex::new(SharedState::default())),
        }
    }

    /// Report a different initial viewport.
    #[must_use]
    pub fn with_viewport(mut self, cols: u16, rows: u16) -> Self {
        self.viewport = (cols, rows);
        self
    }

    /// Bound each wait step.
    #[must_use]
    pub fn with_wait_limit(mut self, limit: Duration) -> Self {
        self.wait_limit = limit;
        self
    }

    /// Append a step.
    #[must_use]
    pub fn step(mut self, step: Step) -> Self {
        self.script.push_back(step);
        self
    }

    /// Append an event.
    #[must_use]
    pub fn event(self, event: AppEvent) -> Self {
        self.step(Step::Input(event))
    }

    /// Append a key press.
    #[must_use]
    pub fn key(self, key: KeyInput) -> Self {
        self.event(AppEvent::Key(key))
    }

    /// Append one key press per character.
    #[must_use]
    pub fn type_text(self, text: &str) -> Self {
        text.chars().fold(self, |driver, c| driver.key(KeyInput::Char(c)))
    }

    /// Append a wait on `until`.
    #[must_use]
    pub fn wait_for(self, what: &'static str, until: fn(&App) -> bool) -> Self {
        self.step(Step::WaitFor { what, until })
    }

    /// Append a fixed pause.
    #[must_use]
    pub fn sleep(self, duration: Duration) -> Self {
        self.step(Step::Sleep(duration))
    }

    /// Handle for inspecting renders after the driver is consumed.
    pub fn observer(&self) -> SimObserver {
        SimObserver { state: Arc::clone(&self.state) }
    }

    fn lock(&self) -> MutexGuard<'_, SharedState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn step_deadline(&mut self, budget: Duration) -> Instant {
        *self.deadline.get_or_insert_with(|| Instant::now() + budget)
    }

    fn advance(&mut self) {
        self.script.pop_front();
        self.deadline = None;
    }
}

/// Read access to what a [`SimDriver`] rendered.
#[derive(Clone)]
pub struct SimObserver {
    state: Arc<Mutex<SharedState>>,
}

impl SimObserver {
    fn lock(&self) -> MutexGuard<'_, SharedState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Every frame rendered so far.
    pub fn frames(&self) -> Vec<RenderedFrame> {
        self.lock().frames.clone()
    }

    /// Most recent frame.
    pub fn last_frame(&self) -> Option<RenderedFrame> {
        self.lock().frames.last().cloned()
    }

    /// Whether the runtime stopped the driver.
    pub fn stopped(&self) -> bool {
        self.lock().stopped
    }
}

impl Driver for SimDriver {
    type Error = SimDriverError;

    async fn poll_event(&mut self, app: &App) -> Result<Option<AppEvent>, Self::Error> {
        match self.script.front() {
            None => Ok(Some(AppEvent::Key(KeyInput::Interrupt))),
            Some(Step::Input(_)) => {
                let Some(Step::Input(event)) = self.script.pop_front() else {
                    return Ok(None);
                };
                Ok(Some(event))
            },
            Some(&Step::WaitFor { what, until }) => {
                if until(app) {
                    self.advance();
                    return Ok(None);
                }
                let deadline = self.step_deadline(self.wait_limit);
                if Instant::now() >= deadline {
                    return Err(SimDriverError::WaitTimedOut(what));
                }
                tokio::time::sleep(WAIT_TICK).await;
                Ok(None)
            },
            Some(&Step::Sleep(duration)) => {
                let deadline = self.step_deadline(duration);
                tokio::time::sleep_until(deadline).await;
                self.advance();
                Ok(None)
            },
        }
    }

    fn viewport(&self) -> Result<(u16, u16), Self::Error> {
        Ok(self.viewport)
    }

    fn render(&mut self, app: &App) -> Result<(), Self::Error> {
        let frame = RenderedFrame {
            view: app.view(),
            status: app.status_line().to_string(),
            ledger_len: app.ledger().len(),
        };
        self.lock().frames.push(frame);
        Ok(())
    }

    fn stop(&mut self) {
        self.lock().stopped = true;
    }
}

#[cfg(test)]
mod tests {
    use kprod_core::ConnectionSettings;

    use super::*;

    #[tokio::test]
    async fn events_then_interrupt() {
        let app = App::new(ConnectionSettings::default());
        let mut driver = SimDriver::new().key(KeyInput::Tab);

        let first = driver.poll_event(&app).await.unwrap();
        let second = driver.poll_event(&app).await.unwrap();

        assert!(matches!(first, Some(AppEvent::Key(KeyInput::Tab))));
        assert!(matches!(second, Some(AppEvent::Key(KeyInput::Interrupt))));
    }

    #[tokio::test(start_paused = true)]
    async fn wait_times_out() {
        let app = App::new(ConnectionSettings::default());
        let mut driver = SimDriver::new()
            .with_wait_limit(Duration::from_millis(10))
            .wait_for("connection", App::is_connected);

        let result = loop {
            match driver.poll_event(&app).await {
                Ok(None) => {},
                other => break other,
            }
        };

        assert_eq!(result.unwrap_err(), SimDriverError::WaitTimedOut("connection"));
    }

    #[test]
    fn renders_are_observable() {
        let mut driver = SimDriver::new();
        let observer = driver.observer();
        driver.render(&App::new(ConnectionSettings::default())).unwrap();
        driver.stop();

        assert_eq!(observer.last_frame().map(|f| f.status), Some("○ Not connected".to_string()));
        assert!(observer.stopped());
    }
}
