//! Generic runtime for application orchestration.
//!
//! The Runtime drives the application event loop, coordinating between:
//! - [`App`]: interaction state machine
//! - [`Executor`]: command execution
//! - [`Driver`]: platform-specific I/O

use std::sync::Arc;

use kprod_client::Broker;
use kprod_core::ConfigStore;
use tokio::sync::mpsc;

use crate::{App, AppAction, AppEvent, Driver, Executor};

/// Generic runtime that orchestrates App, Executor, and Driver.
///
/// # Type Parameters
///
/// - `D`: Platform-specific I/O driver
pub struct Runtime<D: Driver> {
    driver: D,
    app: App,
    executor: Executor,
    results: mpsc::UnboundedReceiver<AppEvent>,
}

impl<D: Driver> Runtime<D> {
    /// Create a new runtime around an initialized App.
    pub fn new(driver: D, app: App, broker: Arc<dyn Broker>, store: Arc<dyn ConfigStore>) -> Self {
        let (executor, results) = Executor::new(broker, store);
        Self { driver, app, executor, results }
    }

    /// Run the main event loop until the App quits.
    ///
    /// This is the core orchestration loop that:
    /// 1. Reports the initial viewport so the first frame is not a placeholder
    /// 2. Waits for either an input event or a command result
    /// 3. Feeds the event to the App and executes the resulting actions
    /// 4. On quit, closes every remaining session and stops the driver
    ///
    /// Returns the final App state.
    ///
    /// # Errors
    ///
    /// Returns an error if the driver encounters an I/O error.
    pub async fn run(mut self) -> Result<App, D::Error> {
        let result = self.event_loop().await;

        self.executor.shutdown(&mut self.results).await;
        self.driver.stop();
        result.map(|()| self.app)
    }

    async fn event_loop(&mut self) -> Result<(), D::Error> {
        let (cols, rows) = self.driver.viewport()?;
        let actions = self.app.handle(AppEvent::Resize(cols, rows));
        if self.process_actions(actions)? {
            return Ok(());
        }

        loop {
            let event = tokio::select! {
                biased;
                Some(result) = self.results.recv() => result,
                polled = self.driver.poll_event(&self.app) => match polled? {
                    Some(event) => event,
                    None => continue,
                },
            };

            let actions = self.app.handle(event);
            if self.process_actions(actions)? {
                return Ok(());
            }
        }
    }

    /// Execute actions returned by the App.
    ///
    /// Returns `true` if should quit.
    fn process_actions(&mut self, actions: Vec<AppAction>) -> Result<bool, D::Error> {
        for action in actions {
            match action {
                AppAction::Render => self.driver.render(&self.app)?,
                AppAction::Quit => return Ok(true),
                command => self.executor.execute(command),
            }
        }
        Ok(false)
    }

    /// Get a reference to the App
    pub fn app(&self) -> &App {
        &self.app
    }
}
