//! Command executor.
//!
//! Runs the commands dispatched by [`App`](crate::App) off the event loop.
//! Each command becomes one tokio task that posts exactly one result
//! [`AppEvent`] on an unbounded channel; the runtime feeds those events back
//! into the state machine in arrival order. There is no cancellation: a
//! command always runs to completion.
//!
//! Session closes are the exception: they produce no event, but are tracked
//! so that shutdown can wait for them. Connects are tracked too: a session
//! that opens after the App has quit is closed during shutdown.

use std::sync::Arc;

use chrono::Local;
use kprod_client::{Broker, CLOSE_TIMEOUT, SessionHandle};
use kprod_core::{ConfigStore, pretty_json};
use tokio::{
    sync::mpsc,
    task::{self, JoinSet},
    time::{Instant, timeout_at},
};

use crate::{AppAction, AppEvent};

/// Spawns command tasks and delivers their results.
pub struct Executor {
    broker: Arc<dyn Broker>,
    store: Arc<dyn ConfigStore>,
    results: mpsc::UnboundedSender<AppEvent>,
    connecting: JoinSet<()>,
    closing: JoinSet<()>,
}

impl Executor {
    /// Create an executor and the receiving end of its result channel.
    pub fn new(
        broker: Arc<dyn Broker>,
        store: Arc<dyn ConfigStore>,
    ) -> (Self, mpsc::UnboundedReceiver<AppEvent>) {
        let (results, rx) = mpsc::unbounded_channel();
        (Self { broker, store, results, connecting: JoinSet::new(), closing: JoinSet::new() }, rx)
    }

    /// Start a command. Must be called from within a tokio runtime.
    pub fn execute(&mut self, action: AppAction) {
        match action {
            AppAction::Connect { seq, settings } => {
                let broker = Arc::clone(&self.broker);
                let results = self.results.clone();
                while self.connecting.try_join_next().is_some() {}
                self.connecting.spawn(async move {
                    let result = broker.open(&settings).await;
                    post(&results, AppEvent::ConnectFinished { seq, result });
                });
            },
            AppAction::Save { config } => {
                let store = Arc::clone(&self.store);
                let results = self.results.clone();
                task::spawn_blocking(move || {
                    let result = store.save(&config);
                    post(&results, AppEvent::Saved { result });
                });
            },
            AppAction::Publish { session, request, key, value } => {
                let results = self.results.clone();
                tokio::spawn(async move {
                    let result = session.publish(request).await;
                    let completed_at = Local::now();
                    post(&results, AppEvent::Published { key, value, completed_at, result });
                });
            },
            AppAction::Format { source } => {
                let results = self.results.clone();
                task::spawn_blocking(move || {
                    let result = pretty_json(&source);
                    post(&results, AppEvent::Formatted { source, result });
                });
            },
            AppAction::CloseSession(session) => self.close(session),
            AppAction::Render | AppAction::Quit => {
                tracing::warn!(?action, "not a command, ignoring");
            },
        }
    }

    fn close(&mut self, session: SessionHandle) {
        while self.closing.try_join_next().is_some() {}
        self.closing.spawn(async move { session.close().await });
    }

    /// Close every session still owned by the executor, at most
    /// [`CLOSE_TIMEOUT`] in total.
    ///
    /// Connects still running are awaited, and any session they opened that
    /// the App never saw is closed. Other unhandled results in `results` are
    /// discarded.
    pub async fn shutdown(&mut self, results: &mut mpsc::UnboundedReceiver<AppEvent>) {
        let deadline = Instant::now() + CLOSE_TIMEOUT;

        let opening = self.connecting.len();
        let connects = async { while self.connecting.join_next().await.is_some() {} };
        if timeout_at(deadline, connects).await.is_err() {
            tracing::warn!(opening, "connects still running at shutdown, abandoning");
            self.connecting.abort_all();
        }

        while let Ok(event) = results.try_recv() {
            if let AppEvent::ConnectFinished { seq, result: Ok(session) } = event {
                tracing::debug!(seq, "closing session opened after quit");
                self.close(session);
            }
        }

        let pending = self.closing.len();
        if pending == 0 {
            return;
        }

        let drain = async { while self.closing.join_next().await.is_some() {} };
        if timeout_at(deadline, drain).await.is_err() {
            tracing::warn!(pending, "sessions still closing at shutdown, abandoning");
            self.closing.abort_all();
        }
    }
}

fn post(results: &mpsc::UnboundedSender<AppEvent>, event: AppEvent) {
    if results.send(event).is_err() {
        tracing::debug!("runtime gone, dropping command result");
    }
}
