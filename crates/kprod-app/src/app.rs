//! Application state machine.
//!
//! This module defines the [`App`] state machine, which owns the whole
//! interactive session: the form, the connection settings, the broker session
//! and the send ledger.
//!
//! This is a pure state machine: it consumes [`crate::AppEvent`] inputs and
//! produces [`crate::AppAction`] instructions for the runtime to execute. It
//! never performs I/O itself; connecting, saving, publishing and formatting
//! are dispatched as commands whose results come back as events.
//!
//! # Responsibilities
//!
//! - View switching (guarded on an open session) and per-view focus.
//! - Routing edits to the focused [`TextField`](crate::TextField).
//! - Dispatching commands and applying their results.
//! - Owning at most one broker session and closing any it gives up.

use chrono::{DateTime, Local};
use kprod_client::{Delivery, PublishError, PublishRequest, SessionHandle};
use kprod_core::{ConnectionSettings, FormatError, Formatted, ValidationError};

use crate::{
    AppAction, AppEvent, KeyInput,
    field::{FieldId, Form, TextField, View},
    input,
    ledger::{Ledger, SendOutcome, SendRecord},
};

/// Status shown when entering the message view without a session.
pub const CONNECT_FIRST: &str = "Please connect to Kafka first (F5)";

/// Commands that may only run one at a time.
#[derive(Debug, Clone, Copy, Default)]
struct InFlight {
    save: bool,
    send: bool,
    format: bool,
}

/// Application state machine.
///
/// Pure state machine that processes events and produces actions.
/// No I/O dependencies - fully testable in simulation.
#[derive(Debug, Clone)]
pub struct App {
    /// Screen currently shown.
    view: View,
    /// Remembered focus index per view.
    focus: [usize; 2],
    /// Every editable field.
    form: Form,
    /// Settings as of the last Connect or Save.
    settings: ConnectionSettings,
    /// Open broker session. `None` until a Connect succeeds.
    session: Option<SessionHandle>,
    /// Completed publish attempts.
    ledger: Ledger,
    /// Last status message. `None` falls back to the connection indicator.
    status_message: Option<String>,
    /// Terminal dimensions (columns, rows). Zero until the first resize.
    viewport: (u16, u16),
    /// Sequence number of the most recently dispatched Connect.
    connect_seq: u64,
    /// Whether the most recent Connect is still running.
    connecting: bool,
    in_flight: InFlight,
}

impl App {
    /// Create an App showing the config view populated from `settings`.
    pub fn new(settings: ConnectionSettings) -> Self {
        Self {
            view: View::Config,
            focus: [0; 2],
            form: Form::from_settings(&settings),
            settings,
            session: None,
            ledger: Ledger::new(),
            status_message: None,
            viewport: (0, 0),
            connect_seq: 0,
            connecting: false,
            in_flight: InFlight::default(),
        }
    }

    /// Process an event and return actions.
    pub fn handle(&mut self, event: AppEvent) -> Vec<AppAction> {
        match event {
            AppEvent::Key(key) => self.handle_key(key),
            AppEvent::Paste(text) => {
                let id = self.focused_field();
                self.form.field_mut(id).insert_str(&text);
                vec![AppAction::Render]
            },
            AppEvent::Resize(cols, rows) => {
                self.viewport = (cols, rows);
                vec![AppAction::Render]
            },
            AppEvent::ConnectFinished { seq, result } => self.on_connected(seq, result),
            AppEvent::Saved { result } => {
                self.in_flight.save = false;
                match result {
                    Ok(()) => self.set_status("Configuration saved successfully"),
                    Err(e) => self.set_error(&e),
                }
                vec![AppAction::Render]
            },
            AppEvent::Published { key, value, completed_at, result } => {
                self.on_published(key, value, completed_at, result)
            },
            AppEvent::Formatted { source, result } => self.on_formatted(&source, result),
        }
    }

    fn handle_key(&mut self, key: KeyInput) -> Vec<AppAction> {
        match key {
            KeyInput::Esc | KeyInput::Interrupt => self.quit(),
            KeyInput::Tab => self.move_focus(1),
            KeyInput::BackTab => self.move_focus(-1),
            input::TOGGLE_VIEW => self.toggle_view(),
            input::CONNECT => self.connect(),
            input::SAVE => self.save(),
            input::FORMAT => {
                if self.view == View::Message && self.focused_field() == FieldId::MessageValue {
                    self.format()
                } else {
                    vec![]
                }
            },
            KeyInput::Enter => match self.view {
                View::Message => self.send(),
                View::Config => vec![],
            },
            other => {
                let id = self.focused_field();
                if self.form.field_mut(id).handle_key(other) {
                    vec![AppAction::Render]
                } else {
                    vec![]
                }
            },
        }
    }

    /// Close the session (if any) and quit.
    pub fn quit(&mut self) -> Vec<AppAction> {
        match self.session.take() {
            Some(session) => vec![AppAction::CloseSession(session), AppAction::Quit],
            None => vec![AppAction::Quit],
        }
    }

    fn move_focus(&mut self, step: isize) -> Vec<AppAction> {
        let count = self.view.fields().len();
        let slot = self.view.slot();
        self.focus[slot] = wrap(self.focus[slot], step, count);
        vec![AppAction::Render]
    }

    /// Switch between views. Entering the message view requires a session.
    pub fn toggle_view(&mut self) -> Vec<AppAction> {
        match self.view {
            View::Config if !self.is_connected() => {
                self.set_status(CONNECT_FIRST);
            },
            View::Config => self.view = View::Message,
            View::Message => self.view = View::Config,
        }
        vec![AppAction::Render]
    }

    /// Snapshot the form and dispatch a Connect.
    ///
    /// Allowed while another Connect is running; only the latest result is
    /// applied.
    pub fn connect(&mut self) -> Vec<AppAction> {
        self.settings = self.form.snapshot_settings();
        if let Err(e) = self.settings.validate_for_connect() {
            return self.fail(e);
        }

        self.connect_seq += 1;
        self.connecting = true;
        self.set_status(format!("Connecting to {}...", self.settings.brokers_field()));
        tracing::debug!(seq = self.connect_seq, brokers = %self.settings.brokers_field(), "dispatch connect");

        vec![
            AppAction::Connect { seq: self.connect_seq, settings: self.settings.clone() },
            AppAction::Render,
        ]
    }

    /// Snapshot the form and dispatch a Save.
    pub fn save(&mut self) -> Vec<AppAction> {
        if self.in_flight.save {
            self.set_status("Save already in progress");
            return vec![AppAction::Render];
        }

        self.settings = self.form.snapshot_settings();
        self.in_flight.save = true;
        self.set_status("Saving configuration...");
        vec![AppAction::Save { config: self.settings.to_persisted() }, AppAction::Render]
    }

    /// Dispatch a Send of the message fields on the current session.
    pub fn send(&mut self) -> Vec<AppAction> {
        let Some(session) = self.session.clone() else {
            return self.fail(ValidationError::NotConnected);
        };
        if self.in_flight.send {
            self.set_status("A message is already being sent");
            return vec![AppAction::Render];
        }

        let key = self.form.field(FieldId::MessageKey).value().to_string();
        let value = self.form.field(FieldId::MessageValue).value().to_string();
        if value.is_empty() {
            return self.fail(ValidationError::EmptyValue);
        }

        let request = PublishRequest {
            topic: self.settings.topic.clone(),
            key: self.settings.key_serde().encode_key(&key),
            value: self.settings.value_serde().encode(&value),
        };

        self.in_flight.send = true;
        self.set_status("Sending message...");
        tracing::debug!(topic = %request.topic, keyed = request.key.is_some(), "dispatch publish");
        vec![AppAction::Publish { session, request, key, value }, AppAction::Render]
    }

    /// Dispatch a Format of the message value.
    pub fn format(&mut self) -> Vec<AppAction> {
        if self.in_flight.format {
            self.set_status("Already formatting");
            return vec![AppAction::Render];
        }

        self.in_flight.format = true;
        self.set_status("Formatting...");
        let source = self.form.field(FieldId::MessageValue).value().to_string();
        vec![AppAction::Format { source }, AppAction::Render]
    }

    fn on_connected(
        &mut self,
        seq: u64,
        result: Result<SessionHandle, kprod_client::ConnectError>,
    ) -> Vec<AppAction> {
        if !self.connecting || seq != self.connect_seq {
            return match result {
                Ok(stale) => {
                    tracing::warn!(seq, latest = self.connect_seq, "closing superseded session");
                    vec![AppAction::CloseSession(stale)]
                },
                Err(e) => {
                    tracing::debug!(seq, latest = self.connect_seq, error = %e, "ignoring superseded connect failure");
                    vec![]
                },
            };
        }

        self.connecting = false;
        match result {
            Ok(session) => {
                tracing::info!(seq, brokers = %self.settings.brokers_field(), "connected");
                self.set_status("Successfully connected to Kafka");
                let mut actions = Vec::with_capacity(2);
                if let Some(previous) = self.session.replace(session) {
                    actions.push(AppAction::CloseSession(previous));
                }
                actions.push(AppAction::Render);
                actions
            },
            Err(e) => {
                tracing::warn!(seq, error = %e, "connect failed");
                self.set_error(&e);
                vec![AppAction::Render]
            },
        }
    }

    fn on_published(
        &mut self,
        key: String,
        value: String,
        completed_at: DateTime<Local>,
        result: Result<Delivery, PublishError>,
    ) -> Vec<AppAction> {
        self.in_flight.send = false;

        let outcome = match result {
            Ok(Delivery { partition, offset }) => {
                tracing::info!(partition, offset, "message sent");
                self.form.field_mut(FieldId::MessageKey).clear();
                self.form.field_mut(FieldId::MessageValue).clear();
                self.set_status(format!("Message sent (partition {partition}, offset {offset})"));
                SendOutcome::Success { partition, offset }
            },
            Err(e) => {
                tracing::warn!(error = %e, "publish failed");
                self.set_error(&e);
                SendOutcome::Failed { reason: e.to_string() }
            },
        };

        self.ledger.push(SendRecord { timestamp: completed_at, key, value, outcome });
        vec![AppAction::Render]
    }

    fn on_formatted(
        &mut self,
        source: &str,
        result: Result<Formatted, FormatError>,
    ) -> Vec<AppAction> {
        self.in_flight.format = false;

        let value = self.form.field_mut(FieldId::MessageValue);
        if value.value() != source {
            self.set_status("Value changed while formatting, result discarded");
            return vec![AppAction::Render];
        }

        match result {
            Ok(Formatted::Empty) => self.set_status("Nothing to format"),
            Ok(Formatted::Pretty(pretty)) => {
                value.set_value(pretty);
                self.set_status("JSON formatted successfully");
            },
            Err(e) => self.set_error(&e),
        }
        vec![AppAction::Render]
    }

    fn fail(&mut self, err: ValidationError) -> Vec<AppAction> {
        self.set_error(&err);
        vec![AppAction::Render]
    }

    /// Set a status message to display to the user.
    pub fn set_status(&mut self, message: impl Into<String>) {
        self.status_message = Some(message.into());
    }

    fn set_error(&mut self, err: &dyn std::error::Error) {
        self.status_message = Some(format!("Error: {err}"));
    }

    /// Screen currently shown.
    pub fn view(&self) -> View {
        self.view
    }

    /// Focus index within the current view.
    pub fn focus_index(&self) -> usize {
        self.focus[self.view.slot()]
    }

    /// Field that receives edits.
    pub fn focused_field(&self) -> FieldId {
        self.view.fields()[self.focus_index()]
    }

    /// Field by id.
    pub fn field(&self, id: FieldId) -> &TextField {
        self.form.field(id)
    }

    /// Settings as of the last Connect or Save (or startup).
    pub fn settings(&self) -> &ConnectionSettings {
        &self.settings
    }

    /// Whether mutual TLS is enabled for the current settings.
    pub fn security_enabled(&self) -> bool {
        self.settings.use_auth
    }

    /// Whether a broker session is held.
    pub fn is_connected(&self) -> bool {
        self.session.is_some()
    }

    /// Whether the latest Connect is still running.
    pub fn is_connecting(&self) -> bool {
        self.connecting
    }

    /// Completed publish attempts.
    pub fn ledger(&self) -> &Ledger {
        &self.ledger
    }

    /// Terminal dimensions (columns, rows). Zero before the first resize.
    pub fn viewport(&self) -> (u16, u16) {
        self.viewport
    }

    /// Last status message. `None` if nothing has been reported yet.
    pub fn status_message(&self) -> Option<&str> {
        self.status_message.as_deref()
    }

    /// Status bar text: the last status message or the connection indicator.
    pub fn status_line(&self) -> &str {
        match (&self.status_message, self.is_connected()) {
            (Some(message), _) => message,
            (None, true) => "● Connected to Kafka",
            (None, false) => "○ Not connected",
        }
    }
}

fn wrap(index: usize, step: isize, count: usize) -> usize {
    (index as isize + step).rem_euclid(count as isize) as usize
}
