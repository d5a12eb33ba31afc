//! Application side-effects and intents.
//!
//! This module defines the [`AppAction`] enum, which represents instructions
//! produced by the [`crate::App`] state machine for the runtime to execute.
//! Everything except [`AppAction::Render`] and [`AppAction::Quit`] is a
//! command handed to the [`crate::Executor`].

use kprod_client::{PublishRequest, SessionHandle};
use kprod_core::{ConnectionSettings, PersistedConfig};

/// Actions produced by the App state machine.
#[derive(Debug, Clone)]
pub enum AppAction {
    /// Render the UI.
    Render,

    /// Quit the application.
    Quit,

    /// Open a broker session.
    Connect {
        /// Tags the result so superseded attempts can be recognized.
        seq: u64,
        /// Settings snapshot taken at dispatch.
        settings: ConnectionSettings,
    },

    /// Persist the configuration.
    Save {
        /// Settings snapshot taken at dispatch.
        config: PersistedConfig,
    },

    /// Publish one message on the current session.
    Publish {
        /// Session at dispatch time.
        session: SessionHandle,
        /// Encoded message.
        request: PublishRequest,
        /// Key text, echoed back for the ledger.
        key: String,
        /// Value text, echoed back for the ledger.
        value: String,
    },

    /// Pretty-print a JSON value.
    Format {
        /// Value text at dispatch time.
        source: String,
    },

    /// Close a session that is no longer owned by the application.
    CloseSession(SessionHandle),
}

impl AppAction {
    /// Whether this action is a command for the executor.
    pub fn is_command(&self) -> bool {
        !matches!(self, Self::Render | Self::Quit)
    }
}
