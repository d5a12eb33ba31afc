//! Application input events.
//!
//! This module defines [`AppEvent`], the complete set of inputs that drive
//! the [`crate::App`] state machine.
//!
//! Events originate from two distinct sources:
//! - User interactions (keys, paste, resize) delivered by the driver.
//! - Command results posted by the [`crate::Executor`], exactly one per
//!   dispatched command.

use chrono::{DateTime, Local};
use kprod_client::{ConnectError, Delivery, PublishError, SessionHandle};
use kprod_core::{FormatError, Formatted, PersistError};

use crate::KeyInput;

/// Events processed by the App state machine.
#[derive(Debug, Clone)]
pub enum AppEvent {
    /// Keyboard input.
    Key(KeyInput),

    /// Bracketed paste.
    Paste(String),

    /// Terminal resize (columns, rows).
    Resize(u16, u16),

    /// A Connect command finished.
    ConnectFinished {
        /// Sequence number the command was dispatched with.
        seq: u64,
        /// Opened session or failure.
        result: Result<SessionHandle, ConnectError>,
    },

    /// A Save command finished.
    Saved {
        /// Persistence outcome.
        result: Result<(), PersistError>,
    },

    /// A Send command finished.
    Published {
        /// Key text captured at dispatch.
        key: String,
        /// Value text captured at dispatch.
        value: String,
        /// When the broker answered.
        completed_at: DateTime<Local>,
        /// Delivery or failure.
        result: Result<Delivery, PublishError>,
    },

    /// A Format command finished.
    Formatted {
        /// Value text the command formatted.
        source: String,
        /// Pretty-printed text or parse failure.
        result: Result<Formatted, FormatError>,
    },
}
