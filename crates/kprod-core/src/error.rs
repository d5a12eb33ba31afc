//! Error types for settings, persistence and local validation.
//!
//! Errors here never involve the broker. They are raised before a collaborator
//! is called (validation), while reading or writing the configuration file, or
//! while pretty-printing message values.
//!
//! Every variant carries owned strings rather than source errors so the values
//! can travel inside application events, which must be `Clone`.

use std::path::PathBuf;

use thiserror::Error;

/// Failure loading the persisted configuration.
///
/// Fatal at startup: the application cannot safely guess a partially-specified
/// configuration, so a corrupt file stops the process instead of falling back
/// to defaults.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// No home directory could be resolved for the current user.
    #[error("cannot resolve home directory for configuration file")]
    NoHomeDir,

    /// The file exists but could not be read.
    #[error("failed to read config '{}': {reason}", path.display())]
    Read {
        /// Configuration file location
        path: PathBuf,
        /// Underlying I/O error
        reason: String,
    },

    /// The file is not valid configuration JSON.
    #[error("malformed config '{}': {reason}", path.display())]
    Malformed {
        /// Configuration file location
        path: PathBuf,
        /// Parser message (includes line and column)
        reason: String,
    },
}

/// Failure writing the configuration file.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PersistError {
    /// Settings could not be serialized.
    #[error("failed to serialize config: {0}")]
    Serialize(String),

    /// The file could not be written or its permissions restricted.
    #[error("failed to write config '{}': {reason}", path.display())]
    Write {
        /// Configuration file location
        path: PathBuf,
        /// Underlying I/O error
        reason: String,
    },
}

/// Locally detected precondition failures.
///
/// Short-circuit a command before any collaborator is invoked.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationError {
    /// The brokers field contains no `host:port` entries.
    #[error("broker list is empty")]
    EmptyBrokerList,

    /// The message value field is empty.
    #[error("message value cannot be empty")]
    EmptyValue,

    /// Send was requested without an open session.
    #[error("not connected to Kafka")]
    NotConnected,
}

/// Message value is not well-formed JSON.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("invalid JSON: {reason}")]
pub struct FormatError {
    /// Parser message (includes line and column)
    pub reason: String,
}
