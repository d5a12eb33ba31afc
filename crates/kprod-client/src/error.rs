//! Broker collaborator errors.
//!
//! Every error names the operation and target (broker list or topic) so the
//! message is actionable in a one-line status bar without a separate log.

use std::time::Duration;

use kprod_core::ValidationError;
use thiserror::Error;

/// Mutual TLS material could not be turned into a client configuration.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SecurityError {
    /// A PEM file could not be read.
    #[error("failed to read {what} '{path}': {reason}")]
    Read {
        /// Which file (client certificate, client key, CA certificate)
        what: &'static str,
        /// Path as configured
        path: String,
        /// Underlying I/O error
        reason: String,
    },

    /// A PEM file could not be parsed or contained nothing usable.
    #[error("failed to parse {what} '{path}': {reason}")]
    Parse {
        /// Which file (client certificate, client key, CA certificate)
        what: &'static str,
        /// Path as configured
        path: String,
        /// Parser message
        reason: String,
    },

    /// rustls rejected the assembled configuration.
    #[error("invalid TLS config: {0}")]
    Config(String),
}

/// A broker session could not be opened.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConnectError {
    /// Settings failed local validation.
    #[error("invalid settings: {0}")]
    Validation(#[from] ValidationError),

    /// TLS configuration could not be built.
    #[error("failed to create TLS config: {0}")]
    Security(#[from] SecurityError),

    /// The brokers refused or could not be reached.
    #[error("failed to connect to {brokers}: {reason}")]
    Broker {
        /// Comma-separated broker list
        brokers: String,
        /// Client error message
        reason: String,
    },

    /// No broker answered in time.
    #[error("timed out after {after:?} connecting to {brokers}")]
    Timeout {
        /// Comma-separated broker list
        brokers: String,
        /// How long we waited
        after: Duration,
    },
}

/// A message could not be published.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PublishError {
    /// The session has already been closed.
    #[error("session is closed")]
    Closed,

    /// The cluster does not know the topic.
    #[error("unknown topic '{topic}'")]
    UnknownTopic {
        /// Destination topic
        topic: String,
    },

    /// The topic has no partitions to write to.
    #[error("topic '{topic}' has no partitions")]
    NoPartitions {
        /// Destination topic
        topic: String,
    },

    /// The broker refused the write.
    #[error("failed to send message to '{topic}': {reason}")]
    Broker {
        /// Destination topic
        topic: String,
        /// Client error message
        reason: String,
    },

    /// The broker did not acknowledge in time.
    #[error("timed out after {after:?} sending to '{topic}'")]
    Timeout {
        /// Destination topic
        topic: String,
        /// How long we waited
        after: Duration,
    },
}
