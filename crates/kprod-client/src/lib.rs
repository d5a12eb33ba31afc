//! Broker collaborators for the Kafka producer TUI.
//!
//! The interaction core never talks to a broker directly. It holds a
//! [`Broker`] that opens [`Session`]s, and a session publishes one message at
//! a time. Everything the application knows about Kafka goes through these two
//! traits, so tests substitute scripted doubles.
//!
//! # Components
//!
//! - [`Broker`] / [`Session`]: the collaborator contract
//! - [`build_transport_security`]: mutual TLS context from PEM paths
//! - [`partition`]: key to partition assignment
//!
//! # Kafka (optional)
//!
//! With the `kafka` feature enabled, [`kafka::KafkaBroker`] implements the
//! contract on top of `rskafka`.

#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod broker;
mod error;
pub mod partition;
mod tls;

#[cfg(feature = "kafka")]
pub mod kafka;

pub use broker::{
    Broker, CLOSE_TIMEOUT, Delivery, OPERATION_TIMEOUT, PublishRequest, Session, SessionHandle,
};
pub use error::{ConnectError, PublishError, SecurityError};
pub use tls::{SecureContext, build_transport_security};
