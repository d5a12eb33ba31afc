//! Broker session contract.

use std::{fmt, sync::Arc, time::Duration};

use async_trait::async_trait;
use kprod_core::ConnectionSettings;

use crate::error::{ConnectError, PublishError};

/// Upper bound for opening a session or publishing a single message.
pub const OPERATION_TIMEOUT: Duration = Duration::from_secs(10);

/// Upper bound the application waits for sessions to close on shutdown.
pub const CLOSE_TIMEOUT: Duration = Duration::from_secs(5);

/// Shared handle to an open session.
///
/// The application owns exactly one of these at a time; clones only travel
/// into in-flight publish tasks.
pub type SessionHandle = Arc<dyn Session>;

/// Opens broker sessions.
#[async_trait]
pub trait Broker: Send + Sync {
    /// Open a session for `settings`.
    ///
    /// Implementations must reject an empty broker list without touching the
    /// network, and build transport security only when `settings.use_auth`.
    async fn open(&self, settings: &ConnectionSettings) -> Result<SessionHandle, ConnectError>;
}

/// A live broker connection.
#[async_trait]
pub trait Session: Send + Sync + fmt::Debug {
    /// Publish a single message and wait for the broker's acknowledgement.
    async fn publish(&self, request: PublishRequest) -> Result<Delivery, PublishError>;

    /// Release the connection. Idempotent; publishing afterwards fails with
    /// [`PublishError::Closed`].
    async fn close(&self);
}

/// One message to publish.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublishRequest {
    /// Destination topic.
    pub topic: String,
    /// Encoded key. `None` for unkeyed messages.
    pub key: Option<Vec<u8>>,
    /// Encoded value.
    pub value: Vec<u8>,
}

/// Where the broker stored a published message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Delivery {
    /// Partition the message landed in.
    pub partition: i32,
    /// Offset within that partition.
    pub offset: i64,
}
