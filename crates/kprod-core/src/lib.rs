//! Core data for the Kafka producer TUI.
//!
//! Everything here is synchronous and broker-agnostic:
//!
//! - [`ConnectionSettings`]: parameters for opening a broker session
//! - [`Serde`]: key/value encoders selected by name
//! - [`pretty_json`]: the Format command's pure core
//! - [`ConfigStore`] / [`FileConfigStore`]: persisted configuration
//! - Local error taxonomy ([`ConfigError`], [`PersistError`],
//!   [`ValidationError`], [`FormatError`])

#![forbid(unsafe_code)]
#![deny(missing_docs)]

pub mod codec;
pub mod config;
pub mod error;
pub mod format;
pub mod settings;

pub use codec::Serde;
pub use config::{CONFIG_FILE_NAME, ConfigStore, FileConfigStore, PersistedConfig};
pub use error::{ConfigError, FormatError, PersistError, ValidationError};
pub use format::{Formatted, pretty_json};
pub use settings::{ConnectionSettings, DEFAULT_SERDE};
