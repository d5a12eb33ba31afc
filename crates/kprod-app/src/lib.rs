//! Application layer for the Kafka producer TUI
//!
//! Pure state machine and generic runtime, enabling deterministic simulation
//! testing with the same code that runs in production.
//!
//! # Components
//!
//! - [`App`]: interaction state machine (views, focus, commands, ledger)
//! - [`Executor`]: runs commands off the event loop, one result event each
//! - [`Driver`]: trait for platform-specific I/O abstraction
//! - [`Runtime`]: generic orchestration loop using Driver

#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod action;
mod app;
mod driver;
mod event;
mod executor;
pub mod field;
pub mod input;
pub mod ledger;
mod runtime;

pub use action::AppAction;
pub use app::{App, CONNECT_FIRST};
pub use driver::Driver;
pub use event::AppEvent;
pub use executor::Executor;
pub use field::{FieldId, TextField, View};
pub use input::KeyInput;
pub use ledger::{Ledger, SendOutcome, SendRecord};
pub use runtime::Runtime;
