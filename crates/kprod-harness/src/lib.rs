//! Deterministic simulation harness for the Kafka producer TUI.
//!
//! Test doubles for every collaborator of the application runtime, so the
//! real [`kprod_app::App`], [`kprod_app::Executor`] and [`kprod_app::Runtime`]
//! can be driven end to end without a terminal, a filesystem or a broker.
//!
//! - [`SimBroker`]: scripted connect/publish outcomes, recorded calls
//! - [`MemoryConfigStore`]: in-memory persisted configuration
//! - [`SimDriver`]: scripted input and recorded renders

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod memory_store;
pub mod sim_broker;
pub mod sim_driver;

pub use memory_store::MemoryConfigStore;
pub use sim_broker::{SIM_PARTITIONS, Scripted, SimBroker, SimSession};
pub use sim_driver::{RenderedFrame, SimDriver, SimDriverError, SimObserver, Step};
