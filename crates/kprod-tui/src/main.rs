//! Kafka producer TUI entry point.

use std::{fs::OpenOptions, sync::Arc};

use clap::{CommandFactory, FromArgMatches, Parser};
use kprod_app::{App, Runtime};
use kprod_client::kafka::KafkaBroker;
use kprod_core::{ConfigStore, ConnectionSettings, FileConfigStore};
use kprod_tui::TerminalDriver;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Log file written under the system temp directory when `RUST_LOG` is set.
const LOG_FILE_NAME: &str = "kafka-producer-tui.log";

/// Interactive terminal producer for Kafka topics
#[derive(Parser, Debug)]
#[command(name = "kafka-producer-tui")]
#[command(about = "Interactive terminal producer for Kafka topics")]
#[command(version)]
struct Args {}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let location = FileConfigStore::default_path()
        .map_or_else(|| "unavailable (no home directory)".to_owned(), |p| p.display().to_string());
    let matches = Args::command().after_help(format!("Configuration file: {location}")).get_matches();
    let _args = Args::from_arg_matches(&matches)?;

    init_logging()?;

    let store = FileConfigStore::at_default_location()?;
    let settings = ConnectionSettings::from(store.load()?);
    tracing::info!(config = %store.location(), brokers = %settings.brokers_field(), "starting");

    let driver = TerminalDriver::new()?;
    let runtime =
        Runtime::new(driver, App::new(settings), Arc::new(KafkaBroker::new()), Arc::new(store));
    runtime.run().await?;

    tracing::info!("exited");
    Ok(())
}

/// The terminal owns stdout, so logs go to a file and only when asked for.
fn init_logging() -> Result<(), Box<dyn std::error::Error>> {
    let Ok(filter) = EnvFilter::try_from_default_env() else {
        return Ok(());
    };

    let path = std::env::temp_dir().join(LOG_FILE_NAME);
    let file = OpenOptions::new().create(true).append(true).open(path)?;

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::sync::Mutex::new(file)).with_ansi(false))
        .try_init()?;
    Ok(())
}
