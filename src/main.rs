//! SpyWeb - persistent page-region masking
//!
//! Command line entry point for inspecting and managing persisted masks.

mod cli;
mod cmd_store;

use clap::Parser;
use tracing::{debug, warn};
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use spyweb_config::{Config, ConfigLoader, ConfigValidator, LoggingConfig};

use crate::cli::Cli;
use crate::cmd_store::{Stores, handle_command};

/// Initialize tracing with console and file output.
///
/// Log files are written to the configured log directory with daily rotation.
fn init_tracing(logging: &LoggingConfig) -> Result<(), Box<dyn std::error::Error>> {
    let log_dir = logging.log_dir();
    std::fs::create_dir_all(&log_dir)?;

    let file_appender = RollingFileAppender::builder()
        .rotation(Rotation::DAILY)
        .filename_prefix("spyweb")
        .filename_suffix("log")
        .max_log_files(14)
        .build(&log_dir)?;

    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    // Keeps the background writer alive until exit.
    static GUARD: std::sync::OnceLock<tracing_appender::non_blocking::WorkerGuard> =
        std::sync::OnceLock::new();
    let _ = GUARD.set(guard);

    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&logging.level));

    tracing_subscriber::registry()
        .with(env_filter)
        // Console goes to stderr so command output stays pipeable.
        .with(
            fmt::layer()
                .with_target(true)
                .with_writer(std::io::stderr),
        )
        .with(fmt::layer().with_writer(non_blocking).with_ansi(false))
        .init();

    Ok(())
}

fn load_config(cli: &Cli) -> Result<Config, Box<dyn std::error::Error>> {
    let config = match &cli.config {
        Some(path) => ConfigLoader::load(path)?,
        None => ConfigLoader::load_or_default(&Config::default_path())?,
    };
    Ok(config)
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let config = load_config(&cli)?;

    init_tracing(&config.logging)?;

    for warning in ConfigValidator::validate(&config)?.into_result()? {
        warn!("Config {}: {}", warning.path, warning.message);
    }
    debug!(storage = %config.storage.path.display(), "Opening mask storage");

    let stores = Stores::open(&config).await?;
    let output = handle_command(cli.command, &stores).await?;
    println!("{}", output);

    Ok(())
}
