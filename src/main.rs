//! m4a2mp4 - Audio to Video Converter
//!
//! Entry point: parses arguments, loads configuration, sets up logging and
//! hands off to the workflow.

use std::process::ExitCode;

use anyhow::Result;
use clap::Parser;
use tracing::{debug, Level};
use tracing_appender::{non_blocking, non_blocking::WorkerGuard, rolling};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use m4a2mp4::cli::Args;
use m4a2mp4::config::{Config, LoggingConfig};
use m4a2mp4::error::{ConvertError, INSTALL_GUIDANCE};
use m4a2mp4::media::CommandRunnerFactory;
use m4a2mp4::workflow::Workflow;

#[tokio::main]
async fn main() -> Result<ExitCode> {
    // Parse command line arguments
    let args = Args::parse();

    // Only read a configuration file when one is given
    let config = match &args.config {
        Some(config_path) => Config::from_file(config_path)?,
        None => Config::default(),
    };

    // Held until exit so buffered file logs get flushed
    let _guard = setup_logging(args.verbose, &config.logging)?;
    debug!("Starting m4a2mp4");

    let workflow = Workflow::new(config, CommandRunnerFactory::create_runner());

    match workflow.run(&args).await {
        Ok(()) => Ok(ExitCode::SUCCESS),
        Err(ConvertError::ToolchainUnavailable(reason)) => {
            debug!("Toolchain check failed: {}", reason);
            eprintln!("❌ Error: FFmpeg is not installed or not available in PATH.");
            eprintln!("{}", INSTALL_GUIDANCE);
            Ok(ExitCode::FAILURE)
        }
        Err(e) => {
            eprintln!("❌ Error: {}", e);
            Ok(ExitCode::FAILURE)
        }
    }
}

/// Setup logging to the console and, when configured, a daily rotated file
fn setup_logging(verbose: bool, logging: &LoggingConfig) -> Result<Option<WorkerGuard>> {
    // Determine log level
    let log_level = if verbose { Level::DEBUG } else { Level::INFO };

    // Console layer writes to stderr so stdout carries only the report
    let console_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false);

    // Create file layer
    let (file_layer, guard) = match &logging.directory {
        Some(log_dir) => {
            std::fs::create_dir_all(log_dir)?;
            let file_appender = rolling::daily(log_dir, "m4a2mp4.log");
            let (non_blocking_file, guard) = non_blocking(file_appender);

            let layer = fmt::layer()
                .with_writer(non_blocking_file)
                .with_target(false)
                .with_thread_ids(true)
                .with_file(true)
                .with_line_number(true)
                .with_ansi(false); // No ANSI colors in file

            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    // Setup layered subscriber
    tracing_subscriber::registry()
        .with(EnvFilter::new(format!("m4a2mp4={}", log_level)))
        .with(console_layer)
        .with(file_layer)
        .try_init()
        .map_err(|e| anyhow::anyhow!("Failed to initialize logging: {}", e))?;

    match &logging.directory {
        Some(log_dir) => debug!("Logging initialized - console: {}, file: {}",
            log_level, log_dir.join("m4a2mp4.log").display()),
        None => debug!("Logging initialized - console: {}", log_level),
    }

    Ok(guard)
}
