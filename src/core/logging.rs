//! Logging Module
//!
//! Wires the `log` facade used throughout the library into a `tracing`
//! subscriber:
//! - stderr output, human-readable or JSON
//! - optional daily-rolling JSON file output
//! - `RUST_LOG` overrides the configured level

use std::fs;
use std::io;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{
    layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer, Registry,
};

use crate::config::LoggingConfig;

const LOG_FILE_PREFIX: &str = "dcc-statblock.log";

/// Build the filter: `RUST_LOG` first, then the configured directive,
/// then `info` if the configured directive does not parse.
fn env_filter(config: &LoggingConfig) -> EnvFilter {
    EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.level))
        .unwrap_or_else(|_| EnvFilter::new("info"))
}

/// Initialize the logging system.
///
/// This sets up:
/// 1. A stderr logger (pretty or JSON) so stdout stays clean for output.
/// 2. An optional file logger (JSON) in `config.file_dir`.
/// 3. Redirects standard `log` crate events to `tracing`.
///
/// Returns a `WorkerGuard` when a file logger is active; keep it alive for
/// the duration of the program so buffered lines are flushed.
pub fn init(config: &LoggingConfig) -> Option<WorkerGuard> {
    let mut layers: Vec<Box<dyn Layer<Registry> + Send + Sync>> = Vec::new();

    // Stderr Layer: JSON for machine consumers, compact otherwise
    if config.json {
        layers.push(
            tracing_subscriber::fmt::layer()
                .with_writer(io::stderr)
                .json()
                .with_target(true)
                .with_filter(env_filter(config))
                .boxed(),
        );
    } else {
        layers.push(
            tracing_subscriber::fmt::layer()
                .with_writer(io::stderr)
                .with_target(false)
                .with_filter(env_filter(config))
                .boxed(),
        );
    }

    // File Layer: JSON format for easy parsing/ingestion
    let mut guard = None;
    if let Some(dir) = &config.file_dir {
        match fs::create_dir_all(dir) {
            Ok(()) => {
                let file_appender = tracing_appender::rolling::daily(dir, LOG_FILE_PREFIX);
                let (non_blocking, worker_guard) = tracing_appender::non_blocking(file_appender);
                guard = Some(worker_guard);
                layers.push(
                    tracing_subscriber::fmt::layer()
                        .with_writer(non_blocking)
                        .json()
                        .with_file(true)
                        .with_line_number(true)
                        .with_target(true)
                        .with_filter(env_filter(config))
                        .boxed(),
                );
            }
            Err(e) => eprintln!("Failed to create log directory {}: {}", dir.display(), e),
        }
    }

    if let Err(e) = tracing_subscriber::registry().with(layers).try_init() {
        eprintln!("Failed to initialize tracing subscriber: {}", e);
        return guard;
    }

    // Redirect standard `log` macros to `tracing`. `try_init` already does
    // this when tracing-subscriber's own bridge is compiled in.
    let _ = tracing_log::LogTracer::init();

    if let Some(dir) = &config.file_dir {
        log::debug!("Logging initialized, writing to {:?}", dir.join(LOG_FILE_PREFIX));
    }

    guard
}
