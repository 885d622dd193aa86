//! Logging system configuration and initialization
//!
//! - Console and/or file output, file output rotated daily
//! - Structured JSON logging (optional)
//! - Level from configuration, overridable with `RUST_LOG`

use std::sync::Mutex;

use anyhow::{anyhow, Result};
use once_cell::sync::Lazy;
use tracing::info;
use tracing_appender::{non_blocking, non_blocking::WorkerGuard, rolling};
use tracing_subscriber::{
    fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer, Registry,
};

pub use crate::infrastructure::config::LoggingConfig;

const LOG_FILE_NAME: &str = "deputies-advisors.log";

// Keeps the non-blocking file writer alive for the life of the process
static LOG_GUARDS: Lazy<Mutex<Vec<WorkerGuard>>> = Lazy::new(|| Mutex::new(Vec::new()));

type BoxedLayer = Box<dyn Layer<Registry> + Send + Sync>;

/// Initialize logging with default configuration
pub fn init_logging() -> Result<()> {
    init_logging_with_config(&LoggingConfig::default())
}

/// Build the filter for `level`.
///
/// HTTP client internals are held at `warn` unless `trace` is requested.
/// `RUST_LOG`, when set, replaces the whole filter:
/// ```bash
/// RUST_LOG="debug,reqwest=debug,hyper=debug" deputies-advisors
/// ```
pub fn build_env_filter(level: &str) -> Result<EnvFilter> {
    if let Ok(filter) = EnvFilter::try_from_default_env() {
        return Ok(filter);
    }

    let mut filter = EnvFilter::try_new(level).map_err(|e| anyhow!("Invalid log level '{}': {}", level, e))?;

    if !level.to_lowercase().contains("trace") {
        for directive in ["reqwest=warn", "hyper=warn", "hyper_util=warn", "h2=warn", "html5ever=warn"] {
            filter = filter.add_directive(directive.parse()?);
        }
    }

    Ok(filter)
}

/// Initialize logging with custom configuration
///
/// Fails when no output is enabled or a global subscriber is already set.
pub fn init_logging_with_config(config: &LoggingConfig) -> Result<()> {
    if !config.console_output && !config.file_output {
        return Err(anyhow!("No logging output configured"));
    }

    let env_filter = build_env_filter(&config.level)?;
    let mut layers: Vec<BoxedLayer> = Vec::new();

    if config.file_output {
        std::fs::create_dir_all(&config.log_dir)
            .map_err(|e| anyhow!("Failed to create log directory {:?}: {}", config.log_dir, e))?;

        let (file_writer, guard) = non_blocking(rolling::daily(&config.log_dir, LOG_FILE_NAME));
        LOG_GUARDS
            .lock()
            .map_err(|_| anyhow!("Log guard store poisoned"))?
            .push(guard);

        let file_layer = fmt::layer().with_writer(file_writer).with_ansi(false);
        layers.push(if config.json_format {
            file_layer
                .json()
                .with_target(true)
                .with_thread_ids(true)
                .with_file(true)
                .with_line_number(true)
                .boxed()
        } else {
            file_layer.with_target(false).boxed()
        });
    }

    if config.console_output {
        let console_layer = fmt::layer().with_writer(std::io::stderr).with_target(false);
        layers.push(if config.json_format && !config.file_output {
            console_layer.json().boxed()
        } else {
            console_layer.boxed()
        });
    }

    Registry::default()
        .with(layers)
        .with(env_filter)
        .try_init()
        .map_err(|e| anyhow!("Failed to install tracing subscriber: {}", e))?;

    info!(
        "Logging initialized (level: {}, console: {}, file: {}, json: {})",
        config.level, config.console_output, config.file_output, config.json_format
    );
    if config.file_output {
        info!("Log directory: {:?}", config.log_dir);
    }

    Ok(())
}
