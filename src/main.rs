use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{error, info, warn};

use deputies_advisors::crawling::{AdvisorCrawler, TracingObserver};
use deputies_advisors::infrastructure::config::ConfigManager;
use deputies_advisors::infrastructure::logging::init_logging_with_config;
use deputies_advisors::infrastructure::output::{dated_output_path, OutputCompression};
use deputies_advisors::infrastructure::transport::CamaraTransport;

#[derive(Parser)]
#[command(name = "deputies-advisors")]
#[command(about = "Collect the advisors of every congressperson into a dated CSV file", long_about = None)]
struct Cli {
    /// Configuration file (JSON, TOML or YAML)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Maximum concurrent page requests
    #[arg(long)]
    workers: Option<usize>,

    /// Directory receiving the output file
    #[arg(long)]
    data_dir: Option<PathBuf>,

    /// Write plain CSV instead of xz
    #[arg(long)]
    no_compress: bool,

    /// Log level or filter directives (e.g. "debug")
    #[arg(long)]
    log_level: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let manager = cli.config.map_or_else(ConfigManager::new, ConfigManager::with_file);
    let mut config = manager.load_config().context("Failed to load configuration")?;

    if let Some(workers) = cli.workers {
        config.crawler.max_concurrent_requests = workers;
    }
    if let Some(data_dir) = cli.data_dir {
        config.output.data_dir = data_dir;
    }
    if cli.no_compress {
        config.output.compress = false;
    }
    if let Some(level) = cli.log_level {
        config.logging.level = level;
    }
    config.validate().context("Invalid configuration")?;

    init_logging_with_config(&config.logging)?;

    std::fs::create_dir_all(&config.output.data_dir)
        .with_context(|| format!("Failed to create data directory {:?}", config.output.data_dir))?;
    let destination = dated_output_path(
        &config.output.data_dir,
        OutputCompression::from_flag(config.output.compress),
    );
    info!("Writing advisors to {:?}", destination);

    let transport = Arc::new(CamaraTransport::from_config(&config)?);
    let crawler = AdvisorCrawler::new(&config, transport, Arc::new(TracingObserver), destination)?;

    let summary = match crawler.run().await {
        Ok(summary) => summary,
        Err(e) => {
            error!("Crawl aborted: {}", e);
            return Err(e.into());
        }
    };

    println!("{}", serde_json::to_string_pretty(&summary)?);
    match output_location(crawler.destination()) {
        Some(message) => info!("{}", message),
        None => warn!("Done, but no records were written to {}", crawler.destination().display()),
    }
    Ok(())
}

/// Closing line pointing at the output file, `None` when it was never created.
fn output_location(destination: &Path) -> Option<String> {
    destination
        .exists()
        .then(|| format!("Done! Advisors can be found at {}", destination.display()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn output_location_names_written_file() {
        let dir = tempfile::tempdir().unwrap();
        let destination = dir.path().join("advisors.csv");
        std::fs::write(&destination, "\"point\"\n").unwrap();

        let message = output_location(&destination).unwrap();
        assert!(message.starts_with("Done!"));
        assert!(message.ends_with(&destination.display().to_string()));
    }

    #[test]
    fn output_location_is_none_without_file() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(output_location(&dir.path().join("advisors.csv")), None);
    }
}
