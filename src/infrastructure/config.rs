//! Configuration infrastructure
//!
//! Contains configuration loading and management for the advisors crawl.
//!
//! Configuration is resolved in three layers, later layers winning:
//! 1. Built-in defaults (`AppConfig::default()`)
//! 2. An optional config file (JSON, TOML or YAML, by extension)
//! 3. `DEPUTIES_ADVISORS__*` environment variables
//!    (e.g. `DEPUTIES_ADVISORS__CRAWLER__MAX_CONCURRENT_REQUESTS=16`)

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::info;

use crate::infrastructure::parsing::ParsingSelectors;

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to load configuration: {0}")]
    Load(#[from] config::ConfigError),

    #[error("Invalid configuration: {message}")]
    Validation { message: String },

    #[error("Configuration file not found: {0}")]
    NotFound(PathBuf),
}

/// Complete application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Target site endpoints and page geometry
    pub site: SiteConfig,

    /// Worker pool and HTTP behaviour
    pub crawler: CrawlerConfig,

    /// Output file settings
    pub output: OutputConfig,

    /// Logging configuration
    pub logging: LoggingConfig,

    /// CSS selectors used by the page parsers
    pub selectors: ParsingSelectors,
}

/// Endpoints of the Chamber of Deputies transparency portal
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    /// Page listing every congressperson (GET)
    pub directory_url: String,

    /// Advisors table for one congressperson (POST)
    pub detail_url: String,

    /// Rows per advisors page; fixed by the site
    pub page_size: u32,
}

/// Worker pool and HTTP client settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CrawlerConfig {
    /// Maximum concurrent detail requests (worker pool size)
    pub max_concurrent_requests: usize,

    /// Request timeout in seconds
    pub request_timeout_seconds: u64,

    /// User agent sent with every request
    pub user_agent: String,

    /// Follow HTTP redirects
    pub follow_redirects: bool,
}

/// Output settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Directory receiving the dated output file
    pub data_dir: PathBuf,

    /// Write an xz-compressed file instead of plain CSV
    pub compress: bool,
}

/// Logging configuration settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level: "error", "warn", "info", "debug", "trace"
    pub level: String,

    /// Enable JSON formatted logs
    pub json_format: bool,

    /// Enable console output
    pub console_output: bool,

    /// Enable file output
    pub file_output: bool,

    /// Directory for log files
    pub log_dir: PathBuf,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            directory_url: camara::ADVISORS_URL.to_string(),
            detail_url: camara::ADVISORS_URL.to_string(),
            page_size: defaults::PAGE_SIZE,
        }
    }
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            max_concurrent_requests: defaults::MAX_CONCURRENT_REQUESTS,
            request_timeout_seconds: defaults::REQUEST_TIMEOUT_SECONDS,
            user_agent: defaults::USER_AGENT.to_string(),
            follow_redirects: true,
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from(defaults::DATA_DIR),
            compress: true,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: defaults::LOG_LEVEL.to_string(),
            json_format: defaults::LOG_JSON_FORMAT,
            console_output: defaults::LOG_CONSOLE_OUTPUT,
            file_output: defaults::LOG_FILE_OUTPUT,
            log_dir: PathBuf::from(defaults::LOG_DIR),
        }
    }
}

impl AppConfig {
    /// Check values that would make the crawl meaningless or hang.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.crawler.max_concurrent_requests == 0 {
            return Err(ConfigError::Validation {
                message: "crawler.max_concurrent_requests must be greater than 0".to_string(),
            });
        }

        if self.site.page_size == 0 {
            return Err(ConfigError::Validation {
                message: "site.page_size must be greater than 0".to_string(),
            });
        }

        for (name, value) in [
            ("site.directory_url", &self.site.directory_url),
            ("site.detail_url", &self.site.detail_url),
        ] {
            if let Err(e) = url::Url::parse(value) {
                return Err(ConfigError::Validation {
                    message: format!("{name} is not a valid URL ({value}): {e}"),
                });
            }
        }

        Ok(())
    }
}

/// Resolves the layered configuration
#[derive(Debug, Clone, Default)]
pub struct ConfigManager {
    config_path: Option<PathBuf>,
    env_source: Option<config::Map<String, String>>,
}

impl ConfigManager {
    /// Environment variable prefix, separated from the key path by `__`
    pub const ENV_PREFIX: &'static str = "DEPUTIES_ADVISORS";

    /// Defaults plus environment, no file
    pub const fn new() -> Self {
        Self {
            config_path: None,
            env_source: None,
        }
    }

    /// Layer an explicit config file over the defaults
    pub fn with_file(path: impl Into<PathBuf>) -> Self {
        Self {
            config_path: Some(path.into()),
            env_source: None,
        }
    }

    /// Read environment overrides from `vars` instead of the process environment
    #[must_use]
    pub fn with_env_source(mut self, vars: config::Map<String, String>) -> Self {
        self.env_source = Some(vars);
        self
    }

    /// Default location of the optional user config file
    pub fn get_config_dir() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("deputies-advisors"))
    }

    /// Load, merge and validate the configuration
    pub fn load_config(&self) -> Result<AppConfig, ConfigError> {
        let defaults = config::Config::try_from(&AppConfig::default())?;
        let mut builder = config::Config::builder().add_source(defaults);

        if let Some(path) = &self.config_path {
            if !path.exists() {
                return Err(ConfigError::NotFound(path.clone()));
            }
            builder = builder.add_source(config::File::from(path.as_path()));
        } else if let Some(path) = Self::default_config_file() {
            builder = builder.add_source(config::File::from(path.as_path()).required(false));
        }

        let settings = builder
            .add_source(
                config::Environment::with_prefix(Self::ENV_PREFIX)
                    .prefix_separator("__")
                    .separator("__")
                    .source(self.env_source.clone()),
            )
            .build()?;

        let config: AppConfig = settings.try_deserialize()?;
        config.validate()?;

        if let Some(path) = &self.config_path {
            info!("Loaded configuration from: {:?}", path);
        }
        Ok(config)
    }

    fn default_config_file() -> Option<PathBuf> {
        Self::get_config_dir()
            .map(|dir| dir.join("config.json"))
            .filter(|path| path.exists())
    }

    /// Get the explicit configuration file path, if any
    pub fn config_path(&self) -> Option<&Path> {
        self.config_path.as_deref()
    }
}

/// Chamber of Deputies transparency portal constants
pub mod camara {
    /// Page serving both the congressperson `<select>` and, via POST, each advisors table
    pub const ADVISORS_URL: &str = "http://www2.camara.leg.br/transparencia/recursos-humanos/servidores/lotacao/consulta-secretarios-parlamentares/layouts_transpar_quadroremuner_consultaSecretariosParlamentares";

    /// Form fields of the advisors query
    pub mod form {
        /// Congressperson id (the `<select id="lotacao">` value)
        pub const SUBJECT: &str = "lotacao";

        /// Zero-based row offset
        pub const OFFSET: &str = "b_start:int";
    }
}

/// Default configuration values
pub mod defaults {
    /// Rows per advisors page
    pub const PAGE_SIZE: u32 = crate::domain::DEFAULT_PAGE_SIZE;

    /// Worker pool size
    pub const MAX_CONCURRENT_REQUESTS: usize = 8;

    /// Request timeout in seconds
    pub const REQUEST_TIMEOUT_SECONDS: u64 = 30;

    /// Desktop browser user agent; the portal serves a reduced page to unknown agents
    pub const USER_AGENT: &str = "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/46.0.2490.86 Safari/537.36";

    /// Output directory, relative to the working directory
    pub const DATA_DIR: &str = "data";

    /// Log directory, relative to the working directory
    pub const LOG_DIR: &str = "logs";

    pub const LOG_LEVEL: &str = "info";
    pub const LOG_JSON_FORMAT: bool = false;
    pub const LOG_CONSOLE_OUTPUT: bool = true;
    pub const LOG_FILE_OUTPUT: bool = false;
}
