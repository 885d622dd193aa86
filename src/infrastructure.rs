//! Infrastructure layer: network access, HTML parsing, configuration,
//! logging and the output file.

pub mod config;
pub mod http_client;
pub mod logging;
pub mod output;
pub mod parsing;
pub mod transport;

pub use config::{AppConfig, ConfigError, ConfigManager};
pub use http_client::{FetchError, HttpClient, HttpClientConfig};
pub use output::{dated_output_path, output_file_name, AdvisorCsvWriter, OutputCompression, OutputError};
pub use parsing::{AdvisorPageParser, DirectoryParser, HtmlParser, ParsingError, ParsingResult, ParsingSelectors};
pub use transport::{CamaraTransport, PageTransport};
