//! HTTP client for the advisors portal
//!
//! Thin wrapper over `reqwest` that applies the configured user agent,
//! timeout and redirect policy, and turns non-2xx responses into errors.

use std::time::Duration;

use reqwest::{Client, ClientBuilder};
use thiserror::Error;
use tracing::debug;

use crate::infrastructure::config::CrawlerConfig;

/// Errors raised while fetching a page
#[derive(Debug, Error)]
pub enum FetchError {
    /// Connection, timeout or body read failure
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// Server answered with a non-success status
    #[error("HTTP request failed with status {status}: {url}")]
    HttpStatus { status: u16, url: String },

    /// Failure reported by a non-HTTP transport
    #[error("Transport error: {0}")]
    Transport(String),
}

/// Configuration for HTTP client behavior
#[derive(Debug, Clone)]
pub struct HttpClientConfig {
    /// Request timeout in seconds
    pub timeout_seconds: u64,
    /// User agent string
    pub user_agent: String,
    /// Whether to follow redirects
    pub follow_redirects: bool,
}

impl HttpClientConfig {
    pub fn from_crawler_config(crawler: &CrawlerConfig) -> Self {
        Self {
            timeout_seconds: crawler.request_timeout_seconds,
            user_agent: crawler.user_agent.clone(),
            follow_redirects: crawler.follow_redirects,
        }
    }
}

impl Default for HttpClientConfig {
    fn default() -> Self {
        Self::from_crawler_config(&CrawlerConfig::default())
    }
}

/// HTTP client shared by every worker; cloning is cheap
#[derive(Debug, Clone)]
pub struct HttpClient {
    client: Client,
    config: HttpClientConfig,
}

impl HttpClient {
    /// Create a new HTTP client with custom configuration
    pub fn with_config(config: HttpClientConfig) -> Result<Self, FetchError> {
        let client = ClientBuilder::new()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .user_agent(&config.user_agent)
            .cookie_store(true)
            .gzip(true)
            .redirect(if config.follow_redirects {
                reqwest::redirect::Policy::limited(10)
            } else {
                reqwest::redirect::Policy::none()
            })
            .build()?;

        Ok(Self { client, config })
    }

    /// GET `url` and return the body
    pub async fn get_text(&self, url: &str) -> Result<String, FetchError> {
        debug!("GET {}", url);
        let response = self.client.get(url).send().await?;
        Self::into_text(url, response).await
    }

    /// POST `form` as `application/x-www-form-urlencoded` and return the body
    pub async fn post_form_text(&self, url: &str, form: &[(&str, String)]) -> Result<String, FetchError> {
        debug!("POST {} {:?}", url, form);
        let response = self.client.post(url).form(form).send().await?;
        Self::into_text(url, response).await
    }

    async fn into_text(url: &str, response: reqwest::Response) -> Result<String, FetchError> {
        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::HttpStatus {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        let text = response.text().await?;
        debug!("Fetched {} ({} chars)", url, text.len());
        Ok(text)
    }

    /// Get the configuration
    pub const fn config(&self) -> &HttpClientConfig {
        &self.config
    }
}
