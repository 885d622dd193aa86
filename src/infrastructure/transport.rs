//! Page transport: turns the crawl's requests into network calls.
//!
//! The trait abstraction lets the dispatcher and orchestrator run
//! against an in-memory site in tests:
//!
//! - [`CamaraTransport`] - the real portal, over [`HttpClient`]
//! - [`mock::MockTransport`] - scripted responses (tests / `test-utils` feature)

use async_trait::async_trait;

use super::config::{camara, AppConfig};
use super::http_client::{FetchError, HttpClient, HttpClientConfig};
use crate::domain::RequestDescriptor;

#[async_trait]
pub trait PageTransport: Send + Sync {
    /// Fetch the page listing every congressperson.
    async fn fetch_directory(&self) -> Result<String, FetchError>;

    /// Fetch the advisors page described by `request`.
    async fn fetch_page(&self, request: &RequestDescriptor) -> Result<String, FetchError>;
}

/// Transport for the Chamber of Deputies portal.
#[derive(Debug, Clone)]
pub struct CamaraTransport {
    client: HttpClient,
    directory_url: String,
    detail_url: String,
    page_size: u32,
}

impl CamaraTransport {
    pub fn new(
        client: HttpClient,
        directory_url: impl Into<String>,
        detail_url: impl Into<String>,
        page_size: u32,
    ) -> Self {
        Self {
            client,
            directory_url: directory_url.into(),
            detail_url: detail_url.into(),
            page_size,
        }
    }

    pub fn from_config(config: &AppConfig) -> Result<Self, FetchError> {
        let client = HttpClient::with_config(HttpClientConfig::from_crawler_config(&config.crawler))?;
        Ok(Self::new(
            client,
            config.site.directory_url.clone(),
            config.site.detail_url.clone(),
            config.site.page_size,
        ))
    }

    /// Form body of the advisors query for `request`.
    pub fn form_for(&self, request: &RequestDescriptor) -> Vec<(&'static str, String)> {
        vec![
            (camara::form::SUBJECT, request.subject_id.clone()),
            (camara::form::OFFSET, request.offset(self.page_size).to_string()),
        ]
    }
}

#[async_trait]
impl PageTransport for CamaraTransport {
    async fn fetch_directory(&self) -> Result<String, FetchError> {
        self.client.get_text(&self.directory_url).await
    }

    async fn fetch_page(&self, request: &RequestDescriptor) -> Result<String, FetchError> {
        self.client
            .post_form_text(&self.detail_url, &self.form_for(request))
            .await
    }
}

#[cfg(any(test, feature = "test-utils"))]
#[allow(clippy::unwrap_used, clippy::missing_panics_doc, clippy::must_use_candidate)]
pub mod mock {
    //! Scripted transport for tests.

    use std::collections::HashMap;
    use std::sync::Mutex;
    use std::time::Duration;

    use async_trait::async_trait;

    use super::{FetchError, PageTransport};
    use crate::domain::RequestDescriptor;

    #[derive(Debug, Clone)]
    enum Scripted {
        Body(String),
        Failure(String),
    }

    /// In-memory site. Unscripted pages fail with a transport error.
    #[derive(Default)]
    pub struct MockTransport {
        directory: Mutex<Option<Scripted>>,
        pages: Mutex<HashMap<(String, u32), (Scripted, Duration)>>,
        page_calls: Mutex<Vec<RequestDescriptor>>,
    }

    impl MockTransport {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn set_directory(&self, body: impl Into<String>) {
            *self.directory.lock().unwrap() = Some(Scripted::Body(body.into()));
        }

        pub fn fail_directory(&self, message: impl Into<String>) {
            *self.directory.lock().unwrap() = Some(Scripted::Failure(message.into()));
        }

        pub fn set_page(&self, subject_id: &str, page: u32, body: impl Into<String>) {
            self.set_page_delayed(subject_id, page, body, Duration::ZERO);
        }

        /// Respond to the page only after `delay`, to control completion order.
        pub fn set_page_delayed(&self, subject_id: &str, page: u32, body: impl Into<String>, delay: Duration) {
            self.pages
                .lock()
                .unwrap()
                .insert((subject_id.to_string(), page), (Scripted::Body(body.into()), delay));
        }

        pub fn fail_page(&self, subject_id: &str, page: u32, message: impl Into<String>) {
            self.pages.lock().unwrap().insert(
                (subject_id.to_string(), page),
                (Scripted::Failure(message.into()), Duration::ZERO),
            );
        }

        /// Every page request received, in arrival order.
        pub fn page_calls(&self) -> Vec<RequestDescriptor> {
            self.page_calls.lock().unwrap().clone()
        }
    }

    fn respond(scripted: Scripted) -> Result<String, FetchError> {
        match scripted {
            Scripted::Body(body) => Ok(body),
            Scripted::Failure(message) => Err(FetchError::Transport(message)),
        }
    }

    #[async_trait]
    impl PageTransport for MockTransport {
        async fn fetch_directory(&self) -> Result<String, FetchError> {
            let scripted = self.directory.lock().unwrap().clone();
            scripted.map_or_else(
                || Err(FetchError::Transport("directory not scripted".to_string())),
                respond,
            )
        }

        async fn fetch_page(&self, request: &RequestDescriptor) -> Result<String, FetchError> {
            self.page_calls.lock().unwrap().push(request.clone());

            let scripted = self
                .pages
                .lock()
                .unwrap()
                .get(&(request.subject_id.clone(), request.page))
                .cloned();

            let Some((scripted, delay)) = scripted else {
                return Err(FetchError::Transport(format!("{request} not scripted")));
            };

            if !delay.is_zero() {
                tokio::time::sleep(delay).await;
            }
            respond(scripted)
        }
    }
}
