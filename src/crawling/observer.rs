//! Crawl observer hook
//!
//! The crawl never aborts on a per-page error. Instead each failure is
//! handed to a [`CrawlObserver`] together with the request that caused it.

use tracing::{info, warn};

use super::error::CrawlError;
use crate::domain::{RequestDescriptor, Wave};

pub trait CrawlObserver: Send + Sync {
    /// A page could not be fetched, parsed, checked or written.
    fn on_failure(&self, request: &RequestDescriptor, error: &CrawlError);

    /// A page was written to the output.
    fn on_page_done(&self, _request: &RequestDescriptor) {}

    /// A wave is about to be dispatched with `count` requests.
    fn on_wave_planned(&self, _wave: Wave, _count: usize) {}
}

/// Reports crawl events through `tracing`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingObserver;

impl CrawlObserver for TracingObserver {
    fn on_failure(&self, request: &RequestDescriptor, error: &CrawlError) {
        warn!("{} failed: {}", request, error);
    }

    fn on_page_done(&self, request: &RequestDescriptor) {
        info!("{} written", request);
    }

    fn on_wave_planned(&self, wave: Wave, count: usize) {
        info!("Dispatching {} with {} requests", wave, count);
    }
}

#[cfg(any(test, feature = "test-utils"))]
#[allow(clippy::unwrap_used, clippy::missing_panics_doc, clippy::must_use_candidate)]
pub mod recording {
    //! Observer that remembers every event, for assertions in tests.

    use std::sync::Mutex;

    use super::CrawlObserver;
    use crate::crawling::error::CrawlError;
    use crate::domain::{RequestDescriptor, Wave};

    #[derive(Debug, Default)]
    pub struct RecordingObserver {
        failures: Mutex<Vec<(RequestDescriptor, String)>>,
        completed: Mutex<Vec<RequestDescriptor>>,
        waves: Mutex<Vec<(Wave, usize)>>,
    }

    impl RecordingObserver {
        pub fn new() -> Self {
            Self::default()
        }

        /// Failed requests with the rendered error, in report order.
        pub fn failures(&self) -> Vec<(RequestDescriptor, String)> {
            self.failures.lock().unwrap().clone()
        }

        /// Written pages, in completion order.
        pub fn completed(&self) -> Vec<RequestDescriptor> {
            self.completed.lock().unwrap().clone()
        }

        pub fn waves(&self) -> Vec<(Wave, usize)> {
            self.waves.lock().unwrap().clone()
        }
    }

    impl CrawlObserver for RecordingObserver {
        fn on_failure(&self, request: &RequestDescriptor, error: &CrawlError) {
            self.failures
                .lock()
                .unwrap()
                .push((request.clone(), error.to_string()));
        }

        fn on_page_done(&self, request: &RequestDescriptor) {
            self.completed.lock().unwrap().push(request.clone());
        }

        fn on_wave_planned(&self, wave: Wave, count: usize) {
            self.waves.lock().unwrap().push((wave, count));
        }
    }
}
