//! Crawl engine
//!
//! - `dispatcher`: bounded concurrent execution of one wave of requests
//! - `observer`: failure and progress hook
//! - `orchestrator`: directory, first pages, overflow pages, output

pub mod dispatcher;
pub mod error;
pub mod observer;
pub mod orchestrator;

pub use dispatcher::{ConcurrentDispatcher, DispatchOutcome};
pub use error::{CrawlError, CrawlResult};
pub use observer::{CrawlObserver, TracingObserver};
pub use orchestrator::{AdvisorCrawler, CrawlSummary};

#[cfg(any(test, feature = "test-utils"))]
pub use observer::recording::RecordingObserver;
