//! Concurrent dispatcher
//!
//! Executes one wave of page requests with a bounded number in flight.
//! Each request is fetched, parsed and checked against the congressperson
//! and page the site actually served. Outcomes are yielded as they complete, not
//! in submission order.

use std::panic::AssertUnwindSafe;
use std::sync::Arc;

use futures::FutureExt;
use tokio::sync::{mpsc, Semaphore};
use tokio_stream::wrappers::ReceiverStream;
use tracing::{debug, info};

use super::error::{CrawlError, CrawlResult};
use super::observer::CrawlObserver;
use crate::domain::{PageResult, RequestDescriptor, Wave};
use crate::infrastructure::parsing::{AdvisorPageParser, HtmlParser};
use crate::infrastructure::transport::PageTransport;

/// Result of one request, paired with the request that produced it.
#[derive(Debug)]
pub struct DispatchOutcome {
    pub descriptor: RequestDescriptor,
    pub result: CrawlResult<PageResult>,
}

#[derive(Clone)]
pub struct ConcurrentDispatcher {
    transport: Arc<dyn PageTransport>,
    parser: Arc<AdvisorPageParser>,
    observer: Arc<dyn CrawlObserver>,
    max_concurrent: usize,
}

impl ConcurrentDispatcher {
    pub fn new(
        transport: Arc<dyn PageTransport>,
        parser: Arc<AdvisorPageParser>,
        observer: Arc<dyn CrawlObserver>,
        max_concurrent: usize,
    ) -> Self {
        Self {
            transport,
            parser,
            observer,
            max_concurrent: max_concurrent.max(1),
        }
    }

    pub const fn max_concurrent(&self) -> usize {
        self.max_concurrent
    }

    /// Start every request of `wave` and stream the outcomes in completion order.
    ///
    /// Failed requests are reported to the observer and still yielded, as
    /// `Err`; they never cancel the others. The stream ends once every
    /// request has completed. Must be called inside a tokio runtime.
    pub fn run(&self, wave: Wave, descriptors: Vec<RequestDescriptor>) -> ReceiverStream<DispatchOutcome> {
        info!(
            "Starting {} with {} requests, at most {} concurrent",
            wave,
            descriptors.len(),
            self.max_concurrent
        );

        let (tx, rx) = mpsc::channel(descriptors.len().max(1));
        let semaphore = Arc::new(Semaphore::new(self.max_concurrent));

        for descriptor in descriptors {
            let tx = tx.clone();
            let semaphore = Arc::clone(&semaphore);
            let transport = Arc::clone(&self.transport);
            let parser = Arc::clone(&self.parser);
            let observer = Arc::clone(&self.observer);

            tokio::spawn(async move {
                let result = match semaphore.acquire_owned().await {
                    Ok(_permit) => AssertUnwindSafe(execute(transport.as_ref(), &parser, &descriptor))
                        .catch_unwind()
                        .await
                        .unwrap_or_else(|_| Err(CrawlError::Worker(format!("worker for {descriptor} panicked")))),
                    Err(_) => Err(CrawlError::Worker("semaphore closed".to_string())),
                };

                if let Err(error) = &result {
                    observer.on_failure(&descriptor, error);
                }

                if tx.send(DispatchOutcome { descriptor, result }).await.is_err() {
                    debug!("Outcome receiver dropped, discarding result");
                }
            });
        }

        ReceiverStream::new(rx)
    }
}

async fn execute(
    transport: &dyn PageTransport,
    parser: &AdvisorPageParser,
    descriptor: &RequestDescriptor,
) -> CrawlResult<PageResult> {
    let html = transport.fetch_page(descriptor).await?;
    let page = parser.parse(&html)?;

    if page.subject.id != descriptor.subject_id {
        return Err(CrawlError::subject_mismatch(&descriptor.subject_id, &page.subject.id));
    }
    if page.current_page != descriptor.page {
        return Err(CrawlError::PageMismatch {
            requested: descriptor.page,
            served: page.current_page,
        });
    }

    debug!("Fetched {} ({} rows)", descriptor, page.rows.len());
    Ok(page)
}
