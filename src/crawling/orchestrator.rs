//! Two-wave crawl orchestration
//!
//! 1. fetch and parse the directory (fatal on error)
//! 2. wave 1: page 1 of every congressperson
//! 3. wave 2: every overflow page discovered in wave 1
//!
//! Wave 2 is only built once wave 1 has fully drained, so the overflow
//! descriptors are the return value of the first wave. Each parsed page
//! is normalized and appended to the output as soon as it arrives.

use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tokio_stream::StreamExt;
use tracing::{info, warn};

use super::dispatcher::{ConcurrentDispatcher, DispatchOutcome};
use super::error::CrawlResult;
use super::observer::CrawlObserver;
use crate::domain::{build_request, normalize, PageResult, PaginationPlanner, RequestDescriptor, Subject, Wave};
use crate::infrastructure::config::AppConfig;
use crate::infrastructure::output::{AdvisorCsvWriter, OutputCompression};
use crate::infrastructure::parsing::{AdvisorPageParser, DirectoryParser, HtmlParser};
use crate::infrastructure::transport::PageTransport;

/// What a finished crawl did.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CrawlSummary {
    /// Distinct congresspeople listed in the directory
    pub subjects: usize,
    /// First pages written
    pub wave_one_pages: usize,
    /// Overflow pages written
    pub overflow_pages: usize,
    pub records_written: usize,
    /// Every request that failed, in completion order
    pub failures: Vec<RequestDescriptor>,
    /// Subject ids whose first page failed; their later pages were never known
    pub subjects_without_first_page: Vec<String>,
}

#[derive(Debug, Default)]
struct WaveReport {
    pages_written: usize,
    overflow: Vec<RequestDescriptor>,
}

pub struct AdvisorCrawler {
    transport: Arc<dyn PageTransport>,
    observer: Arc<dyn CrawlObserver>,
    directory_parser: DirectoryParser,
    dispatcher: ConcurrentDispatcher,
    writer: AdvisorCsvWriter,
    destination: PathBuf,
}

impl AdvisorCrawler {
    /// Build a crawler writing to `destination` with settings from `config`.
    pub fn new(
        config: &AppConfig,
        transport: Arc<dyn PageTransport>,
        observer: Arc<dyn CrawlObserver>,
        destination: impl Into<PathBuf>,
    ) -> CrawlResult<Self> {
        let page_parser = Arc::new(AdvisorPageParser::with_config(&config.selectors)?);
        let dispatcher = ConcurrentDispatcher::new(
            Arc::clone(&transport),
            page_parser,
            Arc::clone(&observer),
            config.crawler.max_concurrent_requests,
        );

        Ok(Self {
            directory_parser: DirectoryParser::with_config(&config.selectors)?,
            writer: AdvisorCsvWriter::new(OutputCompression::from_flag(config.output.compress)),
            destination: destination.into(),
            transport,
            observer,
            dispatcher,
        })
    }

    pub fn destination(&self) -> &Path {
        &self.destination
    }

    /// Run the whole crawl.
    ///
    /// Only a directory failure aborts; every per-page failure is reported
    /// to the observer and listed in the summary.
    pub async fn run(&self) -> CrawlResult<CrawlSummary> {
        let subjects = self.load_directory().await?;
        info!("Found {} congresspeople", subjects.len());

        let mut summary = CrawlSummary {
            subjects: subjects.len(),
            ..CrawlSummary::default()
        };
        let mut planner = PaginationPlanner::new();

        let first_pages: Vec<_> = subjects.iter().map(|subject| build_request(subject, 1)).collect();
        let wave_one = self
            .run_wave(Wave::FirstPages, first_pages, Some(&mut planner), &mut summary)
            .await;
        summary.wave_one_pages = wave_one.pages_written;

        info!(
            "Found {} more pages for {} congresspeople",
            wave_one.overflow.len(),
            planner.planned_subjects()
        );
        let wave_two = self
            .run_wave(Wave::Overflow, wave_one.overflow, None, &mut summary)
            .await;
        summary.overflow_pages = wave_two.pages_written;

        if !summary.subjects_without_first_page.is_empty() {
            warn!(
                "{} congresspeople have no advisors data: first page failed ({})",
                summary.subjects_without_first_page.len(),
                summary.subjects_without_first_page.join(", ")
            );
        }
        info!(
            "Crawl finished: {} records from {} pages, {} failures",
            summary.records_written,
            summary.wave_one_pages + summary.overflow_pages,
            summary.failures.len()
        );

        Ok(summary)
    }

    /// Fetch the directory, keeping the first entry of each congressperson id.
    async fn load_directory(&self) -> CrawlResult<Vec<Subject>> {
        let html = self.transport.fetch_directory().await?;
        let listed = self.directory_parser.parse(&html)?;

        let mut seen = HashSet::new();
        let subjects: Vec<_> = listed
            .into_iter()
            .filter(|subject| {
                let first = seen.insert(subject.id.clone());
                if !first {
                    warn!("Directory lists {} more than once, skipping {}", subject.id, subject.name);
                }
                first
            })
            .collect();
        Ok(subjects)
    }

    /// Dispatch `descriptors` and handle each outcome as it completes.
    ///
    /// Overflow pages are planned only when a planner is given.
    async fn run_wave(
        &self,
        wave: Wave,
        descriptors: Vec<RequestDescriptor>,
        mut planner: Option<&mut PaginationPlanner>,
        summary: &mut CrawlSummary,
    ) -> WaveReport {
        self.observer.on_wave_planned(wave, descriptors.len());

        let mut report = WaveReport::default();
        let mut outcomes = self.dispatcher.run(wave, descriptors);

        while let Some(DispatchOutcome { descriptor, result }) = outcomes.next().await {
            let page = match result {
                Ok(page) => page,
                Err(_) => {
                    // already reported by the dispatcher
                    if wave == Wave::FirstPages {
                        summary.subjects_without_first_page.push(descriptor.subject_id.clone());
                    }
                    summary.failures.push(descriptor);
                    continue;
                }
            };

            if let Some(planner) = planner.as_deref_mut() {
                report.overflow.extend(planner.plan(&page));
            }

            match self.write_page(&page) {
                Ok(written) => {
                    summary.records_written += written;
                    report.pages_written += 1;
                    self.observer.on_page_done(&descriptor);
                }
                Err(error) => {
                    self.observer.on_failure(&descriptor, &error);
                    summary.failures.push(descriptor);
                }
            }
        }

        report
    }

    fn write_page(&self, page: &PageResult) -> CrawlResult<usize> {
        let records = normalize(&page.subject, &page.rows);
        self.writer.append(&records, &self.destination)?;
        Ok(records.len())
    }
}
