//! End-to-end crawl tests against an in-memory portal.

mod common;

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use rstest::rstest;
use tempfile::TempDir;

use common::{advisors_html, count_headers, directory_html, read_records};
use deputies_advisors::crawling::{AdvisorCrawler, CrawlSummary, RecordingObserver};
use deputies_advisors::domain::{build_request, RequestDescriptor, Subject, Wave};
use deputies_advisors::infrastructure::config::AppConfig;
use deputies_advisors::infrastructure::transport::mock::MockTransport;

struct Harness {
    transport: Arc<MockTransport>,
    observer: Arc<RecordingObserver>,
    _dir: TempDir,
    destination: PathBuf,
    config: AppConfig,
}

impl Harness {
    fn new(compress: bool) -> Self {
        let dir = tempfile::tempdir().unwrap();
        let file_name = if compress { "advisors.xz" } else { "advisors.csv" };
        let mut config = AppConfig::default();
        config.output.compress = compress;

        Self {
            transport: Arc::new(MockTransport::new()),
            observer: Arc::new(RecordingObserver::new()),
            destination: dir.path().join(file_name),
            _dir: dir,
            config,
        }
    }

    fn with_workers(mut self, workers: usize) -> Self {
        self.config.crawler.max_concurrent_requests = workers;
        self
    }

    async fn run(&self) -> CrawlSummary {
        AdvisorCrawler::new(
            &self.config,
            self.transport.clone(),
            self.observer.clone(),
            self.destination.clone(),
        )
        .unwrap()
        .run()
        .await
        .unwrap()
    }

    fn records(&self) -> Vec<Vec<String>> {
        read_records(&self.destination)
    }
}

fn row(fields: &[&str]) -> Vec<String> {
    fields.iter().map(|f| f.to_string()).collect()
}

fn request(id: &str, page: u32) -> RequestDescriptor {
    build_request(&Subject::new(id, ""), page)
}

#[tokio::test]
async fn single_page_subjects_and_empty_table() {
    let h = Harness::new(false);
    h.transport.set_directory(directory_html(&[("1", "Alice"), ("2", "Bob")]));
    h.transport.set_page("1", 1, advisors_html("1", "Alice", 1, 1, &[&["A", "X", "2020-01-01", "Mesa"]]));
    h.transport.set_page("2", 1, advisors_html("2", "Bob", 1, 1, &[]));

    let summary = h.run().await;

    let mut records = h.records();
    records.sort();
    assert_eq!(
        records,
        vec![
            row(&["", "", "", "", "Bob", "2"]),
            row(&["A", "X", "2020-01-01", "Mesa", "Alice", "1"]),
        ]
    );
    assert_eq!(count_headers(&h.destination), 2);
    assert_eq!(summary.subjects, 2);
    assert_eq!(summary.wave_one_pages, 2);
    assert_eq!(summary.overflow_pages, 0);
    assert_eq!(summary.records_written, 2);
    assert!(summary.failures.is_empty());
    assert!(h.observer.failures().is_empty());
}

#[tokio::test]
async fn short_row_and_sentinel_become_empty() {
    let h = Harness::new(false);
    h.transport.set_directory(directory_html(&[("2", "Bob")]));
    h.transport.set_page(
        "2",
        1,
        advisors_html("2", "Bob", 1, 1, &[&["A", "X", "2020-01-01", ""], &["-", "Y", "-", "-"]]),
    );

    h.run().await;

    assert_eq!(
        h.records(),
        vec![
            row(&["A", "X", "2020-01-01", "", "Bob", "2"]),
            row(&["", "Y", "", "", "Bob", "2"]),
        ]
    );
}

#[tokio::test]
async fn overflow_pages_are_fetched_in_second_wave() {
    let h = Harness::new(true);
    h.transport.set_directory(directory_html(&[("1", "Alice")]));
    for page in 1..=3 {
        let point = format!("P{page}");
        h.transport
            .set_page("1", page, advisors_html("1", "Alice", page, 3, &[&[point.as_str(), "X", "2020-01-01", "Mesa"]]));
    }

    let summary = h.run().await;

    let mut calls = h.transport.page_calls();
    assert_eq!(calls.remove(0), request("1", 1));
    calls.sort_by_key(|c| c.page);
    assert_eq!(calls, vec![request("1", 2), request("1", 3)]);

    let mut points: Vec<_> = h.records().into_iter().map(|r| r[0].clone()).collect();
    points.sort();
    assert_eq!(points, vec!["P1", "P2", "P3"]);

    assert_eq!(summary.wave_one_pages, 1);
    assert_eq!(summary.overflow_pages, 2);
    assert_eq!(h.observer.waves(), vec![(Wave::FirstPages, 1), (Wave::Overflow, 2)]);
}

#[tokio::test]
async fn failed_first_page_is_reported_and_others_continue() {
    let h = Harness::new(false);
    h.transport.set_directory(directory_html(&[("1", "Alice"), ("2", "Bob")]));
    h.transport.set_page("1", 1, advisors_html("1", "Alice", 1, 1, &[&["A", "X", "2020-01-01", "Mesa"]]));
    h.transport.fail_page("2", 1, "connection reset");

    let summary = h.run().await;

    assert_eq!(h.records(), vec![row(&["A", "X", "2020-01-01", "Mesa", "Alice", "1"])]);
    assert_eq!(summary.failures, vec![request("2", 1)]);
    assert_eq!(summary.subjects_without_first_page, vec!["2".to_string()]);

    let failures = h.observer.failures();
    assert_eq!(failures.len(), 1);
    assert_eq!(failures[0].0, request("2", 1));
    assert!(failures[0].1.contains("connection reset"));
}

#[tokio::test]
async fn failed_overflow_page_keeps_the_rest() {
    let h = Harness::new(false);
    h.transport.set_directory(directory_html(&[("1", "Alice")]));
    h.transport.set_page("1", 1, advisors_html("1", "Alice", 1, 3, &[&["P1", "X", "2020-01-01", "Mesa"]]));
    h.transport.set_page("1", 2, advisors_html("1", "Alice", 2, 3, &[&["P2", "X", "2020-01-01", "Mesa"]]));
    h.transport.fail_page("1", 3, "timeout");

    let summary = h.run().await;

    let mut points: Vec<_> = h.records().into_iter().map(|r| r[0].clone()).collect();
    points.sort();
    assert_eq!(points, vec!["P1", "P2"]);
    assert_eq!(summary.failures, vec![request("1", 3)]);
    assert!(summary.subjects_without_first_page.is_empty());
}

#[tokio::test]
async fn records_are_written_in_completion_order() {
    let h = Harness::new(false);
    h.transport.set_directory(directory_html(&[("1", "Alice"), ("2", "Bob")]));
    h.transport.set_page_delayed(
        "1",
        1,
        advisors_html("1", "Alice", 1, 1, &[&["A", "X", "2020-01-01", "Mesa"]]),
        Duration::from_millis(200),
    );
    h.transport.set_page("2", 1, advisors_html("2", "Bob", 1, 1, &[&["B", "Y", "2021-01-01", "Mesa"]]));

    h.run().await;

    let subjects: Vec<_> = h.records().into_iter().map(|r| r[5].clone()).collect();
    assert_eq!(subjects, vec!["2", "1"]);
    assert_eq!(h.observer.completed(), vec![request("2", 1), request("1", 1)]);
}

#[tokio::test]
async fn page_for_another_subject_is_dropped() {
    let h = Harness::new(false);
    h.transport.set_directory(directory_html(&[("1", "Alice")]));
    h.transport.set_page("1", 1, advisors_html("9", "Somebody", 1, 1, &[&["Z", "Z", "2020-01-01", "Mesa"]]));

    let summary = h.run().await;

    assert!(!h.destination.exists());
    assert_eq!(summary.failures, vec![request("1", 1)]);
    assert!(h.observer.failures()[0].1.contains("Requested subject 1"));
}

#[tokio::test]
async fn repeated_first_page_is_not_written_twice() {
    let h = Harness::new(false);
    h.transport.set_directory(directory_html(&[("1", "Alice")]));
    let first = advisors_html("1", "Alice", 1, 2, &[&["P1", "Ana", "2020-01-01", "Mesa"]]);
    h.transport.set_page("1", 1, first.clone());
    h.transport.set_page("1", 2, first);

    let summary = h.run().await;

    assert_eq!(h.records(), vec![row(&["P1", "Ana", "2020-01-01", "Mesa", "Alice", "1"])]);
    assert_eq!(summary.overflow_pages, 0);
    assert_eq!(summary.failures, vec![request("1", 2)]);
    assert!(h.observer.failures()[0].1.contains("Requested page 2"));
}

#[rstest]
#[case(1)]
#[case(2)]
#[case(8)]
#[tokio::test]
async fn output_does_not_depend_on_worker_count(#[case] workers: usize) {
    let h = Harness::new(true).with_workers(workers);
    h.transport.set_directory(directory_html(&[("1", "Alice"), ("2", "Bob"), ("3", "Carla")]));
    for page in 1..=2 {
        let point = format!("A{page}");
        h.transport
            .set_page("1", page, advisors_html("1", "Alice", page, 2, &[&[point.as_str(), "X", "2020-01-01", "Mesa"]]));
    }
    h.transport.set_page("2", 1, advisors_html("2", "Bob", 1, 1, &[]));
    h.transport.set_page("3", 1, advisors_html("3", "Carla", 1, 1, &[&["C1", "Z", "2019-01-01", "-"]]));

    let summary = h.run().await;

    let mut records = h.records();
    records.sort();
    assert_eq!(
        records,
        vec![
            row(&["", "", "", "", "Bob", "2"]),
            row(&["A1", "X", "2020-01-01", "Mesa", "Alice", "1"]),
            row(&["A2", "X", "2020-01-01", "Mesa", "Alice", "1"]),
            row(&["C1", "Z", "2019-01-01", "", "Carla", "3"]),
        ]
    );
    assert_eq!(summary.records_written, 4);
    assert_eq!(h.transport.page_calls().len(), 4);
}
