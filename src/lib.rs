//! Deputies Advisors - Chamber of Deputies advisors crawler
//!
//! Collects, for every congressperson listed on the Chamber of Deputies
//! transparency portal, the table of their registered advisors and
//! appends it to a dated, compressed CSV file.

pub mod crawling;
pub mod domain;
pub mod infrastructure;

pub use crawling::{AdvisorCrawler, CrawlObserver, CrawlSummary, TracingObserver};
pub use infrastructure::config::AppConfig;
