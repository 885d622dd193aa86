//! Errors raised while crawling a single page or the whole run

use thiserror::Error;

use crate::infrastructure::output::OutputError;
use crate::infrastructure::http_client::FetchError;
use crate::infrastructure::parsing::ParsingError;

#[derive(Debug, Error)]
pub enum CrawlError {
    #[error("Fetch failed: {0}")]
    Fetch(#[from] FetchError),

    #[error("Parse failed: {0}")]
    Parse(#[from] ParsingError),

    /// The site served a different congressperson than the one requested
    #[error("Requested subject {requested} but page is for {served}")]
    SubjectMismatch { requested: String, served: String },

    /// The site served another page of the requested congressperson
    #[error("Requested page {requested} but page {served} was served")]
    PageMismatch { requested: u32, served: u32 },

    #[error("Writing records failed: {0}")]
    Output(#[from] OutputError),

    #[error("Worker task failed: {0}")]
    Worker(String),
}

impl CrawlError {
    pub fn subject_mismatch(requested: &str, served: &str) -> Self {
        Self::SubjectMismatch {
            requested: requested.to_string(),
            served: served.to_string(),
        }
    }
}

pub type CrawlResult<T> = Result<T, CrawlError>;
