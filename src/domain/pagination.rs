//! Overflow page planning.
//!
//! Responsibility:
//! - decide, from a subject's first parsed page, which further pages exist
//! - emit one descriptor per missing page, exactly once per subject
//!
//! This is the only place the crawl discovers new work at runtime.

use std::collections::HashSet;

use super::page::PageResult;
use super::request::{build_request, RequestDescriptor};

#[derive(Debug, Clone, Default)]
pub struct PaginationPlanner {
    planned_subjects: HashSet<String>,
}

impl PaginationPlanner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Descriptors for pages `current_page + 1 ..= total_pages` of the page's subject.
    ///
    /// Returns nothing when the page is the last one, or when the subject
    /// has already been planned: a second plan would fetch, and therefore
    /// write, the same rows twice.
    pub fn plan(&mut self, page: &PageResult) -> Vec<RequestDescriptor> {
        if !page.has_next {
            return Vec::new();
        }
        if !self.planned_subjects.insert(page.subject.id.clone()) {
            tracing::debug!("Subject {} already planned, skipping", page.subject.id);
            return Vec::new();
        }

        page.remaining_pages()
            .map(|p| build_request(&page.subject, p))
            .collect()
    }

    /// Number of subjects that produced overflow pages so far.
    pub fn planned_subjects(&self) -> usize {
        self.planned_subjects.len()
    }
}
