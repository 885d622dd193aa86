//! Parsed detail page.

use serde::{Deserialize, Serialize};

use super::subject::Subject;

/// Cell texts of one advisors-table row, in column order.
///
/// Normally four fields (`point, name, act_issue_at, act_issued_by`);
/// three when the last cell is empty on the site.
pub type RawRow = Vec<String>;

/// Everything the crawler needs from one detail page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageResult {
    /// Subject as echoed by the selected `<option>`, not as requested.
    pub subject: Subject,
    pub current_page: u32,
    pub total_pages: u32,
    pub rows: Vec<RawRow>,
    pub has_next: bool,
}

impl PageResult {
    /// Build a page result, normalizing the pagination numbers.
    ///
    /// `total_pages` is at least 1 and `current_page` lies in
    /// `[1, total_pages]`; `has_next` is derived from both.
    pub fn new(subject: Subject, current_page: u32, total_pages: u32, rows: Vec<RawRow>) -> Self {
        let total_pages = total_pages.max(1);
        let current_page = current_page.clamp(1, total_pages);

        Self {
            subject,
            current_page,
            total_pages,
            rows,
            has_next: current_page != total_pages,
        }
    }

    /// Pages after this one, in ascending order. Empty on the last page.
    pub fn remaining_pages(&self) -> std::ops::RangeInclusive<u32> {
        (self.current_page + 1)..=self.total_pages
    }
}
