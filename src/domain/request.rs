//! Page request descriptors.
//!
//! A descriptor names one (subject, page) pair. The transport turns it
//! into the actual POST; everything upstream only deals in descriptors.

use serde::{Deserialize, Serialize};

use super::subject::Subject;

/// Rows per page served by the advisors table. Fixed by the site.
pub const DEFAULT_PAGE_SIZE: u32 = 20;

/// Identifies one outstanding detail-page request.
///
/// Two descriptors are equal iff subject id and page match, which lets
/// callers trace and deduplicate in-flight work.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RequestDescriptor {
    pub subject_id: String,
    pub page: u32,
}

impl RequestDescriptor {
    /// Zero-based row offset sent as `b_start:int`.
    ///
    /// page 1 = 0, page 2 = 20, page 3 = 40 with the default page size.
    pub const fn offset(&self, page_size: u32) -> u32 {
        self.page.saturating_sub(1) * page_size
    }
}

impl std::fmt::Display for RequestDescriptor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "subject {} page {}", self.subject_id, self.page)
    }
}

/// Build the request for `page` of `subject`. Pages below 1 are raised to 1.
pub fn build_request(subject: &Subject, page: u32) -> RequestDescriptor {
    RequestDescriptor {
        subject_id: subject.id.clone(),
        page: page.max(1),
    }
}

/// One synchronous round of concurrent dispatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Wave {
    /// Page 1 of every subject.
    FirstPages,
    /// Every page discovered from the first wave's pagination markers.
    Overflow,
}

impl std::fmt::Display for Wave {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::FirstPages => write!(f, "wave 1 (first pages)"),
            Self::Overflow => write!(f, "wave 2 (overflow pages)"),
        }
    }
}
