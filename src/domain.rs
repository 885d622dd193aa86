//! Domain module - Core crawl entities and rules
//!
//! This module contains the value objects exchanged between the crawl
//! stages and the pure rules that operate on them: building page
//! requests, planning overflow pages and normalizing advisor rows.
//!
//! Nothing in here performs I/O.

pub mod advisor;
pub mod page;
pub mod pagination;
pub mod request;
pub mod subject;

pub use advisor::{normalize, AdvisorRecord, EMPTY_SENTINEL, FIELD_NAMES};
pub use page::{PageResult, RawRow};
pub use pagination::PaginationPlanner;
pub use request::{build_request, RequestDescriptor, Wave, DEFAULT_PAGE_SIZE};
pub use subject::Subject;
