//! HTML parsing infrastructure for the advisors portal
//!
//! DOM traversal is delegated to `scraper`; this module only declares
//! where values live (see [`ParsingSelectors`]) and turns them into
//! domain types.

pub mod advisor_page_parser;
pub mod config;
pub mod directory_parser;
pub mod error;

pub use advisor_page_parser::AdvisorPageParser;
pub use config::ParsingSelectors;
pub use directory_parser::DirectoryParser;
pub use error::{ParsingError, ParsingResult};

use scraper::{ElementRef, Selector};

/// Parses one kind of page into a typed value
pub trait HtmlParser {
    type Output;

    /// Parse a raw response body
    fn parse(&self, html: &str) -> ParsingResult<Self::Output>;
}

pub(crate) fn compile_selector(selector: &str) -> ParsingResult<Selector> {
    Selector::parse(selector).map_err(|e| ParsingError::invalid_selector(selector, &e.to_string()))
}

/// Element text with runs of whitespace collapsed to single spaces
pub(crate) fn element_text(element: ElementRef<'_>) -> String {
    collapse_whitespace(element.text())
}

pub(crate) fn collapse_whitespace<'a>(parts: impl Iterator<Item = &'a str>) -> String {
    parts
        .flat_map(str::split_whitespace)
        .collect::<Vec<_>>()
        .join(" ")
}
