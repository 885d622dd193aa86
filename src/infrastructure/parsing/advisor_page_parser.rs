//! Advisors page parser
//!
//! Extracts, from one detail page:
//! - the congressperson actually served (selected `<option>`)
//! - the current page and page count from the pagination block
//! - the advisors table rows, top to bottom

use scraper::{ElementRef, Html, Selector};
use tracing::debug;

use super::{
    collapse_whitespace, compile_selector, element_text, HtmlParser, ParsingError, ParsingResult,
    ParsingSelectors,
};
use crate::domain::{PageResult, RawRow, Subject};

pub struct AdvisorPageParser {
    selectors: ParsingSelectors,
    subject_select: Selector,
    selected_option: Selector,
    advisors_table: Selector,
    table_row: Selector,
    table_cell: Selector,
    cell_label: Selector,
    pagination_item: Selector,
    current_page_marker: Selector,
}

impl AdvisorPageParser {
    pub fn new() -> ParsingResult<Self> {
        Self::with_config(&ParsingSelectors::default())
    }

    pub fn with_config(selectors: &ParsingSelectors) -> ParsingResult<Self> {
        Ok(Self {
            subject_select: compile_selector(&selectors.subject_select)?,
            selected_option: compile_selector(&selectors.selected_option)?,
            advisors_table: compile_selector(&selectors.advisors_table)?,
            table_row: compile_selector(&selectors.table_row)?,
            table_cell: compile_selector(&selectors.table_cell)?,
            cell_label: compile_selector(&selectors.cell_label)?,
            pagination_item: compile_selector(&selectors.pagination_item)?,
            current_page_marker: compile_selector(&selectors.current_page_marker)?,
            selectors: selectors.clone(),
        })
    }

    fn extract_subject(&self, document: &Html) -> ParsingResult<Subject> {
        let select = document
            .select(&self.subject_select)
            .next()
            .ok_or_else(|| ParsingError::selection_control_missing(&self.selectors.subject_select))?;

        let option = select
            .select(&self.selected_option)
            .next()
            .ok_or_else(|| ParsingError::selected_option_missing(&self.selectors.subject_select))?;

        let name = element_text(option);
        let id = option
            .value()
            .attr("value")
            .ok_or_else(|| ParsingError::OptionValueMissing { text: name.clone() })?;

        Ok(Subject::new(id.trim(), name))
    }

    /// Number inside the current-page marker; 1 when there is no marker.
    fn extract_current_page(&self, document: &Html) -> ParsingResult<u32> {
        let Some(marker) = document.select(&self.current_page_marker).next() else {
            return Ok(1);
        };

        let text = element_text(marker);
        text.parse::<u32>()
            .map_err(|_| ParsingError::InvalidPageNumber { value: text })
    }

    /// Pagination items that are not previous/next controls; 1 when there are none.
    fn extract_total_pages(&self, document: &Html) -> u32 {
        let count = document
            .select(&self.pagination_item)
            .filter(|item| !self.is_pagination_control(*item))
            .count();

        u32::try_from(count).unwrap_or(u32::MAX).max(1)
    }

    fn is_pagination_control(&self, item: ElementRef<'_>) -> bool {
        let class = item.value().attr("class").unwrap_or_default();
        self.selectors
            .pagination_controls
            .iter()
            .any(|control| class.contains(control.as_str()))
    }

    fn extract_rows(&self, document: &Html) -> ParsingResult<Vec<RawRow>> {
        let table = document
            .select(&self.advisors_table)
            .next()
            .ok_or_else(|| ParsingError::table_missing(&self.selectors.advisors_table))?;

        Ok(table
            .select(&self.table_row)
            .map(|row| self.extract_row(row))
            .collect())
    }

    /// A cell contributes its own text; a cell without any contributes the
    /// text of its label elements instead. Empty cells contribute nothing.
    fn extract_row(&self, row: ElementRef<'_>) -> RawRow {
        let mut fields = RawRow::new();

        for cell in row.select(&self.table_cell) {
            let own_text =
                collapse_whitespace(cell.children().filter_map(|node| node.value().as_text()).map(|t| &**t));

            if !own_text.is_empty() {
                fields.push(own_text);
                continue;
            }

            fields.extend(
                cell.select(&self.cell_label)
                    .map(element_text)
                    .filter(|text| !text.is_empty()),
            );
        }

        fields
    }
}

impl HtmlParser for AdvisorPageParser {
    type Output = PageResult;

    fn parse(&self, html: &str) -> ParsingResult<PageResult> {
        let document = Html::parse_document(html);

        let subject = self.extract_subject(&document)?;
        let rows = self.extract_rows(&document)?;
        let current_page = self.extract_current_page(&document)?;
        let total_pages = self.extract_total_pages(&document);

        debug!(
            "Parsed page {}/{} for {} with {} rows",
            current_page,
            total_pages,
            subject,
            rows.len()
        );

        Ok(PageResult::new(subject, current_page, total_pages, rows))
    }
}
