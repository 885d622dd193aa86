//! Selector configuration for HTML extraction
//!
//! Centralized CSS selectors for the directory and advisors pages.
//! Overridable from the `selectors` section of the config file.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParsingSelectors {
    /// The congressperson `<select>`
    pub subject_select: String,

    /// Options of the congressperson `<select>`, relative to it
    pub subject_option: String,

    /// The option marked as selected on a detail page, relative to the `<select>`
    pub selected_option: String,

    /// The advisors table
    pub advisors_table: String,

    /// Body rows, relative to the table
    pub table_row: String,

    /// Cells, relative to a row
    pub table_cell: String,

    /// Label element read when a cell has no text of its own
    pub cell_label: String,

    /// Items of the pagination block
    pub pagination_item: String,

    /// Marker holding the current page number
    pub current_page_marker: String,

    /// Class fragments that mark previous/next controls rather than pages
    pub pagination_controls: Vec<String>,
}

impl Default for ParsingSelectors {
    fn default() -> Self {
        Self {
            subject_select: "select#lotacao".to_string(),
            subject_option: "option".to_string(),
            selected_option: "option[selected]".to_string(),
            advisors_table: "table.tabela-padrao-bootstrap".to_string(),
            table_row: "tbody > tr".to_string(),
            table_cell: "td".to_string(),
            cell_label: "span".to_string(),
            pagination_item: "ul.pagination > li".to_string(),
            current_page_marker: "ul.pagination > li.current > span".to_string(),
            pagination_controls: vec!["next".to_string(), "previous".to_string()],
        }
    }
}
