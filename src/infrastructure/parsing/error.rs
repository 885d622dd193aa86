//! Parsing error types
//!
//! Every variant names the piece of markup that was expected, so a
//! failure report identifies what the portal changed.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParsingError {
    #[error("Selection control '{selector}' not found")]
    SelectionControlMissing { selector: String },

    #[error("No selected option in '{selector}'")]
    SelectedOptionMissing { selector: String },

    #[error("Option '{text}' has no value attribute")]
    OptionValueMissing { text: String },

    #[error("Advisors table '{selector}' not found")]
    TableMissing { selector: String },

    #[error("Invalid page number '{value}' in pagination marker")]
    InvalidPageNumber { value: String },

    #[error("Invalid CSS selector: {selector} - {reason}")]
    InvalidSelector { selector: String, reason: String },
}

impl ParsingError {
    pub fn selection_control_missing(selector: &str) -> Self {
        Self::SelectionControlMissing {
            selector: selector.to_string(),
        }
    }

    pub fn selected_option_missing(selector: &str) -> Self {
        Self::SelectedOptionMissing {
            selector: selector.to_string(),
        }
    }

    pub fn table_missing(selector: &str) -> Self {
        Self::TableMissing {
            selector: selector.to_string(),
        }
    }

    pub fn invalid_selector(selector: &str, reason: &str) -> Self {
        Self::InvalidSelector {
            selector: selector.to_string(),
            reason: reason.to_string(),
        }
    }
}

pub type ParsingResult<T> = Result<T, ParsingError>;
