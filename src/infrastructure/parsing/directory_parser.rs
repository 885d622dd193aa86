//! Congressperson directory parser
//!
//! Reads the `<select id="lotacao">` of the directory page. Its first
//! option is the "Selecione..." prompt and is skipped.

use scraper::{Html, Selector};
use tracing::{debug, warn};

use super::{compile_selector, element_text, HtmlParser, ParsingError, ParsingResult, ParsingSelectors};
use crate::domain::Subject;

pub struct DirectoryParser {
    select_selector_str: String,
    select_selector: Selector,
    option_selector: Selector,
}

impl DirectoryParser {
    pub fn new() -> ParsingResult<Self> {
        Self::with_config(&ParsingSelectors::default())
    }

    pub fn with_config(selectors: &ParsingSelectors) -> ParsingResult<Self> {
        Ok(Self {
            select_selector_str: selectors.subject_select.clone(),
            select_selector: compile_selector(&selectors.subject_select)?,
            option_selector: compile_selector(&selectors.subject_option)?,
        })
    }
}

impl HtmlParser for DirectoryParser {
    type Output = Vec<Subject>;

    fn parse(&self, html: &str) -> ParsingResult<Vec<Subject>> {
        let document = Html::parse_document(html);

        let select = document
            .select(&self.select_selector)
            .next()
            .ok_or_else(|| ParsingError::selection_control_missing(&self.select_selector_str))?;

        let subjects: Vec<Subject> = select
            .select(&self.option_selector)
            .skip(1)
            .filter_map(|option| {
                let name = element_text(option);
                match option.value().attr("value") {
                    Some(id) => Some(Subject::new(id.trim(), name)),
                    None => {
                        warn!("Skipping directory option without value: '{}'", name);
                        None
                    }
                }
            })
            .collect();

        debug!("Directory lists {} congresspeople", subjects.len());
        Ok(subjects)
    }
}
