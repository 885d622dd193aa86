//! Advisor output records and the row normalizer.

use serde::{Deserialize, Serialize};

use super::page::RawRow;
use super::subject::Subject;

/// Column order of the output file.
pub const FIELD_NAMES: [&str; 6] = [
    "point",
    "name",
    "act_issue_at",
    "act_issued_by",
    "congressperson_name",
    "congressperson_number",
];

/// Placeholder the site prints in empty cells. Rewritten to `""` on output.
pub const EMPTY_SENTINEL: &str = "-";

/// One line of the output file.
///
/// Missing values are empty strings, never absent fields.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdvisorRecord {
    pub point: String,
    pub name: String,
    pub act_issue_at: String,
    pub act_issued_by: String,
    pub congressperson_name: String,
    pub congressperson_number: String,
}

impl AdvisorRecord {
    /// The single record emitted for a subject with no advisors.
    pub fn placeholder(subject: &Subject) -> Self {
        Self {
            congressperson_name: subject.name.clone(),
            congressperson_number: subject.id.clone(),
            ..Self::default()
        }
    }

    /// Map a raw row onto the advisor fields, padding a short row with the
    /// sentinel and then applying sentinel substitution to every field.
    pub fn from_row(subject: &Subject, row: &RawRow) -> Self {
        let mut cells = row.iter().map(String::as_str);
        let mut next = || clean(cells.next().unwrap_or(EMPTY_SENTINEL));

        let point = next();
        let name = next();
        let act_issue_at = next();
        let act_issued_by = next();

        Self {
            point,
            name,
            act_issue_at,
            act_issued_by,
            congressperson_name: clean(&subject.name),
            congressperson_number: clean(&subject.id),
        }
    }

    /// Field values in [`FIELD_NAMES`] order.
    pub fn values(&self) -> [&str; 6] {
        [
            &self.point,
            &self.name,
            &self.act_issue_at,
            &self.act_issued_by,
            &self.congressperson_name,
            &self.congressperson_number,
        ]
    }
}

fn clean(value: &str) -> String {
    if value == EMPTY_SENTINEL {
        String::new()
    } else {
        value.to_string()
    }
}

/// Turn the rows of one page into output records.
///
/// A page without rows still yields one placeholder record so the
/// congressperson shows up in the output.
pub fn normalize(subject: &Subject, rows: &[RawRow]) -> Vec<AdvisorRecord> {
    if rows.is_empty() {
        return vec![AdvisorRecord::placeholder(subject)];
    }

    rows.iter()
        .map(|row| AdvisorRecord::from_row(subject, row))
        .collect()
}
