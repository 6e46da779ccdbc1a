use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Shown in reports when no entity could be read off the resume.
pub const UNKNOWN_CANDIDATE: &str = "Unknown Candidate";

/// The comparable sections shared by resumes and job requirements.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Section {
    Skills,
    WorkExperience,
    Education,
    Certifications,
    Projects,
    Languages,
}

impl Section {
    pub const ALL: [Section; 6] = [
        Section::Skills,
        Section::WorkExperience,
        Section::Education,
        Section::Certifications,
        Section::Projects,
        Section::Languages,
    ];
}

/// A section as handed over by extraction. Depending on the source it is plain
/// text, a list of items, or a string that encodes a list (`"[a, b]"`).
/// Resolved to plain text by `scoring::normalize` before any comparison.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SectionValue {
    Text(String),
    List(Vec<String>),
    /// Anything else JSON can carry (numbers, objects, mixed arrays).
    Other(serde_json::Value),
}

impl Default for SectionValue {
    fn default() -> Self {
        SectionValue::Text(String::new())
    }
}

impl From<&str> for SectionValue {
    fn from(text: &str) -> Self {
        SectionValue::Text(text.to_string())
    }
}

impl From<String> for SectionValue {
    fn from(text: String) -> Self {
        SectionValue::Text(text)
    }
}

impl From<Vec<String>> for SectionValue {
    fn from(items: Vec<String>) -> Self {
        SectionValue::List(items)
    }
}

pub type SectionMap = BTreeMap<Section, SectionValue>;

/// Everything the scorer knows about one resume. Built once per run.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ResumeProfile {
    #[serde(default)]
    pub sections: SectionMap,
    /// Named entities in first-seen order.
    #[serde(default)]
    pub entities: Vec<String>,
    #[serde(default)]
    pub full_text: String,
}

impl ResumeProfile {
    #[cfg(test)]
    pub fn section(&self, section: Section) -> Option<&SectionValue> {
        self.sections.get(&section)
    }

    /// The first entity found in the resume, which is the name line for
    /// conventionally laid out resumes.
    pub fn candidate_name(&self) -> &str {
        self.entities
            .first()
            .map(String::as_str)
            .unwrap_or(UNKNOWN_CANDIDATE)
    }
}
