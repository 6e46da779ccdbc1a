use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::models::resume::{Section, SectionMap, SectionValue};
use crate::scoring::tokens::keyword_tokens;

/// Job requirement fields as supplied by the caller, one plain string each.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct JobFields {
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub responsibilities: String,
    #[serde(default)]
    pub experience: String,
    #[serde(default)]
    pub skills: String,
    #[serde(default)]
    pub education: String,
    #[serde(default)]
    pub certifications: String,
    #[serde(default)]
    pub projects: String,
    #[serde(default)]
    pub languages: String,
}

/// Job-side counterpart of `ResumeProfile`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct JobRequirement {
    #[serde(default)]
    pub sections: SectionMap,
    /// Normalized requirement tokens. Ordered so feedback output is stable.
    #[serde(default)]
    pub keywords: BTreeSet<String>,
}

impl JobRequirement {
    /// Maps the job fields onto resume sections and derives the keyword set
    /// from skills, responsibilities, experience, and education.
    pub fn from_fields(fields: &JobFields) -> Self {
        let sections: SectionMap = [
            (Section::Skills, &fields.skills),
            (Section::WorkExperience, &fields.experience),
            (Section::Education, &fields.education),
            (Section::Certifications, &fields.certifications),
            (Section::Projects, &fields.projects),
            (Section::Languages, &fields.languages),
        ]
        .into_iter()
        .map(|(section, text)| (section, SectionValue::Text(text.clone())))
        .collect();

        let keywords = [
            &fields.skills,
            &fields.responsibilities,
            &fields.experience,
            &fields.education,
        ]
        .into_iter()
        .flat_map(|text| keyword_tokens(text))
        .collect();

        Self { sections, keywords }
    }
}
