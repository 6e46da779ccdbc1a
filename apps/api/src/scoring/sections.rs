//! Section Extractor — splits raw resume text into labeled sections.
//!
//! A section starts at the first line containing any of its title synonyms
//! (case-insensitive substring) and runs until the next blank line or the end
//! of the text. The title line itself is not part of the section.

use crate::models::resume::{ResumeProfile, Section, SectionMap, SectionValue};
use crate::scoring::entities::extract_entities;

const SKILLS_TITLES: &[&str] = &["skills", "technical skills", "core skills"];
const EXPERIENCE_TITLES: &[&str] = &[
    "work experience",
    "professional experience",
    "experience",
    "employment history",
];
const EDUCATION_TITLES: &[&str] = &["education", "academic background", "qualifications"];
const CERTIFICATION_TITLES: &[&str] = &["certifications", "certificates"];
const PROJECT_TITLES: &[&str] = &["projects", "project experience", "personal projects"];
const LANGUAGE_TITLES: &[&str] = &["languages", "language proficiency"];

/// Title synonyms that open each section.
pub fn section_titles(section: Section) -> &'static [&'static str] {
    match section {
        Section::Skills => SKILLS_TITLES,
        Section::WorkExperience => EXPERIENCE_TITLES,
        Section::Education => EDUCATION_TITLES,
        Section::Certifications => CERTIFICATION_TITLES,
        Section::Projects => PROJECT_TITLES,
        Section::Languages => LANGUAGE_TITLES,
    }
}

/// Returns the interior lines of the first section opened by any of `titles`,
/// joined with newlines, or an empty string when no title appears.
pub fn extract_section(text: &str, titles: &[&str]) -> String {
    let titles: Vec<String> = titles
        .iter()
        .filter(|t| !t.trim().is_empty())
        .map(|t| t.to_lowercase())
        .collect();

    let mut lines = text.lines();
    let opened = lines.by_ref().any(|line| {
        let line = line.to_lowercase();
        titles.iter().any(|title| line.contains(title.as_str()))
    });
    if !opened {
        return String::new();
    }

    lines
        .take_while(|line| !line.trim().is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

/// Builds a `ResumeProfile` from extracted resume text. Section text is
/// lowercased; `full_text` keeps the input verbatim.
pub fn parse_resume(text: &str) -> ResumeProfile {
    let sections: SectionMap = Section::ALL
        .iter()
        .map(|&section| {
            let body = extract_section(text, section_titles(section)).to_lowercase();
            (section, SectionValue::Text(body))
        })
        .collect();

    ResumeProfile {
        sections,
        entities: extract_entities(text),
        full_text: text.to_string(),
    }
}
