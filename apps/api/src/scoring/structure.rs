//! Structure Checker — detects which conventional resume sections are present.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::models::score::SectionPresence;

/// Structural categories and the keywords that signal each one.
pub const STRUCTURE_CATEGORIES: &[(&str, &[&str])] = &[
    ("Contact Information", &["contact", "email", "phone", "address"]),
    ("Summary or Objective", &["summary", "objective", "overview", "profile"]),
    ("Skills", &["skill", "skills", "competency", "proficiency"]),
    (
        "Experience",
        &[
            "experience",
            "work history",
            "professional experience",
            "employment history",
        ],
    ),
    ("Education", &["education", "academic background", "qualifications"]),
    ("Certifications", &["certification", "certificate", "certifications"]),
    ("Projects", &["project", "projects", "portfolio"]),
];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StructureReport {
    /// Share of categories present, in [0, 100].
    pub score: f64,
    pub sections: Vec<SectionPresence>,
}

impl StructureReport {
    pub fn missing(&self) -> impl Iterator<Item = &str> {
        self.sections
            .iter()
            .filter(|s| !s.present)
            .map(|s| s.section.as_str())
    }
}

/// Lowercases the text, collapses whitespace, and tests each category's
/// keywords as substrings.
pub fn check_structure(full_text: &str) -> StructureReport {
    let clean = full_text
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase();

    let sections: Vec<SectionPresence> = STRUCTURE_CATEGORIES
        .iter()
        .map(|(name, keywords)| SectionPresence {
            section: name.to_string(),
            present: keywords.iter().any(|kw| clean.contains(kw)),
        })
        .collect();

    let found = sections.iter().filter(|s| s.present).count();
    let score = found as f64 / STRUCTURE_CATEGORIES.len() as f64 * 100.0;

    debug!(
        "Detected sections: {:?}",
        sections
            .iter()
            .map(|s| (s.section.as_str(), s.present))
            .collect::<Vec<_>>()
    );

    StructureReport { score, sections }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn present(report: &StructureReport, name: &str) -> bool {
        report
            .sections
            .iter()
            .find(|s| s.section == name)
            .map(|s| s.present)
            .unwrap_or(false)
    }

    #[test]
    fn test_full_resume_scores_100() {
        let text = "Email: jane@example.com\nSummary\nSkills\nExperience\nEducation\n\
                    Certifications\nProjects";
        let report = check_structure(text);
        assert!((report.score - 100.0).abs() < f64::EPSILON);
        assert_eq!(report.missing().count(), 0);
    }

    #[test]
    fn test_empty_text_scores_zero() {
        let report = check_structure("");
        assert_eq!(report.score, 0.0);
        assert_eq!(report.missing().count(), STRUCTURE_CATEGORIES.len());
    }

    #[test]
    fn test_partial_score_is_share_of_categories() {
        let report = check_structure("Skills: rust\nExperience: acme");
        assert!((report.score - 2.0 / 7.0 * 100.0).abs() < 1e-9);
        assert_eq!(
            report.missing().collect::<Vec<_>>(),
            vec![
                "Contact Information",
                "Summary or Objective",
                "Education",
                "Certifications",
                "Projects"
            ]
        );
    }

    #[test]
    fn test_case_insensitive() {
        assert!(present(&check_structure("EDUCATION"), "Education"));
    }

    #[test]
    fn test_extra_whitespace_does_not_change_outcome() {
        let compact = check_structure("work history at acme");
        let spaced = check_structure("work\n\n\n   history   at acme");
        assert!(present(&compact, "Experience"));
        assert_eq!(compact, spaced);
    }
}
