//! Feedback Generator — prioritized, human-readable improvement suggestions.
//!
//! Items appear in a fixed order: skills, experience, projects, education,
//! certifications, languages, structure, then one general-advice item. Missing
//! data is treated as an empty token set; generation never fails.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::models::job::JobRequirement;
use crate::models::resume::{ResumeProfile, Section};
use crate::scoring::normalize::normalize_sections;
use crate::scoring::structure::check_structure;
use crate::scoring::tokens::{normalize_keyword, token_set};

/// Upper bound on terms named in a single suggestion.
pub const MAX_NAMED_TERMS: usize = 5;

const GENERAL_ADVICE: &str = "Remember to: \
    1) Use action verbs to describe your achievements \
    2) Quantify your accomplishments where possible \
    3) Keep your resume concise and focused on relevant experience \
    4) Ensure all technical skills mentioned are backed by experience or projects.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FeedbackDimension {
    Skills,
    Experience,
    Projects,
    Education,
    Certifications,
    Languages,
    Structure,
    General,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeedbackItem {
    pub dimension: FeedbackDimension,
    pub message: String,
    /// Job terms named in the message, if any.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub missing_terms: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FeedbackReport {
    pub items: Vec<FeedbackItem>,
}

impl FeedbackReport {
    /// All messages as one blob, single space between items.
    pub fn to_text(&self) -> String {
        self.items
            .iter()
            .map(|item| item.message.as_str())
            .collect::<Vec<_>>()
            .join(" ")
    }

    #[cfg(test)]
    pub fn items_for(&self, dimension: FeedbackDimension) -> impl Iterator<Item = &FeedbackItem> {
        self.items.iter().filter(move |item| item.dimension == dimension)
    }
}

/// Suggestion naming job keywords absent from the section.
struct KeywordGap {
    lead: &'static str,
    tail: &'static str,
}

/// Suggestion for a present but thin section.
struct DepthCheck {
    min_tokens: usize,
    message: &'static str,
}

struct DimensionRule {
    dimension: FeedbackDimension,
    section: Section,
    missing: &'static str,
    keyword_gap: Option<KeywordGap>,
    depth: Option<DepthCheck>,
}

const RULES: &[DimensionRule] = &[
    DimensionRule {
        dimension: FeedbackDimension::Skills,
        section: Section::Skills,
        missing: "Your resume is missing a skills section. Add a dedicated section highlighting your technical skills.",
        keyword_gap: Some(KeywordGap {
            lead: "Your skills section could be improved. Consider adding these key skills:",
            tail: "Focus on technical skills relevant to the position.",
        }),
        depth: None,
    },
    DimensionRule {
        dimension: FeedbackDimension::Experience,
        section: Section::WorkExperience,
        missing: "Your resume is missing work experience. Include relevant professional experience, even if it's from internships or projects.",
        keyword_gap: Some(KeywordGap {
            lead: "Your work experience could be enhanced. Try to highlight experience with:",
            tail: "Include specific achievements and technologies used.",
        }),
        depth: None,
    },
    DimensionRule {
        dimension: FeedbackDimension::Projects,
        section: Section::Projects,
        missing: "Consider adding a projects section. For software roles, highlight personal or academic projects that demonstrate your technical abilities. Include technologies used and your specific contributions.",
        keyword_gap: None,
        depth: Some(DepthCheck {
            min_tokens: 3,
            message: "Your projects section could be more detailed. Add more projects and include specific technical details and outcomes.",
        }),
    },
    DimensionRule {
        dimension: FeedbackDimension::Education,
        section: Section::Education,
        missing: "Your resume is missing education details. Include your degree, major, and relevant coursework.",
        keyword_gap: None,
        depth: Some(DepthCheck {
            min_tokens: 3,
            message: "Consider expanding your education section with more details about your coursework and academic achievements.",
        }),
    },
    DimensionRule {
        dimension: FeedbackDimension::Certifications,
        section: Section::Certifications,
        missing: "Consider adding relevant certifications. For software roles, certifications in specific technologies or methodologies can strengthen your profile.",
        keyword_gap: None,
        depth: None,
    },
    DimensionRule {
        dimension: FeedbackDimension::Languages,
        section: Section::Languages,
        missing: "If you know multiple programming languages, add them to your resume. This is particularly important for software development roles.",
        keyword_gap: None,
        depth: None,
    },
];

pub fn generate_feedback(profile: &ResumeProfile, job: &JobRequirement) -> FeedbackReport {
    let texts = normalize_sections(&profile.sections);
    let keywords: BTreeSet<String> = job
        .keywords
        .iter()
        .map(|k| normalize_keyword(k))
        .filter(|k| !k.is_empty())
        .collect();

    let mut items = Vec::new();
    let mut push = |dimension, message: String, missing_terms: Vec<String>| {
        items.push(FeedbackItem {
            dimension,
            message,
            missing_terms,
        });
    };

    for rule in RULES {
        let tokens = token_set(texts.get(rule.section));
        if tokens.is_empty() {
            push(rule.dimension, rule.missing.to_string(), Vec::new());
            continue;
        }

        if let Some(gap) = &rule.keyword_gap {
            let missing: Vec<String> = keywords
                .difference(&tokens)
                .take(MAX_NAMED_TERMS)
                .cloned()
                .collect();
            if !missing.is_empty() {
                let message = format!("{} {}. {}", gap.lead, missing.join(", "), gap.tail);
                push(rule.dimension, message, missing);
            }
        }

        if let Some(depth) = &rule.depth {
            if tokens.len() < depth.min_tokens {
                push(rule.dimension, depth.message.to_string(), Vec::new());
            }
        }
    }

    let structure = check_structure(&profile.full_text);
    let missing_sections: Vec<&str> = structure.missing().collect();
    if !missing_sections.is_empty() {
        push(
            FeedbackDimension::Structure,
            format!(
                "Your resume is missing these important sections: {}.",
                missing_sections.join(", ")
            ),
            Vec::new(),
        );
    }

    push(FeedbackDimension::General, GENERAL_ADVICE.to_string(), Vec::new());

    FeedbackReport { items }
}
