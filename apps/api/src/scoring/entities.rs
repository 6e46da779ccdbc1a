//! Heuristic named-entity recognizer for resume text.
//!
//! An entity is a run of consecutive capitalized words, acronyms, or
//! tech-marked tokens (`C++`, `Node.js`) on one line. Runs break at clause
//! punctuation. Section heading lines are skipped.

use std::collections::HashSet;

use crate::models::resume::Section;
use crate::scoring::sections::section_titles;

const NON_ENTITY_WORDS: &[&str] = &[
    "a", "an", "and", "as", "at", "by", "for", "from", "i", "in", "my", "of", "on", "or", "the",
    "to", "with", "our", "we",
];

const EXTRA_HEADINGS: &[&str] = &[
    "summary",
    "objective",
    "profile",
    "contact",
    "contact information",
    "projects",
    "certifications",
];

/// Extracts entities in first-seen order without duplicates.
pub fn extract_entities(text: &str) -> Vec<String> {
    let mut entities = Vec::new();
    let mut seen = HashSet::new();

    for line in text.lines().filter(|line| !is_heading(line)) {
        let mut span: Vec<&str> = Vec::new();
        for raw in line.split_whitespace() {
            let word = raw.trim_matches(|c: char| !(c.is_alphanumeric() || c == '+' || c == '#'));
            let entity_like = is_entity_like(word);
            if entity_like {
                span.push(word);
            }
            if !entity_like || ends_clause(raw, word) {
                flush(&mut span, &mut entities, &mut seen);
            }
        }
        flush(&mut span, &mut entities, &mut seen);
    }

    entities
}

fn flush(span: &mut Vec<&str>, entities: &mut Vec<String>, seen: &mut HashSet<String>) {
    if span.is_empty() {
        return;
    }
    let entity = span.join(" ");
    if seen.insert(entity.clone()) {
        entities.push(entity);
    }
    span.clear();
}

fn is_entity_like(word: &str) -> bool {
    let Some(first) = word.chars().next() else {
        return false;
    };
    if word.contains('@') || NON_ENTITY_WORDS.contains(&word.to_lowercase().as_str()) {
        return false;
    }
    let tech_marked =
        word.contains(['+', '#', '.']) && word.chars().any(char::is_alphabetic);
    first.is_uppercase() || tech_marked
}

/// True when the raw word carried trailing clause punctuation that was trimmed.
fn ends_clause(raw: &str, word: &str) -> bool {
    raw.len() > word.len() && raw.ends_with([',', ';', ':', '.', '|', ')'])
}

fn is_heading(line: &str) -> bool {
    let heading = line.trim().trim_end_matches(':').trim().to_lowercase();
    if heading.is_empty() {
        return false;
    }
    EXTRA_HEADINGS.contains(&heading.as_str())
        || Section::ALL
            .iter()
            .any(|&section| section_titles(section).contains(&heading.as_str()))
}
