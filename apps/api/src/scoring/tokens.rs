//! Tokenization shared by the entity score, job keywords, and feedback.
//!
//! Tokens are lowercased, whitespace-split, and trimmed of surrounding
//! punctuation. `+` and `#` survive the trim so `c++` and `c#` stay intact;
//! inner punctuation (`express.js`) is kept as is.

use std::collections::BTreeSet;

const STOPWORDS: &[&str] = &[
    "a", "an", "and", "any", "are", "as", "at", "be", "by", "can", "e.g", "etc", "for", "from",
    "have", "in", "including", "into", "is", "it", "its", "of", "on", "or", "other", "our",
    "related", "such", "that", "the", "their", "this", "to", "using", "we", "will", "with",
    "within", "you", "your",
];

/// Normalizes a single token or keyword.
pub fn normalize_keyword(raw: &str) -> String {
    raw.trim_matches(|c: char| !(c.is_alphanumeric() || c == '+' || c == '#'))
        .to_lowercase()
}

pub fn tokenize(text: &str) -> impl Iterator<Item = String> + '_ {
    text.split_whitespace()
        .map(normalize_keyword)
        .filter(|token| !token.is_empty())
}

pub fn token_set(text: &str) -> BTreeSet<String> {
    tokenize(text).collect()
}

/// Tokens worth treating as requirements: no stopwords, at least one letter.
pub fn keyword_tokens(text: &str) -> impl Iterator<Item = String> + '_ {
    tokenize(text).filter(|token| !is_stopword(token) && token.chars().any(char::is_alphabetic))
}

pub fn is_stopword(token: &str) -> bool {
    STOPWORDS.contains(&token)
}
