//! Text Normalizer — resolves a `SectionValue` to one plain string.
//!
//! Lists are joined with single spaces in order. A string that looks like a
//! list literal (`"[a, 'b', \"c\"]"`) is parsed and joined the same way; if it
//! does not parse, the literal string is kept and a warning is logged.
//! Normalization never fails.

use std::collections::BTreeMap;

use serde_json::Value;
use thiserror::Error;
use tracing::warn;

use crate::models::resume::{Section, SectionMap, SectionValue};

/// Why a section value could not be read as a list.
#[derive(Debug, Error, PartialEq)]
pub enum UnsupportedInput {
    #[error("unterminated quote in list literal")]
    UnterminatedQuote,

    #[error("nested lists are not supported")]
    NestedList,

    #[error("empty element at position {0}")]
    EmptyElement(usize),

    #[error("text after closing quote at position {0}")]
    TrailingText(usize),
}

/// Plain-text form of every comparable section. Absent sections read as "".
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SectionTexts(BTreeMap<Section, String>);

impl SectionTexts {
    pub fn get(&self, section: Section) -> &str {
        self.0.get(&section).map(String::as_str).unwrap_or("")
    }
}

pub fn normalize_sections(sections: &SectionMap) -> SectionTexts {
    SectionTexts(
        Section::ALL
            .iter()
            .map(|&section| {
                let text = sections.get(&section).map(normalize).unwrap_or_default();
                (section, text)
            })
            .collect(),
    )
}

pub fn normalize(value: &SectionValue) -> String {
    match value {
        SectionValue::Text(text) => normalize_text(text),
        SectionValue::List(items) => items.join(" "),
        SectionValue::Other(Value::Null) => String::new(),
        SectionValue::Other(Value::Array(items)) => {
            items.iter().map(render_item).collect::<Vec<_>>().join(" ")
        }
        SectionValue::Other(other) => {
            warn!("Section value is not text or a list, using its literal form: {other}");
            other.to_string()
        }
    }
}

fn normalize_text(text: &str) -> String {
    let trimmed = text.trim();
    if !(trimmed.starts_with('[') && trimmed.ends_with(']')) {
        return text.to_string();
    }
    match parse_list_literal(trimmed) {
        Ok(items) => items.join(" "),
        Err(e) => {
            warn!("Failed to parse list-like section text, keeping it verbatim: {e}");
            text.to_string()
        }
    }
}

fn render_item(item: &Value) -> String {
    match item {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Parses `[...]` as a flat list. JSON arrays are tried first; otherwise items
/// are comma-separated and may be bare or wrapped in single or double quotes.
fn parse_list_literal(literal: &str) -> Result<Vec<String>, UnsupportedInput> {
    if let Ok(items) = serde_json::from_str::<Vec<Value>>(literal) {
        if items.iter().all(|item| !item.is_array()) {
            return Ok(items.iter().map(render_item).collect());
        }
        return Err(UnsupportedInput::NestedList);
    }

    let inner = &literal[1..literal.len() - 1];
    if inner.trim().is_empty() {
        return Ok(Vec::new());
    }

    let mut items = Vec::new();
    let mut current = String::new();
    let mut quote: Option<char> = None;
    let mut closed = false;

    for (pos, c) in inner.chars().enumerate() {
        match (quote, c) {
            (Some(q), c) if c == q => {
                quote = None;
                closed = true;
            }
            (Some(_), c) => current.push(c),
            (None, '\'' | '"') if current.trim().is_empty() && !closed => {
                current.clear();
                quote = Some(c);
            }
            (None, '[' | ']') => return Err(UnsupportedInput::NestedList),
            (None, ',') => {
                push_item(&mut items, &mut current, closed, pos)?;
                closed = false;
            }
            (None, c) if closed && c.is_whitespace() => {}
            (None, _) if closed => return Err(UnsupportedInput::TrailingText(pos)),
            (None, c) => current.push(c),
        }
    }

    if quote.is_some() {
        return Err(UnsupportedInput::UnterminatedQuote);
    }
    // A trailing comma leaves nothing behind, which is allowed.
    if closed || !current.trim().is_empty() {
        push_item(&mut items, &mut current, closed, inner.len())?;
    }
    Ok(items)
}

fn push_item(
    items: &mut Vec<String>,
    current: &mut String,
    quoted: bool,
    pos: usize,
) -> Result<(), UnsupportedInput> {
    let item = if quoted {
        current.clone()
    } else {
        current.trim().to_string()
    };
    if item.is_empty() && !quoted {
        return Err(UnsupportedInput::EmptyElement(pos));
    }
    items.push(item);
    current.clear();
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text(s: &str) -> SectionValue {
        SectionValue::Text(s.to_string())
    }

    #[test]
    fn test_plain_text_is_unchanged() {
        assert_eq!(normalize(&text("python, sql\ndocker")), "python, sql\ndocker");
    }

    #[test]
    fn test_normalize_is_idempotent_on_plain_strings() {
        for input in ["html css", "  spaced  ", "", "a [b] c"] {
            let once = normalize(&text(input));
            assert_eq!(normalize(&text(&once)), once);
            assert_eq!(once, input);
        }
    }

    #[test]
    fn test_list_joins_with_single_spaces() {
        let value = SectionValue::List(vec!["html".to_string(), "css".to_string()]);
        assert_eq!(normalize(&value), "html css");
    }

    #[test]
    fn test_python_style_list_literal() {
        assert_eq!(normalize(&text("['html', 'css', \"node.js\"]")), "html css node.js");
    }

    #[test]
    fn test_bare_list_literal() {
        assert_eq!(normalize(&text("[a, b]")), "a b");
    }

    #[test]
    fn test_json_list_literal() {
        assert_eq!(normalize(&text(r#"["rust", 2021]"#)), "rust 2021");
    }

    #[test]
    fn test_empty_list_literal() {
        assert_eq!(normalize(&text("[]")), "");
    }

    #[test]
    fn test_malformed_literal_falls_back_to_literal_text() {
        assert_eq!(normalize(&text("['html, css]")), "['html, css]");
        assert_eq!(normalize(&text("[a,, b]")), "[a,, b]");
        assert_eq!(normalize(&text("[[a], b]")), "[[a], b]");
    }

    #[test]
    fn test_parse_errors_are_typed() {
        assert_eq!(
            parse_list_literal("['a]"),
            Err(UnsupportedInput::UnterminatedQuote)
        );
        assert_eq!(parse_list_literal("[a, [b]]"), Err(UnsupportedInput::NestedList));
        assert!(matches!(
            parse_list_literal("[a,,b]"),
            Err(UnsupportedInput::EmptyElement(_))
        ));
        assert!(matches!(
            parse_list_literal("['a' b]"),
            Err(UnsupportedInput::TrailingText(_))
        ));
    }

    #[test]
    fn test_other_values_degrade_to_literal_form() {
        assert_eq!(normalize(&SectionValue::Other(serde_json::json!(42))), "42");
        assert_eq!(normalize(&SectionValue::Other(Value::Null)), "");
        assert_eq!(
            normalize(&SectionValue::Other(serde_json::json!([1, "two"]))),
            "1 two"
        );
    }

    #[test]
    fn test_normalize_sections_fills_absent_sections() {
        let mut sections = SectionMap::new();
        sections.insert(Section::Skills, SectionValue::List(vec!["rust".to_string()]));
        let texts = normalize_sections(&sections);
        assert_eq!(texts.get(Section::Skills), "rust");
        assert_eq!(texts.get(Section::Languages), "");
    }
}
