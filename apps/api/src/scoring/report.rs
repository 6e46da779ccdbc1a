//! Markdown rendering of a finished scoring run.

use chrono::{DateTime, Utc};

use crate::models::score::ScoreRecord;
use crate::scoring::feedback::FeedbackReport;

pub struct ReportInput<'a> {
    pub candidate_name: &'a str,
    pub generated_at: DateTime<Utc>,
    pub score: &'a ScoreRecord,
    pub feedback: &'a FeedbackReport,
    pub full_text: &'a str,
}

pub fn render_report(input: &ReportInput<'_>) -> String {
    let mut out = String::new();

    out.push_str("# Resume Analysis Report\n\n");
    out.push_str(&format!("**{}**\n\n", input.candidate_name));
    out.push_str(&format!(
        "_Generated {}_\n\n",
        input.generated_at.format("%Y-%m-%d %H:%M UTC")
    ));

    out.push_str("## Resume Score\n\n");
    for (name, value) in input.score.named_scores() {
        out.push_str(&format!("- {}: {value}\n", title_case(name)));
    }
    if let Some(error) = &input.score.error {
        out.push_str(&format!("- Error: {error}\n"));
    }
    if !input.score.sections.is_empty() {
        out.push_str("\nSections Detected:\n\n");
        for section in &input.score.sections {
            let mark = if section.present { "Yes" } else { "No" };
            out.push_str(&format!("- {}: {mark}\n", section.section));
        }
    }

    out.push_str("\n## CV Text\n\n");
    out.push_str(input.full_text.trim());
    out.push_str("\n\n## Feedback\n\n");
    for line in feedback_lines(&input.feedback.to_text()) {
        out.push_str(&format!("- {line}\n"));
    }

    out
}

/// Splits the feedback blob into sentences for bullet rendering.
fn feedback_lines(text: &str) -> Vec<&str> {
    text.split(". ")
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect()
}

fn title_case(snake: &str) -> String {
    snake
        .split('_')
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}
