//! Parsing of the model's `|Summary: ...|Categories: ...|` reply.

use crate::utils::sanitize_text;

/// A reply that had the expected shape.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedReply {
    pub summary: String,
    /// Trimmed, non-empty, in reply order. May repeat.
    pub categories: Vec<String>,
}

/// Parse a model reply. `None` when the shape does not match or the summary
/// is empty.
///
/// The reply is split on `|`; the second segment must contain `Summary: `
/// and the third `Categories: `, whose value is split on `, `.
pub fn parse_reply(reply: &str) -> Option<ParsedReply> {
    let mut segments = reply.split('|').skip(1);
    let summary_segment = segments.next()?;
    let categories_segment = segments.next()?;

    let (_, summary) = summary_segment.split_once("Summary: ")?;
    let summary = sanitize_text(summary);
    if summary.is_empty() {
        return None;
    }

    let (_, names) = categories_segment.split_once("Categories: ")?;
    let categories = names
        .split(", ")
        .map(clean_name)
        .filter(|n| !n.is_empty())
        .collect();

    Some(ParsedReply {
        summary,
        categories,
    })
}

/// Trim whitespace and the list punctuation models like to echo back.
fn clean_name(raw: &str) -> String {
    raw.trim()
        .trim_matches(|c| matches!(c, '[' | ']' | '"' | '\''))
        .trim()
        .to_string()
}
