//! Buffered-mode result assembly.
//!
//! Streaming callers see raw per-event text; only the buffered path runs
//! this finalization step.

use crate::decoder::StreamDecoder;

/// The finished result of a buffered call.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Article {
    /// Ordered concatenation of all article-channel text deltas
    pub text: String,
    /// Unique non-empty trimmed followup lines, first occurrence wins
    pub followups: Vec<String>,
    /// Whether the completion flag was seen
    pub done: bool,
}

impl Article {
    /// Fold a finished decoder into an article result.
    pub fn from_decoder(decoder: &StreamDecoder) -> Self {
        Self {
            text: decoder.article_text().to_string(),
            followups: dedup_followup_lines(decoder.followup_text()),
            done: decoder.is_done(),
        }
    }

    /// The combined user-facing string: the article text, with the
    /// followup section appended when any followups remain.
    pub fn render(&self) -> String {
        render_with_followups(&self.text, &self.followups)
    }
}

/// Split a followup block on line boundaries, trim each line, drop empty
/// lines, and deduplicate by exact equality preserving first-seen order.
pub fn dedup_followup_lines(block: &str) -> Vec<String> {
    let mut lines: Vec<String> = Vec::new();
    for line in block.split('\n') {
        let line = line.trim_end_matches('\r').trim();
        if line.is_empty() || lines.iter().any(|seen| seen == line) {
            continue;
        }
        lines.push(line.to_string());
    }
    lines
}

/// Append the followup section (horizontal rule, header line, bullets) to
/// `article` when any followups remain; otherwise return it unchanged.
pub fn render_with_followups(article: &str, followups: &[String]) -> String {
    if followups.is_empty() {
        return article.to_string();
    }

    let mut rendered = String::with_capacity(article.len() + 64);
    rendered.push_str(article);
    rendered.push_str("\n\n---\n\nFollow-up questions\n\n");
    for followup in followups {
        rendered.push_str("- ");
        rendered.push_str(followup);
        rendered.push('\n');
    }
    rendered
}
