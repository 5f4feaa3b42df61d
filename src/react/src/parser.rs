//! Output parser: raw model text -> one canonical Thought/Action block.
//!
//! Models often keep going after their first action and invent the
//! `Observation:` and the next `Thought:` themselves. Only the first
//! `Thought: ... Action: ...` block is kept; everything after the next
//! marker line is dropped.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

// `regex` has no look-ahead, so the block end is found with a second search
// starting right after the first `Action:`.
static BLOCK_START: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)Thought:.*?Action:").expect("internal regex must be valid"));
static NEXT_MARKER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\n\s*(?:Thought:|Action:|Observation:)").expect("internal regex must be valid")
});
static ACTION_LINE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)Action: (.*)").expect("internal regex must be valid"));

/// One parsed model turn
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParsedStep {
    /// Canonical model output (first block if truncated, raw text otherwise)
    pub thought_action_text: String,
    /// Trimmed text after the first `Action: ` marker
    pub action_line: Option<String>,
    /// Whether trailing content was discarded
    pub truncated: bool,
}

/// Parse a raw model reply. Never fails.
pub fn parse_output(raw: &str) -> ParsedStep {
    let (thought_action_text, truncated) = match first_block(raw) {
        Some(block) if block != raw.trim() => (block.to_string(), true),
        _ => (raw.to_string(), false),
    };

    let action_line = extract_action_line(&thought_action_text).map(str::to_string);

    ParsedStep {
        thought_action_text,
        action_line,
        truncated,
    }
}

/// First `Thought: ... Action: ...` block, trimmed
fn first_block(text: &str) -> Option<&str> {
    let start = BLOCK_START.find(text)?;
    let end = NEXT_MARKER
        .find_at(text, start.end())
        .map(|m| m.start())
        .unwrap_or(text.len());
    Some(text[start.start()..end].trim())
}

/// Text after the first `Action: ` marker, trimmed
pub fn extract_action_line(text: &str) -> Option<&str> {
    ACTION_LINE
        .captures(text)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().trim())
}
