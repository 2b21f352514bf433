// crates/ai_marker/src/lib.rs

//! The comment marker shared by the scanner and the driver.
//!
//! A comment qualifies when its trimmed text starts with [`AI_MARKER`]
//! followed by whitespace. Matching is case‑sensitive: `ai: …` and
//! `AI:…` are ordinary comments.

use once_cell::sync::Lazy;
use regex::Regex;

/// Exact form of the marker, without the whitespace that must follow it.
pub const AI_MARKER: &str = "AI:";

// `AI:` + at least one whitespace char, then the prompt (may span lines
// inside a block comment).
static MARKER_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(r"(?s)\A{}\s+(.*)\z", regex::escape(AI_MARKER))).unwrap()
});

/// Turns the inner text of a comment into a prompt.
///
/// Returns `None` unless the trimmed text begins with the marker and at
/// least one whitespace character. The returned prompt is trimmed.
pub fn prompt_from_comment(body: &str) -> Option<String> {
    let caps = MARKER_RE.captures(body.trim())?;
    let prompt = caps.get(1).map_or("", |m| m.as_str()).trim();
    Some(prompt.to_string())
}

/// Strips the comment delimiters from a raw comment token.
///
/// `// text` becomes ` text` and `/* text */` becomes ` text `. Anything
/// else is returned as is.
pub fn comment_body(raw: &str) -> &str {
    if let Some(rest) = raw.strip_prefix("//") {
        return rest;
    }
    raw.strip_prefix("/*")
        .and_then(|rest| rest.strip_suffix("*/"))
        .unwrap_or(raw)
}
