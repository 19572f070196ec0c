//! Sentence segmentation for cultivation prose.
//!
//! Descriptions are split into display segments at each period followed
//! by whitespace (or ending the text), except when the period trails a
//! Roman-numeral token or a lone letter. Those mark enumerations and
//! abbreviations ("Type I. fertilizer", "T. aestivum"), not sentence
//! ends.

use regex::Regex;
use std::sync::OnceLock;

fn boundary_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"\.(\s+|$)").unwrap())
}

/// Split a description into trimmed, non-empty segments.
pub fn segment(description: &str) -> Vec<String> {
    let mut segments = Vec::new();
    let mut cursor = 0;
    for boundary in boundary_pattern().find_iter(description) {
        if guards_boundary(preceding_token(description, boundary.start())) {
            continue;
        }
        push_trimmed(&mut segments, &description[cursor..boundary.start()]);
        cursor = boundary.end();
    }
    push_trimmed(&mut segments, &description[cursor..]);
    segments
}

/// The maximal run of word characters ending just before `period_at`.
fn preceding_token(text: &str, period_at: usize) -> &str {
    let bytes = text.as_bytes();
    let mut start = period_at;
    while start > 0 {
        let byte = bytes[start - 1];
        if byte.is_ascii_alphanumeric() || byte == b'_' {
            start -= 1;
        } else {
            break;
        }
    }
    &text[start..period_at]
}

/// Tokens whose trailing period does not end a sentence: Roman-numeral
/// runs and single letters.
///
/// The numeral check is case insensitive, so a token spelled entirely
/// from numeral letters guards its period regardless of case.
fn guards_boundary(token: &str) -> bool {
    if token.is_empty() {
        return false;
    }
    let roman = token.chars().all(|ch| {
        matches!(
            ch.to_ascii_uppercase(),
            'I' | 'V' | 'X' | 'L' | 'C' | 'D' | 'M'
        )
    });
    roman || (token.len() == 1 && token.chars().all(|ch| ch.is_ascii_alphabetic()))
}

fn push_trimmed(segments: &mut Vec<String>, candidate: &str) {
    let trimmed = candidate.trim();
    if !trimmed.is_empty() {
        segments.push(trimmed.to_string());
    }
}
