// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Shared utilities for the matchers.
//!
//! The boring-but-essential pieces every search path needs: building
//! case-insensitive patterns out of user or oracle text, scanning with them
//! without ever looping forever, and cutting leaf text into sentences.

use std::ops::Range;

use regex::{Regex, RegexBuilder};

use crate::error::Result;

/// Compiled size limit for generated patterns. Queries are short; a pattern
/// this large means something upstream went wrong.
const PATTERN_SIZE_LIMIT: usize = 1 << 20;

/// Case-insensitive pattern matching `literal` verbatim.
///
/// Every regex metacharacter is escaped, so `"a.b"` only matches `"a.b"`.
pub fn literal_pattern(literal: &str) -> Result<Regex> {
    Ok(RegexBuilder::new(&regex::escape(literal))
        .case_insensitive(true)
        .size_limit(PATTERN_SIZE_LIMIT)
        .build()?)
}

/// Case-insensitive pattern matching `snippet` with flexible whitespace.
///
/// Extracted content is whitespace-collapsed, so a snippet copied out of it
/// reads `"foo bar"` where the leaf says `"foo\n    bar"`. Each run of
/// whitespace in the snippet matches any run of whitespace in the text.
pub fn snippet_pattern(snippet: &str) -> Result<Regex> {
    let escaped: Vec<String> = snippet.split_whitespace().map(regex::escape).collect();
    Ok(RegexBuilder::new(&escaped.join(r"\s+"))
        .case_insensitive(true)
        .size_limit(PATTERN_SIZE_LIMIT)
        .build()?)
}

/// Byte ranges of successive matches, at most `limit` of them.
///
/// A pattern that can match the empty string would otherwise report the same
/// position forever; empty matches are skipped and the scan position is forced
/// past the next char.
pub fn find_all(pattern: &Regex, text: &str, limit: usize) -> Vec<Range<usize>> {
    let mut found = Vec::new();
    let mut at = 0;
    while found.len() < limit && at <= text.len() {
        let Some(m) = pattern.find_at(text, at) else {
            break;
        };
        if m.is_empty() {
            at = next_char_boundary(text, m.end());
            continue;
        }
        found.push(m.range());
        at = m.end();
    }
    found
}

/// Smallest char boundary strictly after `at` (or one past the end).
fn next_char_boundary(text: &str, at: usize) -> usize {
    text[at.min(text.len())..]
        .chars()
        .next()
        .map_or(text.len() + 1, |c| at + c.len_utf8())
}

/// Byte offset `chars` characters after `start`, clamped to the text end.
pub fn advance_chars(text: &str, start: usize, chars: usize) -> usize {
    text[start..]
        .char_indices()
        .nth(chars)
        .map_or(text.len(), |(offset, _)| start + offset)
}

/// Sentence ranges of `text`, split after `.`, `!` or `?`.
///
/// Each range is trimmed of surrounding whitespace and includes its
/// terminator. Empty sentences are dropped.
pub fn sentence_ranges(text: &str) -> Vec<Range<usize>> {
    let mut ranges = Vec::new();
    let mut start = 0;
    for (i, c) in text.char_indices() {
        if matches!(c, '.' | '!' | '?') {
            let end = i + c.len_utf8();
            push_trimmed(text, start..end, &mut ranges);
            start = end;
        }
    }
    push_trimmed(text, start..text.len(), &mut ranges);
    ranges
}

fn push_trimmed(text: &str, range: Range<usize>, out: &mut Vec<Range<usize>>) {
    let slice = &text[range.clone()];
    let lead = slice.len() - slice.trim_start().len();
    let trail = slice.len() - slice.trim_end().len();
    if lead + trail < slice.len() {
        out.push(range.start + lead..range.end - trail);
    }
}

/// Trimmed byte range of `text` (where the non-whitespace content sits).
pub fn trimmed_range(text: &str) -> Range<usize> {
    let lead = text.len() - text.trim_start().len();
    let trail = text.len() - text.trim_end().len();
    if lead == text.len() {
        return 0..0;
    }
    lead..text.len() - trail
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_literal_pattern_escapes_metacharacters() {
        let re = literal_pattern("a.b*").unwrap();
        assert!(re.is_match("xx A.B* yy"));
        assert!(!re.is_match("axbbb"));
    }

    #[test]
    fn test_snippet_pattern_flexible_whitespace() {
        let re = snippet_pattern("quick  brown fox").unwrap();
        let m = re.find("The Quick\n   Brown fox").unwrap();
        assert_eq!(m.as_str(), "Quick\n   Brown fox");
    }

    #[test]
    fn test_find_all_survives_empty_matches() {
        let re = Regex::new("x*").unwrap();
        let found = find_all(&re, "axxbx", 10);
        assert_eq!(found, vec![1..3, 4..5]);
    }

    #[test]
    fn test_find_all_respects_limit() {
        let re = literal_pattern("ab").unwrap();
        assert_eq!(find_all(&re, "ababab", 2).len(), 2);
    }

    #[test]
    fn test_sentence_ranges() {
        let text = "First one. Second!  Third?  tail";
        let got: Vec<&str> = sentence_ranges(text).into_iter().map(|r| &text[r]).collect();
        assert_eq!(got, vec!["First one.", "Second!", "Third?", "tail"]);
    }

    #[test]
    fn test_advance_chars_counts_chars_not_bytes() {
        let text = "héllo";
        assert_eq!(advance_chars(text, 0, 2), 3);
        assert_eq!(advance_chars(text, 0, 99), text.len());
    }

    #[test]
    fn test_trimmed_range() {
        assert_eq!(trimmed_range("  ab "), 2..4);
        assert_eq!(trimmed_range("   "), 0..0);
    }
}
