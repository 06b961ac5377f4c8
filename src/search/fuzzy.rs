// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Fuzzy phrase location: text that shares most of a snippet's words.
//!
//! `SnippetWords` compiles one case-insensitive pattern per significant word
//! of the snippet (longer than two chars) and scores arbitrary text against
//! them with `scoring::overlap_score`. Word positions are the first occurrence
//! of each word; the spread between them is measured in chars.

use std::ops::Range;

use regex::Regex;

use crate::error::Result;
use crate::scoring::{
    overlap_score, MIN_FUZZY_WORD_CHARS, SENTENCE_ACCEPT, SENTENCE_MIN_CHARS, WORD_RANGE_ACCEPT,
};
use crate::search::utils::{literal_pattern, sentence_ranges};
use crate::utils::{char_len, words};

/// How well one piece of text matches the snippet.
#[derive(Debug, Clone, PartialEq)]
pub struct TextScore {
    pub score: f64,
    /// Start of the earliest matched word (bytes).
    pub first: usize,
    /// End of the latest matched word (bytes).
    pub last_end: usize,
}

/// A snippet's significant words, ready to score text against.
#[derive(Debug)]
pub struct SnippetWords {
    patterns: Vec<Regex>,
    avg_chars: f64,
}

impl SnippetWords {
    /// Compile patterns for every word longer than two chars.
    pub fn new(snippet: &str) -> Result<Self> {
        let significant: Vec<&str> = words(snippet)
            .filter(|w| char_len(w) > MIN_FUZZY_WORD_CHARS)
            .collect();
        let total_chars: usize = significant.iter().map(|w| char_len(w)).sum();
        let avg_chars = if significant.is_empty() {
            0.0
        } else {
            total_chars as f64 / significant.len() as f64
        };
        let patterns = significant
            .iter()
            .map(|w| literal_pattern(w))
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { patterns, avg_chars })
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }

    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    /// Score `text`. `None` when no word occurs at all.
    ///
    /// `verbatim` is the whole-snippet pattern: text containing the snippet
    /// itself scores 1.0 regardless of word statistics.
    pub fn score(&self, text: &str, verbatim: &Regex) -> Option<TextScore> {
        let hits: Vec<Range<usize>> = self
            .patterns
            .iter()
            .filter_map(|p| p.find(text).map(|m| m.range()))
            .collect();
        let first = hits.iter().map(|r| r.start).min()?;
        let last_start = hits.iter().map(|r| r.start).max().unwrap_or(first);
        let last_end = hits.iter().map(|r| r.end).max().unwrap_or(first);

        let score = if verbatim.is_match(text) {
            1.0
        } else {
            let spread = char_len(&text[first..last_start]);
            overlap_score(hits.len(), self.patterns.len(), spread, self.avg_chars)
        };
        Some(TextScore {
            score,
            first,
            last_end,
        })
    }

    /// Best phrase inside an accepted leaf: the best-scoring sentence, or the
    /// range from the first to the last matched word.
    ///
    /// Returns the byte range within `text` and its score.
    pub fn best_phrase(&self, text: &str, verbatim: &Regex) -> Option<(Range<usize>, f64)> {
        let best_sentence = sentence_ranges(text)
            .into_iter()
            .filter(|r| char_len(&text[r.clone()]) >= SENTENCE_MIN_CHARS)
            .filter_map(|r| {
                let scored = self.score(&text[r.clone()], verbatim)?;
                Some((r, scored.score))
            })
            .fold(None::<(Range<usize>, f64)>, |best, (r, s)| match best {
                Some((_, best_score)) if best_score >= s => best,
                _ => Some((r, s)),
            });
        if let Some((range, score)) = best_sentence {
            if score >= SENTENCE_ACCEPT {
                return Some((range, score));
            }
        }

        let whole = self.score(text, verbatim)?;
        let range = whole.first..whole.last_end;
        let ranged = self.score(&text[range.clone()], verbatim)?;
        (ranged.score >= WORD_RANGE_ACCEPT).then_some((range, ranged.score))
    }
}
