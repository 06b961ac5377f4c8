// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Snippet resolution: mapping oracle text back onto tree coordinates.
//!
//! The oracle hands back strings. We need leaves and offsets. Each snippet
//! goes through a ladder of increasingly forgiving strategies and stops at the
//! first rung that produces anything:
//!
//! ```text
//! snippet ──▶ too short / generic? ──▶ dropped
//!    │
//!    ├─▶ exact (one leaf, case-insensitive)        → Exact
//!    ├─▶ cross-span (> 50 chars, ≤ 5 leaves)      → CrossSpan (≤ 3)
//!    ├─▶ fuzzy (word overlap + proximity)          → Fuzzy (top 5)
//!    └─▶ word coincidence (< 50 chars, ≤ 3 words)  → WordCoincidence (top 5)
//! ```
//!
//! Snippets are resolved independently; one snippet whose pattern fails to
//! compile is logged and skipped without affecting the others. The resolver
//! treats every string it is given as a snippet, including sentinel strings an
//! oracle might use for "nothing found". Filtering those is the oracle
//! adapter's job.

use std::cmp::Ordering;
use std::ops::Range;

use log::{debug, trace, warn};
use regex::Regex;

use crate::config::SearchConfig;
use crate::error::Result;
use crate::scoring::{leaf_threshold, MIN_SNIPPET_CHARS, WORD_COINCIDENCE_MAX_WORDS};
use crate::search::fuzzy::SnippetWords;
use crate::search::utils::{advance_chars, find_all, literal_pattern, snippet_pattern, trimmed_range};
use crate::tree::scan::TextLeaves;
use crate::tree::{Document, NodeId};
use crate::types::{Match, Span};
use crate::utils::{char_len, is_generic_snippet, words};

/// Occurrences of one word considered when looking for a coincidence window.
const MAX_WORD_OCCURRENCES: usize = 64;

/// One leaf's contribution to a joined cross-span window.
struct Segment {
    leaf: NodeId,
    /// Range within the joined string.
    joined: Range<usize>,
    /// Byte offset of the trimmed text within the leaf.
    offset: usize,
}

/// Resolves oracle snippets to matches in a document.
#[derive(Debug, Clone)]
pub struct SnippetResolver {
    max_depth: usize,
    max_exact: usize,
    cross_span_min_chars: usize,
    cross_span_window: usize,
    cross_span_max_matches: usize,
    top_k: usize,
    word_window: usize,
}

impl Default for SnippetResolver {
    fn default() -> Self {
        Self::new(&SearchConfig::default())
    }
}

impl SnippetResolver {
    pub fn new(config: &SearchConfig) -> Self {
        Self {
            max_depth: config.max_depth,
            max_exact: config.literal_max_matches,
            cross_span_min_chars: config.cross_span_min_chars,
            cross_span_window: config.cross_span_window,
            cross_span_max_matches: config.cross_span_max_matches,
            top_k: config.fuzzy_top_k,
            word_window: config.word_window,
        }
    }

    /// Resolve every snippet, concatenating their matches in snippet order.
    ///
    /// The output is not deduplicated or ranked; that is `MatchRanker`'s job.
    pub fn resolve<S: AsRef<str>>(&self, doc: &Document, snippets: &[S]) -> Vec<Match> {
        let leaves = self.leaves(doc);
        let mut matches = Vec::new();
        for snippet in snippets {
            let snippet = snippet.as_ref();
            match self.resolve_in(&leaves, snippet) {
                Ok(found) => {
                    debug!("resolve: {:?} -> {} matches", snippet, found.len());
                    matches.extend(found);
                }
                Err(e) => warn!("resolve: skipping snippet {:?}: {}", snippet, e),
            }
        }
        matches
    }

    /// Resolve a single snippet.
    pub fn resolve_snippet(&self, doc: &Document, snippet: &str) -> Result<Vec<Match>> {
        self.resolve_in(&self.leaves(doc), snippet)
    }

    fn leaves<'d>(&self, doc: &'d Document) -> Vec<(NodeId, &'d str)> {
        TextLeaves::new(doc, doc.root())
            .max_depth(self.max_depth)
            .filter_map(|leaf| doc.text(leaf).map(|text| (leaf, text)))
            .collect()
    }

    fn resolve_in(&self, leaves: &[(NodeId, &str)], snippet: &str) -> Result<Vec<Match>> {
        let snippet = snippet.trim();
        let chars = char_len(snippet);
        if chars < MIN_SNIPPET_CHARS {
            trace!("resolve: {:?} too short", snippet);
            return Ok(Vec::new());
        }
        if is_generic_snippet(snippet) {
            debug!("resolve: {:?} is generic, skipped", snippet);
            return Ok(Vec::new());
        }

        let verbatim = snippet_pattern(snippet)?;

        let exact = self.exact(leaves, &verbatim);
        if !exact.is_empty() {
            return Ok(exact);
        }

        if chars > self.cross_span_min_chars {
            let cross = self.cross_span(leaves, &verbatim);
            if !cross.is_empty() {
                return Ok(cross);
            }
        }

        let fuzzy = self.fuzzy(leaves, snippet, &verbatim, chars)?;
        if !fuzzy.is_empty() {
            return Ok(fuzzy);
        }

        if chars < self.cross_span_min_chars {
            return self.word_coincidence(leaves, snippet);
        }
        Ok(Vec::new())
    }

    // =========================================================================
    // EXACT
    // =========================================================================

    fn exact(&self, leaves: &[(NodeId, &str)], pattern: &Regex) -> Vec<Match> {
        let mut found = Vec::new();
        for &(leaf, text) in leaves {
            let remaining = self.max_exact - found.len();
            if remaining == 0 {
                break;
            }
            for range in find_all(pattern, text, remaining) {
                found.push(Match::Exact {
                    span: Span::new(leaf, range.start, range.end),
                    text: text[range].to_string(),
                });
            }
        }
        found
    }

    // =========================================================================
    // CROSS-SPAN
    // =========================================================================

    /// Join up to `cross_span_window` consecutive leaves with single spaces
    /// and look for a hit that starts in the first leaf and runs past it.
    fn cross_span(&self, leaves: &[(NodeId, &str)], pattern: &Regex) -> Vec<Match> {
        let mut found = Vec::new();
        let mut i = 0;
        while i + 1 < leaves.len() && found.len() < self.cross_span_max_matches {
            let end = (i + self.cross_span_window).min(leaves.len());
            let (joined, segments) = join_window(&leaves[i..end]);
            let first_end = segments[0].joined.end;

            let hit = pattern
                .find(&joined)
                .filter(|m| m.start() < first_end && m.end() > first_end);
            let Some(hit) = hit else {
                i += 1;
                continue;
            };

            let mut spans = Vec::new();
            let mut last = 0;
            for (k, seg) in segments.iter().enumerate() {
                let lo = hit.start().max(seg.joined.start);
                let hi = hit.end().min(seg.joined.end);
                if lo < hi {
                    spans.push(Span::new(
                        seg.leaf,
                        seg.offset + lo - seg.joined.start,
                        seg.offset + hi - seg.joined.start,
                    ));
                    last = k;
                }
            }
            if spans.len() >= 2 {
                let text = spans
                    .iter()
                    .filter_map(|s| {
                        let leaf_text = leaves.iter().find(|(id, _)| *id == s.leaf)?.1;
                        s.slice(leaf_text)
                    })
                    .collect::<Vec<_>>()
                    .join(" ");
                trace!("resolve: cross-span over {} leaves", spans.len());
                found.push(Match::CrossSpan { spans, text });
                // Resume after the consumed leaves.
                i += last + 1;
            } else {
                i += 1;
            }
        }
        found
    }

    // =========================================================================
    // FUZZY
    // =========================================================================

    fn fuzzy(
        &self,
        leaves: &[(NodeId, &str)],
        snippet: &str,
        verbatim: &Regex,
        chars: usize,
    ) -> Result<Vec<Match>> {
        let words = SnippetWords::new(snippet)?;
        if words.is_empty() {
            return Ok(Vec::new());
        }
        let threshold = leaf_threshold(chars);

        let mut found = Vec::new();
        for &(leaf, text) in leaves {
            let Some(scored) = words.score(text, verbatim) else {
                continue;
            };
            if scored.score < threshold {
                continue;
            }
            trace!("resolve: leaf {leaf} scored {:.2}", scored.score);
            if let Some((range, score)) = words.best_phrase(text, verbatim) {
                found.push(Match::Fuzzy {
                    span: Span::new(leaf, range.start, range.end),
                    text: text[range].to_string(),
                    score,
                });
            }
        }
        found.sort_by(|a, b| b.score().partial_cmp(&a.score()).unwrap_or(Ordering::Equal));
        found.truncate(self.top_k);
        Ok(found)
    }

    // =========================================================================
    // WORD COINCIDENCE
    // =========================================================================

    fn word_coincidence(&self, leaves: &[(NodeId, &str)], snippet: &str) -> Result<Vec<Match>> {
        let tokens: Vec<&str> = words(snippet).collect();
        if tokens.is_empty() || tokens.len() > WORD_COINCIDENCE_MAX_WORDS {
            return Ok(Vec::new());
        }
        let patterns = tokens
            .iter()
            .map(|w| literal_pattern(w))
            .collect::<Result<Vec<_>>>()?;

        let mut found = Vec::new();
        for &(leaf, text) in leaves {
            if found.len() == self.top_k {
                break;
            }
            if let Some(range) = coincidence_window(text, &patterns, self.word_window) {
                found.push(Match::WordCoincidence {
                    span: Span::new(leaf, range.start, range.end),
                    text: text[range].to_string(),
                });
            }
        }
        Ok(found)
    }
}

fn join_window(window: &[(NodeId, &str)]) -> (String, Vec<Segment>) {
    let mut joined = String::new();
    let mut segments = Vec::with_capacity(window.len());
    for &(leaf, text) in window {
        let trimmed = trimmed_range(text);
        if !joined.is_empty() {
            joined.push(' ');
        }
        let start = joined.len();
        joined.push_str(&text[trimmed.clone()]);
        segments.push(Segment {
            leaf,
            joined: start..joined.len(),
            offset: trimmed.start,
        });
    }
    (joined, segments)
}

/// Earliest window of at most `window_chars` chars containing every word.
///
/// Brute force over word occurrences as anchors; words are few and short.
fn coincidence_window(text: &str, patterns: &[Regex], window_chars: usize) -> Option<Range<usize>> {
    let occurrences: Vec<Vec<Range<usize>>> = patterns
        .iter()
        .map(|p| find_all(p, text, MAX_WORD_OCCURRENCES))
        .collect();
    if occurrences.iter().any(Vec::is_empty) {
        return None;
    }

    let mut anchors: Vec<usize> = occurrences.iter().flatten().map(|r| r.start).collect();
    anchors.sort_unstable();
    anchors.dedup();

    for start in anchors {
        let limit = advance_chars(text, start, window_chars);
        let mut end = start;
        let all_inside = occurrences.iter().all(|occ| {
            match occ.iter().find(|r| r.start >= start && r.end <= limit) {
                Some(r) => {
                    end = end.max(r.end);
                    true
                }
                None => false,
            }
        });
        if all_inside {
            return Some(start..end);
        }
    }
    None
}
