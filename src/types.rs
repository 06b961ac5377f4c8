// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! The vocabulary of a search: spans, matches, modes, cursor positions.
//!
//! A `Span` is a half-open byte range inside one text leaf. It is computed at
//! one moment and used at another, and the leaf may have changed in between,
//! so every consumer re-validates it with `Span::clamp_to` before touching the
//! tree. Nothing here holds a reference into the document.
//!
//! `Match` is a tagged union: each way of finding text carries exactly the data
//! it needs. A cross-span match owns one span per leaf it crosses; everything
//! else owns exactly one.
//!
//! # Invariants
//!
//! - **Span**: `start < end`, both on char boundaries of the text it was built
//!   against. `clamp_to` restores this against the *current* text or gives up.
//! - **Match**: `score() ∈ [0, 1]`; exact and cross-span matches score 1.0.
//! - **CrossSpan**: spans are ordered by document position, one per leaf.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::tree::NodeId;

// =============================================================================
// SPANS
// =============================================================================

/// Half-open byte range `[start, end)` within one text leaf.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Span {
    pub leaf: NodeId,
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub fn new(leaf: NodeId, start: usize, end: usize) -> Self {
        Self { leaf, start, end }
    }

    /// Length in bytes.
    #[inline]
    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.end <= self.start
    }

    /// Re-validate against the leaf's current text.
    ///
    /// `end` is clamped to the text length, then both ends are snapped inward
    /// to char boundaries. Returns `None` if nothing is left.
    pub fn clamp_to(&self, text: &str) -> Option<Span> {
        let mut end = self.end.min(text.len());
        let mut start = self.start.min(end);
        while start < end && !text.is_char_boundary(start) {
            start += 1;
        }
        while end > start && !text.is_char_boundary(end) {
            end -= 1;
        }
        (start < end).then_some(Span {
            leaf: self.leaf,
            start,
            end,
        })
    }

    /// The covered text, if the span still fits `text`.
    pub fn slice<'t>(&self, text: &'t str) -> Option<&'t str> {
        text.get(self.start..self.end)
    }
}

// =============================================================================
// MATCHES
// =============================================================================

/// How a match was found. Ordering is discovery strength, strongest first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum MatchKind {
    Exact,
    CrossSpan,
    Fuzzy,
    WordCoincidence,
}

impl MatchKind {
    /// Exact and cross-span matches are copied text, not guesses.
    #[inline]
    pub fn is_authoritative(self) -> bool {
        matches!(self, MatchKind::Exact | MatchKind::CrossSpan)
    }

    pub fn label(self) -> &'static str {
        match self {
            MatchKind::Exact => "exact",
            MatchKind::CrossSpan => "cross-span",
            MatchKind::Fuzzy => "fuzzy",
            MatchKind::WordCoincidence => "words",
        }
    }
}

impl fmt::Display for MatchKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Fixed score of word-coincidence matches.
pub const WORD_COINCIDENCE_SCORE: f64 = 0.9;

/// A resolved position (or positions) in the tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum Match {
    /// Verbatim, case-insensitive, inside one leaf.
    Exact { span: Span, text: String },
    /// Verbatim text reconstructed across consecutive leaves.
    CrossSpan { spans: Vec<Span>, text: String },
    /// Best-scoring phrase of a leaf that shares most of the snippet's words.
    Fuzzy { span: Span, text: String, score: f64 },
    /// All words of a short snippet within a small window of one leaf.
    WordCoincidence { span: Span, text: String },
}

impl Match {
    pub fn kind(&self) -> MatchKind {
        match self {
            Match::Exact { .. } => MatchKind::Exact,
            Match::CrossSpan { .. } => MatchKind::CrossSpan,
            Match::Fuzzy { .. } => MatchKind::Fuzzy,
            Match::WordCoincidence { .. } => MatchKind::WordCoincidence,
        }
    }

    /// Confidence in `[0, 1]`.
    pub fn score(&self) -> f64 {
        match self {
            Match::Exact { .. } | Match::CrossSpan { .. } => 1.0,
            Match::Fuzzy { score, .. } => *score,
            Match::WordCoincidence { .. } => WORD_COINCIDENCE_SCORE,
        }
    }

    /// Constituent spans in document order.
    pub fn spans(&self) -> &[Span] {
        match self {
            Match::CrossSpan { spans, .. } => spans,
            Match::Exact { span, .. }
            | Match::Fuzzy { span, .. }
            | Match::WordCoincidence { span, .. } => std::slice::from_ref(span),
        }
    }

    /// The matched text as it read when the match was computed.
    pub fn text(&self) -> &str {
        match self {
            Match::Exact { text, .. }
            | Match::CrossSpan { text, .. }
            | Match::Fuzzy { text, .. }
            | Match::WordCoincidence { text, .. } => text,
        }
    }
}

// =============================================================================
// SESSION VOCABULARY
// =============================================================================

/// Which pipeline a query runs through.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SearchMode {
    /// `'query`: literal only, never the oracle.
    ForcedLiteral,
    /// `/query`: oracle only, failures surfaced.
    ForcedSemantic,
    /// Literal first; oracle only if literal finds nothing.
    Progressive,
}

impl SearchMode {
    pub fn label(self) -> &'static str {
        match self {
            SearchMode::ForcedLiteral => "literal",
            SearchMode::ForcedSemantic => "semantic",
            SearchMode::Progressive => "progressive",
        }
    }
}

/// Navigation step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Next,
    Previous,
}

impl Direction {
    /// `+1` / `-1`, for callers that speak in deltas.
    pub fn from_delta(delta: i32) -> Option<Self> {
        match delta.signum() {
            1 => Some(Direction::Next),
            -1 => Some(Direction::Previous),
            _ => None,
        }
    }
}

/// Where the navigation cursor sits. `current` is 0-based; `None` means no
/// selection (nothing highlighted, or cleared).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CursorPosition {
    pub current: Option<usize>,
    pub total: usize,
}

impl fmt::Display for CursorPosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.current {
            Some(current) => write!(f, "{}/{}", current + 1, self.total),
            None => write!(f, "0/{}", self.total),
        }
    }
}
