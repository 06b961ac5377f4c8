// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! The math behind fuzzy resolution.
//!
//! An oracle that paraphrases still tends to reuse the important words. So a
//! piece of text scores by two things: how many of the snippet's words it
//! contains, and how tightly those words cluster.
//!
//! ```text
//! score = 0.7 × (matched words / snippet words)
//!       + 0.3 × max(0, 1 − spread / (avg word len × |W| × 3))
//! ```
//!
//! The proximity term is zero when fewer than two words matched (one word has
//! no spread to speak of). A text that contains the snippet verbatim scores
//! 1.0 no matter what the formula says.
//!
//! # Constants
//!
//! | Constant | Value | Meaning |
//! |----------|-------|---------|
//! | `FUZZY_WORD_WEIGHT` | 0.7 | Share of score from word overlap |
//! | `PROXIMITY_WEIGHT` | 0.3 | Share of score from clustering |
//! | `LONG_SNIPPET_THRESHOLD` | 0.8 | Leaf acceptance for snippets ≥ 50 chars |
//! | `SHORT_SNIPPET_THRESHOLD` | 0.6 | Leaf acceptance for shorter snippets |
//! | `SENTENCE_ACCEPT` | 0.6 | Best sentence must reach this |
//! | `WORD_RANGE_ACCEPT` | 0.7 | First-to-last word range must reach this |

// =============================================================================
// SCORING CONSTANTS
// =============================================================================

/// Weight of the word-overlap fraction.
pub const FUZZY_WORD_WEIGHT: f64 = 0.7;

/// Weight of the proximity term.
pub const PROXIMITY_WEIGHT: f64 = 0.3;

/// Proximity window, in multiples of the snippet's total word length.
pub const PROXIMITY_SPREAD_FACTOR: f64 = 3.0;

/// Snippets at least this long (chars) count as long.
pub const LONG_SNIPPET_CHARS: usize = 50;

/// Leaf acceptance threshold for long snippets.
pub const LONG_SNIPPET_THRESHOLD: f64 = 0.8;

/// Leaf acceptance threshold for short snippets (names, emails, ...).
pub const SHORT_SNIPPET_THRESHOLD: f64 = 0.6;

/// Sentences shorter than this (chars) are not scored.
pub const SENTENCE_MIN_CHARS: usize = 10;

/// A sentence must score at least this to become the match span.
pub const SENTENCE_ACCEPT: f64 = 0.6;

/// The first-to-last matched word range must score at least this.
pub const WORD_RANGE_ACCEPT: f64 = 0.7;

/// Snippets shorter than this (chars) are never resolved.
pub const MIN_SNIPPET_CHARS: usize = 3;

/// Only words longer than this (chars) take part in fuzzy scoring.
pub const MIN_FUZZY_WORD_CHARS: usize = 2;

/// Short snippets with at most this many words may resolve by word coincidence.
pub const WORD_COINCIDENCE_MAX_WORDS: usize = 3;

// Compile-time sanity: weights form a convex combination and thresholds
// are ordered the way the resolution steps assume.
const _: () = {
    assert!(FUZZY_WORD_WEIGHT + PROXIMITY_WEIGHT == 1.0);
    assert!(LONG_SNIPPET_THRESHOLD > SHORT_SNIPPET_THRESHOLD);
    assert!(WORD_RANGE_ACCEPT > SENTENCE_ACCEPT);
    assert!(MIN_SNIPPET_CHARS > 0);
};

/// Leaf acceptance threshold for a snippet of `snippet_chars` characters.
#[inline]
pub fn leaf_threshold(snippet_chars: usize) -> f64 {
    if snippet_chars >= LONG_SNIPPET_CHARS {
        LONG_SNIPPET_THRESHOLD
    } else {
        SHORT_SNIPPET_THRESHOLD
    }
}

/// Proximity term in `[0, 1]`.
///
/// `spread` is the distance (chars) between the furthest-apart matched word
/// offsets, `avg_word_chars` the mean length of the snippet's words and
/// `word_count` their number.
pub fn proximity(matched: usize, spread: usize, avg_word_chars: f64, word_count: usize) -> f64 {
    if matched < 2 || word_count == 0 {
        return 0.0;
    }
    let window = avg_word_chars * word_count as f64 * PROXIMITY_SPREAD_FACTOR;
    if window <= 0.0 {
        return 0.0;
    }
    (1.0 - spread as f64 / window).max(0.0)
}

/// Combine word overlap and proximity into a score in `[0, 1]`.
pub fn overlap_score(matched: usize, word_count: usize, spread: usize, avg_word_chars: f64) -> f64 {
    if word_count == 0 {
        return 0.0;
    }
    let fraction = matched.min(word_count) as f64 / word_count as f64;
    let score = FUZZY_WORD_WEIGHT * fraction
        + PROXIMITY_WEIGHT * proximity(matched, spread, avg_word_chars, word_count);
    score.clamp(0.0, 1.0)
}
