// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Runtime contracts for spans, ranked lists, and highlight teardown.
//!
//! Debug-mode assertions only. They cost nothing in release builds and catch
//! the bugs that would otherwise show up as a corrupted page much later.
//!
//! # INVARIANTS (DO NOT REMOVE THESE CHECKS)
//!
//! | Contract Function        | Property                                           |
//! |--------------------------|----------------------------------------------------|
//! | `check_span_valid`       | `start < end <= len`, both on char boundaries      |
//! | `check_match_well_formed`| score in `[0, 1]`, cross-span crosses distinct leaves |
//! | `check_ranked`           | no duplicates, within limit, authoritative first   |
//! | `check_discarded`        | nothing we inserted survives `clear`               |
//!
//! # Usage
//!
//! ```ignore
//! use glint::contracts::*;
//!
//! // In debug builds, this panics if the ranked list is malformed
//! check_ranked(&ranked, limit);
//! ```

// ============================================================================
// COMPILE-TIME ASSERTIONS (evaluated at build time)
// ============================================================================

/// Guessed matches must never outrank copied text on score alone.
const _: () = {
    const AUTHORITATIVE: f64 = 1.0;
    assert!(crate::types::WORD_COINCIDENCE_SCORE < AUTHORITATIVE);
    assert!(crate::types::WORD_COINCIDENCE_SCORE > 0.0);
};

use std::collections::HashSet;

use crate::search::dedup::match_key;
use crate::tree::{Document, NodeId};
use crate::types::{Match, Span};

// ============================================================================
// SPAN CONTRACTS
// ============================================================================

/// Check that `span` addresses a non-empty, char-aligned slice of `text`.
///
/// # Panics (debug builds only)
/// Panics if the span is empty, runs past the text, or splits a character.
#[inline]
pub fn check_span_valid(span: &Span, text: &str) {
    debug_assert!(
        span.start < span.end,
        "Contract violation: empty span {}..{} on {}",
        span.start,
        span.end,
        span.leaf
    );
    debug_assert!(
        span.end <= text.len(),
        "Contract violation: span end {} > text.len() {} on {}",
        span.end,
        text.len(),
        span.leaf
    );
    debug_assert!(
        text.is_char_boundary(span.start) && text.is_char_boundary(span.end.min(text.len())),
        "Contract violation: span {}..{} splits a character on {}",
        span.start,
        span.end,
        span.leaf
    );
}

/// Check the shape of a single match.
#[inline]
pub fn check_match_well_formed(m: &Match) {
    let score = m.score();
    debug_assert!(
        (0.0..=1.0).contains(&score),
        "Contract violation: {} match scored {score}",
        m.kind()
    );
    debug_assert!(!m.spans().is_empty(), "Contract violation: {} match has no spans", m.kind());

    if let Match::CrossSpan { spans, .. } = m {
        debug_assert!(
            spans.len() >= 2,
            "Contract violation: cross-span match with {} span(s)",
            spans.len()
        );
        let leaves: HashSet<NodeId> = spans.iter().map(|s| s.leaf).collect();
        debug_assert!(
            leaves.len() == spans.len(),
            "Contract violation: cross-span match revisits a leaf"
        );
    }
}

// ============================================================================
// RANKING CONTRACTS
// ============================================================================

/// Check a list produced by the ranker.
///
/// # Panics (debug builds only)
/// Panics if the list is longer than `limit`, contains two matches with the
/// same span set, or lists a guessed match ahead of a copied one.
pub fn check_ranked(matches: &[Match], limit: usize) {
    debug_assert!(
        matches.len() <= limit,
        "Contract violation: {} ranked matches > limit {limit}",
        matches.len()
    );

    if cfg!(debug_assertions) {
        let mut seen = HashSet::with_capacity(matches.len());
        for (i, m) in matches.iter().enumerate() {
            check_match_well_formed(m);
            debug_assert!(
                seen.insert(match_key(m)),
                "Contract violation: ranked[{i}] duplicates an earlier match"
            );
        }
    }

    let first_guess = matches
        .iter()
        .position(|m| !m.kind().is_authoritative())
        .unwrap_or(matches.len());
    debug_assert!(
        matches[first_guess..].iter().all(|m| !m.kind().is_authoritative()),
        "Contract violation: authoritative match ranked after a guessed one"
    );
}

// ============================================================================
// HIGHLIGHT CONTRACTS
// ============================================================================

/// Check that every node in `ids` is gone from `doc`.
#[inline]
pub fn check_discarded(doc: &Document, ids: &[NodeId]) {
    for &id in ids {
        debug_assert!(
            !doc.contains(id),
            "Contract violation: {id} survived highlight teardown"
        );
    }
}
