// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Match ranking: how resolved matches get sorted.
//!
//! The ranking is bucketed, not purely numeric. Exact and cross-span matches
//! form one authoritative bucket (the oracle copied real text) and always come
//! first, in discovery order. Fuzzy and word-coincidence matches follow,
//! ordered by descending score. Ties keep discovery order because callers use a
//! stable sort.

use std::cmp::Ordering;

use crate::types::Match;

/// Compare two matches for ranking.
///
/// Sort order:
/// 1. **Bucket** - authoritative (exact, cross-span) before everything else
/// 2. **Score** - only among non-authoritative matches (higher wins)
///
/// Returns `Equal` for everything else so a stable sort preserves document
/// order within a bucket.
pub fn compare_matches(a: &Match, b: &Match) -> Ordering {
    let a_auth = a.kind().is_authoritative();
    let b_auth = b.kind().is_authoritative();
    match (a_auth, b_auth) {
        (true, false) => Ordering::Less,
        (false, true) => Ordering::Greater,
        (true, true) => Ordering::Equal,
        (false, false) => b
            .score()
            .partial_cmp(&a.score())
            .unwrap_or(Ordering::Equal),
    }
}

/// Stable-sort matches into ranking order, in place.
pub fn sort_matches(matches: &mut [Match]) {
    matches.sort_by(compare_matches);
}
