// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Type-safe match deduplication and the ranking pass built on it.
//!
//! A position in the tree should be highlighted at most once. Sounds obvious,
//! but several snippets from one oracle reply routinely resolve to the same
//! sentence, and a cross-span match may cover exactly what another snippet
//! found. The identity of a match is its full list of `(leaf, start, end)`
//! triples, so a cross-span match only collides with an identical cross-span
//! match, never with one of its own pieces.
//!
//! **Invariant**: `rank` output has no two matches with the same span list and
//! never more than `limit` entries.

use std::collections::HashSet;

use crate::config::SearchConfig;
use crate::scoring::ranking::sort_matches;
use crate::tree::NodeId;
use crate::types::Match;

/// Identity of a match: every constituent span, in order.
pub type MatchKey = Vec<(NodeId, usize, usize)>;

/// Identity key of a match.
pub fn match_key(m: &Match) -> MatchKey {
    m.spans().iter().map(|s| (s.leaf, s.start, s.end)).collect()
}

/// Order-preserving merger that keeps the first occurrence of each identity.
///
/// # Example
///
/// ```ignore
/// let mut merger = MatchMerger::new();
/// merger.merge_all(snippet_one_matches);
/// merger.merge_all(snippet_two_matches);
/// let ranked = merger.into_ranked(15);
/// ```
#[derive(Debug, Default)]
pub struct MatchMerger {
    seen: HashSet<MatchKey>,
    matches: Vec<Match>,
}

impl MatchMerger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a match unless its identity was already seen. Returns whether it was kept.
    pub fn merge(&mut self, m: Match) -> bool {
        if self.seen.insert(match_key(&m)) {
            self.matches.push(m);
            true
        } else {
            false
        }
    }

    pub fn merge_all(&mut self, matches: impl IntoIterator<Item = Match>) {
        for m in matches {
            self.merge(m);
        }
    }

    pub fn len(&self) -> usize {
        self.matches.len()
    }

    pub fn is_empty(&self) -> bool {
        self.matches.is_empty()
    }

    /// Stable-sort into ranking order and truncate to `limit`.
    pub fn into_ranked(self, limit: usize) -> Vec<Match> {
        let mut matches = self.matches;
        sort_matches(&mut matches);
        matches.truncate(limit);
        matches
    }
}

/// Deduplicate, order, and cap resolved matches.
#[derive(Debug, Clone, Copy)]
pub struct MatchRanker {
    limit: usize,
}

impl Default for MatchRanker {
    fn default() -> Self {
        Self::new(&SearchConfig::default())
    }
}

impl MatchRanker {
    pub fn new(config: &SearchConfig) -> Self {
        Self::with_limit(config.max_highlights)
    }

    pub fn with_limit(limit: usize) -> Self {
        Self { limit }
    }

    pub fn limit(&self) -> usize {
        self.limit
    }

    pub fn rank(&self, matches: Vec<Match>) -> Vec<Match> {
        let mut merger = MatchMerger::new();
        merger.merge_all(matches);
        merger.into_ranked(self.limit)
    }
}
