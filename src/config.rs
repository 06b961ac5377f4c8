// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Tunables, in one place.
//!
//! Every limit the pipeline enforces lives here with its default. The defaults
//! are the contract; a config file only needs the fields it wants to change:
//!
//! ```json
//! { "maxHighlights": 25, "queryDebounceMs": 150 }
//! ```

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{GlintError, Result};

/// Search pipeline configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default, deny_unknown_fields)]
pub struct SearchConfig {
    /// Shadow/frame boundaries the scanner may cross.
    pub max_depth: usize,
    /// Below this many chars the prioritized extraction falls back to a whole-tree walk.
    pub min_content_chars: usize,
    /// Extraction cap (chars), cut at the last sentence boundary before it.
    pub max_content_chars: usize,
    /// How long an extraction stays valid without mutations.
    pub cache_ttl_ms: u64,
    /// Literal matches kept per query.
    pub literal_max_matches: usize,
    /// Leaves the literal matcher scans before giving up.
    pub literal_max_leaves: usize,
    /// Highlights rendered per query (ranking cap).
    pub max_highlights: usize,
    /// Quiescence required after a query edit before searching.
    pub query_debounce_ms: u64,
    /// Quiescence required after a tree mutation before invalidating and re-searching.
    pub mutation_debounce_ms: u64,
    /// How long to wait for the oracle.
    pub oracle_timeout_ms: u64,
    /// Snippets longer than this (chars) may be reconstructed across leaves.
    pub cross_span_min_chars: usize,
    /// Consecutive leaves joined when reconstructing a snippet.
    pub cross_span_window: usize,
    /// Cross-span matches accepted per snippet.
    pub cross_span_max_matches: usize,
    /// Fuzzy and word-coincidence matches kept per snippet.
    pub fuzzy_top_k: usize,
    /// Window (chars) within which all words of a short snippet must coincide.
    pub word_window: usize,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            max_depth: 3,
            min_content_chars: 500,
            max_content_chars: 50_000,
            cache_ttl_ms: 5_000,
            literal_max_matches: 100,
            literal_max_leaves: 5_000,
            max_highlights: 15,
            query_debounce_ms: 300,
            mutation_debounce_ms: 1_000,
            oracle_timeout_ms: 30_000,
            cross_span_min_chars: 50,
            cross_span_window: 5,
            cross_span_max_matches: 3,
            fuzzy_top_k: 5,
            word_window: 100,
        }
    }
}

impl SearchConfig {
    /// Parse a JSON config, filling unspecified fields with defaults.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: SearchConfig =
            serde_json::from_str(json).map_err(|e| GlintError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Read a JSON config from disk.
    pub fn from_path(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path).map_err(|source| GlintError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&json)
    }

    /// Reject limits that would make the pipeline silently do nothing.
    pub fn validate(&self) -> Result<()> {
        let limits = [
            ("maxContentChars", self.max_content_chars),
            ("literalMaxMatches", self.literal_max_matches),
            ("literalMaxLeaves", self.literal_max_leaves),
            ("maxHighlights", self.max_highlights),
            ("crossSpanWindow", self.cross_span_window),
            ("fuzzyTopK", self.fuzzy_top_k),
            ("wordWindow", self.word_window),
        ];
        for (name, value) in limits {
            if value == 0 {
                return Err(GlintError::Config(format!("{name} must be greater than zero")));
            }
        }
        if self.min_content_chars > self.max_content_chars {
            return Err(GlintError::Config(format!(
                "minContentChars ({}) exceeds maxContentChars ({})",
                self.min_content_chars, self.max_content_chars
            )));
        }
        Ok(())
    }

    pub fn cache_ttl(&self) -> Duration {
        Duration::from_millis(self.cache_ttl_ms)
    }

    pub fn query_debounce(&self) -> Duration {
        Duration::from_millis(self.query_debounce_ms)
    }

    pub fn mutation_debounce(&self) -> Duration {
        Duration::from_millis(self.mutation_debounce_ms)
    }

    pub fn oracle_timeout(&self) -> Duration {
        Duration::from_millis(self.oracle_timeout_ms)
    }
}
