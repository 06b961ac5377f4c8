// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Literal search: the query, verbatim, anywhere a reader can see it.
//!
//! No relevance here. Matches come back in document order because that is the
//! only order a literal match has. Two caps keep a huge page from stalling the
//! caller: leaves scanned and matches kept.

use log::debug;

use crate::config::SearchConfig;
use crate::error::Result;
use crate::search::utils::{find_all, literal_pattern};
use crate::tree::scan::TextLeaves;
use crate::tree::Document;
use crate::types::{Match, Span};

/// Case-insensitive literal scanner over every visible text leaf.
#[derive(Debug, Clone)]
pub struct LiteralMatcher {
    max_depth: usize,
    max_leaves: usize,
    max_matches: usize,
}

impl Default for LiteralMatcher {
    fn default() -> Self {
        Self::new(&SearchConfig::default())
    }
}

impl LiteralMatcher {
    pub fn new(config: &SearchConfig) -> Self {
        Self {
            max_depth: config.max_depth,
            max_leaves: config.literal_max_leaves,
            max_matches: config.literal_max_matches,
        }
    }

    /// Find every occurrence of `query` as an `Exact` match, in document order.
    ///
    /// An empty query matches nothing. The only error is the regex engine
    /// refusing the escaped pattern (a query too large to compile).
    pub fn search(&self, doc: &Document, query: &str) -> Result<Vec<Match>> {
        if query.is_empty() {
            return Ok(Vec::new());
        }
        let pattern = literal_pattern(query)?;
        let mut matches = Vec::new();
        let mut scanned = 0;

        for leaf in TextLeaves::new(doc, doc.root()).max_depth(self.max_depth) {
            if scanned == self.max_leaves {
                debug!("literal: leaf cap {} reached", self.max_leaves);
                break;
            }
            scanned += 1;
            let Some(text) = doc.text(leaf) else {
                continue;
            };
            let remaining = self.max_matches - matches.len();
            for range in find_all(&pattern, text, remaining) {
                matches.push(Match::Exact {
                    span: Span::new(leaf, range.start, range.end),
                    text: text[range].to_string(),
                });
            }
            if matches.len() == self.max_matches {
                debug!("literal: match cap {} reached", self.max_matches);
                break;
            }
        }

        debug!(
            "literal: {:?} -> {} matches over {} leaves",
            query,
            matches.len(),
            scanned
        );
        Ok(matches)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::DocBuilder;

    #[test]
    fn test_finds_email_in_sentence() {
        let doc = DocBuilder::new()
            .para("Contact us at help@example.com today")
            .build();
        let matches = LiteralMatcher::default()
            .search(&doc, "help@example.com")
            .unwrap();

        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].text(), "help@example.com");
    }

    #[test]
    fn test_case_insensitive_document_order() {
        let doc = DocBuilder::new()
            .para("Rust is fast. RUST is safe.")
            .para("rust")
            .build();
        let matches = LiteralMatcher::default().search(&doc, "rust").unwrap();
        let texts: Vec<&str> = matches.iter().map(Match::text).collect();
        assert_eq!(texts, vec!["Rust", "RUST", "rust"]);
        assert!(matches[0].spans()[0].leaf < matches[2].spans()[0].leaf);
    }

    #[test]
    fn test_metacharacters_are_literal() {
        let doc = DocBuilder::new().para("cost: $5.00 (approx)").build();
        let matcher = LiteralMatcher::default();
        assert_eq!(matcher.search(&doc, "$5.00 (").unwrap().len(), 1);
        assert!(matcher.search(&doc, "5x00").unwrap().is_empty());
    }

    #[test]
    fn test_match_cap() {
        let doc = DocBuilder::new().para(&"ab ".repeat(50)).build();
        let config = SearchConfig {
            literal_max_matches: 7,
            ..SearchConfig::default()
        };
        let matches = LiteralMatcher::new(&config).search(&doc, "ab").unwrap();
        assert_eq!(matches.len(), 7);
    }

    #[test]
    fn test_empty_query_matches_nothing() {
        let doc = DocBuilder::new().para("anything").build();
        assert!(LiteralMatcher::default().search(&doc, "").unwrap().is_empty());
    }
}
