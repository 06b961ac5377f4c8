// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Find-in-page over a live document tree.
//!
//! A query is either matched literally against the visible text leaves, or
//! handed to an external oracle together with the page's main content. The
//! oracle answers with snippets of that content; we map them back onto leaves
//! and offsets, rank them, and wrap them in markers the user can step through.
//! The page may change underneath at any time, and the oracle may answer late
//! or never.
//!
//! # Architecture
//!
//! ```text
//!                ┌──────────────────────────────┐
//!   query ──────▶│  session::SearchOrchestrator │◀──── tree mutations
//!                └──────┬───────────────┬───────┘
//!          literal      │               │   semantic
//!                       ▼               ▼
//!          ┌──────────────────┐   ┌─────────────────┐    ┌──────────┐
//!          │ search::literal  │   │ extract          │──▶│  oracle  │
//!          │ (LiteralMatcher) │   │ (ContentExtractor)│   └────┬─────┘
//!          └────────┬─────────┘   └─────────────────┘         │ snippets
//!                   │                                          ▼
//!                   │                          ┌────────────────────────┐
//!                   │                          │ search::resolve        │
//!                   │                          │ (SnippetResolver)      │
//!                   │                          └───────────┬────────────┘
//!                   ▼                                      ▼
//!          ┌─────────────────────────────────────────────────────┐
//!          │ search::dedup (MatchRanker) → highlight (markers)   │
//!          └─────────────────────────────────────────────────────┘
//!                                     │
//!                                     ▼
//!                          tree (Document arena)
//! ```
//!
//! `session::SearchDriver` wraps the orchestrator in a single-threaded tokio
//! loop with debouncing and oracle timeouts.
//!
//! # Usage
//!
//! ```ignore
//! use glint::{Document, SearchConfig, SearchOrchestrator, Step};
//!
//! let doc = Document::from_path("page.json")?;
//! let mut session = SearchOrchestrator::new(doc, &SearchConfig::default());
//! match session.submit("'budget", std::time::Instant::now()) {
//!     Step::Done(outcome) => println!("{outcome:?}"),
//!     Step::NeedsOracle(request) => { /* ask, then session.complete(request.seq, reply) */ }
//! }
//! ```

// Module declarations
pub mod config;
pub mod contracts;
pub mod error;
pub mod extract;
pub mod highlight;
pub mod oracle;
pub mod scoring;
pub mod search;
pub mod session;
pub mod testing;
pub mod tree;
pub mod types;
pub mod utils;

// Re-exports for public API
pub use config::SearchConfig;
pub use error::{GlintError, OracleError, Result};
pub use extract::{ContentExtractor, ExtractStats, Extraction};
pub use highlight::{HighlightManager, HighlightReport};
pub use oracle::{FailingOracle, FnOracle, Oracle, OracleReply, StaticOracle, NO_MATCH_SENTINEL};
pub use scoring::ranking::{compare_matches, sort_matches};
pub use search::{LiteralMatcher, MatchMerger, MatchRanker, SnippetResolver};
pub use session::{
    search_once, DriverEvent, Outcome, ParsedQuery, SearchDriver, SearchObserver, SearchOrchestrator,
    StatusKind, Step, UiEvent,
};
pub use tree::{Document, NodeId};
pub use types::{CursorPosition, Direction, Match, MatchKind, SearchMode, Span};
