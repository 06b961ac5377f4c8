// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Search algorithms: where the rubber meets the road.
//!
//! Two ways in. `LiteralMatcher` finds the query verbatim and is done.
//! `SnippetResolver` takes the oracle's snippets and works down a ladder
//! (exact → cross-span → fuzzy → word coincidence) until each one lands
//! somewhere or is given up on. Either way the result goes through
//! `MatchRanker` before anything is drawn.

pub mod dedup;
pub mod fuzzy;
pub mod literal;
pub mod resolve;
pub mod utils;

pub use dedup::{MatchMerger, MatchRanker};
pub use literal::LiteralMatcher;
pub use resolve::SnippetResolver;
