// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Search sessions: the state machine that ties everything together.
//!
//! ```text
//!            submit(q)                    oracle reply (seq matches)
//!   Idle ──────────────▶ Searching{mode} ─────────────────────────▶ Idle
//!    ▲                        │  newer submit ⇒ older seq is stale     │
//!    │                        ▼                                        │
//!    └──────── end_session ◀──┴──── mutation (debounced) ⇒ re-run ◀────┘
//! ```
//!
//! `SearchOrchestrator` is synchronous and clock-injected: it never awaits.
//! When it needs the oracle it returns `Step::NeedsOracle` with a sequence
//! number, and whoever owns the executor (`SearchDriver`, or a test) calls
//! `complete` with the reply later. A reply whose sequence number is no longer
//! the pending one is dropped. That check is the only cancellation there is.

mod debounce;
mod driver;
mod orchestrator;

use serde::Serialize;

use crate::types::SearchMode;

pub use debounce::{Debouncer, MutationDebouncer, QueryDebouncer};
pub use driver::{search_once, DriverEvent, SearchDriver, SearchObserver};
pub use orchestrator::{SearchOrchestrator, ERROR_STATUS};

/// A raw query split into mode and search text.
///
/// A leading `/` forces semantic search, a leading `'` forces literal search,
/// anything else is progressive. Surrounding whitespace is ignored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ParsedQuery {
    pub mode: SearchMode,
    pub text: String,
}

impl ParsedQuery {
    /// `None` when nothing is left to search for.
    pub fn parse(raw: &str) -> Option<Self> {
        let trimmed = raw.trim();
        let (mode, text) = if let Some(rest) = trimmed.strip_prefix('/') {
            (SearchMode::ForcedSemantic, rest)
        } else if let Some(rest) = trimmed.strip_prefix('\'') {
            (SearchMode::ForcedLiteral, rest)
        } else {
            (SearchMode::Progressive, trimmed)
        };
        let text = text.trim();
        (!text.is_empty()).then(|| ParsedQuery {
            mode,
            text: text.to_string(),
        })
    }
}

/// The one active search. Replaced wholesale on every submit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchSession {
    pub raw_query: String,
    pub query: ParsedQuery,
    /// Sequence number of the run that produced the current results.
    pub seq: u64,
    /// Whether mutations should re-run this session.
    pub active: bool,
}

impl SearchSession {
    pub fn mode(&self) -> SearchMode {
        self.query.mode
    }
}

/// Severity of a status message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum StatusKind {
    Info,
    Success,
    Warning,
    Error,
}

/// Something the UI should show.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "event", rename_all = "camelCase")]
pub enum UiEvent {
    /// Cursor (0-based, `None` for no selection) and total.
    ResultCount { current: Option<usize>, total: usize },
    Status { text: String, kind: StatusKind },
    /// An oracle call started (`true`) or settled (`false`).
    Busy(bool),
}

/// How a search run ended.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "camelCase")]
pub enum Outcome {
    Matches { mode: SearchMode, count: usize },
    NoMatch { mode: SearchMode },
    Failed { mode: SearchMode, message: String },
    /// Nothing to search for (empty query).
    Ignored,
}

/// What the orchestrator needs from the oracle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OracleRequest {
    pub seq: u64,
    pub query: String,
    pub content: String,
}

/// Result of driving the orchestrator one step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Step {
    Done(Outcome),
    NeedsOracle(OracleRequest),
}
