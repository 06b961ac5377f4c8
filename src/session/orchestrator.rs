// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! The synchronous search state machine.

use std::collections::VecDeque;
use std::time::Instant;

use log::{debug, info, warn};

use super::{
    MutationDebouncer, OracleRequest, Outcome, ParsedQuery, QueryDebouncer, SearchSession,
    StatusKind, Step, UiEvent,
};
use crate::config::SearchConfig;
use crate::error::OracleError;
use crate::extract::ContentExtractor;
use crate::highlight::{HighlightManager, HighlightReport};
use crate::oracle::OracleReply;
use crate::search::{LiteralMatcher, MatchRanker, SnippetResolver};
use crate::tree::Document;
use crate::types::{CursorPosition, Direction, Match, SearchMode};

/// Status text for failures surfaced to the user.
pub const ERROR_STATUS: &str = "Search error, try again";

/// Owns a document and everything searching it involves.
#[derive(Debug)]
pub struct SearchOrchestrator {
    doc: Document,
    literal: LiteralMatcher,
    resolver: SnippetResolver,
    ranker: MatchRanker,
    literal_ranker: MatchRanker,
    extractor: ContentExtractor,
    highlights: HighlightManager,
    session: Option<SearchSession>,
    /// Sequence number of the run waiting on the oracle.
    pending: Option<u64>,
    next_seq: u64,
    queries: QueryDebouncer,
    mutations: MutationDebouncer,
    events: VecDeque<UiEvent>,
}

impl SearchOrchestrator {
    pub fn new(doc: Document, config: &SearchConfig) -> Self {
        Self {
            doc,
            literal: LiteralMatcher::new(config),
            resolver: SnippetResolver::new(config),
            ranker: MatchRanker::new(config),
            literal_ranker: MatchRanker::with_limit(config.literal_max_matches),
            extractor: ContentExtractor::new(config),
            highlights: HighlightManager::new(),
            session: None,
            pending: None,
            next_seq: 0,
            queries: QueryDebouncer::new(config.query_debounce()),
            mutations: MutationDebouncer::new(config.mutation_debounce()),
            events: VecDeque::new(),
        }
    }

    // =========================================================================
    // ACCESSORS
    // =========================================================================

    pub fn document(&self) -> &Document {
        &self.doc
    }

    pub fn session(&self) -> Option<&SearchSession> {
        self.session.as_ref()
    }

    pub fn highlights(&self) -> &HighlightManager {
        &self.highlights
    }

    pub fn position(&self) -> CursorPosition {
        self.highlights.position()
    }

    /// Whether an oracle reply is awaited.
    pub fn is_waiting(&self) -> bool {
        self.pending.is_some()
    }

    /// Take every UI event emitted since the last drain.
    pub fn drain_events(&mut self) -> Vec<UiEvent> {
        self.events.drain(..).collect()
    }

    // =========================================================================
    // QUERIES
    // =========================================================================

    /// Run `raw` now, superseding whatever ran before.
    pub fn submit(&mut self, raw: &str, now: Instant) -> Step {
        self.queries.cancel();
        let Some(query) = ParsedQuery::parse(raw) else {
            debug!("session: empty query, ending session");
            self.end_session();
            return Step::Done(Outcome::Ignored);
        };
        info!("session: {} search for {:?}", query.mode.label(), query.text);
        self.session = Some(SearchSession {
            raw_query: raw.to_string(),
            query,
            seq: 0,
            active: true,
        });
        self.run(now)
    }

    /// Record a query edit; it runs once typing has been quiet long enough.
    pub fn edit_query(&mut self, raw: &str, now: Instant) {
        self.queries.push(raw.to_string(), now);
    }

    /// Earliest instant at which `poll` may have work.
    pub fn next_deadline(&self) -> Option<Instant> {
        match (self.queries.deadline(), self.mutations.deadline()) {
            (Some(a), Some(b)) => Some(a.min(b)),
            (a, b) => a.or(b),
        }
    }

    /// Fire whichever debounce is due. Query edits win over mutation re-runs
    /// since a new query re-reads the tree anyway.
    pub fn poll(&mut self, now: Instant) -> Option<Step> {
        if let Some(raw) = self.queries.poll(now) {
            return Some(self.submit(&raw, now));
        }
        self.poll_mutations(now)
    }

    /// Start a fresh run of the current session.
    fn run(&mut self, now: Instant) -> Step {
        self.next_seq += 1;
        let seq = self.next_seq;
        if self.pending.take().is_some() {
            self.emit(UiEvent::Busy(false));
        }
        self.highlights.clear(&mut self.doc);

        let Some(session) = self.session.as_mut() else {
            return Step::Done(Outcome::Ignored);
        };
        session.seq = seq;
        let mode = session.query.mode;
        let text = session.query.text.clone();

        match mode {
            SearchMode::ForcedLiteral => Step::Done(self.literal_pass(mode, &text)),
            SearchMode::Progressive => match self.literal_pass(mode, &text) {
                Outcome::NoMatch { .. } => self.semantic_pass(seq, mode, text, now),
                outcome => Step::Done(outcome),
            },
            SearchMode::ForcedSemantic => self.semantic_pass(seq, mode, text, now),
        }
    }

    /// Literal scan + highlight. Reports only when it found something or the
    /// mode ends here.
    fn literal_pass(&mut self, mode: SearchMode, text: &str) -> Outcome {
        let matches = match self.literal.search(&self.doc, text) {
            Ok(matches) => matches,
            Err(e) => {
                warn!("session: literal search failed: {e}");
                return self.fail(mode, e.to_string());
            }
        };
        let ranked = self.literal_ranker.rank(matches);
        self.apply(&ranked);
        let count = self.highlights.total();
        if count > 0 {
            self.report_count();
            self.status(format!("{} {}", count, plural(count, "match", "matches")), StatusKind::Success);
            return Outcome::Matches { mode, count };
        }
        if mode == SearchMode::ForcedLiteral {
            return self.no_match(mode);
        }
        debug!("session: no literal matches, asking the oracle");
        Outcome::NoMatch { mode }
    }

    fn semantic_pass(&mut self, seq: u64, mode: SearchMode, query: String, now: Instant) -> Step {
        let content = self.extractor.extract_at(&self.doc, now);
        if content.trim().is_empty() {
            debug!("session: nothing to send to the oracle");
            return Step::Done(self.no_match(mode));
        }
        self.pending = Some(seq);
        self.emit(UiEvent::Busy(true));
        Step::NeedsOracle(OracleRequest {
            seq,
            query,
            content,
        })
    }

    /// Apply an oracle reply. `None` if `seq` is not the reply being waited for.
    pub fn complete(&mut self, seq: u64, reply: Result<OracleReply, OracleError>) -> Option<Outcome> {
        if self.pending != Some(seq) {
            debug!("session: dropping stale oracle reply #{seq}");
            return None;
        }
        self.pending = None;
        self.emit(UiEvent::Busy(false));
        let mode = self.session.as_ref()?.mode();

        let snippets = match reply {
            Ok(OracleReply::Snippets(snippets)) => snippets,
            Ok(OracleReply::NoMatch) => return Some(self.no_match(mode)),
            Err(e) if mode == SearchMode::ForcedSemantic => {
                warn!("session: oracle failed: {e}");
                return Some(self.fail(mode, e.to_string()));
            }
            Err(e) => {
                warn!("session: oracle failed, reporting no match: {e}");
                return Some(self.no_match(mode));
            }
        };

        let resolved = self.resolver.resolve(&self.doc, &snippets);
        let ranked = self.ranker.rank(resolved);
        self.apply(&ranked);
        let count = self.highlights.total();
        if count == 0 {
            return Some(self.no_match(mode));
        }
        self.report_count();
        self.status(
            format!("{} relevant {}", count, plural(count, "passage", "passages")),
            StatusKind::Success,
        );
        Some(Outcome::Matches { mode, count })
    }

    fn apply(&mut self, ranked: &[Match]) -> HighlightReport {
        crate::contracts::check_ranked(ranked, ranked.len());
        self.highlights.highlight(&mut self.doc, ranked)
    }

    fn no_match(&mut self, mode: SearchMode) -> Outcome {
        self.report_count();
        if mode == SearchMode::ForcedSemantic {
            self.status("No relevant passages found".into(), StatusKind::Warning);
        } else {
            self.status("No matches found".into(), StatusKind::Info);
        }
        Outcome::NoMatch { mode }
    }

    /// Surface a failure: no highlights left behind, session parked.
    fn fail(&mut self, mode: SearchMode, message: String) -> Outcome {
        self.highlights.clear(&mut self.doc);
        if let Some(session) = self.session.as_mut() {
            session.active = false;
        }
        self.report_count();
        self.status(ERROR_STATUS.into(), StatusKind::Error);
        Outcome::Failed { mode, message }
    }

    // =========================================================================
    // NAVIGATION
    // =========================================================================

    pub fn navigate(&mut self, direction: Direction) -> CursorPosition {
        let position = self.highlights.navigate(&mut self.doc, direction);
        self.report_count();
        position
    }

    // =========================================================================
    // MUTATIONS AND TEARDOWN
    // =========================================================================

    /// Apply a host mutation. If it changed the tree, a debounced re-run is
    /// scheduled.
    pub fn edit_document<R>(&mut self, now: Instant, edit: impl FnOnce(&mut Document) -> R) -> R {
        let before = self.doc.generation();
        let result = edit(&mut self.doc);
        if self.doc.generation() != before {
            self.notice_mutation(now);
        }
        result
    }

    /// Record that the tree changed.
    pub fn notice_mutation(&mut self, now: Instant) {
        self.mutations.push((), now);
    }

    /// Once mutations have been quiet long enough: drop the content cache and,
    /// if a session is active, re-run its query from scratch.
    pub fn poll_mutations(&mut self, now: Instant) -> Option<Step> {
        self.mutations.poll(now)?;
        self.extractor.invalidate();
        let active = self.session.as_ref().is_some_and(|s| s.active);
        if !active {
            return None;
        }
        debug!("session: tree changed, re-running");
        Some(self.run(now))
    }

    /// Swap in a different document, tearing everything down first.
    pub fn replace_document(&mut self, doc: Document) -> Document {
        self.end_session();
        self.extractor.invalidate();
        std::mem::replace(&mut self.doc, doc)
    }

    /// Clear highlights and forget the session. A pending oracle reply will
    /// be dropped when it arrives.
    pub fn end_session(&mut self) {
        self.highlights.clear(&mut self.doc);
        self.session = None;
        self.queries.cancel();
        self.mutations.cancel();
        if self.pending.take().is_some() {
            self.emit(UiEvent::Busy(false));
        }
        self.report_count();
    }

    /// Hand the document back, clean.
    pub fn into_document(mut self) -> Document {
        self.highlights.clear(&mut self.doc);
        self.doc
    }

    // =========================================================================
    // EVENTS
    // =========================================================================

    fn emit(&mut self, event: UiEvent) {
        self.events.push_back(event);
    }

    fn report_count(&mut self) {
        let position = self.highlights.position();
        self.emit(UiEvent::ResultCount {
            current: position.current,
            total: position.total,
        });
    }

    fn status(&mut self, text: String, kind: StatusKind) {
        self.emit(UiEvent::Status { text, kind });
    }
}

fn plural<'a>(count: usize, one: &'a str, many: &'a str) -> &'a str {
    if count == 1 {
        one
    } else {
        many
    }
}
