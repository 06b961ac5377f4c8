// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Highlighting: ranked matches become markers in the tree.
//!
//! A marker is a `mark` element wrapped around exactly the characters of one
//! span. Getting there means splitting text leaves, and splitting is where
//! trees get corrupted, so the rules are strict:
//!
//! - **The original leaf never moves.** It keeps the text before the first
//!   span and may end up empty. Everything split off it (the marked fragments
//!   and the text between and after them) is recorded against it.
//! - **Spans of one leaf are wrapped from last to first.** Each wrap only
//!   shortens the original leaf, so earlier spans keep their coordinates. A
//!   span overlapping one already wrapped is clamped to what is left.
//! - **Every wrap is all-or-nothing** (`SplitGuard`). A span that fails to wrap
//!   is logged and skipped, the rest of the batch continues.
//! - **`clear` reassembles.** Each original leaf gets its fragments' text back
//!   in order, then every fragment and marker is discarded. Neighbouring
//!   leaves the page owned are never touched.
//!
//! All of this is surgery: none of it bumps the document generation, so our
//! own markers never look like page mutations.
//!
//! ```text
//! before:  <p>"Contact us at help@example.com today"</p>
//! after:   <p>"Contact us at " <mark>"help@example.com"</mark> " today"</p>
//!               ^ original leaf         ^ fragment            ^ fragment
//! ```

mod guard;

use std::collections::BTreeMap;

use log::{debug, warn};
use serde::Serialize;

use crate::contracts;
use crate::error::Result;
use crate::tree::{Document, NodeId};
use crate::types::{CursorPosition, Direction, Match, Span};

use guard::SplitGuard;

/// Tag of inserted marker elements.
pub const MARKER_TAG: &str = "mark";
/// Class carried by every marker.
pub const MARKER_CLASS: &str = "glint-marker";
/// Extra class carried by the markers of the current match.
pub const CURRENT_CLASS: &str = "glint-current";
/// Attribute holding the logical match index of a marker.
pub const MATCH_ATTR: &str = "data-glint-match";

/// Outcome of one `highlight` call.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct HighlightReport {
    /// Spans wrapped in a marker.
    pub applied: usize,
    /// Spans skipped (stale, empty after clamping, or failed to wrap).
    pub skipped: usize,
}

/// One logical match on screen.
#[derive(Debug, Clone)]
struct Highlight {
    /// The match as ranked.
    matched: Match,
    /// Markers in document order.
    markers: Vec<NodeId>,
}

/// Fragments split off one original leaf, in document order.
#[derive(Debug, Clone, Default)]
struct LeafRestore {
    pieces: Vec<NodeId>,
}

/// Owns the markers in a document and the cursor over them.
#[derive(Debug, Default)]
pub struct HighlightManager {
    highlights: Vec<Highlight>,
    restores: BTreeMap<NodeId, LeafRestore>,
    cursor: Option<usize>,
}

impl HighlightManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace whatever is highlighted with `matches`.
    ///
    /// Matches that end up with no marker at all (every span stale) are not
    /// navigable and do not count. With at least one highlight the cursor
    /// lands on the first and it is scrolled into view.
    pub fn highlight(&mut self, doc: &mut Document, matches: &[Match]) -> HighlightReport {
        self.clear(doc);

        // (leaf) -> [(match index, span order within match, span)]
        let mut by_leaf: BTreeMap<NodeId, Vec<(usize, usize, Span)>> = BTreeMap::new();
        for (index, m) in matches.iter().enumerate() {
            for (order, span) in m.spans().iter().enumerate() {
                by_leaf
                    .entry(span.leaf)
                    .or_default()
                    .push((index, order, *span));
            }
        }

        let mut report = HighlightReport::default();
        let mut markers: Vec<Vec<(usize, NodeId)>> = vec![Vec::new(); matches.len()];

        for (leaf, mut spans) in by_leaf {
            // Last span first; on equal starts the better-ranked match wraps
            // first and the other clamps against the remaining prefix.
            spans.sort_by(|a, b| b.2.start.cmp(&a.2.start).then(a.0.cmp(&b.0)));
            for (index, order, span) in spans {
                match self.wrap_span(doc, span) {
                    Ok(Some(marker)) => {
                        markers[index].push((order, marker));
                        report.applied += 1;
                    }
                    Ok(None) => {
                        warn!("highlight: span {}..{} of {leaf} is stale, skipped", span.start, span.end);
                        report.skipped += 1;
                    }
                    Err(e) => {
                        warn!("highlight: could not wrap {}..{} of {leaf}: {e}", span.start, span.end);
                        report.skipped += 1;
                    }
                }
            }
        }

        for (mut found, matched) in markers.into_iter().zip(matches) {
            if found.is_empty() {
                continue;
            }
            found.sort_by_key(|&(order, _)| order);
            let logical = self.highlights.len().to_string();
            let markers: Vec<NodeId> = found.into_iter().map(|(_, marker)| marker).collect();
            for &marker in &markers {
                if let Err(e) = doc.write_attr(marker, MATCH_ATTR, &logical) {
                    warn!("highlight: could not tag marker {marker}: {e}");
                }
            }
            self.highlights.push(Highlight {
                matched: matched.clone(),
                markers,
            });
        }

        if !self.highlights.is_empty() {
            self.select(doc, 0);
        }
        debug!(
            "highlight: {} matches, {} markers, {} skipped",
            self.highlights.len(),
            report.applied,
            report.skipped
        );
        report
    }

    /// Wrap one span of a leaf. `Ok(None)` when the span no longer fits.
    fn wrap_span(&mut self, doc: &mut Document, span: Span) -> Result<Option<NodeId>> {
        let text = doc.try_text(span.leaf)?;
        let Some(span) = span.clamp_to(text) else {
            return Ok(None);
        };
        contracts::check_span_valid(&span, text);
        let len = text.len();

        let mut guard = SplitGuard::begin(doc, span.leaf)?;
        let tail = if span.end < len {
            Some(guard.split(span.end)?)
        } else {
            None
        };
        let fragment = guard.split(span.start)?;
        let marker = guard.wrap(
            fragment,
            MARKER_TAG,
            &[("class", MARKER_CLASS), (MATCH_ATTR, "")],
        )?;
        guard.commit();

        let restore = self.restores.entry(span.leaf).or_default();
        let mut pieces = vec![fragment];
        pieces.extend(tail);
        pieces.append(&mut restore.pieces);
        restore.pieces = pieces;
        Ok(Some(marker))
    }

    /// Remove every marker and restore each split leaf's text.
    pub fn clear(&mut self, doc: &mut Document) {
        let mut inserted = Vec::new();
        for (leaf, restore) in std::mem::take(&mut self.restores) {
            let mut text = match doc.text(leaf) {
                Some(text) => text.to_string(),
                None => {
                    warn!("highlight: leaf {leaf} is gone, fragments dropped");
                    String::new()
                }
            };
            for &piece in &restore.pieces {
                if let Some(piece_text) = doc.text(piece) {
                    text.push_str(piece_text);
                }
            }
            if doc.contains(leaf) {
                let _ = doc.replace_text(leaf, text);
            }
            for piece in restore.pieces {
                let _ = doc.discard(piece);
                inserted.push(piece);
            }
        }
        for highlight in self.highlights.drain(..) {
            for marker in highlight.markers {
                let _ = doc.discard(marker);
                inserted.push(marker);
            }
        }
        contracts::check_discarded(doc, &inserted);
        self.cursor = None;
    }

    /// Move the cursor one match, wrapping at either end.
    pub fn navigate(&mut self, doc: &mut Document, direction: Direction) -> CursorPosition {
        let total = self.highlights.len();
        if total == 0 {
            return self.position();
        }
        let next = match (self.cursor, direction) {
            (None, Direction::Next) => 0,
            (None, Direction::Previous) => total - 1,
            (Some(c), Direction::Next) => (c + 1) % total,
            (Some(c), Direction::Previous) => (c + total - 1) % total,
        };
        self.select(doc, next);
        self.position()
    }

    fn select(&mut self, doc: &mut Document, index: usize) {
        if let Some(previous) = self.cursor.and_then(|c| self.highlights.get(c)) {
            for &marker in &previous.markers {
                let _ = doc.write_attr(marker, "class", MARKER_CLASS);
            }
        }
        let Some(current) = self.highlights.get(index) else {
            return;
        };
        let active = format!("{MARKER_CLASS} {CURRENT_CLASS}");
        for &marker in &current.markers {
            let _ = doc.write_attr(marker, "class", &active);
        }
        if let Some(&first) = current.markers.first() {
            doc.scroll_into_view(first);
        }
        self.cursor = Some(index);
    }

    /// Current cursor and total.
    pub fn position(&self) -> CursorPosition {
        CursorPosition {
            current: self.cursor,
            total: self.highlights.len(),
        }
    }

    /// Number of navigable matches.
    pub fn total(&self) -> usize {
        self.highlights.len()
    }

    pub fn is_empty(&self) -> bool {
        self.highlights.is_empty()
    }

    /// The navigable matches, in order.
    pub fn matches(&self) -> impl Iterator<Item = &Match> {
        self.highlights.iter().map(|h| &h.matched)
    }

    /// Markers of each logical match, in order.
    pub fn markers(&self) -> impl Iterator<Item = &[NodeId]> {
        self.highlights.iter().map(|h| h.markers.as_slice())
    }
}
