// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Text leaf enumeration: the one traversal everything else builds on.
//!
//! Literal search, snippet resolution, and content extraction all need the same
//! thing: the text-bearing leaves a reader can actually see, in document order.
//! That means skipping script and style containers and hidden elements, and it
//! means following encapsulated subtrees and same-origin frames, which are not
//! light-tree children and are easy to forget.
//!
//! The walk is iterative (explicit stack) and never fails. A dangling id, a
//! closed shadow root, or a cross-origin frame is simply not entered.
//!
//! Order within an element: shadow content first (it is what renders), then
//! light children, then frame content.

use log::trace;

use super::{Document, Element, NodeId, NodeKind, ShadowMode};

/// Default nesting bound for shadow/frame boundaries.
pub const DEFAULT_MAX_DEPTH: usize = 3;

/// Containers whose text is never content.
pub const SKIPPED_TAGS: &[&str] = &["script", "style", "noscript", "template", "head"];

/// Whether an element's subtree is never searchable.
#[inline]
pub fn is_non_content(el: &Element) -> bool {
    SKIPPED_TAGS.contains(&el.tag.as_str()) || el.is_hidden()
}

/// Iterator over visible, non-empty text leaves in document order.
pub struct TextLeaves<'a> {
    doc: &'a Document,
    /// (node, number of shadow/frame boundaries crossed to reach it)
    stack: Vec<(NodeId, usize)>,
    max_depth: usize,
    prune: Option<fn(&Element) -> bool>,
}

impl<'a> TextLeaves<'a> {
    /// Walk everything under `root` with the default depth bound.
    pub fn new(doc: &'a Document, root: NodeId) -> Self {
        Self {
            doc,
            stack: vec![(root, 0)],
            max_depth: DEFAULT_MAX_DEPTH,
            prune: None,
        }
    }

    /// Bound how many shadow/frame boundaries the walk may cross.
    pub fn max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Additionally skip any element for which `prune` returns true.
    pub fn prune(mut self, prune: fn(&Element) -> bool) -> Self {
        self.prune = Some(prune);
        self
    }

    fn skips(&self, el: &Element) -> bool {
        is_non_content(el) || self.prune.is_some_and(|prune| prune(el))
    }
}

impl Iterator for TextLeaves<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        while let Some((id, depth)) = self.stack.pop() {
            let Some(kind) = self.doc.kind(id) else {
                trace!("scan: skipping dead node {id}");
                continue;
            };
            match kind {
                NodeKind::Text(text) => {
                    if !text.trim().is_empty() {
                        return Some(id);
                    }
                }
                NodeKind::Element(el) => {
                    if self.skips(el) {
                        trace!("scan: skipping <{}> {id}", el.tag);
                        continue;
                    }
                    let crossing = depth + 1;
                    if let Some(frame) = el.frame {
                        if frame.same_origin && crossing <= self.max_depth {
                            self.stack.push((frame.root, crossing));
                        } else {
                            trace!("scan: frame under {id} not entered");
                        }
                    }
                    let children = self.doc.children(id);
                    self.stack.extend(children.iter().rev().map(|&c| (c, depth)));
                    if let Some(shadow) = el.shadow {
                        if shadow.mode == ShadowMode::Open && crossing <= self.max_depth {
                            self.stack.push((shadow.root, crossing));
                        } else {
                            trace!("scan: shadow root under {id} not entered");
                        }
                    }
                }
            }
        }
        None
    }
}

/// Whole-tree visible text: every leaf's trimmed text joined by single spaces.
pub fn visible_text(doc: &Document, root: NodeId, max_depth: usize) -> String {
    TextLeaves::new(doc, root)
        .max_depth(max_depth)
        .filter_map(|leaf| doc.text(leaf))
        .map(str::trim)
        .collect::<Vec<_>>()
        .join(" ")
}
