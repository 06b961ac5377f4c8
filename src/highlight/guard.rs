// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Scoped tree surgery.
//!
//! Wrapping a span takes up to three edits (split the tail off, split the
//! span off, wrap it). Any of them can fail if the leaf changed under us. A
//! `SplitGuard` records what it created and, unless `commit` is called, puts
//! the leaf back exactly as it was when it is dropped. Early returns through
//! `?` therefore never leave a half-wrapped leaf behind.

use log::trace;

use crate::error::Result;
use crate::tree::{Document, NodeId};

pub(crate) struct SplitGuard<'d> {
    doc: &'d mut Document,
    leaf: NodeId,
    original: String,
    created: Vec<NodeId>,
    committed: bool,
}

impl<'d> SplitGuard<'d> {
    /// Start editing `leaf`, remembering its current text.
    pub(crate) fn begin(doc: &'d mut Document, leaf: NodeId) -> Result<Self> {
        let original = doc.try_text(leaf)?.to_string();
        Ok(Self {
            doc,
            leaf,
            original,
            created: Vec::new(),
            committed: false,
        })
    }

    /// Split the guarded leaf at `at`; the leaf keeps the prefix.
    pub(crate) fn split(&mut self, at: usize) -> Result<NodeId> {
        let tail = self.doc.split_text(self.leaf, at)?;
        self.created.push(tail);
        Ok(tail)
    }

    /// Wrap `node` in a new element.
    pub(crate) fn wrap(&mut self, node: NodeId, tag: &str, attrs: &[(&str, &str)]) -> Result<NodeId> {
        let wrapper = self.doc.wrap(node, tag, attrs)?;
        self.created.push(wrapper);
        Ok(wrapper)
    }

    /// Keep the edits.
    pub(crate) fn commit(mut self) {
        self.committed = true;
    }
}

impl Drop for SplitGuard<'_> {
    fn drop(&mut self) {
        if self.committed {
            return;
        }
        trace!("highlight: reverting partial wrap of {}", self.leaf);
        // Wrappers were created last; discarding them first also drops the
        // fragments they hold, so later discards may find nothing to do.
        for &id in self.created.iter().rev() {
            let _ = self.doc.discard(id);
        }
        let original = std::mem::take(&mut self.original);
        let _ = self.doc.replace_text(self.leaf, original);
    }
}
