// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! The host tree: what the search engine reads and, carefully, writes.
//!
//! In a browser this would be the DOM. Here it is an arena of nodes addressed
//! by `NodeId`, which is the identity the rest of the crate leans on: two text
//! leaves with the same text are still different leaves, and a `Span` is only
//! meaningful relative to the leaf it was computed against.
//!
//! Two kinds of writes exist and they are deliberately separate:
//!
//! - **Host mutations** (`set_text`, `append_child`, `remove`, ...) are what the
//!   page does to itself. Each one bumps `generation()`, which is the mutation
//!   notification source for caches and re-search.
//! - **Surgery** (`split_text`, `wrap`, `discard`, ...) is what the highlighter
//!   does to insert and remove markers. It is crate-private and silent, so our
//!   own markers never look like page changes.
//!
//! Encapsulated subtrees (shadow roots) and embedded sub-documents (frames) live
//! in the same arena but are not children of their host element: they hang off
//! `Element::shadow` / `Element::frame` and only the scanner knows to follow them.
//!
//! # Invariants
//!
//! - A `NodeId` is never reused within a document, even after removal.
//! - `parent(c) == Some(p)` iff `children(p)` contains `c`.
//! - Text nodes have no children.

mod loader;
pub mod scan;

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{GlintError, Result};

pub use loader::{ElementSpec, FrameSpec, NodeSpec, ShadowSpec};

// =============================================================================
// IDENTITIES
// =============================================================================

/// Identity of a node within one `Document`.
///
/// Compared by identity, not by value: equal text in two leaves still means
/// two different `NodeId`s.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[repr(transparent)]
pub struct NodeId(pub u32);

impl NodeId {
    /// Convert to usize for arena indexing.
    #[inline]
    pub fn as_usize(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

// =============================================================================
// NODE TYPES
// =============================================================================

/// Whether an encapsulated subtree can be entered from outside.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ShadowMode {
    Open,
    Closed,
}

/// An encapsulated subtree attached to a host element.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShadowRoot {
    pub root: NodeId,
    pub mode: ShadowMode,
}

/// An embedded sub-document (iframe-like) attached to a host element.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Frame {
    pub root: NodeId,
    /// Cross-origin frames are opaque: the scanner never enters them.
    pub same_origin: bool,
}

/// Element payload.
#[derive(Debug, Clone, PartialEq)]
pub struct Element {
    /// Lower-cased tag name.
    pub tag: String,
    pub attrs: BTreeMap<String, String>,
    /// Explicitly hidden by the host (computed visibility).
    pub hidden: bool,
    pub shadow: Option<ShadowRoot>,
    pub frame: Option<Frame>,
}

impl Element {
    /// A bare element payload, not attached to any document.
    pub fn new(tag: &str) -> Self {
        Self {
            tag: tag.to_ascii_lowercase(),
            attrs: BTreeMap::new(),
            hidden: false,
            shadow: None,
            frame: None,
        }
    }

    /// Attribute lookup.
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attrs.get(name).map(String::as_str)
    }

    /// Whitespace-separated class list.
    pub fn classes(&self) -> impl Iterator<Item = &str> {
        self.attr("class").unwrap_or("").split_whitespace()
    }

    /// Computed visibility, as far as this element alone can tell.
    ///
    /// Ancestors are not consulted; the scanner never descends into a hidden
    /// element, so by the time a leaf is reached every ancestor was visible.
    pub fn is_hidden(&self) -> bool {
        if self.hidden || self.attrs.contains_key("hidden") {
            return true;
        }
        if self.attr("aria-hidden") == Some("true") {
            return true;
        }
        match self.attr("style") {
            Some(style) => {
                let compact: String = style
                    .chars()
                    .filter(|c| !c.is_whitespace())
                    .collect::<String>()
                    .to_ascii_lowercase();
                compact.contains("display:none") || compact.contains("visibility:hidden")
            }
            None => false,
        }
    }
}

/// What a node is.
#[derive(Debug, Clone, PartialEq)]
pub enum NodeKind {
    Element(Element),
    Text(String),
}

#[derive(Debug, Clone)]
struct Node {
    kind: NodeKind,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    /// Host element for shadow/frame roots.
    host: Option<NodeId>,
    removed: bool,
}

// =============================================================================
// DOCUMENT
// =============================================================================

/// A mutable host tree.
#[derive(Debug, Clone)]
pub struct Document {
    nodes: Vec<Node>,
    root: NodeId,
    generation: u64,
    scroll_target: Option<NodeId>,
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl Document {
    /// Create a document with an empty `<body>` root.
    pub fn new() -> Self {
        Self::with_root_tag("body")
    }

    /// Create a document whose root element has the given tag.
    pub fn with_root_tag(tag: &str) -> Self {
        let root = Node {
            kind: NodeKind::Element(Element::new(tag)),
            parent: None,
            children: Vec::new(),
            host: None,
            removed: false,
        };
        Self {
            nodes: vec![root],
            root: NodeId(0),
            generation: 0,
            scroll_target: None,
        }
    }

    // -------------------------------------------------------------------------
    // Reads
    // -------------------------------------------------------------------------

    /// Root element.
    #[inline]
    pub fn root(&self) -> NodeId {
        self.root
    }

    /// Mutation generation. Bumped by every host mutation, never by surgery.
    #[inline]
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Number of node slots ever allocated (including removed nodes).
    pub fn capacity(&self) -> usize {
        self.nodes.len()
    }

    fn node(&self, id: NodeId) -> Result<&Node> {
        match self.nodes.get(id.as_usize()) {
            Some(node) if !node.removed => Ok(node),
            _ => Err(GlintError::UnknownNode(id)),
        }
    }

    fn node_mut(&mut self, id: NodeId) -> Result<&mut Node> {
        match self.nodes.get_mut(id.as_usize()) {
            Some(node) if !node.removed => Ok(node),
            _ => Err(GlintError::UnknownNode(id)),
        }
    }

    /// Whether `id` refers to a live node.
    pub fn contains(&self, id: NodeId) -> bool {
        self.node(id).is_ok()
    }

    /// Node payload.
    pub fn kind(&self, id: NodeId) -> Option<&NodeKind> {
        self.node(id).ok().map(|n| &n.kind)
    }

    /// Element payload, if `id` is a live element.
    pub fn element(&self, id: NodeId) -> Option<&Element> {
        match self.kind(id) {
            Some(NodeKind::Element(el)) => Some(el),
            _ => None,
        }
    }

    /// Element payload or an error saying why not.
    pub fn try_element(&self, id: NodeId) -> Result<&Element> {
        match &self.node(id)?.kind {
            NodeKind::Element(el) => Ok(el),
            NodeKind::Text(_) => Err(GlintError::NotElement(id)),
        }
    }

    /// Text of a live text node.
    pub fn text(&self, id: NodeId) -> Option<&str> {
        match self.kind(id) {
            Some(NodeKind::Text(text)) => Some(text.as_str()),
            _ => None,
        }
    }

    /// Text of a text node or an error saying why not.
    pub fn try_text(&self, id: NodeId) -> Result<&str> {
        match &self.node(id)?.kind {
            NodeKind::Text(text) => Ok(text.as_str()),
            NodeKind::Element(_) => Err(GlintError::NotText(id)),
        }
    }

    /// Tag of a live element.
    pub fn tag(&self, id: NodeId) -> Option<&str> {
        self.element(id).map(|el| el.tag.as_str())
    }

    /// Attribute of a live element.
    pub fn attr(&self, id: NodeId, name: &str) -> Option<&str> {
        self.element(id).and_then(|el| el.attr(name))
    }

    /// Light-tree children (empty for text and dead nodes).
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.node(id).map(|n| n.children.as_slice()).unwrap_or(&[])
    }

    /// Light-tree parent.
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.node(id).ok().and_then(|n| n.parent)
    }

    /// Host element of a shadow or frame root.
    pub fn host(&self, id: NodeId) -> Option<NodeId> {
        self.node(id).ok().and_then(|n| n.host)
    }

    /// Where the host last scrolled to (set by `scroll_into_view`).
    pub fn scroll_target(&self) -> Option<NodeId> {
        self.scroll_target
    }

    /// Coarsest read available: every light-tree text node under `id`, in
    /// order, joined by single spaces. No visibility filtering, no shadow or
    /// frame descent. Used as the last-resort extraction fallback.
    pub fn raw_text(&self, id: NodeId) -> String {
        let mut parts: Vec<&str> = Vec::new();
        let mut stack = vec![id];
        while let Some(current) = stack.pop() {
            let Ok(node) = self.node(current) else {
                continue;
            };
            match &node.kind {
                NodeKind::Text(text) => {
                    let trimmed = text.trim();
                    if !trimmed.is_empty() {
                        parts.push(trimmed);
                    }
                }
                NodeKind::Element(_) => stack.extend(node.children.iter().rev().copied()),
            }
        }
        parts.join(" ")
    }

    /// Whether `ancestor` is `node` or one of its light-tree ancestors.
    pub fn is_inclusive_ancestor(&self, ancestor: NodeId, node: NodeId) -> bool {
        let mut current = Some(node);
        while let Some(id) = current {
            if id == ancestor {
                return true;
            }
            current = self.parent(id);
        }
        false
    }

    // -------------------------------------------------------------------------
    // Host mutations (bump generation)
    // -------------------------------------------------------------------------

    fn alloc(&mut self, kind: NodeKind) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(Node {
            kind,
            parent: None,
            children: Vec::new(),
            host: None,
            removed: false,
        });
        id
    }

    fn touch(&mut self) {
        self.generation += 1;
    }

    /// Create a detached element.
    pub fn create_element(&mut self, tag: &str) -> NodeId {
        self.touch();
        self.alloc(NodeKind::Element(Element::new(tag)))
    }

    /// Create a detached text node.
    pub fn create_text(&mut self, text: &str) -> NodeId {
        self.touch();
        self.alloc(NodeKind::Text(text.to_string()))
    }

    /// Append `child` as the last child of `parent`, detaching it first.
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) -> Result<()> {
        self.attach(parent, child, None)?;
        self.touch();
        Ok(())
    }

    /// Insert `child` before `reference` under `parent`.
    pub fn insert_before(&mut self, parent: NodeId, child: NodeId, reference: NodeId) -> Result<()> {
        self.attach(parent, child, Some(reference))?;
        self.touch();
        Ok(())
    }

    /// Remove a node and its whole subtree.
    pub fn remove(&mut self, id: NodeId) -> Result<()> {
        if id == self.root {
            return Err(GlintError::RootRemoval);
        }
        self.detach(id)?;
        self.mark_removed(id);
        self.touch();
        Ok(())
    }

    /// Replace the text of a text node.
    pub fn set_text(&mut self, id: NodeId, text: &str) -> Result<()> {
        self.replace_text(id, text.to_string())?;
        self.touch();
        Ok(())
    }

    /// Set an attribute on an element.
    pub fn set_attr(&mut self, id: NodeId, name: &str, value: &str) -> Result<()> {
        self.write_attr(id, name, value)?;
        self.touch();
        Ok(())
    }

    /// Toggle computed visibility of an element.
    pub fn set_hidden(&mut self, id: NodeId, hidden: bool) -> Result<()> {
        match &mut self.node_mut(id)?.kind {
            NodeKind::Element(el) => el.hidden = hidden,
            NodeKind::Text(_) => return Err(GlintError::NotElement(id)),
        }
        self.touch();
        Ok(())
    }

    /// Attach an encapsulated subtree to `host`, returning its root.
    pub fn attach_shadow(&mut self, host: NodeId, mode: ShadowMode) -> Result<NodeId> {
        self.try_element(host)?;
        let root = self.alloc(NodeKind::Element(Element::new("#shadow-root")));
        self.node_mut(root)?.host = Some(host);
        if let NodeKind::Element(el) = &mut self.node_mut(host)?.kind {
            el.shadow = Some(ShadowRoot { root, mode });
        }
        self.touch();
        Ok(root)
    }

    /// Attach an embedded sub-document to `host`, returning its root element.
    pub fn attach_frame(&mut self, host: NodeId, root_tag: &str, same_origin: bool) -> Result<NodeId> {
        self.try_element(host)?;
        let root = self.alloc(NodeKind::Element(Element::new(root_tag)));
        self.node_mut(root)?.host = Some(host);
        if let NodeKind::Element(el) = &mut self.node_mut(host)?.kind {
            el.frame = Some(Frame { root, same_origin });
        }
        self.touch();
        Ok(root)
    }

    /// Scroll a node into view. A host capability, not a tree mutation.
    pub fn scroll_into_view(&mut self, id: NodeId) {
        if self.contains(id) {
            self.scroll_target = Some(id);
        }
    }

    // -------------------------------------------------------------------------
    // Surgery (silent; highlighter only)
    // -------------------------------------------------------------------------

    /// Split a text node at byte offset `at`. The original keeps `[0, at)`, a
    /// new sibling inserted right after it receives `[at, len)`.
    pub(crate) fn split_text(&mut self, id: NodeId, at: usize) -> Result<NodeId> {
        let text = self.try_text(id)?;
        if at > text.len() || !text.is_char_boundary(at) {
            return Err(GlintError::InvalidRange {
                node: id,
                start: at,
                end: at,
                len: text.len(),
            });
        }
        let tail = text[at..].to_string();
        let parent = self.parent(id);
        let new_id = self.alloc(NodeKind::Text(tail));
        if let NodeKind::Text(text) = &mut self.node_mut(id)?.kind {
            text.truncate(at);
        }
        if let Some(parent) = parent {
            let next = self.next_sibling(id);
            self.attach(parent, new_id, next)?;
        }
        Ok(new_id)
    }

    /// Wrap `id` in a new element with the given tag and attributes, in place.
    pub(crate) fn wrap(&mut self, id: NodeId, tag: &str, attrs: &[(&str, &str)]) -> Result<NodeId> {
        let parent = self
            .parent(id)
            .ok_or(GlintError::UnknownNode(id))?;
        let mut element = Element::new(tag);
        for (name, value) in attrs {
            element.attrs.insert((*name).to_string(), (*value).to_string());
        }
        let wrapper = self.alloc(NodeKind::Element(element));
        self.attach(parent, wrapper, Some(id))?;
        self.attach(wrapper, id, None)?;
        Ok(wrapper)
    }

    /// Remove a node from the tree without bumping the generation.
    pub(crate) fn discard(&mut self, id: NodeId) -> Result<()> {
        self.detach(id)?;
        self.mark_removed(id);
        Ok(())
    }

    /// Replace text without bumping the generation.
    pub(crate) fn replace_text(&mut self, id: NodeId, text: String) -> Result<()> {
        match &mut self.node_mut(id)?.kind {
            NodeKind::Text(current) => {
                *current = text;
                Ok(())
            }
            NodeKind::Element(_) => Err(GlintError::NotText(id)),
        }
    }

    /// Set an attribute without bumping the generation.
    pub(crate) fn write_attr(&mut self, id: NodeId, name: &str, value: &str) -> Result<()> {
        match &mut self.node_mut(id)?.kind {
            NodeKind::Element(el) => {
                el.attrs.insert(name.to_string(), value.to_string());
                Ok(())
            }
            NodeKind::Text(_) => Err(GlintError::NotElement(id)),
        }
    }

    // -------------------------------------------------------------------------
    // Linking
    // -------------------------------------------------------------------------

    fn next_sibling(&self, id: NodeId) -> Option<NodeId> {
        let parent = self.parent(id)?;
        let siblings = self.children(parent);
        let pos = siblings.iter().position(|&c| c == id)?;
        siblings.get(pos + 1).copied()
    }

    fn detach(&mut self, id: NodeId) -> Result<()> {
        let parent = self.node(id)?.parent;
        if let Some(parent) = parent {
            if let Ok(node) = self.node_mut(parent) {
                node.children.retain(|&c| c != id);
            }
        }
        self.node_mut(id)?.parent = None;
        Ok(())
    }

    fn attach(&mut self, parent: NodeId, child: NodeId, before: Option<NodeId>) -> Result<()> {
        self.try_element(parent)?;
        self.node(child)?;
        if self.is_inclusive_ancestor(child, parent) {
            return Err(GlintError::Cycle { parent, child });
        }
        self.detach(child)?;
        let siblings = &mut self.node_mut(parent)?.children;
        let index = before
            .and_then(|reference| siblings.iter().position(|&c| c == reference))
            .unwrap_or(siblings.len());
        siblings.insert(index, child);
        self.node_mut(child)?.parent = Some(parent);
        Ok(())
    }

    fn mark_removed(&mut self, id: NodeId) {
        let mut stack = vec![id];
        while let Some(current) = stack.pop() {
            let Some(node) = self.nodes.get_mut(current.as_usize()) else {
                continue;
            };
            node.removed = true;
            stack.extend(node.children.iter().copied());
            if let NodeKind::Element(el) = &node.kind {
                if let Some(shadow) = el.shadow {
                    stack.push(shadow.root);
                }
                if let Some(frame) = el.frame {
                    stack.push(frame.root);
                }
            }
        }
        if self.scroll_target.is_some_and(|t| !self.contains(t)) {
            self.scroll_target = None;
        }
    }
}
