//! Test utilities shared across unit and integration tests.
//!
//! This module is always compiled but hidden from documentation.
//! It provides canonical implementations of test helpers to avoid duplication.

#![doc(hidden)]

use crate::highlight::MARKER_TAG;
use crate::tree::scan::is_non_content;
use crate::tree::{Document, NodeId, NodeKind};

/// Fluent builder for small documents.
///
/// Elements are appended to the innermost open container; `open` descends
/// into a new element and `close` climbs back out.
pub struct DocBuilder {
    doc: Document,
    open: Vec<NodeId>,
}

impl Default for DocBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl DocBuilder {
    /// Start from an empty `<body>`.
    pub fn new() -> Self {
        let doc = Document::new();
        let root = doc.root();
        Self { doc, open: vec![root] }
    }

    fn container(&self) -> NodeId {
        self.open.last().copied().unwrap_or_else(|| self.doc.root())
    }

    fn attach(&mut self, child: NodeId) {
        let parent = self.container();
        self.doc
            .append_child(parent, child)
            .expect("builder nodes are fresh and acyclic");
    }

    /// Append `<p>text</p>`.
    pub fn para(self, text: &str) -> Self {
        self.element("p", text)
    }

    /// Append `<tag>text</tag>`.
    pub fn element(mut self, tag: &str, text: &str) -> Self {
        let el = self.doc.create_element(tag);
        let leaf = self.doc.create_text(text);
        self.doc
            .append_child(el, leaf)
            .expect("builder nodes are fresh and acyclic");
        self.attach(el);
        self
    }

    /// Append a bare text node to the current container.
    pub fn text(mut self, text: &str) -> Self {
        let leaf = self.doc.create_text(text);
        self.attach(leaf);
        self
    }

    /// Append `<tag>` and make it the current container.
    pub fn open(mut self, tag: &str) -> Self {
        let el = self.doc.create_element(tag);
        self.attach(el);
        self.open.push(el);
        self
    }

    /// Set an attribute on the current container.
    pub fn attr(mut self, name: &str, value: &str) -> Self {
        let el = self.container();
        self.doc
            .set_attr(el, name, value)
            .expect("open containers are elements");
        self
    }

    /// Close the current container.
    pub fn close(mut self) -> Self {
        if self.open.len() > 1 {
            self.open.pop();
        }
        self
    }

    pub fn build(self) -> Document {
        self.doc
    }
}

/// A small news-style page: navigation, an article, a sidebar and a footer.
pub fn article_page() -> Document {
    DocBuilder::new()
        .open("nav")
        .element("a", "Home")
        .element("a", "World")
        .element("a", "Business")
        .close()
        .open("article")
        .element("h1", "City council approves new transit plan")
        .para("The city council voted on Tuesday to approve a new transit plan.")
        .para("The plan adds three bus routes and extends the light rail line to the airport.")
        .para("Construction is expected to begin next spring and finish within four years.")
        .close()
        .open("aside")
        .attr("class", "sidebar")
        .para("Subscribe to our newsletter")
        .close()
        .element("footer", "Copyright 2025 Example News")
        .build()
}

/// Render the light tree as text, with marked runs in brackets.
///
/// Text of non-content elements is skipped. Entering any element other than
/// a marker starts a new word.
pub fn render_marked(doc: &Document) -> String {
    let mut out = String::new();
    render(doc, doc.root(), false, &mut out);
    out.trim_end().to_string()
}

fn render(doc: &Document, id: NodeId, marked: bool, out: &mut String) {
    match doc.kind(id) {
        Some(NodeKind::Text(text)) => {
            if marked {
                out.push('[');
                out.push_str(text);
                out.push(']');
            } else {
                out.push_str(text);
            }
        }
        Some(NodeKind::Element(el)) => {
            if is_non_content(el) {
                return;
            }
            let is_marker = el.tag == MARKER_TAG;
            if !is_marker && !out.is_empty() && !out.ends_with(' ') {
                out.push(' ');
            }
            for &child in doc.children(id) {
                render(doc, child, marked || is_marker, out);
            }
        }
        None => {}
    }
}
