// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! JSON document descriptions.
//!
//! A node is either a bare string (a text leaf) or an element object:
//!
//! ```json
//! {
//!   "tag": "article",
//!   "attrs": { "class": "post" },
//!   "hidden": false,
//!   "children": ["Hello ", { "tag": "b", "children": ["world"] }],
//!   "shadow": { "closed": false, "children": ["inside the component"] },
//!   "frame": { "sameOrigin": true, "root": { "tag": "html", "children": [] } }
//! }
//! ```

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use super::{Document, NodeId, ShadowMode};
use crate::error::{GlintError, Result};

/// A node in a JSON document description.
#[derive(Deserialize, Serialize, Clone, Debug, PartialEq)]
#[serde(untagged)]
pub enum NodeSpec {
    Text(String),
    Element(ElementSpec),
}

/// An element in a JSON document description.
#[derive(Deserialize, Serialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ElementSpec {
    pub tag: String,
    #[serde(default)]
    pub attrs: BTreeMap<String, String>,
    #[serde(default)]
    pub hidden: bool,
    #[serde(default)]
    pub children: Vec<NodeSpec>,
    #[serde(default)]
    pub shadow: Option<ShadowSpec>,
    #[serde(default)]
    pub frame: Option<FrameSpec>,
}

/// Encapsulated subtree contents.
#[derive(Deserialize, Serialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ShadowSpec {
    #[serde(default)]
    pub closed: bool,
    #[serde(default)]
    pub children: Vec<NodeSpec>,
}

/// Embedded sub-document.
#[derive(Deserialize, Serialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct FrameSpec {
    #[serde(default = "default_same_origin")]
    pub same_origin: bool,
    pub root: Box<ElementSpec>,
}

fn default_same_origin() -> bool {
    true
}

impl Document {
    /// Build a document from its root element description.
    pub fn from_spec(spec: &ElementSpec) -> Result<Self> {
        let mut doc = Document::with_root_tag(&spec.tag);
        let root = doc.root();
        doc.fill_element(root, spec)?;
        Ok(doc)
    }

    /// Parse a JSON document description.
    pub fn from_json(json: &str) -> Result<Self> {
        let spec: ElementSpec = serde_json::from_str(json).map_err(GlintError::DocumentParse)?;
        Self::from_spec(&spec)
    }

    /// Read and parse a JSON document description from disk.
    pub fn from_path(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path).map_err(|source| GlintError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&json)
    }

    fn fill_element(&mut self, id: NodeId, spec: &ElementSpec) -> Result<()> {
        for (name, value) in &spec.attrs {
            self.set_attr(id, name, value)?;
        }
        if spec.hidden {
            self.set_hidden(id, true)?;
        }
        for child in &spec.children {
            self.build_child(id, child)?;
        }
        if let Some(shadow) = &spec.shadow {
            let mode = if shadow.closed {
                ShadowMode::Closed
            } else {
                ShadowMode::Open
            };
            let shadow_root = self.attach_shadow(id, mode)?;
            for child in &shadow.children {
                self.build_child(shadow_root, child)?;
            }
        }
        if let Some(frame) = &spec.frame {
            let frame_root = self.attach_frame(id, &frame.root.tag, frame.same_origin)?;
            self.fill_element(frame_root, &frame.root)?;
        }
        Ok(())
    }

    fn build_child(&mut self, parent: NodeId, spec: &NodeSpec) -> Result<NodeId> {
        let id = match spec {
            NodeSpec::Text(text) => self.create_text(text),
            NodeSpec::Element(element) => {
                let id = self.create_element(&element.tag);
                self.fill_element(id, element)?;
                id
            }
        };
        self.append_child(parent, id)?;
        Ok(id)
    }
}
