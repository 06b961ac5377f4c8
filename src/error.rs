// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Error types for the search pipeline.
//!
//! Most failures in this crate never become errors at all. An inaccessible
//! subtree is skipped, a stale span is warned about and dropped, an oracle that
//! finds nothing is a status message. What remains here is the short list of
//! things a caller can actually act on: a bad node handle, a pattern the regex
//! engine refused, a document or config file that didn't parse, and oracle
//! failures when the user explicitly asked for semantic search.

use std::path::PathBuf;

use crate::tree::NodeId;

/// Everything that can go wrong in glint, short of a panic.
#[derive(Debug, thiserror::Error)]
pub enum GlintError {
    /// A node handle points at nothing (removed, or from another document).
    #[error("Unknown node {0}: it was removed or belongs to another document")]
    UnknownNode(NodeId),

    /// A text operation was attempted on an element.
    #[error("Node {0} is not a text node")]
    NotText(NodeId),

    /// An element operation was attempted on a text node.
    #[error("Node {0} is not an element")]
    NotElement(NodeId),

    /// Attaching `child` under `parent` would make the tree cyclic.
    #[error("Cannot attach {child} under {parent}: {child} is an ancestor of {parent}")]
    Cycle {
        /// Would-be parent.
        parent: NodeId,
        /// Node being attached.
        child: NodeId,
    },

    /// The document root is permanent.
    #[error("The document root cannot be removed")]
    RootRemoval,

    /// A byte range does not fit the node's current text.
    #[error("Range {start}..{end} is invalid for {node} (text length {len})")]
    InvalidRange {
        /// Text node the range was applied to.
        node: NodeId,
        /// Range start (bytes).
        start: usize,
        /// Range end (bytes).
        end: usize,
        /// Current text length (bytes).
        len: usize,
    },

    /// The regex engine rejected a generated pattern (usually: query too large).
    #[error("Invalid search pattern: {0}")]
    Pattern(#[from] regex::Error),

    /// A JSON document description could not be parsed.
    #[error("Failed to parse document: {0}")]
    DocumentParse(#[source] serde_json::Error),

    /// Configuration is malformed or out of range.
    #[error("Invalid configuration: {0}")]
    Config(String),

    /// Reading an input file failed.
    #[error("Failed to read {path}: {source}")]
    Io {
        /// File that could not be read.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The oracle failed and the failure is being surfaced.
    #[error(transparent)]
    Oracle(#[from] OracleError),
}

/// Failure modes of the external text-understanding oracle.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum OracleError {
    /// Network or transport failure (the call was rejected outright).
    #[error("Oracle request failed: {0}")]
    Transport(String),

    /// The oracle answered with an explicit error payload.
    #[error("Oracle reported an error: {0}")]
    Reported(String),

    /// The oracle answered with something that is not a snippet list.
    #[error("Oracle returned a malformed reply: {0}")]
    Malformed(String),

    /// The oracle did not answer in time.
    #[error("Oracle timed out after {0} ms")]
    Timeout(u64),
}

/// Convenience alias used throughout the crate.
pub type Result<T, E = GlintError> = std::result::Result<T, E>;
