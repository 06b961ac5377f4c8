//! Shared test utilities and fixtures.

#![allow(dead_code)]

use std::path::PathBuf;
use std::time::Instant;

use glint::tree::scan::TextLeaves;
use glint::{
    Document, NodeId, OracleError, OracleReply, Outcome, SearchConfig, SearchOrchestrator, Step,
};

// Re-export canonical test utilities from glint::testing
pub use glint::testing::{article_page, render_marked, DocBuilder};

// ============================================================================
// FIXTURES
// ============================================================================

/// Directory holding the JSON fixtures.
pub fn fixtures_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures")
}

/// Load a JSON document fixture by file name.
pub fn fixture(name: &str) -> Document {
    Document::from_path(&fixtures_dir().join(name)).expect("fixture should parse")
}

// ============================================================================
// HELPERS
// ============================================================================

/// Visible text leaves in document order.
pub fn leaves(doc: &Document) -> Vec<NodeId> {
    TextLeaves::new(doc, doc.root()).collect()
}

/// Text of every visible leaf, in order.
pub fn leaf_texts(doc: &Document) -> Vec<String> {
    leaves(doc)
        .into_iter()
        .filter_map(|leaf| doc.text(leaf).map(str::to_string))
        .collect()
}

/// Submit `raw` and, if the oracle is asked, answer with `reply` at once.
pub fn run_query(
    session: &mut SearchOrchestrator,
    raw: &str,
    reply: Result<OracleReply, OracleError>,
) -> (Outcome, bool) {
    match session.submit(raw, Instant::now()) {
        Step::Done(outcome) => (outcome, false),
        Step::NeedsOracle(request) => {
            let outcome = session
                .complete(request.seq, reply)
                .expect("reply for the pending request is accepted");
            (outcome, true)
        }
    }
}

/// A session over `doc` with default limits.
pub fn session(doc: Document) -> SearchOrchestrator {
    SearchOrchestrator::new(doc, &SearchConfig::default())
}

/// Snippets reply from string literals.
pub fn snippets(items: &[&str]) -> Result<OracleReply, OracleError> {
    Ok(OracleReply::from_raw(Some(items.iter().copied())))
}
