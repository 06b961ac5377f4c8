use glint::highlight::{MARKER_CLASS, MARKER_TAG, MATCH_ATTR};
use glint::{HighlightManager, HighlightReport, LiteralMatcher, Match, SnippetResolver, Span};

use crate::common::{fixture, leaf_texts, leaves, render_marked, DocBuilder};

#[test]
fn test_literal_matches_round_trip_through_markers() {
    let mut doc = DocBuilder::new()
        .para("Contact us at help@example.com today")
        .build();
    let before = leaf_texts(&doc);
    let matches = LiteralMatcher::default().search(&doc, "help@example.com").unwrap();

    let mut manager = HighlightManager::new();
    manager.highlight(&mut doc, &matches);
    assert_eq!(render_marked(&doc), "Contact us at [help@example.com] today");

    let marker = manager.markers().next().unwrap()[0];
    assert_eq!(doc.tag(marker), Some(MARKER_TAG));
    assert_eq!(doc.attr(marker, MATCH_ATTR), Some("0"));
    assert!(doc.attr(marker, "class").unwrap().contains(MARKER_CLASS));

    manager.clear(&mut doc);
    assert_eq!(leaf_texts(&doc), before);
}

#[test]
fn test_stale_span_after_mutation_is_skipped_not_fatal() {
    let mut doc = DocBuilder::new()
        .para("The annual budget was approved on Tuesday.")
        .para("A second paragraph mentions the budget too.")
        .build();
    let matches = LiteralMatcher::default().search(&doc, "budget").unwrap();
    assert_eq!(matches.len(), 2);

    // the page rewrites the first paragraph before we get to highlight
    let first = leaves(&doc)[0];
    doc.set_text(first, "Cancelled.").unwrap();

    let mut manager = HighlightManager::new();
    let report = manager.highlight(&mut doc, &matches);

    assert_eq!(report, HighlightReport { applied: 1, skipped: 1 });
    assert_eq!(manager.total(), 1);
    assert_eq!(
        render_marked(&doc),
        "Cancelled. A second paragraph mentions the [budget] too."
    );
}

#[test]
fn test_shrunk_leaf_clamps_span() {
    let mut doc = DocBuilder::new().para("alpha beta gamma").build();
    let leaf = leaves(&doc)[0];
    let m = Match::Exact {
        span: Span::new(leaf, 6, 16),
        text: "beta gamma".into(),
    };
    doc.set_text(leaf, "alpha bet").unwrap();

    let mut manager = HighlightManager::new();
    let report = manager.highlight(&mut doc, &[m]);
    assert_eq!(report.applied, 1);
    assert_eq!(render_marked(&doc), "alpha [bet]");
}

#[test]
fn test_cross_span_match_marks_both_leaves_and_restores() {
    let one = "Analysts were surprised. The board noted that growth slowed at the end of leaf one";
    let two = "start of leaf two the committee recommended a new direction for the group.";
    let mut doc = DocBuilder::new().para(one).para(two).build();
    let before = leaf_texts(&doc);
    let snippet = "growth slowed at the end of leaf one start of leaf two the committee recommended";
    let matches = SnippetResolver::default().resolve(&doc, &[snippet]);

    let mut manager = HighlightManager::new();
    let report = manager.highlight(&mut doc, &matches);
    assert_eq!(report.applied, 2);
    assert_eq!(manager.total(), 1);
    assert_eq!(
        render_marked(&doc),
        "Analysts were surprised. The board noted that [growth slowed at the end of leaf one] \
         [start of leaf two the committee recommended] a new direction for the group."
    );

    manager.clear(&mut doc);
    assert_eq!(leaf_texts(&doc), before);
}

#[test]
fn test_highlighting_never_bumps_generation() {
    let mut doc = fixture("budget_page.json");
    let generation = doc.generation();
    let matches = LiteralMatcher::default().search(&doc, "budget").unwrap();

    let mut manager = HighlightManager::new();
    manager.highlight(&mut doc, &matches);
    assert_eq!(manager.total(), 3);
    manager.clear(&mut doc);

    assert_eq!(doc.generation(), generation);
}

#[test]
fn test_highlighting_twice_is_idempotent() {
    let mut doc = DocBuilder::new().para("one two one two one").build();
    let matches = LiteralMatcher::default().search(&doc, "one").unwrap();

    let mut manager = HighlightManager::new();
    manager.highlight(&mut doc, &matches);
    let once = render_marked(&doc);
    manager.highlight(&mut doc, &matches);

    assert_eq!(render_marked(&doc), once);
    assert_eq!(manager.total(), 3);
}
