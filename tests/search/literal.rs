use glint::{LiteralMatcher, Match, MatchKind, SearchConfig};

use crate::common::{fixture, DocBuilder};

#[test]
fn test_email_in_sentence_is_one_exact_match() {
    let doc = DocBuilder::new()
        .para("Contact us at help@example.com today")
        .build();
    let matches = LiteralMatcher::default().search(&doc, "help@example.com").unwrap();

    assert_eq!(matches.len(), 1);
    let Match::Exact { span, text } = &matches[0] else {
        panic!("expected an exact match, got {:?}", matches[0]);
    };
    assert_eq!(text, "help@example.com");
    assert_eq!((span.start, span.end), (14, 30));
}

#[test]
fn test_visibility_rules_on_fixture() {
    let doc = fixture("budget_page.json");
    let matches = LiteralMatcher::default().search(&doc, "budget").unwrap();
    let texts: Vec<&str> = matches
        .iter()
        .map(|m| {
            let span = m.spans()[0];
            doc.text(span.leaf).unwrap()
        })
        .collect();

    // script, hidden, closed shadow and cross-origin frame are all out of reach
    assert_eq!(
        texts,
        vec![
            "Open shadow mentions the budget.",
            "Framed budget note.",
            "Copyright 2025, budget office",
        ]
    );
    assert!(matches.iter().all(|m| m.kind() == MatchKind::Exact));
}

#[test]
fn test_depth_zero_stays_in_light_tree() {
    let doc = fixture("budget_page.json");
    let config = SearchConfig {
        max_depth: 0,
        ..SearchConfig::default()
    };
    let matches = LiteralMatcher::new(&config).search(&doc, "budget").unwrap();
    assert_eq!(matches.len(), 1);
    assert_eq!(matches[0].text(), "budget");
}

#[test]
fn test_case_insensitive_keeps_original_casing() {
    let doc = DocBuilder::new().para("Rust, RUST and rust").build();
    let matches = LiteralMatcher::default().search(&doc, "rust").unwrap();
    let texts: Vec<&str> = matches.iter().map(Match::text).collect();
    assert_eq!(texts, vec!["Rust", "RUST", "rust"]);
}

#[test]
fn test_match_cap_applies() {
    let doc = DocBuilder::new().para(&"na ".repeat(40)).build();
    let config = SearchConfig {
        literal_max_matches: 7,
        ..SearchConfig::default()
    };
    let matches = LiteralMatcher::new(&config).search(&doc, "na").unwrap();
    assert_eq!(matches.len(), 7);
}
