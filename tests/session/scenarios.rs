use std::time::{Duration, Instant};

use glint::session::ERROR_STATUS;
use glint::{
    Direction, OracleError, OracleReply, Outcome, SearchConfig, SearchMode, SearchOrchestrator,
    StatusKind, Step, UiEvent,
};

use crate::common::{fixture, leaves, render_marked, run_query, session, snippets, DocBuilder};

fn statuses(events: &[UiEvent]) -> Vec<(String, StatusKind)> {
    events
        .iter()
        .filter_map(|e| match e {
            UiEvent::Status { text, kind } => Some((text.clone(), *kind)),
            _ => None,
        })
        .collect()
}

#[test]
fn test_forced_literal_bypasses_oracle_even_with_no_hits() {
    let mut s = session(fixture("budget_page.json"));
    let step = s.submit("'exact phrase", Instant::now());

    assert_eq!(
        step,
        Step::Done(Outcome::NoMatch {
            mode: SearchMode::ForcedLiteral
        })
    );
    assert!(!s.is_waiting());
    let events = s.drain_events();
    assert!(!events.contains(&UiEvent::Busy(true)));
    assert_eq!(statuses(&events), vec![("No matches found".into(), StatusKind::Info)]);
}

#[test]
fn test_progressive_falls_through_to_oracle() {
    let mut s = session(fixture("budget_page.json"));
    let (outcome, asked) = run_query(
        &mut s,
        "why did costs drop",
        snippets(&["operating costs fell sharply at the end of the year"]),
    );

    assert!(asked);
    assert_eq!(
        outcome,
        Outcome::Matches {
            mode: SearchMode::Progressive,
            count: 1
        }
    );
    assert!(render_marked(s.document()).contains("[operating costs fell sharply at the end of the year]"));
    let events = s.drain_events();
    assert!(events.contains(&UiEvent::Busy(true)));
    assert!(events.contains(&UiEvent::Busy(false)));
    assert_eq!(
        statuses(&events),
        vec![("1 relevant passage".into(), StatusKind::Success)]
    );
}

#[test]
fn test_oracle_request_carries_query_and_corpus() {
    let mut s = session(fixture("budget_page.json"));
    let Step::NeedsOracle(request) = s.submit("/  contact details ", Instant::now()) else {
        panic!("semantic query should ask the oracle");
    };
    assert_eq!(request.query, "contact details");
    assert!(request.content.contains("help@example.com"));
    assert!(s.is_waiting());
}

#[test]
fn test_sentinel_only_reply_is_no_match() {
    let mut s = session(fixture("budget_page.json"));
    let (outcome, _) = run_query(&mut s, "/pricing", snippets(&["NO_MATCH_FOUND"]));

    assert_eq!(
        outcome,
        Outcome::NoMatch {
            mode: SearchMode::ForcedSemantic
        }
    );
    assert_eq!(
        statuses(&s.drain_events()),
        vec![("No relevant passages found".into(), StatusKind::Warning)]
    );
}

#[test]
fn test_forced_semantic_failure_is_surfaced() {
    let mut s = session(fixture("budget_page.json"));
    let (outcome, _) = run_query(
        &mut s,
        "/pricing",
        Err(OracleError::Transport("connection refused".into())),
    );

    assert!(matches!(
        outcome,
        Outcome::Failed {
            mode: SearchMode::ForcedSemantic,
            ..
        }
    ));
    assert_eq!(
        statuses(&s.drain_events()),
        vec![(ERROR_STATUS.into(), StatusKind::Error)]
    );
    assert_eq!(s.highlights().total(), 0);
    assert!(!s.session().unwrap().active);
}

#[test]
fn test_progressive_failure_degrades_to_no_match() {
    let mut s = session(fixture("budget_page.json"));
    let (outcome, asked) = run_query(&mut s, "pricing model", Err(OracleError::Timeout(30_000)));

    assert!(asked);
    assert_eq!(
        outcome,
        Outcome::NoMatch {
            mode: SearchMode::Progressive
        }
    );
    assert_eq!(
        statuses(&s.drain_events()),
        vec![("No matches found".into(), StatusKind::Info)]
    );
}

#[test]
fn test_reply_after_end_session_is_dropped() {
    let mut s = session(fixture("budget_page.json"));
    let Step::NeedsOracle(request) = s.submit("/budget", Instant::now()) else {
        panic!("expected oracle request");
    };
    s.end_session();
    assert_eq!(
        s.complete(request.seq, Ok(OracleReply::Snippets(vec!["budget".into()]))),
        None
    );
    assert_eq!(s.highlights().total(), 0);
}

#[test]
fn test_semantic_results_are_capped() {
    let text = "alpha beta. ".repeat(30);
    let doc = DocBuilder::new().para(&text).build();
    let config = SearchConfig {
        max_highlights: 4,
        ..SearchConfig::default()
    };
    let mut s = SearchOrchestrator::new(doc, &config);
    let (outcome, _) = run_query(&mut s, "/letters", snippets(&["alpha beta"]));

    assert_eq!(
        outcome,
        Outcome::Matches {
            mode: SearchMode::ForcedSemantic,
            count: 4
        }
    );
}

#[test]
fn test_navigation_reports_counts() {
    let mut s = session(DocBuilder::new().para("ab ab ab").build());
    run_query(&mut s, "'ab", snippets(&[]));
    s.drain_events();

    s.navigate(Direction::Previous);
    assert_eq!(
        s.drain_events(),
        vec![UiEvent::ResultCount {
            current: Some(2),
            total: 3
        }]
    );
}

#[test]
fn test_mutation_reruns_after_quiet_period() {
    let mut s = session(DocBuilder::new().para("one apple").build());
    let t0 = Instant::now();
    run_query(&mut s, "'apple", snippets(&[]));
    assert_eq!(s.highlights().total(), 1);

    s.edit_document(t0, |doc| {
        let leaf = leaves(doc)
            .into_iter()
            .find(|&l| doc.text(l) == Some("one "))
            .expect("original leaf keeps the prefix");
        doc.set_text(leaf, "apple pie and one ").unwrap();
    });
    assert!(s.next_deadline().is_some());

    // still inside the debounce window
    assert!(s.poll(t0 + Duration::from_millis(500)).is_none());
    assert_eq!(s.highlights().total(), 1);

    let step = s.poll(t0 + Duration::from_millis(1_100));
    assert_eq!(
        step,
        Some(Step::Done(Outcome::Matches {
            mode: SearchMode::ForcedLiteral,
            count: 2
        }))
    );
}

#[test]
fn test_mutation_without_session_only_invalidates() {
    let mut s = session(DocBuilder::new().para("one apple").build());
    let t0 = Instant::now();
    s.edit_document(t0, |doc| {
        let leaf = leaves(doc)[0];
        doc.set_text(leaf, "two pears").unwrap();
    });
    assert_eq!(s.poll(t0 + Duration::from_secs(2)), None);
}

#[test]
fn test_into_document_is_clean() {
    let mut s = session(DocBuilder::new().para("Contact us at help@example.com today").build());
    run_query(&mut s, "help@example.com", snippets(&[]));
    assert_eq!(s.highlights().total(), 1);

    let doc = s.into_document();
    assert_eq!(render_marked(&doc), "Contact us at help@example.com today");
}

#[test]
fn test_top_ranked_snippet_survives_shared_start() {
    let doc = DocBuilder::new()
        .para("Report: John Smith wrote the quarterly report on Tuesday.")
        .build();
    let mut s = session(doc);
    let (outcome, asked) = run_query(
        &mut s,
        "/who wrote it",
        snippets(&["John Smith", "John Smith wrote the quarterly report"]),
    );

    assert!(asked);
    assert_eq!(
        outcome,
        Outcome::Matches {
            mode: SearchMode::ForcedSemantic,
            count: 1
        }
    );
    let highlighted: Vec<&str> = s.highlights().matches().map(|m| m.text()).collect();
    assert_eq!(highlighted, vec!["John Smith"]);
    assert_eq!(
        render_marked(s.document()),
        "Report: [John Smith] wrote the quarterly report on Tuesday."
    );
}
