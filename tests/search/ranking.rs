use glint::{sort_matches, Match, MatchKind, MatchRanker, NodeId, SearchConfig, Span};

fn exact(leaf: u32, start: usize) -> Match {
    Match::Exact {
        span: Span::new(NodeId(leaf), start, start + 3),
        text: "abc".into(),
    }
}

fn fuzzy(leaf: u32, score: f64) -> Match {
    Match::Fuzzy {
        span: Span::new(NodeId(leaf), 0, 10),
        text: "fuzzy text".into(),
        score,
    }
}

fn words(leaf: u32) -> Match {
    Match::WordCoincidence {
        span: Span::new(NodeId(leaf), 0, 5),
        text: "words".into(),
    }
}

#[test]
fn test_authoritative_before_guesses_then_by_score() {
    let ranked = MatchRanker::default().rank(vec![
        fuzzy(1, 0.82),
        words(2),
        exact(3, 0),
        fuzzy(4, 0.95),
        exact(5, 0),
    ]);
    let kinds: Vec<MatchKind> = ranked.iter().map(Match::kind).collect();
    assert_eq!(
        kinds,
        vec![
            MatchKind::Exact,
            MatchKind::Exact,
            MatchKind::Fuzzy,
            MatchKind::WordCoincidence,
            MatchKind::Fuzzy,
        ]
    );
    // exact order is discovery order
    assert_eq!(ranked[0].spans()[0].leaf, NodeId(3));
    assert_eq!(ranked[1].spans()[0].leaf, NodeId(5));
    assert_eq!(ranked[2].score(), 0.95);
}

#[test]
fn test_duplicates_from_different_snippets_collapse() {
    let ranked = MatchRanker::default().rank(vec![exact(1, 0), exact(1, 0), exact(1, 4)]);
    assert_eq!(ranked.len(), 2);
}

#[test]
fn test_cap_is_max_highlights() {
    let many: Vec<Match> = (0..40).map(|i| exact(i, 0)).collect();
    let ranked = MatchRanker::default().rank(many);
    assert_eq!(ranked.len(), SearchConfig::default().max_highlights);
    assert_eq!(ranked.len(), 15);
}

#[test]
fn test_sort_is_stable_among_equals() {
    let mut matches = vec![exact(2, 0), exact(1, 0), exact(3, 0)];
    sort_matches(&mut matches);
    let leaves: Vec<NodeId> = matches.iter().map(|m| m.spans()[0].leaf).collect();
    assert_eq!(leaves, vec![NodeId(2), NodeId(1), NodeId(3)]);
}
