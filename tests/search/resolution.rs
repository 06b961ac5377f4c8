use glint::{Match, MatchKind, SnippetResolver, NO_MATCH_SENTINEL};

use crate::common::{fixture, leaves, DocBuilder};

#[test]
fn test_sentinel_is_searched_like_any_snippet() {
    let doc = DocBuilder::new()
        .para("Our founder John Smith started the company.")
        .para("Write to jane@acme.com for details.")
        .build();
    let resolver = SnippetResolver::default();
    let matches = resolver.resolve(&doc, &["John Smith", NO_MATCH_SENTINEL, "jane@acme.com"]);

    let texts: Vec<&str> = matches.iter().map(Match::text).collect();
    assert_eq!(texts, vec!["John Smith", "jane@acme.com"]);
}

#[test]
fn test_sentinel_present_in_page_is_found_literally() {
    let doc = DocBuilder::new()
        .para("The API returns NO_MATCH_FOUND when nothing matches.")
        .build();
    let matches = SnippetResolver::default().resolve(&doc, &[NO_MATCH_SENTINEL]);
    assert_eq!(matches.len(), 1);
    assert_eq!(matches[0].kind(), MatchKind::Exact);
}

#[test]
fn test_eighty_char_snippet_across_two_leaves() {
    let one = "Analysts were surprised. The board noted that growth slowed at the end of leaf one";
    let two = "start of leaf two the committee recommended a new direction for the group.";
    let doc = DocBuilder::new().para(one).para(two).build();
    let snippet = "growth slowed at the end of leaf one start of leaf two the committee recommended";
    assert!(snippet.chars().count() >= 80);

    let matches = SnippetResolver::default().resolve(&doc, &[snippet]);
    assert_eq!(matches.len(), 1);
    let Match::CrossSpan { spans, .. } = &matches[0] else {
        panic!("expected a cross-span match, got {:?}", matches[0]);
    };
    let ids = leaves(&doc);
    assert_eq!(spans.len(), 2);
    assert_eq!(spans[0].leaf, ids[0]);
    assert_eq!(spans[1].leaf, ids[1]);
    assert_eq!(spans[0].end, one.len());
    assert_eq!(spans[1].start, 0);
    assert_eq!(&two[..spans[1].end], "start of leaf two the committee recommended");
}

#[test]
fn test_snippet_with_collapsed_whitespace_still_exact() {
    let doc = DocBuilder::new()
        .para("The plan  adds three\nbus routes to the network.")
        .build();
    let matches = SnippetResolver::default().resolve(&doc, &["plan adds three bus routes"]);
    assert_eq!(matches.len(), 1);
    assert_eq!(matches[0].kind(), MatchKind::Exact);
    assert_eq!(matches[0].text(), "plan  adds three\nbus routes");
}

#[test]
fn test_paraphrase_resolves_fuzzy_within_leaf() {
    let doc = fixture("budget_page.json");
    let matches = SnippetResolver::default()
        .resolve(&doc, &["operating costs fell sharply at year end, revenue steady in every region"]);
    assert!(!matches.is_empty());
    assert_eq!(matches[0].kind(), MatchKind::Fuzzy);
    assert!(matches[0].score() >= 0.8);
}

#[test]
fn test_unresolvable_snippet_yields_nothing() {
    let doc = fixture("budget_page.json");
    let matches = SnippetResolver::default()
        .resolve(&doc, &["completely unrelated statement about volcanic geology"]);
    assert!(matches.is_empty());
}

const UTENSILS: [&str; 6] = [
    "copper kettle",
    "silver spoon",
    "golden ladle",
    "bronze teapot",
    "marble mortar",
    "granite pestle",
];

fn utensil_page() -> glint::Document {
    UTENSILS
        .iter()
        .fold(DocBuilder::new(), |builder, text| builder.para(text))
        .build()
}

#[test]
fn test_cross_span_reaches_five_leaves() {
    let doc = utensil_page();
    let snippet = UTENSILS[..5].join(" ");
    assert!(snippet.len() > 50);

    let matches = SnippetResolver::default().resolve(&doc, &[snippet.as_str()]);
    assert_eq!(matches.len(), 1);
    assert_eq!(matches[0].kind(), MatchKind::CrossSpan);
    let covered: Vec<_> = matches[0].spans().iter().map(|s| s.leaf).collect();
    assert_eq!(covered, leaves(&doc)[..5].to_vec());
}

#[test]
fn test_cross_span_stops_at_six_leaves() {
    let doc = utensil_page();
    let snippet = UTENSILS.join(" ");

    let matches = SnippetResolver::default().resolve(&doc, &[snippet.as_str()]);
    assert!(
        matches.iter().all(|m| m.kind() != MatchKind::CrossSpan),
        "{matches:?}"
    );
    assert!(matches.is_empty());
}

#[test]
fn test_cross_span_capped_at_three_per_snippet() {
    let head = "the night shift crew restarted";
    let tail = "the pumping station twice";
    let snippet = format!("{head} {tail}");
    assert!(snippet.len() > 50);
    let doc = (0..4)
        .fold(DocBuilder::new(), |builder, _| builder.para(head).para(tail))
        .build();

    let matches = SnippetResolver::default().resolve(&doc, &[snippet.as_str()]);
    assert_eq!(matches.len(), 3);
    let ids = leaves(&doc);
    for (pair, m) in matches.iter().enumerate() {
        assert_eq!(m.kind(), MatchKind::CrossSpan);
        let covered: Vec<_> = m.spans().iter().map(|s| s.leaf).collect();
        assert_eq!(covered, vec![ids[2 * pair], ids[2 * pair + 1]]);
        assert_eq!(m.text(), snippet);
    }
}

#[test]
fn test_fuzzy_keeps_top_five() {
    let regions = ["Ohio", "Texas", "Maine", "Idaho", "Utah", "Iowa", "Nevada"];
    let doc = regions
        .iter()
        .fold(DocBuilder::new(), |builder, region| {
            builder.para(&format!("Revenue for the quarterly period grew strongly in {region}."))
        })
        .build();

    let matches = SnippetResolver::default().resolve(&doc, &["quarterly revenue grew strongly"]);
    assert_eq!(matches.len(), 5);
    assert!(matches.iter().all(|m| m.kind() == MatchKind::Fuzzy));
    assert!(matches.iter().all(|m| m.score() >= 0.6 && m.score() < 1.0));
}
