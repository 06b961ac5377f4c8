use std::time::{Duration, Instant};

use glint::{ContentExtractor, SearchConfig};

use crate::common::{article_page, fixture, leaves};

fn permissive() -> SearchConfig {
    SearchConfig {
        min_content_chars: 20,
        ..SearchConfig::default()
    }
}

#[test]
fn test_article_wins_over_chrome() {
    let doc = article_page();
    let extraction = ContentExtractor::new(&permissive()).build(&doc);

    assert!(extraction.text.starts_with("City council approves new transit plan"));
    assert!(extraction.text.contains("light rail line to the airport"));
    assert!(!extraction.text.contains("Subscribe"));
    assert!(!extraction.text.contains("Copyright"));
    assert!(!extraction.text.contains("Business"));
    assert_eq!(extraction.stats.blocks, 1);
    assert!(!extraction.stats.fell_back);
}

#[test]
fn test_main_reaches_into_open_shadow_and_same_origin_frame() {
    let doc = fixture("budget_page.json");
    let extraction = ContentExtractor::new(&permissive()).build(&doc);

    assert!(extraction.text.contains("Contact us at help@example.com today."));
    assert!(extraction.text.contains("Open shadow mentions the budget."));
    assert!(extraction.text.contains("Framed budget note."));
    assert!(!extraction.text.contains("Closed shadow"));
    assert!(!extraction.text.contains("Foreign"));
    assert!(!extraction.text.contains("Hidden"));
    assert!(!extraction.text.contains("var budget"));
}

#[test]
fn test_thin_page_falls_back_to_whole_tree() {
    let doc = article_page();
    let extraction = ContentExtractor::default().build(&doc);

    assert!(extraction.stats.fell_back);
    // the whole-tree walk does not know about chrome
    assert!(extraction.text.contains("Copyright 2025 Example News"));
}

#[test]
fn test_length_cap_cuts_at_sentence() {
    let doc = article_page();
    let config = SearchConfig {
        min_content_chars: 20,
        max_content_chars: 120,
        ..SearchConfig::default()
    };
    let extraction = ContentExtractor::new(&config).build(&doc);

    assert!(extraction.stats.truncated);
    assert!(extraction.stats.chars <= 120);
    assert!(extraction.text.ends_with('.'));
}

#[test]
fn test_cache_is_dropped_by_mutation_and_ttl() {
    let mut doc = article_page();
    let mut extractor = ContentExtractor::new(&permissive());
    let t0 = Instant::now();
    let first = extractor.extract_at(&doc, t0);

    // untouched and fresh: served from cache
    assert_eq!(extractor.extract_at(&doc, t0 + Duration::from_secs(1)), first);
    assert_eq!(extractor.cache().unwrap().built_at, t0);

    // a host mutation invalidates
    let leaf = leaves(&doc)
        .into_iter()
        .find(|&l| doc.text(l) == Some("Construction is expected to begin next spring and finish within four years."))
        .unwrap();
    doc.set_text(leaf, "Construction starts in autumn.").unwrap();
    let second = extractor.extract_at(&doc, t0 + Duration::from_secs(2));
    assert!(second.contains("Construction starts in autumn."));

    // and so does age
    let later = t0 + Duration::from_secs(60);
    extractor.extract_at(&doc, later);
    assert_eq!(extractor.cache().unwrap().built_at, later);
}
