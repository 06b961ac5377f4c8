use glint::highlight::CURRENT_CLASS;
use glint::{CursorPosition, Direction, HighlightManager, LiteralMatcher};

use crate::common::DocBuilder;

#[test]
fn test_cursor_cycles_through_all_matches() {
    let mut doc = DocBuilder::new()
        .para("red green red")
        .para("blue red")
        .build();
    let matches = LiteralMatcher::default().search(&doc, "red").unwrap();
    let mut manager = HighlightManager::new();
    manager.highlight(&mut doc, &matches);

    let seen: Vec<Option<usize>> = (0..4)
        .map(|_| manager.navigate(&mut doc, Direction::Next).current)
        .collect();
    assert_eq!(seen, vec![Some(1), Some(2), Some(0), Some(1)]);

    assert_eq!(
        manager.navigate(&mut doc, Direction::Previous),
        CursorPosition { current: Some(0), total: 3 }
    );
    assert_eq!(manager.navigate(&mut doc, Direction::Previous).current, Some(2));
}

#[test]
fn test_only_current_markers_carry_current_class() {
    let mut doc = DocBuilder::new().para("ab ab ab").build();
    let matches = LiteralMatcher::default().search(&doc, "ab").unwrap();
    let mut manager = HighlightManager::new();
    manager.highlight(&mut doc, &matches);
    manager.navigate(&mut doc, Direction::Next);

    let current: Vec<bool> = manager
        .markers()
        .map(|markers| {
            doc.attr(markers[0], "class")
                .is_some_and(|c| c.split(' ').any(|w| w == CURRENT_CLASS))
        })
        .collect();
    assert_eq!(current, vec![false, true, false]);
    assert_eq!(doc.scroll_target(), Some(manager.markers().nth(1).unwrap()[0]));
}

#[test]
fn test_clear_resets_cursor() {
    let mut doc = DocBuilder::new().para("ab ab").build();
    let matches = LiteralMatcher::default().search(&doc, "ab").unwrap();
    let mut manager = HighlightManager::new();
    manager.highlight(&mut doc, &matches);
    manager.clear(&mut doc);

    assert!(manager.is_empty());
    assert_eq!(manager.position(), CursorPosition::default());
    assert_eq!(manager.navigate(&mut doc, Direction::Next), CursorPosition::default());
}
