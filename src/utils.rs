//! Utility functions for string processing.

#[cfg(feature = "unicode-normalization")]
use unicode_normalization::UnicodeNormalization;

/// Normalize a string for classification: lowercase, strip diacritics, and collapse whitespace.
///
/// Used to decide what a snippet *is* (generic filler or not), never to locate
/// it: offsets always refer to the original leaf text.
/// - "Café" → "cafe"
/// - "  Read   MORE " → "read more"
///
/// # Algorithm (with unicode-normalization feature)
///
/// 1. NFD normalize (decompose characters into base + combining marks)
/// 2. Filter out combining marks (category Mn = Mark, Nonspacing)
/// 3. Lowercase
/// 4. Collapse whitespace
///
/// # Algorithm (without unicode-normalization)
///
/// 1. Lowercase only (assumes input is pre-normalized or ASCII)
/// 2. Collapse whitespace
#[cfg(feature = "unicode-normalization")]
pub fn normalize(value: &str) -> String {
    value
        .nfd()
        .filter(|c| !is_combining_mark(*c))
        .collect::<String>()
        .to_lowercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// Lightweight normalization without the unicode-normalization dependency.
#[cfg(not(feature = "unicode-normalization"))]
pub fn normalize(value: &str) -> String {
    value
        .to_lowercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// Check if a character is a combining mark (diacritic).
///
/// Combining marks have Unicode category "Mn" (Mark, Nonspacing).
/// Examples: ́ (acute), ̄ (macron), ̣ (dot below)
#[cfg(feature = "unicode-normalization")]
fn is_combining_mark(c: char) -> bool {
    matches!(c,
        '\u{0300}'..='\u{036F}' |  // Combining Diacritical Marks
        '\u{1AB0}'..='\u{1AFF}' |  // Combining Diacritical Marks Extended
        '\u{1DC0}'..='\u{1DFF}' |  // Combining Diacritical Marks Supplement
        '\u{20D0}'..='\u{20FF}' |  // Combining Diacritical Marks for Symbols
        '\u{FE20}'..='\u{FE2F}'    // Combining Half Marks
    )
}

/// Collapse runs of whitespace to single spaces and trim the ends.
pub fn collapse_whitespace(value: &str) -> String {
    value.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Length in Unicode scalar values, which is what every char threshold means.
#[inline]
pub fn char_len(value: &str) -> usize {
    value.chars().count()
}

/// Whitespace-separated words with surrounding punctuation trimmed.
///
/// Inner punctuation survives: "jane@acme.com," → "jane@acme.com".
pub fn words(value: &str) -> impl Iterator<Item = &str> {
    value
        .split_whitespace()
        .map(|w| w.trim_matches(|c: char| !c.is_alphanumeric()))
        .filter(|w| !w.is_empty())
}

// ============================================================================
// GENERIC SNIPPET DETECTION
// ============================================================================

/// Words that carry no search signal on their own.
pub const STOP_WORDS: &[&str] = &[
    "a", "about", "above", "after", "again", "all", "also", "am", "an", "and", "any", "are", "as",
    "at", "be", "because", "been", "before", "being", "below", "between", "both", "but", "by",
    "can", "could", "did", "do", "does", "doing", "down", "during", "each", "few", "for", "from",
    "further", "had", "has", "have", "having", "he", "her", "here", "hers", "him", "his", "how",
    "i", "if", "in", "into", "is", "it", "its", "itself", "just", "me", "more", "most", "my",
    "no", "nor", "not", "now", "of", "off", "on", "once", "only", "or", "other", "our", "out",
    "over", "own", "same", "she", "should", "so", "some", "such", "than", "that", "the", "their",
    "them", "then", "there", "these", "they", "this", "those", "through", "to", "too", "under",
    "until", "up", "very", "was", "we", "were", "what", "when", "where", "which", "while", "who",
    "whom", "why", "will", "with", "would", "you", "your", "yours",
];

/// Whole snippets that are filler when they stand alone.
pub const FILLER_PHRASES: &[&str] = &[
    "click here",
    "read more",
    "learn more",
    "see more",
    "more info",
    "n/a",
    "none",
    "yes",
    "ok",
    "home",
    "menu",
    "next",
    "previous",
    "back",
];

/// Share of stop words above which a snippet is considered generic.
pub const GENERIC_STOP_WORD_RATIO: f64 = 0.7;

#[inline]
pub fn is_stop_word(word: &str) -> bool {
    STOP_WORDS.contains(&word)
}

/// Whether a snippet is too generic to be worth locating.
///
/// Generic means: the normalized snippet is itself a stop word or filler
/// phrase, it has no words at all, or more than 70% of its words are stop
/// words.
pub fn is_generic_snippet(snippet: &str) -> bool {
    let normalized = normalize(snippet);
    if is_stop_word(&normalized) || FILLER_PHRASES.contains(&normalized.as_str()) {
        return true;
    }
    let tokens: Vec<&str> = words(&normalized).collect();
    if tokens.is_empty() {
        return true;
    }
    let stop = tokens.iter().filter(|w| is_stop_word(w)).count();
    stop as f64 / tokens.len() as f64 > GENERIC_STOP_WORD_RATIO
}
