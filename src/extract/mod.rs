// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Content extraction: what is this document about?
//!
//! The oracle gets one flat string. It should be the article, not the cookie
//! banner, so extraction works through a priority list of containers:
//!
//! | Priority | Containers |
//! |----------|------------|
//! | 1 | `main` |
//! | 2 | `article` |
//! | 3 | `[role=main]` |
//! | 4 | `#content`, `.content` |
//! | 5 | `section` |
//! | 6 | `p`, `li`, `td`, `h1`–`h6`, `blockquote`, `pre` |
//!
//! Navigation chrome (`nav`, `header`, `footer`, `aside`, and anything whose
//! class or id reads like a menu, ad, or consent prompt) is never entered.
//! Every matching container becomes a block of whitespace-collapsed text. A
//! block already contained in the corpus is dropped, and a block that contains
//! earlier ones replaces them, so `main` followed by its own paragraphs costs
//! nothing.
//!
//! Under 500 chars the prioritized pass is not trusted and a whole-tree walk
//! is used instead. Over 50,000 chars the corpus is cut at the last sentence
//! boundary before the cap. None of this can fail from the caller's point of
//! view: if the tree can't be read the coarsest raw text is returned.

use std::time::{Duration, Instant};

use log::{debug, warn};
use serde::Serialize;

use crate::config::SearchConfig;
use crate::error::Result;
use crate::tree::scan::{is_non_content, visible_text, TextLeaves};
use crate::tree::{Document, Element, NodeId};
use crate::utils::{char_len, collapse_whitespace};

// =============================================================================
// CONTAINER SELECTION
// =============================================================================

/// The slice of CSS selectors extraction needs.
#[derive(Debug, Clone, Copy)]
enum Selector {
    Tag(&'static str),
    Role(&'static str),
    Id(&'static str),
    Class(&'static str),
}

impl Selector {
    fn matches(self, el: &Element) -> bool {
        match self {
            Selector::Tag(tag) => el.tag.eq_ignore_ascii_case(tag),
            Selector::Role(role) => el.attr("role") == Some(role),
            Selector::Id(id) => el.attr("id") == Some(id),
            Selector::Class(class) => el.classes().any(|c| c == class),
        }
    }
}

/// Container groups, highest priority first.
const PRIORITY: &[&[Selector]] = &[
    &[Selector::Tag("main")],
    &[Selector::Tag("article")],
    &[Selector::Role("main")],
    &[Selector::Id("content"), Selector::Class("content")],
    &[Selector::Tag("section")],
    &[
        Selector::Tag("p"),
        Selector::Tag("li"),
        Selector::Tag("td"),
        Selector::Tag("h1"),
        Selector::Tag("h2"),
        Selector::Tag("h3"),
        Selector::Tag("h4"),
        Selector::Tag("h5"),
        Selector::Tag("h6"),
        Selector::Tag("blockquote"),
        Selector::Tag("pre"),
    ],
];

/// Structural chrome, by tag.
pub const CHROME_TAGS: &[&str] = &["nav", "header", "footer", "aside"];

/// Class/id words that mark UI boilerplate rather than content.
pub const BOILERPLATE_WORDS: &[&str] = &[
    "nav",
    "navbar",
    "navigation",
    "menu",
    "sidebar",
    "footer",
    "header",
    "banner",
    "cookie",
    "cookies",
    "consent",
    "ad",
    "ads",
    "advert",
    "advertisement",
    "promo",
    "subscribe",
    "newsletter",
];

/// Whether an element is navigation chrome, ads, or similar.
///
/// Class and id values are split into words on anything non-alphanumeric, so
/// `site-nav` is chrome but `canvas` and `shadow` are not.
pub fn is_chrome(el: &Element) -> bool {
    if CHROME_TAGS.iter().any(|t| el.tag.eq_ignore_ascii_case(t)) {
        return true;
    }
    let id = el.attr("id").unwrap_or("");
    let class = el.attr("class").unwrap_or("");
    [id, class]
        .iter()
        .flat_map(|value| value.split(|c: char| !c.is_ascii_alphanumeric()))
        .any(|word| {
            let word = word.to_ascii_lowercase();
            BOILERPLATE_WORDS.contains(&word.as_str())
        })
}

// =============================================================================
// EXTRACTION RESULT
// =============================================================================

/// What one extraction pass did, for logging and the CLI.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtractStats {
    /// Distinct blocks kept after containment dedup.
    pub blocks: usize,
    /// Length of the final corpus in chars.
    pub chars: usize,
    /// Whether the corpus was cut at the length cap.
    pub truncated: bool,
    /// Whether the whole-tree walk replaced the prioritized pass.
    pub fell_back: bool,
}

/// A corpus with its stats.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Extraction {
    pub text: String,
    pub stats: ExtractStats,
}

/// Cached corpus. Valid while the document generation is unchanged and the
/// entry is younger than the TTL.
#[derive(Debug, Clone)]
pub struct ContentCache {
    pub text: String,
    pub built_at: Instant,
    pub generation: u64,
}

impl ContentCache {
    fn is_fresh(&self, generation: u64, now: Instant, ttl: Duration) -> bool {
        self.generation == generation && now.saturating_duration_since(self.built_at) < ttl
    }
}

// =============================================================================
// EXTRACTOR
// =============================================================================

/// Builds and caches the document corpus sent to the oracle.
#[derive(Debug)]
pub struct ContentExtractor {
    max_depth: usize,
    min_chars: usize,
    max_chars: usize,
    ttl: Duration,
    cache: Option<ContentCache>,
}

impl Default for ContentExtractor {
    fn default() -> Self {
        Self::new(&SearchConfig::default())
    }
}

impl ContentExtractor {
    pub fn new(config: &SearchConfig) -> Self {
        Self {
            max_depth: config.max_depth,
            min_chars: config.min_content_chars,
            max_chars: config.max_content_chars,
            ttl: config.cache_ttl(),
            cache: None,
        }
    }

    /// Extract now, using the cache when it is still valid.
    pub fn extract(&mut self, doc: &Document) -> String {
        self.extract_at(doc, Instant::now())
    }

    /// `extract` with an explicit clock.
    pub fn extract_at(&mut self, doc: &Document, now: Instant) -> String {
        if let Some(cache) = &self.cache {
            if cache.is_fresh(doc.generation(), now, self.ttl) {
                debug!("extract: cache hit ({} chars)", char_len(&cache.text));
                return cache.text.clone();
            }
        }
        let extraction = self.build(doc);
        self.cache = Some(ContentCache {
            text: extraction.text.clone(),
            built_at: now,
            generation: doc.generation(),
        });
        extraction.text
    }

    /// Drop the cached corpus.
    pub fn invalidate(&mut self) {
        if self.cache.take().is_some() {
            debug!("extract: cache invalidated");
        }
    }

    pub fn cache(&self) -> Option<&ContentCache> {
        self.cache.as_ref()
    }

    /// Uncached extraction. Never fails: an unreadable tree yields its raw text.
    pub fn build(&self, doc: &Document) -> Extraction {
        match self.try_build(doc) {
            Ok(extraction) => {
                debug!("extract: {:?}", extraction.stats);
                extraction
            }
            Err(e) => {
                warn!("extract: traversal failed ({e}), using raw text");
                let text = collapse_whitespace(&doc.raw_text(doc.root()));
                let stats = ExtractStats {
                    blocks: 1,
                    chars: char_len(&text),
                    truncated: false,
                    fell_back: true,
                };
                Extraction { text, stats }
            }
        }
    }

    fn try_build(&self, doc: &Document) -> Result<Extraction> {
        doc.try_element(doc.root())?;

        let mut corpus = Corpus::default();
        for group in self.candidates(doc) {
            for (id, depth) in group {
                let block = self.block_text(doc, id, depth);
                corpus.add(block);
            }
        }

        let mut stats = ExtractStats {
            blocks: corpus.blocks.len(),
            ..ExtractStats::default()
        };
        let mut text = corpus.blocks.join("\n\n");
        if char_len(&text) < self.min_chars {
            debug!(
                "extract: prioritized pass gave {} chars, walking whole tree",
                char_len(&text)
            );
            text = collapse_whitespace(&visible_text(doc, doc.root(), self.max_depth));
            stats.blocks = usize::from(!text.is_empty());
            stats.fell_back = true;
        }

        let (text, truncated) = truncate_at_sentence(&text, self.max_chars);
        stats.truncated = truncated;
        stats.chars = char_len(&text);
        Ok(Extraction { text, stats })
    }

    /// Containers per priority group, each in document order, with the number
    /// of shadow/frame boundaries crossed to reach them.
    fn candidates(&self, doc: &Document) -> Vec<Vec<(NodeId, usize)>> {
        let mut groups = vec![Vec::new(); PRIORITY.len()];
        let mut stack = vec![(doc.root(), 0usize)];
        while let Some((id, depth)) = stack.pop() {
            let Some(el) = doc.element(id) else {
                continue;
            };
            if is_non_content(el) || is_chrome(el) {
                continue;
            }
            if let Some(g) = PRIORITY
                .iter()
                .position(|group| group.iter().any(|s| s.matches(el)))
            {
                groups[g].push((id, depth));
            }
            let crossing = depth + 1;
            if let Some(frame) = el.frame {
                if frame.same_origin && crossing <= self.max_depth {
                    stack.push((frame.root, crossing));
                }
            }
            stack.extend(doc.children(id).iter().rev().map(|&c| (c, depth)));
            if let Some(shadow) = el.shadow {
                if shadow.mode == crate::tree::ShadowMode::Open && crossing <= self.max_depth {
                    stack.push((shadow.root, crossing));
                }
            }
        }
        groups
    }

    fn block_text(&self, doc: &Document, id: NodeId, depth: usize) -> String {
        let parts: Vec<&str> = TextLeaves::new(doc, id)
            .max_depth(self.max_depth.saturating_sub(depth))
            .prune(is_chrome)
            .filter_map(|leaf| doc.text(leaf))
            .collect();
        collapse_whitespace(&parts.join(" "))
    }
}

/// Ordered blocks with containment dedup.
#[derive(Debug, Default)]
struct Corpus {
    blocks: Vec<String>,
}

impl Corpus {
    fn add(&mut self, block: String) {
        if block.is_empty() || self.blocks.iter().any(|b| b.contains(block.as_str())) {
            return;
        }
        match self.blocks.iter().position(|b| block.contains(b.as_str())) {
            Some(first) => {
                self.blocks.retain(|b| !block.contains(b.as_str()));
                self.blocks.insert(first.min(self.blocks.len()), block);
            }
            None => self.blocks.push(block),
        }
    }
}

/// Cut `text` to at most `max_chars` chars, preferring the last sentence end.
fn truncate_at_sentence(text: &str, max_chars: usize) -> (String, bool) {
    let Some((cut, _)) = text.char_indices().nth(max_chars) else {
        return (text.to_string(), false);
    };
    let head = &text[..cut];
    let end = head
        .rfind(['.', '!', '?'])
        .map_or(cut, |i| i + 1);
    (head[..end].trim_end().to_string(), true)
}
