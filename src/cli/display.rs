// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Terminal display utilities for the glint CLI.
//!
//! OneDark for dark terminals, One Light for light ones. Detection tries
//! `GLINT_THEME` first, then `COLORFGBG`, then defaults to dark. Respects
//! `NO_COLOR` and turns color off entirely when stdout is not a TTY.
//!
//! # Theme detection order
//!
//! 1. `GLINT_THEME` env var ("dark" or "light")
//! 2. `COLORFGBG` env var (terminal background hint)
//! 3. Default to dark theme

use std::sync::OnceLock;

use glint::{MatchKind, StatusKind};

// Box drawing constants - width between │ and │ (excluding border chars)
pub const BOX_WIDTH: usize = 80;

// ═══════════════════════════════════════════════════════════════════════════
// THEME DETECTION
// ═══════════════════════════════════════════════════════════════════════════

/// Terminal color theme
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Theme {
    Dark,
    Light,
}

static THEME: OnceLock<Theme> = OnceLock::new();

fn detect_theme() -> Theme {
    if let Ok(theme) = std::env::var("GLINT_THEME") {
        match theme.to_lowercase().as_str() {
            "light" | "l" => return Theme::Light,
            "dark" | "d" => return Theme::Dark,
            _ => {}
        }
    }

    // "fg;bg": colors 0-6 are dark backgrounds, 7+ light (8 is dark gray)
    if let Ok(colorfgbg) = std::env::var("COLORFGBG") {
        if let Some(bg) = colorfgbg.split(';').next_back() {
            if let Ok(bg_num) = bg.parse::<u8>() {
                if bg_num >= 7 && bg_num != 8 {
                    return Theme::Light;
                }
            }
        }
    }

    Theme::Dark
}

/// Get the current theme (cached)
pub fn theme() -> Theme {
    *THEME.get_or_init(detect_theme)
}

// ═══════════════════════════════════════════════════════════════════════════
// ONEDARK / ONE LIGHT COLOR PALETTES (True Color)
// ═══════════════════════════════════════════════════════════════════════════

fn rgb(r: u8, g: u8, b: u8) -> String {
    format!("\x1b[38;2;{};{};{}m", r, g, b)
}

pub mod colors {
    pub const RESET: &str = "\x1b[0m";
    pub const BOLD: &str = "\x1b[1m";
    pub const DIM: &str = "\x1b[2m";
    /// Reverse video, used for marked text.
    pub const REVERSE: &str = "\x1b[7m";
}

pub use colors::*;

/// What a piece of output means; each theme maps it to one color.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
    /// Exact hits, success.
    Good,
    /// Cross-span hits.
    Joined,
    /// Fuzzy hits.
    Fuzzy,
    /// Word-coincidence hits, warnings, middling scores.
    Caution,
    /// Informational status, headings.
    Info,
    /// Errors.
    Bad,
    /// Borders, low scores.
    Muted,
}

/// OneDark on dark terminals, One Light on light ones.
fn palette(theme: Theme, tone: Tone) -> (u8, u8, u8) {
    match (theme, tone) {
        (Theme::Dark, Tone::Good) => (152, 195, 121),    // #98c379
        (Theme::Dark, Tone::Joined) => (97, 175, 239),   // #61afef
        (Theme::Dark, Tone::Fuzzy) => (198, 120, 221),   // #c678dd
        (Theme::Dark, Tone::Caution) => (229, 192, 123), // #e5c07b
        (Theme::Dark, Tone::Info) => (86, 182, 194),     // #56b6c2
        (Theme::Dark, Tone::Bad) => (224, 108, 117),     // #e06c75
        (Theme::Dark, Tone::Muted) => (92, 99, 112),     // #5c6370
        (Theme::Light, Tone::Good) => (80, 161, 79),     // #50a14f
        (Theme::Light, Tone::Joined) => (64, 120, 242),  // #4078f2
        (Theme::Light, Tone::Fuzzy) => (166, 38, 164),   // #a626a4
        (Theme::Light, Tone::Caution) => (193, 132, 1),  // #c18401
        (Theme::Light, Tone::Info) => (1, 132, 188),     // #0184bc
        (Theme::Light, Tone::Bad) => (228, 86, 73),      // #e45649
        (Theme::Light, Tone::Muted) => (160, 161, 167),  // #a0a1a7
    }
}

/// Escape sequence for `tone` in the current theme.
pub fn paint(tone: Tone) -> String {
    let (r, g, b) = palette(theme(), tone);
    rgb(r, g, b)
}

// ═══════════════════════════════════════════════════════════════════════════
// CORE UTILITIES
// ═══════════════════════════════════════════════════════════════════════════

/// Check if colors should be used (TTY detection)
pub fn use_colors() -> bool {
    if std::env::var("NO_COLOR").is_ok() {
        return false;
    }
    atty::is(atty::Stream::Stdout)
}

/// Apply a tone with optional modifiers
pub fn themed(tone: Tone, modifiers: &[&str], text: &str) -> String {
    if use_colors() {
        format!("{}{}{}{}", modifiers.join(""), paint(tone), text, RESET)
    } else {
        text.to_string()
    }
}

/// Calculate visible length (excluding ANSI codes)
pub fn visible_len(s: &str) -> usize {
    let mut in_escape = false;
    let mut len = 0;
    for c in s.chars() {
        if c == '\x1b' {
            in_escape = true;
        } else if in_escape && c == 'm' {
            in_escape = false;
        } else if !in_escape {
            len += 1;
        }
    }
    len
}

/// Right-pad a styled string to a fixed visible width
pub fn pad_right(s: &str, width: usize) -> String {
    let visible = visible_len(s);
    if visible >= width {
        s.to_string()
    } else {
        format!("{}{}", s, " ".repeat(width - visible))
    }
}

/// Shorten to `max` chars, ending in "…" when cut.
pub fn ellipsize(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        return s.to_string();
    }
    let mut out: String = s.chars().take(max.saturating_sub(1)).collect();
    out.push('…');
    out
}

// ═══════════════════════════════════════════════════════════════════════════
// BOX DRAWING
// ═══════════════════════════════════════════════════════════════════════════

/// Print a content line: │ content          │
pub fn row(content: &str) {
    let border = if use_colors() { paint(Tone::Muted) } else { String::new() };
    let reset = if use_colors() { RESET } else { "" };
    let pad = BOX_WIDTH.saturating_sub(visible_len(content));
    println!("{border}│{reset}{content}{}{border}│{reset}", " ".repeat(pad));
}

/// Print section header: ┌─ LABEL ──────────┐
pub fn section_top(label: &str) {
    let border = if use_colors() { paint(Tone::Muted) } else { String::new() };
    let reset = if use_colors() { RESET } else { "" };
    let label_part = format!("─ {} ", themed(Tone::Info, &[BOLD], label));
    let remaining = BOX_WIDTH.saturating_sub(visible_len(&label_part));
    println!("{border}┌{reset}{label_part}{border}{}┐{reset}", "─".repeat(remaining));
}

/// Print section footer: └──────────────────┘
pub fn section_bot() {
    let border = if use_colors() { paint(Tone::Muted) } else { String::new() };
    let reset = if use_colors() { RESET } else { "" };
    println!("{border}└{}┘{reset}", "─".repeat(BOX_WIDTH));
}

// ═══════════════════════════════════════════════════════════════════════════
// SEMANTIC FORMATTERS
// ═══════════════════════════════════════════════════════════════════════════

/// Color-coded match kind badge
pub fn kind_badge(kind: MatchKind) -> String {
    let label = format!("[{}]", kind.label());
    if !use_colors() {
        return label;
    }
    let tone = match kind {
        MatchKind::Exact => Tone::Good,
        MatchKind::CrossSpan => Tone::Joined,
        MatchKind::Fuzzy => Tone::Fuzzy,
        MatchKind::WordCoincidence => Tone::Caution,
    };
    themed(tone, &[], &label)
}

/// Color-coded confidence in `[0, 1]`
pub fn score_value(score: f64) -> String {
    let tone = if score >= 0.99 {
        Tone::Good
    } else if score >= 0.8 {
        Tone::Caution
    } else {
        Tone::Muted
    };
    themed(tone, &[], &format!("{:>5.2}", score))
}

/// Status line colored by its kind.
pub fn status_line(text: &str, kind: StatusKind) -> String {
    match kind {
        StatusKind::Info => themed(Tone::Info, &[], text),
        StatusKind::Success => themed(Tone::Good, &[BOLD], text),
        StatusKind::Warning => themed(Tone::Caution, &[], text),
        StatusKind::Error => themed(Tone::Bad, &[BOLD], text),
    }
}

/// Marked text, reverse video when colors are on and brackets otherwise.
pub fn marked(text: &str) -> String {
    if use_colors() {
        format!("{}{}{}", REVERSE, text, RESET)
    } else {
        format!("[{}]", text)
    }
}

/// Dimmed helper text.
pub fn dim(text: &str) -> String {
    if use_colors() {
        format!("{}{}{}", DIM, text, RESET)
    } else {
        text.to_string()
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// TESTS
// ═══════════════════════════════════════════════════════════════════════════
