//! Lyrics text normalization
//!
//! Turns raw HTML fragments scraped from lyrics pages into clean,
//! line-oriented text while keeping song structure: line breaks stay line
//! breaks, paragraph boundaries become a single blank line and section
//! markers such as `[Chorus]` survive untouched.

use patterns::*;
use serde::{Deserialize, Serialize};

/// Phrases that show up when a lyrics container also swallowed page chrome.
pub const UI_INDICATORS: &[&str] = &[
    "Add to favorites",
    "Add to Playlist",
    "Font size",
    "Tab",
    "Print",
    "Correct",
    "Auto-scroll",
    "Notes",
    "Restore",
    "Apply",
    "Send us",
    "revision",
];

pub const DEFAULT_MIN_LYRICS_CHARS: usize = 50;
pub const DEFAULT_MAX_UI_INDICATORS: usize = 3;

/// Thresholds for [`looks_like_lyrics_with`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Heuristics {
    /// Visible text shorter than this is never lyrics
    pub min_chars: usize,
    /// Most UI phrases a lyrics block may contain
    pub max_ui_indicators: usize,
}

impl Default for Heuristics {
    fn default() -> Self {
        Self {
            min_chars: DEFAULT_MIN_LYRICS_CHARS,
            max_ui_indicators: DEFAULT_MAX_UI_INDICATORS,
        }
    }
}

/// How a single lyrics line takes part in translation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineKind {
    Blank,
    SectionMarker,
    Content,
}

mod patterns {
    use regex::Regex;
    use std::sync::OnceLock;

    macro_rules! cached_regex {
        ($name:ident, $pattern:expr) => {
            pub fn $name() -> &'static Regex {
                static RE: OnceLock<Regex> = OnceLock::new();
                RE.get_or_init(|| Regex::new($pattern).expect("static regex is valid"))
            }
        };
    }

    cached_regex!(line_break_re, r"(?i)[ \t]*<br\s*/?>[ \t]*(?:\r\n|\r|\n)?");
    cached_regex!(
        block_boundary_re,
        r"(?i)\s*</?(?:p|div|section|article|blockquote|h[1-6]|li|ul|ol|table|tr)(?:\s[^>]*)?/?>\s*"
    );
    cached_regex!(tag_re, r"<[^>]+>");
    cached_regex!(section_marker_re, r"^\[[^\[\]]+\]$");
}

/// Normalize a raw HTML fragment (or plain text) into clean lyrics text.
///
/// The single cleaning pass is repeated until the text stops changing, which
/// makes `normalize(normalize(x)) == normalize(x)` hold even for inputs whose
/// entities decode into more markup. Every pass either shrinks the text or
/// only rewrites a lone `\r`, so the loop terminates.
pub fn normalize(raw: &str) -> String {
    let mut current = normalize_pass(raw);
    loop {
        let next = normalize_pass(&current);
        if next == current {
            return current;
        }
        current = next;
    }
}

fn normalize_pass(raw: &str) -> String {
    if raw.is_empty() {
        return String::new();
    }

    let decoded = html_escape::decode_html_entities(raw);
    let with_breaks = line_break_re().replace_all(&decoded, "\n");
    let with_paragraphs = block_boundary_re().replace_all(&with_breaks, "\n\n");
    let stripped = tag_re().replace_all(&with_paragraphs, "");
    let unified = stripped.replace("\r\n", "\n").replace('\r', "\n");

    tidy_lines(unified.split('\n'))
}

/// Trim every line, keep at most one blank line in a row and drop blank
/// lines at either end.
pub(crate) fn tidy_lines<'a, I>(lines: I) -> String
where
    I: IntoIterator<Item = &'a str>,
{
    let mut out: Vec<&str> = Vec::new();
    let mut previous_blank = true;

    for line in lines {
        let line = line.trim();
        if line.is_empty() {
            if !previous_blank {
                out.push("");
            }
            previous_blank = true;
        } else {
            out.push(line);
            previous_blank = false;
        }
    }

    while out.last().is_some_and(|l| l.is_empty()) {
        out.pop();
    }

    out.join("\n")
}

/// Strip tags and decode entities without any structural handling.
pub fn visible_text(raw: &str) -> String {
    let stripped = tag_re().replace_all(raw, "");
    html_escape::decode_html_entities(&stripped).into_owned()
}

/// UI-noise rejection with the default thresholds.
pub fn looks_like_lyrics(text: &str) -> bool {
    looks_like_lyrics_with(text, &Heuristics::default())
}

/// True when `text` is long enough and carries at most
/// `heuristics.max_ui_indicators` of the known UI phrases.
pub fn looks_like_lyrics_with(text: &str, heuristics: &Heuristics) -> bool {
    let visible = visible_text(text);
    if visible.chars().count() < heuristics.min_chars {
        return false;
    }

    let ui_count = UI_INDICATORS
        .iter()
        .filter(|indicator| visible.contains(*indicator))
        .count();

    ui_count <= heuristics.max_ui_indicators
}

/// `[Verse 1]`, `[Chorus]`, surrounding whitespace ignored.
pub fn is_section_marker(line: &str) -> bool {
    section_marker_re().is_match(line.trim())
}

pub fn classify_line(line: &str) -> LineKind {
    if line.trim().is_empty() {
        LineKind::Blank
    } else if is_section_marker(line) {
        LineKind::SectionMarker
    } else {
        LineKind::Content
    }
}
