use async_trait::async_trait;
use regex::Regex;
use scraper::Html;
use std::sync::{Arc, OnceLock};
use std::time::Duration;

use super::extract::{attr_contains_ignore_case, first_non_empty, hyphen_slug, selector, Strategy};
use super::{fetch_page, FoundLyrics, SongQuery, SourceSettings};
use crate::core::orchestrator::Provider;
use crate::core::text::{looks_like_lyrics_with, normalize, Heuristics};
use crate::core::transport::{HttpRequest, HttpTransport};
use crate::error::ProviderError;

const CREDIT_PREFIXES: &[&str] = &[
    "written by:",
    "subtitled by",
    "revised by",
    "did you see an error",
    "isn't this right",
];

/// Letras.com wraps lyrics in page chrome (view counters, translation tabs,
/// credits) that has to be cut away after extraction.
pub struct Letras {
    transport: Arc<dyn HttpTransport>,
    timeout: Duration,
    heuristics: Heuristics,
}

impl Letras {
    pub fn new(transport: Arc<dyn HttpTransport>, settings: &SourceSettings) -> Self {
        Self {
            transport,
            timeout: settings.timeout,
            heuristics: settings.heuristics,
        }
    }

    pub fn page_url(artist: &str, song: &str) -> String {
        format!("https://www.letras.com/{}/{}/", hyphen_slug(artist), hyphen_slug(song))
    }
}

#[async_trait]
impl Provider for Letras {
    type Request = SongQuery;
    type Output = FoundLyrics;

    fn name(&self) -> &str {
        "Letras"
    }

    fn priority(&self) -> u32 {
        4
    }

    async fn attempt(&self, query: &SongQuery) -> Result<FoundLyrics, ProviderError> {
        let url = Self::page_url(&query.artist, &query.song);
        let page = fetch_page(self.transport.as_ref(), HttpRequest::get(url).timeout(self.timeout)).await?;

        let block = extract_block(&page, &self.heuristics)
            .ok_or_else(|| ProviderError::ExtractionMiss("no lyrics container".to_string()))?;

        let lyrics = clean_lyrics(&block, query)?;
        if lyrics.is_empty() {
            return Err(ProviderError::ValidationReject("nothing left after cleanup".to_string()));
        }

        Ok(FoundLyrics {
            title: Some(query.song.clone()),
            artist: Some(query.artist.clone()),
            lyrics,
        })
    }
}

/// Raw HTML of the lyrics container: a `div` whose class (then id) mentions
/// lyrics and passes the UI-noise check, else the first `article`.
fn extract_block(page: &str, heuristics: &Heuristics) -> Option<String> {
    let document = Html::parse_document(page);

    let div_by = |attr: &'static str| {
        document
            .select(&selector("div"))
            .find(|div| attr_contains_ignore_case(div, attr, "lyrics"))
            .map(|div| div.inner_html())
            .filter(|inner| looks_like_lyrics_with(inner, heuristics))
    };
    let by_class = |_: &str| div_by("class");
    let by_id = |_: &str| div_by("id");
    let by_article = |_: &str| {
        document
            .select(&selector("article"))
            .next()
            .map(|article| article.inner_html())
    };

    let strategies: [Strategy<'_>; 3] = [
        ("div class", &by_class),
        ("div id", &by_id),
        ("article", &by_article),
    ];

    first_non_empty(page, &strategies)
}

fn open_paren_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"[ \t]*\([ \t]*").expect("static regex is valid"))
}

fn close_paren_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"[ \t]*\)[ \t]*").expect("static regex is valid"))
}

fn marker_after_text_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(\S)(\[[^\[\]\n]+\])").expect("static regex is valid"))
}

fn text_after_marker_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(\[[^\[\]\n]+\])[ \t]*([^\s\[])").expect("static regex is valid"))
}

/// Leading words the page glues in front of the first lyric lines. Each
/// word must be followed by whitespace or the end of the line.
fn metadata_re(query: &SongQuery) -> Result<Regex, ProviderError> {
    let mut words = Vec::new();
    for name in [&query.artist, &query.song] {
        let name = name.trim();
        if !name.is_empty() {
            words.push(regex::escape(name));
        }
    }
    words.extend(["lyrics", "meaning", "translations"].map(String::from));

    Regex::new(&format!(
        r"(?i)^(?:lyrics views[\d\s.]*|(?:{})(?:\s+|$))*",
        words.join("|")
    ))
    .map_err(|e| ProviderError::Parse(e.to_string()))
}

fn is_credit_line(line: &str) -> bool {
    let lower = line.trim().to_lowercase();
    CREDIT_PREFIXES.iter().any(|prefix| lower.starts_with(prefix))
}

fn clean_lyrics(raw: &str, query: &SongQuery) -> Result<String, ProviderError> {
    let text = normalize(raw);
    let metadata = metadata_re(query)?;

    // Metadata only sits before the first lyric line: lines made of it
    // are dropped, and stripping stops at the first line it changes or
    // leaves alone.
    let mut in_header = true;
    let mut lines: Vec<String> = Vec::new();
    for line in text.lines() {
        if !in_header {
            lines.push(line.to_string());
            continue;
        }

        let stripped = metadata.replace(line, "").trim().to_string();
        if stripped.is_empty() && !line.trim().is_empty() {
            continue;
        }
        in_header = false;
        lines.push(stripped);
    }
    lines.retain(|line| !is_credit_line(line));

    let joined = lines.join("\n");
    let text = open_paren_re().replace_all(&joined, "\n(");
    let text = close_paren_re().replace_all(&text, ")\n");
    let text = marker_after_text_re().replace_all(&text, "${1}\n${2}");
    let text = text_after_marker_re().replace_all(&text, "${1}\n${2}");

    Ok(normalize(&text))
}
