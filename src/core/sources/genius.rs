use async_trait::async_trait;
use scraper::Html;
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;
use url::Url;

use super::extract::{first_attr, first_non_empty, joined_inner_html, selector, Strategy};
use super::{fetch_page, FoundLyrics, SongQuery, SourceSettings};
use crate::core::orchestrator::Provider;
use crate::core::text::normalize;
use crate::core::transport::{send_with_backoff, HttpRequest, HttpTransport, RetryPolicy};
use crate::error::ProviderError;

const SEARCH_URL: &str = "https://genius.com/api/search/multi";

/// Genius: JSON search API, then scraping of the song page.
pub struct Genius {
    transport: Arc<dyn HttpTransport>,
    timeout: Duration,
    retry: RetryPolicy,
}

impl Genius {
    pub fn new(transport: Arc<dyn HttpTransport>, settings: &SourceSettings) -> Self {
        Self {
            transport,
            timeout: settings.timeout,
            retry: settings.retry,
        }
    }

    async fn search(&self, query: &SongQuery) -> Result<String, ProviderError> {
        let terms = format!("{} {}", query.artist, query.song);
        let url = Url::parse_with_params(SEARCH_URL, &[("q", terms.as_str())])
            .map_err(|e| ProviderError::Parse(e.to_string()))?;

        let request = HttpRequest::get(url.as_str())
            .header("Accept", "application/json")
            .header("Accept-Language", "en-US,en;q=0.9")
            .timeout(self.timeout);

        let response = send_with_backoff(self.transport.as_ref(), request, self.retry).await?;
        if !response.is_success() {
            return Err(ProviderError::Http { status: response.status });
        }

        let data: Value = serde_json::from_slice(&response.body)?;
        find_song_url(&data).ok_or_else(|| ProviderError::ExtractionMiss("song not found".to_string()))
    }
}

#[async_trait]
impl Provider for Genius {
    type Request = SongQuery;
    type Output = FoundLyrics;

    fn name(&self) -> &str {
        "Genius"
    }

    fn priority(&self) -> u32 {
        1
    }

    async fn attempt(&self, query: &SongQuery) -> Result<FoundLyrics, ProviderError> {
        let song_url = self.search(query).await?;
        debug!("Genius song page: {}", song_url);

        let page = fetch_page(self.transport.as_ref(), HttpRequest::get(&song_url).timeout(self.timeout)).await?;

        parse_song_page(&page).ok_or_else(|| ProviderError::ExtractionMiss("failed to extract lyrics".to_string()))
    }
}

/// Within each section, a `song` section answers with its first hit;
/// otherwise any hit pointing at genius.com is taken.
fn find_song_url(data: &Value) -> Option<String> {
    let sections = data["response"]["sections"].as_array()?;

    for section in sections {
        let hits = section["hits"].as_array().map(Vec::as_slice).unwrap_or_default();

        if section["type"] == "song" {
            if let Some(url) = hits.first().and_then(|hit| hit["result"]["url"].as_str()) {
                return Some(url.to_string());
            }
        }

        if let Some(url) = hits
            .iter()
            .filter_map(|hit| hit["result"]["url"].as_str())
            .find(|url| url.contains("genius.com"))
        {
            return Some(url.to_string());
        }
    }

    None
}

fn parse_song_page(page: &str) -> Option<FoundLyrics> {
    let document = Html::parse_document(page);

    let from_json_ld = |_: &str| lyrics_from_json_ld(&document);
    let from_containers = |_: &str| {
        joined_inner_html(&document, "div[data-lyrics-container=\"true\"]", "\n\n")
    };
    let from_legacy_class = |_: &str| {
        joined_inner_html(&document, "div[class*=\"Lyrics__Container\"]", "\n\n")
    };

    let strategies: [Strategy<'_>; 3] = [
        ("json-ld", &from_json_ld),
        ("data-lyrics-container", &from_containers),
        ("Lyrics__Container", &from_legacy_class),
    ];

    let lyrics = first_non_empty(page, &strategies)?;

    Some(FoundLyrics {
        title: first_attr(&document, "meta[property=\"og:title\"]", "content"),
        artist: None,
        lyrics,
    })
}

fn lyrics_from_json_ld(document: &Html) -> Option<String> {
    document
        .select(&selector("script[type=\"application/ld+json\"]"))
        .filter_map(|script| serde_json::from_str::<Value>(&script.inner_html()).ok())
        .filter_map(|data| data["recordingOf"]["lyrics"]["text"].as_str().map(normalize))
        .find(|text| !text.is_empty())
}
