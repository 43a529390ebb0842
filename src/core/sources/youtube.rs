use async_trait::async_trait;
use regex::Regex;
use scraper::Html;
use std::sync::{Arc, OnceLock};
use std::time::Duration;
use tracing::debug;
use url::Url;

use super::extract::{first_attr, first_non_empty, Strategy};
use super::{fetch_page, FoundLyrics, SongQuery, SourceSettings};
use crate::core::orchestrator::Provider;
use crate::core::text::normalize;
use crate::core::transport::{HttpRequest, HttpTransport};
use crate::error::ProviderError;

const SEARCH_URL: &str = "https://www.youtube.com/results";
const ACCEPT_LANGUAGE: &str = "en-US,en;q=0.9";

pub const DEFAULT_MIN_CHARS: usize = 100;
pub const DEFAULT_MAX_VIDEOS: usize = 3;

/// Last resort: lyrics pasted into video descriptions.
pub struct YouTube {
    transport: Arc<dyn HttpTransport>,
    timeout: Duration,
    min_chars: usize,
    max_videos: usize,
}

impl YouTube {
    pub fn new(transport: Arc<dyn HttpTransport>, settings: &SourceSettings) -> Self {
        Self {
            transport,
            timeout: settings.timeout,
            min_chars: settings.youtube_min_chars,
            max_videos: settings.youtube_max_videos,
        }
    }

    fn request(&self, url: &str) -> HttpRequest {
        HttpRequest::get(url)
            .header("Accept-Language", ACCEPT_LANGUAGE)
            .timeout(self.timeout)
    }

    async fn search(&self, query: &SongQuery) -> Result<Vec<String>, ProviderError> {
        let terms = format!("{} {} lyrics", query.artist, query.song);
        let url = Url::parse_with_params(SEARCH_URL, &[("search_query", terms.as_str())])
            .map_err(|e| ProviderError::Parse(e.to_string()))?;

        let page = fetch_page(self.transport.as_ref(), self.request(url.as_str())).await?;
        let ids = video_ids(&page, self.max_videos);
        if ids.is_empty() {
            return Err(ProviderError::ExtractionMiss("no videos found".to_string()));
        }

        Ok(ids)
    }
}

#[async_trait]
impl Provider for YouTube {
    type Request = SongQuery;
    type Output = FoundLyrics;

    fn name(&self) -> &str {
        "YouTube"
    }

    fn priority(&self) -> u32 {
        5
    }

    async fn attempt(&self, query: &SongQuery) -> Result<FoundLyrics, ProviderError> {
        for id in self.search(query).await? {
            let url = format!("https://www.youtube.com/watch?v={}", id);

            let page = match fetch_page(self.transport.as_ref(), self.request(&url)).await {
                Ok(page) => page,
                Err(e) => {
                    debug!("Skipping video {}: {}", id, e);
                    continue;
                }
            };

            if let Some(lyrics) = lyrics_from_watch_page(&page, self.min_chars) {
                return Ok(FoundLyrics {
                    title: Some(format!("{} (YouTube)", id)),
                    artist: None,
                    lyrics,
                });
            }
        }

        Err(ProviderError::ExtractionMiss("no lyrics in video descriptions".to_string()))
    }
}

fn video_id_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"/watch\?v=([a-zA-Z0-9_-]{11})").expect("static regex is valid"))
}

fn lyrics_marker_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?is)(?:Lyrics|歌词)[:\s]*\n?(.*?)(?:\n\n|\z|Subscribe|Follow|Instagram|Twitter)")
            .expect("static regex is valid")
    })
}

/// Distinct video ids in page order, at most `limit` of them.
fn video_ids(page: &str, limit: usize) -> Vec<String> {
    let mut ids: Vec<String> = Vec::new();
    for caps in video_id_re().captures_iter(page) {
        if ids.len() >= limit {
            break;
        }
        let id = &caps[1];
        if !ids.iter().any(|seen| seen == id) {
            ids.push(id.to_string());
        }
    }
    ids
}

fn lyrics_from_watch_page(page: &str, min_chars: usize) -> Option<String> {
    let document = Html::parse_document(page);

    let long_enough = |text: String| (text.chars().count() > min_chars).then_some(text);

    let marked = |doc: &str| {
        let region = lyrics_marker_re().captures(doc)?.get(1)?.as_str();
        long_enough(normalize(region))
    };
    let description = |_: &str| {
        let content = first_attr(&document, "meta[name=\"description\"]", "content")?;
        if !content.contains('[') || content.chars().count() <= 200 {
            return None;
        }
        long_enough(normalize(&content))
    };

    let strategies: [Strategy<'_>; 2] = [("lyrics marker", &marked), ("meta description", &description)];
    first_non_empty(page, &strategies)
}
