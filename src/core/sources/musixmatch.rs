use async_trait::async_trait;
use scraper::Html;
use std::sync::Arc;
use std::time::Duration;

use super::extract::{hyphen_slug, joined_inner_html};
use super::{fetch_page, FoundLyrics, SongQuery, SourceSettings};
use crate::core::orchestrator::Provider;
use crate::core::transport::{HttpRequest, HttpTransport};
use crate::error::ProviderError;

pub struct Musixmatch {
    transport: Arc<dyn HttpTransport>,
    timeout: Duration,
}

impl Musixmatch {
    pub fn new(transport: Arc<dyn HttpTransport>, settings: &SourceSettings) -> Self {
        Self {
            transport,
            timeout: settings.timeout,
        }
    }

    pub fn page_url(artist: &str, song: &str) -> String {
        format!(
            "https://www.musixmatch.com/lyrics/{}/{}",
            hyphen_slug(artist),
            hyphen_slug(song)
        )
    }
}

/// Lyrics are split over several `span` elements with a lyrics class.
fn extract_lyrics(page: &str) -> Option<String> {
    let document = Html::parse_document(page);
    joined_inner_html(&document, "span[class*=\"lyrics\"]", "\n")
}

#[async_trait]
impl Provider for Musixmatch {
    type Request = SongQuery;
    type Output = FoundLyrics;

    fn name(&self) -> &str {
        "Musixmatch"
    }

    fn priority(&self) -> u32 {
        3
    }

    async fn attempt(&self, query: &SongQuery) -> Result<FoundLyrics, ProviderError> {
        let url = Self::page_url(&query.artist, &query.song);
        let page = fetch_page(self.transport.as_ref(), HttpRequest::get(url).timeout(self.timeout)).await?;

        let lyrics = extract_lyrics(&page)
            .ok_or_else(|| ProviderError::ExtractionMiss("no lyrics spans".to_string()))?;

        Ok(FoundLyrics {
            title: Some(query.song.clone()),
            artist: Some(query.artist.clone()),
            lyrics,
        })
    }
}
