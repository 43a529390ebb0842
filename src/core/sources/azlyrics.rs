use async_trait::async_trait;
use regex::Regex;
use std::sync::{Arc, OnceLock};
use std::time::Duration;

use super::extract::compact_slug;
use super::{fetch_page, FoundLyrics, SongQuery, SourceSettings};
use crate::core::orchestrator::Provider;
use crate::core::text::normalize;
use crate::core::transport::{HttpRequest, HttpTransport};
use crate::error::ProviderError;

/// AZLyrics keeps the lyrics between a licensing comment and the next comment.
pub struct AzLyrics {
    transport: Arc<dyn HttpTransport>,
    timeout: Duration,
}

impl AzLyrics {
    pub fn new(transport: Arc<dyn HttpTransport>, settings: &SourceSettings) -> Self {
        Self {
            transport,
            timeout: settings.timeout,
        }
    }

    pub fn page_url(artist: &str, song: &str) -> String {
        format!(
            "https://www.azlyrics.com/lyrics/{}/{}.html",
            compact_slug(artist),
            compact_slug(song)
        )
    }
}

fn lyrics_block_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?s)<!-- Usage of azlyrics\.com content.*?-->(.*?)<!--").expect("static regex is valid")
    })
}

fn extract_lyrics(page: &str) -> Option<String> {
    let block = lyrics_block_re().captures(page)?.get(1)?.as_str();
    Some(normalize(block)).filter(|lyrics| !lyrics.is_empty())
}

#[async_trait]
impl Provider for AzLyrics {
    type Request = SongQuery;
    type Output = FoundLyrics;

    fn name(&self) -> &str {
        "AZLyrics"
    }

    fn priority(&self) -> u32 {
        2
    }

    async fn attempt(&self, query: &SongQuery) -> Result<FoundLyrics, ProviderError> {
        let url = Self::page_url(&query.artist, &query.song);
        let page = fetch_page(self.transport.as_ref(), HttpRequest::get(url).timeout(self.timeout)).await?;

        let lyrics = extract_lyrics(&page)
            .ok_or_else(|| ProviderError::ExtractionMiss("lyrics block not found".to_string()))?;

        Ok(FoundLyrics {
            title: Some(query.song.clone()),
            artist: Some(query.artist.clone()),
            lyrics,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::sources::{LyricsResult, LyricsSource, SourceManager};
    use crate::core::transport::testing::MockTransport;

    const CRIME_PAGE: &str = r#"<html><body><div class="col-xs-12 col-lg-8 text-center">
<div class="ringtone"></div>
<b>"Crime"</b><br>
<div>
<!-- Usage of azlyrics.com content by any third-party lyrics provider is prohibited by our licensing agreement. Sorry about that. -->
Walking down the avenue<br>
Shadows follow &amp; they know<br>
<br>
<i>[Chorus:]</i><br>
Crime, crime
</div>
<!-- MxM banner -->
</div></body></html>"#;

    #[test]
    fn test_page_url() {
        assert_eq!(
            AzLyrics::page_url("Beyond Awareness", "Crime"),
            "https://www.azlyrics.com/lyrics/beyondawareness/crime.html"
        );
    }

    #[test]
    fn test_extract_lyrics_between_comments() {
        assert_eq!(
            extract_lyrics(CRIME_PAGE).as_deref(),
            Some("Walking down the avenue\nShadows follow & they know\n\n[Chorus:]\nCrime, crime")
        );
        assert_eq!(extract_lyrics("<html><!-- other --></html>"), None);
    }

    #[tokio::test]
    async fn test_fetch_end_to_end() {
        let transport = Arc::new(MockTransport::new().route(
            "https://www.azlyrics.com/lyrics/beyondawareness/crime.html",
            200,
            CRIME_PAGE,
        ));
        let source = AzLyrics::new(transport, &SourceSettings::default());

        let result: LyricsResult = source.fetch("Beyond Awareness", "Crime").await;
        assert!(result.success);
        assert_eq!(result.source.as_deref(), Some("AZLyrics"));
        assert_eq!(result.title.as_deref(), Some("Crime"));
        assert_eq!(result.artist.as_deref(), Some("Beyond Awareness"));
        assert!(result.lyrics.unwrap().starts_with("Walking down the avenue\n"));
    }

    #[tokio::test]
    async fn test_manager_reaches_azlyrics_after_genius_fails() {
        let transport = Arc::new(
            MockTransport::new()
                .route("https://genius.com/api/search/multi", 200, r#"{"response": {"sections": []}}"#)
                .route("https://www.azlyrics.com/lyrics/beyondawareness/crime.html", 200, CRIME_PAGE),
        );
        let manager = SourceManager::new(transport.clone(), &SourceSettings::default());

        let result = manager.fetch_lyrics("Beyond Awareness", "Crime").await;
        assert!(result.success);
        assert_eq!(result.source.as_deref(), Some("AZLyrics"));
        assert!(!transport.requests().iter().any(|r| r.url.contains("musixmatch")));
    }
}
