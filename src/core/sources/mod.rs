//! Lyrics sources and the manager that falls back between them
//!
//! Every source scrapes one website. None of them is reliable on its own, so
//! [`SourceManager`] tries them in priority order and returns the first
//! lyrics it gets.

pub mod azlyrics;
pub mod extract;
pub mod genius;
pub mod letras;
pub mod musixmatch;
pub mod youtube;

use async_trait::async_trait;
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

use crate::core::orchestrator::{Orchestrator, Payload, Provider, ProviderDescriptor, SharedProvider};
use crate::core::text::Heuristics;
use crate::core::transport::{HttpRequest, HttpTransport, RetryPolicy, DEFAULT_TIMEOUT};
use crate::error::{OrchestrationError, ProviderError};

pub use azlyrics::AzLyrics;
pub use genius::Genius;
pub use letras::Letras;
pub use musixmatch::Musixmatch;
pub use youtube::YouTube;

pub const NOT_FOUND_MESSAGE: &str = "Could not find lyrics from any source";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SongQuery {
    pub artist: String,
    pub song: String,
}

impl SongQuery {
    pub fn new(artist: impl Into<String>, song: impl Into<String>) -> Self {
        Self {
            artist: artist.into(),
            song: song.into(),
        }
    }
}

/// What a source hands back when it found something.
#[derive(Debug, Clone, PartialEq)]
pub struct FoundLyrics {
    pub title: Option<String>,
    pub artist: Option<String>,
    pub lyrics: String,
}

impl Payload for FoundLyrics {
    fn is_empty_payload(&self) -> bool {
        self.lyrics.trim().is_empty()
    }
}

/// Outcome of a lyrics lookup. A successful result always carries non-empty
/// lyrics and no error; a failed one carries no lyrics.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LyricsResult {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub artist: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lyrics: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl LyricsResult {
    /// Falls back to a failed result when `found` has no lyrics.
    pub fn found(source: &str, found: FoundLyrics) -> Self {
        if found.is_empty_payload() {
            return Self::failed("Lyrics not found");
        }

        Self {
            success: true,
            title: found.title,
            artist: found.artist,
            lyrics: Some(found.lyrics),
            source: Some(source.to_string()),
            error: None,
        }
    }

    pub fn failed(error: impl Into<String>) -> Self {
        Self {
            success: false,
            title: None,
            artist: None,
            lyrics: None,
            source: None,
            error: Some(error.into()),
        }
    }

    pub fn from_attempt(source: &str, attempt: Result<FoundLyrics, ProviderError>) -> Self {
        match attempt {
            Ok(found) => Self::found(source, found),
            Err(e) => Self::failed(e.to_string()),
        }
    }
}

/// Request settings shared by all sources.
#[derive(Debug, Clone)]
pub struct SourceSettings {
    pub timeout: Duration,
    pub retry: RetryPolicy,
    pub heuristics: Heuristics,
    /// Minimum normalized length of lyrics taken from a video page
    pub youtube_min_chars: usize,
    pub youtube_max_videos: usize,
}

impl Default for SourceSettings {
    fn default() -> Self {
        Self {
            timeout: DEFAULT_TIMEOUT,
            retry: RetryPolicy::default(),
            heuristics: Heuristics::default(),
            youtube_min_chars: youtube::DEFAULT_MIN_CHARS,
            youtube_max_videos: youtube::DEFAULT_MAX_VIDEOS,
        }
    }
}

/// Single-source lookup that never fails: any error ends up in the result.
#[async_trait]
pub trait LyricsSource {
    async fn fetch(&self, artist: &str, song: &str) -> LyricsResult;
}

#[async_trait]
impl<T> LyricsSource for T
where
    T: Provider<Request = SongQuery, Output = FoundLyrics> + ?Sized,
{
    async fn fetch(&self, artist: &str, song: &str) -> LyricsResult {
        let query = SongQuery::new(artist, song);
        LyricsResult::from_attempt(self.name(), self.attempt(&query).await)
    }
}

pub type DynSource = dyn Provider<Request = SongQuery, Output = FoundLyrics>;
pub type SharedSource = SharedProvider<SongQuery, FoundLyrics>;

/// GET a page and return its body, treating any non-2xx status as failure.
pub(crate) async fn fetch_page(
    transport: &dyn HttpTransport,
    request: HttpRequest,
) -> Result<String, ProviderError> {
    let url = request.url.clone();
    let response = transport.send(request).await?;

    if !response.is_success() {
        debug!("{} returned HTTP {}", url, response.status);
        return Err(ProviderError::Http { status: response.status });
    }

    Ok(response.text())
}

pub struct SourceManager {
    orchestrator: Orchestrator<DynSource>,
}

impl SourceManager {
    /// All five built-in sources, in their default priority order.
    pub fn new(transport: Arc<dyn HttpTransport>, settings: &SourceSettings) -> Self {
        let sources: Vec<SharedSource> = vec![
            Arc::new(Genius::new(transport.clone(), settings)),
            Arc::new(AzLyrics::new(transport.clone(), settings)),
            Arc::new(Musixmatch::new(transport.clone(), settings)),
            Arc::new(Letras::new(transport.clone(), settings)),
            Arc::new(YouTube::new(transport, settings)),
        ];
        Self::with_sources(sources)
    }

    pub fn with_sources(sources: Vec<SharedSource>) -> Self {
        Self {
            orchestrator: Orchestrator::new(sources),
        }
    }

    /// Try every source in priority order.
    pub async fn fetch_lyrics(&self, artist: &str, song: &str) -> LyricsResult {
        info!("Searching lyrics for {} - {}", artist, song);
        let query = SongQuery::new(artist, song);

        match self.orchestrator.run(&query).await {
            Ok(selected) => LyricsResult::found(&selected.provider, selected.output),
            Err(e) => {
                warn!("No lyrics for {} - {}: {}", artist, song, e);
                LyricsResult::failed(NOT_FOUND_MESSAGE)
            }
        }
    }

    /// Ask exactly one source, matched by name without regard to case.
    pub async fn fetch_from_source(&self, artist: &str, song: &str, source: &str) -> LyricsResult {
        let query = SongQuery::new(artist, song);

        match self.orchestrator.dispatch(source, &query).await {
            Ok(selected) => LyricsResult::found(&selected.provider, selected.output),
            Err(OrchestrationError::UnknownProvider(name)) => {
                LyricsResult::failed(format!("Unknown source: {}", name))
            }
            Err(OrchestrationError::Failed { source, .. }) => LyricsResult::failed(source.to_string()),
            Err(e) => LyricsResult::failed(e.to_string()),
        }
    }

    pub fn sources(&self) -> Vec<String> {
        self.orchestrator.names()
    }

    pub fn descriptors(&self) -> Vec<ProviderDescriptor> {
        self.orchestrator.descriptors()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::transport::testing::MockTransport;

    struct Scripted {
        name: &'static str,
        priority: u32,
        lyrics: Option<&'static str>,
    }

    #[async_trait]
    impl Provider for Scripted {
        type Request = SongQuery;
        type Output = FoundLyrics;

        fn name(&self) -> &str {
            self.name
        }

        fn priority(&self) -> u32 {
            self.priority
        }

        async fn attempt(&self, query: &SongQuery) -> Result<FoundLyrics, ProviderError> {
            match self.lyrics {
                Some(lyrics) => Ok(FoundLyrics {
                    title: Some(query.song.clone()),
                    artist: Some(query.artist.clone()),
                    lyrics: lyrics.to_string(),
                }),
                None => Err(ProviderError::ExtractionMiss("nothing here".to_string())),
            }
        }
    }

    fn scripted(name: &'static str, priority: u32, lyrics: Option<&'static str>) -> SharedSource {
        Arc::new(Scripted { name, priority, lyrics })
    }

    #[test]
    fn test_lyrics_result_invariants() {
        let ok = LyricsResult::found(
            "Genius",
            FoundLyrics { title: None, artist: None, lyrics: "words".to_string() },
        );
        assert!(ok.success);
        assert!(ok.error.is_none());
        assert_eq!(ok.lyrics.as_deref(), Some("words"));

        let empty = LyricsResult::found(
            "Genius",
            FoundLyrics { title: None, artist: None, lyrics: "  ".to_string() },
        );
        assert!(!empty.success);
        assert!(empty.lyrics.is_none());

        let failed = LyricsResult::failed("boom");
        assert!(!failed.success);
        assert!(failed.lyrics.is_none());
    }

    #[test]
    fn test_lyrics_result_json_skips_missing_fields() {
        let json = serde_json::to_string(&LyricsResult::failed("Unknown source: X")).unwrap();
        assert_eq!(json, r#"{"success":false,"error":"Unknown source: X"}"#);
    }

    #[tokio::test]
    async fn test_fetch_lyrics_falls_back_to_next_source() {
        let manager = SourceManager::with_sources(vec![
            scripted("Second", 2, Some("second lyrics")),
            scripted("First", 1, None),
        ]);

        let result = manager.fetch_lyrics("Artist", "Song").await;
        assert!(result.success);
        assert_eq!(result.source.as_deref(), Some("Second"));
        assert_eq!(result.lyrics.as_deref(), Some("second lyrics"));
    }

    #[tokio::test]
    async fn test_fetch_lyrics_reports_exhaustion() {
        let manager = SourceManager::with_sources(vec![scripted("Only", 1, None)]);

        let result = manager.fetch_lyrics("Artist", "Song").await;
        assert!(!result.success);
        assert_eq!(result.error.as_deref(), Some(NOT_FOUND_MESSAGE));
    }

    #[tokio::test]
    async fn test_fetch_from_unknown_source() {
        let manager = SourceManager::with_sources(vec![scripted("Genius", 1, Some("x"))]);

        let result = manager.fetch_from_source("a", "b", "Bandcamp").await;
        assert!(!result.success);
        assert_eq!(result.error.as_deref(), Some("Unknown source: Bandcamp"));
    }

    #[tokio::test]
    async fn test_fetch_from_source_ignores_case() {
        let manager = SourceManager::with_sources(vec![
            scripted("Genius", 1, Some("from genius")),
            scripted("AZLyrics", 2, Some("from azlyrics")),
        ]);

        let result = manager.fetch_from_source("a", "b", "azLYRICS").await;
        assert_eq!(result.source.as_deref(), Some("AZLyrics"));
        assert_eq!(result.lyrics.as_deref(), Some("from azlyrics"));
    }

    #[test]
    fn test_default_source_order() {
        let transport = Arc::new(MockTransport::new());
        let manager = SourceManager::new(transport, &SourceSettings::default());
        assert_eq!(
            manager.sources(),
            vec!["Genius", "AZLyrics", "Musixmatch", "Letras", "YouTube"]
        );
    }

    #[tokio::test]
    async fn test_every_source_failing_over_http() {
        let transport = Arc::new(MockTransport::new());
        let manager = SourceManager::new(transport.clone(), &SourceSettings::default());

        let result = manager.fetch_lyrics("Nobody", "Nothing").await;
        assert!(!result.success);
        assert_eq!(result.error.as_deref(), Some(NOT_FOUND_MESSAGE));
        assert!(!transport.requests().is_empty());
    }

    #[tokio::test]
    async fn test_single_source_fetch_never_raises() {
        let transport = Arc::new(MockTransport::new());
        let source = AzLyrics::new(transport, &SourceSettings::default());

        let result = source.fetch("Beyond Awareness", "Crime").await;
        assert!(!result.success);
        assert!(result.error.is_some());
    }
}
