use async_trait::async_trait;
use std::sync::{Arc, Mutex};
use tempfile::TempDir;

use lyrics_dl::config::Config;
use lyrics_dl::core::output::{read_lyrics_file, LyricsWriter};
use lyrics_dl::core::transport::{HttpRequest, HttpResponse, HttpTransport};
use lyrics_dl::core::translation::batch::translate_lyrics;
use lyrics_dl::error::TransportError;
use lyrics_dl::services::SimpleServices;

const CRIME_PAGE: &str = r#"<html><body><div class="col-xs-12 col-lg-8 text-center">
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

/// Serves canned bodies by URL prefix and records every URL asked for.
struct CannedTransport {
    routes: Vec<(&'static str, &'static str)>,
    seen: Mutex<Vec<String>>,
}

impl CannedTransport {
    fn new(routes: Vec<(&'static str, &'static str)>) -> Self {
        Self {
            routes,
            seen: Mutex::new(Vec::new()),
        }
    }

    fn seen(&self) -> Vec<String> {
        self.seen.lock().unwrap().clone()
    }
}

#[async_trait]
impl HttpTransport for CannedTransport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
        self.seen.lock().unwrap().push(request.url.clone());

        let body = self
            .routes
            .iter()
            .find(|(prefix, _)| request.url.starts_with(prefix))
            .map(|(_, body)| *body);

        Ok(match body {
            Some(body) => HttpResponse {
                status: 200,
                body: body.as_bytes().to_vec(),
            },
            None => HttpResponse {
                status: 404,
                body: Vec::new(),
            },
        })
    }
}

fn quiet_config() -> Config {
    let mut config = Config::default();
    config.retry_delay_ms = 0;
    config.translation_delay_ms = 0;
    config
}

#[tokio::test]
async fn test_fetch_falls_back_and_translates() {
    let transport = Arc::new(CannedTransport::new(vec![
        ("https://genius.com/api/search/multi", r#"{"response": {"sections": []}}"#),
        ("https://www.azlyrics.com/lyrics/beyondawareness/crime.html", CRIME_PAGE),
        ("https://translate.googleapis.com/translate_a/single", r#"[[["一\n二\n三",null]]]"#),
    ]));
    let services = SimpleServices::with_transport(quiet_config(), transport.clone());

    let result = services
        .create_source_manager()
        .fetch_lyrics("Beyond Awareness", "Crime")
        .await;
    assert!(result.success);
    assert_eq!(result.source.as_deref(), Some("AZLyrics"));
    let lyrics = result.lyrics.clone().unwrap();
    assert_eq!(
        lyrics,
        "Walking down the avenue\nShadows follow & they know\n\n[Chorus:]\nCrime, crime"
    );

    // Genius was asked first, nothing after AZLyrics answered
    let seen = transport.seen();
    assert!(seen[0].starts_with("https://genius.com/api/search/multi"));
    assert!(seen.iter().all(|url| !url.contains("musixmatch")));

    let translator = services.create_translation_manager();
    assert_eq!(translator.primary_translator().as_deref(), Some("Google Translate"));

    let lines = translate_lyrics(&translator, &lyrics, "auto", "zh").await;
    assert_eq!(
        lines,
        vec![
            "Walking down the avenue",
            "一",
            "Shadows follow & they know",
            "二",
            "",
            "[Chorus:]",
            "",
            "Crime, crime",
            "三",
        ]
    );

    let dir = TempDir::new().unwrap();
    let writer = LyricsWriter::new(dir.path());
    let path = writer
        .save_lyrics("Beyond Awareness", "Crime", result.source.as_deref().unwrap(), &lyrics)
        .unwrap();
    let saved = read_lyrics_file(&path).unwrap();
    assert_eq!(saved.artist, "Beyond Awareness");
    assert_eq!(saved.song, "Crime");
    assert_eq!(saved.source.as_deref(), Some("AZLyrics"));
    assert_eq!(saved.lyrics, lyrics);

    let translated = writer
        .save_translation("Beyond Awareness", "Crime", "zh", &lines.join("\n"))
        .unwrap();
    assert!(translated.ends_with("Beyond Awareness - Crime (translated zh).txt"));
}

#[tokio::test]
async fn test_every_source_failing_reports_not_found() {
    let services = SimpleServices::with_transport(quiet_config(), Arc::new(CannedTransport::new(Vec::new())));

    let result = services
        .create_source_manager()
        .fetch_lyrics("Nobody", "Nothing")
        .await;
    assert!(!result.success);
    assert!(result.lyrics.is_none());
    assert!(result.error.is_some());
}

#[tokio::test]
async fn test_translation_failure_keeps_original_text() {
    let services = SimpleServices::with_transport(quiet_config(), Arc::new(CannedTransport::new(Vec::new())));

    let result = services
        .create_translation_manager()
        .translate("hello world", "en", "zh")
        .await;
    assert!(!result.success);
    assert_eq!(result.text, "hello world");
}
