use async_trait::async_trait;
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};
use url::Url;

use super::{TranslationProvider, TranslationRequest};
use crate::core::orchestrator::Provider;
use crate::core::text::is_section_marker;
use crate::core::transport::{HttpRequest, HttpTransport};
use crate::error::ProviderError;

const API_URL: &str = "https://translate.googleapis.com/translate_a/single";

pub const MAX_CHUNK_CHARS: usize = 4000;

/// The free `client=gtx` endpoint. Needs no key, so it is always available.
pub struct Google {
    transport: Arc<dyn HttpTransport>,
    timeout: Duration,
    delay: Duration,
}

impl Google {
    pub fn new(transport: Arc<dyn HttpTransport>, timeout: Duration, delay: Duration) -> Self {
        Self {
            transport,
            timeout,
            delay,
        }
    }

    async fn request_translation(
        &self,
        text: &str,
        source_lang: &str,
        target_lang: &str,
    ) -> Result<String, ProviderError> {
        let url = Url::parse_with_params(
            API_URL,
            &[
                ("client", "gtx"),
                ("sl", google_lang(source_lang)),
                ("tl", google_lang(target_lang)),
                ("dt", "t"),
                ("q", text),
            ],
        )
        .map_err(|e| ProviderError::Parse(e.to_string()))?;

        let response = self
            .transport
            .send(HttpRequest::get(url.as_str()).timeout(self.timeout))
            .await?;

        if !response.is_success() {
            return Err(ProviderError::Http { status: response.status });
        }

        parse_response(&response.body)
    }
}

fn google_lang(code: &str) -> &str {
    match code {
        "zh" => "zh-CN",
        other => other,
    }
}

/// The answer is a nested array whose first element lists translated
/// segments; the translation is the concatenation of their first fields.
fn parse_response(body: &[u8]) -> Result<String, ProviderError> {
    let data: Value = serde_json::from_slice(body)?;

    let segments = data
        .get(0)
        .and_then(Value::as_array)
        .ok_or_else(|| ProviderError::Parse("missing translation segments".to_string()))?;

    let translated: String = segments
        .iter()
        .filter_map(|segment| segment.get(0).and_then(Value::as_str))
        .collect();

    if translated.trim().is_empty() {
        return Err(ProviderError::ExtractionMiss("empty translation".to_string()));
    }

    Ok(translated)
}

#[async_trait]
impl Provider for Google {
    type Request = TranslationRequest;
    type Output = String;

    fn name(&self) -> &str {
        "Google Translate"
    }

    fn priority(&self) -> u32 {
        3
    }

    async fn attempt(&self, request: &TranslationRequest) -> Result<String, ProviderError> {
        let text = request.text.as_str();
        if text.trim().is_empty() {
            return Ok(text.to_string());
        }
        if is_section_marker(text) {
            return Ok(text.trim().to_string());
        }

        self.request_translation(text, &request.source_lang, &request.target_lang)
            .await
    }
}

#[async_trait]
impl TranslationProvider for Google {
    fn max_chunk_chars(&self) -> usize {
        MAX_CHUNK_CHARS
    }

    fn supports_bulk(&self) -> bool {
        true
    }

    /// One request for all lines; if the line count does not survive the
    /// round trip, each line is sent on its own.
    async fn translate_lines(
        &self,
        lines: &[String],
        source_lang: &str,
        target_lang: &str,
    ) -> Result<Vec<String>, ProviderError> {
        let joined = lines.join("\n");
        let translated = self.request_translation(&joined, source_lang, target_lang).await?;

        let split: Vec<String> = translated.split('\n').map(|l| l.trim().to_string()).collect();
        if split.len() == lines.len() {
            return Ok(split);
        }

        warn!(
            "Google returned {} lines for {}, falling back to line-by-line",
            split.len(),
            lines.len()
        );

        let mut out = Vec::with_capacity(lines.len());
        for (i, line) in lines.iter().enumerate() {
            if i > 0 && !self.delay.is_zero() {
                tokio::time::sleep(self.delay).await;
            }

            let request = TranslationRequest::new(line.as_str(), source_lang, target_lang);
            match self.attempt(&request).await {
                Ok(text) if !text.trim().is_empty() => out.push(text),
                Ok(_) => out.push(line.clone()),
                Err(e) => {
                    debug!("Line {} kept untranslated: {}", i + 1, e);
                    out.push(line.clone());
                }
            }
        }

        Ok(out)
    }
}
