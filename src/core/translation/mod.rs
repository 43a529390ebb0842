//! Translation providers and the manager that falls back between them
//!
//! Youdao and Baidu need API credentials and are only used when configured;
//! the free Google endpoint is always there as the last resort.

pub mod baidu;
pub mod batch;
pub mod google;
pub mod youdao;

use async_trait::async_trait;
use serde::Serialize;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

use crate::config::Config;
use crate::core::orchestrator::{Orchestrator, Provider, ProviderDescriptor};
use crate::core::transport::HttpTransport;
use crate::error::ProviderError;

pub use baidu::Baidu;
pub use google::Google;
pub use youdao::Youdao;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranslationRequest {
    pub text: String,
    pub source_lang: String,
    pub target_lang: String,
}

impl TranslationRequest {
    pub fn new(text: impl Into<String>, source_lang: &str, target_lang: &str) -> Self {
        Self {
            text: text.into(),
            source_lang: source_lang.to_string(),
            target_lang: target_lang.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TranslationResult {
    pub success: bool,
    /// The translation, or the original text when nothing worked
    pub text: String,
    pub source_lang: String,
    pub target_lang: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub provider: Option<String>,
}

/// A translation service. Every provider can translate one text; some can
/// also translate many lines in a single request.
#[async_trait]
pub trait TranslationProvider: Provider<Request = TranslationRequest, Output = String> {
    /// Largest text, in characters, worth sending in one request.
    fn max_chunk_chars(&self) -> usize;

    fn supports_bulk(&self) -> bool {
        false
    }

    /// Translate `lines` as a whole, one output line per input line.
    async fn translate_lines(
        &self,
        _lines: &[String],
        _source_lang: &str,
        _target_lang: &str,
    ) -> Result<Vec<String>, ProviderError> {
        Err(ProviderError::Api(format!("{} has no bulk mode", self.name())))
    }
}

/// Infallible translation: failures give back the input text.
#[async_trait]
pub trait Translator {
    async fn translate(&self, text: &str, source_lang: &str, target_lang: &str) -> String;
}

#[async_trait]
impl<T> Translator for T
where
    T: TranslationProvider + ?Sized,
{
    async fn translate(&self, text: &str, source_lang: &str, target_lang: &str) -> String {
        let request = TranslationRequest::new(text, source_lang, target_lang);
        match self.attempt(&request).await {
            Ok(translated) if !translated.trim().is_empty() => translated,
            Ok(_) => text.to_string(),
            Err(e) => {
                debug!("{} failed: {}", self.name(), e);
                text.to_string()
            }
        }
    }
}

pub type SharedTranslator = Arc<dyn TranslationProvider>;

pub const DEFAULT_CHUNK_CHARS: usize = google::MAX_CHUNK_CHARS;

pub struct TranslationManager {
    orchestrator: Orchestrator<dyn TranslationProvider>,
    delay: Duration,
}

impl TranslationManager {
    /// Youdao, Baidu and Google, keeping only the configured ones.
    pub fn new(config: &Config, transport: Arc<dyn HttpTransport>) -> Self {
        let timeout = config.request_timeout();
        let delay = config.translation_delay();

        let translators: Vec<SharedTranslator> = vec![
            Arc::new(Youdao::new(transport.clone(), config.translation.youdao.clone(), timeout)),
            Arc::new(Baidu::new(transport.clone(), config.translation.baidu.clone(), timeout)),
            Arc::new(Google::new(transport, timeout, delay)),
        ];

        Self::with_translators(translators, delay)
    }

    pub fn with_translators(translators: Vec<SharedTranslator>, delay: Duration) -> Self {
        let manager = Self {
            orchestrator: Orchestrator::new(translators),
            delay,
        };
        debug!("Translators available: {:?}", manager.available_translators());
        manager
    }

    /// Translate one text, trying each translator in turn.
    pub async fn translate(&self, text: &str, source_lang: &str, target_lang: &str) -> TranslationResult {
        let request = TranslationRequest::new(text, source_lang, target_lang);

        match self.orchestrator.run(&request).await {
            Ok(selected) => TranslationResult {
                success: true,
                text: selected.output,
                source_lang: source_lang.to_string(),
                target_lang: target_lang.to_string(),
                error: None,
                provider: Some(selected.provider),
            },
            Err(e) => TranslationResult {
                success: false,
                text: text.to_string(),
                source_lang: source_lang.to_string(),
                target_lang: target_lang.to_string(),
                error: Some(e.to_string()),
                provider: None,
            },
        }
    }

    /// Translate distinct texts, returning a map from each text to its
    /// translation. Uses the primary translator's bulk mode when it has one,
    /// otherwise one paced request per text.
    pub async fn translate_batch(
        &self,
        texts: &[String],
        source_lang: &str,
        target_lang: &str,
    ) -> HashMap<String, String> {
        if texts.is_empty() {
            return HashMap::new();
        }

        if let Some(primary) = self.orchestrator.primary().filter(|p| p.supports_bulk()) {
            info!("Translating {} lines in bulk with {}", texts.len(), primary.name());
            match primary.translate_lines(texts, source_lang, target_lang).await {
                Ok(lines) if lines.len() == texts.len() => {
                    return texts.iter().cloned().zip(lines).collect();
                }
                Ok(lines) => warn!(
                    "Bulk translation returned {} lines for {}, translating one by one",
                    lines.len(),
                    texts.len()
                ),
                Err(e) => warn!("Bulk translation failed: {}, translating one by one", e),
            }
        }

        let mut translations = HashMap::with_capacity(texts.len());
        for (i, text) in texts.iter().enumerate() {
            if i > 0 && !self.delay.is_zero() {
                tokio::time::sleep(self.delay).await;
            }

            let result = self.translate(text, source_lang, target_lang).await;
            if !result.success {
                debug!("Keeping original for line {}: {:?}", i + 1, text);
            }
            translations.insert(text.clone(), result.text);

            if (i + 1) % 10 == 0 {
                info!("Progress: {}/{}", i + 1, texts.len());
            }
        }

        translations
    }

    pub fn available_translators(&self) -> Vec<String> {
        self.orchestrator.names()
    }

    pub fn primary_translator(&self) -> Option<String> {
        self.orchestrator.primary().map(|p| p.name().to_string())
    }

    pub fn descriptors(&self) -> Vec<ProviderDescriptor> {
        self.orchestrator.descriptors()
    }

    /// Chunk size for whole-document translation, set by the primary translator.
    pub fn max_chunk_chars(&self) -> usize {
        self.orchestrator
            .primary()
            .map(|p| p.max_chunk_chars())
            .unwrap_or(DEFAULT_CHUNK_CHARS)
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use super::*;
    use std::sync::Mutex;

    /// Dictionary-backed translator that records every request.
    pub struct DictionaryTranslator {
        pub name: &'static str,
        pub priority: u32,
        pub available: bool,
        pub bulk: bool,
        pub entries: HashMap<String, String>,
        pub calls: Mutex<Vec<String>>,
    }

    impl DictionaryTranslator {
        pub fn new(name: &'static str, priority: u32, entries: &[(&str, &str)]) -> Self {
            Self {
                name,
                priority,
                available: true,
                bulk: false,
                entries: entries
                    .iter()
                    .map(|(k, v)| (k.to_string(), v.to_string()))
                    .collect(),
                calls: Mutex::new(Vec::new()),
            }
        }

        pub fn with_bulk(mut self) -> Self {
            self.bulk = true;
            self
        }

        pub fn unavailable(mut self) -> Self {
            self.available = false;
            self
        }

        pub fn calls(&self) -> Vec<String> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl Provider for DictionaryTranslator {
        type Request = TranslationRequest;
        type Output = String;

        fn name(&self) -> &str {
            self.name
        }

        fn priority(&self) -> u32 {
            self.priority
        }

        fn is_available(&self) -> bool {
            self.available
        }

        async fn attempt(&self, request: &TranslationRequest) -> Result<String, ProviderError> {
            self.calls.lock().unwrap().push(request.text.clone());
            self.entries
                .get(&request.text)
                .cloned()
                .ok_or_else(|| ProviderError::Api(format!("no entry for {}", request.text)))
        }
    }

    #[async_trait]
    impl TranslationProvider for DictionaryTranslator {
        fn max_chunk_chars(&self) -> usize {
            64
        }

        fn supports_bulk(&self) -> bool {
            self.bulk
        }

        async fn translate_lines(
            &self,
            lines: &[String],
            _source_lang: &str,
            _target_lang: &str,
        ) -> Result<Vec<String>, ProviderError> {
            self.calls.lock().unwrap().push(lines.join("\n"));
            Ok(lines
                .iter()
                .map(|line| self.entries.get(line).cloned().unwrap_or_else(|| line.clone()))
                .collect())
        }
    }
}
