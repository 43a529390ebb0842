//! Configuration for lyrics-dl
//!
//! Values are layered: built-in defaults, then the TOML file, then
//! `LYRICSDL_*` environment variables (a `.env` file is honoured).

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use directories::ProjectDirs;
use tracing::debug;

use crate::core::sources::SourceSettings;
use crate::core::text::Heuristics;
use crate::core::transport::{ProxySettings, RetryPolicy};
use crate::error::{ConfigError, Result};

pub mod env;
pub mod validation;

pub use env::{EnvParser, EnvVars};
pub use validation::ConfigValidator;

fn default_request_timeout_seconds() -> u64 {
    30
}

fn default_max_retries() -> u32 {
    3
}

fn default_retry_delay_ms() -> u64 {
    1000
}

fn default_translation_delay_ms() -> u64 {
    500
}

fn default_source_language() -> String {
    "auto".to_string()
}

fn default_target_language() -> String {
    "zh".to_string()
}

fn default_output_dir() -> PathBuf {
    PathBuf::from(".")
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Timeout applied to every outbound request (seconds)
    #[serde(default = "default_request_timeout_seconds")]
    pub request_timeout_seconds: u64,

    /// Attempts for retried requests, including the first
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,

    /// Base delay of the exponential backoff (milliseconds)
    #[serde(default = "default_retry_delay_ms")]
    pub retry_delay_ms: u64,

    /// Pause between consecutive translation calls (milliseconds)
    #[serde(default = "default_translation_delay_ms")]
    pub translation_delay_ms: u64,

    #[serde(default = "default_source_language")]
    pub source_language: String,

    #[serde(default = "default_target_language")]
    pub target_language: String,

    /// Where lyrics and translation files are written
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,

    #[serde(default)]
    pub proxy: ProxyConfig,

    #[serde(default)]
    pub translation: TranslationConfig,

    #[serde(default)]
    pub heuristics: HeuristicsConfig,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProxyConfig {
    #[serde(default)]
    pub enabled: bool,
    #[serde(default)]
    pub http: Option<String>,
    #[serde(default)]
    pub https: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TranslationConfig {
    #[serde(default)]
    pub baidu: ApiCredentials,
    #[serde(default)]
    pub youdao: ApiCredentials,
}

/// Key pair for a signed translation API.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ApiCredentials {
    #[serde(default, alias = "app_key")]
    pub app_id: String,
    #[serde(default)]
    pub secret: String,
}

impl ApiCredentials {
    pub fn new(app_id: impl Into<String>, secret: impl Into<String>) -> Self {
        Self {
            app_id: app_id.into(),
            secret: secret.into(),
        }
    }

    pub fn is_complete(&self) -> bool {
        !self.app_id.trim().is_empty() && !self.secret.trim().is_empty()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HeuristicsConfig {
    #[serde(default = "HeuristicsConfig::default_min_lyrics_chars")]
    pub min_lyrics_chars: usize,
    #[serde(default = "HeuristicsConfig::default_max_ui_indicators")]
    pub max_ui_indicators: usize,
    #[serde(default = "HeuristicsConfig::default_youtube_min_chars")]
    pub youtube_min_chars: usize,
    #[serde(default = "HeuristicsConfig::default_youtube_max_videos")]
    pub youtube_max_videos: usize,
}

impl HeuristicsConfig {
    fn default_min_lyrics_chars() -> usize {
        Heuristics::default().min_chars
    }

    fn default_max_ui_indicators() -> usize {
        Heuristics::default().max_ui_indicators
    }

    fn default_youtube_min_chars() -> usize {
        SourceSettings::default().youtube_min_chars
    }

    fn default_youtube_max_videos() -> usize {
        SourceSettings::default().youtube_max_videos
    }
}

impl Default for HeuristicsConfig {
    fn default() -> Self {
        Self {
            min_lyrics_chars: Self::default_min_lyrics_chars(),
            max_ui_indicators: Self::default_max_ui_indicators(),
            youtube_min_chars: Self::default_youtube_min_chars(),
            youtube_max_videos: Self::default_youtube_max_videos(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            request_timeout_seconds: default_request_timeout_seconds(),
            max_retries: default_max_retries(),
            retry_delay_ms: default_retry_delay_ms(),
            translation_delay_ms: default_translation_delay_ms(),
            source_language: default_source_language(),
            target_language: default_target_language(),
            output_dir: default_output_dir(),
            proxy: ProxyConfig::default(),
            translation: TranslationConfig::default(),
            heuristics: HeuristicsConfig::default(),
        }
    }
}

impl Config {
    pub fn load(config_path: Option<&str>) -> Result<Self> {
        // Try to load .env file if it exists
        dotenvy::dotenv().ok();

        let config_file = if let Some(path) = config_path {
            PathBuf::from(path)
        } else {
            Self::default_config_path()?
        };

        // An explicit path must exist; the default one is created on first run
        if config_path.is_some() && !config_file.exists() {
            return Err(ConfigError::FileNotFound { path: config_file }.into());
        }

        Self::load_from(&config_file)
    }

    /// Read `config_file`, writing defaults there first when it is missing,
    /// then apply environment overrides. Overrides are never saved, so
    /// secrets from the environment stay out of the file.
    pub fn load_from(config_file: &Path) -> Result<Self> {
        let mut config = if config_file.exists() {
            debug!("Loading config from {}", config_file.display());
            Self::from_file(config_file)?
        } else {
            let defaults = Self::default();
            if let Some(parent) = config_file.parent() {
                fs::create_dir_all(parent)?;
            }
            defaults.save(config_file)?;
            defaults
        };

        // Environment variables have the highest priority
        config.load_from_env()?;
        config.validate()?;

        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }

    /// Apply `LYRICSDL_*` overrides
    fn load_from_env(&mut self) -> Result<()> {
        if let Some(value) = EnvParser::parse_u64(EnvVars::REQUEST_TIMEOUT_SECONDS, 1, 600)? {
            self.request_timeout_seconds = value;
        }
        if let Some(value) = EnvParser::parse_u32(EnvVars::MAX_RETRIES, 1, 10)? {
            self.max_retries = value;
        }
        if let Some(value) = EnvParser::parse_u64(EnvVars::RETRY_DELAY_MS, 0, 60_000)? {
            self.retry_delay_ms = value;
        }
        if let Some(value) = EnvParser::parse_u64(EnvVars::TRANSLATION_DELAY_MS, 0, 60_000)? {
            self.translation_delay_ms = value;
        }
        if let Some(value) = EnvParser::parse_string(EnvVars::SOURCE_LANGUAGE, None)? {
            self.source_language = value;
        }
        if let Some(value) = EnvParser::parse_string(EnvVars::TARGET_LANGUAGE, None)? {
            self.target_language = value;
        }
        if let Some(value) = EnvParser::parse_string(EnvVars::OUTPUT_DIR, None)? {
            self.output_dir = PathBuf::from(value);
        }

        // Setting a proxy in the environment turns proxying on
        if let Some(url) = EnvParser::parse_string(EnvVars::PROXY_HTTP, Some(ConfigValidator::validate_proxy_url))? {
            self.proxy.http = Some(url);
            self.proxy.enabled = true;
        }
        if let Some(url) = EnvParser::parse_string(EnvVars::PROXY_HTTPS, Some(ConfigValidator::validate_proxy_url))? {
            self.proxy.https = Some(url);
            self.proxy.enabled = true;
        }
        if let Some(enabled) = EnvParser::parse_bool(EnvVars::PROXY_ENABLED)? {
            self.proxy.enabled = enabled;
        }

        if let Some(value) = EnvParser::parse_string(EnvVars::BAIDU_APP_ID, None)? {
            self.translation.baidu.app_id = value;
        }
        if let Some(value) = EnvParser::parse_string(EnvVars::BAIDU_SECRET, None)? {
            self.translation.baidu.secret = value;
        }
        if let Some(value) = EnvParser::parse_string(EnvVars::YOUDAO_APP_KEY, None)? {
            self.translation.youdao.app_id = value;
        }
        if let Some(value) = EnvParser::parse_string(EnvVars::YOUDAO_SECRET, None)? {
            self.translation.youdao.secret = value;
        }

        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        ConfigValidator::validate_range(self.request_timeout_seconds, 1, 600, "request_timeout_seconds")?;
        ConfigValidator::validate_range(self.max_retries, 1, 10, "max_retries")?;
        ConfigValidator::validate_range(self.retry_delay_ms, 0, 60_000, "retry_delay_ms")?;
        ConfigValidator::validate_range(self.translation_delay_ms, 0, 60_000, "translation_delay_ms")?;
        ConfigValidator::validate_range(self.heuristics.youtube_max_videos, 1, 20, "heuristics.youtube_max_videos")?;
        ConfigValidator::validate_language(&self.source_language, "source_language")?;
        ConfigValidator::validate_language(&self.target_language, "target_language")?;

        for url in [&self.proxy.http, &self.proxy.https].into_iter().flatten() {
            ConfigValidator::validate_proxy_url(url)?;
        }
        Ok(())
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self)?;
        fs::write(path, content)?;
        Ok(())
    }

    fn default_config_path() -> Result<PathBuf> {
        let project_dirs = ProjectDirs::from("net", "lyrics-dl", "lyrics-dl")
            .ok_or(ConfigError::NoProjectDirs)?;

        Ok(project_dirs.config_dir().join("config.toml"))
    }

    pub fn config_path() -> Result<PathBuf> {
        Self::default_config_path()
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_seconds)
    }

    pub fn translation_delay(&self) -> Duration {
        Duration::from_millis(self.translation_delay_ms)
    }

    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy {
            max_attempts: self.max_retries,
            base_delay: Duration::from_millis(self.retry_delay_ms),
        }
    }

    pub fn source_settings(&self) -> SourceSettings {
        SourceSettings {
            timeout: self.request_timeout(),
            retry: self.retry_policy(),
            heuristics: Heuristics {
                min_chars: self.heuristics.min_lyrics_chars,
                max_ui_indicators: self.heuristics.max_ui_indicators,
            },
            youtube_min_chars: self.heuristics.youtube_min_chars,
            youtube_max_videos: self.heuristics.youtube_max_videos,
        }
    }

    /// Proxies only apply when `proxy.enabled` is set
    pub fn proxy_settings(&self) -> ProxySettings {
        if !self.proxy.enabled {
            return ProxySettings::default();
        }
        ProxySettings {
            http: self.proxy.http.clone(),
            https: self.proxy.https.clone(),
        }
    }

    /// Credentials for a signed translator, by short or display name
    pub fn credentials(&self, provider: &str) -> Option<&ApiCredentials> {
        match provider_key(provider).as_str() {
            "baidu" => Some(&self.translation.baidu),
            "youdao" => Some(&self.translation.youdao),
            _ => None,
        }
    }

    pub fn is_configured(&self, provider: &str) -> bool {
        match provider_key(provider).as_str() {
            "google" => true,
            _ => self.credentials(provider).is_some_and(ApiCredentials::is_complete),
        }
    }
}

/// "Baidu Translate" and "baidu" both become "baidu"
fn provider_key(name: &str) -> String {
    name.split_whitespace().next().unwrap_or_default().to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;
    use tempfile::TempDir;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.request_timeout(), Duration::from_secs(30));
        assert_eq!(config.translation_delay(), Duration::from_millis(500));
        assert_eq!(config.retry_policy().max_attempts, 3);
        assert_eq!(config.retry_policy().base_delay, Duration::from_millis(1000));
        assert_eq!(config.target_language, "zh");
        assert_eq!(config.heuristics.min_lyrics_chars, 50);
        assert_eq!(config.heuristics.max_ui_indicators, 3);
        assert_eq!(config.heuristics.youtube_min_chars, 100);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let config: Config = toml::from_str(
            r#"
            target_language = "en"

            [translation.youdao]
            app_key = "key"
            secret = "secret"
            "#,
        )
        .unwrap();

        assert_eq!(config.target_language, "en");
        assert_eq!(config.request_timeout_seconds, 30);
        assert_eq!(config.translation.youdao.app_id, "key");
        assert!(config.is_configured("Youdao Translate"));
        assert!(!config.is_configured("baidu"));
    }

    #[test]
    fn test_google_is_always_configured() {
        let config = Config::default();
        assert!(config.is_configured("Google Translate"));
        assert!(config.credentials("google").is_none());
    }

    #[test]
    fn test_credentials_need_both_halves() {
        assert!(!ApiCredentials::new("id", "  ").is_complete());
        assert!(!ApiCredentials::new("", "secret").is_complete());
        assert!(ApiCredentials::new("id", "secret").is_complete());
    }

    #[test]
    fn test_proxy_only_when_enabled() {
        let mut config = Config::default();
        config.proxy.http = Some("http://127.0.0.1:7890".to_string());
        assert_eq!(config.proxy_settings(), ProxySettings::default());

        config.proxy.enabled = true;
        assert_eq!(config.proxy_settings().http.as_deref(), Some("http://127.0.0.1:7890"));
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let mut config = Config::default();
        config.max_retries = 0;
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.proxy.https = Some("not a url".to_string());
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_save_and_reload() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");

        let mut config = Config::default();
        config.translation.baidu = ApiCredentials::new("appid", "key");
        config.heuristics.youtube_max_videos = 5;
        config.save(&path).unwrap();

        let loaded = Config::from_file(&path).unwrap();
        assert_eq!(loaded.translation.baidu, ApiCredentials::new("appid", "key"));
        assert_eq!(loaded.source_settings().youtube_max_videos, 5);
    }

    #[test]
    fn test_first_run_file_holds_no_env_secrets() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        env::set_var(EnvVars::YOUDAO_APP_KEY, "env-key");
        env::set_var(EnvVars::YOUDAO_SECRET, "env-secret-value");
        env::set_var(EnvVars::PROXY_HTTP, "http://127.0.0.1:7890");
        env::set_var(EnvVars::PROXY_ENABLED, "off");
        let loaded = Config::load_from(&path);
        env::remove_var(EnvVars::YOUDAO_APP_KEY);
        env::remove_var(EnvVars::YOUDAO_SECRET);
        env::remove_var(EnvVars::PROXY_HTTP);
        env::remove_var(EnvVars::PROXY_ENABLED);

        let config = loaded.unwrap();
        assert_eq!(config.translation.youdao, ApiCredentials::new("env-key", "env-secret-value"));
        assert!(config.is_configured("youdao"));
        assert_eq!(config.proxy.http.as_deref(), Some("http://127.0.0.1:7890"));
        assert!(!config.proxy.enabled);
        assert_eq!(config.proxy_settings(), ProxySettings::default());

        let saved = std::fs::read_to_string(&path).unwrap();
        assert!(!saved.contains("env-secret-value"));
        assert!(!saved.contains("env-key"));
        assert!(!Config::from_file(&path).unwrap().translation.youdao.is_complete());
    }

    #[test]
    fn test_missing_explicit_file_is_an_error() {
        let err = Config::load(Some("/definitely/not/here/config.toml")).unwrap_err();
        assert!(err.to_string().contains("Config file not found"));
    }
}
