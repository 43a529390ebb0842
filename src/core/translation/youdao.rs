use async_trait::async_trait;
use serde_json::Value;
use sha2::{Digest, Sha256};
use std::sync::Arc;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use super::{TranslationProvider, TranslationRequest};
use crate::config::ApiCredentials;
use crate::core::orchestrator::Provider;
use crate::core::transport::{HttpRequest, HttpTransport};
use crate::error::ProviderError;

const API_URL: &str = "https://openapi.youdao.com/api";

pub const MAX_CHUNK_CHARS: usize = 5000;

/// Youdao text translation API, signed with SHA-256 (`signType=v3`).
pub struct Youdao {
    transport: Arc<dyn HttpTransport>,
    credentials: ApiCredentials,
    timeout: Duration,
}

impl Youdao {
    pub fn new(transport: Arc<dyn HttpTransport>, credentials: ApiCredentials, timeout: Duration) -> Self {
        Self {
            transport,
            credentials,
            timeout,
        }
    }
}

fn youdao_lang(code: &str) -> &str {
    match code {
        "zh" | "zh-CN" => "zh-CHS",
        other => other,
    }
}

/// The `input` part of the v3 signature: short texts as-is, longer ones as
/// first 10 characters + character count + last 10 characters.
pub fn truncate_for_sign(text: &str) -> String {
    let chars: Vec<char> = text.chars().collect();
    if chars.len() <= 20 {
        return text.to_string();
    }

    let head: String = chars[..10].iter().collect();
    let tail: String = chars[chars.len() - 10..].iter().collect();
    format!("{}{}{}", head, chars.len(), tail)
}

pub fn sign(app_key: &str, text: &str, salt: &str, curtime: u64, secret: &str) -> String {
    let input = format!("{}{}{}{}{}", app_key, truncate_for_sign(text), salt, curtime, secret);
    hex::encode(Sha256::digest(input.as_bytes()))
}

fn parse_response(body: &[u8]) -> Result<String, ProviderError> {
    let data: Value = serde_json::from_slice(body)?;

    let code = match &data["errorCode"] {
        Value::String(code) => code.clone(),
        Value::Null => return Err(ProviderError::Parse("missing errorCode".to_string())),
        other => other.to_string(),
    };
    if code != "0" {
        return Err(ProviderError::Api(format!("errorCode {}", code)));
    }

    data["translation"][0]
        .as_str()
        .map(str::to_string)
        .ok_or_else(|| ProviderError::Parse("missing translation".to_string()))
}

#[async_trait]
impl Provider for Youdao {
    type Request = TranslationRequest;
    type Output = String;

    fn name(&self) -> &str {
        "Youdao Translate"
    }

    fn priority(&self) -> u32 {
        1
    }

    fn is_available(&self) -> bool {
        self.credentials.is_complete()
    }

    async fn attempt(&self, request: &TranslationRequest) -> Result<String, ProviderError> {
        if !self.is_available() {
            return Err(ProviderError::NotConfigured);
        }

        let salt = uuid::Uuid::new_v4().to_string();
        let curtime = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or_default();
        let signature = sign(
            &self.credentials.app_id,
            &request.text,
            &salt,
            curtime,
            &self.credentials.secret,
        );

        let form = vec![
            ("q".to_string(), request.text.clone()),
            ("from".to_string(), youdao_lang(&request.source_lang).to_string()),
            ("to".to_string(), youdao_lang(&request.target_lang).to_string()),
            ("appKey".to_string(), self.credentials.app_id.clone()),
            ("salt".to_string(), salt),
            ("sign".to_string(), signature),
            ("signType".to_string(), "v3".to_string()),
            ("curtime".to_string(), curtime.to_string()),
        ];

        let response = self
            .transport
            .send(HttpRequest::post_form(API_URL, form).timeout(self.timeout))
            .await?;

        if !response.is_success() {
            return Err(ProviderError::Http { status: response.status });
        }

        parse_response(&response.body)
    }
}

impl TranslationProvider for Youdao {
    fn max_chunk_chars(&self) -> usize {
        MAX_CHUNK_CHARS
    }
}
