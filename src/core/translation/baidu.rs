use async_trait::async_trait;
use md5::{Digest, Md5};
use rand::Rng;
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use url::Url;

use super::{TranslationProvider, TranslationRequest};
use crate::config::ApiCredentials;
use crate::core::orchestrator::Provider;
use crate::core::transport::{HttpRequest, HttpTransport};
use crate::error::ProviderError;

const API_URL: &str = "https://fanyi-api.baidu.com/api/trans/vip/translate";

pub const MAX_CHUNK_CHARS: usize = 6000;

/// Baidu general translation API, signed with MD5.
pub struct Baidu {
    transport: Arc<dyn HttpTransport>,
    credentials: ApiCredentials,
    timeout: Duration,
}

impl Baidu {
    pub fn new(transport: Arc<dyn HttpTransport>, credentials: ApiCredentials, timeout: Duration) -> Self {
        Self {
            transport,
            credentials,
            timeout,
        }
    }
}

fn baidu_lang(code: &str) -> &str {
    match code {
        "zh" | "zh-CN" => "zh",
        "ja" => "jp",
        "ko" => "kor",
        "fr" => "fra",
        "es" => "spa",
        other => other,
    }
}

/// `md5(appid + q + salt + secret)` as lowercase hex.
pub fn sign(app_id: &str, text: &str, salt: u32, secret: &str) -> String {
    let digest = Md5::digest(format!("{}{}{}{}", app_id, text, salt, secret).as_bytes());
    hex::encode(digest)
}

fn parse_response(body: &[u8]) -> Result<String, ProviderError> {
    let data: Value = serde_json::from_slice(body)?;

    if let Some(code) = data.get("error_code") {
        let code = code.as_str().map(str::to_string).unwrap_or_else(|| code.to_string());
        // 52000 is Baidu's "success" code
        if code != "52000" {
            let message = data["error_msg"].as_str().unwrap_or("unknown error");
            return Err(ProviderError::Api(format!("{} ({})", message, code)));
        }
    }

    let results = data["trans_result"]
        .as_array()
        .ok_or_else(|| ProviderError::Parse("missing trans_result".to_string()))?;

    Ok(results
        .iter()
        .filter_map(|item| item["dst"].as_str())
        .collect::<Vec<_>>()
        .join("\n"))
}

#[async_trait]
impl Provider for Baidu {
    type Request = TranslationRequest;
    type Output = String;

    fn name(&self) -> &str {
        "Baidu Translate"
    }

    fn priority(&self) -> u32 {
        2
    }

    fn is_available(&self) -> bool {
        self.credentials.is_complete()
    }

    async fn attempt(&self, request: &TranslationRequest) -> Result<String, ProviderError> {
        if !self.is_available() {
            return Err(ProviderError::NotConfigured);
        }

        let salt: u32 = rand::rng().random_range(32768..=65536);
        let signature = sign(&self.credentials.app_id, &request.text, salt, &self.credentials.secret);
        let salt = salt.to_string();

        let url = Url::parse_with_params(
            API_URL,
            &[
                ("q", request.text.as_str()),
                ("from", baidu_lang(&request.source_lang)),
                ("to", baidu_lang(&request.target_lang)),
                ("appid", self.credentials.app_id.as_str()),
                ("salt", salt.as_str()),
                ("sign", signature.as_str()),
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

impl TranslationProvider for Baidu {
    fn max_chunk_chars(&self) -> usize {
        MAX_CHUNK_CHARS
    }
}
