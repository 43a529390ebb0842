//! HTTP transport used by every lyrics source and translator
//!
//! Providers only talk to the network through [`HttpTransport`], which keeps
//! them testable with an in-memory transport and lets the CLI decide about
//! proxies and timeouts in one place.

use async_trait::async_trait;
use std::time::Duration;
use tracing::{debug, warn};

use crate::error::{NetworkError, TransportError};

pub const BROWSER_USER_AGENT: &str =
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    /// POST with an `application/x-www-form-urlencoded` body
    PostForm,
}

#[derive(Debug, Clone, PartialEq)]
pub struct HttpRequest {
    pub method: Method,
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub form: Vec<(String, String)>,
    pub timeout: Duration,
}

impl HttpRequest {
    /// GET request carrying the default browser-like User-Agent.
    pub fn get(url: impl Into<String>) -> Self {
        Self {
            method: Method::Get,
            url: url.into(),
            headers: vec![("User-Agent".to_string(), BROWSER_USER_AGENT.to_string())],
            form: Vec::new(),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    pub fn post_form(url: impl Into<String>, form: Vec<(String, String)>) -> Self {
        Self {
            method: Method::PostForm,
            form,
            ..Self::get(url)
        }
    }

    pub fn header(mut self, name: &str, value: &str) -> Self {
        self.headers.retain(|(existing, _)| !existing.eq_ignore_ascii_case(name));
        self.headers.push((name.to_string(), value.to_string()));
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: Vec<u8>,
}

impl HttpResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// 429 and 5xx are worth another try, everything else is final.
    pub fn is_transient_failure(&self) -> bool {
        self.status == 429 || (500..600).contains(&self.status)
    }

    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }
}

#[async_trait]
pub trait HttpTransport: Send + Sync {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, TransportError>;
}

/// Proxy endpoints applied to every outgoing request.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProxySettings {
    pub http: Option<String>,
    pub https: Option<String>,
}

#[derive(Clone)]
pub struct ReqwestTransport {
    client: reqwest::Client,
}

impl ReqwestTransport {
    pub fn new(proxy: &ProxySettings) -> Result<Self, NetworkError> {
        let mut builder = reqwest::Client::builder().user_agent(BROWSER_USER_AGENT);

        if let Some(ref http) = proxy.http {
            let p = reqwest::Proxy::http(http)
                .map_err(|_| NetworkError::InvalidProxy { url: http.clone() })?;
            builder = builder.proxy(p);
            debug!("HTTP proxy enabled: {}", http);
        }

        // An HTTP-only proxy also carries HTTPS traffic, matching how most
        // local proxies are configured.
        if let Some(https) = proxy.https.as_ref().or(proxy.http.as_ref()) {
            let p = reqwest::Proxy::https(https)
                .map_err(|_| NetworkError::InvalidProxy { url: https.clone() })?;
            builder = builder.proxy(p);
            debug!("HTTPS proxy enabled: {}", https);
        }

        Ok(Self { client: builder.build()? })
    }
}

#[async_trait]
impl HttpTransport for ReqwestTransport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
        let mut builder = match request.method {
            Method::Get => self.client.get(&request.url),
            Method::PostForm => self.client.post(&request.url).form(&request.form),
        };

        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }

        let response = builder.timeout(request.timeout).send().await?;
        let status = response.status().as_u16();
        let body = response.bytes().await?.to_vec();

        Ok(HttpResponse { status, body })
    }
}

/// Bounded exponential backoff around a single request.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub base_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_delay: Duration::from_secs(1),
        }
    }
}

impl RetryPolicy {
    pub fn delay_for(&self, attempt: u32) -> Duration {
        self.base_delay * 2u32.saturating_pow(attempt.saturating_sub(1))
    }
}

/// Send `request`, retrying transport errors, 429 and 5xx responses with
/// exponentially growing delays. Any other response is returned as-is.
pub async fn send_with_backoff(
    transport: &dyn HttpTransport,
    request: HttpRequest,
    policy: RetryPolicy,
) -> Result<HttpResponse, TransportError> {
    let max_attempts = policy.max_attempts.max(1);
    let mut attempt = 0u32;

    loop {
        attempt += 1;
        match transport.send(request.clone()).await {
            Ok(response) if response.is_transient_failure() && attempt < max_attempts => {
                let backoff = policy.delay_for(attempt);
                warn!(
                    "Request to {} returned {} (attempt {}/{}), retrying in {:?}",
                    request.url, response.status, attempt, max_attempts, backoff
                );
                tokio::time::sleep(backoff).await;
            }
            Ok(response) => return Ok(response),
            Err(e) if attempt < max_attempts => {
                let backoff = policy.delay_for(attempt);
                warn!(
                    "Request to {} failed (attempt {}/{}): {}, retrying in {:?}",
                    request.url, attempt, max_attempts, e, backoff
                );
                tokio::time::sleep(backoff).await;
            }
            Err(e) => return Err(e),
        }
    }
}
