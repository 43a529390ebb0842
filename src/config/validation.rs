use url::Url;
use crate::error::{Result, LyricsDlError};

/// Centralized configuration validation utilities
pub struct ConfigValidator;

impl ConfigValidator {
    /// Validate a URL string
    pub fn validate_url(url: &str, field_name: &str) -> Result<()> {
        Url::parse(url).map_err(|e| {
            LyricsDlError::Validation(format!("Invalid {} URL '{}': {}", field_name, url, e))
        })?;
        Ok(())
    }

    /// Validate a proxy URL: must parse and use an http or https scheme
    pub fn validate_proxy_url(url: &str) -> Result<()> {
        Self::validate_url(url, "proxy")?;

        let scheme = url.split("://").next().unwrap_or_default().to_lowercase();
        if !matches!(scheme.as_str(), "http" | "https") {
            return Err(LyricsDlError::Validation(format!(
                "Proxy URL must start with http:// or https://, got: {}",
                url
            )));
        }
        Ok(())
    }

    /// Validate numeric range
    pub fn validate_range<T>(value: T, min: T, max: T, field_name: &str) -> Result<()>
    where
        T: PartialOrd + std::fmt::Display + Copy,
    {
        if value < min || value > max {
            return Err(LyricsDlError::Validation(format!(
                "{} must be between {} and {}, got {}",
                field_name, min, max, value
            )));
        }
        Ok(())
    }

    /// Language codes look like `en`, `zh-CN`, `zh-CHS` or `auto`
    pub fn validate_language(code: &str, field_name: &str) -> Result<()> {
        let valid = !code.is_empty()
            && code.len() <= 10
            && code.chars().all(|c| c.is_ascii_alphanumeric() || c == '-');
        if !valid {
            return Err(LyricsDlError::Validation(format!(
                "Invalid language code for {}: '{}'",
                field_name, code
            )));
        }
        Ok(())
    }
}
