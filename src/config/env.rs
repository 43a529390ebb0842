use std::env;
use crate::error::{Result, LyricsDlError};

/// Environment variable names
pub struct EnvVars;

impl EnvVars {
    pub const REQUEST_TIMEOUT_SECONDS: &'static str = "LYRICSDL_REQUEST_TIMEOUT_SECONDS";
    pub const MAX_RETRIES: &'static str = "LYRICSDL_MAX_RETRIES";
    pub const RETRY_DELAY_MS: &'static str = "LYRICSDL_RETRY_DELAY_MS";
    pub const TRANSLATION_DELAY_MS: &'static str = "LYRICSDL_TRANSLATION_DELAY_MS";
    pub const SOURCE_LANGUAGE: &'static str = "LYRICSDL_SOURCE_LANGUAGE";
    pub const TARGET_LANGUAGE: &'static str = "LYRICSDL_TARGET_LANGUAGE";
    pub const OUTPUT_DIR: &'static str = "LYRICSDL_OUTPUT_DIR";
    pub const PROXY_HTTP: &'static str = "LYRICSDL_PROXY_HTTP";
    pub const PROXY_HTTPS: &'static str = "LYRICSDL_PROXY_HTTPS";
    pub const PROXY_ENABLED: &'static str = "LYRICSDL_PROXY_ENABLED";
    pub const BAIDU_APP_ID: &'static str = "LYRICSDL_BAIDU_APP_ID";
    pub const BAIDU_SECRET: &'static str = "LYRICSDL_BAIDU_SECRET";
    pub const YOUDAO_APP_KEY: &'static str = "LYRICSDL_YOUDAO_APP_KEY";
    pub const YOUDAO_SECRET: &'static str = "LYRICSDL_YOUDAO_SECRET";
}

/// Environment variable parsing utilities with validation
pub struct EnvParser;

impl EnvParser {
    /// Parse environment variable as string with validation
    pub fn parse_string(var_name: &str, validator: Option<fn(&str) -> Result<()>>) -> Result<Option<String>> {
        match env::var(var_name) {
            Ok(value) => {
                let trimmed = value.trim().to_string();
                if trimmed.is_empty() {
                    return Ok(None);
                }

                if let Some(validate_fn) = validator {
                    validate_fn(&trimmed)?;
                }

                Ok(Some(trimmed))
            }
            Err(env::VarError::NotPresent) => Ok(None),
            Err(env::VarError::NotUnicode(_)) => {
                Err(LyricsDlError::Validation(format!(
                    "Environment variable {} contains invalid UTF-8",
                    var_name
                )))
            }
        }
    }

    /// Parse environment variable as boolean with validation
    pub fn parse_bool(var_name: &str) -> Result<Option<bool>> {
        if let Some(value_str) = Self::parse_string(var_name, None)? {
            match value_str.to_lowercase().as_str() {
                "true" | "1" | "yes" | "on" => Ok(Some(true)),
                "false" | "0" | "no" | "off" => Ok(Some(false)),
                _ => Err(LyricsDlError::Validation(format!(
                    "Invalid boolean value in {}: '{}'. Use: true/false, 1/0, yes/no, on/off",
                    var_name, value_str
                )))
            }
        } else {
            Ok(None)
        }
    }

    /// Parse environment variable as u64 with range validation
    pub fn parse_u64(var_name: &str, min: u64, max: u64) -> Result<Option<u64>> {
        if let Some(value_str) = Self::parse_string(var_name, None)? {
            let value = value_str.parse::<u64>().map_err(|_| {
                LyricsDlError::Validation(format!(
                    "Invalid number in {}: '{}'. Must be a positive integer",
                    var_name, value_str
                ))
            })?;

            if value < min || value > max {
                return Err(LyricsDlError::Validation(format!(
                    "Value in {} must be between {} and {}, got {}",
                    var_name, min, max, value
                )));
            }

            Ok(Some(value))
        } else {
            Ok(None)
        }
    }

    /// Parse environment variable as u32 with range validation
    pub fn parse_u32(var_name: &str, min: u32, max: u32) -> Result<Option<u32>> {
        Ok(Self::parse_u64(var_name, u64::from(min), u64::from(max))?
            .map(|value| value as u32))
    }

    /// All LYRICSDL_ variables, secrets masked, for `--verbose` diagnostics
    pub fn get_all_lyricsdl_vars() -> Vec<(String, String)> {
        env::vars()
            .filter(|(key, _)| key.starts_with("LYRICSDL_"))
            .map(|(key, value)| {
                if key.ends_with("_SECRET") {
                    (key, "***".to_string())
                } else {
                    (key, value)
                }
            })
            .collect()
    }
}
