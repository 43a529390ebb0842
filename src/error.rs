//! Error handling for the lyrics-dl application
//!
//! Two layers live here. `ProviderError` and `OrchestrationError` describe why a
//! single lyrics source or translator did not produce a result; they never
//! escape the managers that drive providers. `LyricsDlError` is the
//! application-level hierarchy returned by configuration loading, file output
//! and the CLI commands.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum LyricsDlError {
    #[error("Network error: {0}")]
    Network(#[from] NetworkError),

    #[error("File system error: {0}")]
    FileSystem(#[from] FileSystemError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

#[derive(Error, Debug)]
pub enum NetworkError {
    #[error("HTTP client setup failed: {0}")]
    Client(#[from] reqwest::Error),

    #[error("Invalid proxy URL '{url}'")]
    InvalidProxy { url: String },
}

#[derive(Error, Debug)]
pub enum FileSystemError {
    #[error("IO error: {0}")]
    Io(std::io::Error),

    #[error("Path not found: {path}")]
    PathNotFound { path: PathBuf },

    #[error("Invalid lyrics file: {path}")]
    InvalidFormat { path: PathBuf },
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Config file not found: {path}")]
    FileNotFound { path: PathBuf },

    #[error("Invalid config format: {0}")]
    InvalidFormat(#[from] toml::de::Error),

    #[error("Failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("Invalid value for {field}: {value}")]
    InvalidValue { field: String, value: String },

    #[error("Failed to determine project directories")]
    NoProjectDirs,
}

/// Why a single transport call failed.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TransportError {
    #[error("request timed out")]
    Timeout,

    #[error("connection failed: {0}")]
    Connect(String),

    #[error("request failed: {0}")]
    Request(String),
}

impl From<reqwest::Error> for TransportError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            TransportError::Timeout
        } else if err.is_connect() {
            TransportError::Connect(err.to_string())
        } else {
            TransportError::Request(err.to_string())
        }
    }
}

/// Why a single provider attempt failed.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ProviderError {
    #[error("transport error: {0}")]
    Transport(#[from] TransportError),

    #[error("unexpected HTTP status {status}")]
    Http { status: u16 },

    #[error("no lyrics found in page: {0}")]
    ExtractionMiss(String),

    #[error("content rejected: {0}")]
    ValidationReject(String),

    #[error("provider reported an error: {0}")]
    Api(String),

    #[error("failed to parse response: {0}")]
    Parse(String),

    #[error("provider is not configured")]
    NotConfigured,
}

impl From<serde_json::Error> for ProviderError {
    fn from(err: serde_json::Error) -> Self {
        ProviderError::Parse(err.to_string())
    }
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum OrchestrationError {
    #[error("no provider succeeded ({attempted} attempted)")]
    Exhausted { attempted: usize },

    #[error("unknown provider: {0}")]
    UnknownProvider(String),

    #[error("{provider} failed: {source}")]
    Failed {
        provider: String,
        #[source]
        source: ProviderError,
    },
}

pub type Result<T> = std::result::Result<T, LyricsDlError>;

impl From<std::io::Error> for FileSystemError {
    fn from(err: std::io::Error) -> Self {
        FileSystemError::Io(err)
    }
}

impl From<std::io::Error> for LyricsDlError {
    fn from(err: std::io::Error) -> Self {
        LyricsDlError::FileSystem(FileSystemError::Io(err))
    }
}

impl From<toml::de::Error> for LyricsDlError {
    fn from(err: toml::de::Error) -> Self {
        LyricsDlError::Config(ConfigError::InvalidFormat(err))
    }
}

impl From<toml::ser::Error> for LyricsDlError {
    fn from(err: toml::ser::Error) -> Self {
        LyricsDlError::Config(ConfigError::Serialize(err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_orchestration_error_messages() {
        let err = OrchestrationError::Exhausted { attempted: 0 };
        assert!(err.to_string().contains("no provider succeeded"));

        let err = OrchestrationError::UnknownProvider("Nope".to_string());
        assert_eq!(err.to_string(), "unknown provider: Nope");
    }

    #[test]
    fn test_transport_error_converts_into_provider_error() {
        let err: ProviderError = TransportError::Timeout.into();
        assert_eq!(err, ProviderError::Transport(TransportError::Timeout));
        assert_eq!(err.to_string(), "transport error: request timed out");
    }
}
