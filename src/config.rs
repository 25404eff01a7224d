//! Client and stream configuration.
//!
//! Configuration is built in code with the builder methods, or read from
//! the environment:
//!
//! | Variable | Meaning |
//! |----------|---------|
//! | `BRAINSTREAM_URL` | Base URL of the assistant server |
//! | `BRAINSTREAM_STREAM_PATH` | Path of the streaming chat endpoint |
//! | `BRAINSTREAM_MAX_BUFFER_BYTES` | Cap on unterminated event data, `0` disables it |

use thiserror::Error;

use crate::error::ErrorCategory;

/// Default base URL of the assistant server
pub const DEFAULT_BASE_URL: &str = "http://localhost:8000";

/// Default path of the streaming chat endpoint
pub const DEFAULT_STREAM_PATH: &str = "/api/chat/stream";

/// Default cap on unterminated event data (8 MiB)
pub const DEFAULT_MAX_BUFFER_BYTES: usize = 8 * 1024 * 1024;

pub const ENV_BASE_URL: &str = "BRAINSTREAM_URL";
pub const ENV_STREAM_PATH: &str = "BRAINSTREAM_STREAM_PATH";
pub const ENV_MAX_BUFFER_BYTES: &str = "BRAINSTREAM_MAX_BUFFER_BYTES";

/// Configuration errors.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    /// An environment variable held a value that could not be parsed
    #[error("Invalid value for {name}: {value:?} ({reason})")]
    InvalidValue {
        name: &'static str,
        value: String,
        reason: String,
    },
}

impl ConfigError {
    pub fn category(&self) -> ErrorCategory {
        ErrorCategory::Configuration
    }
}

/// Settings for a single stream consumption.
#[derive(Debug, Clone, PartialEq)]
pub struct StreamConfig {
    /// Maximum bytes of event data without a block separator.
    /// `None` leaves the buffer unbounded.
    pub max_buffer_bytes: Option<usize>,
}

impl Default for StreamConfig {
    fn default() -> Self {
        Self {
            max_buffer_bytes: Some(DEFAULT_MAX_BUFFER_BYTES),
        }
    }
}

impl StreamConfig {
    /// Create a new StreamConfig with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the buffer cap (`None` for unbounded).
    pub fn with_max_buffer_bytes(mut self, max: Option<usize>) -> Self {
        self.max_buffer_bytes = max;
        self
    }

    /// Disable the buffer cap.
    pub fn unbounded() -> Self {
        Self {
            max_buffer_bytes: None,
        }
    }

    /// Read from `BRAINSTREAM_MAX_BUFFER_BYTES`, falling back to defaults.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_vars(|name| std::env::var(name).ok())
    }

    fn from_vars<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();
        if let Some(raw) = lookup(ENV_MAX_BUFFER_BYTES) {
            let max = parse_buffer_limit(&raw)?;
            config = config.with_max_buffer_bytes(max);
        }
        Ok(config)
    }
}

/// Parse a buffer limit where `0` means unbounded.
pub fn parse_buffer_limit(raw: &str) -> Result<Option<usize>, ConfigError> {
    let value: usize = raw
        .trim()
        .parse()
        .map_err(|e: std::num::ParseIntError| ConfigError::InvalidValue {
            name: ENV_MAX_BUFFER_BYTES,
            value: raw.to_string(),
            reason: e.to_string(),
        })?;
    Ok(if value == 0 { None } else { Some(value) })
}

/// Settings for the assistant HTTP client.
///
/// # Example
///
/// ```ignore
/// use brainstream::config::ClientConfig;
///
/// let config = ClientConfig::default()
///     .with_base_url("http://localhost:9000")
///     .with_stream_path("/v2/chat/stream");
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct ClientConfig {
    /// Base URL of the assistant server (no trailing slash)
    pub base_url: String,
    /// Path of the streaming chat endpoint
    pub stream_path: String,
    /// Per-stream settings
    pub stream: StreamConfig,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            stream_path: DEFAULT_STREAM_PATH.to_string(),
            stream: StreamConfig::default(),
        }
    }
}

impl ClientConfig {
    /// Create a new ClientConfig with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the base URL. A trailing slash is dropped.
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        let url = url.into();
        self.base_url = url.trim_end_matches('/').to_string();
        self
    }

    /// Set the streaming endpoint path.
    pub fn with_stream_path(mut self, path: impl Into<String>) -> Self {
        let path = path.into();
        self.stream_path = if path.starts_with('/') {
            path
        } else {
            format!("/{}", path)
        };
        self
    }

    /// Set the per-stream settings.
    pub fn with_stream(mut self, stream: StreamConfig) -> Self {
        self.stream = stream;
        self
    }

    /// Full URL of the streaming endpoint.
    pub fn stream_url(&self) -> String {
        format!("{}{}", self.base_url, self.stream_path)
    }

    /// Create config from the `BRAINSTREAM_*` environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_vars(|name| std::env::var(name).ok())
    }

    fn from_vars<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default().with_stream(StreamConfig::from_vars(&lookup)?);
        if let Some(url) = lookup(ENV_BASE_URL) {
            config = config.with_base_url(url);
        }
        if let Some(path) = lookup(ENV_STREAM_PATH) {
            config = config.with_stream_path(path);
        }
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use std::collections::HashMap;

    fn vars(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn test_stream_config_default() {
        let config = StreamConfig::default();
        assert_eq!(config.max_buffer_bytes, Some(DEFAULT_MAX_BUFFER_BYTES));
        assert_eq!(StreamConfig::unbounded().max_buffer_bytes, None);
    }

    #[test]
    fn test_client_config_default() {
        let config = ClientConfig::default();
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.stream_url(), "http://localhost:8000/api/chat/stream");
    }

    #[test]
    fn test_client_config_builder() {
        let config = ClientConfig::new()
            .with_base_url("http://example.com/")
            .with_stream_path("v2/stream")
            .with_stream(StreamConfig::new().with_max_buffer_bytes(Some(1024)));
        assert_eq!(config.stream_url(), "http://example.com/v2/stream");
        assert_eq!(config.stream.max_buffer_bytes, Some(1024));
    }

    #[test]
    fn test_from_vars() {
        let config = ClientConfig::from_vars(vars(&[
            (ENV_BASE_URL, "http://brain:9000"),
            (ENV_STREAM_PATH, "/stream"),
            (ENV_MAX_BUFFER_BYTES, "0"),
        ]))
        .unwrap();
        assert_eq!(config.stream_url(), "http://brain:9000/stream");
        assert_eq!(config.stream.max_buffer_bytes, None);
    }

    #[test]
    fn test_from_vars_invalid_limit() {
        let result = StreamConfig::from_vars(vars(&[(ENV_MAX_BUFFER_BYTES, "lots")]));
        match result {
            Err(ConfigError::InvalidValue { name, value, .. }) => {
                assert_eq!(name, ENV_MAX_BUFFER_BYTES);
                assert_eq!(value, "lots");
            }
            other => panic!("Expected InvalidValue, got {:?}", other),
        }
    }

    #[test]
    fn test_config_error_category() {
        let err = parse_buffer_limit("many").unwrap_err();
        assert_eq!(err.category(), ErrorCategory::Configuration);
        assert!(!err.category().is_retryable());
    }

    #[test]
    fn test_parse_buffer_limit() {
        assert_eq!(parse_buffer_limit("4096"), Ok(Some(4096)));
        assert_eq!(parse_buffer_limit(" 0 "), Ok(None));
        assert!(parse_buffer_limit("-1").is_err());
    }

    #[test]
    #[serial]
    fn test_from_env() {
        std::env::set_var(ENV_BASE_URL, "http://env-host:1234");
        std::env::remove_var(ENV_STREAM_PATH);
        std::env::remove_var(ENV_MAX_BUFFER_BYTES);

        let config = ClientConfig::from_env().unwrap();
        assert_eq!(config.stream_url(), "http://env-host:1234/api/chat/stream");
        assert_eq!(config.stream, StreamConfig::default());

        std::env::remove_var(ENV_BASE_URL);
    }
}
