//! Streaming-related error types.
//!
//! These are the fatal outcomes of consuming an assistant stream. Malformed
//! individual events are not errors at this level: they are skipped.

use thiserror::Error;

use super::category::ErrorCategory;
use crate::traits::HttpError;

/// Fatal stream error variants.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum StreamError {
    /// Server answered with a non-success status.
    #[error("Server error ({status}): {message}")]
    Http { status: u16, message: String },

    /// Response carried no readable body.
    #[error("Response has no readable body")]
    MissingBody,

    /// Transport failed while the body was being read.
    #[error("Stream connection lost: {message}")]
    ConnectionLost { message: String },

    /// Unterminated event data grew past the configured limit.
    #[error("Stream buffer exceeded {limit} bytes ({buffered} bytes without an event separator)")]
    BufferOverflow { limit: usize, buffered: usize },

    /// The request could not be delivered.
    #[error("Request failed: {message}")]
    Request { message: String },

    /// The request could not be built.
    #[error("Invalid request: {message}")]
    InvalidRequest { message: String },
}

impl StreamError {
    /// Get the category of this error.
    pub fn category(&self) -> ErrorCategory {
        match self {
            StreamError::Http { status, .. } if *status >= 500 => ErrorCategory::Server,
            StreamError::Http { .. } => ErrorCategory::Client,
            StreamError::MissingBody | StreamError::BufferOverflow { .. } => {
                ErrorCategory::Protocol
            }
            StreamError::ConnectionLost { .. } | StreamError::Request { .. } => {
                ErrorCategory::Network
            }
            StreamError::InvalidRequest { .. } => ErrorCategory::Client,
        }
    }

    /// Check if this error is likely transient.
    pub fn is_retryable(&self) -> bool {
        self.category().is_retryable()
    }

    /// Get a user-friendly error message.
    pub fn user_message(&self) -> String {
        match self {
            StreamError::Http { status, .. } => {
                format!("The assistant request failed with status {}.", status)
            }
            StreamError::MissingBody => "The assistant sent an empty response.".to_string(),
            StreamError::ConnectionLost { .. } => {
                "Connection to the assistant was lost mid-response.".to_string()
            }
            StreamError::BufferOverflow { limit, .. } => {
                format!(
                    "The assistant response exceeded {} bytes without completing an event.",
                    limit
                )
            }
            StreamError::Request { .. } => "Could not reach the assistant server.".to_string(),
            StreamError::InvalidRequest { message } => format!("Invalid request: {}", message),
        }
    }

    /// Get a short error code for logging.
    pub fn error_code(&self) -> &'static str {
        match self {
            StreamError::Http { .. } => "E_STREAM_HTTP",
            StreamError::MissingBody => "E_STREAM_NO_BODY",
            StreamError::ConnectionLost { .. } => "E_STREAM_CONN",
            StreamError::BufferOverflow { .. } => "E_STREAM_OVERFLOW",
            StreamError::Request { .. } => "E_STREAM_REQUEST",
            StreamError::InvalidRequest { .. } => "E_STREAM_INVALID",
        }
    }
}

impl From<HttpError> for StreamError {
    /// Convert an error raised while opening the stream.
    fn from(err: HttpError) -> Self {
        match err {
            HttpError::ServerError { status, message } => StreamError::Http { status, message },
            HttpError::MissingBody => StreamError::MissingBody,
            HttpError::Io(message) => StreamError::ConnectionLost { message },
            other => StreamError::Request {
                message: other.to_string(),
            },
        }
    }
}

impl From<serde_json::Error> for StreamError {
    fn from(err: serde_json::Error) -> Self {
        StreamError::InvalidRequest {
            message: err.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_http_status_categories() {
        let server = StreamError::Http {
            status: 503,
            message: "unavailable".to_string(),
        };
        assert_eq!(server.category(), ErrorCategory::Server);
        assert!(server.is_retryable());

        let client = StreamError::Http {
            status: 400,
            message: "bad request".to_string(),
        };
        assert_eq!(client.category(), ErrorCategory::Client);
        assert!(!client.is_retryable());
        assert_eq!(client.error_code(), "E_STREAM_HTTP");
    }

    #[test]
    fn test_protocol_errors_not_retryable() {
        assert_eq!(StreamError::MissingBody.category(), ErrorCategory::Protocol);
        let overflow = StreamError::BufferOverflow {
            limit: 16,
            buffered: 32,
        };
        assert!(!overflow.is_retryable());
        assert!(overflow.user_message().contains("16 bytes"));
        assert_eq!(overflow.error_code(), "E_STREAM_OVERFLOW");
    }

    #[test]
    fn test_connection_lost_is_retryable() {
        let err = StreamError::ConnectionLost {
            message: "reset by peer".to_string(),
        };
        assert!(err.is_retryable());
        assert_eq!(err.error_code(), "E_STREAM_CONN");
    }

    #[test]
    fn test_display_format() {
        let err = StreamError::Http {
            status: 500,
            message: "Internal Server Error".to_string(),
        };
        let display = format!("{}", err);
        assert!(display.contains("500"));
        assert!(display.contains("Internal Server Error"));
    }

    #[test]
    fn test_from_http_error() {
        let err: StreamError = HttpError::ServerError {
            status: 502,
            message: "bad gateway".to_string(),
        }
        .into();
        assert_eq!(
            err,
            StreamError::Http {
                status: 502,
                message: "bad gateway".to_string()
            }
        );

        let err: StreamError = HttpError::MissingBody.into();
        assert_eq!(err, StreamError::MissingBody);

        let err: StreamError = HttpError::ConnectionFailed("refused".to_string()).into();
        assert!(matches!(err, StreamError::Request { .. }));
    }
}
