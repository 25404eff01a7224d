//! Error category classification.
//!
//! Groups fatal stream errors into a few high-level kinds so callers can
//! decide how to report them without matching every variant.

use std::fmt;

/// High-level categorization of errors for handling decisions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCategory {
    /// Connection failures and mid-stream disconnects.
    /// Generally transient.
    Network,

    /// Backend errors (HTTP 5xx).
    /// Generally transient.
    Server,

    /// The server violated the stream protocol (no body, runaway block).
    Protocol,

    /// The request itself was rejected or could not be built (HTTP 4xx).
    Client,

    /// Invalid settings or environment values.
    Configuration,
}

impl ErrorCategory {
    /// Returns true if errors in this category are generally transient.
    ///
    /// This is advisory only; the stream consumer never retries on its own.
    pub fn is_retryable(&self) -> bool {
        matches!(self, ErrorCategory::Network | ErrorCategory::Server)
    }

    /// Returns a short label for the category suitable for logging.
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCategory::Network => "network",
            ErrorCategory::Server => "server",
            ErrorCategory::Protocol => "protocol",
            ErrorCategory::Client => "client",
            ErrorCategory::Configuration => "configuration",
        }
    }

    /// Returns suggested recovery actions for this category.
    pub fn recovery_hint(&self) -> &'static str {
        match self {
            ErrorCategory::Network => "Check the connection to the assistant server and try again",
            ErrorCategory::Server => {
                "The server may be experiencing issues. Please try again later"
            }
            ErrorCategory::Protocol => "The server sent a malformed stream",
            ErrorCategory::Client => "Check the request and try again",
            ErrorCategory::Configuration => "Check your configuration settings",
        }
    }
}

impl fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
