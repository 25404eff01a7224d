//! Prelude module for convenient imports.
//!
//! # Usage
//!
//! ```ignore
//! use brainstream::prelude::*;
//! ```

// Client and configuration
pub use crate::client::{AssistantClient, EventStream};
pub use crate::config::{ClientConfig, StreamConfig};

// Models
pub use crate::models::{ChatMessage, ChatRequest, Role};

// Reassembly
pub use crate::reassembler::{consume, consume_with_config, event_stream, StreamReassembler, StreamStats};
pub use crate::sse::{FinalPayload, StreamEvent};

// Errors
pub use crate::error::{ErrorCategory, StreamError};

// Cancellation
pub use tokio_util::sync::CancellationToken;
