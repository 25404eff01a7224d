//! SSE event type definitions
//!
//! Contains the typed application events carried by the assistant stream,
//! the line classification used while parsing event blocks, and the
//! per-block parse error.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Payload of the terminal `final` event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FinalPayload {
    /// Name of the agent that produced the answer (e.g. "Brain")
    pub agent: String,
    /// Full answer text
    pub content: String,
    /// Suggested follow-up actions
    pub next_actions: Vec<String>,
    /// Assumptions the agent made while answering
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assumptions: Option<Vec<String>>,
}

/// Typed events from the assistant stream.
///
/// The wire discriminant is the JSON `type` field. Unknown discriminants fail
/// to deserialize and the block carrying them is skipped.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum StreamEvent {
    /// Incremental text chunk
    Delta { content: String },
    /// A tool invocation began. Any argument fields on the wire are dropped.
    ToolStart { tool: String },
    /// Sanitized tool outcome
    ToolResult {
        tool: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        data: Option<serde_json::Value>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        explainability: Option<serde_json::Value>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        error: Option<bool>,
    },
    /// Terminal event; at most one is dispatched per stream
    Final { payload: FinalPayload },
}

impl StreamEvent {
    /// Returns the wire `type` tag of this event.
    pub fn event_type_name(&self) -> &'static str {
        match self {
            StreamEvent::Delta { .. } => "delta",
            StreamEvent::ToolStart { .. } => "tool_start",
            StreamEvent::ToolResult { .. } => "tool_result",
            StreamEvent::Final { .. } => "final",
        }
    }

    /// Whether this is the terminal `final` event.
    pub fn is_final(&self) -> bool {
        matches!(self, StreamEvent::Final { .. })
    }
}

/// Represents a parsed SSE line
#[derive(Debug, Clone, PartialEq)]
pub enum SseLine {
    /// Data payload (e.g., "data: {\"type\": \"delta\"}")
    Data(String),
    /// Any other labeled field (`event`, `id`, `retry`, unknown labels)
    Field { name: String, value: String },
    /// Comment line (starts with ':')
    Comment(String),
    /// Blank line
    Empty,
}

/// Errors that can occur while turning one event block into an event.
///
/// These are recoverable: the block is skipped and the stream continues.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SseParseError {
    /// The joined `data:` payload is not a valid event
    #[error("Invalid JSON in event data: {reason}")]
    InvalidJson { reason: String },
}
