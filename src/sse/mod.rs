//! SSE (Server-Sent Events) stream parsing
//!
//! Parses the assistant's event stream. The wire format consists of:
//! - `data: <json>` - data payload line(s), joined with `\n` when repeated
//! - Empty line - signals end of an event block
//! - Lines starting with `:` - comments (ignored)
//! - Other labels (`event:`, `id:`, `retry:`) - accepted and ignored
//!
//! # Module structure
//! - `events` - Event type definitions (StreamEvent, FinalPayload, SseLine, SseParseError)
//! - `decoder` - Incremental UTF-8 decoding across chunk boundaries
//! - `buffer` - Block buffering and extraction
//! - `parser` - Block and line parsing (parse_block, parse_sse_line)

mod buffer;
mod decoder;
mod events;
mod parser;

// Re-export public types
pub use buffer::BlockBuffer;
pub use decoder::Utf8Decoder;
pub use events::{FinalPayload, SseLine, SseParseError, StreamEvent};
pub use parser::{extract_block_data, parse_block, parse_event, parse_sse_line};
