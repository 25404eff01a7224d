//! Error handling for brainstream.
//!
//! Two tiers of failure exist while consuming an assistant stream:
//!
//! | Tier | Type | Effect |
//! |------|------|--------|
//! | Fatal | [`StreamError`] | The whole call fails |
//! | Recoverable | [`crate::sse::SseParseError`] | The block is skipped, the stream continues |
//!
//! Cancellation is neither: it ends the call cleanly.

mod category;
mod stream;

pub use category::ErrorCategory;
pub use stream::StreamError;
