//! Common test utilities for integration tests.
//!
//! # Example
//!
//! ```ignore
//! use common::{collect_events, conversation_body};
//!
//! let (events, stats) = collect_events(byte_chunks(&conversation_body())).await;
//! ```

#![allow(dead_code)]

pub mod fixtures;

pub use fixtures::*;

use brainstream::prelude::*;
use bytes::Bytes;
use futures::stream;

/// Consume in-memory chunks with a fresh token and return what was dispatched.
pub async fn collect_events(chunks: Vec<Bytes>) -> (Vec<StreamEvent>, StreamStats) {
    collect_events_with_config(chunks, &StreamConfig::default()).await
}

pub async fn collect_events_with_config(
    chunks: Vec<Bytes>,
    config: &StreamConfig,
) -> (Vec<StreamEvent>, StreamStats) {
    let body = stream::iter(chunks.into_iter().map(Ok::<Bytes, std::io::Error>));
    let mut events = Vec::new();
    let stats = consume_with_config(body, |e| events.push(e), &CancellationToken::new(), config)
        .await
        .expect("stream should complete");
    (events, stats)
}
