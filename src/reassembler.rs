//! Stream reassembly: raw body chunks in, ordered typed events out.
//!
//! A [`StreamReassembler`] owns everything a single response needs (decoder,
//! block buffer, final-event flag) and nothing else, so any number of streams
//! can be consumed concurrently. [`consume`] drives one over a byte stream
//! with a callback; [`event_stream`] exposes the same procedure as a
//! pull-based [`Stream`].
//!
//! Per block the policy is best-effort: blocks without `data:` are ignored,
//! blocks that fail to parse are skipped with a warning, and after the first
//! `final` event nothing else is parsed or dispatched.

use std::collections::VecDeque;
use std::fmt::Display;
use std::pin::Pin;

use futures::stream::{self, Stream, StreamExt};
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::config::StreamConfig;
use crate::error::StreamError;
use crate::sse::{parse_block, BlockBuffer, StreamEvent, Utf8Decoder};

/// Counters describing one consumed stream.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StreamStats {
    /// Body chunks read
    pub chunks: usize,
    /// Body bytes read
    pub bytes: usize,
    /// Events handed to the consumer
    pub events_dispatched: usize,
    /// Blocks whose data failed to parse
    pub blocks_skipped: usize,
    /// Non-empty blocks dropped because `final` was already dispatched
    pub blocks_ignored_after_final: usize,
    /// Whether the `final` event was dispatched
    pub final_received: bool,
    /// Whether consumption stopped because of cancellation
    pub cancelled: bool,
}

/// Per-stream reassembly state.
#[derive(Debug)]
pub struct StreamReassembler {
    buffer: BlockBuffer,
    decoder: Utf8Decoder,
    stats: StreamStats,
    /// Once fired, no further events are dispatched
    cancel: Option<CancellationToken>,
}

impl Default for StreamReassembler {
    fn default() -> Self {
        Self::new()
    }
}

impl StreamReassembler {
    /// Create a reassembler with the default configuration
    pub fn new() -> Self {
        Self::with_config(&StreamConfig::default())
    }

    pub fn with_config(config: &StreamConfig) -> Self {
        Self {
            buffer: BlockBuffer::with_limit(config.max_buffer_bytes),
            decoder: Utf8Decoder::new(),
            stats: StreamStats::default(),
            cancel: None,
        }
    }

    /// Stop dispatching as soon as `cancel` fires, even mid-chunk.
    pub fn with_cancellation(mut self, cancel: CancellationToken) -> Self {
        self.cancel = Some(cancel);
        self
    }

    /// Feed one body chunk, dispatching every event it completes.
    ///
    /// Fails only when the unterminated remainder outgrows the configured
    /// buffer limit; events completed by this chunk are dispatched first.
    pub fn feed<F>(&mut self, chunk: &[u8], on_event: &mut F) -> Result<(), StreamError>
    where
        F: FnMut(StreamEvent),
    {
        self.stats.chunks += 1;
        self.stats.bytes += chunk.len();

        let text = self.decoder.decode(chunk);
        self.buffer.push_str(&text);

        for block in self.buffer.extract_blocks() {
            self.process_block(&block, on_event);
        }

        self.buffer.check_limit()
    }

    /// Flush at end of input.
    ///
    /// Whatever remains buffered is treated as a final block even though no
    /// blank line terminated it.
    pub fn finish<F>(&mut self, on_event: &mut F)
    where
        F: FnMut(StreamEvent),
    {
        let tail = self.decoder.finish();
        self.buffer.push_str(&tail);

        let mut blocks = self.buffer.extract_blocks();
        blocks.push(self.buffer.take_residue());

        for block in blocks {
            self.process_block(&block, on_event);
        }
    }

    pub fn final_received(&self) -> bool {
        self.stats.final_received
    }

    pub fn stats(&self) -> &StreamStats {
        &self.stats
    }

    /// Bytes of event data waiting for a block separator
    pub fn buffered_len(&self) -> usize {
        self.buffer.len()
    }

    fn is_cancelled(&self) -> bool {
        self.cancel.as_ref().is_some_and(|c| c.is_cancelled())
    }

    fn process_block<F>(&mut self, block: &str, on_event: &mut F)
    where
        F: FnMut(StreamEvent),
    {
        if self.is_cancelled() {
            return;
        }

        if self.stats.final_received {
            if !block.trim().is_empty() {
                self.stats.blocks_ignored_after_final += 1;
                debug!("Ignoring event block received after final");
            }
            return;
        }

        match parse_block(block) {
            Ok(Some(event)) => {
                let is_final = event.is_final();
                self.stats.events_dispatched += 1;
                on_event(event);
                if is_final {
                    self.stats.final_received = true;
                }
            }
            Ok(None) => {}
            Err(e) => {
                self.stats.blocks_skipped += 1;
                warn!(error = %e, "Skipping malformed event block");
            }
        }
    }

    fn into_stats(self, cancelled: bool) -> StreamStats {
        let mut stats = self.stats;
        stats.cancelled = cancelled;
        stats
    }
}

/// Consume a response body, dispatching events in arrival order.
///
/// Uses the default [`StreamConfig`]. See [`consume_with_config`].
pub async fn consume<S, B, E, F>(
    stream: S,
    on_event: F,
    cancel: &CancellationToken,
) -> Result<StreamStats, StreamError>
where
    S: Stream<Item = Result<B, E>>,
    B: AsRef<[u8]>,
    E: Display,
    F: FnMut(StreamEvent),
{
    consume_with_config(stream, on_event, cancel, &StreamConfig::default()).await
}

/// Consume a response body with explicit configuration.
///
/// Reads one chunk at a time. Cancellation is checked before every read and
/// also interrupts a read that is already waiting; it is not an error, the
/// returned stats have `cancelled` set. The body stream is owned here and
/// dropped on every exit path, releasing the underlying connection.
///
/// # Errors
/// - [`StreamError::ConnectionLost`] if the body fails mid-read
/// - [`StreamError::BufferOverflow`] if unterminated data outgrows the limit
pub async fn consume_with_config<S, B, E, F>(
    stream: S,
    mut on_event: F,
    cancel: &CancellationToken,
    config: &StreamConfig,
) -> Result<StreamStats, StreamError>
where
    S: Stream<Item = Result<B, E>>,
    B: AsRef<[u8]>,
    E: Display,
    F: FnMut(StreamEvent),
{
    let mut stream = std::pin::pin!(stream);
    let mut reassembler = StreamReassembler::with_config(config).with_cancellation(cancel.clone());

    loop {
        if cancel.is_cancelled() {
            debug!("Stream consumption cancelled");
            return Ok(reassembler.into_stats(true));
        }

        let next = tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                debug!("Stream consumption cancelled while waiting for data");
                return Ok(reassembler.into_stats(true));
            }
            next = stream.next() => next,
        };

        match next {
            Some(Ok(chunk)) => reassembler.feed(chunk.as_ref(), &mut on_event)?,
            Some(Err(e)) => {
                return Err(StreamError::ConnectionLost {
                    message: e.to_string(),
                });
            }
            None => {
                reassembler.finish(&mut on_event);
                let stats = reassembler.into_stats(cancel.is_cancelled());
                debug!(
                    events = stats.events_dispatched,
                    malformed = stats.blocks_skipped,
                    final_received = stats.final_received,
                    "Stream finished"
                );
                return Ok(stats);
            }
        }
    }
}

struct EventStreamState<S> {
    stream: Pin<Box<S>>,
    reassembler: StreamReassembler,
    pending: VecDeque<StreamEvent>,
    failure: Option<StreamError>,
    cancel: CancellationToken,
    done: bool,
}

/// Pull-based counterpart of [`consume_with_config`].
///
/// Yields events in arrival order and ends after end of input or
/// cancellation. A fatal error is yielded once, after the events that
/// preceded it, and then the stream ends.
pub fn event_stream<S, B, E>(
    stream: S,
    config: StreamConfig,
    cancel: CancellationToken,
) -> impl Stream<Item = Result<StreamEvent, StreamError>>
where
    S: Stream<Item = Result<B, E>>,
    B: AsRef<[u8]>,
    E: Display,
{
    let state = EventStreamState {
        stream: Box::pin(stream),
        reassembler: StreamReassembler::with_config(&config).with_cancellation(cancel.clone()),
        pending: VecDeque::new(),
        failure: None,
        cancel,
        done: false,
    };

    stream::unfold(state, |mut state| async move {
        loop {
            if state.cancel.is_cancelled() {
                return None;
            }
            if let Some(event) = state.pending.pop_front() {
                return Some((Ok(event), state));
            }
            if let Some(err) = state.failure.take() {
                return Some((Err(err), state));
            }
            if state.done {
                return None;
            }

            let next = tokio::select! {
                biased;
                _ = state.cancel.cancelled() => return None,
                next = state.stream.next() => next,
            };

            let pending = &mut state.pending;
            match next {
                Some(Ok(chunk)) => {
                    if let Err(e) = state
                        .reassembler
                        .feed(chunk.as_ref(), &mut |event| pending.push_back(event))
                    {
                        state.failure = Some(e);
                        state.done = true;
                    }
                }
                Some(Err(e)) => {
                    state.failure = Some(StreamError::ConnectionLost {
                        message: e.to_string(),
                    });
                    state.done = true;
                }
                None => {
                    state
                        .reassembler
                        .finish(&mut |event| pending.push_back(event));
                    state.done = true;
                }
            }
        }
    })
}
