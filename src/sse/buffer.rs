//! Event block buffering.
//!
//! Decoded text is appended as it arrives; complete blocks are cut off at
//! each blank-line separator and the unterminated remainder stays buffered
//! until a later chunk (or end of stream) completes it.

use crate::error::StreamError;

/// Separator between event blocks
const BLOCK_SEPARATOR: &str = "\n\n";

/// Growable text buffer holding not-yet-terminated event data.
#[derive(Debug, Default)]
pub struct BlockBuffer {
    buffer: String,
    /// Upper bound on unterminated data, `None` for unbounded
    max_bytes: Option<usize>,
    /// No separator starts before this offset
    scan_from: usize,
}

impl BlockBuffer {
    /// Create an unbounded buffer
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a buffer that rejects more than `max_bytes` of unterminated data
    pub fn with_limit(max_bytes: Option<usize>) -> Self {
        Self {
            buffer: String::new(),
            max_bytes,
            scan_from: 0,
        }
    }

    /// Append decoded text, normalizing CRLF line endings to LF.
    ///
    /// A `\r` left at the end of the previous append is joined with a
    /// leading `\n` here, so the result does not depend on chunk edges.
    pub fn push_str(&mut self, text: &str) {
        let start = if self.buffer.ends_with('\r') {
            self.buffer.len() - 1
        } else {
            self.buffer.len()
        };
        let needs_normalizing = start < self.buffer.len() || text.contains('\r');

        self.buffer.push_str(text);

        if needs_normalizing {
            let tail = self.buffer.split_off(start);
            self.buffer.push_str(&tail.replace("\r\n", "\n"));
        }
    }

    /// Remove and return every complete block, in order.
    ///
    /// Whatever follows the last separator (possibly nothing) is kept. Each
    /// call only scans text appended since the previous one.
    pub fn extract_blocks(&mut self) -> Vec<String> {
        let mut blocks = Vec::new();
        let mut start = 0;
        let mut search_from = self.scan_from;

        while let Some(pos) = self.buffer[search_from..].find(BLOCK_SEPARATOR) {
            let end = search_from + pos;
            blocks.push(self.buffer[start..end].to_string());
            start = end + BLOCK_SEPARATOR.len();
            search_from = start;
        }

        if start > 0 {
            self.buffer.drain(..start);
        }

        // A separator may straddle the next append
        let mut resume = self
            .buffer
            .len()
            .saturating_sub(BLOCK_SEPARATOR.len() - 1);
        while !self.buffer.is_char_boundary(resume) {
            resume -= 1;
        }
        self.scan_from = resume;

        blocks
    }

    /// Fail if the unterminated remainder exceeds the configured limit.
    pub fn check_limit(&self) -> Result<(), StreamError> {
        match self.max_bytes {
            Some(limit) if self.buffer.len() > limit => Err(StreamError::BufferOverflow {
                limit,
                buffered: self.buffer.len(),
            }),
            _ => Ok(()),
        }
    }

    /// Drain the remaining (unterminated) data.
    pub fn take_residue(&mut self) -> String {
        self.scan_from = 0;
        std::mem::take(&mut self.buffer)
    }

    /// Remaining (unterminated) data
    pub fn residue(&self) -> &str {
        &self.buffer
    }

    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }
}
