//! Incremental UTF-8 decoding for chunked byte streams.
//!
//! Transport chunks carry no guarantee about character boundaries, so a
//! multi-byte sequence may arrive split across two reads. The decoder holds
//! back an incomplete trailing sequence until the next chunk completes it.

/// Replacement emitted for invalid or truncated sequences.
const REPLACEMENT: char = '\u{FFFD}';

/// Stateful UTF-8 decoder owned by a single stream.
///
/// Must be fed chunks in arrival order. Invalid sequences are replaced with
/// U+FFFD rather than failing the stream.
#[derive(Debug, Default)]
pub struct Utf8Decoder {
    /// Bytes of an incomplete trailing sequence (at most 3)
    pending: Vec<u8>,
}

impl Utf8Decoder {
    /// Create a new decoder with no pending bytes
    pub fn new() -> Self {
        Self::default()
    }

    /// Decode a chunk, carrying an incomplete trailing sequence forward.
    pub fn decode(&mut self, chunk: &[u8]) -> String {
        let mut bytes = std::mem::take(&mut self.pending);
        bytes.extend_from_slice(chunk);

        let mut out = String::with_capacity(bytes.len());
        let mut rest: &[u8] = &bytes;

        loop {
            match std::str::from_utf8(rest) {
                Ok(text) => {
                    out.push_str(text);
                    break;
                }
                Err(e) => {
                    let valid = e.valid_up_to();
                    // `valid_up_to` marks a prefix that is always valid UTF-8
                    out.push_str(&String::from_utf8_lossy(&rest[..valid]));
                    match e.error_len() {
                        Some(len) => {
                            out.push(REPLACEMENT);
                            rest = &rest[valid + len..];
                        }
                        None => {
                            // Truncated sequence at the end: wait for more bytes
                            self.pending = rest[valid..].to_vec();
                            break;
                        }
                    }
                }
            }
        }

        out
    }

    /// Flush at end of input.
    ///
    /// A sequence that never completed becomes a single replacement character.
    pub fn finish(&mut self) -> String {
        if self.pending.is_empty() {
            String::new()
        } else {
            self.pending.clear();
            REPLACEMENT.to_string()
        }
    }

    /// Whether an incomplete sequence is waiting for more bytes
    pub fn has_pending(&self) -> bool {
        !self.pending.is_empty()
    }
}
