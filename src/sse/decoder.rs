//! Incremental chunk decoder.
//!
//! Reassembles lines across arbitrary chunk boundaries and feeds them through
//! [`classify`](super::classify) and [`reduce`](super::reduce).

use super::events::StreamEvent;
use super::parser::{classify, reduce, DecoderState};

/// Stateful SSE decoder fed with raw body chunks.
///
/// Bytes are buffered until a `\n` arrives, so a multi-byte UTF-8 character
/// split across chunks is decoded intact. After a `done` event the decoder
/// is finished: any buffered or later input is dropped.
#[derive(Debug, Default)]
pub struct SseDecoder {
    /// Bytes of the current, not yet terminated line
    buffer: Vec<u8>,
    /// Event accumulator
    state: DecoderState,
    /// Set once `done` has been decoded
    finished: bool,
}

impl SseDecoder {
    /// Create a new decoder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed a chunk and return every event it completes, in wire order.
    ///
    /// Returns an empty vector once the decoder is finished.
    pub fn feed(&mut self, chunk: &[u8]) -> Vec<StreamEvent> {
        let mut events = Vec::new();
        if self.finished {
            return events;
        }

        self.buffer.extend_from_slice(chunk);

        let mut consumed = 0;
        while let Some(pos) = self.buffer[consumed..].iter().position(|b| *b == b'\n') {
            let end = consumed + pos;
            let line = String::from_utf8_lossy(&self.buffer[consumed..end]).into_owned();
            consumed = end + 1;

            if let Some(event) = self.feed_line(&line) {
                events.push(event);
                if self.finished {
                    break;
                }
            }
        }

        if self.finished {
            self.buffer.clear();
        } else {
            self.buffer.drain(..consumed);
        }
        events
    }

    /// Feed one complete line (without its terminator).
    pub fn feed_line(&mut self, line: &str) -> Option<StreamEvent> {
        if self.finished {
            return None;
        }

        let state = std::mem::take(&mut self.state);
        let (state, event) = reduce(state, classify(line));
        self.state = state;

        if let Some(event) = &event {
            tracing::debug!("Decoded SSE event: {}", event.event_type_name());
            if event.is_terminal() {
                self.finished = true;
            }
        }
        event
    }

    /// End of input. A trailing line without a terminator is discarded, as
    /// is any event still being accumulated. Returns the number of discarded
    /// bytes.
    pub fn finish(&mut self) -> usize {
        let discarded = self.buffer.len();
        if discarded > 0 {
            tracing::debug!("Discarding {} bytes of unterminated SSE input", discarded);
        }
        self.buffer.clear();
        self.state = DecoderState::default();
        self.finished = true;
        discarded
    }

    /// True once `done` was decoded or [`finish`](Self::finish) was called.
    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// Number of buffered bytes waiting for a line terminator.
    pub fn pending_bytes(&self) -> usize {
        self.buffer.len()
    }

    /// Reset the decoder for reuse.
    pub fn reset(&mut self) {
        self.buffer.clear();
        self.state = DecoderState::default();
        self.finished = false;
    }
}
