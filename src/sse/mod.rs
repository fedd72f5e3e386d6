//! SSE (Server-Sent Events) stream decoder
//!
//! Decodes the `/query/stream` answer body.
//! SSE format consists of:
//! - `event: <name>` - event name line (`token`, `meta`, `error`, `done`)
//! - `data: <text>` - data payload line, possibly repeated
//! - Empty line - signals end of event
//! - Lines starting with `:` - comments (ignored)
//!
//! # Module structure
//! - `events` - [`StreamEvent`] and [`LineKind`]
//! - `parser` - pure [`classify`] / [`reduce`] state machine
//! - `decoder` - [`SseDecoder`], reassembles lines across chunks
//! - `stream` - [`decode_stream`], byte stream to event stream with failure handling

mod decoder;
mod events;
mod parser;
mod stream;

pub use decoder::SseDecoder;
pub use events::{LineKind, StreamEvent, EVENT_DONE, EVENT_ERROR, EVENT_META, EVENT_TOKEN};
pub use parser::{classify, dispatch, reduce, DecoderState};
pub use stream::{decode_stream, failed_stream, EventStream, DEFAULT_IDLE_TIMEOUT};
