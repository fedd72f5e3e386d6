//! Byte stream to event stream adapter.

use futures::stream::{self, Stream, StreamExt};
use std::collections::VecDeque;
use std::pin::Pin;
use std::time::Duration;

use super::decoder::SseDecoder;
use super::events::StreamEvent;
use crate::traits::{ByteStream, HttpError};

/// Default idle timeout between body chunks.
pub const DEFAULT_IDLE_TIMEOUT: Duration = Duration::from_secs(300);

/// Lazy, finite, non-restartable sequence of decoded events.
pub type EventStream = Pin<Box<dyn Stream<Item = StreamEvent> + Send>>;

struct DecodeState {
    /// Open body; `None` once the connection is released
    bytes: Option<ByteStream>,
    decoder: SseDecoder,
    pending: VecDeque<StreamEvent>,
    idle_timeout: Duration,
}

/// Decode an SSE response body into [`StreamEvent`]s.
///
/// Events are yielded as soon as each one is complete. The stream ends after
/// `done`, when the body ends, or after a single `Error` event if the body
/// fails or stays silent for longer than `idle_timeout`. The body is dropped
/// (closing the connection) as soon as no more input will be read.
pub fn decode_stream(bytes: ByteStream, idle_timeout: Duration) -> EventStream {
    let state = DecodeState {
        bytes: Some(bytes),
        decoder: SseDecoder::new(),
        pending: VecDeque::new(),
        idle_timeout,
    };

    let events = stream::unfold(state, |mut st| async move {
        loop {
            if let Some(event) = st.pending.pop_front() {
                return Some((event, st));
            }

            if st.decoder.is_finished() {
                st.bytes = None;
            }
            let bytes = st.bytes.as_mut()?;

            match tokio::time::timeout(st.idle_timeout, bytes.next()).await {
                Ok(Some(Ok(chunk))) => {
                    let events = st.decoder.feed(&chunk);
                    st.pending.extend(events);
                }
                Ok(Some(Err(err))) => {
                    tracing::warn!("SSE body failed mid-stream: {}", err);
                    st.bytes = None;
                    st.decoder.finish();
                    st.pending.push_back(StreamEvent::Error(describe_body_error(&err)));
                }
                Ok(None) => {
                    tracing::debug!("SSE body ended");
                    st.bytes = None;
                    st.decoder.finish();
                }
                Err(_) => {
                    tracing::warn!(
                        "No SSE data for {}s, closing stream",
                        st.idle_timeout.as_secs()
                    );
                    st.bytes = None;
                    st.decoder.finish();
                    st.pending.push_back(StreamEvent::Error(format!(
                        "Stream timed out after {}s without data",
                        st.idle_timeout.as_secs()
                    )));
                }
            }
        }
    });

    Box::pin(events)
}

/// A stream that reports one error and ends, for attempts that never
/// produced a body.
pub fn failed_stream(message: impl Into<String>) -> EventStream {
    Box::pin(stream::once(futures::future::ready(StreamEvent::Error(
        message.into(),
    ))))
}

fn describe_body_error(err: &HttpError) -> String {
    match err {
        HttpError::Timeout(_) => "Stream timed out while reading the response".to_string(),
        other => format!("Stream interrupted: {}", other),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bytes::Bytes;

    fn body(chunks: Vec<Result<Bytes, HttpError>>) -> ByteStream {
        Box::pin(stream::iter(chunks))
    }

    fn ok(text: &str) -> Result<Bytes, HttpError> {
        Ok(Bytes::from(text.to_string()))
    }

    #[tokio::test]
    async fn test_decodes_across_chunks() {
        let events: Vec<_> = decode_stream(
            body(vec![
                ok("event: tok"),
                ok("en\ndata: Hel"),
                ok("lo\n\nevent: done\ndata: [DONE]\n\n"),
            ]),
            DEFAULT_IDLE_TIMEOUT,
        )
        .collect()
        .await;

        assert_eq!(
            events,
            vec![StreamEvent::Token("Hello".into()), StreamEvent::Done]
        );
    }

    #[tokio::test]
    async fn test_stops_reading_after_done() {
        // A body that would fail if read past `done`.
        let events: Vec<_> = decode_stream(
            body(vec![
                ok("event: done\ndata: [DONE]\n\n"),
                Err(HttpError::Io("should not be read".into())),
            ]),
            DEFAULT_IDLE_TIMEOUT,
        )
        .collect()
        .await;

        assert_eq!(events, vec![StreamEvent::Done]);
    }

    #[tokio::test]
    async fn test_mid_stream_failure_yields_one_error() {
        let events: Vec<_> = decode_stream(
            body(vec![
                ok("event: token\ndata: partial\n\n"),
                Err(HttpError::Io("connection reset".into())),
                ok("event: token\ndata: never\n\n"),
            ]),
            DEFAULT_IDLE_TIMEOUT,
        )
        .collect()
        .await;

        assert_eq!(events.len(), 2);
        assert_eq!(events[0], StreamEvent::Token("partial".into()));
        match &events[1] {
            StreamEvent::Error(message) => assert!(message.contains("connection reset")),
            other => panic!("Expected error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_zero_byte_body_ends_without_events() {
        let events: Vec<_> = decode_stream(body(vec![]), DEFAULT_IDLE_TIMEOUT)
            .collect()
            .await;
        assert!(events.is_empty());
    }

    #[tokio::test]
    async fn test_trailing_partial_event_not_flushed() {
        let events: Vec<_> = decode_stream(
            body(vec![ok("event: token\ndata: A\n\nevent: token\ndata: B")]),
            DEFAULT_IDLE_TIMEOUT,
        )
        .collect()
        .await;
        assert_eq!(events, vec![StreamEvent::Token("A".into())]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_idle_timeout_yields_error() {
        let silent: ByteStream = Box::pin(
            stream::iter(vec![ok("event: token\ndata: A\n\n")]).chain(stream::pending()),
        );

        let events: Vec<_> = decode_stream(silent, Duration::from_secs(300))
            .collect()
            .await;

        assert_eq!(events.len(), 2);
        assert_eq!(events[0], StreamEvent::Token("A".into()));
        assert!(matches!(&events[1], StreamEvent::Error(m) if m.contains("300s")));
    }

    #[tokio::test]
    async fn test_failed_stream_single_error() {
        let events: Vec<_> = failed_stream("Backend unreachable").collect().await;
        assert_eq!(events, vec![StreamEvent::Error("Backend unreachable".into())]);
    }
}
