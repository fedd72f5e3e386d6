//! Decoder behaviour over whole streams: chunking invariance, multi-line
//! data, `done` termination and lenient meta parsing.

mod common;

use bytes::Bytes;
use futures::StreamExt;
use serde_json::json;
use std::time::Duration;

use common::sse_body;
use ragdesk::sse::{decode_stream, SseDecoder, StreamEvent};
use ragdesk::traits::{ByteStream, HttpError};

fn decode_chunks(chunks: &[&[u8]]) -> Vec<StreamEvent> {
    let mut decoder = SseDecoder::new();
    let mut events = Vec::new();
    for chunk in chunks {
        events.extend(decoder.feed(chunk));
    }
    decoder.finish();
    events
}

fn body_stream(items: Vec<Result<Bytes, HttpError>>) -> ByteStream {
    Box::pin(futures::stream::iter(items))
}

#[test]
fn test_token_order_survives_any_chunking() {
    let body = sse_body(&[
        ("token", "The "),
        ("token", "quick "),
        ("meta", r#"{"citations":[]}"#),
        ("token", "fox"),
        ("done", "[DONE]"),
    ]);
    let bytes = body.as_bytes();
    let expected = decode_chunks(&[bytes]);
    assert_eq!(
        expected
            .iter()
            .filter(|e| matches!(e, StreamEvent::Token(_)))
            .count(),
        3
    );

    for size in 1..=bytes.len() {
        let chunks: Vec<&[u8]> = bytes.chunks(size).collect();
        assert_eq!(decode_chunks(&chunks), expected, "chunk size {}", size);
    }
}

#[test]
fn test_multiline_data_joined_with_newline() {
    let events = decode_chunks(&[b"event: token\ndata: Hello\ndata: World\n\n"]);
    assert_eq!(events, vec![StreamEvent::Token("Hello\nWorld".to_string())]);
}

#[test]
fn test_done_stops_processing() {
    let input = b"event: token\ndata: A\n\nevent: done\ndata: x\n\nevent: token\ndata: B\n\n";
    let events = decode_chunks(&[input]);
    assert_eq!(
        events,
        vec![StreamEvent::Token("A".to_string()), StreamEvent::Done]
    );
}

#[test]
fn test_malformed_meta_passes_raw_text() {
    let events = decode_chunks(&[b"event: meta\ndata: not-json\n\n"]);
    assert_eq!(events, vec![StreamEvent::Meta(json!({"raw": "not-json"}))]);
}

#[test]
fn test_unknown_events_comments_and_junk_are_ignored() {
    let input = b": keep-alive\nevent: progress\ndata: 50%\n\nretry: 1000\nevent: token\ndata: ok\n\n";
    assert_eq!(
        decode_chunks(&[input]),
        vec![StreamEvent::Token("ok".to_string())]
    );
}

#[test]
fn test_unterminated_tail_is_not_flushed() {
    let events = decode_chunks(&[b"event: token\ndata: A\n\nevent: token\ndata: B"]);
    assert_eq!(events, vec![StreamEvent::Token("A".to_string())]);
}

#[tokio::test]
async fn test_decode_stream_yields_error_then_ends_on_drop() {
    let bytes = body_stream(vec![
        Ok(Bytes::from("event: token\ndata: partial\n\n")),
        Err(HttpError::Io("connection reset".to_string())),
        Ok(Bytes::from("event: token\ndata: never\n\n")),
    ]);
    let events: Vec<StreamEvent> = decode_stream(bytes, Duration::from_secs(5)).collect().await;
    assert_eq!(events.len(), 2);
    assert_eq!(events[0], StreamEvent::Token("partial".to_string()));
    match &events[1] {
        StreamEvent::Error(message) => assert!(message.contains("connection reset")),
        other => panic!("expected error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_decode_stream_empty_body_ends_without_events() {
    let events: Vec<StreamEvent> =
        decode_stream(body_stream(vec![]), Duration::from_secs(5)).collect().await;
    assert!(events.is_empty());
}

#[tokio::test(start_paused = true)]
async fn test_decode_stream_idle_timeout_reports_error() {
    let bytes: ByteStream = Box::pin(
        futures::stream::iter(vec![Ok(Bytes::from("event: token\ndata: hi\n\n"))])
            .chain(futures::stream::pending()),
    );
    let events: Vec<StreamEvent> = decode_stream(bytes, Duration::from_secs(300)).collect().await;
    assert_eq!(
        events,
        vec![
            StreamEvent::Token("hi".to_string()),
            StreamEvent::Error("Stream timed out after 300s without data".to_string()),
        ]
    );
}
