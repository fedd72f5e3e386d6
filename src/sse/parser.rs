//! Line classification and the event accumulator.
//!
//! The decoder is a pure fold over lines: [`classify`] turns a line into a
//! [`LineKind`], and [`reduce`] advances a [`DecoderState`], yielding at most
//! one [`StreamEvent`] per line.

use super::events::{LineKind, StreamEvent, EVENT_DONE, EVENT_ERROR, EVENT_META, EVENT_TOKEN};

/// Accumulated state between event boundaries.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DecoderState {
    /// Name from the most recent `event:` line
    pub event_name: Option<String>,
    /// `data:` payloads seen since the last boundary
    pub data_lines: Vec<String>,
}

impl DecoderState {
    /// True when nothing has been accumulated since the last boundary.
    pub fn is_empty(&self) -> bool {
        self.event_name.is_none() && self.data_lines.is_empty()
    }
}

/// Classify a single SSE line.
///
/// The line is trimmed first, so `\r\n` line endings and indentation are
/// tolerated. Rules are checked in order: empty, comment, `event:`, `data:`.
pub fn classify(line: &str) -> LineKind {
    let line = line.trim();

    if line.is_empty() {
        LineKind::Boundary
    } else if let Some(comment) = line.strip_prefix(':') {
        LineKind::Comment(comment.trim().to_string())
    } else if let Some(name) = line.strip_prefix("event:") {
        LineKind::Event(name.trim().to_string())
    } else if let Some(data) = line.strip_prefix("data:") {
        LineKind::Data(data.trim().to_string())
    } else {
        LineKind::Other(line.to_string())
    }
}

/// Advance the accumulator by one classified line.
///
/// A boundary dispatches only when an event name is set and at least one
/// data line was seen; the state is reset either way.
pub fn reduce(mut state: DecoderState, kind: LineKind) -> (DecoderState, Option<StreamEvent>) {
    match kind {
        LineKind::Boundary => {
            let event = match state.event_name.take() {
                Some(name) if !state.data_lines.is_empty() => {
                    dispatch(&name, state.data_lines.join("\n"))
                }
                _ => None,
            };
            (DecoderState::default(), event)
        }
        LineKind::Event(name) => {
            // An empty name counts as unset.
            state.event_name = if name.is_empty() { None } else { Some(name) };
            (state, None)
        }
        LineKind::Data(data) => {
            state.data_lines.push(data);
            (state, None)
        }
        LineKind::Comment(_) => (state, None),
        LineKind::Other(line) => {
            tracing::trace!("Ignoring unrecognised SSE line: {}", line);
            (state, None)
        }
    }
}

/// Map a completed event to a [`StreamEvent`].
///
/// Unknown event names yield `None`.
pub fn dispatch(event_name: &str, data: String) -> Option<StreamEvent> {
    match event_name {
        EVENT_TOKEN => Some(StreamEvent::Token(data)),
        EVENT_META => match serde_json::from_str::<serde_json::Value>(&data) {
            Ok(value) => Some(StreamEvent::Meta(value)),
            Err(e) => {
                tracing::warn!("Malformed meta payload, passing raw text through: {}", e);
                Some(StreamEvent::Meta(serde_json::json!({ "raw": data })))
            }
        },
        EVENT_ERROR => Some(StreamEvent::Error(data)),
        EVENT_DONE => Some(StreamEvent::Done),
        other => {
            tracing::warn!("Ignoring unknown SSE event type: {}", other);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn run(lines: &[&str]) -> Vec<StreamEvent> {
        let mut state = DecoderState::default();
        let mut events = Vec::new();
        for line in lines {
            let (next, event) = reduce(state, classify(line));
            state = next;
            events.extend(event);
        }
        events
    }

    #[test]
    fn test_classify_empty_line() {
        assert_eq!(classify(""), LineKind::Boundary);
        assert_eq!(classify("   \r"), LineKind::Boundary);
    }

    #[test]
    fn test_classify_comment_line() {
        assert_eq!(classify(": keepalive"), LineKind::Comment("keepalive".into()));
        assert_eq!(classify(":"), LineKind::Comment(String::new()));
    }

    #[test]
    fn test_classify_event_and_data() {
        assert_eq!(classify("event: token"), LineKind::Event("token".into()));
        assert_eq!(classify("event:meta\r"), LineKind::Event("meta".into()));
        assert_eq!(classify("data:  Hello  "), LineKind::Data("Hello".into()));
        assert_eq!(classify("data:"), LineKind::Data(String::new()));
    }

    #[test]
    fn test_classify_other_line() {
        assert_eq!(classify("id: 7"), LineKind::Other("id: 7".into()));
        assert_eq!(classify("garbage"), LineKind::Other("garbage".into()));
    }

    #[test]
    fn test_classify_order_comment_before_prefixes() {
        assert_eq!(
            classify(":event: token"),
            LineKind::Comment("event: token".into())
        );
    }

    #[test]
    fn test_single_token_event() {
        let events = run(&["event: token", "data: Hello", ""]);
        assert_eq!(events, vec![StreamEvent::Token("Hello".into())]);
    }

    #[test]
    fn test_multi_line_data_joined_with_newline() {
        let events = run(&["event: token", "data: Hello", "data: World", ""]);
        assert_eq!(events, vec![StreamEvent::Token("Hello\nWorld".into())]);
    }

    #[test]
    fn test_token_is_not_json_decoded() {
        let events = run(&["event: token", r#"data: "quoted""#, ""]);
        assert_eq!(events, vec![StreamEvent::Token("\"quoted\"".into())]);
    }

    #[test]
    fn test_meta_parsed_as_json() {
        let events = run(&[
            "event: meta",
            r#"data: {"sessionId": "s1", "citations": []}"#,
            "",
        ]);
        assert_eq!(
            events,
            vec![StreamEvent::Meta(json!({"sessionId": "s1", "citations": []}))]
        );
    }

    #[test]
    fn test_malformed_meta_passes_raw_text() {
        let events = run(&["event: meta", "data: not-json", ""]);
        assert_eq!(events, vec![StreamEvent::Meta(json!({"raw": "not-json"}))]);
    }

    #[test]
    fn test_error_and_done() {
        let events = run(&[
            "event: error",
            "data: model unavailable",
            "",
            "event: done",
            "data: [DONE]",
            "",
        ]);
        assert_eq!(
            events,
            vec![
                StreamEvent::Error("model unavailable".into()),
                StreamEvent::Done
            ]
        );
    }

    #[test]
    fn test_boundary_without_data_dispatches_nothing() {
        assert!(run(&["event: done", ""]).is_empty());
        assert!(run(&["data: orphan", ""]).is_empty());
        assert!(run(&["", "", ""]).is_empty());
    }

    #[test]
    fn test_boundary_resets_state() {
        let (state, _) = reduce(DecoderState::default(), classify("event: token"));
        let (state, _) = reduce(state, classify("data: x"));
        assert!(!state.is_empty());
        let (state, event) = reduce(state, LineKind::Boundary);
        assert!(state.is_empty());
        assert!(event.is_some());

        // The previous event name does not leak into the next event.
        let events = run(&["event: token", "", "data: stray", ""]);
        assert!(events.is_empty());
    }

    #[test]
    fn test_empty_event_name_is_unset() {
        assert!(run(&["event:", "data: x", ""]).is_empty());
    }

    #[test]
    fn test_unknown_event_ignored() {
        let events = run(&[
            "event: progress",
            "data: 50%",
            "",
            "event: token",
            "data: A",
            "",
        ]);
        assert_eq!(events, vec![StreamEvent::Token("A".into())]);
    }

    #[test]
    fn test_comments_and_other_lines_do_not_change_state() {
        let events = run(&[
            "event: token",
            ": heartbeat",
            "retry: 1000",
            "data: kept",
            "",
        ]);
        assert_eq!(events, vec![StreamEvent::Token("kept".into())]);
    }

    #[test]
    fn test_later_event_line_wins() {
        let events = run(&["event: meta", "event: token", "data: t", ""]);
        assert_eq!(events, vec![StreamEvent::Token("t".into())]);
    }
}
