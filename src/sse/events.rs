//! SSE event types and definitions
//!
//! Contains the decoded [`StreamEvent`] union and the [`LineKind`]
//! classification of a single wire line.

/// Event names the backend sends on `/query/stream`.
pub const EVENT_TOKEN: &str = "token";
pub const EVENT_META: &str = "meta";
pub const EVENT_ERROR: &str = "error";
pub const EVENT_DONE: &str = "done";

/// A decoded event from the answer stream.
#[derive(Debug, Clone, PartialEq)]
pub enum StreamEvent {
    /// Raw answer text, appended to the assistant turn as-is
    Token(String),
    /// Metadata object (citations, sources, session id). Malformed JSON
    /// arrives here as `{"raw": <data>}`.
    Meta(serde_json::Value),
    /// Backend-reported or transport error text
    Error(String),
    /// End of answer; nothing after it is read
    Done,
}

impl StreamEvent {
    /// Get the wire name of this event, used for logging.
    pub fn event_type_name(&self) -> &'static str {
        match self {
            StreamEvent::Token(_) => EVENT_TOKEN,
            StreamEvent::Meta(_) => EVENT_META,
            StreamEvent::Error(_) => EVENT_ERROR,
            StreamEvent::Done => EVENT_DONE,
        }
    }

    /// True for the event that ends the stream.
    pub fn is_terminal(&self) -> bool {
        matches!(self, StreamEvent::Done)
    }
}

/// Classification of one trimmed line of SSE framing.
#[derive(Debug, Clone, PartialEq)]
pub enum LineKind {
    /// Empty line - end of the current event
    Boundary,
    /// Line starting with `:`
    Comment(String),
    /// `event:` line with the prefix stripped and trimmed
    Event(String),
    /// `data:` line with the prefix stripped and trimmed
    Data(String),
    /// Anything else; ignored
    Other(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_type_names() {
        assert_eq!(StreamEvent::Token("a".into()).event_type_name(), "token");
        assert_eq!(
            StreamEvent::Meta(serde_json::json!({})).event_type_name(),
            "meta"
        );
        assert_eq!(StreamEvent::Error("x".into()).event_type_name(), "error");
        assert_eq!(StreamEvent::Done.event_type_name(), "done");
    }

    #[test]
    fn test_only_done_is_terminal() {
        assert!(StreamEvent::Done.is_terminal());
        assert!(!StreamEvent::Error("boom".into()).is_terminal());
        assert!(!StreamEvent::Token(String::new()).is_terminal());
    }
}
