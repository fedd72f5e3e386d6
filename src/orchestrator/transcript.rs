//! Visible conversation transcript.

use crate::models::{Role, Turn};

/// One entry of the visible transcript.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TranscriptEntry {
    /// A finished turn
    Turn(Turn),
    /// Assistant answer still receiving tokens
    Streaming(String),
    /// Synchronous question waiting for its answer
    Pending { question: String },
    /// Inline error annotation
    Error(String),
}

/// Ordered transcript of the current session.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Transcript {
    entries: Vec<TranscriptEntry>,
    /// Index of the open streaming entry
    open: Option<usize>,
}

impl Transcript {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entries(&self) -> &[TranscriptEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Finished turns in order, ignoring placeholders and annotations.
    pub fn turns(&self) -> Vec<&Turn> {
        self.entries
            .iter()
            .filter_map(|entry| match entry {
                TranscriptEntry::Turn(turn) => Some(turn),
                _ => None,
            })
            .collect()
    }

    pub fn push_turn(&mut self, turn: Turn) {
        self.entries.push(TranscriptEntry::Turn(turn));
    }

    pub fn push_error(&mut self, message: impl Into<String>) {
        self.entries.push(TranscriptEntry::Error(message.into()));
    }

    /// Open an empty assistant entry for streamed tokens.
    pub fn begin_assistant(&mut self) {
        self.entries.push(TranscriptEntry::Streaming(String::new()));
        self.open = Some(self.entries.len() - 1);
    }

    /// Append a token to the open assistant entry, opening one if needed.
    pub fn append_token(&mut self, token: &str) {
        if self.open.is_none() {
            self.begin_assistant();
        }
        if let Some(TranscriptEntry::Streaming(text)) =
            self.open.and_then(|index| self.entries.get_mut(index))
        {
            text.push_str(token);
        }
    }

    /// Text of the open assistant entry.
    pub fn streaming_text(&self) -> Option<&str> {
        match self.open.and_then(|index| self.entries.get(index)) {
            Some(TranscriptEntry::Streaming(text)) => Some(text),
            _ => None,
        }
    }

    /// Close the open assistant entry into an immutable turn.
    pub fn finish_assistant(&mut self) {
        if let Some(index) = self.open.take() {
            if let Some(entry) = self.entries.get_mut(index) {
                if let TranscriptEntry::Streaming(text) = entry {
                    let text = std::mem::take(text);
                    *entry = TranscriptEntry::Turn(Turn::assistant(text));
                }
            }
        }
    }

    /// Show a pending synchronous question.
    pub fn push_pending(&mut self, question: impl Into<String>) {
        self.entries.push(TranscriptEntry::Pending {
            question: question.into(),
        });
    }

    /// Replace the pending placeholder with the question and its answer.
    pub fn resolve_pending(&mut self, answer: impl Into<String>) {
        match self.take_pending() {
            Some((index, question)) => {
                self.entries.splice(
                    index..index,
                    [
                        TranscriptEntry::Turn(Turn::user(question)),
                        TranscriptEntry::Turn(Turn::assistant(answer)),
                    ],
                );
                self.reindex_open(index, 2);
            }
            None => self.push_turn(Turn::assistant(answer)),
        }
    }

    /// Drop the pending placeholder without touching history.
    pub fn discard_pending(&mut self) -> Option<String> {
        self.take_pending().map(|(_, question)| question)
    }

    pub fn has_pending(&self) -> bool {
        self.entries
            .iter()
            .any(|entry| matches!(entry, TranscriptEntry::Pending { .. }))
    }

    fn take_pending(&mut self) -> Option<(usize, String)> {
        let index = self
            .entries
            .iter()
            .rposition(|entry| matches!(entry, TranscriptEntry::Pending { .. }))?;
        let question = match self.entries.remove(index) {
            TranscriptEntry::Pending { question } => question,
            _ => return None,
        };
        self.reindex_open(index, -1);
        Some((index, question))
    }

    /// Keep `open` pointing at the same entry after an insert or removal at `at`.
    fn reindex_open(&mut self, at: usize, delta: isize) {
        if let Some(open) = self.open {
            if open >= at {
                self.open = Some(open.saturating_add_signed(delta));
            }
        }
    }

    /// Replace everything with server history.
    pub fn replace_with(&mut self, history: Vec<Turn>) {
        self.entries = history.into_iter().map(TranscriptEntry::Turn).collect();
        self.open = None;
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.open = None;
    }

    /// Number of finished turns spoken by `role`.
    pub fn count_role(&self, role: Role) -> usize {
        self.turns().iter().filter(|turn| turn.role == role).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_streaming_tokens_then_finish() {
        let mut transcript = Transcript::new();
        transcript.push_turn(Turn::user("q"));
        transcript.begin_assistant();
        transcript.append_token("Hel");
        transcript.append_token("lo");
        assert_eq!(transcript.streaming_text(), Some("Hello"));

        transcript.finish_assistant();
        assert_eq!(transcript.streaming_text(), None);
        assert_eq!(
            transcript.entries(),
            &[
                TranscriptEntry::Turn(Turn::user("q")),
                TranscriptEntry::Turn(Turn::assistant("Hello")),
            ]
        );
    }

    #[test]
    fn test_error_does_not_close_open_entry() {
        let mut transcript = Transcript::new();
        transcript.begin_assistant();
        transcript.append_token("partial");
        transcript.push_error("model overloaded");
        transcript.append_token(" more");
        transcript.finish_assistant();

        assert_eq!(
            transcript.entries(),
            &[
                TranscriptEntry::Turn(Turn::assistant("partial more")),
                TranscriptEntry::Error("model overloaded".into()),
            ]
        );
    }

    #[test]
    fn test_token_without_open_entry_opens_one() {
        let mut transcript = Transcript::new();
        transcript.append_token("x");
        assert_eq!(transcript.streaming_text(), Some("x"));
    }

    #[test]
    fn test_pending_resolved_in_place() {
        let mut transcript = Transcript::new();
        transcript.push_turn(Turn::user("earlier"));
        transcript.push_pending("why?");
        assert!(transcript.has_pending());

        transcript.resolve_pending("because");
        assert!(!transcript.has_pending());
        assert_eq!(
            transcript.turns(),
            vec![
                &Turn::user("earlier"),
                &Turn::user("why?"),
                &Turn::assistant("because"),
            ]
        );
    }

    #[test]
    fn test_pending_discarded_leaves_history_untouched() {
        let mut transcript = Transcript::new();
        transcript.push_turn(Turn::user("earlier"));
        transcript.push_pending("why?");

        assert_eq!(transcript.discard_pending().as_deref(), Some("why?"));
        assert_eq!(
            transcript.entries(),
            &[TranscriptEntry::Turn(Turn::user("earlier"))]
        );
    }

    #[test]
    fn test_pending_before_open_stream_keeps_open_index() {
        let mut transcript = Transcript::new();
        transcript.push_pending("sync q");
        transcript.begin_assistant();
        transcript.discard_pending();
        transcript.append_token("t");
        assert_eq!(transcript.streaming_text(), Some("t"));
    }

    #[test]
    fn test_replace_with_history() {
        let mut transcript = Transcript::new();
        transcript.begin_assistant();
        transcript.append_token("stale");

        transcript.replace_with(vec![Turn::user("a"), Turn::assistant("b")]);
        assert_eq!(transcript.len(), 2);
        assert_eq!(transcript.streaming_text(), None);
        assert_eq!(transcript.count_role(Role::User), 1);
    }
}
