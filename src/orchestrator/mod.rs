//! Session and query orchestration.
//!
//! [`Orchestrator`] owns the current session id, the visible transcript, the
//! citation set and the single active stream. It is the only writer of that
//! state. The stream itself runs on a spawned task that reports
//! [`StreamUpdate`]s over an ordered channel; the owner applies them with
//! [`Orchestrator::apply_stream_update`] on its own task.
//!
//! Every operation exists in two forms: an `async` method that performs the
//! request and applies the result, and `apply_*` methods for callers that run
//! the request elsewhere and hand the result back (the terminal UI does this
//! to keep its event loop responsive).

mod lifecycle;
mod stream;
mod transcript;

pub use lifecycle::QueryPhase;
pub use stream::{StreamHandle, StreamOutcome, StreamUpdate};
pub use transcript::{Transcript, TranscriptEntry};

use tokio::sync::mpsc;

use crate::client::RagClient;
use crate::error::{ClientError, ClientResult, ValidationError};
use crate::models::{
    Citation, QueryRequest, QueryResponse, SessionDetail, SessionSummary, StreamMeta, Turn,
};
use crate::registry::FilterSelection;
use crate::sse::StreamEvent;

/// Session/query state machine for one client instance.
#[derive(Debug)]
pub struct Orchestrator<M = StreamUpdate> {
    client: RagClient,
    session_id: String,
    transcript: Transcript,
    citations: Vec<Citation>,
    sessions: Vec<SessionSummary>,
    phase: QueryPhase,
    active: Option<StreamHandle>,
    next_stream_id: u64,
    updates: mpsc::UnboundedSender<M>,
}

impl<M> Orchestrator<M>
where
    M: From<StreamUpdate> + Send + 'static,
{
    /// Create an orchestrator whose stream updates go to `updates`.
    pub fn new(
        client: RagClient,
        session_id: impl Into<String>,
        updates: mpsc::UnboundedSender<M>,
    ) -> Self {
        Self {
            client,
            session_id: session_id.into(),
            transcript: Transcript::new(),
            citations: Vec::new(),
            sessions: Vec::new(),
            phase: QueryPhase::Idle,
            active: None,
            next_stream_id: 1,
            updates,
        }
    }

    pub fn client(&self) -> &RagClient {
        &self.client
    }

    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    /// Replace the current session id. The transcript is left alone.
    pub fn set_session_id(&mut self, session_id: impl Into<String>) {
        self.session_id = session_id.into();
    }

    pub fn transcript(&self) -> &Transcript {
        &self.transcript
    }

    pub fn citations(&self) -> &[Citation] {
        &self.citations
    }

    pub fn sessions(&self) -> &[SessionSummary] {
        &self.sessions
    }

    pub fn phase(&self) -> QueryPhase {
        self.phase
    }

    pub fn is_streaming(&self) -> bool {
        self.active.is_some()
    }

    /// Handle of the active stream, if any.
    pub fn active_stream(&self) -> Option<&StreamHandle> {
        self.active.as_ref()
    }

    /// Cancel any stream, clear transcript and citations, return to `Idle`.
    /// The session id is kept.
    pub fn reset(&mut self) {
        if let Some(mut handle) = self.active.take() {
            handle.cancel();
        }
        self.transcript.clear();
        self.citations.clear();
        self.set_phase(QueryPhase::Idle);
    }

    fn set_phase(&mut self, phase: QueryPhase) {
        if self.phase != phase {
            tracing::info!("Query phase {} -> {}", self.phase, phase);
            self.phase = phase;
        }
    }

    /// Build a request from the question text and filter selection.
    ///
    /// Rejects a question that is empty after trimming. A blank session id
    /// falls back to `default`.
    pub fn build_query(
        &self,
        question: &str,
        selection: &FilterSelection,
    ) -> ClientResult<QueryRequest> {
        if question.trim().is_empty() {
            return Err(ValidationError::EmptyQuestion.into());
        }
        Ok(QueryRequest::new(
            question,
            &self.session_id,
            selection.source_files().iter().cloned(),
            selection.file_types().iter().cloned(),
        ))
    }

    // ---- synchronous query ----

    /// Run a synchronous query, then refresh the session list.
    ///
    /// On failure history is left untouched and the error is returned.
    pub async fn query_sync(&mut self, request: QueryRequest) -> ClientResult<()> {
        self.begin_sync(&request);
        let result = self.client.query(&request).await;
        self.apply_sync_result(result)?;
        self.refresh_sessions_quietly().await;
        Ok(())
    }

    /// Show the question as pending.
    pub fn begin_sync(&mut self, request: &QueryRequest) {
        tracing::info!("Sync query in session {}", request.session_id);
        self.transcript.push_pending(request.question.clone());
        self.set_phase(QueryPhase::Sending);
    }

    /// Apply the answer of a synchronous query.
    pub fn apply_sync_result(&mut self, result: ClientResult<QueryResponse>) -> ClientResult<()> {
        match result {
            Ok(response) => {
                self.transcript.resolve_pending(response.answer);
                self.citations = response.citations;
                self.set_phase(QueryPhase::Completed);
                Ok(())
            }
            Err(err) => {
                tracing::error!("Sync query failed [{}]: {}", err.error_code(), err);
                self.transcript.discard_pending();
                self.set_phase(QueryPhase::Failed);
                Err(err)
            }
        }
    }

    // ---- streaming query ----

    /// Start a streaming query. Returns the stream id.
    ///
    /// Rejected while another stream is active. The question and an empty
    /// assistant entry are shown immediately.
    pub fn start_stream(&mut self, request: QueryRequest) -> ClientResult<u64> {
        if self.active.is_some() {
            return Err(ValidationError::StreamInProgress.into());
        }

        let id = self.next_stream_id;
        self.next_stream_id += 1;

        tracing::info!("Starting stream {} in session {}", id, request.session_id);
        self.transcript.push_turn(Turn::user(request.question.clone()));
        self.transcript.begin_assistant();
        self.set_phase(QueryPhase::Sending);

        self.active = Some(stream::spawn_stream(
            self.client.clone(),
            request,
            id,
            self.updates.clone(),
        ));
        Ok(id)
    }

    /// Ask the active stream to stop. Its completion still arrives as a
    /// `Finished` update. Returns false if there is nothing to cancel.
    pub fn cancel_stream(&mut self) -> bool {
        match self.active.as_mut() {
            Some(handle) => {
                tracing::info!("Cancelling stream {}", handle.id());
                handle.cancel()
            }
            None => false,
        }
    }

    /// Apply one update from the stream task.
    ///
    /// Returns true when the active stream finished; the caller then
    /// refreshes the session list. Updates of other streams are ignored.
    pub fn apply_stream_update(&mut self, update: StreamUpdate) -> bool {
        let active_id = self.active.as_ref().map(StreamHandle::id);
        if active_id != Some(update.id()) {
            tracing::debug!("Ignoring update of inactive stream {}", update.id());
            return false;
        }

        match update {
            StreamUpdate::Event { event, .. } => {
                self.apply_stream_event(event);
                false
            }
            StreamUpdate::Finished { outcome, .. } => {
                self.active = None;
                self.transcript.finish_assistant();
                if outcome == StreamOutcome::Cancelled {
                    self.transcript.push_error("Stream cancelled");
                }
                self.set_phase(match outcome {
                    StreamOutcome::Done | StreamOutcome::Ended => QueryPhase::Completed,
                    StreamOutcome::Failed | StreamOutcome::Cancelled => QueryPhase::Failed,
                });
                true
            }
        }
    }

    fn apply_stream_event(&mut self, event: StreamEvent) {
        if self.phase == QueryPhase::Sending {
            self.set_phase(QueryPhase::Streaming);
        }
        match event {
            StreamEvent::Token(token) => self.transcript.append_token(&token),
            StreamEvent::Meta(value) => self.apply_meta(StreamMeta::from_value(&value)),
            StreamEvent::Error(message) => {
                tracing::error!("Stream error: {}", message);
                self.transcript.push_error(message);
            }
            StreamEvent::Done => {}
        }
    }

    fn apply_meta(&mut self, meta: StreamMeta) {
        self.citations = meta.citations;
        if let Some(session_id) = meta.session_id {
            let session_id = session_id.trim();
            if !session_id.is_empty() && session_id != self.session_id {
                tracing::info!(
                    "Server moved the conversation from session {} to {}",
                    self.session_id,
                    session_id
                );
                self.session_id = session_id.to_string();
            }
        }
    }

    // ---- sessions ----

    /// Refresh the session list.
    pub async fn refresh_sessions(&mut self) -> ClientResult<()> {
        let sessions = self.client.list_sessions().await?;
        self.apply_sessions(sessions);
        Ok(())
    }

    /// Refresh after a query; a failure here only gets logged.
    async fn refresh_sessions_quietly(&mut self) {
        if let Err(err) = self.refresh_sessions().await {
            tracing::warn!("Session list refresh failed: {}", err);
        }
    }

    pub fn apply_sessions(&mut self, sessions: Vec<SessionSummary>) {
        tracing::debug!("Loaded {} sessions", sessions.len());
        self.sessions = sessions;
    }

    /// Create a session on the server and make it current.
    pub async fn create_session(&mut self) -> ClientResult<String> {
        let session_id = self.client.create_session().await?;
        self.apply_created_session(session_id.clone());
        self.refresh_sessions_quietly().await;
        Ok(session_id)
    }

    /// Make a newly created session current with an empty transcript.
    pub fn apply_created_session(&mut self, session_id: String) {
        tracing::info!("Created session {}", session_id);
        self.session_id = session_id;
        self.transcript.clear();
        self.citations.clear();
    }

    /// Delete a session on the server.
    pub async fn delete_session(&mut self, session_id: &str) -> ClientResult<()> {
        self.client.delete_session(session_id).await?;
        self.apply_deleted_session(session_id);
        self.refresh_sessions_quietly().await;
        Ok(())
    }

    /// Forget local state of a deleted session. If it was current, the
    /// transcript is cleared but the id is kept; the server recreates the
    /// session on the next query.
    pub fn apply_deleted_session(&mut self, session_id: &str) {
        tracing::info!("Deleted session {}", session_id);
        self.sessions.retain(|s| s.session_id != session_id);
        if session_id == self.session_id {
            self.transcript.clear();
            self.citations.clear();
        }
    }

    /// Load a session and make it current. The transcript is replaced by
    /// the server history.
    pub async fn load_session(&mut self, session_id: &str) -> ClientResult<()> {
        let detail = self.client.get_session(session_id).await?;
        self.apply_loaded_session(session_id, detail);
        Ok(())
    }

    /// Switch to a session picked from the list.
    pub async fn switch_session(&mut self, session_id: &str) -> ClientResult<()> {
        if session_id.trim().is_empty() {
            return Err(ValidationError::NothingSelected {
                what: "session".to_string(),
            }
            .into());
        }
        self.load_session(session_id).await
    }

    pub fn apply_loaded_session(&mut self, session_id: &str, detail: SessionDetail) {
        tracing::info!(
            "Loaded session {} with {} turns",
            session_id,
            detail.history.len()
        );
        self.session_id = session_id.to_string();
        self.transcript.replace_with(detail.history);
    }
}

impl Orchestrator<StreamUpdate> {
    /// Run a streaming query to completion, applying every update, then
    /// refresh the session list. `rx` must receive this orchestrator's
    /// updates.
    pub async fn query_stream(
        &mut self,
        request: QueryRequest,
        rx: &mut mpsc::UnboundedReceiver<StreamUpdate>,
    ) -> ClientResult<StreamOutcome> {
        let id = self.start_stream(request)?;
        while let Some(update) = rx.recv().await {
            let outcome = match &update {
                StreamUpdate::Finished { id: done, outcome } if *done == id => Some(*outcome),
                _ => None,
            };
            if self.apply_stream_update(update) {
                self.refresh_sessions_quietly().await;
            }
            if let Some(outcome) = outcome {
                return Ok(outcome);
            }
        }
        Err(ClientError::protocol(
            "stream",
            "update channel closed before completion",
        ))
    }
}

impl<M> Drop for Orchestrator<M> {
    fn drop(&mut self) {
        if let Some(handle) = self.active.as_mut() {
            handle.cancel();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::{MockHttpClient, MockResponse};
    use crate::startup::config::ClientConfig;
    use serde_json::json;
    use std::sync::Arc;

    const BASE: &str = "http://rag.test/api";

    fn orchestrator() -> (
        Orchestrator,
        mpsc::UnboundedReceiver<StreamUpdate>,
        MockHttpClient,
    ) {
        let mock = MockHttpClient::new();
        let config = ClientConfig::new().with_base_url(BASE);
        let client = RagClient::new(Arc::new(mock.clone()), &config);
        let (tx, rx) = mpsc::unbounded_channel();
        (Orchestrator::new(client, "s1", tx), rx, mock)
    }

    #[test]
    fn test_build_query_rejects_blank_question() {
        let (orch, _rx, _mock) = orchestrator();
        let err = orch
            .build_query("   \n", &FilterSelection::default())
            .unwrap_err();
        assert_eq!(err, ClientError::Validation(ValidationError::EmptyQuestion));
    }

    #[test]
    fn test_build_query_uses_selection_and_session() {
        let (mut orch, _rx, _mock) = orchestrator();
        let mut selection = FilterSelection::default();
        selection.toggle_source_file("a.pdf");
        selection.toggle_file_type("pdf");

        let request = orch.build_query(" hi ", &selection).unwrap();
        assert_eq!(request.question, "hi");
        assert_eq!(request.session_id, "s1");
        assert!(request.source_files.contains("a.pdf"));
        assert!(request.file_types.contains("pdf"));

        orch.set_session_id("");
        let request = orch.build_query("hi", &selection).unwrap();
        assert_eq!(request.session_id, "default");
    }

    #[test]
    fn test_sync_failure_leaves_history() {
        let (mut orch, _rx, _mock) = orchestrator();
        orch.transcript.push_turn(Turn::user("old"));
        let request = QueryRequest::new("new", "s1", Vec::new(), Vec::new());

        orch.begin_sync(&request);
        assert_eq!(orch.phase(), QueryPhase::Sending);
        let result = orch.apply_sync_result(Err(ClientError::application(500, "boom")));

        assert!(result.is_err());
        assert_eq!(orch.phase(), QueryPhase::Failed);
        assert_eq!(
            orch.transcript().entries(),
            &[TranscriptEntry::Turn(Turn::user("old"))]
        );
    }

    #[test]
    fn test_meta_replaces_citations_and_adopts_session() {
        let (mut orch, _rx, _mock) = orchestrator();
        orch.citations = vec![Citation::default(), Citation::default()];

        orch.apply_stream_event(StreamEvent::Meta(json!({
            "sessionId": "s2",
            "citations": [{"index": 1, "source": "a.pdf", "snippet": "x"}]
        })));
        assert_eq!(orch.citations().len(), 1);
        assert_eq!(orch.session_id(), "s2");

        orch.apply_stream_event(StreamEvent::Meta(json!({"raw": "not-json"})));
        assert!(orch.citations().is_empty());
        assert_eq!(orch.session_id(), "s2");
    }

    #[tokio::test]
    async fn test_stream_rejected_while_active() {
        let (mut orch, _rx, mock) = orchestrator();
        mock.set_response(
            "POST",
            &format!("{}/query/stream", BASE),
            MockResponse::StreamPending(vec![]),
        );

        let request = QueryRequest::new("q", "s1", Vec::new(), Vec::new());
        orch.start_stream(request.clone()).unwrap();
        let err = orch.start_stream(request).unwrap_err();
        assert_eq!(
            err,
            ClientError::Validation(ValidationError::StreamInProgress)
        );
    }

    #[tokio::test]
    async fn test_updates_of_other_streams_ignored() {
        let (mut orch, _rx, _mock) = orchestrator();
        assert!(!orch.apply_stream_update(StreamUpdate::Finished {
            id: 99,
            outcome: StreamOutcome::Done,
        }));
        assert_eq!(orch.phase(), QueryPhase::Idle);
    }

    #[tokio::test]
    async fn test_delete_current_session_clears_transcript() {
        let (mut orch, _rx, mock) = orchestrator();
        mock.set_default_response(MockResponse::json(200, json!([])));
        mock.set_response(
            "DELETE",
            &format!("{}/sessions/s1", BASE),
            MockResponse::json(200, json!({"cleared": true})),
        );
        orch.transcript.push_turn(Turn::user("q"));

        orch.delete_session("s1").await.unwrap();
        assert!(orch.transcript().is_empty());
        assert_eq!(orch.session_id(), "s1");
    }

    #[tokio::test]
    async fn test_switch_session_requires_id() {
        let (mut orch, _rx, mock) = orchestrator();
        let err = orch.switch_session(" ").await.unwrap_err();
        assert!(matches!(
            err,
            ClientError::Validation(ValidationError::NothingSelected { .. })
        ));
        assert!(mock.get_requests().is_empty());
    }
}
