//! User actions that start requests.
//!
//! Each one-shot request runs on its own task and reports back through
//! `message_tx`. The trigger stays busy until the matching message has been
//! handled.

use std::path::PathBuf;
use tracing::debug;

use super::{App, AppMessage, Busy, Confirm, PromptKind, StatusLine};
use crate::error::{ClientError, ValidationError};
use crate::startup::check_backend;

impl App {
    /// Mark `op` busy; false if it already was.
    fn begin(&mut self, op: Busy) -> bool {
        if !self.busy.insert(op) {
            debug!("Ignoring trigger, {} already in flight", op.label());
            return false;
        }
        self.mark_dirty();
        true
    }

    pub(super) fn finish(&mut self, op: Busy) {
        self.busy.remove(&op);
    }

    /// Show a failed request with its category hint.
    pub(super) fn report_error(&mut self, context: &str, err: &ClientError) {
        self.status = Some(StatusLine {
            hint: Some(err.category().recovery_hint()),
            retryable: err.is_retryable(),
            ..StatusLine::error(format!("{}: {}", context, err.user_message()))
        });
        self.mark_dirty();
    }

    // ---- queries ----

    /// Send the input as a streaming query.
    pub fn send_stream_query(&mut self) {
        if !self.can_send() {
            return;
        }
        let request = match self
            .orchestrator
            .build_query(self.input.as_str(), self.registry.selection())
        {
            Ok(request) => request,
            Err(err) => return self.report_error("Query", &err),
        };
        match self.orchestrator.start_stream(request) {
            Ok(_) => {
                self.input.clear();
                self.scroll_offset = 0;
                self.set_status("Streaming answer... (Esc to cancel)");
            }
            Err(err) => self.report_error("Query", &err),
        }
    }

    /// Send the input as a synchronous query.
    pub fn send_sync_query(&mut self) {
        if !self.can_send() {
            return;
        }
        let request = match self
            .orchestrator
            .build_query(self.input.as_str(), self.registry.selection())
        {
            Ok(request) => request,
            Err(err) => return self.report_error("Query", &err),
        };
        if !self.begin(Busy::SyncQuery) {
            return;
        }
        self.input.clear();
        self.scroll_offset = 0;
        self.orchestrator.begin_sync(&request);
        self.set_status("Waiting for answer...");

        let client = self.client().clone();
        let tx = self.message_tx.clone();
        tokio::spawn(async move {
            let result = client.query(&request).await;
            let _ = tx.send(AppMessage::SyncAnswer(result));
        });
    }

    /// Cancel the active stream.
    pub fn cancel_stream(&mut self) {
        if self.orchestrator.cancel_stream() {
            self.set_status("Cancelling stream...");
        }
    }

    // ---- sessions ----

    /// Mark a refresh busy. If it already is, queue one more run, since
    /// the in-flight request may predate the change that asked for it.
    fn begin_refresh(&mut self, op: Busy) -> bool {
        if self.busy.contains(&op) {
            debug!("{} refresh in flight, queueing another", op.label());
            self.refresh_again.insert(op);
            return false;
        }
        self.begin(op)
    }

    /// Run a refresh queued by [`Self::begin_refresh`].
    pub(super) fn run_queued_refresh(&mut self, op: Busy) {
        if !self.refresh_again.remove(&op) {
            return;
        }
        match op {
            Busy::Sessions => self.spawn_refresh_sessions(),
            Busy::Documents => self.spawn_refresh_documents(),
            _ => {}
        }
    }

    pub fn spawn_refresh_sessions(&mut self) {
        if !self.begin_refresh(Busy::Sessions) {
            return;
        }
        let client = self.client().clone();
        let tx = self.message_tx.clone();
        tokio::spawn(async move {
            let result = client.list_sessions().await;
            let _ = tx.send(AppMessage::SessionsLoaded(result));
        });
    }

    pub fn create_session(&mut self) {
        if self.is_streaming() {
            return self.set_error("Wait for the current answer before switching sessions");
        }
        if !self.begin(Busy::SessionLoad) {
            return;
        }
        let client = self.client().clone();
        let tx = self.message_tx.clone();
        tokio::spawn(async move {
            let result = client.create_session().await;
            let _ = tx.send(AppMessage::SessionCreated(result));
        });
    }

    /// Load the session under the cursor and make it current.
    pub fn load_selected_session(&mut self) {
        if self.is_streaming() {
            return self.set_error("Wait for the current answer before switching sessions");
        }
        let Some(session_id) = self.selected_session_id().filter(|id| !id.trim().is_empty())
        else {
            let err: ClientError = ValidationError::NothingSelected {
                what: "session".to_string(),
            }
            .into();
            return self.report_error("Load session", &err);
        };
        if !self.begin(Busy::SessionLoad) {
            return;
        }
        let client = self.client().clone();
        let tx = self.message_tx.clone();
        tokio::spawn(async move {
            let result = client.get_session(&session_id).await;
            let _ = tx.send(AppMessage::SessionLoaded { session_id, result });
        });
    }

    fn spawn_delete_session(&mut self, session_id: String) {
        if !self.begin(Busy::Delete) {
            return;
        }
        let client = self.client().clone();
        let tx = self.message_tx.clone();
        tokio::spawn(async move {
            let result = client.delete_session(&session_id).await;
            let _ = tx.send(AppMessage::SessionDeleted { session_id, result });
        });
    }

    // ---- documents ----

    /// Refresh documents, then filter options once the list succeeded.
    pub fn spawn_refresh_documents(&mut self) {
        if !self.begin_refresh(Busy::Documents) {
            return;
        }
        self.busy.insert(Busy::Filters);
        let client = self.client().clone();
        let tx = self.message_tx.clone();
        tokio::spawn(async move {
            let documents = client.list_documents().await;
            let listed = documents.is_ok();
            let _ = tx.send(AppMessage::DocumentsLoaded(documents));
            if listed {
                let options = client.list_filter_options().await;
                let _ = tx.send(AppMessage::FilterOptionsLoaded(options));
            }
        });
    }

    fn spawn_upload(&mut self, kind: PromptKind, paths: Vec<PathBuf>) {
        if !self.begin(Busy::Upload) {
            return;
        }
        self.set_status(format!("Uploading {} file(s)...", paths.len()));
        let client = self.client().clone();
        let tx = self.message_tx.clone();
        tokio::spawn(async move {
            let result = match kind {
                PromptKind::Upload => client.upload_documents(&paths).await,
                PromptKind::BatchUpload => client.upload_batch(&paths).await,
            };
            let _ = tx.send(AppMessage::UploadFinished(result));
        });
    }

    fn spawn_delete_document(&mut self, filename: String) {
        if !self.begin(Busy::Delete) {
            return;
        }
        let client = self.client().clone();
        let tx = self.message_tx.clone();
        tokio::spawn(async move {
            let result = client.delete_document(&filename).await;
            let _ = tx.send(AppMessage::DocumentDeleted { filename, result });
        });
    }

    // ---- misc ----

    /// Reload sessions, documents and filters.
    pub fn refresh_all(&mut self) {
        self.spawn_refresh_sessions();
        self.spawn_refresh_documents();
    }

    pub fn spawn_health_check(&mut self) {
        if !self.begin(Busy::Health) {
            return;
        }
        self.set_status(format!("Testing connection to {}...", self.client().base_url()));
        let client = self.client().clone();
        let tx = self.message_tx.clone();
        tokio::spawn(async move {
            let report = check_backend(&client).await;
            let _ = tx.send(AppMessage::HealthChecked(report));
        });
    }

    pub fn clear_filters(&mut self) {
        self.registry.clear_filter_selection();
        self.set_status("Filters cleared");
    }

    /// Toggle the filter value under the cursor of the focused list.
    pub fn toggle_filter_under_cursor(&mut self) {
        use super::Focus;
        match self.focus {
            Focus::SourceFiles => {
                if let Some(value) = self.source_file_options().get(self.source_cursor) {
                    let value = value.to_string();
                    self.registry.selection_mut().toggle_source_file(&value);
                }
            }
            Focus::FileTypes => {
                if let Some(value) = self.file_type_options().get(self.type_cursor) {
                    let value = value.to_string();
                    self.registry.selection_mut().toggle_file_type(&value);
                }
            }
            _ => {}
        }
        self.mark_dirty();
    }

    /// Ask for confirmation before deleting the focused item.
    pub fn request_delete(&mut self) {
        use super::Focus;
        self.confirm = match self.focus {
            Focus::Sessions => self.selected_session_id().map(Confirm::DeleteSession),
            Focus::Documents => self.selected_document().map(Confirm::DeleteDocument),
            _ => None,
        };
        if self.confirm.is_none() {
            self.set_error("Nothing selected to delete");
        }
        self.mark_dirty();
    }

    /// Run the confirmed action.
    pub fn accept_confirm(&mut self) {
        match self.confirm.take() {
            Some(Confirm::DeleteDocument(filename)) => self.spawn_delete_document(filename),
            Some(Confirm::DeleteSession(session_id)) => self.spawn_delete_session(session_id),
            None => {}
        }
        self.mark_dirty();
    }

    /// Submit the open path prompt.
    pub fn submit_prompt(&mut self) {
        let Some(mut prompt) = self.prompt.take() else {
            return;
        };
        let paths: Vec<PathBuf> = prompt
            .input
            .take()
            .split_whitespace()
            .map(PathBuf::from)
            .collect();
        if paths.is_empty() {
            let err: ClientError = ValidationError::NoFiles.into();
            return self.report_error("Upload", &err);
        }
        self.spawn_upload(prompt.kind, paths);
    }
}
